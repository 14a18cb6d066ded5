// swapman/src/coordinator.rs
//
//! The surface coordinator: one native window's on-screen and off-screen resource surfaces,
//! and the callback surface the host engine drives.

use crate::context::ContextManager;
use crate::damage::DamageRect;
use crate::error::Error;
use crate::platform::egl::context as egl_context;
use crate::platform::egl::ffi::DamageFunctions;
use crate::platform::{NativeDrawable, NativeWindow};
use crate::surface::RenderSurface;

use euclid::default::Size2D;
use log::error;
use std::os::raw::c_void;

const OFFSCREEN_PBUFFER_SIZE: i32 = 1;

/// Owns the on-screen render surface and the off-screen resource surface for one native
/// window, and implements the presentation callbacks the host engine invokes.
///
/// The host contract is thread-shaped, not lock-shaped: every callback except
/// [`SurfaceCoordinator::make_resource_current`] runs on the host's single raster thread,
/// serialized by the host itself, so this type takes no locks. The resource surface wraps a
/// context of its own, which is what makes binding it from a separate upload thread sound.
pub struct SurfaceCoordinator {
    window: Box<dyn NativeWindow>,
    pub(crate) onscreen: Option<RenderSurface>,
    pub(crate) offscreen: Option<RenderSurface>,
    vsync_enabled: bool,
}

unsafe impl Send for SurfaceCoordinator {}
unsafe impl Sync for SurfaceCoordinator {}

impl SurfaceCoordinator {
    /// The backend adapter is chosen here, once, by whoever realizes the native window.
    pub fn new(window: Box<dyn NativeWindow>, vsync_enabled: bool) -> SurfaceCoordinator {
        SurfaceCoordinator {
            window,
            onscreen: None,
            offscreen: None,
            vsync_enabled,
        }
    }

    /// Creates the on-screen surface from the window's native drawable with the primary
    /// context, and the off-screen resource surface with the resource context.
    ///
    /// The resource surface uses a pixel buffer unless the backend supplies a dummy drawable
    /// of its own. On failure the off-screen surface is cleared, never left dangling.
    pub fn bind(&mut self, manager: &ContextManager, size: Size2D<i32>) -> Result<(), Error> {
        let onscreen = self.create_onscreen(manager, size)?;
        self.onscreen = Some(onscreen);

        self.offscreen = None;
        let offscreen_size = Size2D::new(OFFSCREEN_PBUFFER_SIZE, OFFSCREEN_PBUFFER_SIZE);
        let offscreen = match self.window.offscreen_drawable() {
            Some(NativeDrawable::Window(native_window)) => manager
                .create_window_surface(native_window as *const c_void)
                .map(|egl_surface| (egl_surface, true)),
            Some(NativeDrawable::ProducerSurface(egl_surface)) => Ok((egl_surface, false)),
            None => manager
                .create_pbuffer_surface(&offscreen_size)
                .map(|egl_surface| (egl_surface, true)),
        };
        match offscreen {
            Ok((egl_surface, owns_egl_surface)) => {
                self.offscreen = Some(RenderSurface::new(
                    manager.egl_display,
                    egl_surface,
                    owns_egl_surface,
                    manager.resource_context(),
                    offscreen_size,
                    false,
                    DamageFunctions::none(),
                ));
                Ok(())
            }
            Err(_) => Err(Error::SurfaceInvalid),
        }
    }

    /// Resizes the native drawable, then rebuilds the on-screen surface only if the backend
    /// demands recreation. The off-screen resource surface is untouched in every path.
    pub fn resize(&mut self, manager: &ContextManager, size: Size2D<i32>) -> Result<(), Error> {
        if !self.window.resize(size) {
            return Err(Error::ResizeFailed);
        }

        if self.window.needs_surface_recreation_after_resize() {
            manager.clear_current()?;
            if let Some(mut onscreen) = self.onscreen.take() {
                onscreen.destroy();
            }
            self.onscreen = Some(self.create_onscreen(manager, size)?);
        } else if let Some(onscreen) = self.onscreen.as_mut() {
            onscreen.set_size(size);
        }
        Ok(())
    }

    /// Clears the current context and releases the on-screen surface. Idempotent; the native
    /// drawable must outlive the surface wrapping it, so this runs before the windowing layer
    /// tears the window down.
    pub fn destroy_onscreen(&mut self) {
        if let Some(mut onscreen) = self.onscreen.take() {
            let _ = unsafe { egl_context::make_no_context_current(onscreen.egl_display) };
            onscreen.destroy();
        }
    }

    /// Full teardown: the on-screen surface first, then the resource surface.
    pub fn destroy(&mut self) {
        self.destroy_onscreen();
        if let Some(mut offscreen) = self.offscreen.take() {
            offscreen.destroy();
        }
    }

    #[inline]
    pub fn onscreen_surface(&self) -> Option<&RenderSurface> {
        self.onscreen.as_ref()
    }

    #[inline]
    pub fn offscreen_surface(&self) -> Option<&RenderSurface> {
        self.offscreen.as_ref()
    }

    fn create_onscreen(
        &mut self,
        manager: &ContextManager,
        size: Size2D<i32>,
    ) -> Result<RenderSurface, Error> {
        let (egl_surface, owns_egl_surface) = match self.window.native_drawable() {
            NativeDrawable::Window(native_window) => (
                manager.create_window_surface(native_window as *const c_void)?,
                true,
            ),
            NativeDrawable::ProducerSurface(egl_surface) => (egl_surface, false),
        };
        Ok(RenderSurface::new(
            manager.egl_display,
            egl_surface,
            owns_egl_surface,
            manager.primary_context(),
            size,
            self.vsync_enabled,
            manager.damage_functions,
        ))
    }
}

/// The host-facing callback contract. The host calls into this crate through a narrow
/// synchronous boundary with no channel for structured errors, so every entry point reports
/// boolean success and logs the diagnostic.
impl SurfaceCoordinator {
    /// Binds the on-screen surface on the calling (raster) thread.
    pub fn make_current(&self) -> bool {
        match &self.onscreen {
            Some(onscreen) => report("make current", onscreen.make_current()),
            None => {
                error!("make current: no onscreen surface");
                false
            }
        }
    }

    /// Detaches whichever context is current on the calling thread. A no-op success when
    /// nothing is current.
    pub fn clear_current(&self) -> bool {
        match self.onscreen.as_ref().or(self.offscreen.as_ref()) {
            Some(surface) => report("clear current", unsafe {
                egl_context::make_no_context_current(surface.egl_display)
            }),
            None => true,
        }
    }

    /// Full-frame present of the on-screen surface.
    pub fn present(&mut self, _fbo_id: u32) -> bool {
        let swapped = match self.onscreen.as_mut() {
            Some(onscreen) => report("present", onscreen.swap_full()),
            None => {
                error!("present: no onscreen surface");
                false
            }
        };
        swapped && self.window.present_native_buffer()
    }

    /// Partial-repaint present of the on-screen surface.
    pub fn present_with_info(
        &mut self,
        frame_damage: &DamageRect,
        buffer_damage: &DamageRect,
        fbo_id: u32,
    ) -> bool {
        let swapped = match self.onscreen.as_mut() {
            Some(onscreen) => report(
                "present with damage",
                onscreen.swap_with_damage(frame_damage, buffer_damage, fbo_id),
            ),
            None => {
                error!("present with damage: no onscreen surface");
                false
            }
        };
        swapped && self.window.present_native_buffer()
    }

    /// Reports the stale region of the buffer about to back `fbo_id`; see
    /// [`RenderSurface::populate_existing_damage`].
    pub fn populate_existing_damage(&mut self, fbo_id: u32) -> DamageRect {
        match self.onscreen.as_mut() {
            Some(onscreen) => onscreen.populate_existing_damage(fbo_id),
            None => DamageRect::of_size(0, 0),
        }
    }

    /// The framebuffer the host should render into: always the window-system default.
    #[inline]
    pub fn framebuffer_id(&self) -> u32 {
        0
    }

    /// Generic GPU procedure lookup for the host's drawing-call table.
    #[inline]
    pub fn resolve_procedure(&self, symbol_name: &str) -> *const c_void {
        egl_context::get_proc_address(symbol_name)
    }

    /// Binds the off-screen resource surface. The one callback that may run on an upload
    /// thread distinct from the raster thread.
    pub fn make_resource_current(&self) -> bool {
        match &self.offscreen {
            Some(offscreen) => report("make resource current", offscreen.make_current()),
            None => {
                error!("make resource current: no offscreen surface");
                false
            }
        }
    }
}

impl Drop for SurfaceCoordinator {
    // Surfaces are released before the adapter so no GPU surface outlives its native
    // drawable. Hosts should still call `destroy_onscreen` from the raster thread first.
    fn drop(&mut self) {
        if let Some(mut onscreen) = self.onscreen.take() {
            onscreen.destroy();
        }
        if let Some(mut offscreen) = self.offscreen.take() {
            offscreen.destroy();
        }
    }
}

fn report(operation: &str, result: Result<(), Error>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            error!("{} failed: {:?}", operation, err);
            false
        }
    }
}
