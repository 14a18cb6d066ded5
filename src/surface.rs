// swapman/src/surface.rs
//
//! A render surface: one native drawable bound to one GPU context.

use crate::damage::{DamageHistory, DamageRect, ExistingDamage, FALLBACK_BUFFER_AGE};
use crate::egl;
use crate::egl::types::{EGLContext, EGLDisplay, EGLSurface, EGLint};
use crate::error::Error;
use crate::platform::egl::device::EGL_FUNCTIONS;
use crate::platform::egl::error::ToWindowingApiError;
use crate::platform::egl::ffi::{DamageFunctions, EGL_BUFFER_AGE_EXT};

use euclid::default::Size2D;
use log::warn;
use std::fmt::{self, Debug, Formatter};
use std::thread;

/// One native drawable bound to one GPU context, together with the damage bookkeeping for
/// partial repaint of that drawable.
///
/// At most one surface may be current per OS thread. The on-screen surface and the off-screen
/// resource surface wrap *different* contexts, which is what lets the host keep them current on
/// two threads at once; all damage-related operations belong to the on-screen surface and to
/// the host's raster thread only.
///
/// Surfaces must be destroyed explicitly, or a panic occurs on drop.
pub struct RenderSurface {
    pub(crate) egl_display: EGLDisplay,
    pub(crate) egl_surface: EGLSurface,
    pub(crate) egl_context: EGLContext,
    /// Adopted drawables (e.g. stream producer surfaces) stay owned by the windowing layer.
    owns_egl_surface: bool,
    size: Size2D<i32>,
    vsync_enabled: bool,
    damage_functions: DamageFunctions,
    damage_history: DamageHistory,
    existing_damage: ExistingDamage,
    destroyed: bool,
}

unsafe impl Send for RenderSurface {}

impl Debug for RenderSurface {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "RenderSurface({:x})", self.egl_surface as usize)
    }
}

impl RenderSurface {
    pub(crate) fn new(
        egl_display: EGLDisplay,
        egl_surface: EGLSurface,
        owns_egl_surface: bool,
        egl_context: EGLContext,
        size: Size2D<i32>,
        vsync_enabled: bool,
        damage_functions: DamageFunctions,
    ) -> RenderSurface {
        RenderSurface {
            egl_display,
            egl_surface,
            egl_context,
            owns_egl_surface,
            size,
            vsync_enabled,
            damage_functions,
            damage_history: DamageHistory::new(),
            existing_damage: ExistingDamage::new(),
            destroyed: false,
        }
    }

    /// A surface is valid only while its native drawable and its context are both live.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.destroyed
            && self.egl_surface != egl::NO_SURFACE
            && self.egl_context != egl::NO_CONTEXT
    }

    #[inline]
    pub fn size(&self) -> Size2D<i32> {
        self.size
    }

    #[inline]
    pub(crate) fn set_size(&mut self, size: Size2D<i32>) {
        self.size = size;
    }

    /// The framebuffer the host should render into: always the window-system-provided default.
    #[inline]
    pub fn framebuffer_id(&self) -> u32 {
        0
    }

    /// Binds this surface (draw and read) and its context on the calling thread.
    ///
    /// The swap-interval policy is re-applied on every successful bind, not once at creation,
    /// because some drivers reset the interval whenever a context is rebound to a surface.
    pub fn make_current(&self) -> Result<(), Error> {
        if !self.is_valid() {
            return Err(Error::SurfaceInvalid);
        }
        EGL_FUNCTIONS.with(|egl| unsafe {
            let result = egl.MakeCurrent(
                self.egl_display,
                self.egl_surface,
                self.egl_surface,
                self.egl_context,
            );
            if result == egl::FALSE {
                let err = egl.GetError().to_windowing_api_error();
                return Err(Error::BindFailed(err));
            }

            let interval = if self.vsync_enabled { 1 } else { 0 };
            if egl.SwapInterval(self.egl_display, interval) == egl::FALSE {
                warn!("swap interval {} not applied to surface {:?}", interval, self);
            }
            Ok(())
        })
    }

    /// Full-frame present. Always correct, and the fallback for every partial path.
    pub fn swap_full(&mut self) -> Result<(), Error> {
        if !self.is_valid() {
            return Err(Error::SurfaceInvalid);
        }
        EGL_FUNCTIONS.with(|egl| unsafe {
            if egl.SwapBuffers(self.egl_display, self.egl_surface) == egl::FALSE {
                let err = egl.GetError().to_windowing_api_error();
                return Err(Error::SwapFailed(err));
            }
            Ok(())
        })
    }

    /// Partial-frame present.
    ///
    /// `frame_damage` is what changed relative to the previous frame; `buffer_damage` is what
    /// must be redrawn into the reused buffer about to back `fbo_id`. The host calls this
    /// before issuing its drawing commands for the frame, so the buffer's damage region can be
    /// restricted up front where the driver supports it.
    ///
    /// Absence of either damage extension is not an error; the swap silently falls back to a
    /// full-frame present. Only a failing swap primitive fails the call.
    pub fn swap_with_damage(
        &mut self,
        frame_damage: &DamageRect,
        buffer_damage: &DamageRect,
        fbo_id: u32,
    ) -> Result<(), Error> {
        if !self.is_valid() {
            return Err(Error::SurfaceInvalid);
        }

        // A new frame targeting this framebuffer invalidates the existing-damage result
        // previously handed out for it.
        self.existing_damage.release(fbo_id);

        if let Some(set_damage_region) = self.damage_functions.set_damage_region {
            let mut rect = buffer_damage.to_native(self.current_height());
            let result =
                set_damage_region(self.egl_display, self.egl_surface, rect.as_mut_ptr(), 1);
            if result == egl::FALSE {
                // Degrades to a larger repaint, not a dropped frame.
                warn!("damage region not applied to surface {:?}", self);
            }
        }

        self.damage_history.push(*frame_damage);

        match self.damage_functions.swap_buffers_with_damage {
            Some(swap_buffers_with_damage) => {
                let mut rect = frame_damage.to_native(self.current_height());
                let result = swap_buffers_with_damage(
                    self.egl_display,
                    self.egl_surface,
                    rect.as_mut_ptr(),
                    1,
                );
                if result == egl::FALSE {
                    let err = EGL_FUNCTIONS
                        .with(|egl| unsafe { egl.GetError() })
                        .to_windowing_api_error();
                    return Err(Error::SwapFailed(err));
                }
                Ok(())
            }
            None => self.swap_full(),
        }
    }

    /// Reports which pixels of the buffer about to back `fbo_id` may still hold stale content,
    /// reconstructed from the driver-reported buffer age and the recorded damage history.
    ///
    /// The result is also retained, one entry per framebuffer id, until that id is queried or
    /// presented again.
    pub fn populate_existing_damage(&mut self, fbo_id: u32) -> DamageRect {
        let age = self.buffer_age();
        let full_surface = DamageRect::of_size(self.size.width, self.size.height);
        let damage = self.damage_history.existing_damage_for_age(age, full_surface);
        self.existing_damage.record(fbo_id, damage);
        damage
    }

    fn buffer_age(&self) -> u32 {
        EGL_FUNCTIONS.with(|egl| unsafe {
            let mut age = 0;
            let result = egl.QuerySurface(
                self.egl_display,
                self.egl_surface,
                EGL_BUFFER_AGE_EXT,
                &mut age,
            );
            if result == egl::FALSE || age <= 0 {
                FALLBACK_BUFFER_AGE
            } else {
                age as u32
            }
        })
    }

    /// The native swap APIs take bottom-left-origin rectangles, so coordinate conversion needs
    /// the height the platform believes the surface has *right now*, never a cached value.
    fn current_height(&self) -> i32 {
        EGL_FUNCTIONS.with(|egl| unsafe {
            let mut height = 0;
            let result = egl.QuerySurface(
                self.egl_display,
                self.egl_surface,
                egl::HEIGHT as EGLint,
                &mut height,
            );
            if result == egl::FALSE {
                self.size.height
            } else {
                height
            }
        })
    }

    pub(crate) fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if self.owns_egl_surface && self.egl_surface != egl::NO_SURFACE {
            EGL_FUNCTIONS.with(|egl| unsafe {
                egl.DestroySurface(self.egl_display, self.egl_surface);
            });
        }
        self.egl_surface = egl::NO_SURFACE;
        self.destroyed = true;
    }
}

impl Drop for RenderSurface {
    fn drop(&mut self) {
        if !self.destroyed && !thread::panicking() {
            panic!("Render surfaces must be destroyed explicitly with `destroy`!")
        }
    }
}
