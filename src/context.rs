// swapman/src/context.rs
//
//! Pixel-format attributes and the manager that owns the onscreen/resource context pair.

use crate::egl;
use crate::egl::types::{EGLConfig, EGLContext, EGLDisplay, EGLSurface};
use crate::error::Error;
use crate::platform::egl::context;
use crate::platform::egl::device::EGL_FUNCTIONS;
use crate::platform::egl::ffi::DamageFunctions;

use euclid::default::Size2D;
use std::os::raw::c_void;
use std::thread;

/// The OpenGL ES version a context is created for. Only the major version is significant to
/// EGL context creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GLVersion {
    pub major: u8,
    pub minor: u8,
}

impl GLVersion {
    #[inline]
    pub fn new(major: u8, minor: u8) -> GLVersion {
        GLVersion { major, minor }
    }
}

bitflags! {
    /// Requested optional channels of the pixel format.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ContextAttributeFlags: u8 {
        const ALPHA   = 0x01;
        const DEPTH   = 0x02;
        const STENCIL = 0x04;
    }
}

bitflags! {
    /// The kinds of drawables the chosen pixel format must be able to back.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct SurfaceTypeFlags: u8 {
        const WINDOW  = 0x01;
        const PBUFFER = 0x02;
    }
}

/// The requested pixel-format and context-version bits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextAttributes {
    pub version: GLVersion,
    pub flags: ContextAttributeFlags,
    pub surface_types: SurfaceTypeFlags,
}

impl Default for ContextAttributes {
    fn default() -> ContextAttributes {
        ContextAttributes {
            version: GLVersion::new(2, 0),
            flags: ContextAttributeFlags::ALPHA,
            surface_types: SurfaceTypeFlags::WINDOW | SurfaceTypeFlags::PBUFFER,
        }
    }
}

/// Owns one pixel-format configuration and the two GPU contexts every render surface binds to.
///
/// The *primary* context drives the on-screen surface; the *resource* context is created with
/// the primary as its sharing parent, so buffers, textures, and programs created on either are
/// visible to both. Both contexts live exactly as long as the manager; destroy it explicitly
/// with [`ContextManager::destroy`].
pub struct ContextManager {
    pub(crate) egl_display: EGLDisplay,
    pub(crate) egl_config: EGLConfig,
    primary_context: EGLContext,
    resource_context: EGLContext,
    pub(crate) damage_functions: DamageFunctions,
}

unsafe impl Send for ContextManager {}

impl ContextManager {
    /// Selects a pixel format matching `attributes` on the given native display and creates the
    /// primary/resource context pair.
    ///
    /// The optional damage extensions are resolved here as well; their absence is not an error,
    /// it only degrades presentation to full-frame swaps.
    pub fn new(
        attributes: &ContextAttributes,
        native_display: *const c_void,
    ) -> Result<ContextManager, Error> {
        unsafe {
            let egl_display = EGL_FUNCTIONS.with(|egl| {
                let egl_display = egl.GetDisplay(native_display);
                if egl_display == egl::NO_DISPLAY {
                    return Err(Error::ConfigUnavailable);
                }
                let (mut major, mut minor) = (0, 0);
                if egl.Initialize(egl_display, &mut major, &mut minor) == egl::FALSE {
                    return Err(Error::ConfigUnavailable);
                }
                egl.BindAPI(egl::OPENGL_ES_API);
                Ok(egl_display)
            })?;

            let egl_config = context::choose_config(egl_display, attributes)?;

            let primary_context =
                context::create_context(egl_display, egl_config, attributes, egl::NO_CONTEXT)?;
            let resource_context =
                match context::create_context(egl_display, egl_config, attributes, primary_context)
                {
                    Ok(resource_context) => resource_context,
                    Err(err) => {
                        EGL_FUNCTIONS.with(|egl| {
                            egl.DestroyContext(egl_display, primary_context);
                        });
                        return Err(err);
                    }
                };

            let damage_functions = DamageFunctions::resolve(egl_display);

            Ok(ContextManager {
                egl_display,
                egl_config,
                primary_context,
                resource_context,
                damage_functions,
            })
        }
    }

    #[inline]
    pub(crate) fn primary_context(&self) -> EGLContext {
        self.primary_context
    }

    #[inline]
    pub(crate) fn resource_context(&self) -> EGLContext {
        self.resource_context
    }

    /// Looks up a generic GPU procedure address for the host's own drawing-call table.
    ///
    /// Pure passthrough to `eglGetProcAddress`; returns null when the symbol is unknown.
    #[inline]
    pub fn resolve_procedure(&self, symbol_name: &str) -> *const c_void {
        context::get_proc_address(symbol_name)
    }

    /// Detaches whichever context is current on the calling thread. A no-op success when
    /// nothing is current.
    pub fn clear_current(&self) -> Result<(), Error> {
        unsafe { context::make_no_context_current(self.egl_display) }
    }

    pub(crate) fn create_window_surface(
        &self,
        native_window: *const c_void,
    ) -> Result<EGLSurface, Error> {
        unsafe { context::create_window_surface(self.egl_display, self.egl_config, native_window) }
    }

    pub(crate) fn create_pbuffer_surface(&self, size: &Size2D<i32>) -> Result<EGLSurface, Error> {
        unsafe { context::create_pbuffer_surface(self.egl_display, self.egl_config, size) }
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.primary_context == egl::NO_CONTEXT
    }

    /// A manager carrying no live GPU objects, for exercising coordinator policy.
    #[cfg(test)]
    pub(crate) fn stub() -> ContextManager {
        ContextManager {
            egl_display: egl::NO_DISPLAY,
            egl_config: std::ptr::null(),
            primary_context: egl::NO_CONTEXT,
            resource_context: egl::NO_CONTEXT,
            damage_functions: DamageFunctions::none(),
        }
    }

    /// Destroys both contexts and terminates the display connection. Surfaces created through
    /// this manager must be destroyed first.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        EGL_FUNCTIONS.with(|egl| unsafe {
            egl.MakeCurrent(
                self.egl_display,
                egl::NO_SURFACE,
                egl::NO_SURFACE,
                egl::NO_CONTEXT,
            );
            egl.DestroyContext(self.egl_display, self.resource_context);
            egl.DestroyContext(self.egl_display, self.primary_context);
            egl.Terminate(self.egl_display);
        });
        self.primary_context = egl::NO_CONTEXT;
        self.resource_context = egl::NO_CONTEXT;
        self.egl_display = egl::NO_DISPLAY;
    }
}

impl Drop for ContextManager {
    fn drop(&mut self) {
        if !self.is_destroyed() && !thread::panicking() {
            panic!("Context managers must be destroyed explicitly with `destroy`!")
        }
    }
}
