// swapman/src/platform/egl/ffi.rs
//
//! FFI-related functionality for the damage and buffer-age EGL extensions.

use crate::egl;
use crate::egl::types::{EGLBoolean, EGLDisplay, EGLSurface, EGLint};

use std::ffi::CStr;

// EGL_EXT_buffer_age
pub(crate) const EGL_BUFFER_AGE_EXT: EGLint = 0x313d;

type SetDamageRegionFn =
    extern "C" fn(dpy: EGLDisplay, surface: EGLSurface, rects: *mut EGLint, n_rects: EGLint)
                  -> EGLBoolean;
type SwapBuffersWithDamageFn =
    extern "C" fn(dpy: EGLDisplay, surface: EGLSurface, rects: *mut EGLint, n_rects: EGLint)
                  -> EGLBoolean;

#[allow(non_snake_case)]
pub(crate) struct EGLExtensionFunctions {
    // EGL_KHR_partial_update
    pub(crate) SetDamageRegionKHR: Option<SetDamageRegionFn>,
    // EGL_KHR_swap_buffers_with_damage
    pub(crate) SwapBuffersWithDamageKHR: Option<SwapBuffersWithDamageFn>,
    // EGL_EXT_swap_buffers_with_damage
    pub(crate) SwapBuffersWithDamageEXT: Option<SwapBuffersWithDamageFn>,
}

lazy_static! {
    pub(crate) static ref EGL_EXTENSION_FUNCTIONS: EGLExtensionFunctions = {
        use crate::platform::egl::device::lookup_egl_extension as get;
        use std::mem::transmute as cast;
        unsafe {
            EGLExtensionFunctions {
                SetDamageRegionKHR: cast(get(b"eglSetDamageRegionKHR\0")),
                SwapBuffersWithDamageKHR: cast(get(b"eglSwapBuffersWithDamageKHR\0")),
                SwapBuffersWithDamageEXT: cast(get(b"eglSwapBuffersWithDamageEXT\0")),
            }
        }
    };
}

/// The optional damage entry points resolved for one display.
///
/// `eglGetProcAddress` may return a stub for an extension the display doesn't implement, so
/// availability is additionally gated on the display's extension string. A field left `None`
/// degrades the corresponding present path to a full-frame swap.
#[derive(Clone, Copy)]
pub(crate) struct DamageFunctions {
    pub(crate) set_damage_region: Option<SetDamageRegionFn>,
    pub(crate) swap_buffers_with_damage: Option<SwapBuffersWithDamageFn>,
}

impl DamageFunctions {
    pub(crate) fn resolve(egl_display: EGLDisplay) -> DamageFunctions {
        let set_damage_region = if display_supports(egl_display, "EGL_KHR_partial_update") {
            EGL_EXTENSION_FUNCTIONS.SetDamageRegionKHR
        } else {
            None
        };

        let swap_buffers_with_damage =
            if display_supports(egl_display, "EGL_KHR_swap_buffers_with_damage") {
                EGL_EXTENSION_FUNCTIONS.SwapBuffersWithDamageKHR
            } else if display_supports(egl_display, "EGL_EXT_swap_buffers_with_damage") {
                EGL_EXTENSION_FUNCTIONS.SwapBuffersWithDamageEXT
            } else {
                None
            };

        DamageFunctions {
            set_damage_region,
            swap_buffers_with_damage,
        }
    }

    pub(crate) fn none() -> DamageFunctions {
        DamageFunctions {
            set_damage_region: None,
            swap_buffers_with_damage: None,
        }
    }
}

fn display_supports(egl_display: EGLDisplay, extension: &str) -> bool {
    use crate::platform::egl::device::EGL_FUNCTIONS;
    EGL_FUNCTIONS.with(|egl| unsafe {
        let extensions = egl.QueryString(egl_display, egl::EXTENSIONS as EGLint);
        if extensions.is_null() {
            return false;
        }
        match CStr::from_ptr(extensions).to_str() {
            Ok(extensions) => extensions.split(' ').any(|name| name == extension),
            Err(_) => false,
        }
    })
}
