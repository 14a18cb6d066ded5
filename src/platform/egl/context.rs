// swapman/src/platform/egl/context.rs
//
//! Pixel-format selection and low-level context and surface creation over EGL.

use super::device::EGL_FUNCTIONS;
use super::error::ToWindowingApiError;
use crate::context::{ContextAttributeFlags, ContextAttributes, SurfaceTypeFlags};
use crate::egl;
use crate::egl::types::{EGLConfig, EGLContext, EGLDisplay, EGLSurface, EGLint};
use crate::error::Error;

use euclid::default::Size2D;
use std::ffi::CString;
use std::os::raw::{c_char, c_void};
use std::ptr;

const RGB_CHANNEL_BIT_DEPTH: EGLint = 8;

/// The attribute pairs whose values `eglChooseConfig` treats as minimums but which the chosen
/// config must satisfy exactly, followed by the full request list.
pub(crate) fn config_attributes(attributes: &ContextAttributes) -> ([EGLint; 8], Vec<EGLint>) {
    let flags = attributes.flags;
    let alpha_size = if flags.contains(ContextAttributeFlags::ALPHA) { 8 } else { 0 };
    let depth_size = if flags.contains(ContextAttributeFlags::DEPTH) { 24 } else { 0 };
    let stencil_size = if flags.contains(ContextAttributeFlags::STENCIL) { 8 } else { 0 };

    let mut surface_type = 0;
    if attributes.surface_types.contains(SurfaceTypeFlags::WINDOW) {
        surface_type |= egl::WINDOW_BIT as EGLint;
    }
    if attributes.surface_types.contains(SurfaceTypeFlags::PBUFFER) {
        surface_type |= egl::PBUFFER_BIT as EGLint;
    }

    let renderable_type = if attributes.version.major >= 3 {
        egl::OPENGL_ES3_BIT as EGLint
    } else {
        egl::OPENGL_ES2_BIT as EGLint
    };

    let required_config_attributes = [
        egl::RED_SIZE as EGLint,    RGB_CHANNEL_BIT_DEPTH,
        egl::GREEN_SIZE as EGLint,  RGB_CHANNEL_BIT_DEPTH,
        egl::BLUE_SIZE as EGLint,   RGB_CHANNEL_BIT_DEPTH,
        egl::ALPHA_SIZE as EGLint,  alpha_size,
    ];

    let mut requested_config_attributes = required_config_attributes.to_vec();
    requested_config_attributes.extend_from_slice(&[
        egl::DEPTH_SIZE as EGLint,      depth_size,
        egl::STENCIL_SIZE as EGLint,    stencil_size,
        egl::SURFACE_TYPE as EGLint,    surface_type,
        egl::RENDERABLE_TYPE as EGLint, renderable_type,
        egl::NONE as EGLint, 0,
        0, 0,
    ]);

    (required_config_attributes, requested_config_attributes)
}

pub(crate) unsafe fn choose_config(
    egl_display: EGLDisplay,
    attributes: &ContextAttributes,
) -> Result<EGLConfig, Error> {
    let (required_config_attributes, requested_config_attributes) =
        config_attributes(attributes);

    EGL_FUNCTIONS.with(|egl| {
        // See how many applicable configs there are.
        let mut config_count = 0;
        let result = egl.ChooseConfig(
            egl_display,
            requested_config_attributes.as_ptr(),
            ptr::null_mut(),
            0,
            &mut config_count,
        );
        if result == egl::FALSE || config_count == 0 {
            return Err(Error::ConfigUnavailable);
        }

        // Enumerate all those configs.
        let mut configs = vec![ptr::null(); config_count as usize];
        let mut real_config_count = config_count;
        let result = egl.ChooseConfig(
            egl_display,
            requested_config_attributes.as_ptr(),
            configs.as_mut_ptr(),
            config_count,
            &mut real_config_count,
        );
        if result == egl::FALSE {
            return Err(Error::ConfigUnavailable);
        }
        configs.truncate(real_config_count as usize);

        // Keep only configs whose channel sizes match exactly.
        configs
            .into_iter()
            .find(|&egl_config| {
                required_config_attributes.chunks(2).all(|pair| {
                    get_config_attr(egl_display, egl_config, pair[0]) == pair[1]
                })
            })
            .ok_or(Error::ConfigUnavailable)
    })
}

pub(crate) unsafe fn create_context(
    egl_display: EGLDisplay,
    egl_config: EGLConfig,
    attributes: &ContextAttributes,
    share_context: EGLContext,
) -> Result<EGLContext, Error> {
    // Include some extra zeroes to work around broken implementations.
    let egl_context_attributes = [
        egl::CONTEXT_CLIENT_VERSION as EGLint, attributes.version.major as EGLint,
        egl::NONE as EGLint, 0,
        0, 0,
    ];

    EGL_FUNCTIONS.with(|egl| {
        let egl_context = egl.CreateContext(
            egl_display,
            egl_config,
            share_context,
            egl_context_attributes.as_ptr(),
        );
        if egl_context == egl::NO_CONTEXT {
            let err = egl.GetError().to_windowing_api_error();
            return Err(Error::ContextCreationFailed(err));
        }
        Ok(egl_context)
    })
}

pub(crate) unsafe fn create_window_surface(
    egl_display: EGLDisplay,
    egl_config: EGLConfig,
    native_window: *const c_void,
) -> Result<EGLSurface, Error> {
    EGL_FUNCTIONS.with(|egl| {
        let egl_surface =
            egl.CreateWindowSurface(egl_display, egl_config, native_window, ptr::null());
        if egl_surface == egl::NO_SURFACE {
            return Err(Error::SurfaceInvalid);
        }
        Ok(egl_surface)
    })
}

pub(crate) unsafe fn create_pbuffer_surface(
    egl_display: EGLDisplay,
    egl_config: EGLConfig,
    size: &Size2D<i32>,
) -> Result<EGLSurface, Error> {
    let pbuffer_attributes = [
        egl::WIDTH as EGLint,   size.width,
        egl::HEIGHT as EGLint,  size.height,
        egl::NONE as EGLint,    0,
        0,                      0,
    ];

    EGL_FUNCTIONS.with(|egl| {
        let pbuffer =
            egl.CreatePbufferSurface(egl_display, egl_config, pbuffer_attributes.as_ptr());
        if pbuffer == egl::NO_SURFACE {
            return Err(Error::SurfaceInvalid);
        }
        Ok(pbuffer)
    })
}

pub(crate) unsafe fn make_no_context_current(egl_display: EGLDisplay) -> Result<(), Error> {
    EGL_FUNCTIONS.with(|egl| {
        let result = egl.MakeCurrent(
            egl_display,
            egl::NO_SURFACE,
            egl::NO_SURFACE,
            egl::NO_CONTEXT,
        );
        if result == egl::FALSE {
            let err = egl.GetError().to_windowing_api_error();
            return Err(Error::BindFailed(err));
        }
        Ok(())
    })
}

pub(crate) unsafe fn get_config_attr(
    egl_display: EGLDisplay,
    egl_config: EGLConfig,
    attr: EGLint,
) -> EGLint {
    EGL_FUNCTIONS.with(|egl| {
        let mut value = 0;
        let result = egl.GetConfigAttrib(egl_display, egl_config, attr, &mut value);
        debug_assert_ne!(result, egl::FALSE);
        value
    })
}

pub(crate) fn get_proc_address(symbol_name: &str) -> *const c_void {
    EGL_FUNCTIONS.with(|egl| unsafe {
        let symbol_name: CString = CString::new(symbol_name).unwrap();
        egl.GetProcAddress(symbol_name.as_ptr() as *const u8 as *const c_char) as *const c_void
    })
}
