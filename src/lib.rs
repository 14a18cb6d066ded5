//! Render-surface lifecycle management for embedders driving EGL.
//!
//! A host rendering engine that owns its own frame scheduling and drawing commands still needs
//! someone to pick a pixel format, stand up a pair of sharing GPU contexts, hand out drawables,
//! execute swaps, and account for stale pixels when the host repaints incrementally. This crate
//! does exactly that, and nothing else: window creation, input, and mode-setting belong to the
//! windowing layer, which participates only through the [`NativeWindow`] trait.
//!
//! The supported backends are DRM-GBM, DRM output-stream devices, Wayland, and X11, all driven
//! through EGL.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;

pub mod error;
pub use crate::error::{Error, WindowingApiError};

pub mod context;
pub use crate::context::{ContextAttributeFlags, ContextAttributes, ContextManager};
pub use crate::context::{GLVersion, SurfaceTypeFlags};

pub mod damage;
pub use crate::damage::DamageRect;

pub mod surface;
pub use crate::surface::RenderSurface;

pub mod coordinator;
pub use crate::coordinator::SurfaceCoordinator;

pub mod platform;
pub use crate::platform::{NativeDrawable, NativeWindow};

#[allow(non_camel_case_types)]
mod egl {
    use std::os::raw::{c_long, c_void};
    pub type khronos_utime_nanoseconds_t = khronos_uint64_t;
    pub type khronos_uint64_t = u64;
    pub type khronos_ssize_t = c_long;
    pub type EGLint = i32;
    pub type EGLNativeDisplayType = *const c_void;
    pub type EGLNativePixmapType = *const c_void;
    pub type EGLNativeWindowType = *const c_void;
    pub type NativeDisplayType = EGLNativeDisplayType;
    pub type NativePixmapType = EGLNativePixmapType;
    pub type NativeWindowType = EGLNativeWindowType;
    include!(concat!(env!("OUT_DIR"), "/egl_bindings.rs"));
}

#[cfg(test)]
mod tests;
