// swapman/src/platform/wayland.rs
//
//! The Wayland window adapter.

use super::{NativeDrawable, NativeWindow};

use euclid::default::Size2D;
use std::os::raw::c_void;
use wayland_sys::egl::{wl_egl_window, WAYLAND_EGL_HANDLE};

/// Wraps a `wl_egl_window` created by the windowing layer.
///
/// Wayland resizes the EGL window in place, and the compositor performs the final present when
/// the swap commits a frame, so neither surface recreation nor an explicit flip is needed.
pub struct WaylandWindow {
    egl_window: *mut wl_egl_window,
}

impl WaylandWindow {
    /// The `wl_egl_window` must outlive this adapter.
    pub unsafe fn new(egl_window: *mut wl_egl_window) -> WaylandWindow {
        debug_assert!(!egl_window.is_null());
        WaylandWindow { egl_window }
    }
}

impl NativeWindow for WaylandWindow {
    fn native_drawable(&self) -> NativeDrawable {
        NativeDrawable::Window(self.egl_window as *mut c_void)
    }

    fn resize(&mut self, size: Size2D<i32>) -> bool {
        unsafe {
            (WAYLAND_EGL_HANDLE.wl_egl_window_resize)(
                self.egl_window,
                size.width,
                size.height,
                0,
                0,
            );
        }
        true
    }

    fn needs_surface_recreation_after_resize(&self) -> bool {
        false
    }
}
