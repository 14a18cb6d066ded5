// swapman/src/platform/x11.rs
//
//! The X11 window adapter.

use super::{NativeDrawable, NativeWindow};

use euclid::default::Size2D;
use std::os::raw::c_void;
use x11_dl::xlib::Window;

/// Wraps an X11 window created by the windowing layer.
///
/// The X server resizes the window drawable itself when the window geometry changes, so resize
/// is a success no-op here and the EGL surface tracks the drawable without recreation.
pub struct X11Window {
    window: Window,
}

impl X11Window {
    pub fn new(window: Window) -> X11Window {
        X11Window { window }
    }
}

impl NativeWindow for X11Window {
    fn native_drawable(&self) -> NativeDrawable {
        NativeDrawable::Window(self.window as *mut c_void)
    }

    fn resize(&mut self, _: Size2D<i32>) -> bool {
        true
    }

    fn needs_surface_recreation_after_resize(&self) -> bool {
        false
    }
}
