// swapman/src/platform/drm.rs
//
//! The DRM adapters: GBM buffer-object swap chains and output-stream devices.

use super::{NativeDrawable, NativeWindow};
use crate::egl::types::EGLSurface;

use euclid::default::Size2D;
use std::os::raw::c_void;

/// Wraps a `gbm_surface` swap chain created by the windowing layer.
///
/// GBM swap chains are allocated at a fixed size, so a resize means the windowing layer
/// rebuilds the `gbm_surface` and the on-screen GPU surface must be recreated on top of the
/// replacement. Scanout is driven from this side too: after each swap the windowing layer
/// locks the front buffer and queues the page flip.
pub struct GbmWindow {
    gbm_surface: *mut c_void,
    offscreen_surface: *mut c_void,
    resize: Box<dyn FnMut(Size2D<i32>) -> Option<*mut c_void>>,
    present: Box<dyn FnMut() -> bool>,
}

impl GbmWindow {
    /// Both GBM surfaces must outlive this adapter. `resize` rebuilds the swap chain and
    /// returns the replacement `gbm_surface`, or `None` on failure; `present` locks the front
    /// buffer and queues the page flip.
    pub unsafe fn new(
        gbm_surface: *mut c_void,
        offscreen_surface: *mut c_void,
        resize: Box<dyn FnMut(Size2D<i32>) -> Option<*mut c_void>>,
        present: Box<dyn FnMut() -> bool>,
    ) -> GbmWindow {
        debug_assert!(!gbm_surface.is_null());
        GbmWindow {
            gbm_surface,
            offscreen_surface,
            resize,
            present,
        }
    }
}

impl NativeWindow for GbmWindow {
    fn native_drawable(&self) -> NativeDrawable {
        NativeDrawable::Window(self.gbm_surface)
    }

    fn resize(&mut self, size: Size2D<i32>) -> bool {
        match (self.resize)(size) {
            Some(gbm_surface) => {
                self.gbm_surface = gbm_surface;
                true
            }
            None => false,
        }
    }

    fn needs_surface_recreation_after_resize(&self) -> bool {
        true
    }

    // GBM pixel formats can't back a pbuffer, so the windowing layer supplies a minimal
    // surface for the resource context instead.
    fn offscreen_drawable(&self) -> Option<NativeDrawable> {
        Some(NativeDrawable::Window(self.offscreen_surface))
    }

    fn present_native_buffer(&mut self) -> bool {
        (self.present)()
    }
}

/// Wraps a stream producer surface bound to a DRM output layer.
///
/// The EGL surface is created by the windowing layer against the output stream and adopted
/// here; the consumer side of the stream scans out each frame as the swap commits it, and the
/// stream resizes in place.
pub struct OutputStreamWindow {
    producer_surface: EGLSurface,
    resize: Box<dyn FnMut(Size2D<i32>) -> bool>,
}

impl OutputStreamWindow {
    /// The producer surface stays owned by the windowing layer; `resize` adjusts the stream's
    /// output size in place.
    pub unsafe fn new(
        producer_surface: EGLSurface,
        resize: Box<dyn FnMut(Size2D<i32>) -> bool>,
    ) -> OutputStreamWindow {
        OutputStreamWindow {
            producer_surface,
            resize,
        }
    }
}

impl NativeWindow for OutputStreamWindow {
    fn native_drawable(&self) -> NativeDrawable {
        NativeDrawable::ProducerSurface(self.producer_surface)
    }

    fn resize(&mut self, size: Size2D<i32>) -> bool {
        (self.resize)(size)
    }

    fn needs_surface_recreation_after_resize(&self) -> bool {
        false
    }
}
