// swapman/src/platform/mod.rs
//
//! The native windowing collaborator interface and the per-backend adapters.

pub(crate) mod egl;

pub mod drm;
#[cfg(linux)]
pub mod wayland;
#[cfg(x11)]
pub mod x11;

use crate::egl::types::EGLSurface;

use euclid::default::Size2D;
use std::os::raw::c_void;

/// A drawable handle owned by the windowing layer and borrowed by a render surface.
#[derive(Clone, Copy, Debug)]
pub enum NativeDrawable {
    /// A native window handle suitable for `eglCreateWindowSurface`: a `wl_egl_window`, an X11
    /// window, or a `gbm_surface`.
    Window(*mut c_void),
    /// An EGL surface the windowing layer already created, e.g. a stream producer surface
    /// bound to a DRM output layer. Adopted as-is and never destroyed by this crate.
    ProducerSurface(EGLSurface),
}

/// What the windowing layer supplies for one native window.
///
/// One implementation per backend, selected when the [`SurfaceCoordinator`] is built; the
/// coordinator invokes these on the host's raster thread. Window creation, event dispatch, and
/// mode-setting stay on the windowing layer's side of this interface.
///
/// [`SurfaceCoordinator`]: crate::SurfaceCoordinator
pub trait NativeWindow {
    /// The drawable the on-screen render surface wraps.
    fn native_drawable(&self) -> NativeDrawable;

    /// Resizes the native drawable. Backends with an in-place resize perform it here; backends
    /// whose swap chain must be rebuilt return the replacement drawable through
    /// [`NativeWindow::native_drawable`] afterwards.
    fn resize(&mut self, size: Size2D<i32>) -> bool;

    /// Whether the on-screen GPU surface wrapping this drawable must be destroyed and
    /// recreated after [`NativeWindow::resize`].
    fn needs_surface_recreation_after_resize(&self) -> bool;

    /// A minimal drawable for the off-screen resource surface, on backends whose pixel formats
    /// can't back a pixel-buffer surface. `None` selects a pixel buffer.
    fn offscreen_drawable(&self) -> Option<NativeDrawable> {
        None
    }

    /// Performs the scanout flip on backends that own their swap chain. Invoked after every
    /// successful swap; the default is a no-op success for backends whose compositor presents.
    fn present_native_buffer(&mut self) -> bool {
        true
    }
}
