// swapman/src/error.rs
//
//! Various errors that methods can produce.

/// Various errors that methods can produce.
#[derive(Debug)]
pub enum Error {
    /// No pixel-format configuration matched the requested color, alpha, depth, stencil, and
    /// surface-type bits.
    ConfigUnavailable,
    /// The system couldn't create one of the two GPU contexts.
    ContextCreationFailed(WindowingApiError),
    /// The system couldn't make a surface and its context current on the calling thread.
    BindFailed(WindowingApiError),
    /// A render surface couldn't be created, or an operation was attempted on a surface whose
    /// native drawable or context is no longer valid.
    SurfaceInvalid,
    /// The native windowing collaborator failed to resize its drawable.
    ResizeFailed,
    /// The swap primitive itself failed. The frame is considered dropped.
    SwapFailed(WindowingApiError),
}

/// Abstraction of the errors that EGL returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowingApiError {
    /// Miscellaneous error.
    Failed,
    /// EGL is not initialized, or could not be initialized, for the
    /// specified EGL display connection.
    NotInitialized,
    /// EGL cannot access a requested resource (for example a context is
    /// bound in another thread).
    BadAccess,
    /// EGL failed to allocate resources for the requested operation.
    BadAlloc,
    /// An unrecognized attribute or attribute value was passed in the
    /// attribute list.
    BadAttribute,
    /// The EGL configuration is unsupported.
    BadConfig,
    /// An EGLContext argument does not name a valid EGL rendering context.
    BadContext,
    /// The current surface of the calling thread is a window, pixel
    /// buffer or pixmap that is no longer valid.
    BadCurrentSurface,
    /// An EGLDisplay argument does not name a valid EGL display connection.
    BadDisplay,
    /// An EGLSurface argument does not name a valid surface (window,
    /// pixel buffer or pixmap) configured for GL rendering.
    BadSurface,
    /// Arguments are inconsistent (for example, a valid context requires
    /// buffers not supplied by a valid surface).
    BadMatch,
    /// One or more argument values are invalid.
    BadParameter,
    /// A NativePixmapType argument does not refer to a valid native
    /// pixmap.
    BadNativePixmap,
    /// A NativeWindowType argument does not refer to a valid native
    /// window.
    BadNativeWindow,
    /// A power management event has occurred. The application must
    /// destroy all contexts and reinitialise OpenGL ES state and objects to
    /// continue rendering.
    ContextLost,
}
