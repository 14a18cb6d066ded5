// swapman/src/platform/egl/device.rs
//
//! Loading of the EGL entry points.

use crate::egl::Egl;

use libc::{dlopen, dlsym, RTLD_LAZY};
use std::ffi::CString;
use std::os::raw::{c_char, c_void};

thread_local! {
    pub static EGL_FUNCTIONS: Egl = Egl::load_with(get_proc_address);
}

lazy_static! {
    static ref EGL_LIBRARY: usize = {
        unsafe {
            let mut library = dlopen(&b"libEGL.so.1\0"[0] as *const u8 as *const c_char, RTLD_LAZY);
            if library.is_null() {
                library = dlopen(&b"libEGL.so\0"[0] as *const u8 as *const c_char, RTLD_LAZY);
            }
            library as usize
        }
    };
}

fn get_proc_address(symbol_name: &str) -> *const c_void {
    unsafe {
        let symbol_name: CString = CString::new(symbol_name).unwrap();
        let symbol_ptr = symbol_name.as_ptr() as *const u8 as *const c_char;
        dlsym(*EGL_LIBRARY as *mut c_void, symbol_ptr) as *const c_void
    }
}

pub(crate) unsafe fn lookup_egl_extension(name: &'static [u8]) -> *const c_void {
    EGL_FUNCTIONS.with(|egl| {
        egl.GetProcAddress(&name[0] as *const u8 as *const c_char) as *const c_void
    })
}
