//! Library version queries

use std::ffi::c_char;

static VERSION_C: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Version packed as `major << 16 | minor << 8 | patch`
#[no_mangle]
pub extern "C" fn twine_version() -> u32 {
    (crate::VERSION_MAJOR << 16) | (crate::VERSION_MINOR << 8) | crate::VERSION_PATCH
}

#[no_mangle]
pub extern "C" fn twine_version_major() -> u32 {
    crate::VERSION_MAJOR
}

#[no_mangle]
pub extern "C" fn twine_version_minor() -> u32 {
    crate::VERSION_MINOR
}

#[no_mangle]
pub extern "C" fn twine_version_patch() -> u32 {
    crate::VERSION_PATCH
}

/// Static NUL-terminated version string; never freed
#[no_mangle]
pub extern "C" fn twine_version_string() -> *const c_char {
    VERSION_C.as_ptr() as *const c_char
}
