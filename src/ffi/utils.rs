//! FFI utilities and handle resolution

use std::ffi::{c_char, CStr};

use log::warn;

use crate::registry::{global, Registry, StringHandle};

use super::types::{TwineErrorCode, TwineHandle};

/// Bytes of a NUL-terminated C string, `None` for a null pointer
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for `'a`.
pub(crate) unsafe fn c_str_bytes<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_bytes())
}

/// Look up the global registry and decode a raw handle against it
pub(crate) fn resolve(raw: TwineHandle) -> Result<(&'static Registry, StringHandle), TwineErrorCode> {
    let registry = global().map_err(TwineErrorCode::from)?;
    match registry.handle_from_raw(raw) {
        Some(handle) => Ok((registry, handle)),
        None => {
            warn!("C API call with null string handle");
            Err(TwineErrorCode::InvalidHandle)
        }
    }
}

/// Report a failed call at the C boundary and convert it to a code
pub(crate) fn report(function: &str, error: crate::error::TwineError) -> TwineErrorCode {
    warn!("{} failed: {}", function, error);
    error.into()
}
