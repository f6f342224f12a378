//! FFI functions for string management
//!
//! Every function works on the process-wide registry. Handles are the raw
//! form of [`StringHandle`]; 0 is returned where no string could be made.

use std::ffi::c_char;

use crate::{
    config::NOT_FOUND,
    error::Result,
    registry::{global, Registry, StringHandle},
};

use super::{types::*, utils::*};

/// Run `f` against a live handle, logging and converting failures
fn with_handle<T>(
    function: &str,
    raw: TwineHandle,
    f: impl FnOnce(&Registry, StringHandle) -> Result<T>,
) -> std::result::Result<T, TwineErrorCode> {
    let (registry, handle) = resolve(raw)?;
    f(registry, handle).map_err(|e| report(function, e))
}

fn to_code(result: std::result::Result<(), TwineErrorCode>) -> TwineErrorCode {
    match result {
        Ok(()) => TwineErrorCode::Success,
        Err(code) => code,
    }
}

fn to_raw_handle(result: std::result::Result<Option<StringHandle>, TwineErrorCode>) -> TwineHandle {
    match result {
        Ok(Some(handle)) => handle.to_raw(),
        _ => 0,
    }
}

fn construct(bytes: Option<&[u8]>) -> TwineHandle {
    match global().and_then(|registry| registry.construct(bytes)) {
        Ok(handle) => handle.to_raw(),
        Err(e) => {
            report("twine_new", e);
            0
        }
    }
}

/// Initialize logging and the process-wide registry
#[no_mangle]
pub extern "C" fn twine_init() -> TwineErrorCode {
    let _ = env_logger::try_init();
    match global() {
        Ok(_) => TwineErrorCode::Success,
        Err(e) => e.into(),
    }
}

/// Create a string from a NUL-terminated C string (NULL for empty)
#[no_mangle]
pub extern "C" fn twine_new(init: *const c_char) -> TwineHandle {
    let bytes = unsafe { c_str_bytes(init) };
    construct(bytes)
}

/// Create a string from `len` bytes, which may include NUL bytes
#[no_mangle]
pub extern "C" fn twine_new_bytes(data: *const u8, len: usize) -> TwineHandle {
    if data.is_null() {
        return if len == 0 { construct(None) } else { 0 };
    }

    let bytes = unsafe { std::slice::from_raw_parts(data, len) };
    construct(Some(bytes))
}

/// Destroy one string
#[no_mangle]
pub extern "C" fn twine_delete(handle: TwineHandle) -> TwineErrorCode {
    to_code(with_handle("twine_delete", handle, Registry::destroy))
}

/// Destroy every string, returning how many were released
#[no_mangle]
pub extern "C" fn twine_delete_all() -> usize {
    match global().and_then(Registry::teardown_all) {
        Ok(released) => released,
        Err(e) => {
            report("twine_delete_all", e);
            0
        }
    }
}

/// Length of a string (0 for an invalid handle)
#[no_mangle]
pub extern "C" fn twine_len(handle: TwineHandle) -> usize {
    with_handle("twine_len", handle, Registry::len).unwrap_or(0)
}

/// Capacity of a string (0 for an invalid handle)
#[no_mangle]
pub extern "C" fn twine_cap(handle: TwineHandle) -> usize {
    with_handle("twine_cap", handle, Registry::capacity).unwrap_or(0)
}

/// Pointer to the NUL-terminated content (NULL for an invalid handle)
///
/// The pointer is valid until the string is next modified or destroyed,
/// and must not be read while another thread modifies the same string.
/// `twine_delete_all` (or `teardown_global`) from any thread destroys it
/// too, so callers that share the registry across threads should copy the
/// bytes out before another thread can tear it down.
#[no_mangle]
pub extern "C" fn twine_str(handle: TwineHandle) -> *const c_char {
    with_handle("twine_str", handle, |registry, handle| {
        registry.with(handle, |string| string.as_ptr() as *const c_char)
    })
    .unwrap_or(std::ptr::null())
}

/// Duplicate a whole string (0 on failure)
#[no_mangle]
pub extern "C" fn twine_copy(handle: TwineHandle) -> TwineHandle {
    to_raw_handle(with_handle("twine_copy", handle, |registry, handle| {
        registry.copy(handle).map(Some)
    }))
}

/// Duplicate `[i, len)`; 0 when `i == 0` or `i >= len`
#[no_mangle]
pub extern "C" fn twine_substr(handle: TwineHandle, i: usize) -> TwineHandle {
    to_raw_handle(with_handle("twine_substr", handle, |registry, handle| {
        registry.substring_from(handle, i)
    }))
}

/// Duplicate `[i, j)`; 0 unless `i < j <= len`
#[no_mangle]
pub extern "C" fn twine_substrn(handle: TwineHandle, i: usize, j: usize) -> TwineHandle {
    to_raw_handle(with_handle("twine_substrn", handle, |registry, handle| {
        registry.substring(handle, i, j)
    }))
}

/// Insert a C string at `at`
#[no_mangle]
pub extern "C" fn twine_insert(handle: TwineHandle, c: *const c_char, at: usize) -> TwineErrorCode {
    let Some(bytes) = (unsafe { c_str_bytes(c) }) else {
        return TwineErrorCode::InvalidParameter;
    };
    to_code(with_handle("twine_insert", handle, |registry, handle| {
        registry.insert(handle, bytes, at)
    }))
}

/// Append a C string
#[no_mangle]
pub extern "C" fn twine_append(handle: TwineHandle, c: *const c_char) -> TwineErrorCode {
    let Some(bytes) = (unsafe { c_str_bytes(c) }) else {
        return TwineErrorCode::InvalidParameter;
    };
    to_code(with_handle("twine_append", handle, |registry, handle| {
        registry.append(handle, bytes)
    }))
}

/// Prepend a C string
#[no_mangle]
pub extern "C" fn twine_prepend(handle: TwineHandle, c: *const c_char) -> TwineErrorCode {
    let Some(bytes) = (unsafe { c_str_bytes(c) }) else {
        return TwineErrorCode::InvalidParameter;
    };
    to_code(with_handle("twine_prepend", handle, |registry, handle| {
        registry.prepend(handle, bytes)
    }))
}

/// Append the content of `source` to `target`
#[no_mangle]
pub extern "C" fn twine_concat(target: TwineHandle, source: TwineHandle) -> TwineErrorCode {
    let source = match resolve(source) {
        Ok((_, handle)) => handle,
        Err(code) => return code,
    };
    to_code(with_handle("twine_concat", target, |registry, target| {
        registry.concat(target, source)
    }))
}

/// Remove the byte at `at`, storing it in `removed` if non-null
#[no_mangle]
pub extern "C" fn twine_remove(handle: TwineHandle, at: usize, removed: *mut c_char) -> TwineErrorCode {
    match with_handle("twine_remove", handle, |registry, handle| registry.remove(handle, at)) {
        Ok(byte) => {
            if !removed.is_null() {
                unsafe { *removed = byte as c_char };
            }
            TwineErrorCode::Success
        }
        Err(code) => code,
    }
}

/// Read the byte at `at` into `out`
#[no_mangle]
pub extern "C" fn twine_get(handle: TwineHandle, at: usize, out: *mut c_char) -> TwineErrorCode {
    if out.is_null() {
        return TwineErrorCode::InvalidParameter;
    }

    match with_handle("twine_get", handle, |registry, handle| registry.get(handle, at)) {
        Ok(byte) => {
            unsafe { *out = byte as c_char };
            TwineErrorCode::Success
        }
        Err(code) => code,
    }
}

/// Overwrite the byte at `at`, storing the old one in `previous` if non-null
#[no_mangle]
pub extern "C" fn twine_set(
    handle: TwineHandle,
    at: usize,
    c: c_char,
    previous: *mut c_char,
) -> TwineErrorCode {
    match with_handle("twine_set", handle, |registry, handle| {
        registry.set(handle, at, c as u8)
    }) {
        Ok(byte) => {
            if !previous.is_null() {
                unsafe { *previous = byte as c_char };
            }
            TwineErrorCode::Success
        }
        Err(code) => code,
    }
}

/// Offset of the first occurrence of `pattern`, or -1
#[no_mangle]
pub extern "C" fn twine_find(handle: TwineHandle, pattern: *const c_char) -> i64 {
    let Some(pattern) = (unsafe { c_str_bytes(pattern) }) else {
        return NOT_FOUND;
    };

    match with_handle("twine_find", handle, |registry, handle| registry.find(handle, pattern)) {
        Ok(Some(offset)) => i64::try_from(offset).unwrap_or(NOT_FOUND),
        _ => NOT_FOUND,
    }
}

/// Drop the content of a string, keeping its allocation
#[no_mangle]
pub extern "C" fn twine_clear(handle: TwineHandle) -> TwineErrorCode {
    to_code(with_handle("twine_clear", handle, Registry::clear))
}

/// Copy the process-wide registry statistics into `stats`
#[no_mangle]
pub extern "C" fn twine_registry_stats(stats: *mut TwineRegistryStats) -> TwineErrorCode {
    if stats.is_null() {
        return TwineErrorCode::InvalidParameter;
    }

    match global().and_then(Registry::stats) {
        Ok(snapshot) => {
            unsafe { *stats = TwineRegistryStats::from(&snapshot) };
            TwineErrorCode::Success
        }
        Err(e) => report("twine_registry_stats", e),
    }
}
