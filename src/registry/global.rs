//! Process-wide registry
//!
//! Used by the C API. Rust callers that want isolation create their own
//! [`Registry`] instead. The global instance lives in a static and is never
//! dropped, so callers release its strings with [`teardown_global`].

use crate::error::Result;

use super::instance::Registry;

lazy_static::lazy_static! {
    static ref GLOBAL_REGISTRY: Result<Registry> = Registry::new();
}

/// Get the process-wide registry, creating it on first use
pub fn global() -> Result<&'static Registry> {
    GLOBAL_REGISTRY.as_ref().map_err(Clone::clone)
}

/// Release every string in the process-wide registry
pub fn teardown_global() -> Result<usize> {
    global()?.teardown_all()
}
