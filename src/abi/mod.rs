//! Purpose: C ABI surface (`uscp_*`) over the entity model.
//! Exports: Every `#[unsafe(no_mangle)]` function, per entity submodule; memory release helpers.
//! Role: Stable boundary for foreign callers; decodes inputs, calls `api`, encodes outputs.
//! Invariants: Fallible calls take `out_err` last; it is untouched on success.
//! Invariants: On failure pointer results are null and scalar results zero; never both result and error.
//! Invariants: No panic unwinds across the boundary; `guard` turns it into an `Internal` error.
//! Notes: Setters without a value result return nothing; the error slot is their only failure signal.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::any::Any;
use std::os::raw::{c_char, c_void};
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::api::{Category, Department, PreviewReply, SearchReply};
use crate::core::bytes::{self, into_c_string, into_malloc_bytes};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::shared::{SharedKind, SharedPtrData};
use crate::core::strings::StrData;
use crate::core::variant::{self, Variant, VariantMap};

mod activation;
mod child_scope;
mod department;
mod layout;
mod metadata;
mod query;
mod reply;
mod result;
mod scope_base;

pub use activation::*;
pub use child_scope::*;
pub use department::*;
pub use layout::*;
pub use metadata::*;
pub use query::*;
pub use reply::*;
pub use result::*;
pub use scope_base::*;

/// Runs one boundary call, routing failures and panics into `out_err`.
pub(crate) fn guard<T>(
    op: &'static str,
    out_err: *mut *mut c_char,
    fallback: T,
    body: impl FnOnce() -> Result<T>,
) -> T {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            fail(op, out_err, &err);
            fallback
        }
        Err(payload) => {
            let err = panic_error(op, payload.as_ref());
            tracing::error!(op, error = %err, "panic caught at boundary");
            fail(op, out_err, &err);
            fallback
        }
    }
}

/// Same as [`guard`] for calls without an error slot; failures are only logged.
pub(crate) fn quiet<T>(op: &'static str, fallback: T, body: impl FnOnce() -> Result<T>) -> T {
    guard(op, std::ptr::null_mut(), fallback, body)
}

fn fail(op: &'static str, out_err: *mut *mut c_char, err: &Error) {
    tracing::warn!(op, kind = ?err.kind(), error = %err, "boundary call failed");
    if out_err.is_null() {
        return;
    }
    unsafe {
        *out_err = into_c_string(&err.to_string());
    }
}

fn panic_error(op: &str, payload: &(dyn Any + Send)) -> Error {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    Error::new(ErrorKind::Internal).with_message(format!("{op} panicked: {detail}"))
}

// Input decoding.

/// Lossy decoding for calls without an error slot; invalid bytes become U+FFFD.
pub(crate) fn text(data: StrData) -> String {
    unsafe { data.to_string_lossy() }
}

/// Exact decoding for calls with an error slot; invalid UTF-8 is a `Conversion` error.
pub(crate) fn strict(data: StrData, what: &str) -> Result<String> {
    unsafe { data.to_str(what) }.map(str::to_owned)
}

pub(crate) fn flat(data: StrData) -> Vec<String> {
    unsafe { data.split() }
}

pub(crate) fn json(data: StrData, context: &str) -> Result<Variant> {
    variant::parse(unsafe { data.as_bytes() }, context)
}

pub(crate) fn json_map(data: StrData, context: &str) -> Result<VariantMap> {
    variant::parse_map(unsafe { data.as_bytes() }, context)
}

pub(crate) fn json_array(data: StrData, context: &str) -> Result<Vec<Variant>> {
    variant::parse_array(unsafe { data.as_bytes() }, context)
}

// Output encoding.

pub(crate) fn json_out(value: &Value, out_len: *mut usize) -> Result<*mut c_void> {
    let encoded = variant::to_bytes(value)?;
    Ok(into_malloc_bytes(&encoded, out_len))
}

pub(crate) fn flag(value: bool) -> i32 {
    i32::from(value)
}

/// Checks an out-pointer before any object is created for it.
pub(crate) fn require_out<T>(out: *mut T, what: &str) -> Result<()> {
    if out.is_null() {
        return Err(Error::usage(format!("{what} is null")));
    }
    Ok(())
}

// Memory.

#[unsafe(no_mangle)]
pub extern "C" fn uscp_string_free(text: *mut c_char) {
    unsafe { bytes::free_c_string(text) };
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_bytes_free(data: *mut c_void) {
    unsafe { bytes::free_malloc(data) };
}

/// Releases a shared token of any kind, dispatching on its tag.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_shared_release(token: SharedPtrData) {
    quiet("shared_release", (), || unsafe {
        match SharedKind::from_word(token.kind) {
            Some(SharedKind::SearchReply) => token.release::<SearchReply>(),
            Some(SharedKind::PreviewReply) => token.release::<PreviewReply>(),
            Some(SharedKind::Category) => token.release::<Category>(),
            Some(SharedKind::Department) => token.release::<Department>(),
            None if token.is_empty() => Ok(()),
            None => Err(Error::usage(format!(
                "unknown shared handle kind {}",
                token.kind
            ))),
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_logging_init() {
    crate::logging::init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    fn take_error(err: *mut c_char) -> String {
        let text = unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned();
        uscp_string_free(err);
        text
    }

    #[test]
    fn success_leaves_the_slot_alone() {
        let mut err: *mut c_char = ptr::null_mut();
        let value = guard("ok", &mut err, 0, || Ok(7));
        assert_eq!(value, 7);
        assert!(err.is_null());
    }

    #[test]
    fn failure_writes_the_slot_and_returns_fallback() {
        let mut err: *mut c_char = ptr::null_mut();
        let value = guard("fails", &mut err, -1, || Err(Error::logic("done")));
        assert_eq!(value, -1);
        assert_eq!(take_error(err), "Logic: done");
    }

    #[test]
    fn panics_become_internal_errors() {
        let mut err: *mut c_char = ptr::null_mut();
        let value: i32 = guard("boom", &mut err, 0, || panic!("exploded"));
        assert_eq!(value, 0);
        assert_eq!(take_error(err), "Internal: boom panicked: exploded");
    }

    #[test]
    fn null_error_slot_is_tolerated() {
        let value = guard("quiet", ptr::null_mut(), 3, || Err(Error::usage("x")));
        assert_eq!(value, 3);
    }

    #[test]
    fn releasing_an_empty_or_unknown_token_is_harmless() {
        uscp_shared_release(SharedPtrData::empty());
        uscp_shared_release(SharedPtrData { ptr: 8, kind: 99 });
    }
}
