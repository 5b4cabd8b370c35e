//! Purpose: Ownership-transferring outputs: byte buffers, C strings, pointer arrays.
//! Exports: `into_malloc_bytes`, `into_malloc_array`, `into_c_string`, release helpers.
//! Role: The only place outward allocations are made for the ABI.
//! Invariants: Byte buffers and arrays come from `malloc` and are released with `free`.
//! Invariants: Strings come from `CString::into_raw` and are released with `CString::from_raw`.
//! Invariants: A successful buffer is never null, even for zero-length payloads.
use std::ffi::CString;
use std::os::raw::{c_char, c_void};
use std::ptr;

/// Copies `data` into a fresh `malloc` block and reports its length.
///
/// Returns null when allocation fails; `out_len` is left untouched then.
pub fn into_malloc_bytes(data: &[u8], out_len: *mut usize) -> *mut c_void {
    let raw = unsafe { libc::malloc(data.len().max(1)) };
    if raw.is_null() {
        return ptr::null_mut();
    }
    unsafe {
        ptr::copy_nonoverlapping(data.as_ptr(), raw.cast::<u8>(), data.len());
        if !out_len.is_null() {
            *out_len = data.len();
        }
    }
    raw
}

/// Moves `items` into a `malloc` array of `T`; the element values become the caller's.
///
/// Returns `None` on allocation failure; the items are untouched and still owned by the caller.
pub fn into_malloc_array<T: Copy>(items: &[T], out_len: *mut usize) -> Option<*mut T> {
    let size = std::mem::size_of::<T>().checked_mul(items.len())?;
    let raw = unsafe { libc::malloc(size.max(1)) }.cast::<T>();
    if raw.is_null() {
        return None;
    }
    unsafe {
        ptr::copy_nonoverlapping(items.as_ptr(), raw, items.len());
        if !out_len.is_null() {
            *out_len = items.len();
        }
    }
    Some(raw)
}

/// # Safety
/// `raw` must be null or come from one of the `malloc` helpers above, released once.
pub unsafe fn free_malloc(raw: *mut c_void) {
    if raw.is_null() {
        return;
    }
    unsafe { libc::free(raw) };
}

/// Hands `text` to the caller as a NUL-terminated string.
///
/// Text is cut at its first NUL, which is what a C reader would see anyway.
pub fn into_c_string(text: &str) -> *mut c_char {
    let end = text.find('\0').unwrap_or(text.len());
    CString::new(&text[..end])
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// # Safety
/// `raw` must be null or come from [`into_c_string`], released once.
pub unsafe fn free_c_string(raw: *mut c_char) {
    if raw.is_null() {
        return;
    }
    unsafe { drop(CString::from_raw(raw)) };
}
