//! Purpose: Lifecycle for exclusively-owned objects exposed as opaque pointers.
//! Exports: `into_handle`, `borrow`, `borrow_mut`, `destroy`.
//! Role: One creation, one destruction, no aliasing; the caller owns the handle in between.
//! Invariants: Handles are `Box::into_raw` pointers; destroying null is a no-op.
//! Invariants: Using a handle after destroy is undefined; null is reported as `Usage`.
use super::error::{Error, Result};

pub fn into_handle<T>(value: T) -> *mut T {
    let handle = Box::into_raw(Box::new(value));
    tracing::debug!(
        handle = ?handle,
        kind = std::any::type_name::<T>(),
        "handle created"
    );
    handle
}

/// # Safety
/// `handle` must be null or a live handle from [`into_handle`] of the same type.
pub unsafe fn borrow<'a, T>(handle: *const T, what: &str) -> Result<&'a T> {
    if handle.is_null() {
        return Err(Error::usage(format!("{what} is null")));
    }
    unsafe { Ok(&*handle) }
}

/// # Safety
/// Same contract as [`borrow`], and no other reference to the object may be live.
pub unsafe fn borrow_mut<'a, T>(handle: *mut T, what: &str) -> Result<&'a mut T> {
    if handle.is_null() {
        return Err(Error::usage(format!("{what} is null")));
    }
    unsafe { Ok(&mut *handle) }
}

/// # Safety
/// `handle` must be null or a live handle from [`into_handle`], destroyed exactly once.
pub unsafe fn destroy<T>(handle: *mut T) {
    if handle.is_null() {
        return;
    }
    tracing::debug!(
        handle = ?handle,
        kind = std::any::type_name::<T>(),
        "handle destroyed"
    );
    unsafe { drop(Box::from_raw(handle)) };
}

/// Reads `len` handles from a caller array, rejecting null entries.
///
/// # Safety
/// `items` must be null (with `len == 0`) or point at `len` handles that are each live.
pub unsafe fn borrow_all<'a, T>(items: *const *mut T, len: usize, what: &str) -> Result<Vec<&'a T>> {
    if len == 0 {
        return Ok(Vec::new());
    }
    if items.is_null() {
        return Err(Error::usage(format!("{what} array is null")));
    }
    let slice = unsafe { std::slice::from_raw_parts(items, len) };
    slice
        .iter()
        .enumerate()
        .map(|(idx, item)| unsafe { borrow(*item as *const T, &format!("{what}[{idx}]")) })
        .collect()
}
