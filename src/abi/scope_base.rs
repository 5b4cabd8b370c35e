//! Purpose: `uscp_scope_base_*` entry points.
//! Role: Configuration surface built from a `ScopeConfig` document.
//! Notes: Returned handle arrays are `malloc`ed; each element is owned by the caller.
use std::os::raw::{c_char, c_void};
use std::path::Path;
use std::ptr;

use serde_json::Value;

use super::{guard, json_out, quiet};
use crate::api::{ChildScope, ScopeBase, ScopeMetadata};
use crate::config::ScopeConfig;
use crate::core::bytes::{into_c_string, into_malloc_array};
use crate::core::handle::{borrow, destroy, into_handle};
use crate::core::strings::StrData;

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_base_new(
    config: StrData,
    out_err: *mut *mut c_char,
) -> *mut ScopeBase {
    guard("scope_base_new", out_err, ptr::null_mut(), || {
        let config = ScopeConfig::from_json(unsafe { config.as_bytes() })?;
        Ok(into_handle(ScopeBase::from_config(config)?))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_base_free(base: *mut ScopeBase) {
    unsafe { destroy(base) };
}

fn path_text(path: &Path) -> *mut c_char {
    into_c_string(&path.to_string_lossy())
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_base_scope_directory(base: *const ScopeBase) -> *mut c_char {
    quiet("scope_base_scope_directory", ptr::null_mut(), || {
        Ok(path_text(unsafe { borrow(base, "scope base") }?.scope_directory()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_base_cache_directory(base: *const ScopeBase) -> *mut c_char {
    quiet("scope_base_cache_directory", ptr::null_mut(), || {
        Ok(path_text(unsafe { borrow(base, "scope base") }?.cache_directory()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_base_tmp_directory(base: *const ScopeBase) -> *mut c_char {
    quiet("scope_base_tmp_directory", ptr::null_mut(), || {
        Ok(path_text(unsafe { borrow(base, "scope base") }?.tmp_directory()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_base_settings(
    base: *const ScopeBase,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("scope_base_settings", ptr::null_mut(), || {
        let settings = unsafe { borrow(base, "scope base") }?.settings();
        json_out(&Value::Object(settings.clone()), out_len)
    })
}

/// Moves fresh handles into a `malloc` array; on allocation failure they are freed again.
fn handle_array<T>(items: Vec<*mut T>, out_count: *mut usize) -> *mut *mut T {
    match into_malloc_array(&items, out_count) {
        Some(array) => array,
        None => {
            for item in items {
                unsafe { destroy(item) };
            }
            ptr::null_mut()
        }
    }
}

/// Each element is a new `ScopeMetadata` handle owned by the caller.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_base_list_registry_scopes_metadata(
    base: *const ScopeBase,
    out_count: *mut usize,
) -> *mut *mut ScopeMetadata {
    quiet("scope_base_list_registry_scopes_metadata", ptr::null_mut(), || {
        let base = unsafe { borrow(base, "scope base") }?;
        let items = base.registry().iter().cloned().map(into_handle).collect();
        Ok(handle_array(items, out_count))
    })
}

/// Each element is a new `ChildScope` handle owned by the caller.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_base_list_child_scopes(
    base: *const ScopeBase,
    out_count: *mut usize,
) -> *mut *mut ChildScope {
    quiet("scope_base_list_child_scopes", ptr::null_mut(), || {
        let base = unsafe { borrow(base, "scope base") }?;
        let items = base.child_scopes().iter().cloned().map(into_handle).collect();
        Ok(handle_array(items, out_count))
    })
}
