//! Purpose: `uscp_child_scope_*` and `uscp_child_scope_list_*` entry points.
//! Role: Opaque handles for aggregated child scopes; appended items are copied.
use std::os::raw::{c_char, c_void};
use std::ptr;

use serde_json::Value;

use super::{flag, flat, guard, json_out, quiet, text};
use crate::api::{ChildScope, ChildScopeList, ScopeMetadata};
use crate::core::bytes::into_c_string;
use crate::core::handle::{borrow, borrow_all, borrow_mut, destroy, into_handle};
use crate::core::strings::StrData;

/// `metadata` is copied; `keywords` is a flat list.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_child_scope_new(
    id: StrData,
    metadata: *const ScopeMetadata,
    enabled: i32,
    keywords: StrData,
) -> *mut ChildScope {
    quiet("child_scope_new", ptr::null_mut(), || {
        let metadata = unsafe { borrow(metadata, "metadata") }?;
        Ok(into_handle(ChildScope::new(
            text(id),
            metadata.clone(),
            enabled != 0,
            flat(keywords),
        )))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_child_scope_free(child: *mut ChildScope) {
    unsafe { destroy(child) };
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_child_scope_id(child: *const ChildScope) -> *mut c_char {
    quiet("child_scope_id", ptr::null_mut(), || {
        Ok(into_c_string(unsafe { borrow(child, "child scope") }?.id()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_child_scope_enabled(child: *const ChildScope) -> i32 {
    quiet("child_scope_enabled", 0, || {
        Ok(flag(unsafe { borrow(child, "child scope") }?.enabled()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_child_scope_keywords(
    child: *const ChildScope,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("child_scope_keywords", ptr::null_mut(), || {
        let keywords = unsafe { borrow(child, "child scope") }?.keywords();
        json_out(&Value::from(keywords), out_len)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_child_scope_list_new() -> *mut ChildScopeList {
    into_handle(ChildScopeList::new())
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_child_scope_list_free(list: *mut ChildScopeList) {
    unsafe { destroy(list) };
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_child_scope_list_len(list: *const ChildScopeList) -> usize {
    quiet("child_scope_list_len", 0, || {
        Ok(unsafe { borrow(list, "child scope list") }?.len())
    })
}

/// Copies each child into the list; the handles stay the caller's.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_child_scope_list_append(
    list: *mut ChildScopeList,
    items: *const *mut ChildScope,
    count: usize,
    out_err: *mut *mut c_char,
) {
    guard("child_scope_list_append", out_err, (), || {
        let list = unsafe { borrow_mut(list, "child scope list") }?;
        let children = unsafe { borrow_all(items, count, "child scopes") }?;
        list.extend_from(children);
        Ok(())
    })
}
