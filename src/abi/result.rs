//! Purpose: `uscp_result_*` and `uscp_category_*` entry points.
//! Role: Opaque `ScopeResult` handles plus read access to shared categories.
//! Invariants: Attribute keys must be valid UTF-8; values are JSON documents.
use std::os::raw::{c_char, c_void};
use std::ptr;

use super::{flag, guard, json, json_out, quiet, strict};
use crate::api::{Category, ScopeResult};
use crate::core::bytes::into_c_string;
use crate::core::handle::{borrow, borrow_mut, destroy, into_handle};
use crate::core::shared::SharedPtrData;
use crate::core::strings::StrData;
use crate::core::variant::Variant;

/// Uncategorised result; enough for activation responses, not for pushing.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_result_new() -> *mut ScopeResult {
    into_handle(ScopeResult::new())
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_categorised_result_new(
    category: SharedPtrData,
    out_err: *mut *mut c_char,
) -> *mut ScopeResult {
    guard("categorised_result_new", out_err, ptr::null_mut(), || {
        let category = unsafe { category.to_arc::<Category>() }?;
        Ok(into_handle(ScopeResult::categorised(category)))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_result_free(result: *mut ScopeResult) {
    unsafe { destroy(result) };
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_result_get_attr(
    result: *const ScopeResult,
    key: StrData,
    out_len: *mut usize,
    out_err: *mut *mut c_char,
) -> *mut c_void {
    guard("result_get_attr", out_err, ptr::null_mut(), || {
        let result = unsafe { borrow(result, "result") }?;
        let value = result.attr(&strict(key, "attribute key")?)?;
        json_out(value, out_len)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_result_set_attr(
    result: *mut ScopeResult,
    key: StrData,
    value: StrData,
    out_err: *mut *mut c_char,
) {
    guard("result_set_attr", out_err, (), || {
        let result = unsafe { borrow_mut(result, "result") }?;
        let value: Variant = json(value, "result attribute")?;
        result.set_attr(strict(key, "attribute key")?, value)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_result_set_intercept_activation(result: *mut ScopeResult) {
    quiet("result_set_intercept_activation", (), || {
        unsafe { borrow_mut(result, "result") }?.set_intercept_activation();
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_result_intercept_activation(result: *const ScopeResult) -> i32 {
    quiet("result_intercept_activation", 0, || {
        let result = unsafe { borrow(result, "result") }?;
        Ok(flag(result.intercept_activation()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_result_serialize(
    result: *const ScopeResult,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("result_serialize", ptr::null_mut(), || {
        let result = unsafe { borrow(result, "result") }?;
        json_out(&result.serialize(), out_len)
    })
}

// Categories are created by `uscp_search_reply_register_category`.

#[unsafe(no_mangle)]
pub extern "C" fn uscp_category_retain(dest: *mut SharedPtrData, src: SharedPtrData) {
    quiet("category_retain", (), || {
        super::require_out(dest, "dest")?;
        let token = unsafe { src.retain::<Category>() }?;
        unsafe { *dest = token };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_category_release(token: SharedPtrData) {
    quiet("category_release", (), || unsafe { token.release::<Category>() })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_category_id(category: SharedPtrData) -> *mut c_char {
    quiet("category_id", ptr::null_mut(), || {
        let category = unsafe { category.get::<Category>() }?;
        Ok(into_c_string(category.id()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_category_title(category: SharedPtrData) -> *mut c_char {
    quiet("category_title", ptr::null_mut(), || {
        let category = unsafe { category.get::<Category>() }?;
        Ok(into_c_string(category.title()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_category_icon(category: SharedPtrData) -> *mut c_char {
    quiet("category_icon", ptr::null_mut(), || {
        let category = unsafe { category.get::<Category>() }?;
        Ok(into_c_string(category.icon()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_category_template(
    category: SharedPtrData,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("category_template", ptr::null_mut(), || {
        let category = unsafe { category.get::<Category>() }?;
        json_out(
            &serde_json::Value::Object(category.renderer_template().clone()),
            out_len,
        )
    })
}
