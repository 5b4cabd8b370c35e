//! Purpose: `uscp_canned_query_*` entry points.
//! Role: Opaque-handle adapter over `CannedQuery`, including URI encode/decode.
use std::os::raw::{c_char, c_void};
use std::ptr;

use super::{guard, json_map, json_out, quiet, text};
use crate::api::CannedQuery;
use crate::core::bytes::into_c_string;
use crate::core::handle::{borrow, borrow_mut, destroy, into_handle};
use crate::core::strings::StrData;

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_new(
    scope_id: StrData,
    query: StrData,
    department_id: StrData,
) -> *mut CannedQuery {
    into_handle(CannedQuery::new(
        text(scope_id),
        text(query),
        text(department_id),
    ))
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_free(query: *mut CannedQuery) {
    unsafe { destroy(query) };
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_scope_id(query: *const CannedQuery) -> *mut c_char {
    quiet("canned_query_scope_id", ptr::null_mut(), || {
        let query = unsafe { borrow(query, "query") }?;
        Ok(into_c_string(query.scope_id()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_department_id(query: *const CannedQuery) -> *mut c_char {
    quiet("canned_query_department_id", ptr::null_mut(), || {
        let query = unsafe { borrow(query, "query") }?;
        Ok(into_c_string(query.department_id()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_query_string(query: *const CannedQuery) -> *mut c_char {
    quiet("canned_query_query_string", ptr::null_mut(), || {
        let query = unsafe { borrow(query, "query") }?;
        Ok(into_c_string(query.query_string()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_set_department_id(
    query: *mut CannedQuery,
    department_id: StrData,
) {
    quiet("canned_query_set_department_id", (), || {
        let query = unsafe { borrow_mut(query, "query") }?;
        query.set_department_id(text(department_id));
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_set_query_string(query: *mut CannedQuery, query_string: StrData) {
    quiet("canned_query_set_query_string", (), || {
        let query = unsafe { borrow_mut(query, "query") }?;
        query.set_query_string(text(query_string));
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_filter_state(
    query: *const CannedQuery,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("canned_query_filter_state", ptr::null_mut(), || {
        let query = unsafe { borrow(query, "query") }?;
        json_out(&serde_json::Value::Object(query.filter_state().clone()), out_len)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_set_filter_state(
    query: *mut CannedQuery,
    state: StrData,
    out_err: *mut *mut c_char,
) {
    guard("canned_query_set_filter_state", out_err, (), || {
        let query = unsafe { borrow_mut(query, "query") }?;
        let state = json_map(state, "filter state")?;
        query.set_filter_state(state);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_to_uri(query: *const CannedQuery) -> *mut c_char {
    quiet("canned_query_to_uri", ptr::null_mut(), || {
        let query = unsafe { borrow(query, "query") }?;
        Ok(into_c_string(&query.to_uri()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_canned_query_from_uri(
    uri: StrData,
    out_err: *mut *mut c_char,
) -> *mut CannedQuery {
    guard("canned_query_from_uri", out_err, ptr::null_mut(), || {
        let uri = unsafe { uri.to_str("scope uri") }?;
        Ok(into_handle(CannedQuery::from_uri(uri)?))
    })
}
