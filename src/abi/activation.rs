//! Purpose: `uscp_activation_response_*` entry points.
//! Role: Opaque-handle adapter over `ActivationResponse`; payload constructors copy their input.
use std::os::raw::{c_char, c_void};
use std::ptr;

use super::{flat, guard, json, json_out, quiet};
use crate::api::{ActivationResponse, ActivationStatus, CannedQuery, ScopeResult, parse_widgets};
use crate::core::handle::{borrow, borrow_mut, destroy, into_handle};
use crate::core::strings::StrData;

/// Plain responses only (statuses 0..=3); payload statuses have their own constructors.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_activation_response_new(
    status: i32,
    out_err: *mut *mut c_char,
) -> *mut ActivationResponse {
    guard("activation_response_new", out_err, ptr::null_mut(), || {
        let status = ActivationStatus::from_code(status)?;
        Ok(into_handle(ActivationResponse::new(status)?))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_activation_response_new_query(
    query: *const CannedQuery,
) -> *mut ActivationResponse {
    quiet("activation_response_new_query", ptr::null_mut(), || {
        let query = unsafe { borrow(query, "query") }?;
        Ok(into_handle(ActivationResponse::for_query(query.clone())))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_activation_response_new_update_result(
    result: *const ScopeResult,
) -> *mut ActivationResponse {
    quiet("activation_response_new_update_result", ptr::null_mut(), || {
        let result = unsafe { borrow(result, "result") }?;
        Ok(into_handle(ActivationResponse::update_result(result.clone())))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_activation_response_new_update_preview(
    widgets: StrData,
    out_err: *mut *mut c_char,
) -> *mut ActivationResponse {
    guard(
        "activation_response_new_update_preview",
        out_err,
        ptr::null_mut(),
        || {
            let widgets = parse_widgets(&flat(widgets))?;
            Ok(into_handle(ActivationResponse::update_preview(widgets)?))
        },
    )
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_activation_response_free(response: *mut ActivationResponse) {
    unsafe { destroy(response) };
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_activation_response_status(response: *const ActivationResponse) -> i32 {
    quiet("activation_response_status", 0, || {
        Ok(unsafe { borrow(response, "response") }?.status() as i32)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_activation_response_set_scope_data(
    response: *mut ActivationResponse,
    data: StrData,
    out_err: *mut *mut c_char,
) {
    guard("activation_response_set_scope_data", out_err, (), || {
        let response = unsafe { borrow_mut(response, "response") }?;
        response.set_scope_data(json(data, "scope data")?);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_activation_response_scope_data(
    response: *const ActivationResponse,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("activation_response_scope_data", ptr::null_mut(), || {
        json_out(unsafe { borrow(response, "response") }?.scope_data(), out_len)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_activation_response_serialize(
    response: *const ActivationResponse,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("activation_response_serialize", ptr::null_mut(), || {
        json_out(&unsafe { borrow(response, "response") }?.serialize(), out_len)
    })
}
