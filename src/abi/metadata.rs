//! Purpose: `uscp_query_metadata_*`, `uscp_search_metadata_*`, `uscp_action_metadata_*` and
//! `uscp_scope_metadata_*` entry points.
//! Role: Opaque-handle adapters over the metadata types.
//! Notes: Query metadata accessors take the common prefix shared by search and action metadata:
//! a `*mut SearchMetadata` or `*mut ActionMetadata` may be passed where `*mut QueryMetadata`
//! is expected.
use std::os::raw::{c_char, c_void};
use std::ptr;

use serde_json::Value;

use super::{flag, flat, guard, json, json_map, json_out, quiet, strict, text};
use crate::api::{ActionMetadata, Connectivity, QueryMetadata, ScopeMetadata, SearchMetadata};
use crate::core::bytes::into_c_string;
use crate::core::handle::{borrow, borrow_mut, destroy, into_handle};
use crate::core::strings::StrData;

// Query metadata (shared prefix).

#[unsafe(no_mangle)]
pub extern "C" fn uscp_query_metadata_locale(metadata: *const QueryMetadata) -> *mut c_char {
    quiet("query_metadata_locale", ptr::null_mut(), || {
        Ok(into_c_string(unsafe { borrow(metadata, "metadata") }?.locale()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_query_metadata_form_factor(metadata: *const QueryMetadata) -> *mut c_char {
    quiet("query_metadata_form_factor", ptr::null_mut(), || {
        Ok(into_c_string(unsafe { borrow(metadata, "metadata") }?.form_factor()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_query_metadata_set_internet_connectivity(
    metadata: *mut QueryMetadata,
    status: i32,
    out_err: *mut *mut c_char,
) {
    guard("query_metadata_set_internet_connectivity", out_err, (), || {
        let metadata = unsafe { borrow_mut(metadata, "metadata") }?;
        metadata.set_internet_connectivity(Connectivity::from_code(status)?);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_query_metadata_internet_connectivity(metadata: *const QueryMetadata) -> i32 {
    quiet("query_metadata_internet_connectivity", 0, || {
        Ok(unsafe { borrow(metadata, "metadata") }?.internet_connectivity() as i32)
    })
}

// Search metadata.

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_metadata_new(
    cardinality: i32,
    locale: StrData,
    form_factor: StrData,
    out_err: *mut *mut c_char,
) -> *mut SearchMetadata {
    guard("search_metadata_new", out_err, ptr::null_mut(), || {
        let metadata = SearchMetadata::new(
            cardinality,
            strict(locale, "locale")?,
            strict(form_factor, "form factor")?,
        )?;
        Ok(into_handle(metadata))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_metadata_free(metadata: *mut SearchMetadata) {
    unsafe { destroy(metadata) };
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_metadata_cardinality(metadata: *const SearchMetadata) -> i32 {
    quiet("search_metadata_cardinality", 0, || {
        let cardinality = unsafe { borrow(metadata, "metadata") }?.cardinality();
        Ok(i32::try_from(cardinality).unwrap_or(i32::MAX))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_metadata_location(
    metadata: *const SearchMetadata,
    out_len: *mut usize,
    out_err: *mut *mut c_char,
) -> *mut c_void {
    guard("search_metadata_location", out_err, ptr::null_mut(), || {
        let location = unsafe { borrow(metadata, "metadata") }?.location()?;
        json_out(&Value::Object(location.clone()), out_len)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_metadata_set_location(
    metadata: *mut SearchMetadata,
    location: StrData,
    out_err: *mut *mut c_char,
) {
    guard("search_metadata_set_location", out_err, (), || {
        let metadata = unsafe { borrow_mut(metadata, "metadata") }?;
        metadata.set_location(json_map(location, "location")?)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_metadata_set_aggregated_keywords(
    metadata: *mut SearchMetadata,
    keywords: StrData,
    out_err: *mut *mut c_char,
) {
    guard("search_metadata_set_aggregated_keywords", out_err, (), || {
        let metadata = unsafe { borrow_mut(metadata, "metadata") }?;
        metadata.set_aggregated_keywords(flat(keywords))
    })
}

/// Sorted JSON array of unique keywords.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_metadata_aggregated_keywords(
    metadata: *const SearchMetadata,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("search_metadata_aggregated_keywords", ptr::null_mut(), || {
        let keywords = unsafe { borrow(metadata, "metadata") }?.aggregated_keywords();
        json_out(&Value::from(keywords), out_len)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_metadata_is_aggregated(metadata: *const SearchMetadata) -> i32 {
    quiet("search_metadata_is_aggregated", 0, || {
        Ok(flag(unsafe { borrow(metadata, "metadata") }?.is_aggregated()))
    })
}

// Action metadata.

#[unsafe(no_mangle)]
pub extern "C" fn uscp_action_metadata_new(
    locale: StrData,
    form_factor: StrData,
) -> *mut ActionMetadata {
    into_handle(ActionMetadata::new(text(locale), text(form_factor)))
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_action_metadata_free(metadata: *mut ActionMetadata) {
    unsafe { destroy(metadata) };
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_action_metadata_scope_data(
    metadata: *const ActionMetadata,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("action_metadata_scope_data", ptr::null_mut(), || {
        json_out(unsafe { borrow(metadata, "metadata") }?.scope_data(), out_len)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_action_metadata_set_scope_data(
    metadata: *mut ActionMetadata,
    data: StrData,
    out_err: *mut *mut c_char,
) {
    guard("action_metadata_set_scope_data", out_err, (), || {
        let metadata = unsafe { borrow_mut(metadata, "metadata") }?;
        metadata.set_scope_data(json(data, "scope data")?);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_action_metadata_set_hint(
    metadata: *mut ActionMetadata,
    key: StrData,
    value: StrData,
    out_err: *mut *mut c_char,
) {
    guard("action_metadata_set_hint", out_err, (), || {
        let metadata = unsafe { borrow_mut(metadata, "metadata") }?;
        metadata.set_hint(strict(key, "hint key")?, json(value, "hint")?)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_action_metadata_hint(
    metadata: *const ActionMetadata,
    key: StrData,
    out_len: *mut usize,
    out_err: *mut *mut c_char,
) -> *mut c_void {
    guard("action_metadata_hint", out_err, ptr::null_mut(), || {
        let metadata = unsafe { borrow(metadata, "metadata") }?;
        json_out(metadata.hint(&strict(key, "hint key")?)?, out_len)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_action_metadata_hints(
    metadata: *const ActionMetadata,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("action_metadata_hints", ptr::null_mut(), || {
        let hints = unsafe { borrow(metadata, "metadata") }?.hints();
        json_out(&Value::Object(hints.clone()), out_len)
    })
}

// Scope metadata.

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_metadata_new(
    serialized: StrData,
    out_err: *mut *mut c_char,
) -> *mut ScopeMetadata {
    guard("scope_metadata_new", out_err, ptr::null_mut(), || {
        let metadata = ScopeMetadata::from_json(unsafe { serialized.as_bytes() })?;
        Ok(into_handle(metadata))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_metadata_free(metadata: *mut ScopeMetadata) {
    unsafe { destroy(metadata) };
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_metadata_serialized(metadata: *const ScopeMetadata) -> *mut c_char {
    quiet("scope_metadata_serialized", ptr::null_mut(), || {
        let serialized = unsafe { borrow(metadata, "metadata") }?.serialized()?;
        Ok(into_c_string(&serialized))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_scope_metadata_id(metadata: *const ScopeMetadata) -> *mut c_char {
    quiet("scope_metadata_id", ptr::null_mut(), || {
        Ok(into_c_string(&unsafe { borrow(metadata, "metadata") }?.scope_id))
    })
}
