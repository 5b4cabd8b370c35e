//! Purpose: `uscp_search_reply_*` and `uscp_preview_reply_*` entry points.
//! Role: Shared-token adapters over `SearchReply`/`PreviewReply`; categories are minted here.
//! Invariants: Every call checks the token kind before touching the object.
use std::os::raw::{c_char, c_void};
use std::ptr;
use std::sync::Arc;

use super::{flag, flat, guard, json, json_array, json_map, json_out, quiet, require_out, strict};
use crate::api::{
    Category, ColumnLayout, Department, PreviewReply, ScopeResult, SearchReply, parse_widgets,
};
use crate::core::handle::{borrow, borrow_all};
use crate::core::shared::SharedPtrData;
use crate::core::strings::StrData;

// Search reply.

/// Writes a token for a fresh reply; the token holds the only reference.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_new(out: *mut SharedPtrData) {
    quiet("search_reply_new", (), || {
        require_out(out, "out")?;
        let token = SharedPtrData::from_arc(Arc::new(SearchReply::new()));
        unsafe { *out = token };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_retain(dest: *mut SharedPtrData, src: SharedPtrData) {
    quiet("search_reply_retain", (), || {
        require_out(dest, "dest")?;
        let token = unsafe { src.retain::<SearchReply>() }?;
        unsafe { *dest = token };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_release(token: SharedPtrData) {
    quiet("search_reply_release", (), || unsafe {
        token.release::<SearchReply>()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_finished(reply: SharedPtrData, out_err: *mut *mut c_char) {
    guard("search_reply_finished", out_err, (), || {
        unsafe { reply.get::<SearchReply>() }?.finished()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_error(
    reply: SharedPtrData,
    message: StrData,
    out_err: *mut *mut c_char,
) {
    guard("search_reply_error", out_err, (), || {
        let message = strict(message, "error message")?;
        unsafe { reply.get::<SearchReply>() }?.error(message)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_register_category(
    reply: SharedPtrData,
    id: StrData,
    title: StrData,
    icon: StrData,
    renderer_template: StrData,
    out_category: *mut SharedPtrData,
    out_err: *mut *mut c_char,
) {
    guard("search_reply_register_category", out_err, (), || {
        require_out(out_category, "out_category")?;
        let reply = unsafe { reply.get::<SearchReply>() }?;
        let template = json_map(renderer_template, "category template")?;
        let category: Arc<Category> = reply.register_category(
            &strict(id, "category id")?,
            &strict(title, "category title")?,
            &strict(icon, "category icon")?,
            template,
        )?;
        unsafe { *out_category = SharedPtrData::from_arc(category) };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_register_departments(
    reply: SharedPtrData,
    root: SharedPtrData,
    out_err: *mut *mut c_char,
) {
    guard("search_reply_register_departments", out_err, (), || {
        let reply = unsafe { reply.get::<SearchReply>() }?;
        let root = unsafe { root.to_arc::<Department>() }?;
        reply.register_departments(root)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_push(
    reply: SharedPtrData,
    result: *const ScopeResult,
    out_err: *mut *mut c_char,
) {
    guard("search_reply_push", out_err, (), || {
        let reply = unsafe { reply.get::<SearchReply>() }?;
        let result = unsafe { borrow(result, "result") }?;
        reply.push(result)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_push_filters(
    reply: SharedPtrData,
    filters: StrData,
    filter_state: StrData,
    out_err: *mut *mut c_char,
) {
    guard("search_reply_push_filters", out_err, (), || {
        let reply = unsafe { reply.get::<SearchReply>() }?;
        let filters = json_array(filters, "filters")?;
        let state = json_map(filter_state, "filter state")?;
        reply.push_filters(filters, state)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_pushed_count(reply: SharedPtrData) -> i32 {
    quiet("search_reply_pushed_count", 0, || {
        let count = unsafe { reply.get::<SearchReply>() }?.pushed_count();
        Ok(i32::try_from(count).unwrap_or(i32::MAX))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_is_finished(reply: SharedPtrData) -> i32 {
    quiet("search_reply_is_finished", 0, || {
        Ok(flag(unsafe { reply.get::<SearchReply>() }?.is_finished()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_search_reply_snapshot(
    reply: SharedPtrData,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("search_reply_snapshot", ptr::null_mut(), || {
        let snapshot = unsafe { reply.get::<SearchReply>() }?.snapshot();
        json_out(&snapshot, out_len)
    })
}

// Preview reply.

#[unsafe(no_mangle)]
pub extern "C" fn uscp_preview_reply_new(out: *mut SharedPtrData) {
    quiet("preview_reply_new", (), || {
        require_out(out, "out")?;
        let token = SharedPtrData::from_arc(Arc::new(PreviewReply::new()));
        unsafe { *out = token };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_preview_reply_retain(dest: *mut SharedPtrData, src: SharedPtrData) {
    quiet("preview_reply_retain", (), || {
        require_out(dest, "dest")?;
        let token = unsafe { src.retain::<PreviewReply>() }?;
        unsafe { *dest = token };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_preview_reply_release(token: SharedPtrData) {
    quiet("preview_reply_release", (), || unsafe {
        token.release::<PreviewReply>()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_preview_reply_finished(reply: SharedPtrData, out_err: *mut *mut c_char) {
    guard("preview_reply_finished", out_err, (), || {
        unsafe { reply.get::<PreviewReply>() }?.finished()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_preview_reply_error(
    reply: SharedPtrData,
    message: StrData,
    out_err: *mut *mut c_char,
) {
    guard("preview_reply_error", out_err, (), || {
        let message = strict(message, "error message")?;
        unsafe { reply.get::<PreviewReply>() }?.error(message)
    })
}

/// `widgets` is a flat list, one widget JSON object per entry.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_preview_reply_push_widgets(
    reply: SharedPtrData,
    widgets: StrData,
    out_err: *mut *mut c_char,
) {
    guard("preview_reply_push_widgets", out_err, (), || {
        let reply = unsafe { reply.get::<PreviewReply>() }?;
        let widgets = parse_widgets(&flat(widgets))?;
        reply.push_widgets(widgets)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_preview_reply_push_attr(
    reply: SharedPtrData,
    key: StrData,
    value: StrData,
    out_err: *mut *mut c_char,
) {
    guard("preview_reply_push_attr", out_err, (), || {
        let reply = unsafe { reply.get::<PreviewReply>() }?;
        let value = json(value, "preview attribute")?;
        reply.push_attr(&strict(key, "attribute key")?, value)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_preview_reply_register_layout(
    reply: SharedPtrData,
    layouts: *const *mut ColumnLayout,
    count: usize,
    out_err: *mut *mut c_char,
) {
    guard("preview_reply_register_layout", out_err, (), || {
        let reply = unsafe { reply.get::<PreviewReply>() }?;
        let layouts = unsafe { borrow_all(layouts, count, "layouts") }?;
        reply.register_layout(layouts.into_iter().cloned().collect())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_preview_reply_snapshot(
    reply: SharedPtrData,
    out_len: *mut usize,
) -> *mut c_void {
    quiet("preview_reply_snapshot", ptr::null_mut(), || {
        let snapshot = unsafe { reply.get::<PreviewReply>() }?.snapshot();
        json_out(&snapshot, out_len)
    })
}
