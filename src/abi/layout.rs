//! Purpose: `uscp_column_layout_*` entry points.
//! Role: Opaque-handle adapter over `ColumnLayout`; columns come in as flat lists.
use std::os::raw::{c_char, c_void};
use std::ptr;

use serde_json::Value;

use super::{flat, guard, json_out, quiet};
use crate::api::ColumnLayout;
use crate::core::handle::{borrow, borrow_mut, destroy, into_handle};
use crate::core::strings::StrData;

#[unsafe(no_mangle)]
pub extern "C" fn uscp_column_layout_new(
    number_of_columns: i32,
    out_err: *mut *mut c_char,
) -> *mut ColumnLayout {
    guard("column_layout_new", out_err, ptr::null_mut(), || {
        Ok(into_handle(ColumnLayout::new(number_of_columns)?))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_column_layout_free(layout: *mut ColumnLayout) {
    unsafe { destroy(layout) };
}

/// `widget_ids` is a flat list of widget ids for the next column.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_column_layout_add_column(
    layout: *mut ColumnLayout,
    widget_ids: StrData,
    out_err: *mut *mut c_char,
) {
    guard("column_layout_add_column", out_err, (), || {
        let layout = unsafe { borrow_mut(layout, "layout") }?;
        layout.add_column(flat(widget_ids))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_column_layout_number_of_columns(layout: *const ColumnLayout) -> i32 {
    quiet("column_layout_number_of_columns", 0, || {
        let layout = unsafe { borrow(layout, "layout") }?;
        Ok(layout.number_of_columns() as i32)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_column_layout_size(layout: *const ColumnLayout) -> i32 {
    quiet("column_layout_size", 0, || {
        let layout = unsafe { borrow(layout, "layout") }?;
        Ok(layout.size() as i32)
    })
}

/// Widget ids of one column as a JSON array.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_column_layout_column(
    layout: *const ColumnLayout,
    index: i32,
    out_len: *mut usize,
    out_err: *mut *mut c_char,
) -> *mut c_void {
    guard("column_layout_column", out_err, ptr::null_mut(), || {
        let layout = unsafe { borrow(layout, "layout") }?;
        let ids: Vec<Value> = layout
            .column(index)?
            .iter()
            .map(|id| Value::String(id.clone()))
            .collect();
        json_out(&Value::Array(ids), out_len)
    })
}
