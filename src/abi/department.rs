//! Purpose: `uscp_department_*` entry points.
//! Role: Shared-token adapter over the department tree.
//! Invariants: Child lists handed out are fresh tokens; the caller releases each one.
use std::os::raw::c_char;
use std::ptr;
use std::sync::Arc;

use super::{flag, guard, quiet, require_out, strict, text};
use crate::api::{CannedQuery, Department};
use crate::core::bytes::{into_c_string, into_malloc_array};
use crate::core::error::{Error, Result};
use crate::core::handle::{borrow, into_handle};
use crate::core::shared::SharedPtrData;
use crate::core::strings::StrData;

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_new(
    id: StrData,
    query: *const CannedQuery,
    label: StrData,
    out: *mut SharedPtrData,
    out_err: *mut *mut c_char,
) {
    guard("department_new", out_err, (), || {
        require_out(out, "out")?;
        let query = unsafe { borrow(query, "query") }?;
        let department = Department::new(strict(id, "department id")?, query, strict(label, "label")?)?;
        unsafe { *out = SharedPtrData::from_arc(Arc::new(department)) };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_retain(dest: *mut SharedPtrData, src: SharedPtrData) {
    quiet("department_retain", (), || {
        require_out(dest, "dest")?;
        let token = unsafe { src.retain::<Department>() }?;
        unsafe { *dest = token };
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_release(token: SharedPtrData) {
    quiet("department_release", (), || unsafe {
        token.release::<Department>()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_add_subdepartment(
    department: SharedPtrData,
    child: SharedPtrData,
    out_err: *mut *mut c_char,
) {
    guard("department_add_subdepartment", out_err, (), || {
        let department = unsafe { department.get::<Department>() }?;
        let child = unsafe { child.to_arc::<Department>() }?;
        department.add_subdepartment(child)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_set_subdepartments(
    department: SharedPtrData,
    children: *const SharedPtrData,
    count: usize,
    out_err: *mut *mut c_char,
) {
    guard("department_set_subdepartments", out_err, (), || {
        let department = unsafe { department.get::<Department>() }?;
        let children = unsafe { collect_children(children, count) }?;
        department.set_subdepartments(children)
    })
}

unsafe fn collect_children(
    children: *const SharedPtrData,
    count: usize,
) -> Result<Vec<Arc<Department>>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if children.is_null() {
        return Err(Error::usage("subdepartments array is null"));
    }
    let tokens = unsafe { std::slice::from_raw_parts(children, count) };
    tokens
        .iter()
        .map(|token| unsafe { token.to_arc::<Department>() })
        .collect()
}

/// Returns a `malloc` array of new tokens, one per child; each must be released.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_subdepartments(
    department: SharedPtrData,
    out_count: *mut usize,
) -> *mut SharedPtrData {
    quiet("department_subdepartments", ptr::null_mut(), || {
        let department = unsafe { department.get::<Department>() }?;
        let tokens: Vec<SharedPtrData> = department
            .subdepartments()
            .into_iter()
            .map(SharedPtrData::from_arc)
            .collect();
        match into_malloc_array(&tokens, out_count) {
            Some(array) => Ok(array),
            None => {
                for token in tokens {
                    unsafe { token.release::<Department>() }?;
                }
                Ok(ptr::null_mut())
            }
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_set_alternate_label(department: SharedPtrData, label: StrData) {
    quiet("department_set_alternate_label", (), || {
        unsafe { department.get::<Department>() }?.set_alternate_label(text(label));
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_alternate_label(department: SharedPtrData) -> *mut c_char {
    quiet("department_alternate_label", ptr::null_mut(), || {
        let department = unsafe { department.get::<Department>() }?;
        Ok(into_c_string(&department.alternate_label()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_id(department: SharedPtrData) -> *mut c_char {
    quiet("department_id", ptr::null_mut(), || {
        Ok(into_c_string(unsafe { department.get::<Department>() }?.id()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_label(department: SharedPtrData) -> *mut c_char {
    quiet("department_label", ptr::null_mut(), || {
        Ok(into_c_string(unsafe { department.get::<Department>() }?.label()))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_set_has_subdepartments(department: SharedPtrData, value: i32) {
    quiet("department_set_has_subdepartments", (), || {
        unsafe { department.get::<Department>() }?.set_has_subdepartments(value != 0);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_has_subdepartments(department: SharedPtrData) -> i32 {
    quiet("department_has_subdepartments", 0, || {
        Ok(flag(unsafe { department.get::<Department>() }?.has_subdepartments()))
    })
}

/// Returns a copy of the department's query as a new handle.
#[unsafe(no_mangle)]
pub extern "C" fn uscp_department_query(department: SharedPtrData) -> *mut CannedQuery {
    quiet("department_query", ptr::null_mut(), || {
        let department = unsafe { department.get::<Department>() }?;
        Ok(into_handle(department.query().clone()))
    })
}
