//! Purpose: Flat multi-string transport and borrowed text inputs.
//! Exports: `StrData`, `join_strings`, `split_strings`, `TERMINATOR`.
//! Role: Lets a caller without a native string type pass one string or a list.
//! Invariants: Each string in a list is followed by exactly one `TERMINATOR`, the last included.
//! Invariants: Decoding never fails; bytes after the final terminator are ignored.
//! Notes: A terminator inside a string is an unchecked caller precondition.
use std::os::raw::c_char;
use std::{ptr, slice};

use super::error::{Error, Result};

pub const TERMINATOR: u8 = 0;

/// Borrowed `(pointer, length)` view of caller-owned bytes.
///
/// Nothing here takes ownership; the caller keeps the region alive for the
/// duration of the call.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct StrData {
    pub data: *const c_char,
    pub length: usize,
}

impl StrData {
    pub const fn empty() -> Self {
        Self {
            data: ptr::null(),
            length: 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::empty();
        }
        Self {
            data: bytes.as_ptr().cast(),
            length: bytes.len(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// # Safety
    /// `data` must point at `length` readable bytes that outlive `'a`, or be null.
    pub unsafe fn as_bytes<'a>(&self) -> &'a [u8] {
        if self.data.is_null() || self.length == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.data.cast::<u8>(), self.length) }
    }

    /// # Safety
    /// Same contract as [`StrData::as_bytes`].
    pub unsafe fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(unsafe { self.as_bytes() }).into_owned()
    }

    /// Strict UTF-8 view, for inputs where silently replacing bytes would change meaning.
    ///
    /// # Safety
    /// Same contract as [`StrData::as_bytes`].
    pub unsafe fn to_str<'a>(&self, what: &str) -> Result<&'a str> {
        std::str::from_utf8(unsafe { self.as_bytes() }).map_err(|err| {
            Error::new(super::error::ErrorKind::Conversion)
                .with_message(format!("{what} is not valid UTF-8"))
                .with_source(err)
        })
    }

    /// # Safety
    /// Same contract as [`StrData::as_bytes`].
    pub unsafe fn split(&self) -> Vec<String> {
        split_strings(unsafe { self.as_bytes() })
    }
}

pub fn join_strings<S: AsRef<str>>(items: &[S]) -> Vec<u8> {
    let total = items.iter().map(|item| item.as_ref().len() + 1).sum();
    let mut buf = Vec::with_capacity(total);
    for item in items {
        buf.extend_from_slice(item.as_ref().as_bytes());
        buf.push(TERMINATOR);
    }
    buf
}

pub fn split_strings(bytes: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    for (idx, byte) in bytes.iter().enumerate() {
        if *byte == TERMINATOR {
            out.push(String::from_utf8_lossy(&bytes[start..idx]).into_owned());
            start = idx + 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{StrData, join_strings, split_strings};

    #[test]
    fn empty_list_is_zero_length() {
        let empty: [&str; 0] = [];
        assert!(join_strings(&empty).is_empty());
        assert!(split_strings(&[]).is_empty());
    }

    #[test]
    fn preserves_order_and_empty_entries() {
        let items = ["", "w1", "", "w2", ""];
        let buf = join_strings(&items);
        assert_eq!(buf, b"\0w1\0\0w2\0\0");
        assert_eq!(split_strings(&buf), items);
    }

    #[test]
    fn unterminated_tail_is_dropped() {
        assert_eq!(split_strings(b"a\0b"), vec!["a".to_string()]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let decoded = split_strings(&[0xff, b'x', 0]);
        assert_eq!(decoded, vec!["\u{fffd}x".to_string()]);
    }

    #[test]
    fn null_str_data_reads_as_empty() {
        let data = StrData::empty();
        assert!(unsafe { data.as_bytes() }.is_empty());
        assert!(unsafe { data.split() }.is_empty());
    }

    #[test]
    fn strict_view_rejects_bad_utf8() {
        let bytes = [0xc3, 0x28];
        let data = StrData::from_bytes(&bytes);
        let err = unsafe { data.to_str("key") }.unwrap_err();
        assert!(err.to_string().contains("key is not valid UTF-8"));
    }
}
