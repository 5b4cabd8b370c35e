//! Purpose: Two-word token carrying one strong reference to a reference-counted object.
//! Exports: `SharedPtrData`, `SharedKind`, `SharedObject`.
//! Role: Makes every retain/release explicit for callers without compatible ownership.
//! Invariants: Both words are copied together; `ptr` is an `Arc::into_raw` address.
//! Invariants: `kind` names the object type and is checked before every decode.
//! Invariants: Each token produced (by the library or by `retain`) is released exactly once.
use std::sync::Arc;

use super::error::{Error, Result};

#[repr(usize)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SharedKind {
    SearchReply = 1,
    PreviewReply = 2,
    Category = 3,
    Department = 4,
}

impl SharedKind {
    pub fn from_word(word: usize) -> Option<Self> {
        match word {
            1 => Some(Self::SearchReply),
            2 => Some(Self::PreviewReply),
            3 => Some(Self::Category),
            4 => Some(Self::Department),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SearchReply => "search reply",
            Self::PreviewReply => "preview reply",
            Self::Category => "category",
            Self::Department => "department",
        }
    }
}

/// Types that may travel behind a [`SharedPtrData`].
pub trait SharedObject: Send + Sync + 'static {
    const KIND: SharedKind;
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SharedPtrData {
    pub ptr: usize,
    pub kind: usize,
}

impl SharedPtrData {
    pub const fn empty() -> Self {
        Self { ptr: 0, kind: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.ptr == 0
    }

    /// Moves the strong reference held by `arc` into a token.
    pub fn from_arc<T: SharedObject>(arc: Arc<T>) -> Self {
        Self {
            ptr: Arc::into_raw(arc) as usize,
            kind: T::KIND as usize,
        }
    }

    fn checked<T: SharedObject>(&self) -> Result<*const T> {
        if self.ptr == 0 {
            return Err(Error::usage(format!("{} handle is empty", T::KIND.name())));
        }
        if self.kind != T::KIND as usize {
            let found = SharedKind::from_word(self.kind)
                .map(SharedKind::name)
                .unwrap_or("unknown");
            return Err(Error::usage(format!(
                "expected {} handle, got {found} handle",
                T::KIND.name()
            )));
        }
        Ok(self.ptr as *const T)
    }

    /// Borrows the object for the duration of a call.
    ///
    /// # Safety
    /// The token must be live (not yet released) for at least `'a`.
    pub unsafe fn get<'a, T: SharedObject>(&self) -> Result<&'a T> {
        let raw = self.checked::<T>()?;
        unsafe { Ok(&*raw) }
    }

    /// Produces an owned `Arc` for the library to keep, leaving the token untouched.
    ///
    /// # Safety
    /// The token must be live.
    pub unsafe fn to_arc<T: SharedObject>(&self) -> Result<Arc<T>> {
        let raw = self.checked::<T>()?;
        unsafe {
            Arc::increment_strong_count(raw);
            Ok(Arc::from_raw(raw))
        }
    }

    /// Adds one reference and returns an independent token aliasing the same object.
    ///
    /// # Safety
    /// The token must be live.
    pub unsafe fn retain<T: SharedObject>(&self) -> Result<Self> {
        let raw = self.checked::<T>()?;
        unsafe { Arc::increment_strong_count(raw) };
        tracing::debug!(kind = T::KIND.name(), ptr = self.ptr, "shared handle retained");
        Ok(*self)
    }

    /// Gives back the reference held by this token; the object is dropped with the last one.
    ///
    /// # Safety
    /// The token must be live and must not be used again afterwards.
    pub unsafe fn release<T: SharedObject>(self) -> Result<()> {
        let raw = self.checked::<T>()?;
        tracing::debug!(kind = T::KIND.name(), ptr = self.ptr, "shared handle released");
        unsafe { drop(Arc::from_raw(raw)) };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(u32);

    impl SharedObject for Probe {
        const KIND: SharedKind = SharedKind::Category;
    }

    #[test]
    fn retain_release_balances_the_count() {
        let arc = Arc::new(Probe(7));
        let weak = Arc::downgrade(&arc);
        let token = SharedPtrData::from_arc(arc);
        let copies: Vec<_> = (0..3)
            .map(|_| unsafe { token.retain::<Probe>() }.expect("retain"))
            .collect();
        assert_eq!(weak.strong_count(), 4);

        for copy in copies {
            unsafe { copy.release::<Probe>() }.expect("release");
        }
        assert_eq!(unsafe { token.get::<Probe>() }.expect("get").0, 7);
        unsafe { token.release::<Probe>() }.expect("release");
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let token = SharedPtrData::from_arc(Arc::new(Probe(1)));
        let forged = SharedPtrData {
            ptr: token.ptr,
            kind: SharedKind::Department as usize,
        };
        let err = unsafe { forged.get::<Probe>() }.err().expect("kind mismatch");
        assert_eq!(
            err.to_string(),
            "Usage: expected category handle, got department handle"
        );
        unsafe { token.release::<Probe>() }.expect("release");
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = unsafe { SharedPtrData::empty().retain::<Probe>() }.unwrap_err();
        assert_eq!(err.to_string(), "Usage: category handle is empty");
    }

    #[test]
    fn to_arc_keeps_object_alive_after_token_release() {
        let token = SharedPtrData::from_arc(Arc::new(Probe(5)));
        let kept = unsafe { token.to_arc::<Probe>() }.expect("arc");
        unsafe { token.release::<Probe>() }.expect("release");
        assert_eq!(kept.0, 5);
        assert_eq!(Arc::strong_count(&kept), 1);
    }
}
