//! Owned storage for a native encoder state.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::ErrorCode;

/// Alignment of the context region. Covers every field type libopus
/// places in its encoder struct.
pub const CONTEXT_ALIGN: usize = 16;

/// A zeroed, fixed-size heap region that the codec library uses as its
/// encoder state. Freed when dropped.
pub(crate) struct Context {
    ptr: NonNull<u8>,
    layout: Layout,
}

// The region is exclusively owned; moving it between threads is fine as
// long as it is not used from two threads at once, which `&mut` enforces.
unsafe impl Send for Context {}

impl Context {
    /// Allocates `size` zeroed bytes.
    pub(crate) fn alloc(size: usize) -> Result<Self, ErrorCode> {
        if size == 0 {
            return Err(ErrorCode::BAD_ARG);
        }
        let layout =
            Layout::from_size_align(size, CONTEXT_ALIGN).map_err(|_| ErrorCode::ALLOC_FAIL)?;
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(ErrorCode::ALLOC_FAIL)?;
        Ok(Self { ptr, layout })
    }

    /// Returns the size of the region in bytes.
    pub(crate) fn size(&self) -> usize {
        self.layout.size()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("size", &self.size()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_alloc() {
        let mut ctx = Context::alloc(64).unwrap();
        assert_eq!(ctx.size(), 64);
        let ptr = ctx.as_mut_ptr();
        assert_eq!(ptr as usize % CONTEXT_ALIGN, 0);
        let bytes = unsafe { std::slice::from_raw_parts(ptr, 64) };
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_context_alloc_zero_size() {
        assert_eq!(Context::alloc(0).unwrap_err(), ErrorCode::BAD_ARG);
    }

    #[test]
    fn test_context_debug() {
        let ctx = Context::alloc(32).unwrap();
        assert_eq!(format!("{:?}", ctx), "Context { size: 32 }");
    }
}
