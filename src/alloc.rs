//! Backing-storage seam for the integer cell.
//!
//! [`OwnedHandle`](crate::OwnedHandle) acquires its cell through the
//! [`CellAlloc`] trait instead of calling the global allocator directly, so
//! tests (and the demo driver) can inject an allocator that fails on demand.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;

use crate::error::HandleError;

const CELL_LAYOUT: Layout = Layout::new::<i32>();

/// Source of the single heap cell backing an [`OwnedHandle`](crate::OwnedHandle).
pub trait CellAlloc {
    /// Acquire one zero-initialized cell, or fail with
    /// [`HandleError::Allocation`].
    fn allocate(&self) -> Result<NonNull<i32>, HandleError>;

    /// Return a cell previously obtained from [`CellAlloc::allocate`].
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator and
    /// must not have been released already.
    unsafe fn release(&self, ptr: NonNull<i32>);
}

/// Production allocator over `std::alloc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAlloc;

impl CellAlloc for HeapAlloc {
    fn allocate(&self) -> Result<NonNull<i32>, HandleError> {
        // Zeroed so the cell holds a defined value before the first write;
        // reading uninitialized memory is UB.
        let raw = unsafe { alloc_zeroed(CELL_LAYOUT) as *mut i32 };
        NonNull::new(raw).ok_or(HandleError::Allocation)
    }

    unsafe fn release(&self, ptr: NonNull<i32>) {
        unsafe { dealloc(ptr.as_ptr() as *mut u8, CELL_LAYOUT) };
    }
}

/// Allocator that always reports exhaustion. Lets tests and demos exercise
/// the allocation-failure path without actually draining the heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustedAlloc;

impl CellAlloc for ExhaustedAlloc {
    fn allocate(&self) -> Result<NonNull<i32>, HandleError> {
        Err(HandleError::Allocation)
    }

    unsafe fn release(&self, _ptr: NonNull<i32>) {
        unreachable!("ExhaustedAlloc never hands out a cell");
    }
}
