//! The two-state owned handle over a single heap integer cell.

use std::ptr::NonNull;

use crate::alloc::{CellAlloc, HeapAlloc};
use crate::error::HandleError;

/// Exclusive owner of one heap-allocated integer cell.
///
/// The handle is either *present* (it owns a live cell) or *absent* (the
/// cell has been released). `read`, `write` and `update` are valid only
/// while present; after [`release`](OwnedHandle::release) they are rejected
/// with [`HandleError::UseAfterRelease`] instead of touching freed memory.
///
/// The binding is fixed at construction: no operation points an existing
/// handle at a different cell, and the type is neither `Clone` nor `Copy`,
/// so exactly one owner exists per allocation. The only way out of the
/// absent state is a fresh [`allocate`](OwnedHandle::allocate) producing a
/// new handle.
///
/// ```
/// use owned_cell::OwnedHandle;
///
/// let mut h = OwnedHandle::allocate()?;
/// h.write(42)?;
/// assert_eq!(h.read()?, 42);
/// h.release();
/// assert!(h.read().is_err());
/// h.release(); // second release is a no-op
/// # Ok::<(), owned_cell::HandleError>(())
/// ```
pub struct OwnedHandle<A: CellAlloc = HeapAlloc> {
    cell: Option<NonNull<i32>>,
    alloc: A,
}

impl OwnedHandle<HeapAlloc> {
    /// Allocate a fresh cell on the heap. The initial value is 0.
    pub fn allocate() -> Result<Self, HandleError> {
        Self::allocate_in(HeapAlloc)
    }
}

impl<A: CellAlloc> OwnedHandle<A> {
    /// Allocate a fresh cell from `alloc`.
    ///
    /// On failure no handle is produced, so a partially-constructed handle
    /// is never observable.
    pub fn allocate_in(alloc: A) -> Result<Self, HandleError> {
        let cell = alloc.allocate()?;
        Ok(OwnedHandle {
            cell: Some(cell),
            alloc,
        })
    }

    /// Current value of the cell.
    pub fn read(&self) -> Result<i32, HandleError> {
        let cell = self.live_cell("read")?;
        // Present implies the pointer is valid and exclusively ours.
        Ok(unsafe { cell.as_ptr().read() })
    }

    /// Store `v` into the cell.
    pub fn write(&mut self, v: i32) -> Result<(), HandleError> {
        let cell = self.live_cell("write")?;
        unsafe { cell.as_ptr().write(v) };
        Ok(())
    }

    /// Apply `f` to the stored value in place and return the new value.
    pub fn update(&mut self, f: impl FnOnce(i32) -> i32) -> Result<i32, HandleError> {
        let cell = self.live_cell("update")?;
        let next = f(unsafe { cell.as_ptr().read() });
        unsafe { cell.as_ptr().write(next) };
        Ok(next)
    }

    /// Release the cell. The first call frees the backing storage and moves
    /// the handle to the absent state; any further call is a no-op, never a
    /// double-free.
    pub fn release(&mut self) {
        if let Some(cell) = self.cell.take() {
            // take() already flipped the state, so a re-entrant or repeated
            // release sees None and stops here.
            unsafe { self.alloc.release(cell) };
        }
    }

    /// Whether the handle still owns a live cell.
    pub fn is_present(&self) -> bool {
        self.cell.is_some()
    }

    fn live_cell(&self, op: &'static str) -> Result<NonNull<i32>, HandleError> {
        self.cell.ok_or(HandleError::UseAfterRelease { op })
    }
}

impl<A: CellAlloc> Drop for OwnedHandle<A> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::ExhaustedAlloc;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Delegates to the heap but counts allocations and releases, so tests
    /// can observe that release happens exactly once.
    #[derive(Clone, Default)]
    struct CountingAlloc {
        allocated: Rc<Cell<usize>>,
        released: Rc<Cell<usize>>,
    }

    impl CellAlloc for CountingAlloc {
        fn allocate(&self) -> Result<NonNull<i32>, HandleError> {
            let ptr = HeapAlloc.allocate()?;
            self.allocated.set(self.allocated.get() + 1);
            Ok(ptr)
        }

        unsafe fn release(&self, ptr: NonNull<i32>) {
            self.released.set(self.released.get() + 1);
            unsafe { HeapAlloc.release(ptr) };
        }
    }

    #[test]
    fn allocate_starts_present_and_zeroed() {
        let h = OwnedHandle::allocate().unwrap();
        assert!(h.is_present());
        assert_eq!(h.read().unwrap(), 0);
    }

    #[test]
    fn write_then_read_returns_value() {
        let mut h = OwnedHandle::allocate().unwrap();
        h.write(42).unwrap();
        assert_eq!(h.read().unwrap(), 42);
    }

    #[test]
    fn access_after_release_is_rejected() {
        let mut h = OwnedHandle::allocate().unwrap();
        h.release();
        assert!(!h.is_present());

        assert_eq!(
            h.read(),
            Err(HandleError::UseAfterRelease { op: "read" })
        );
        assert_eq!(
            h.write(1),
            Err(HandleError::UseAfterRelease { op: "write" })
        );
        assert_eq!(
            h.update(|v| v + 1),
            Err(HandleError::UseAfterRelease { op: "update" })
        );
    }

    #[test]
    fn release_is_idempotent() {
        let counters = CountingAlloc::default();
        let mut h = OwnedHandle::allocate_in(counters.clone()).unwrap();

        h.release();
        h.release();
        h.release();

        assert_eq!(counters.allocated.get(), 1);
        assert_eq!(counters.released.get(), 1);
        assert!(!h.is_present());
    }

    #[test]
    fn allocate_then_immediate_release_succeeds() {
        let mut h = OwnedHandle::allocate().unwrap();
        h.release();
        assert!(!h.is_present());
    }

    #[test]
    fn full_lifecycle_scenario() {
        let mut h = OwnedHandle::allocate().unwrap();
        h.write(42).unwrap();
        assert_eq!(h.read().unwrap(), 42);
        h.release();
        assert!(matches!(
            h.read(),
            Err(HandleError::UseAfterRelease { op: "read" })
        ));
        h.release(); // no-op, no error
    }

    #[test]
    fn exhausted_allocator_produces_no_handle() {
        let result = OwnedHandle::allocate_in(ExhaustedAlloc);
        assert!(matches!(result, Err(HandleError::Allocation)));
    }

    #[test]
    fn update_applies_function_value() {
        let mut h = OwnedHandle::allocate().unwrap();
        h.write(41).unwrap();
        assert_eq!(h.update(|v| v + 1).unwrap(), 42);
        assert_eq!(h.read().unwrap(), 42);
    }

    #[test]
    fn drop_releases_the_cell_exactly_once() {
        let counters = CountingAlloc::default();
        {
            let mut h = OwnedHandle::allocate_in(counters.clone()).unwrap();
            h.write(7).unwrap();
        }
        assert_eq!(counters.released.get(), 1);

        // An explicit release before drop must not release twice.
        {
            let mut h = OwnedHandle::allocate_in(counters.clone()).unwrap();
            h.release();
        }
        assert_eq!(counters.allocated.get(), 2);
        assert_eq!(counters.released.get(), 2);
    }

    proptest! {
        #[test]
        fn write_read_roundtrip(v: i32) {
            let mut h = OwnedHandle::allocate().unwrap();
            h.write(v).unwrap();
            prop_assert_eq!(h.read().unwrap(), v);
        }
    }
}
