//! # owned-cell
//!
//! A teaching-sized crate for safe lifecycle management of an owned heap
//! resource accessed through a handle.
//!
//! The classic C pattern for avoiding a dangling pointer is caller
//! discipline: `free` the allocation, then remember to null out the raw
//! pointer by hand. [`OwnedHandle`] replaces that discipline with structure.
//! The handle is a two-state lifecycle object: the only way its cell can be
//! freed is through its own [`release`](OwnedHandle::release), which also
//! flips the internal state checked by every later access, so a use after
//! release is rejected with an error instead of reading freed memory.
//!
//! ## What the handle guarantees
//!
//! - Access (`read`, `write`, `update`) works only while the cell is live.
//! - `release` is idempotent: a second call is a no-op, never a double-free.
//! - A handle that goes out of scope releases its cell automatically.
//! - No `Clone`, no rebinding: one handle owns exactly one allocation.
//!
//! ## Running the demo
//!
//! ```bash
//! cargo run --bin lifecycle_demo
//! ```
//!
//! The driver walks the full lifecycle (allocate, write, read, update,
//! release, rejected access, repeated release, allocation failure) and exits
//! non-zero if any step misbehaves.

mod alloc;
mod error;
mod handle;

pub use alloc::{CellAlloc, ExhaustedAlloc, HeapAlloc};
pub use error::HandleError;
pub use handle::OwnedHandle;
