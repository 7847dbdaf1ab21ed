//! Error types surfaced by handle operations.

use thiserror::Error;

/// Errors returned by [`OwnedHandle`](crate::OwnedHandle) operations.
///
/// Both conditions are immediately fatal to the operation attempted; there
/// is no retry path. A repeated `release` is not an error at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// Backing-storage acquisition failed. Unrecoverable locally; the
    /// caller observes it directly from `allocate`.
    #[error("allocation failed: backing storage could not be acquired")]
    Allocation,

    /// An access was attempted after the handle released its cell. This is
    /// a contract violation rejected deterministically, never answered with
    /// a stale or zeroed value.
    #[error("use after release: `{op}` called on a released handle")]
    UseAfterRelease {
        /// Name of the rejected operation.
        op: &'static str,
    },
}
