//! Unified error handling for the paged file and record-based file managers.
//!
//! Every fallible function in the crate returns [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Variants map directly onto the error
//! taxonomy the on-disk contract defines: callers can match on the category
//! without inspecting free-form strings.

use thiserror::Error;

/// The canonical error type for all paged-file and record-based-file
/// operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error originating from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `createFile` was called for a path that already exists.
    #[error("file already exists: {0}")]
    FileExists(String),

    /// `destroyFile` or `openFile` was called for a path that does not
    /// exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// `openFile` was called with a handle that is already bound to an
    /// open file.
    #[error("file handle is already bound to an open file")]
    AlreadyBound,

    /// An operation was attempted on a handle that is not bound to an open
    /// file.
    #[error("file handle is not bound to an open file")]
    NotBound,

    /// A page index was at or beyond the current page count.
    #[error("page {0} is out of bounds (file has {1} page(s))")]
    PageOob(u32, u32),

    /// A slot number was outside `[1, slot_count]`, or referred to a
    /// deleted record.
    #[error("slot {0} is invalid for page {1}")]
    SlotInvalid(u32, u32),

    /// The encoded record (plus its slot entry and the page trailer)
    /// cannot fit in a single page.
    #[error("record of {0} bytes is too large to fit on a page")]
    RecordTooLarge(usize),

    /// The requested attribute name does not appear in the record
    /// descriptor.
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    /// The operation is declared by the contract but not implemented by
    /// the current core (`deleteRecord`, `updateRecord`, `readAttribute`,
    /// `scan`).
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),
}

/// A specialized [`Result`] type for paged-file and record-based-file
/// operations.
pub type Result<T> = std::result::Result<T, Error>;
