//! # pagefile-db
//!
//! A paged file manager and record-based file manager: the bottom two
//! layers of a disk-resident storage engine. [`pfm`] abstracts a file as an
//! array of fixed-size pages with persistent I/O counters; [`rbfm`] lays a
//! slotted-page, nullable, typed record format on top.

pub mod error;
pub mod pfm;
pub mod rbfm;

pub use error::{Error, Result};
pub use pfm::{FileHandle, PagedFileConfig, PagedFileManager, PAGE_SIZE};
pub use rbfm::{
    Attribute, AttributeType, CompOp, FieldValue, RbfmScanIterator, RecordBasedFileManager, RID,
};
