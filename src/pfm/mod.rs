//! Low-level page I/O: the Paged File Manager.
//!
//! The [`PagedFileManager`] and [`FileHandle`] pair is the lowest-level
//! storage abstraction in the crate. A paged file is a flat sequence of
//! fixed-size **pages** ([`PAGE_SIZE`] = 4096 bytes each); a [`FileHandle`]
//! reads, writes, and appends pages by index and keeps a persistent count of
//! how many of each operation it has performed.
//!
//! Neither type knows anything about the *contents* of a page — they deal
//! exclusively in raw `[u8; PAGE_SIZE]` buffers. The record-based file
//! manager (see [`crate::rbfm`]) builds the slotted-page format on top.
//!
//! # Hidden page
//!
//! The first [`PAGE_SIZE`] bytes of every paged file are a hidden metadata
//! page, invisible to user page indices. It holds four little-endian `u32`
//! counters at fixed offsets:
//!
//! | offset | field               |
//! |--------|---------------------|
//! | 0      | `total_user_pages`  |
//! | 4      | `read_counter`      |
//! | 8      | `write_counter`     |
//! | 12     | `append_counter`    |
//!
//! The remaining bytes are reserved and zero-filled at creation. User page
//! `p` lives at byte offset `(p + 1) * PAGE_SIZE`, i.e. immediately after
//! the hidden page.
//!
//! Every successful read/write/append increments the matching counter and
//! persists it to the hidden page immediately; the hidden-page write itself
//! is never counted (otherwise the counters would be self-referential).

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Every page in a paged file is exactly this many bytes, including the
/// hidden metadata page.
pub const PAGE_SIZE: usize = 4096;

/// Construction-time configuration for a paged file.
///
/// The on-disk format fixes [`PAGE_SIZE`] as a compile-time constant — the
/// hidden-page offsets and the slotted-page layout in [`crate::rbfm`] are
/// only correct for that one page size. This struct exists so callers
/// construct files through one validated, explicit parameter rather than a
/// `4096` literal scattered through call sites; [`PagedFileConfig::validate`]
/// is the single place that rejects any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagedFileConfig {
    /// The page size new files are created with, in bytes.
    pub page_size: usize,
}

impl PagedFileConfig {
    /// Check that this configuration is one the current core can honor.
    pub fn validate(&self) -> Result<()> {
        if self.page_size != PAGE_SIZE {
            return Err(Error::Unimplemented(
                "page sizes other than the canonical PAGE_SIZE are not supported",
            ));
        }
        Ok(())
    }
}

impl Default for PagedFileConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
        }
    }
}

const TOTAL_PAGES_OFFSET: u64 = 0;
const READ_COUNTER_OFFSET: u64 = 4;
const WRITE_COUNTER_OFFSET: u64 = 8;
const APPEND_COUNTER_OFFSET: u64 = 12;

/// A zero-based user page number. Page 0 is the first *user* page; the
/// hidden metadata page is not addressable through this type.
pub type PageNum = u32;

/// A page-sized buffer.
pub type PageBuf = [u8; PAGE_SIZE];

/// Creates, destroys, opens, and closes paged files.
///
/// Unlike the course reference this is modeled on, this is not a process-wide
/// singleton: it is a zero-sized value whose associated functions operate
/// directly on paths and [`FileHandle`]s, so callers own their own state.
pub struct PagedFileManager;

impl PagedFileManager {
    /// Create a new paged file at `path` using the default configuration
    /// (the canonical [`PAGE_SIZE`]).
    ///
    /// Fails with [`Error::FileExists`] if a file already exists there.
    pub fn create_file(path: impl AsRef<Path>) -> Result<()> {
        Self::create_file_with_config(path, PagedFileConfig::default())
    }

    /// Create a new paged file at `path` with an explicit [`PagedFileConfig`].
    ///
    /// Fails with [`Error::FileExists`] if a file already exists there, or
    /// if `config` does not [`PagedFileConfig::validate`]. Otherwise writes
    /// a hidden metadata page with all four counters set to zero, flushes,
    /// and closes the file; the resulting file length is exactly
    /// `config.page_size`.
    pub fn create_file_with_config(path: impl AsRef<Path>, config: PagedFileConfig) -> Result<()> {
        config.validate()?;

        let path = path.as_ref();
        if path.exists() {
            return Err(Error::FileExists(path.display().to_string()));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        let hidden_page = vec![0u8; config.page_size];
        file.write_all(&hidden_page)?;
        file.flush()?;

        debug!(path = %path.display(), page_size = config.page_size, "created paged file");
        Ok(())
    }

    /// Remove the paged file at `path`.
    ///
    /// Fails with [`Error::NotFound`] if the file does not exist, or with
    /// [`Error::Io`] if it exists but cannot be removed.
    pub fn destroy_file(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        std::fs::remove_file(path)?;
        debug!(path = %path.display(), "destroyed paged file");
        Ok(())
    }

    /// Open the paged file at `path` and bind it to `handle`.
    ///
    /// Fails with [`Error::AlreadyBound`] if `handle` is already bound to
    /// another open file. On success, the handle's in-memory counter
    /// mirrors are loaded from the hidden page.
    pub fn open_file(path: impl AsRef<Path>, handle: &mut FileHandle) -> Result<()> {
        if handle.is_bound() {
            return Err(Error::AlreadyBound);
        }

        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        handle.bind(file, path.to_path_buf())?;

        debug!(path = %path.display(), "opened paged file");
        Ok(())
    }

    /// Close `handle`, flushing pending writes and unbinding it.
    ///
    /// Fails with [`Error::NotBound`] if the handle is not currently bound.
    pub fn close_file(handle: &mut FileHandle) -> Result<()> {
        handle.unbind()
    }
}

/// An open paged file.
///
/// Created unbound via [`FileHandle::new`]; bound by
/// [`PagedFileManager::open_file`]; unbound by
/// [`PagedFileManager::close_file`]. At most one `FileHandle` may be bound
/// to a given path at a time (the crate does not enforce this across
/// processes — see the crate-level concurrency notes).
#[derive(Debug, Default)]
pub struct FileHandle {
    file: Option<File>,
    file_name: Option<PathBuf>,
    total_user_pages: u32,
    read_counter: u32,
    write_counter: u32,
    append_counter: u32,
}

impl FileHandle {
    /// Create a new, unbound file handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// The name of the bound file, if any.
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// Whether this handle is currently bound to an open file.
    pub fn is_bound(&self) -> bool {
        self.file.is_some()
    }

    /// Read page `page_num` into `buf`.
    ///
    /// `page_num` must be strictly less than [`FileHandle::get_number_of_pages`].
    /// Increments and persists `read_counter` on success.
    pub fn read_page(&mut self, page_num: PageNum, buf: &mut PageBuf) -> Result<()> {
        self.check_page_bounds(page_num)?;

        let offset = user_page_offset(page_num);
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;

        self.read_counter += 1;
        let new_count = self.read_counter;
        self.write_counter_field(READ_COUNTER_OFFSET, new_count)?;

        trace!(page_num, "read page");
        Ok(())
    }

    /// Write `buf` to page `page_num`.
    ///
    /// `page_num` must be strictly less than [`FileHandle::get_number_of_pages`].
    /// Flushes and persists an incremented `write_counter` on success.
    pub fn write_page(&mut self, page_num: PageNum, buf: &PageBuf) -> Result<()> {
        self.check_page_bounds(page_num)?;

        let offset = user_page_offset(page_num);
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(buf)?;
        file.flush()?;

        self.write_counter += 1;
        let new_count = self.write_counter;
        self.write_counter_field(WRITE_COUNTER_OFFSET, new_count)?;

        trace!(page_num, "wrote page");
        Ok(())
    }

    /// Append `buf` as a new page at the end of the file.
    ///
    /// Flushes and persists incremented `append_counter` and
    /// `total_user_pages` on success. Returns the index of the newly
    /// appended page.
    pub fn append_page(&mut self, buf: &PageBuf) -> Result<PageNum> {
        let new_page_num = self.total_user_pages;

        let file = self.file_mut()?;
        file.seek(SeekFrom::End(0))?;
        file.write_all(buf)?;
        file.flush()?;

        self.append_counter += 1;
        let new_append_count = self.append_counter;
        self.write_counter_field(APPEND_COUNTER_OFFSET, new_append_count)?;

        self.total_user_pages += 1;
        let new_total = self.total_user_pages;
        self.write_counter_field(TOTAL_PAGES_OFFSET, new_total)?;

        trace!(page_num = new_page_num, "appended page");
        Ok(new_page_num)
    }

    /// The persistent total number of user pages in the file.
    pub fn get_number_of_pages(&self) -> u32 {
        self.total_user_pages
    }

    /// Fetch the in-memory mirrors of the three I/O counters
    /// `(read, write, append)`.
    pub fn collect_counter_values(&self) -> (u32, u32, u32) {
        (self.read_counter, self.write_counter, self.append_counter)
    }

    // -----------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------

    fn bind(&mut self, file: File, file_name: PathBuf) -> Result<()> {
        self.file = Some(file);
        self.file_name = Some(file_name);
        self.load_counters()
    }

    fn unbind(&mut self) -> Result<()> {
        if !self.is_bound() {
            return Err(Error::NotBound);
        }
        if let Some(file) = &self.file {
            file.sync_all()?;
        }
        self.file = None;
        self.file_name = None;
        Ok(())
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(Error::NotBound)
    }

    fn check_page_bounds(&self, page_num: PageNum) -> Result<()> {
        if !self.is_bound() {
            return Err(Error::NotBound);
        }
        if page_num >= self.total_user_pages {
            return Err(Error::PageOob(page_num, self.total_user_pages));
        }
        Ok(())
    }

    /// Load all four counters from the hidden page into the in-memory
    /// mirrors. Called once, right after binding.
    fn load_counters(&mut self) -> Result<()> {
        let file = self.file.as_mut().ok_or(Error::NotBound)?;
        let mut hidden = [0u8; PAGE_SIZE];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut hidden)?;

        self.total_user_pages = read_u32_le(&hidden, TOTAL_PAGES_OFFSET as usize);
        self.read_counter = read_u32_le(&hidden, READ_COUNTER_OFFSET as usize);
        self.write_counter = read_u32_le(&hidden, WRITE_COUNTER_OFFSET as usize);
        self.append_counter = read_u32_le(&hidden, APPEND_COUNTER_OFFSET as usize);
        Ok(())
    }

    /// Persist a single counter field to the hidden page without touching
    /// the rest of it, and without affecting any counter (this write is
    /// deliberately not counted).
    fn write_counter_field(&mut self, offset: u64, value: u32) -> Result<()> {
        let file = self.file.as_mut().ok_or(Error::NotBound)?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&value.to_le_bytes())?;
        file.flush()?;
        Ok(())
    }
}

/// Logical page index `p` maps to byte offset `(p + 1) * PAGE_SIZE`, i.e.
/// immediately after the hidden page.
fn user_page_offset(page_num: PageNum) -> u64 {
    (page_num as u64 + 1) * PAGE_SIZE as u64
}

fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
}
