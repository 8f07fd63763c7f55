//! Slotted-page record storage: the Record-Based File Manager.
//!
//! [`RecordBasedFileManager`] lays a typed, nullable record format onto the
//! pages a [`crate::pfm::PagedFileManager`] hands back. Every user page is a
//! **slotted page**: records are packed from byte 0 upward, and a slot
//! directory plus an 8-byte trailer grow downward from the end of the page.
//!
//! ```text
//! [ record 0 | record 1 | ... | free space | slot 2 | slot 1 | slot_count | used_space ]
//!  0                                                                              PAGE_SIZE
//! ```
//!
//! A record's on-page form differs from the form callers pass in: see
//! [`encode_record`] and [`decode_record`] for the exact translation.

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::pfm::{FileHandle, PageBuf, PageNum, PagedFileManager, PAGE_SIZE};

/// Fixed 8-byte trailer at the end of every user page: `slot_count` then
/// `used_space`, each a little-endian `u32`.
const TRAILER_SIZE: usize = 8;
/// Size of one slot directory entry: `(record_offset, record_length)`.
const SLOT_ENTRY_SIZE: usize = 8;

/// The three scalar types a field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// 4-byte little-endian signed integer.
    Int,
    /// 4-byte IEEE-754 little-endian float.
    Real,
    /// Variable-length string, up to `length` bytes.
    VarChar,
}

/// One column of a record descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Column name.
    pub name: String,
    /// Column type.
    pub r#type: AttributeType,
    /// Maximum byte length for `VarChar`; the native width (4) for `Int`/`Real`.
    pub length: u32,
}

impl Attribute {
    /// Construct a new attribute.
    pub fn new(name: impl Into<String>, r#type: AttributeType, length: u32) -> Self {
        Self {
            name: name.into(),
            r#type,
            length,
        }
    }
}

/// A record descriptor: the ordered list of attributes a record conforms to.
/// Supplied by the caller on every operation; never persisted on the page.
pub type RecordDescriptor = [Attribute];

/// A value for one field of a record, used by [`print_record`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Field is null.
    Null,
    Int(i32),
    Real(f32),
    VarChar(Vec<u8>),
}

/// Record identifier: the page and 1-based slot a record lives at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RID {
    pub page_num: PageNum,
    pub slot_num: u32,
}

impl RID {
    pub fn new(page_num: PageNum, slot_num: u32) -> Self {
        Self {
            page_num,
            slot_num,
        }
    }
}

/// Comparison operator for [`RecordBasedFileManager::scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    Ne,
    /// No comparison; every record matches (used for unconditional scans).
    NoOp,
}

/// Placeholder iterator type for the future `scan` extension.
///
/// The current core has no query predicate evaluator, so there is nothing
/// to iterate; this type exists so the `scan` signature in the contract has
/// somewhere to put its output once implemented.
#[derive(Debug, Default)]
pub struct RbfmScanIterator;

impl Iterator for RbfmScanIterator {
    type Item = RID;

    fn next(&mut self) -> Option<RID> {
        None
    }
}

/// Builds and interprets the slotted-page record format over a
/// [`PagedFileManager`].
pub struct RecordBasedFileManager;

impl RecordBasedFileManager {
    /// See [`PagedFileManager::create_file`].
    pub fn create_file(path: impl AsRef<std::path::Path>) -> Result<()> {
        PagedFileManager::create_file(path)
    }

    /// See [`PagedFileManager::destroy_file`].
    pub fn destroy_file(path: impl AsRef<std::path::Path>) -> Result<()> {
        PagedFileManager::destroy_file(path)
    }

    /// See [`PagedFileManager::open_file`].
    pub fn open_file(path: impl AsRef<std::path::Path>, handle: &mut FileHandle) -> Result<()> {
        PagedFileManager::open_file(path, handle)
    }

    /// See [`PagedFileManager::close_file`].
    pub fn close_file(handle: &mut FileHandle) -> Result<()> {
        PagedFileManager::close_file(handle)
    }

    /// Insert `input` (external encoding, see [`decode_external`]) into
    /// `handle` according to `descriptor`, returning the new record's RID.
    ///
    /// Placement policy: try the last page first, then scan pages
    /// `0..last` in order, then append a new page. See the module-level
    /// layout diagram for the slotted-page format each page is given.
    pub fn insert_record(
        handle: &mut FileHandle,
        descriptor: &RecordDescriptor,
        input: &[u8],
    ) -> Result<RID> {
        let fields = decode_external(descriptor, input)?;
        let encoded = encode_record(&fields);
        let total_len = encoded.len();

        if total_len + SLOT_ENTRY_SIZE + TRAILER_SIZE > PAGE_SIZE {
            warn!(total_len, "rejected insert: record too large");
            return Err(Error::RecordTooLarge(total_len));
        }

        let num_pages = handle.get_number_of_pages();

        if num_pages == 0 {
            let rid = place_record_on_new_page(handle, &encoded)?;
            debug!(?rid, total_len, "inserted record onto fresh page");
            return Ok(rid);
        }

        let last = num_pages - 1;
        let mut page_buf = [0u8; PAGE_SIZE];
        handle.read_page(last, &mut page_buf)?;
        if record_fits(&page_buf, total_len) {
            let rid = place_record_on_existing_page(handle, last, page_buf, &encoded)?;
            debug!(?rid, total_len, "inserted record onto last page");
            return Ok(rid);
        }

        for page_num in 0..last {
            handle.read_page(page_num, &mut page_buf)?;
            if record_fits(&page_buf, total_len) {
                let rid = place_record_on_existing_page(handle, page_num, page_buf, &encoded)?;
                debug!(?rid, total_len, "inserted record after rescan");
                return Ok(rid);
            }
        }

        let rid = place_record_on_new_page(handle, &encoded)?;
        debug!(?rid, total_len, "inserted record onto newly appended page");
        Ok(rid)
    }

    /// Read the record at `rid` (per `descriptor`) into the external
    /// encoding, appended to `out`.
    pub fn read_record(
        handle: &mut FileHandle,
        descriptor: &RecordDescriptor,
        rid: RID,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        let mut page = [0u8; PAGE_SIZE];
        handle.read_page(rid.page_num, &mut page)?;

        let slot_count = read_u32(&page, PAGE_SIZE - TRAILER_SIZE);
        if rid.slot_num == 0 || rid.slot_num > slot_count {
            return Err(Error::SlotInvalid(rid.slot_num, rid.page_num));
        }

        let (rec_offset, rec_length) = slot_entry(&page, rid.slot_num);
        let record = &page[rec_offset as usize..(rec_offset + rec_length) as usize];
        let fields = decode_record(descriptor, record)?;
        out.extend_from_slice(&encode_external(descriptor, &fields));

        trace!(?rid, "read record");
        Ok(())
    }

    /// Render `external_record` (the format [`read_record`] emits) as
    /// `"<name>: <value>"` lines, one per attribute in descriptor order.
    pub fn print_record(
        descriptor: &RecordDescriptor,
        external_record: &[u8],
        out: &mut String,
    ) -> Result<()> {
        let fields = decode_external(descriptor, external_record)?;
        for (attr, value) in descriptor.iter().zip(fields.iter()) {
            match value {
                FieldValue::Null => out.push_str(&format!("{}: NULL\n", attr.name)),
                FieldValue::Int(v) => out.push_str(&format!("{}: {}\n", attr.name, v)),
                FieldValue::Real(v) => out.push_str(&format!("{}: {}\n", attr.name, v)),
                FieldValue::VarChar(v) => {
                    out.push_str(&format!("{}: {}\n", attr.name, String::from_utf8_lossy(v)))
                }
            }
        }
        Ok(())
    }

    /// Mark `rid`'s slot as free so subsequent reads return
    /// [`Error::SlotInvalid`].
    ///
    /// Not implemented by the current core.
    pub fn delete_record(_handle: &mut FileHandle, _rid: RID) -> Result<()> {
        Err(Error::Unimplemented("delete_record"))
    }

    /// Replace the record at `rid` with `input`, relocating it if the new
    /// encoding does not fit in the old slot.
    ///
    /// Not implemented by the current core.
    pub fn update_record(
        _handle: &mut FileHandle,
        _descriptor: &RecordDescriptor,
        _rid: RID,
        _input: &[u8],
    ) -> Result<()> {
        Err(Error::Unimplemented("update_record"))
    }

    /// Decode only the named attribute of the record at `rid`, skipping the
    /// others via the field-end directory.
    ///
    /// Not implemented by the current core.
    pub fn read_attribute(
        _handle: &mut FileHandle,
        _descriptor: &RecordDescriptor,
        _rid: RID,
        _attribute_name: &str,
        _out: &mut Vec<u8>,
    ) -> Result<()> {
        Err(Error::Unimplemented("read_attribute"))
    }

    /// Open an iterator over RIDs whose `condition_attr` satisfies
    /// `comp_op value`, projecting `projected_attrs`.
    ///
    /// Not implemented by the current core.
    pub fn scan(
        _handle: &mut FileHandle,
        _descriptor: &RecordDescriptor,
        _condition_attr: &str,
        _comp_op: CompOp,
        _value: Option<&[u8]>,
        _projected_attrs: &[String],
    ) -> Result<RbfmScanIterator> {
        Err(Error::Unimplemented("scan"))
    }
}

/// Build a brand-new page containing `encoded` and append it once. The page
/// is fully assembled in memory first, so no write follows the append.
fn place_record_on_new_page(handle: &mut FileHandle, encoded: &[u8]) -> Result<RID> {
    let mut page = new_empty_page();
    let slot_num = write_record_into_page(&mut page, encoded);
    let page_num = handle.append_page(&page)?;
    Ok(RID::new(page_num, slot_num))
}

/// Write `encoded` into `page_num`'s slot directory, starting from its
/// current contents `page`, and persist it with a single `write_page`.
fn place_record_on_existing_page(
    handle: &mut FileHandle,
    page_num: PageNum,
    mut page: PageBuf,
    encoded: &[u8],
) -> Result<RID> {
    let slot_num = write_record_into_page(&mut page, encoded);
    handle.write_page(page_num, &page)?;
    Ok(RID::new(page_num, slot_num))
}

/// Append `encoded` to `page`'s record area and register it in the slot
/// directory, returning the newly assigned 1-based slot number.
fn write_record_into_page(page: &mut PageBuf, encoded: &[u8]) -> u32 {
    let mut slot_count = read_u32(page, PAGE_SIZE - TRAILER_SIZE);
    let mut used_space = read_u32(page, PAGE_SIZE - 4);

    let offset = used_space;
    let length = encoded.len() as u32;
    page[offset as usize..(offset + length) as usize].copy_from_slice(encoded);

    used_space += length;
    slot_count += 1;
    write_slot_entry(page, slot_count, offset, length);
    write_u32(page, PAGE_SIZE - TRAILER_SIZE, slot_count);
    write_u32(page, PAGE_SIZE - 4, used_space);

    slot_count
}

/// A page freshly produced by `new_empty_page` (or read from disk) with
/// `slot_count == 0` and `used_space == 0`.
fn new_empty_page() -> PageBuf {
    let mut page = [0u8; PAGE_SIZE];
    write_u32(&mut page, PAGE_SIZE - TRAILER_SIZE, 0);
    write_u32(&mut page, PAGE_SIZE - 4, 0);
    page
}

/// Whether a record of `record_len` bytes fits on `page`, per the free-space
/// invariant: `used_space + record_len + 8 (slot) + 8 (trailer) <= PAGE_SIZE`,
/// restated against the page's *current* slot count.
fn record_fits(page: &PageBuf, record_len: usize) -> bool {
    let slot_count = read_u32(page, PAGE_SIZE - TRAILER_SIZE) as usize;
    let used_space = read_u32(page, PAGE_SIZE - 4) as usize;
    used_space + record_len + SLOT_ENTRY_SIZE + TRAILER_SIZE
        <= PAGE_SIZE - SLOT_ENTRY_SIZE * slot_count
}

/// Read the `(record_offset, record_length)` slot entry for 1-based
/// `slot_num`.
fn slot_entry(page: &PageBuf, slot_num: u32) -> (u32, u32) {
    let base = PAGE_SIZE - TRAILER_SIZE - (slot_num as usize) * SLOT_ENTRY_SIZE;
    (read_u32(page, base), read_u32(page, base + 4))
}

fn write_slot_entry(page: &mut PageBuf, slot_num: u32, offset: u32, length: u32) {
    let base = PAGE_SIZE - TRAILER_SIZE - (slot_num as usize) * SLOT_ENTRY_SIZE;
    write_u32(page, base, offset);
    write_u32(page, base + 4, length);
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
}

fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn null_bitmap_len(num_fields: usize) -> usize {
    (num_fields + 7) / 8
}

fn is_null(bitmap: &[u8], i: usize) -> bool {
    let byte = bitmap[i / 8];
    let bit = 7 - (i % 8);
    (byte >> bit) & 1 == 1
}

fn set_null(bitmap: &mut [u8], i: usize) {
    let bit = 7 - (i % 8);
    bitmap[i / 8] |= 1 << bit;
}

/// Parse the external encoding (null bitmap + per-field payloads, see the
/// crate-level on-disk format notes) into a `FieldValue` per attribute.
fn decode_external(descriptor: &RecordDescriptor, input: &[u8]) -> Result<Vec<FieldValue>> {
    let n = descriptor.len();
    let bitmap_len = null_bitmap_len(n);
    let bitmap = &input[..bitmap_len];
    let mut cursor = bitmap_len;

    let mut fields = Vec::with_capacity(n);
    for (i, attr) in descriptor.iter().enumerate() {
        if is_null(bitmap, i) {
            fields.push(FieldValue::Null);
            continue;
        }
        match attr.r#type {
            AttributeType::Int => {
                let v = i32::from_le_bytes(input[cursor..cursor + 4].try_into().unwrap());
                cursor += 4;
                fields.push(FieldValue::Int(v));
            }
            AttributeType::Real => {
                let v = f32::from_le_bytes(input[cursor..cursor + 4].try_into().unwrap());
                cursor += 4;
                fields.push(FieldValue::Real(v));
            }
            AttributeType::VarChar => {
                let len = read_u32(input, cursor) as usize;
                cursor += 4;
                let bytes = input[cursor..cursor + len].to_vec();
                cursor += len;
                fields.push(FieldValue::VarChar(bytes));
            }
        }
    }
    Ok(fields)
}

/// Inverse of [`decode_external`]: render `fields` back into the external
/// encoding.
fn encode_external(descriptor: &RecordDescriptor, fields: &[FieldValue]) -> Vec<u8> {
    let n = descriptor.len();
    let bitmap_len = null_bitmap_len(n);
    let mut out = vec![0u8; bitmap_len];

    for (i, value) in fields.iter().enumerate() {
        if matches!(value, FieldValue::Null) {
            set_null(&mut out, i);
            continue;
        }
        match value {
            FieldValue::Int(v) => out.extend_from_slice(&v.to_le_bytes()),
            FieldValue::Real(v) => out.extend_from_slice(&v.to_le_bytes()),
            FieldValue::VarChar(bytes) => {
                out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
                out.extend_from_slice(bytes);
            }
            FieldValue::Null => unreachable!(),
        }
    }
    out
}

/// Encode `fields` into the on-page internal format: `num_fields` (4B),
/// null bitmap, field-end directory (N x 4B), then concatenated non-null
/// payloads. Null fields repeat the previous field-end offset.
fn encode_record(fields: &[FieldValue]) -> Vec<u8> {
    let n = fields.len();
    let bitmap_len = null_bitmap_len(n);
    let header_size = 4 + bitmap_len + 4 * n;

    let mut bitmap = vec![0u8; bitmap_len];
    let mut payload = Vec::new();
    let mut directory = Vec::with_capacity(n);
    let mut running_offset = header_size as u32;

    for (i, value) in fields.iter().enumerate() {
        match value {
            FieldValue::Null => {
                set_null(&mut bitmap, i);
            }
            FieldValue::Int(v) => {
                payload.extend_from_slice(&v.to_le_bytes());
                running_offset += 4;
            }
            FieldValue::Real(v) => {
                payload.extend_from_slice(&v.to_le_bytes());
                running_offset += 4;
            }
            FieldValue::VarChar(bytes) => {
                payload.extend_from_slice(bytes);
                running_offset += bytes.len() as u32;
            }
        }
        directory.push(running_offset);
    }

    let mut out = Vec::with_capacity(header_size + payload.len());
    out.extend_from_slice(&(n as u32).to_le_bytes());
    out.extend_from_slice(&bitmap);
    for end in &directory {
        out.extend_from_slice(&end.to_le_bytes());
    }
    out.extend_from_slice(&payload);
    out
}

/// Inverse of [`encode_record`]: parse the on-page internal format back into
/// per-attribute `FieldValue`s, using `descriptor` to interpret payload
/// bytes by type.
fn decode_record(descriptor: &RecordDescriptor, record: &[u8]) -> Result<Vec<FieldValue>> {
    let num_fields = read_u32(record, 0) as usize;
    if num_fields != descriptor.len() {
        return Err(Error::AttributeNotFound(format!(
            "descriptor has {} attributes but record has {num_fields}",
            descriptor.len()
        )));
    }

    let bitmap_len = null_bitmap_len(num_fields);
    let bitmap = &record[4..4 + bitmap_len];
    let directory_start = 4 + bitmap_len;
    let header_size = directory_start + 4 * num_fields;

    let mut fields = Vec::with_capacity(num_fields);
    let mut prev_end = header_size as u32;

    for (i, attr) in descriptor.iter().enumerate() {
        let end = read_u32(record, directory_start + i * 4);
        if is_null(bitmap, i) {
            fields.push(FieldValue::Null);
            prev_end = end;
            continue;
        }

        let start = prev_end as usize;
        let slice = &record[start..end as usize];
        let value = match attr.r#type {
            AttributeType::Int => FieldValue::Int(i32::from_le_bytes(slice.try_into().unwrap())),
            AttributeType::Real => FieldValue::Real(f32::from_le_bytes(slice.try_into().unwrap())),
            AttributeType::VarChar => FieldValue::VarChar(slice.to_vec()),
        };
        fields.push(value);
        prev_end = end;
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pfm::PagedFileManager;
    use tempfile::NamedTempFile;

    fn temp_path() -> std::path::PathBuf {
        let tmp = NamedTempFile::new().expect("failed to create temp file");
        let path = tmp.path().to_path_buf();
        drop(tmp);
        std::fs::remove_file(&path).ok();
        path
    }

    fn sample_descriptor() -> Vec<Attribute> {
        vec![
            Attribute::new("a", AttributeType::Int, 4),
            Attribute::new("b", AttributeType::VarChar, 50),
            Attribute::new("c", AttributeType::Real, 4),
        ]
    }

    fn encode_sample(a: Option<i32>, b: Option<&str>, c: Option<f32>) -> Vec<u8> {
        let mut bitmap = vec![0u8; 1];
        if a.is_none() {
            set_null(&mut bitmap, 0);
        }
        if b.is_none() {
            set_null(&mut bitmap, 1);
        }
        if c.is_none() {
            set_null(&mut bitmap, 2);
        }
        let mut out = bitmap;
        if let Some(v) = a {
            out.extend_from_slice(&v.to_le_bytes());
        }
        if let Some(v) = b {
            out.extend_from_slice(&(v.len() as u32).to_le_bytes());
            out.extend_from_slice(v.as_bytes());
        }
        if let Some(v) = c {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    #[test]
    fn insert_and_read_round_trip() {
        let path = temp_path();
        RecordBasedFileManager::create_file(&path).unwrap();
        let mut handle = FileHandle::new();
        RecordBasedFileManager::open_file(&path, &mut handle).unwrap();

        let descriptor = sample_descriptor();
        let r1 = encode_sample(Some(7), Some("hi"), Some(3.5));
        let rid1 = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &r1).unwrap();
        assert_eq!(rid1, RID::new(0, 1));

        let mut out = Vec::new();
        RecordBasedFileManager::read_record(&mut handle, &descriptor, rid1, &mut out).unwrap();
        assert_eq!(out, r1);

        RecordBasedFileManager::close_file(&mut handle).unwrap();
        RecordBasedFileManager::destroy_file(&path).unwrap();
    }

    #[test]
    fn insert_second_record_gets_next_slot() {
        let path = temp_path();
        RecordBasedFileManager::create_file(&path).unwrap();
        let mut handle = FileHandle::new();
        RecordBasedFileManager::open_file(&path, &mut handle).unwrap();

        let descriptor = sample_descriptor();
        let r1 = encode_sample(Some(7), Some("hi"), Some(3.5));
        RecordBasedFileManager::insert_record(&mut handle, &descriptor, &r1).unwrap();

        let r2 = encode_sample(None, Some("x"), None);
        let rid2 = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &r2).unwrap();
        assert_eq!(rid2, RID::new(0, 2));

        let mut out = Vec::new();
        RecordBasedFileManager::read_record(&mut handle, &descriptor, rid2, &mut out).unwrap();
        assert_eq!(out, r2);

        RecordBasedFileManager::close_file(&mut handle).unwrap();
        RecordBasedFileManager::destroy_file(&path).unwrap();
    }

    #[test]
    fn all_null_record_round_trips() {
        let path = temp_path();
        RecordBasedFileManager::create_file(&path).unwrap();
        let mut handle = FileHandle::new();
        RecordBasedFileManager::open_file(&path, &mut handle).unwrap();

        let descriptor = sample_descriptor();
        let r = encode_sample(None, None, None);
        let rid = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &r).unwrap();

        let mut out = Vec::new();
        RecordBasedFileManager::read_record(&mut handle, &descriptor, rid, &mut out).unwrap();
        assert_eq!(out, r);
        assert_eq!(out.len(), 1);

        RecordBasedFileManager::close_file(&mut handle).unwrap();
        RecordBasedFileManager::destroy_file(&path).unwrap();
    }

    #[test]
    fn empty_varchar_round_trips() {
        let path = temp_path();
        RecordBasedFileManager::create_file(&path).unwrap();
        let mut handle = FileHandle::new();
        RecordBasedFileManager::open_file(&path, &mut handle).unwrap();

        let descriptor = sample_descriptor();
        let r = encode_sample(Some(1), Some(""), Some(0.0));
        let rid = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &r).unwrap();

        let mut out = Vec::new();
        RecordBasedFileManager::read_record(&mut handle, &descriptor, rid, &mut out).unwrap();
        assert_eq!(out, r);

        RecordBasedFileManager::close_file(&mut handle).unwrap();
        RecordBasedFileManager::destroy_file(&path).unwrap();
    }

    #[test]
    fn oversized_record_is_rejected() {
        let path = temp_path();
        RecordBasedFileManager::create_file(&path).unwrap();
        let mut handle = FileHandle::new();
        RecordBasedFileManager::open_file(&path, &mut handle).unwrap();

        let descriptor = vec![Attribute::new("b", AttributeType::VarChar, PAGE_SIZE as u32)];
        let huge = "x".repeat(PAGE_SIZE);
        let mut input = vec![0u8];
        input.extend_from_slice(&(huge.len() as u32).to_le_bytes());
        input.extend_from_slice(huge.as_bytes());

        let err = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &input)
            .unwrap_err();
        assert!(matches!(err, Error::RecordTooLarge(_)));

        RecordBasedFileManager::close_file(&mut handle).unwrap();
        RecordBasedFileManager::destroy_file(&path).unwrap();
    }

    #[test]
    fn filling_a_page_forces_a_new_page() {
        let path = temp_path();
        RecordBasedFileManager::create_file(&path).unwrap();
        let mut handle = FileHandle::new();
        RecordBasedFileManager::open_file(&path, &mut handle).unwrap();

        let descriptor = vec![Attribute::new("b", AttributeType::VarChar, 3900)];
        let payload = "x".repeat(3900);
        let mut input = vec![0u8];
        input.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        input.extend_from_slice(payload.as_bytes());

        let rid1 = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &input).unwrap();
        assert_eq!(rid1, RID::new(0, 1));

        let rid2 = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &input).unwrap();
        assert_eq!(rid2, RID::new(1, 1));
        assert_eq!(handle.get_number_of_pages(), 2);
        // Both records land on freshly appended pages, so no write_page call
        // is ever needed.
        assert_eq!(handle.collect_counter_values(), (0, 0, 2));

        RecordBasedFileManager::close_file(&mut handle).unwrap();
        RecordBasedFileManager::destroy_file(&path).unwrap();
    }

    #[test]
    fn read_invalid_slot_fails() {
        let path = temp_path();
        RecordBasedFileManager::create_file(&path).unwrap();
        let mut handle = FileHandle::new();
        RecordBasedFileManager::open_file(&path, &mut handle).unwrap();

        let descriptor = sample_descriptor();
        let r1 = encode_sample(Some(1), Some("a"), Some(1.0));
        RecordBasedFileManager::insert_record(&mut handle, &descriptor, &r1).unwrap();

        let mut out = Vec::new();
        let err = RecordBasedFileManager::read_record(
            &mut handle,
            &descriptor,
            RID::new(0, 5),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, Error::SlotInvalid(5, 0)));

        RecordBasedFileManager::close_file(&mut handle).unwrap();
        RecordBasedFileManager::destroy_file(&path).unwrap();
    }

    #[test]
    fn print_record_formats_every_field() {
        let descriptor = sample_descriptor();
        let r = encode_sample(Some(7), Some("hi"), Some(3.5));
        let mut out = String::new();
        RecordBasedFileManager::print_record(&descriptor, &r, &mut out).unwrap();
        assert_eq!(out, "a: 7\nb: hi\nc: 3.5\n");
    }

    #[test]
    fn print_record_shows_nulls() {
        let descriptor = sample_descriptor();
        let r = encode_sample(None, Some("x"), None);
        let mut out = String::new();
        RecordBasedFileManager::print_record(&descriptor, &r, &mut out).unwrap();
        assert_eq!(out, "a: NULL\nb: x\nc: NULL\n");
    }

    #[test]
    fn extension_operations_are_unimplemented() {
        let path = temp_path();
        RecordBasedFileManager::create_file(&path).unwrap();
        let mut handle = FileHandle::new();
        RecordBasedFileManager::open_file(&path, &mut handle).unwrap();
        let descriptor = sample_descriptor();

        assert!(matches!(
            RecordBasedFileManager::delete_record(&mut handle, RID::new(0, 1)),
            Err(Error::Unimplemented(_))
        ));
        assert!(matches!(
            RecordBasedFileManager::update_record(&mut handle, &descriptor, RID::new(0, 1), &[]),
            Err(Error::Unimplemented(_))
        ));
        let mut out = Vec::new();
        assert!(matches!(
            RecordBasedFileManager::read_attribute(
                &mut handle,
                &descriptor,
                RID::new(0, 1),
                "a",
                &mut out
            ),
            Err(Error::Unimplemented(_))
        ));
        assert!(matches!(
            RecordBasedFileManager::scan(
                &mut handle,
                &descriptor,
                "a",
                CompOp::NoOp,
                None,
                &[]
            ),
            Err(Error::Unimplemented(_))
        ));

        RecordBasedFileManager::close_file(&mut handle).unwrap();
        RecordBasedFileManager::destroy_file(&path).unwrap();
    }
}
