//! Fixed-size binary record for matrix metadata
//!
//! The record is 40 bytes, little-endian, 8-byte aligned:
//!
//! ```text
//! 0..4    magic "MXMC"
//! 4       version
//! 5       format tag (0xFF = unset)
//! 6       presence bits
//! 7       reserved
//! 8..16   rows            i64
//! 16..24  columns         i64
//! 24..32  non-zeros       i64
//! 32..36  rows per block  i32
//! 36..40  cols per block  i32
//! ```

use bytemuck::{Pod, Zeroable};

use super::constants::record::*;
use crate::{MatrixFormat, MatrixMetadata, MetaError, Result};

/// On-disk layout of a characteristics record
///
/// Numeric fields hold little-endian values regardless of host byte order;
/// use [`CharacteristicsRecord::from_metadata`] and
/// [`CharacteristicsRecord::to_metadata`] rather than reading them directly.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct CharacteristicsRecord {
    pub magic: [u8; 4],
    pub version: u8,
    pub format: u8,
    pub presence: u8,
    pub reserved: u8,
    pub rows: i64,
    pub columns: i64,
    pub non_zeros: i64,
    pub rows_per_block: i32,
    pub columns_per_block: i32,
}

const _: () = assert!(core::mem::size_of::<CharacteristicsRecord>() == SIZE);

impl Default for CharacteristicsRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacteristicsRecord {
    /// Create an empty record: current version, no format, no fields
    pub const fn new() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            format: NO_FORMAT,
            presence: 0,
            reserved: 0,
            rows: 0,
            columns: 0,
            non_zeros: 0,
            rows_per_block: 0,
            columns_per_block: 0,
        }
    }

    /// Build a record describing `meta`
    pub fn from_metadata(meta: &MatrixMetadata) -> Self {
        let mut record = Self::new();
        if let Some(format) = meta.matrix_format() {
            record.format = format.tag();
        }
        if let Some(rows) = meta.num_rows() {
            record.presence |= HAS_ROWS;
            record.rows = rows.to_le();
        }
        if let Some(columns) = meta.num_columns() {
            record.presence |= HAS_COLUMNS;
            record.columns = columns.to_le();
        }
        if let Some(nnz) = meta.num_non_zeros() {
            record.presence |= HAS_NON_ZEROS;
            record.non_zeros = nnz.to_le();
        }
        if let Some(rows_per_block) = meta.num_rows_per_block() {
            record.presence |= HAS_ROWS_PER_BLOCK;
            record.rows_per_block = rows_per_block.to_le();
        }
        if let Some(columns_per_block) = meta.num_columns_per_block() {
            record.presence |= HAS_COLUMNS_PER_BLOCK;
            record.columns_per_block = columns_per_block.to_le();
        }
        record
    }

    /// Convert back into a metadata value
    pub fn to_metadata(&self) -> Result<MatrixMetadata> {
        let format = match self.format {
            NO_FORMAT => None,
            tag => Some(MatrixFormat::try_from(tag)?),
        };
        let has = |bit: u8| self.presence & bit != 0;

        let mut meta = MatrixMetadata::new();
        meta.set_matrix_format(format);
        meta.set_num_rows(has(HAS_ROWS).then(|| i64::from_le(self.rows)));
        meta.set_num_columns(has(HAS_COLUMNS).then(|| i64::from_le(self.columns)));
        meta.set_num_non_zeros(has(HAS_NON_ZEROS).then(|| i64::from_le(self.non_zeros)));
        meta.set_num_rows_per_block(
            has(HAS_ROWS_PER_BLOCK).then(|| i32::from_le(self.rows_per_block)),
        );
        meta.set_num_columns_per_block(
            has(HAS_COLUMNS_PER_BLOCK).then(|| i32::from_le(self.columns_per_block)),
        );
        Ok(meta)
    }

    /// Check magic, version and reserved bits
    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC
            && self.version <= VERSION
            && self.presence & !PRESENCE_MASK == 0
            && self.reserved == 0
    }

    /// Parse a record from the start of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < SIZE {
            return Err(MetaError::InsufficientBuffer);
        }

        let record: Self = bytemuck::pod_read_unaligned(&bytes[..SIZE]);

        if record.magic != MAGIC {
            return Err(MetaError::InvalidHeader);
        }
        if record.version > VERSION {
            return Err(MetaError::UnsupportedVersion);
        }
        if !record.is_valid() {
            return Err(MetaError::InvalidHeader);
        }
        if record.format != NO_FORMAT {
            MatrixFormat::try_from(record.format)?;
        }

        Ok(record)
    }

    /// Encode the record
    pub fn to_bytes(&self) -> [u8; SIZE] {
        let mut bytes = [0u8; SIZE];
        bytes.copy_from_slice(bytemuck::bytes_of(self));
        bytes
    }
}

impl MatrixMetadata {
    /// Encode into the fixed-size binary record
    pub fn to_record_bytes(&self) -> [u8; SIZE] {
        CharacteristicsRecord::from_metadata(self).to_bytes()
    }

    /// Decode from the fixed-size binary record
    pub fn from_record_bytes(bytes: &[u8]) -> Result<Self> {
        CharacteristicsRecord::from_bytes(bytes)?.to_metadata()
    }
}
