//! Count, block size and capacity checks

use crate::MetaError;

/// A row, column or non-zero count must not be negative
pub const fn check_count(count: i64) -> Result<(), MetaError> {
    if count < 0 {
        return Err(MetaError::NegativeCount);
    }
    Ok(())
}

/// A block dimension must be strictly positive
pub const fn check_block_size(block: i32) -> Result<(), MetaError> {
    if block <= 0 {
        return Err(MetaError::NonPositiveBlockSize);
    }
    Ok(())
}

/// Number of cells in a `rows x columns` matrix
///
/// Negative dimensions are rejected before multiplying.
pub const fn capacity(rows: i64, columns: i64) -> Result<i64, MetaError> {
    if rows < 0 || columns < 0 {
        return Err(MetaError::NegativeCount);
    }
    match rows.checked_mul(columns) {
        Some(cells) => Ok(cells),
        None => Err(MetaError::CapacityOverflow),
    }
}

/// The non-zero count must fit in the matrix
///
/// An overflowing capacity is larger than any `i64` count, so it never
/// rejects a non-negative `nnz`.
pub const fn check_non_zeros(rows: i64, columns: i64, nnz: i64) -> Result<(), MetaError> {
    if let Err(err) = check_count(nnz) {
        return Err(err);
    }
    match capacity(rows, columns) {
        Ok(cells) if nnz > cells => Err(MetaError::NonZerosExceedCapacity),
        Ok(_) | Err(MetaError::CapacityOverflow) => Ok(()),
        Err(err) => Err(err),
    }
}
