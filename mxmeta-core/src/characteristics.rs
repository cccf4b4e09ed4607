//! Runtime matrix characteristics
//!
//! The engine-side record of a matrix's shape. Unlike [`crate::MatrixMetadata`]
//! every field is always populated: unknown counts use the `-1` sentinel and
//! block sizes fall back to [`DEFAULT_BLOCK_SIZE`].

use crate::format::constants::{DEFAULT_BLOCK_SIZE, UNKNOWN};

/// Dimensions, non-zero count and block layout as the engine tracks them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixCharacteristics {
    rows: i64,
    cols: i64,
    rows_per_block: i32,
    cols_per_block: i32,
    non_zeros: i64,
}

impl Default for MatrixCharacteristics {
    fn default() -> Self {
        Self::unknown()
    }
}

impl MatrixCharacteristics {
    pub const fn new(
        rows: i64,
        cols: i64,
        rows_per_block: i32,
        cols_per_block: i32,
        non_zeros: i64,
    ) -> Self {
        Self {
            rows,
            cols,
            rows_per_block,
            cols_per_block,
            non_zeros,
        }
    }

    /// Nothing known, default block size
    pub const fn unknown() -> Self {
        Self::new(
            UNKNOWN,
            UNKNOWN,
            DEFAULT_BLOCK_SIZE,
            DEFAULT_BLOCK_SIZE,
            UNKNOWN,
        )
    }

    pub const fn rows(&self) -> i64 {
        self.rows
    }

    pub const fn cols(&self) -> i64 {
        self.cols
    }

    pub const fn rows_per_block(&self) -> i32 {
        self.rows_per_block
    }

    pub const fn cols_per_block(&self) -> i32 {
        self.cols_per_block
    }

    pub const fn non_zeros(&self) -> i64 {
        self.non_zeros
    }

    pub fn set_dimensions(&mut self, rows: i64, cols: i64) {
        self.rows = rows;
        self.cols = cols;
    }

    pub fn set_block_size(&mut self, rows_per_block: i32, cols_per_block: i32) {
        self.rows_per_block = rows_per_block;
        self.cols_per_block = cols_per_block;
    }

    pub fn set_non_zeros(&mut self, non_zeros: i64) {
        self.non_zeros = non_zeros;
    }

    /// Both dimensions are known (non-negative)
    pub const fn dims_known(&self) -> bool {
        self.rows >= 0 && self.cols >= 0
    }

    /// Non-zero count is known (non-negative)
    pub const fn nnz_known(&self) -> bool {
        self.non_zeros >= 0
    }

    /// Number of row blocks, rounding up
    ///
    /// `None` when the row count is unknown or the block size is not positive.
    pub const fn num_row_blocks(&self) -> Option<i64> {
        num_blocks(self.rows, self.rows_per_block)
    }

    /// Number of column blocks, rounding up
    pub const fn num_col_blocks(&self) -> Option<i64> {
        num_blocks(self.cols, self.cols_per_block)
    }
}

const fn num_blocks(len: i64, block: i32) -> Option<i64> {
    if len < 0 || block <= 0 {
        return None;
    }
    let block = block as i64;
    Some(len / block + (len % block != 0) as i64)
}

impl core::fmt::Display for MatrixCharacteristics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[{} x {}, nnz={}, blocks ({} x {})]",
            self.rows, self.cols, self.non_zeros, self.rows_per_block, self.cols_per_block
        )
    }
}
