//! Matrix metadata passed alongside a matrix across the scripting API
//!
//! A [`MatrixMetadata`] is a description, not a guarantee: every field is
//! optional, and construction accepts whatever it is given. Callers that
//! want the implied shape invariants checked call
//! [`MatrixMetadata::validate`] explicitly.

use crate::format::constants::UNKNOWN;
use crate::validation::{check_block_size, check_count, check_non_zeros};
use crate::{MatrixCharacteristics, MatrixFormat, Result};

/// Matrix metadata: the storage format, the number of rows, the number of
/// columns, the number of non-zero values, the number of rows per block,
/// and the number of columns per block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixMetadata {
    matrix_format: Option<MatrixFormat>,
    num_rows: Option<i64>,
    num_columns: Option<i64>,
    num_non_zeros: Option<i64>,
    num_rows_per_block: Option<i32>,
    num_columns_per_block: Option<i32>,
}

impl MatrixMetadata {
    /// Metadata with every field unset
    pub const fn new() -> Self {
        Self {
            matrix_format: None,
            num_rows: None,
            num_columns: None,
            num_non_zeros: None,
            num_rows_per_block: None,
            num_columns_per_block: None,
        }
    }

    /// Builder starting with every field unset
    pub fn builder() -> MatrixMetadataBuilder {
        MatrixMetadataBuilder::default()
    }

    /// Metadata carrying only a matrix format
    pub fn with_format(format: MatrixFormat) -> Self {
        Self::builder().format(format).build()
    }

    /// Metadata carrying only the number of rows and columns
    pub fn with_dimensions(rows: impl Into<i64>, columns: impl Into<i64>) -> Self {
        Self::builder().rows(rows).columns(columns).build()
    }

    pub fn matrix_format(&self) -> Option<MatrixFormat> {
        self.matrix_format
    }

    pub fn set_matrix_format(&mut self, matrix_format: Option<MatrixFormat>) {
        self.matrix_format = matrix_format;
    }

    pub fn num_rows(&self) -> Option<i64> {
        self.num_rows
    }

    pub fn set_num_rows(&mut self, num_rows: Option<i64>) {
        self.num_rows = num_rows;
    }

    pub fn num_columns(&self) -> Option<i64> {
        self.num_columns
    }

    pub fn set_num_columns(&mut self, num_columns: Option<i64>) {
        self.num_columns = num_columns;
    }

    pub fn num_non_zeros(&self) -> Option<i64> {
        self.num_non_zeros
    }

    pub fn set_num_non_zeros(&mut self, num_non_zeros: Option<i64>) {
        self.num_non_zeros = num_non_zeros;
    }

    pub fn num_rows_per_block(&self) -> Option<i32> {
        self.num_rows_per_block
    }

    pub fn set_num_rows_per_block(&mut self, num_rows_per_block: Option<i32>) {
        self.num_rows_per_block = num_rows_per_block;
    }

    pub fn num_columns_per_block(&self) -> Option<i32> {
        self.num_columns_per_block
    }

    pub fn set_num_columns_per_block(&mut self, num_columns_per_block: Option<i32>) {
        self.num_columns_per_block = num_columns_per_block;
    }

    /// Overwrite the five numeric fields from a characteristics record
    ///
    /// Values are copied verbatim, `-1` sentinels included. The format is
    /// left untouched.
    pub fn set_matrix_characteristics(&mut self, mc: &MatrixCharacteristics) {
        self.num_rows = Some(mc.rows());
        self.num_columns = Some(mc.cols());
        self.num_non_zeros = Some(mc.non_zeros());
        self.num_rows_per_block = Some(mc.rows_per_block());
        self.num_columns_per_block = Some(mc.cols_per_block());
    }

    /// Build the engine-side record
    ///
    /// Unset counts become `-1`; unset block sizes become `default_block_size`.
    pub fn as_matrix_characteristics(&self, default_block_size: i32) -> MatrixCharacteristics {
        MatrixCharacteristics::new(
            self.num_rows.unwrap_or(UNKNOWN),
            self.num_columns.unwrap_or(UNKNOWN),
            self.num_rows_per_block.unwrap_or(default_block_size),
            self.num_columns_per_block.unwrap_or(default_block_size),
            self.num_non_zeros.unwrap_or(UNKNOWN),
        )
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }

    /// Check the implied shape invariants
    ///
    /// Counts must be non-negative, block sizes positive, and the non-zero
    /// count must fit in `rows * columns` when all three are present.
    /// Reports the first violation found.
    pub fn validate(&self) -> Result<()> {
        for count in [self.num_rows, self.num_columns, self.num_non_zeros]
            .into_iter()
            .flatten()
        {
            check_count(count)?;
        }
        for block in [self.num_rows_per_block, self.num_columns_per_block]
            .into_iter()
            .flatten()
        {
            check_block_size(block)?;
        }
        if let (Some(rows), Some(columns), Some(nnz)) =
            (self.num_rows, self.num_columns, self.num_non_zeros)
        {
            check_non_zeros(rows, columns, nnz)?;
        }
        Ok(())
    }
}

impl From<&MatrixCharacteristics> for MatrixMetadata {
    fn from(mc: &MatrixCharacteristics) -> Self {
        let mut meta = Self::new();
        meta.set_matrix_characteristics(mc);
        meta
    }
}

impl From<MatrixCharacteristics> for MatrixMetadata {
    fn from(mc: MatrixCharacteristics) -> Self {
        Self::from(&mc)
    }
}

struct Field<T>(Option<T>);

impl<T: core::fmt::Display> core::fmt::Display for Field<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.0 {
            Some(value) => core::fmt::Display::fmt(value, f),
            None => f.write_str("None"),
        }
    }
}

impl core::fmt::Display for MatrixMetadata {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "rows: {}, columns: {}, non-zeros: {}, rows per block: {}, columns per block: {}, format: {}",
            Field(self.num_rows),
            Field(self.num_columns),
            Field(self.num_non_zeros),
            Field(self.num_rows_per_block),
            Field(self.num_columns_per_block),
            Field(self.matrix_format),
        )
    }
}

/// Builder for [`MatrixMetadata`]
///
/// Every setter is optional; anything not set stays unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixMetadataBuilder {
    meta: MatrixMetadata,
}

impl MatrixMetadataBuilder {
    pub fn format(mut self, format: MatrixFormat) -> Self {
        self.meta.matrix_format = Some(format);
        self
    }

    pub fn rows(mut self, rows: impl Into<i64>) -> Self {
        self.meta.num_rows = Some(rows.into());
        self
    }

    pub fn columns(mut self, columns: impl Into<i64>) -> Self {
        self.meta.num_columns = Some(columns.into());
        self
    }

    pub fn non_zeros(mut self, non_zeros: impl Into<i64>) -> Self {
        self.meta.num_non_zeros = Some(non_zeros.into());
        self
    }

    pub fn rows_per_block(mut self, rows_per_block: impl Into<i32>) -> Self {
        self.meta.num_rows_per_block = Some(rows_per_block.into());
        self
    }

    pub fn columns_per_block(mut self, columns_per_block: impl Into<i32>) -> Self {
        self.meta.num_columns_per_block = Some(columns_per_block.into());
        self
    }

    /// Set both block dimensions
    pub fn block_size(self, rows_per_block: impl Into<i32>, columns_per_block: impl Into<i32>) -> Self {
        self.rows_per_block(rows_per_block)
            .columns_per_block(columns_per_block)
    }

    pub fn build(self) -> MatrixMetadata {
        self.meta
    }
}
