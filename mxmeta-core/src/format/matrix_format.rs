//! Matrix storage format tag

use core::str::FromStr;

use crate::{MetaError, Result};

/// Layout of the matrix data handed across the API boundary
///
/// The text formats (`Csv`, `Ijv`) describe files or lines of text; the
/// `Df*` variants describe data-frame encodings where each row is either a
/// set of double columns or a single vector column, optionally preceded by
/// a row ID column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum MatrixFormat {
    /// Comma-separated values
    Csv = 0,
    /// Row index, column index, value triples (1-based)
    Ijv = 1,
    /// Data frame of doubles with a leading row ID column
    DfDoublesWithIndex = 2,
    /// Data frame of doubles without a row ID column
    DfDoubles = 3,
    /// Data frame with a row ID column and one vector column
    DfVectorWithIndex = 4,
    /// Data frame with one vector column
    DfVector = 5,
}

impl MatrixFormat {
    /// Every format, in tag order
    pub const ALL: [MatrixFormat; 6] = [
        MatrixFormat::Csv,
        MatrixFormat::Ijv,
        MatrixFormat::DfDoublesWithIndex,
        MatrixFormat::DfDoubles,
        MatrixFormat::DfVectorWithIndex,
        MatrixFormat::DfVector,
    ];

    /// Whether the data carries a row ID column
    pub const fn has_id_column(&self) -> bool {
        matches!(
            self,
            MatrixFormat::DfDoublesWithIndex | MatrixFormat::DfVectorWithIndex
        )
    }

    /// Whether each row is stored as a single vector column
    pub const fn is_vector_based(&self) -> bool {
        matches!(self, MatrixFormat::DfVectorWithIndex | MatrixFormat::DfVector)
    }

    /// Whether the format is a data-frame encoding
    pub const fn is_dataframe(&self) -> bool {
        !matches!(self, MatrixFormat::Csv | MatrixFormat::Ijv)
    }

    /// Lowercase name used in text representations
    pub const fn name(&self) -> &'static str {
        match self {
            MatrixFormat::Csv => "csv",
            MatrixFormat::Ijv => "ijv",
            MatrixFormat::DfDoublesWithIndex => "df_doubles_with_index",
            MatrixFormat::DfDoubles => "df_doubles",
            MatrixFormat::DfVectorWithIndex => "df_vector_with_index",
            MatrixFormat::DfVector => "df_vector",
        }
    }

    /// Tag used in the binary record
    pub const fn tag(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for MatrixFormat {
    type Error = MetaError;

    fn try_from(value: u8) -> Result<Self> {
        MatrixFormat::ALL
            .get(value as usize)
            .copied()
            .ok_or(MetaError::UnknownFormat)
    }
}

impl FromStr for MatrixFormat {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        MatrixFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or(MetaError::UnknownFormat)
    }
}

impl core::fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
