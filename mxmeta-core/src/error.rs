//! Error types for matrix metadata operations

/// Errors that can occur while validating or decoding matrix metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaError {
    /// A row, column or non-zero count is negative
    NegativeCount,
    /// A block dimension is zero or negative
    NonPositiveBlockSize,
    /// The non-zero count exceeds rows * columns
    NonZerosExceedCapacity,
    /// rows * columns does not fit in 64 bits
    CapacityOverflow,
    /// Unknown matrix format name or tag
    UnknownFormat,
    /// Invalid record header (magic or reserved bits)
    InvalidHeader,
    /// Record version newer than this crate understands
    UnsupportedVersion,
    /// Buffer too small to hold a record
    InsufficientBuffer,
}

impl core::fmt::Display for MetaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            MetaError::NegativeCount => "Negative row, column or non-zero count",
            MetaError::NonPositiveBlockSize => "Block size must be positive",
            MetaError::NonZerosExceedCapacity => "Non-zero count exceeds matrix capacity",
            MetaError::CapacityOverflow => "Matrix capacity overflows 64 bits",
            MetaError::UnknownFormat => "Unknown matrix format",
            MetaError::InvalidHeader => "Invalid characteristics record header",
            MetaError::UnsupportedVersion => "Unsupported record version",
            MetaError::InsufficientBuffer => "Insufficient buffer space",
        };
        write!(f, "{msg}")
    }
}

/// Result type for metadata operations
pub type Result<T> = core::result::Result<T, MetaError>;

impl core::error::Error for MetaError {}
