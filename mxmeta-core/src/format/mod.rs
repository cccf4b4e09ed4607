//! Storage format and binary record definitions
//!
//! Pure data definitions: the matrix storage format tag and the fixed-size
//! characteristics record. No I/O happens here.

pub mod constants;
pub mod matrix_format;
pub mod record;

pub use matrix_format::MatrixFormat;
pub use record::CharacteristicsRecord;
