//! Shape validation utilities
//!
//! Pure checks on counts and block sizes. Nothing in this crate calls them
//! during construction; they back [`crate::MatrixMetadata::validate`].

pub mod shape;

pub use shape::{capacity, check_block_size, check_count, check_non_zeros};
