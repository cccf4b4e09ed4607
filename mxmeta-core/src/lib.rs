#![no_std]

//! mxmeta-core - Matrix metadata definitions
//!
//! This crate provides the value types a scripting API uses to describe a
//! matrix it hands to a matrix-computation engine: the storage format, the
//! shape, the non-zero count and the block layout.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod characteristics;
pub mod error;
pub mod format;
pub mod metadata;
#[cfg(feature = "alloc")]
pub mod registry;
pub mod validation;

pub use characteristics::MatrixCharacteristics;
pub use error::*;
pub use format::*;
pub use metadata::{MatrixMetadata, MatrixMetadataBuilder};
#[cfg(feature = "alloc")]
pub use registry::MetadataRegistry;
pub use validation::{check_block_size, check_count, check_non_zeros};
