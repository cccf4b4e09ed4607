//! mxmeta - Matrix metadata for a scripting API boundary
//!
//! This library describes the matrices a host program passes to a
//! matrix-computation engine and keeps those descriptions next to the data.
//!
//! ## Architecture
//!
//! - **mxmeta-core**: value types, the binary record and validation (no I/O)
//! - **mxmeta**: sidecar files, inference from text data, configuration and
//!   the input catalog
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mxmeta::{InputCatalog, MatrixFormat, MatrixMetadata, MetaConfig};
//!
//! fn example() -> mxmeta::Result<()> {
//!     let mut catalog = InputCatalog::new(MetaConfig::default());
//!
//!     // Describe an input explicitly
//!     catalog.bind("X", MatrixMetadata::with_dimensions(100, 50))?;
//!
//!     // Or pick it up from a data file and its .mtd sidecar
//!     let meta = catalog.bind_file("Y", "data/y.csv", MatrixFormat::Csv)?;
//!     println!("Y: {meta}");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap**: memory-map data files during inference
//! - **async**: tokio-based sidecar I/O
//! - **cli**: the `mxmeta` command-line tool

pub use mxmeta_core::{
    // Value types
    MatrixCharacteristics, MatrixFormat, MatrixMetadata, MatrixMetadataBuilder,
    MetadataRegistry,
    // Binary record
    CharacteristicsRecord,
    // Errors and validation
    MetaError, check_block_size, check_count, check_non_zeros,
};
pub use mxmeta_core::format::constants::DEFAULT_BLOCK_SIZE;

pub mod catalog;
pub mod config;
pub mod error;
pub mod infer;
pub mod sidecar;

pub use catalog::InputCatalog;
pub use config::{InferConfig, MetaConfig};
pub use error::{Error, Result};
pub use infer::{infer_file, infer_str};
pub use sidecar::{sidecar_path, MetadataFile};
