//! Named metadata bindings
//!
//! A script binds each input or output variable to the metadata the caller
//! expects it to have. The registry is that mapping.

use alloc::string::String;
use hashbrown::HashMap;

use crate::{MatrixMetadata, MetaError};

/// Variable name to [`MatrixMetadata`] mapping
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    entries: HashMap<String, MatrixMetadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `meta`, returning the metadata it replaces
    pub fn register(&mut self, name: impl Into<String>, meta: MatrixMetadata) -> Option<MatrixMetadata> {
        self.entries.insert(name.into(), meta)
    }

    pub fn get(&self, name: &str) -> Option<&MatrixMetadata> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MatrixMetadata> {
        self.entries.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<MatrixMetadata> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bindings in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatrixMetadata)> {
        self.entries.iter().map(|(name, meta)| (name.as_str(), meta))
    }

    /// Validate every binding
    ///
    /// Returns the name and error of a failing binding. With several
    /// failures, which one is reported is unspecified.
    pub fn validate_all(&self) -> Result<(), (&str, MetaError)> {
        for (name, meta) in self.iter() {
            meta.validate().map_err(|err| (name, err))?;
        }
        Ok(())
    }
}
