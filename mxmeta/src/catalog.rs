//! Input catalog: the host-side record of script inputs and outputs
//!
//! Each binding names a script variable and carries the metadata the caller
//! expects it to have. Bindings come either from explicit metadata or from a
//! data file, in which case the `.mtd` sidecar wins over inference.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::MetaConfig;
use crate::error::{Error, Result};
use crate::infer::infer_file;
use crate::sidecar::load_metadata;
use mxmeta_core::{MatrixCharacteristics, MatrixFormat, MatrixMetadata, MetadataRegistry};

#[derive(Debug, Clone, Default)]
pub struct InputCatalog {
    config: MetaConfig,
    registry: MetadataRegistry,
}

impl InputCatalog {
    pub fn new(config: MetaConfig) -> Self {
        Self {
            config,
            registry: MetadataRegistry::new(),
        }
    }

    pub fn config(&self) -> &MetaConfig {
        &self.config
    }

    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    /// Bind `name` to explicit metadata
    ///
    /// With `validate_on_bind` set, metadata that fails validation is
    /// rejected and the catalog is left unchanged.
    pub fn bind(&mut self, name: &str, meta: MatrixMetadata) -> Result<Option<MatrixMetadata>> {
        if self.config.validate_on_bind {
            meta.validate().map_err(|source| Error::InvalidBinding {
                name: name.to_string(),
                source,
            })?;
        }
        let previous = self.registry.register(name, meta);
        if previous.is_some() {
            warn!(name, "replacing existing binding");
        }
        debug!(name, %meta, "bound input");
        Ok(previous)
    }

    /// Bind `name` to the metadata of a data file
    ///
    /// Uses the file's sidecar when present, filling in `format` if the
    /// sidecar leaves it unset; otherwise infers from the data.
    pub fn bind_file<P: AsRef<Path>>(
        &mut self,
        name: &str,
        path: P,
        format: MatrixFormat,
    ) -> Result<MatrixMetadata> {
        let path = path.as_ref();
        let meta = match load_metadata(path)? {
            Some(mut meta) => {
                if meta.matrix_format().is_none() {
                    meta.set_matrix_format(Some(format));
                }
                meta
            }
            None => infer_file(path, format, &self.config)?,
        };
        self.bind(name, meta)?;
        Ok(meta)
    }

    pub fn get(&self, name: &str) -> Option<&MatrixMetadata> {
        self.registry.get(name)
    }

    pub fn unbind(&mut self, name: &str) -> Option<MatrixMetadata> {
        self.registry.remove(name)
    }

    /// Engine characteristics for a binding, using the configured default
    /// block size where the binding leaves it unset
    pub fn characteristics(&self, name: &str) -> Option<MatrixCharacteristics> {
        self.registry
            .get(name)
            .map(|meta| meta.as_matrix_characteristics(self.config.default_block_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mxmeta_core::MetaError;

    #[test]
    fn test_bind_permissive_by_default() {
        let mut catalog = InputCatalog::new(MetaConfig::default());
        let odd = MatrixMetadata::builder().rows(1).columns(1).non_zeros(9).build();

        assert_eq!(catalog.bind("X", odd).unwrap(), None);
        assert_eq!(catalog.get("X"), Some(&odd));
    }

    #[test]
    fn test_bind_validating() {
        let mut catalog = InputCatalog::new(MetaConfig::default().with_validation(true));
        let odd = MatrixMetadata::builder().rows_per_block(0).build();

        let err = catalog.bind("X", odd).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidBinding { ref name, source: MetaError::NonPositiveBlockSize } if name == "X"
        ));
        assert!(catalog.get("X").is_none());
    }

    #[test]
    fn test_rebind_returns_previous() {
        let mut catalog = InputCatalog::default();
        let first = MatrixMetadata::with_dimensions(1, 2);
        catalog.bind("X", first).unwrap();

        let previous = catalog.bind("X", MatrixMetadata::new()).unwrap();
        assert_eq!(previous, Some(first));
        assert_eq!(catalog.unbind("X"), Some(MatrixMetadata::new()));
        assert!(catalog.registry().is_empty());
    }

    #[test]
    fn test_characteristics_use_configured_block() {
        let mut catalog = InputCatalog::new(MetaConfig::default().with_block_size(128));
        catalog
            .bind("X", MatrixMetadata::with_dimensions(300, 10))
            .unwrap();

        let mc = catalog.characteristics("X").unwrap();
        assert_eq!(mc, MatrixCharacteristics::new(300, 10, 128, 128, -1));
        assert_eq!(mc.num_row_blocks(), Some(3));
        assert!(catalog.characteristics("Y").is_none());
    }
}
