//! JSON metadata sidecar files
//!
//! A data file `X.csv` is described by `X.csv.mtd`, a small JSON document
//! holding the shape, block layout and format. Unset metadata fields are
//! omitted from the document.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::InferConfig;
use crate::error::{Error, Result};
use mxmeta_core::{MatrixFormat, MatrixMetadata};

/// Extension appended to a data file's name
pub const SIDECAR_EXTENSION: &str = "mtd";

const MATRIX: &str = "matrix";
const DOUBLE: &str = "double";

/// Path of the sidecar describing `data_path`
pub fn sidecar_path<P: AsRef<Path>>(data_path: P) -> PathBuf {
    let mut name: OsString = data_path.as_ref().as_os_str().to_owned();
    name.push(".");
    name.push(SIDECAR_EXTENSION);
    PathBuf::from(name)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Contents of a `.mtd` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFile {
    pub data_type: String,
    #[serde(default = "default_value_type")]
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_in_block: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols_in_block: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nnz: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<MatrixFormat>,
    /// CSV only: first line is a header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<bool>,
    /// CSV only: field separator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sep: Option<String>,
}

fn default_value_type() -> String {
    DOUBLE.to_string()
}

impl MetadataFile {
    pub fn from_metadata(meta: &MatrixMetadata) -> Self {
        Self {
            data_type: MATRIX.to_string(),
            value_type: default_value_type(),
            rows: meta.num_rows(),
            cols: meta.num_columns(),
            rows_in_block: meta.num_rows_per_block(),
            cols_in_block: meta.num_columns_per_block(),
            nnz: meta.num_non_zeros(),
            format: meta.matrix_format(),
            header: None,
            sep: None,
        }
    }

    /// Record CSV parsing options alongside the shape
    pub fn with_csv_options(mut self, header: bool, delimiter: char) -> Self {
        self.header = Some(header);
        self.sep = Some(delimiter.to_string());
        self
    }

    /// Sidecar for metadata inferred with `infer`; CSV data also records
    /// the header flag and delimiter it was read with
    pub fn for_inferred(meta: &MatrixMetadata, infer: &InferConfig) -> Self {
        let file = Self::from_metadata(meta);
        match meta.matrix_format() {
            Some(MatrixFormat::Csv) => file.with_csv_options(infer.header, infer.delimiter),
            _ => file,
        }
    }

    /// The described metadata, ignoring `data_type` and CSV options
    pub fn to_metadata(&self) -> MatrixMetadata {
        let mut meta = MatrixMetadata::new();
        meta.set_matrix_format(self.format);
        meta.set_num_rows(self.rows);
        meta.set_num_columns(self.cols);
        meta.set_num_non_zeros(self.nnz);
        meta.set_num_rows_per_block(self.rows_in_block);
        meta.set_num_columns_per_block(self.cols_in_block);
        meta
    }

    pub fn is_matrix(&self) -> bool {
        self.data_type.eq_ignore_ascii_case(MATRIX)
    }

    /// Parse a sidecar document; `path` is only used in errors
    pub fn from_json(text: &str, path: &Path) -> Result<Self> {
        let file: Self = serde_json::from_str(text)?;
        if !file.is_matrix() {
            return Err(Error::NotAMatrix {
                path: path.to_path_buf(),
                data_type: file.data_type,
            });
        }
        Ok(file)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and check a sidecar file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file = Self::from_json(&text, path)?;
        debug!(path = %path.display(), "read metadata sidecar");
        Ok(file)
    }

    /// Write the sidecar through a temporary file and rename it into place
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        let temp = temp_path(path);
        let written = std::fs::write(&temp, json).and_then(|()| std::fs::rename(&temp, path));
        if let Err(err) = written {
            let _ = std::fs::remove_file(&temp);
            return Err(err.into());
        }
        info!(path = %path.display(), "wrote metadata sidecar");
        Ok(())
    }

    #[cfg(feature = "async")]
    pub async fn read_async<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        let file = Self::from_json(&text, path)?;
        debug!(path = %path.display(), "read metadata sidecar");
        Ok(file)
    }

    #[cfg(feature = "async")]
    pub async fn write_async<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use tokio::io::AsyncWriteExt;

        let path = path.as_ref();
        let temp = temp_path(path);
        let json = self.to_json()?;

        let written: std::io::Result<()> = async {
            let mut file = tokio::fs::File::create(&temp).await?;
            file.write_all(json.as_bytes()).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&temp, path).await
        }
        .await;
        if let Err(err) = written {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(err.into());
        }
        info!(path = %path.display(), "wrote metadata sidecar");
        Ok(())
    }
}

/// Load the metadata for `data_path` from its sidecar, if one exists
pub fn load_metadata<P: AsRef<Path>>(data_path: P) -> Result<Option<MatrixMetadata>> {
    let path = sidecar_path(data_path);
    if !path.exists() {
        debug!(path = %path.display(), "no metadata sidecar");
        return Ok(None);
    }
    MetadataFile::read(&path).map(|file| Some(file.to_metadata()))
}

/// Write `meta` to the sidecar of `data_path`
pub fn save_metadata<P: AsRef<Path>>(data_path: P, meta: &MatrixMetadata) -> Result<PathBuf> {
    let path = sidecar_path(data_path);
    MetadataFile::from_metadata(meta).write(&path)?;
    Ok(path)
}

/// Write inferred `meta` to the sidecar of `data_path`, keeping the CSV
/// options it was read with
pub fn save_inferred<P: AsRef<Path>>(
    data_path: P,
    meta: &MatrixMetadata,
    infer: &InferConfig,
) -> Result<PathBuf> {
    let path = sidecar_path(data_path);
    MetadataFile::for_inferred(meta, infer).write(&path)?;
    Ok(path)
}
