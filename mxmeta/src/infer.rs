//! Metadata inference from text matrix data
//!
//! Scans CSV or IJV text and derives the row count, column count and
//! non-zero count. Lines are split into chunks that are scanned in parallel;
//! errors are reported for the first offending line in file order.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use rayon::prelude::*;
use tracing::debug;

use crate::config::{InferConfig, MetaConfig};
use crate::error::{Error, Result};
use mxmeta_core::{MatrixFormat, MatrixMetadata};

/// Per-chunk scan result
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ScanStats {
    rows: i64,
    cols: i64,
    nnz: i64,
}

impl ScanStats {
    fn merge_csv(self, other: Self) -> Self {
        Self {
            rows: self.rows + other.rows,
            cols: self.cols.max(other.cols),
            nnz: self.nnz + other.nnz,
        }
    }

    fn merge_ijv(self, other: Self) -> Self {
        Self {
            rows: self.rows.max(other.rows),
            cols: self.cols.max(other.cols),
            nnz: self.nnz + other.nnz,
        }
    }
}

/// Numbered, non-blank lines of `text` (1-based line numbers)
fn data_lines(text: &str) -> Vec<(usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line))
        .collect()
}

fn parse_value(token: &str, line: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| Error::parse(line, format!("invalid number '{token}'")))
}

fn csv_delimiter(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| Error::Config {
            key: "delimiter",
            value: delimiter.to_string(),
        })
}

fn csv_error(err: csv::Error) -> Error {
    let line = err.position().map_or(0, |pos| pos.line() as usize);
    Error::parse(line, err.to_string())
}

fn record_line(record: &StringRecord) -> usize {
    record.position().map_or(0, |pos| pos.line() as usize)
}

/// A record holding nothing but whitespace
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record[0].is_empty()
}

/// CSV records paired with their 1-based line, and the column count
///
/// The header, when enabled, is the first non-blank record and fixes the
/// width; otherwise the first data record does.
fn csv_records(text: &str, infer: &InferConfig) -> Result<(usize, Vec<(usize, StringRecord)>)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(csv_delimiter(infer.delimiter)?)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut header_width = None;
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if is_blank(&record) {
            continue;
        }
        if infer.header && header_width.is_none() {
            header_width = Some(record.len());
            continue;
        }
        records.push((record_line(&record), record));
    }

    let width = header_width
        .or_else(|| records.first().map(|(_, record)| record.len()))
        .unwrap_or(0);
    Ok((width, records))
}

fn scan_csv_chunk(chunk: &[(usize, StringRecord)], width: usize) -> Result<ScanStats> {
    let mut stats = ScanStats::default();
    for (line_no, record) in chunk {
        let line_no = *line_no;
        if record.len() != width {
            return Err(Error::parse(
                line_no,
                format!("expected {width} fields, found {}", record.len()),
            ));
        }
        for field in record.iter().filter(|field| !field.is_empty()) {
            if parse_value(field, line_no)? != 0.0 {
                stats.nnz += 1;
            }
        }
        stats.rows += 1;
    }
    stats.cols = width as i64;
    Ok(stats)
}

fn parse_index(token: &str, line: usize, what: &str) -> Result<i64> {
    let index: i64 = token
        .parse()
        .map_err(|_| Error::parse(line, format!("invalid {what} index '{token}'")))?;
    if index < 1 {
        return Err(Error::parse(
            line,
            format!("{what} index {index} is not 1-based"),
        ));
    }
    Ok(index)
}

fn scan_ijv_chunk(chunk: &[(usize, &str)]) -> Result<ScanStats> {
    let mut stats = ScanStats::default();
    for &(line_no, line) in chunk {
        let mut tokens = line.split_whitespace();
        let (Some(i), Some(j), Some(v), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(Error::parse(line_no, "expected 'row col value'"));
        };
        stats.rows = stats.rows.max(parse_index(i, line_no, "row")?);
        stats.cols = stats.cols.max(parse_index(j, line_no, "column")?);
        if parse_value(v, line_no)? != 0.0 {
            stats.nnz += 1;
        }
    }
    Ok(stats)
}

/// Run `scan` over chunks in parallel and fold results in file order
fn scan_chunks<T, F, M>(items: &[T], chunk_lines: usize, scan: F, merge: M) -> Result<ScanStats>
where
    T: Sync,
    F: Fn(&[T]) -> Result<ScanStats> + Send + Sync,
    M: Fn(ScanStats, ScanStats) -> ScanStats,
{
    let partials: Vec<Result<ScanStats>> = items.par_chunks(chunk_lines.max(1)).map(scan).collect();
    partials
        .into_iter()
        .try_fold(ScanStats::default(), |acc, partial| Ok(merge(acc, partial?)))
}

/// Infer metadata from in-memory text
///
/// Blank lines are ignored. CSV follows the usual quoting rules; empty
/// fields count as zero and the header, or else the first data line, fixes
/// the column count. Data-frame formats carry no text representation and
/// cannot be inferred.
pub fn infer_str(text: &str, format: MatrixFormat, config: &MetaConfig) -> Result<MatrixMetadata> {
    let infer = &config.infer;
    let stats = match format {
        MatrixFormat::Csv => {
            let (width, records) = csv_records(text, infer)?;
            debug!(%format, lines = records.len(), width, "scanning text matrix");
            let mut stats = scan_chunks(
                &records,
                infer.chunk_lines,
                |chunk| scan_csv_chunk(chunk, width),
                ScanStats::merge_csv,
            )?;
            stats.cols = width as i64;
            stats
        }
        MatrixFormat::Ijv => {
            let lines = data_lines(text);
            debug!(%format, lines = lines.len(), "scanning text matrix");
            scan_chunks(&lines, infer.chunk_lines, scan_ijv_chunk, ScanStats::merge_ijv)?
        }
        other => return Err(Error::UnsupportedFormat(other)),
    };

    let meta = MatrixMetadata::builder()
        .format(format)
        .rows(stats.rows)
        .columns(stats.cols)
        .non_zeros(stats.nnz)
        .block_size(config.default_block_size, config.default_block_size)
        .build();
    debug!(%meta, "inferred metadata");
    Ok(meta)
}

/// Infer metadata from a data file
pub fn infer_file<P: AsRef<Path>>(
    path: P,
    format: MatrixFormat,
    config: &MetaConfig,
) -> Result<MatrixMetadata> {
    let path = path.as_ref();
    debug!(path = %path.display(), %format, "inferring metadata from file");
    read_and_infer(path, format, config)
}

#[cfg(feature = "mmap")]
fn read_and_infer(path: &Path, format: MatrixFormat, config: &MetaConfig) -> Result<MatrixMetadata> {
    let file = std::fs::File::open(path)?;
    if file.metadata()?.len() == 0 {
        return infer_str("", format, config);
    }
    // SAFETY: the map is read-only and dropped before returning; concurrent
    // truncation of the file by another process is not supported.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    let text = std::str::from_utf8(&mmap)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    infer_str(text, format, config)
}

#[cfg(not(feature = "mmap"))]
fn read_and_infer(path: &Path, format: MatrixFormat, config: &MetaConfig) -> Result<MatrixMetadata> {
    let text = std::fs::read_to_string(path)?;
    infer_str(&text, format, config)
}
