#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV persistence for scraped tables.
//!
//! Every pipeline writes its output through [`write_table`] (full
//! overwrite) or [`append_rows`] (one row at a time, used by resumable
//! scrapes). Files are UTF-8 with a header row. [`paths::DataDir`] names the
//! files.

pub mod paths;

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use hoops_models::Table;

pub use paths::DataDir;

/// Errors that can occur reading or writing CSV files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A file or directory operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The CSV could not be parsed or written.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: csv::Error,
    },
}

/// Quoting applied when writing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Quote only fields that need it.
    #[default]
    Necessary,
    /// Quote every field.
    Always,
}

impl From<QuoteStyle> for csv::QuoteStyle {
    fn from(style: QuoteStyle) -> Self {
        match style {
            QuoteStyle::Necessary => Self::Necessary,
            QuoteStyle::Always => Self::Always,
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> StoreError + '_ {
    move |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Creates the parent directory of `path` if needed.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the directory cannot be created.
pub fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_err(parent))
        }
        _ => Ok(()),
    }
}

/// Writes `table` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be created or written.
pub fn write_table(path: &Path, table: &Table, style: QuoteStyle) -> Result<(), StoreError> {
    ensure_parent(path)?;
    let mut writer = csv::WriterBuilder::new()
        .quote_style(style.into())
        .from_path(path)
        .map_err(csv_err(path))?;

    writer.write_record(table.headers()).map_err(csv_err(path))?;
    for row in table.rows() {
        writer.write_record(row).map_err(csv_err(path))?;
    }
    writer.flush().map_err(io_err(path))?;

    log::info!("Wrote {} row(s) to {}", table.len(), path.display());
    Ok(())
}

/// Reads a CSV file with a header row into a [`Table`].
///
/// Short rows are padded with empty cells.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be opened or parsed.
pub fn read_table(path: &Path) -> Result<Table, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err(path))?;

    let headers = reader.headers().map_err(csv_err(path))?.clone();
    let mut table = Table::new(headers.iter());
    for record in reader.records() {
        let record = record.map_err(csv_err(path))?;
        table.push_row(record.iter().map(str::to_owned).collect());
    }
    Ok(table)
}

/// Like [`read_table`], but returns `None` when the file does not exist.
///
/// # Errors
///
/// Returns [`StoreError`] if the file exists but cannot be read.
pub fn read_table_if_exists(path: &Path) -> Result<Option<Table>, StoreError> {
    if path.exists() {
        read_table(path).map(Some)
    } else {
        Ok(None)
    }
}

/// Replaces `path` with a file holding only the header row.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be written.
pub fn reset(path: &Path, headers: &[&str]) -> Result<(), StoreError> {
    write_table(path, &Table::new(headers.iter().copied()), QuoteStyle::Necessary)
}

/// Appends rows to `path`, writing `headers` first if the file is new or
/// empty.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be opened or written.
pub fn append_rows(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<(), StoreError> {
    ensure_parent(path)?;
    let is_new = !matches!(fs::metadata(path), Ok(m) if m.len() > 0);
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err(path))?;

    let mut writer = csv::Writer::from_writer(file);
    if is_new {
        writer.write_record(headers).map_err(csv_err(path))?;
    }
    for row in rows {
        writer.write_record(row).map_err(csv_err(path))?;
    }
    writer.flush().map_err(io_err(path))
}
