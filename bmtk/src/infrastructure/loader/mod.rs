// bmtk/src/infrastructure/loader/mod.rs
mod csv_loader;
mod json_loader;

use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::domain::bookmark::{BookmarkTable, FileFormat, RawTable};
use crate::domain::error::{DomainError, DomainResult};
use crate::infrastructure::encoding::{detect_encoding, TextEncoding};

pub use csv_loader::parse_csv;
pub use json_loader::parse_json;

/// Detected encoding first, then the fallbacks without duplicates
fn candidates(detected: TextEncoding, fallbacks: &[TextEncoding]) -> Vec<TextEncoding> {
    let mut list = vec![detected];
    for encoding in fallbacks {
        if !list.contains(encoding) {
            list.push(*encoding);
        }
    }
    list
}

/// Reads CSV/JSON bookmark exports into validated tables
#[derive(Debug, Default)]
pub struct BookmarkLoader;

impl BookmarkLoader {
    pub fn new() -> Self {
        Self
    }

    /// Loads and validates `path`. The format is inferred from the extension unless given.
    #[instrument(skip(self), level = "debug")]
    pub fn load(&self, path: &Path, format: Option<FileFormat>) -> DomainResult<BookmarkTable> {
        let raw = self.load_raw(path, format)?;
        let table = self.validate(raw)?;
        info!("Loaded {} bookmarks from {}", table.len(), path.display());
        Ok(table)
    }

    /// Loads without schema validation
    #[instrument(skip(self), level = "debug")]
    pub fn load_raw(&self, path: &Path, format: Option<FileFormat>) -> DomainResult<RawTable> {
        if !path.exists() {
            return Err(DomainError::FileNotFound(path.to_path_buf()));
        }

        let format = match format {
            Some(f) => f,
            None => FileFormat::from_path(path)?,
        };

        let bytes = fs::read(path)?;
        let detected = detect_encoding(&bytes);
        debug!("{}: format {}, detected encoding {}", path.display(), format, detected);

        let raw = match format {
            FileFormat::Csv => parse_csv(&bytes, detected),
            FileFormat::Json => parse_json(&bytes, detected),
        };
        raw.map_err(|e| e.context(path.display().to_string()))
    }

    /// Checks the required columns and converts to typed records
    pub fn validate(&self, raw: RawTable) -> DomainResult<BookmarkTable> {
        raw.into_table()
    }

    /// First `n` rows
    pub fn preview(&self, table: &BookmarkTable, n: usize) -> BookmarkTable {
        table.preview(n)
    }
}
