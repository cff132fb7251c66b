// bmtk/src/domain/bookmark.rs
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

pub const COL_TITLE: &str = "Title";
pub const COL_URL: &str = "URL";
pub const COL_FOLDER_NAME: &str = "Folder Name";
pub const COL_FOLDER_PATH: &str = "Folder Path";
pub const COL_POSITION: &str = "Position";
pub const COL_CREATED_TIME: &str = "Created Time";
pub const COL_MODIFIED_TIME: &str = "Modified Time";
pub const COL_ID: &str = "ID";
pub const COL_GUID: &str = "Guid";
pub const COL_WEB_BROWSER: &str = "Web Browser";
pub const COL_BOOKMARKS_FILE: &str = "Bookmarks File";

/// Columns every bookmark export must provide. `Modified Time` is optional.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_TITLE,
    COL_URL,
    COL_FOLDER_NAME,
    COL_FOLDER_PATH,
    COL_POSITION,
    COL_CREATED_TIME,
    COL_ID,
    COL_GUID,
    COL_WEB_BROWSER,
    COL_BOOKMARKS_FILE,
];

/// Separator used inside `Folder Path`
pub const FOLDER_SEPARATOR: char = '\\';

/// Input/output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
        }
    }

    /// Infer the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> DomainResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        ext.parse().map_err(|_| {
            DomainError::UnsupportedFormat(format!(
                "Unsupported file extension: '{}' ({})",
                ext,
                path.display()
            ))
        })
    }
}

impl FromStr for FileFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            other => Err(DomainError::UnsupportedFormat(format!(
                "Unsupported file type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of a bookmark export, all cells kept as text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Folder Name")]
    pub folder_name: String,
    #[serde(rename = "Folder Path")]
    pub folder_path: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Created Time")]
    pub created_time: String,
    #[serde(rename = "Modified Time", default)]
    pub modified_time: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Guid")]
    pub guid: String,
    #[serde(rename = "Web Browser")]
    pub web_browser: String,
    #[serde(rename = "Bookmarks File")]
    pub bookmarks_file: String,
}

/// Untyped table as read from disk: header names plus text cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Required column names that are absent, in a stable (sorted) order
    pub fn missing_columns(&self) -> Vec<String> {
        let mut missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();
        missing.sort();
        missing
    }

    pub fn validate_schema(&self) -> DomainResult<()> {
        let missing = self.missing_columns();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::missing_columns(missing))
        }
    }

    /// Convert into typed records; fails with `SchemaError` when required columns are absent
    pub fn into_table(self) -> DomainResult<BookmarkTable> {
        self.validate_schema()?;

        // validated above, every required lookup succeeds
        let idx = |name: &str| self.column_index(name).unwrap_or(usize::MAX);
        let title = idx(COL_TITLE);
        let url = idx(COL_URL);
        let folder_name = idx(COL_FOLDER_NAME);
        let folder_path = idx(COL_FOLDER_PATH);
        let position = idx(COL_POSITION);
        let created_time = idx(COL_CREATED_TIME);
        let modified_time = idx(COL_MODIFIED_TIME);
        let id = idx(COL_ID);
        let guid = idx(COL_GUID);
        let web_browser = idx(COL_WEB_BROWSER);
        let bookmarks_file = idx(COL_BOOKMARKS_FILE);

        let cell = |row: &Vec<String>, i: usize| row.get(i).cloned().unwrap_or_default();

        let records = self
            .rows
            .iter()
            .map(|row| BookmarkRecord {
                title: cell(row, title),
                url: cell(row, url),
                folder_name: cell(row, folder_name),
                folder_path: cell(row, folder_path),
                position: cell(row, position),
                created_time: cell(row, created_time),
                modified_time: cell(row, modified_time),
                id: cell(row, id),
                guid: cell(row, guid),
                web_browser: cell(row, web_browser),
                bookmarks_file: cell(row, bookmarks_file),
            })
            .collect();

        Ok(BookmarkTable::new(records))
    }
}

/// The working table of raw bookmark records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookmarkTable {
    records: Vec<BookmarkRecord>,
}

impl BookmarkTable {
    pub fn new(records: Vec<BookmarkRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BookmarkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookmarkRecord> {
        self.records.iter()
    }

    /// First `n` rows
    pub fn preview(&self, n: usize) -> BookmarkTable {
        BookmarkTable::new(self.records.iter().take(n).cloned().collect())
    }
}

impl FromIterator<BookmarkRecord> for BookmarkTable {
    fn from_iter<I: IntoIterator<Item = BookmarkRecord>>(iter: I) -> Self {
        BookmarkTable::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn full_columns() -> Vec<String> {
        let mut cols: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        cols.push(COL_MODIFIED_TIME.to_string());
        cols
    }

    #[test]
    fn given_known_extensions_when_inferring_format_then_returns_format() {
        assert_eq!(
            FileFormat::from_path(&PathBuf::from("a/b/export.CSV")).unwrap(),
            FileFormat::Csv
        );
        assert_eq!(
            FileFormat::from_path(&PathBuf::from("export.json")).unwrap(),
            FileFormat::Json
        );
    }

    #[test]
    fn given_unknown_extension_when_inferring_format_then_returns_unsupported_format() {
        let result = FileFormat::from_path(&PathBuf::from("export.xlsx"));

        assert!(matches!(result, Err(DomainError::UnsupportedFormat(_))));
    }

    #[test]
    fn given_missing_guid_column_when_validating_then_reports_guid() {
        // Arrange
        let columns: Vec<String> = full_columns().into_iter().filter(|c| c != "Guid").collect();
        let raw = RawTable::new(columns, vec![]);

        // Act
        let result = raw.validate_schema();

        // Assert
        match result {
            Err(DomainError::SchemaError { missing, message }) => {
                assert_eq!(missing, vec!["Guid".to_string()]);
                assert!(message.contains("Guid"));
            }
            other => panic!("Expected SchemaError, got {:?}", other),
        }
    }

    #[test]
    fn given_columns_in_any_order_when_converting_then_cells_map_by_name() {
        // Arrange
        let mut columns = full_columns();
        columns.reverse();
        let row: Vec<String> = columns.iter().map(|c| format!("v-{}", c)).collect();
        let raw = RawTable::new(columns, vec![row]);

        // Act
        let table = raw.into_table().unwrap();

        // Assert
        let rec = &table.records()[0];
        assert_eq!(rec.title, "v-Title");
        assert_eq!(rec.folder_path, "v-Folder Path");
        assert_eq!(rec.modified_time, "v-Modified Time");
        assert_eq!(rec.bookmarks_file, "v-Bookmarks File");
    }

    #[test]
    fn given_no_modified_time_column_when_converting_then_modified_time_is_empty() {
        let columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let row: Vec<String> = columns.iter().map(|_| "x".to_string()).collect();

        let table = RawTable::new(columns, vec![row]).into_table().unwrap();

        assert_eq!(table.records()[0].modified_time, "");
    }

    #[test]
    fn given_table_when_preview_then_returns_first_rows() {
        let table: BookmarkTable = (0..5)
            .map(|i| BookmarkRecord {
                title: format!("t{}", i),
                ..Default::default()
            })
            .collect();

        let preview = table.preview(2);

        assert_eq!(preview.len(), 2);
        assert_eq!(preview.records()[1].title, "t1");
        assert_eq!(table.preview(10).len(), 5);
    }
}
