// bmtk/src/infrastructure/export.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::bookmark::FileFormat;
use crate::domain::error::{DomainError, DomainResult};
use crate::infrastructure::error::InfrastructureError;

/// Writes `rows` as CSV (header from the field names) or as a JSON array of objects
pub fn write_rows<T, W>(rows: &[T], format: FileFormat, writer: W) -> DomainResult<()>
where
    T: Serialize,
    W: Write,
{
    match format {
        FileFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for row in rows {
                csv_writer
                    .serialize(row)
                    .map_err(|e| InfrastructureError::Serialization(e.to_string()))?;
            }
            csv_writer.flush()?;
        }
        FileFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, rows)
                .map_err(|e| InfrastructureError::Serialization(e.to_string()))?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Rows rendered into a string
pub fn rows_to_string<T: Serialize>(rows: &[T], format: FileFormat) -> DomainResult<String> {
    let mut buf = Vec::new();
    write_rows(rows, format, &mut buf)?;
    String::from_utf8(buf).map_err(|e| DomainError::Export(e.to_string()))
}

/// Rows written to `path`, replacing any existing file
#[instrument(skip(rows), fields(rows = rows.len()), level = "debug")]
pub fn export_rows<T: Serialize>(rows: &[T], format: FileFormat, path: &Path) -> DomainResult<()> {
    let file = File::create(path)
        .map_err(|e| DomainError::Export(format!("{}: {}", path.display(), e)))?;
    write_rows(rows, format, BufWriter::new(file))?;
    debug!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::word_frequency::{WordFrequency, WordRankingRow};

    fn ranking() -> Vec<WordRankingRow> {
        let freq: WordFrequency = ["東京", "rust", "東京", "rust", "tokio"].into_iter().collect();
        freq.ranking(10)
    }

    #[test]
    fn given_ranking_when_exporting_csv_then_has_header_and_rounded_percentages() {
        let text = rows_to_string(&ranking(), FileFormat::Csv).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "rank,word,count,percentage");
        assert_eq!(lines[1], "1,東京,2,40.0");
        assert_eq!(lines[3], "3,tokio,1,20.0");
    }

    #[test]
    fn given_ranking_when_exporting_json_then_is_array_of_row_objects() {
        let text = rows_to_string(&ranking(), FileFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["word"], "rust");
        assert_eq!(rows[1]["rank"], 2);
        assert_eq!(rows[1]["percentage"], 40.0);
    }

    #[test]
    fn given_path_when_exporting_then_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.csv");

        export_rows(&ranking(), FileFormat::Csv, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("rank,word,count,percentage"));
    }
}
