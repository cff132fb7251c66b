// bmtk/src/infrastructure/loader/csv_loader.rs
use tracing::{debug, instrument, trace};

use crate::domain::bookmark::{RawTable, REQUIRED_COLUMNS};
use crate::domain::error::{DomainError, DomainResult};
use crate::infrastructure::encoding::{strip_bom_char, TextEncoding};
use crate::infrastructure::error::InfrastructureError;

use super::candidates;

/// Tried after the detected encoding, in this order
const CSV_FALLBACKS: [TextEncoding; 8] = [
    TextEncoding::Utf8Sig,
    TextEncoding::Utf8,
    TextEncoding::Utf16,
    TextEncoding::Utf16Le,
    TextEncoding::Utf16Be,
    TextEncoding::ShiftJis,
    TextEncoding::Cp932,
    TextEncoding::Latin1,
];

/// Parses CSV bytes trying each candidate encoding in turn.
///
/// The first decode whose header carries every required column wins. A wrong
/// encoding often still "parses" (UTF-16 read from UTF-8 or Shift-JIS bytes
/// yields one garbage column), so an incomplete table is only kept when it
/// came from the detected encoding or shares at least one required column.
/// Among those the one with most required columns is returned and schema
/// validation reports what is missing; without any, the load fails.
#[instrument(skip(bytes), fields(len = bytes.len()), level = "debug")]
pub fn parse_csv(bytes: &[u8], detected: TextEncoding) -> DomainResult<RawTable> {
    let mut last_error: Option<InfrastructureError> = None;
    let mut best_partial: Option<(usize, RawTable)> = None;

    for encoding in candidates(detected, &CSV_FALLBACKS) {
        match parse_with(bytes, encoding) {
            Ok(raw) if raw.missing_columns().is_empty() => {
                debug!(
                    "Parsed CSV as {}: {} columns, {} rows",
                    encoding,
                    raw.columns.len(),
                    raw.rows.len()
                );
                return Ok(raw);
            }
            Ok(raw) => {
                let missing = raw.missing_columns();
                let present = REQUIRED_COLUMNS.len() - missing.len();
                trace!("CSV candidate {} parsed but lacks {:?}", encoding, missing);
                if present == 0 && encoding != detected {
                    continue;
                }
                if best_partial.as_ref().map_or(true, |(best, _)| present > *best) {
                    best_partial = Some((present, raw));
                }
            }
            Err(e) => {
                trace!("CSV candidate {} failed: {}", encoding, e);
                last_error = Some(e);
            }
        }
    }

    if let Some((_, raw)) = best_partial {
        return Ok(raw);
    }

    Err(DomainError::LoadFailure(format!(
        "Failed to read CSV file with any encoding. Last error: {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

fn parse_with(bytes: &[u8], encoding: TextEncoding) -> Result<RawTable, InfrastructureError> {
    let text = encoding.decode_strict(bytes)?;
    parse_text(strip_bom_char(&text))
}

/// Header row plus records; ragged rows are rejected
fn parse_text(text: &str) -> Result<RawTable, InfrastructureError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawTable::new(columns, rows))
}
