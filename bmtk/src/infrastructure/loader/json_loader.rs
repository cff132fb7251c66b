// bmtk/src/infrastructure/loader/json_loader.rs
use indexmap::IndexSet;
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use crate::domain::bookmark::RawTable;
use crate::domain::error::{DomainError, DomainResult};
use crate::infrastructure::encoding::{strip_bom_char, TextEncoding};
use crate::infrastructure::error::InfrastructureError;

use super::candidates;

const JSON_FALLBACKS: [TextEncoding; 5] = [
    TextEncoding::Utf8Sig,
    TextEncoding::Utf8,
    TextEncoding::Utf16,
    TextEncoding::Utf16Le,
    TextEncoding::Utf16Be,
];

/// Lossy decoders tried once every strict candidate failed
const LOSSY_FALLBACKS: [TextEncoding; 5] = [
    TextEncoding::Utf8,
    TextEncoding::Utf16,
    TextEncoding::ShiftJis,
    TextEncoding::Cp932,
    TextEncoding::Latin1,
];

/// Parses a JSON array of bookmark objects
#[instrument(skip(bytes), fields(len = bytes.len()), level = "debug")]
pub fn parse_json(bytes: &[u8], detected: TextEncoding) -> DomainResult<RawTable> {
    let value = decode_json(bytes, detected)?;
    to_raw_table(value)
}

fn decode_json(bytes: &[u8], detected: TextEncoding) -> DomainResult<Value> {
    let mut last_error: Option<InfrastructureError> = None;

    for encoding in candidates(detected, &JSON_FALLBACKS) {
        let parsed = encoding.decode_strict(bytes).and_then(|text| {
            serde_json::from_str::<Value>(strip_bom_char(&text)).map_err(InfrastructureError::from)
        });
        match parsed {
            Ok(value) => {
                debug!("Parsed JSON as {}", encoding);
                return Ok(value);
            }
            Err(e) => {
                trace!("JSON candidate {} failed: {}", encoding, e);
                last_error = Some(e);
            }
        }
    }

    let body = strip_bom_bytes(bytes);
    for encoding in LOSSY_FALLBACKS {
        let text = encoding.decode_lossy(body);
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => {
                warn!("JSON decoded lossily as {}, some characters may be replaced", encoding);
                return Ok(value);
            }
            Err(e) => {
                trace!("lossy JSON candidate {} failed: {}", encoding, e);
                last_error = Some(e.into());
            }
        }
    }

    Err(DomainError::LoadFailure(format!(
        "Failed to parse JSON file: {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

fn strip_bom_bytes(bytes: &[u8]) -> &[u8] {
    [&[0xEF, 0xBB, 0xBF][..], &[0xFF, 0xFE][..], &[0xFE, 0xFF][..]]
        .iter()
        .find_map(|bom| bytes.strip_prefix(*bom))
        .unwrap_or(bytes)
}

/// Columns are the union of object keys in first-seen order
fn to_raw_table(value: Value) -> DomainResult<RawTable> {
    let Value::Array(items) = value else {
        return Err(DomainError::schema(
            "JSON file must contain an array of bookmark objects",
        ));
    };

    let mut objects = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => objects.push(map),
            other => {
                return Err(DomainError::schema(format!(
                    "JSON array element {} is not an object: {}",
                    i, other
                )))
            }
        }
    }

    let columns: IndexSet<String> = objects
        .iter()
        .flat_map(|obj| obj.keys().cloned())
        .collect();

    let rows = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable::new(columns.into_iter().collect(), rows))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_objects_with_different_keys_when_parsing_then_columns_are_union() {
        let json = r#"[{"Title": "a", "ID": 1}, {"Title": "b", "Guid": null, "flag": true}]"#;

        let raw = parse_json(json.as_bytes(), TextEncoding::Utf8).unwrap();

        assert_eq!(raw.columns, vec!["Title", "ID", "Guid", "flag"]);
        assert_eq!(raw.rows[0], vec!["a", "1", "", ""]);
        assert_eq!(raw.rows[1], vec!["b", "", "", "true"]);
    }

    #[test]
    fn given_object_root_when_parsing_then_returns_schema_error() {
        let result = parse_json(br#"{"Title": "a"}"#, TextEncoding::Utf8);

        assert!(matches!(result, Err(DomainError::SchemaError { .. })));
    }

    #[test]
    fn given_utf8_bom_when_parsing_then_bom_is_ignored() {
        let bytes = b"\xEF\xBB\xBF[{\"Title\": \"x\"}]";

        let raw = parse_json(bytes, TextEncoding::Utf8Sig).unwrap();

        assert_eq!(raw.rows.len(), 1);
    }

    #[test]
    fn given_invalid_utf8_in_string_when_parsing_then_lossy_fallback_recovers() {
        // Arrange: stray 0xFF plus odd length breaks every strict candidate
        let bytes = b"[{\"Title\": \"a\xFFb\"}] ";

        // Act
        let raw = parse_json(bytes, TextEncoding::Utf8).unwrap();

        // Assert
        assert_eq!(raw.rows[0][0], "a\u{FFFD}b");
    }

    #[test]
    fn given_garbage_when_parsing_then_returns_load_failure() {
        let result = parse_json(b"not json at all", TextEncoding::Utf8);

        assert!(matches!(result, Err(DomainError::LoadFailure(_))));
    }
}
