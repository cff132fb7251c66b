// bmtk/src/infrastructure/encoding.rs
//! Text encoding sniffing and decoding for bookmark exports.
//!
//! Detection checks byte-order marks first and then probes a fixed list of
//! candidates. Latin-1 maps every byte to a code point and is always last,
//! so detection never fails.
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, EUC_JP, ISO_2022_JP, SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf8,
    /// UTF-8 with an optional leading BOM that is dropped
    Utf8Sig,
    /// UTF-16 honouring a BOM, little endian without one
    Utf16,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    ShiftJis,
    /// Windows code page 932, decoded with the WHATWG Shift_JIS table
    Cp932,
    EucJp,
    Iso2022Jp,
    Latin1,
}

/// BOM signatures, longest first so a UTF-32LE mark is not read as UTF-16LE
const BOMS: [(&[u8], TextEncoding); 5] = [
    (&[0xFF, 0xFE, 0x00, 0x00], TextEncoding::Utf32Le),
    (&[0x00, 0x00, 0xFE, 0xFF], TextEncoding::Utf32Be),
    (&[0xFF, 0xFE], TextEncoding::Utf16Le),
    (&[0xFE, 0xFF], TextEncoding::Utf16Be),
    (&[0xEF, 0xBB, 0xBF], TextEncoding::Utf8Sig),
];

/// Probe order when no BOM is present
pub const PROBE_ORDER: [TextEncoding; 7] = [
    TextEncoding::Utf8,
    TextEncoding::Utf16,
    TextEncoding::ShiftJis,
    TextEncoding::Cp932,
    TextEncoding::EucJp,
    TextEncoding::Iso2022Jp,
    TextEncoding::Latin1,
];

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Utf16Le => "utf-16-le",
            TextEncoding::Utf16Be => "utf-16-be",
            TextEncoding::Utf32Le => "utf-32-le",
            TextEncoding::Utf32Be => "utf-32-be",
            TextEncoding::ShiftJis => "shift_jis",
            TextEncoding::Cp932 => "cp932",
            TextEncoding::EucJp => "euc_jp",
            TextEncoding::Iso2022Jp => "iso-2022-jp",
            TextEncoding::Latin1 => "latin1",
        }
    }

    /// Decodes the whole input, failing on the first malformed sequence
    pub fn decode_strict(&self, bytes: &[u8]) -> Result<String, InfrastructureError> {
        let decoded = match self {
            TextEncoding::Utf8 => strict(UTF_8, bytes),
            TextEncoding::Utf8Sig => strict(UTF_8, strip_prefix(bytes, &[0xEF, 0xBB, 0xBF])),
            TextEncoding::Utf16 => {
                let (encoding, body) = utf16_with_bom(bytes);
                strict_utf16(encoding, body)
            }
            TextEncoding::Utf16Le => strict_utf16(UTF_16LE, bytes),
            TextEncoding::Utf16Be => strict_utf16(UTF_16BE, bytes),
            TextEncoding::Utf32Le => decode_utf32(bytes, false, false),
            TextEncoding::Utf32Be => decode_utf32(bytes, true, false),
            TextEncoding::ShiftJis | TextEncoding::Cp932 => strict(SHIFT_JIS, bytes),
            TextEncoding::EucJp => strict(EUC_JP, bytes),
            TextEncoding::Iso2022Jp => strict(ISO_2022_JP, bytes),
            TextEncoding::Latin1 => Some(decode_latin1(bytes)),
        };
        decoded.ok_or_else(|| InfrastructureError::decode(self.name(), "malformed byte sequence"))
    }

    /// Decodes the whole input, replacing malformed sequences with U+FFFD
    pub fn decode_lossy(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => lossy(UTF_8, bytes),
            TextEncoding::Utf8Sig => lossy(UTF_8, strip_prefix(bytes, &[0xEF, 0xBB, 0xBF])),
            TextEncoding::Utf16 => {
                let (encoding, body) = utf16_with_bom(bytes);
                lossy(encoding, body)
            }
            TextEncoding::Utf16Le => lossy(UTF_16LE, bytes),
            TextEncoding::Utf16Be => lossy(UTF_16BE, bytes),
            TextEncoding::Utf32Le => decode_utf32(bytes, false, true).unwrap_or_default(),
            TextEncoding::Utf32Be => decode_utf32(bytes, true, true).unwrap_or_default(),
            TextEncoding::ShiftJis | TextEncoding::Cp932 => lossy(SHIFT_JIS, bytes),
            TextEncoding::EucJp => lossy(EUC_JP, bytes),
            TextEncoding::Iso2022Jp => lossy(ISO_2022_JP, bytes),
            TextEncoding::Latin1 => decode_latin1(bytes),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

fn strict_utf16(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    strict(encoding, bytes)
}

fn lossy(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _had_errors) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

fn strip_prefix<'a>(bytes: &'a [u8], prefix: &[u8]) -> &'a [u8] {
    bytes.strip_prefix(prefix).unwrap_or(bytes)
}

fn utf16_with_bom(bytes: &[u8]) -> (&'static Encoding, &[u8]) {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => (UTF_16LE, rest),
        [0xFE, 0xFF, rest @ ..] => (UTF_16BE, rest),
        _ => (UTF_16LE, bytes),
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn decode_utf32(bytes: &[u8], big_endian: bool, replace: bool) -> Option<String> {
    if bytes.len() % 4 != 0 && !replace {
        return None;
    }
    let mut out = String::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks(4) {
        let c = match <[u8; 4]>::try_from(chunk) {
            Ok(quad) => {
                let value = if big_endian {
                    u32::from_be_bytes(quad)
                } else {
                    u32::from_le_bytes(quad)
                };
                char::from_u32(value)
            }
            Err(_) => None,
        };
        match (c, replace) {
            (Some(c), _) => out.push(c),
            (None, true) => out.push(char::REPLACEMENT_CHARACTER),
            (None, false) => return None,
        }
    }
    Some(out)
}

/// Encoding implied by a leading byte-order mark
pub fn detect_bom(bytes: &[u8]) -> Option<TextEncoding> {
    BOMS.iter()
        .find(|(bom, _)| bytes.starts_with(bom))
        .map(|(_, encoding)| *encoding)
}

/// BOM first, then the first candidate of [`PROBE_ORDER`] that decodes cleanly
pub fn detect_encoding(bytes: &[u8]) -> TextEncoding {
    if let Some(encoding) = detect_bom(bytes) {
        trace!("BOM found: {}", encoding);
        return encoding;
    }

    PROBE_ORDER
        .iter()
        .copied()
        .find(|candidate| {
            let ok = candidate.decode_strict(bytes).is_ok();
            trace!("probe {}: {}", candidate, if ok { "ok" } else { "failed" });
            ok
        })
        .unwrap_or(TextEncoding::Utf8)
}

/// Reads `path` and detects its encoding
#[instrument(level = "debug")]
pub fn detect_file_encoding(path: &Path) -> DomainResult<TextEncoding> {
    if !path.exists() {
        return Err(DomainError::FileNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let encoding = detect_encoding(&bytes);
    debug!("Detected encoding {} for {}", encoding, path.display());
    Ok(encoding)
}

/// Drops a leading U+FEFF left behind by BOM-unaware decoders
pub fn strip_bom_char(text: &str) -> &str {
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0xFF, 0xFE, 0x00, 0x00, 0x41], TextEncoding::Utf32Le)]
    #[case(&[0x00, 0x00, 0xFE, 0xFF], TextEncoding::Utf32Be)]
    #[case(&[0xFF, 0xFE, 0x41, 0x00], TextEncoding::Utf16Le)]
    #[case(&[0xFE, 0xFF, 0x00, 0x41], TextEncoding::Utf16Be)]
    #[case(&[0xEF, 0xBB, 0xBF, 0x41], TextEncoding::Utf8Sig)]
    fn given_bom_when_detecting_then_returns_bom_encoding(
        #[case] bytes: &[u8],
        #[case] expected: TextEncoding,
    ) {
        assert_eq!(detect_encoding(bytes), expected);
    }

    #[test]
    fn given_plain_utf8_when_detecting_then_returns_utf8() {
        assert_eq!(detect_encoding("タイトル,URL".as_bytes()), TextEncoding::Utf8);
    }

    #[test]
    fn given_shift_jis_bytes_when_detecting_then_returns_shift_jis() {
        // Arrange: odd length rules out UTF-16
        let (bytes, _, _) = SHIFT_JIS.encode("東京a");
        assert_eq!(bytes.len() % 2, 1);

        // Act
        let encoding = detect_encoding(&bytes);

        // Assert
        assert_eq!(encoding, TextEncoding::ShiftJis);
        assert_eq!(encoding.decode_strict(&bytes).unwrap(), "東京a");
    }

    #[test]
    fn given_bytes_invalid_everywhere_when_detecting_then_falls_back_to_latin1() {
        let bytes = [0x80, 0xFF, 0x41];

        let encoding = detect_encoding(&bytes);

        assert_eq!(encoding, TextEncoding::Latin1);
        assert_eq!(encoding.decode_strict(&bytes).unwrap(), "\u{80}\u{FF}A");
    }

    #[test]
    fn given_utf16_with_bom_when_decoding_as_utf16_then_bom_is_consumed() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42];

        assert_eq!(TextEncoding::Utf16.decode_strict(&bytes).unwrap(), "AB");
    }

    #[test]
    fn given_utf16le_with_bom_when_decoding_as_utf16le_then_bom_char_remains() {
        let bytes = [0xFF, 0xFE, 0x41, 0x00];

        let text = TextEncoding::Utf16Le.decode_strict(&bytes).unwrap();

        assert_eq!(text, "\u{FEFF}A");
        assert_eq!(strip_bom_char(&text), "A");
    }

    #[test]
    fn given_odd_length_when_decoding_as_utf16_then_fails() {
        assert!(TextEncoding::Utf16Le.decode_strict(&[0x41, 0x00, 0x42]).is_err());
    }

    #[test]
    fn given_utf32_be_when_decoding_then_returns_text() {
        let bytes = [0x00, 0x00, 0x00, 0x41, 0x00, 0x00, 0x30, 0x42];

        assert_eq!(TextEncoding::Utf32Be.decode_strict(&bytes).unwrap(), "Aあ");
        assert!(TextEncoding::Utf32Be.decode_strict(&bytes[..5]).is_err());
    }

    #[test]
    fn given_invalid_utf8_when_decoding_lossy_then_replaces() {
        let text = TextEncoding::Utf8.decode_lossy(&[0x41, 0xFF, 0x42]);

        assert_eq!(text, "A\u{FFFD}B");
    }
}
