// bmtk/src/infrastructure/tokenizer.rs
use std::fmt;

use itertools::Itertools;
use lindera::dictionary::{load_dictionary_from_kind, DictionaryKind};
use lindera::mode::{Mode, Penalty};
use lindera::segmenter::Segmenter;
use lindera::tokenizer::Tokenizer as Analyzer;
use tracing::{debug, instrument, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tokenizer::{PartOfSpeech, SplitMode, Token, Tokenizer};

/// Leading IPADIC feature slots that make up the part of speech
const POS_FIELDS: usize = 4;

/// Nouns carrying one of these never join a compound
const COMPOUND_BREAKERS: [&str; 3] = ["数", "代名詞", "非自立"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Kanji,
    Hiragana,
    Katakana,
    Latin,
    Digit,
    Space,
    Other,
}

fn script_of(c: char) -> Script {
    match c {
        '\u{3005}' | '\u{3006}' | '\u{3007}' => Script::Kanji,
        '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}' => {
            Script::Kanji
        }
        '\u{3041}'..='\u{309F}' => Script::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
            Script::Katakana
        }
        c if c.is_whitespace() => Script::Space,
        c if c.is_numeric() => Script::Digit,
        c if c.is_alphabetic() => Script::Latin,
        _ => Script::Other,
    }
}

/// Tag for a word the dictionary does not know, guessed from its first character
fn unknown_pos(surface: &str) -> PartOfSpeech {
    match surface.chars().next().map(script_of) {
        Some(Script::Kanji | Script::Katakana | Script::Latin) => {
            PartOfSpeech::new(["名詞", "一般"])
        }
        Some(Script::Digit) => PartOfSpeech::new(["名詞", "数"]),
        Some(Script::Hiragana) => PartOfSpeech::new(["助詞"]),
        Some(Script::Space) => PartOfSpeech::new(["記号", "空白"]),
        Some(Script::Other) | None => PartOfSpeech::new(["記号", "一般"]),
    }
}

/// IPADIC features minus the `*` placeholders
fn part_of_speech(surface: &str, details: &[&str]) -> PartOfSpeech {
    match details.first() {
        Some(&major) if major != "UNK" && major != "*" => PartOfSpeech::new(
            details
                .iter()
                .take(POS_FIELDS)
                .filter(|f| **f != "*")
                .copied(),
        ),
        _ => unknown_pos(surface),
    }
}

fn is_compound_part(token: &Token) -> bool {
    let tag = token.pos.tag();
    token.pos.major() == "名詞" && !COMPOUND_BREAKERS.iter().any(|m| tag.contains(m))
}

/// Joins runs of adjacent content nouns into one compound, tagged like its last part
fn join_compounds(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .coalesce(|mut prev, next| {
            if is_compound_part(&prev) && is_compound_part(&next) {
                prev.surface.push_str(&next.surface);
                prev.pos = next.pos;
                Ok(prev)
            } else {
                Err((prev, next))
            }
        })
        .collect()
}

fn analyzer(mode: Mode) -> DomainResult<Analyzer> {
    let dictionary = load_dictionary_from_kind(DictionaryKind::IPADIC)
        .map_err(|e| DomainError::Analyzer(format!("IPADIC dictionary: {}", e)))?;
    Ok(Analyzer::new(Segmenter::new(mode, dictionary, None)))
}

/// Morphological analyzer backed by the IPADIC dictionary embedded in lindera.
///
/// Mode A decomposes long compounds using lindera's penalty rules, B is the
/// plain dictionary segmentation, C is B with adjacent content nouns joined
/// back into one compound (`東京` + `都庁` -> `東京都庁`).
pub struct LinderaTokenizer {
    normal: Analyzer,
    decompose: Analyzer,
}

impl fmt::Debug for LinderaTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinderaTokenizer")
            .field("dictionary", &"ipadic")
            .finish()
    }
}

impl LinderaTokenizer {
    #[instrument(level = "debug")]
    pub fn new() -> DomainResult<Self> {
        let normal = analyzer(Mode::Normal)?;
        let decompose = analyzer(Mode::Decompose(Penalty::default()))?;
        debug!("Loaded embedded IPADIC dictionary");
        Ok(Self { normal, decompose })
    }

    fn segment(analyzer: &Analyzer, text: &str) -> Vec<Token> {
        match analyzer.tokenize(text) {
            Ok(mut tokens) => tokens
                .iter_mut()
                .map(|t| {
                    let surface = t.text.to_string();
                    let pos = part_of_speech(&surface, &t.details());
                    Token::new(surface, pos)
                })
                .collect(),
            Err(e) => {
                warn!("Failed to tokenize {:?}: {}", text, e);
                Vec::new()
            }
        }
    }
}

impl Tokenizer for LinderaTokenizer {
    fn tokenize(&self, text: &str, mode: SplitMode) -> Vec<Token> {
        match mode {
            SplitMode::A => Self::segment(&self.decompose, text),
            SplitMode::B => Self::segment(&self.normal, text),
            SplitMode::C => join_compounds(Self::segment(&self.normal, text)),
        }
    }
}
