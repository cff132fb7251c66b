// bmtk/src/domain/tokenizer.rs
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Granularity of compound splitting: A finest, C coarsest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SplitMode {
    A,
    B,
    #[default]
    C,
}

impl FromStr for SplitMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(SplitMode::A),
            "B" | "b" => Ok(SplitMode::B),
            "C" | "c" => Ok(SplitMode::C),
            other => Err(DomainError::InvalidArgument(format!(
                "Unknown split mode '{}', expected A, B or C",
                other
            ))),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMode::A => write!(f, "A"),
            SplitMode::B => write!(f, "B"),
            SplitMode::C => write!(f, "C"),
        }
    }
}

/// Hierarchical part-of-speech tag, major category first (e.g. `名詞,普通名詞,一般`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartOfSpeech(Vec<String>);

impl PartOfSpeech {
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(components.into_iter().map(Into::into).collect())
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    pub fn major(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    /// Components joined with `,`
    pub fn tag(&self) -> String {
        self.0.join(",")
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub surface: String,
    pub pos: PartOfSpeech,
}

impl Token {
    pub fn new<S: Into<String>>(surface: S, pos: PartOfSpeech) -> Self {
        Self {
            surface: surface.into(),
            pos,
        }
    }
}

/// Morphological analyzer capability
pub trait Tokenizer: Send + Sync + Debug {
    fn tokenize(&self, text: &str, mode: SplitMode) -> Vec<Token>;
}

/// Which tokens count as words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosFilter {
    /// The tag must start with one of these
    #[serde(default = "default_accepted")]
    pub accepted: Vec<String>,
    /// The tag must not contain any of these
    #[serde(default = "default_excluded")]
    pub excluded: Vec<String>,
    /// Surfaces need more characters than this
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_accepted() -> Vec<String> {
    vec!["名詞".into(), "動詞".into(), "形容詞".into()]
}

fn default_excluded() -> Vec<String> {
    vec!["非自立".into(), "代名詞".into(), "数".into()]
}

fn default_min_chars() -> usize {
    1
}

impl Default for PosFilter {
    fn default() -> Self {
        Self {
            accepted: default_accepted(),
            excluded: default_excluded(),
            min_chars: default_min_chars(),
        }
    }
}

impl PosFilter {
    pub fn is_valid_word(&self, token: &Token) -> bool {
        if token.surface.chars().count() <= self.min_chars {
            return false;
        }

        let tag = token.pos.tag();
        if !self.accepted.iter().any(|p| tag.starts_with(p.as_str())) {
            return false;
        }

        !self.excluded.iter().any(|m| tag.contains(m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn token(surface: &str, pos: &[&str]) -> Token {
        Token::new(surface, PartOfSpeech::new(pos.iter().copied()))
    }

    #[rstest]
    #[case("東京", &["名詞", "固有名詞", "地名"], true)]
    #[case("行っ", &["動詞", "一般"], true)]
    #[case("美しい", &["形容詞", "一般"], true)]
    #[case("京", &["名詞", "固有名詞"], false)]
    #[case("って", &["助詞", "格助詞"], false)]
    #[case("これ", &["名詞", "代名詞"], false)]
    #[case("こと", &["名詞", "非自立"], false)]
    #[case("２０２４", &["名詞", "数詞"], false)]
    fn given_token_when_filtering_then_applies_length_and_pos_rules(
        #[case] surface: &str,
        #[case] pos: &[&str],
        #[case] expected: bool,
    ) {
        let filter = PosFilter::default();

        assert_eq!(filter.is_valid_word(&token(surface, pos)), expected);
    }

    #[test]
    fn given_mode_strings_when_parsing_then_accepts_either_case() {
        assert_eq!("a".parse::<SplitMode>().unwrap(), SplitMode::A);
        assert_eq!("C".parse::<SplitMode>().unwrap(), SplitMode::C);
        assert!("D".parse::<SplitMode>().is_err());
        assert_eq!(SplitMode::default(), SplitMode::C);
    }

    #[test]
    fn given_pos_when_tag_then_components_are_comma_joined() {
        let pos = PartOfSpeech::new(["名詞", "普通名詞", "一般"]);

        assert_eq!(pos.tag(), "名詞,普通名詞,一般");
        assert_eq!(pos.major(), "名詞");
    }
}
