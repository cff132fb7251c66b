// bmtk/src/domain/word_frequency.rs
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::tokenizer::SplitMode;

/// Word -> occurrence count, words in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordFrequency(IndexMap<String, usize>);

impl WordFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<S: AsRef<str>>(&mut self, word: S, count: usize) {
        let word = word.as_ref();
        match self.0.get_mut(word) {
            Some(c) => *c += count,
            None => {
                self.0.insert(word.to_string(), count);
            }
        }
    }

    pub fn get(&self, word: &str) -> usize {
        self.0.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(w, c)| (w.as_str(), *c))
    }

    /// Adds every count of `other` into `self`
    pub fn merge(&mut self, other: &WordFrequency) {
        for (word, count) in other.iter() {
            self.add(word, count);
        }
    }

    /// Sorted by count descending, ties in insertion order, truncated to `n`
    pub fn top_words(&self, n: usize) -> Vec<WordCount> {
        let mut words: Vec<WordCount> = self
            .iter()
            .map(|(word, count)| WordCount {
                word: word.to_string(),
                count,
            })
            .collect();
        words.sort_by(|a, b| b.count.cmp(&a.count));
        words.truncate(n);
        words
    }

    /// Top `n` words with rank and share of the total, percentage rounded to 2 decimals
    pub fn ranking(&self, n: usize) -> Vec<WordRankingRow> {
        let total = self.total();
        self.top_words(n)
            .into_iter()
            .enumerate()
            .map(|(i, wc)| WordRankingRow {
                rank: i + 1,
                percentage: round2(if total == 0 {
                    0.0
                } else {
                    wc.count as f64 / total as f64 * 100.0
                }),
                word: wc.word,
                count: wc.count,
            })
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for WordFrequency {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut freq = WordFrequency::new();
        for word in iter {
            freq.add(word, 1);
        }
        freq
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Row of the exported word ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRankingRow {
    pub rank: usize,
    pub word: String,
    pub count: usize,
    pub percentage: f64,
}

/// Partition key of the word frequency cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKey {
    All,
    Year(i32),
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::All => write!(f, "all"),
            PeriodKey::Year(y) => write!(f, "{:04}", y),
        }
    }
}

impl FromStr for PeriodKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(PeriodKey::All);
        }
        match s.parse::<i32>() {
            Ok(year) if s.len() == 4 => Ok(PeriodKey::Year(year)),
            _ => Err(DomainError::InvalidArgument(format!(
                "Invalid period key '{}', expected 'all' or a 4-digit year",
                s
            ))),
        }
    }
}

/// Year filter as applied by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSelection {
    pub use_all_years: bool,
    pub years: BTreeSet<i32>,
}

impl Default for YearSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl YearSelection {
    pub fn all() -> Self {
        Self {
            use_all_years: true,
            years: BTreeSet::new(),
        }
    }

    pub fn years<I: IntoIterator<Item = i32>>(years: I) -> Self {
        Self {
            use_all_years: false,
            years: years.into_iter().collect(),
        }
    }

    /// Only the most recent of `available`; all years when nothing is available
    pub fn latest_of(available: &[i32]) -> Self {
        match available.iter().max() {
            Some(&latest) => Self::years([latest]),
            None => Self::all(),
        }
    }

    /// Whether a row created in `year` passes this filter
    pub fn includes(&self, year: Option<i32>) -> bool {
        if self.use_all_years || self.years.is_empty() {
            return true;
        }
        year.is_some_and(|y| self.years.contains(&y))
    }

    pub fn is_filtering(&self) -> bool {
        !self.use_all_years && !self.years.is_empty()
    }
}

/// Word frequencies per period, built for one dataset and one split mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencyCache {
    mode: SplitMode,
    periods: BTreeMap<PeriodKey, WordFrequency>,
}

impl WordFrequencyCache {
    pub fn new(mode: SplitMode, periods: BTreeMap<PeriodKey, WordFrequency>) -> Self {
        Self { mode, periods }
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    pub fn period(&self, key: PeriodKey) -> Option<&WordFrequency> {
        self.periods.get(&key)
    }

    /// Years with their own partition, ascending
    pub fn years(&self) -> Vec<i32> {
        self.periods
            .keys()
            .filter_map(|k| match k {
                PeriodKey::Year(y) => Some(*y),
                PeriodKey::All => None,
            })
            .collect()
    }

    /// Frequencies for the given selection:
    /// all-years flag -> `all`; no years -> empty; one year -> that year;
    /// otherwise the per-word sum over the selected years.
    pub fn query(&self, use_all_years: bool, selected_years: &[i32]) -> WordFrequency {
        if use_all_years {
            return self.period(PeriodKey::All).cloned().unwrap_or_default();
        }
        match selected_years {
            [] => WordFrequency::new(),
            [year] => self
                .period(PeriodKey::Year(*year))
                .cloned()
                .unwrap_or_default(),
            years => {
                let mut merged = WordFrequency::new();
                for year in years {
                    if let Some(freq) = self.period(PeriodKey::Year(*year)) {
                        merged.merge(freq);
                    }
                }
                merged
            }
        }
    }

    pub fn query_selection(&self, selection: &YearSelection) -> WordFrequency {
        let years: Vec<i32> = selection.years.iter().copied().collect();
        self.query(selection.use_all_years, &years)
    }
}
