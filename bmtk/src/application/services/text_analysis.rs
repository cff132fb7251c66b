// bmtk/src/application/services/text_analysis.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::domain::derived::DerivedTable;
use crate::domain::tokenizer::{PosFilter, SplitMode, Tokenizer};
use crate::domain::word_frequency::{
    PeriodKey, WordCount, WordFrequency, WordFrequencyCache, WordRankingRow,
};

/// Turns titles into filtered surface forms and counts them
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filter: PosFilter,
}

impl TextAnalyzer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self::with_filter(tokenizer, PosFilter::default())
    }

    pub fn with_filter(tokenizer: Arc<dyn Tokenizer>, filter: PosFilter) -> Self {
        debug!("Creating TextAnalyzer with {:?}", tokenizer);
        Self { tokenizer, filter }
    }

    pub fn filter(&self) -> &PosFilter {
        &self.filter
    }

    /// Surface forms of the tokens that pass the part-of-speech filter, in text order
    pub fn extract_words(&self, text: &str, mode: SplitMode) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.tokenizer
            .tokenize(text, mode)
            .into_iter()
            .filter(|token| self.filter.is_valid_word(token))
            .map(|token| token.surface)
            .collect()
    }

    pub fn word_frequency<'a, I>(&self, titles: I, mode: SplitMode) -> WordFrequency
    where
        I: IntoIterator<Item = &'a str>,
    {
        titles
            .into_iter()
            .flat_map(|title| self.extract_words(title, mode))
            .collect()
    }

    /// Frequencies over every title of `table`
    #[instrument(skip(self, table), fields(rows = table.len()), level = "debug")]
    pub fn table_word_frequency(&self, table: &DerivedTable, mode: SplitMode) -> WordFrequency {
        self.word_frequency(table.iter().map(|r| r.record.title.as_str()), mode)
    }

    /// Cache with an `all` partition plus one partition per creation year.
    ///
    /// Each title is tokenized once and its words counted under `all` and
    /// under its row's year. Rows without a year only reach `all`.
    #[instrument(skip(self, table), fields(rows = table.len()), level = "debug")]
    pub fn build_cache(&self, table: &DerivedTable, mode: SplitMode) -> WordFrequencyCache {
        let mut all = WordFrequency::new();
        let mut periods: BTreeMap<PeriodKey, WordFrequency> = BTreeMap::new();

        for row in table.iter() {
            let words = self.extract_words(&row.record.title, mode);
            trace!("{:?} -> {:?}", row.record.title, words);
            let year_freq = row
                .created_year
                .map(|year| periods.entry(PeriodKey::Year(year)).or_default());
            match year_freq {
                Some(year_freq) => {
                    for word in &words {
                        all.add(word, 1);
                        year_freq.add(word, 1);
                    }
                }
                None => words.iter().for_each(|word| all.add(word, 1)),
            }
        }

        debug!(
            "Built word cache: {} distinct words, {} year partitions",
            all.len(),
            periods.len()
        );
        periods.insert(PeriodKey::All, all);
        WordFrequencyCache::new(mode, periods)
    }
}

pub fn top_words(freq: &WordFrequency, n: usize) -> Vec<WordCount> {
    freq.top_words(n)
}

pub fn word_ranking(freq: &WordFrequency, n: usize) -> Vec<WordRankingRow> {
    freq.ranking(n)
}
