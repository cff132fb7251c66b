// bmtk/src/application/services/session.rs
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::preprocessor::{filter_by_years, preprocess};
use crate::application::services::text_analysis::TextAnalyzer;
use crate::application::services::timeseries::available_years;
use crate::domain::bookmark::{BookmarkTable, FileFormat};
use crate::domain::derived::DerivedTable;
use crate::domain::tokenizer::SplitMode;
use crate::domain::word_frequency::{WordFrequency, WordFrequencyCache, YearSelection};
use crate::infrastructure::loader::BookmarkLoader;

/// Everything derived from one loaded bookmark export.
///
/// A session is built completely or not at all. Changing the split mode
/// produces a new cache in one step; the year selection only affects queries.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    source: Option<PathBuf>,
    raw: BookmarkTable,
    derived: DerivedTable,
    analyzer: TextAnalyzer,
    cache: WordFrequencyCache,
    years: Vec<i32>,
    selection: YearSelection,
}

impl AnalysisSession {
    /// Loads, validates and preprocesses `path`, then builds the word cache
    #[instrument(skip(loader, analyzer), level = "debug")]
    pub fn load(
        loader: &BookmarkLoader,
        path: &Path,
        format: Option<FileFormat>,
        analyzer: TextAnalyzer,
        mode: SplitMode,
    ) -> ApplicationResult<Self> {
        let raw = loader.load(path, format)?;
        debug!("Building session for {}", path.display());
        let mut session = Self::from_table(raw, analyzer, mode);
        session.source = Some(path.to_path_buf());
        Ok(session)
    }

    pub fn from_table(raw: BookmarkTable, analyzer: TextAnalyzer, mode: SplitMode) -> Self {
        let derived = preprocess(&raw);
        let cache = analyzer.build_cache(&derived, mode);
        let years = available_years(&derived);
        Self {
            source: None,
            raw,
            derived,
            analyzer,
            cache,
            years,
            selection: YearSelection::all(),
        }
    }

    /// Same data with the cache rebuilt for `mode`
    pub fn with_mode(self, mode: SplitMode) -> Self {
        if mode == self.cache.mode() {
            return self;
        }
        debug!("Rebuilding word cache for mode {}", mode);
        let cache = self.analyzer.build_cache(&self.derived, mode);
        Self { cache, ..self }
    }

    /// Replaces the year filter. Turning "all years" off without naming a
    /// year selects the most recent one.
    pub fn apply_years(&mut self, use_all_years: bool, years: &[i32]) -> ApplicationResult<()> {
        if let Some(unknown) = years.iter().find(|y| !self.years.contains(*y)) {
            return Err(ApplicationError::Validation(format!(
                "No bookmarks were created in {}",
                unknown
            )));
        }

        self.selection = match (use_all_years, years) {
            (true, _) => YearSelection::all(),
            (false, []) => YearSelection::latest_of(&self.years),
            (false, years) => YearSelection::years(years.iter().copied()),
        };
        debug!("Applied year selection {:?}", self.selection);
        Ok(())
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn raw(&self) -> &BookmarkTable {
        &self.raw
    }

    pub fn derived(&self) -> &DerivedTable {
        &self.derived
    }

    pub fn analyzer(&self) -> &TextAnalyzer {
        &self.analyzer
    }

    pub fn cache(&self) -> &WordFrequencyCache {
        &self.cache
    }

    pub fn mode(&self) -> SplitMode {
        self.cache.mode()
    }

    pub fn selection(&self) -> &YearSelection {
        &self.selection
    }

    /// Creation years present in the data, ascending
    pub fn available_years(&self) -> &[i32] {
        &self.years
    }

    /// Derived rows that pass the applied year selection
    pub fn filtered_table(&self) -> DerivedTable {
        filter_by_years(&self.derived, &self.selection)
    }

    /// Word frequencies for the applied year selection
    pub fn word_frequency(&self) -> WordFrequency {
        self.cache.query_selection(&self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::util::testing::{init_test_env, record, FakeTokenizer};
    use std::sync::Arc;

    fn analyzer() -> TextAnalyzer {
        TextAnalyzer::new(Arc::new(FakeTokenizer))
    }

    fn session() -> AnalysisSession {
        let table = BookmarkTable::new(vec![
            record("rust tokio", "", "Work", "2022/05/01 9:15:00"),
            record("rust serde", "", "Work", "2023/01/07 14:30:00"),
            record("tokio axum", "", "Home", "2024/03/04 10:00:00"),
            record("rust book", "", "Home", "2024/06/04 10:00:00"),
        ]);
        AnalysisSession::from_table(table, analyzer(), SplitMode::C)
    }

    #[test]
    fn given_resource_file_when_loading_then_session_is_complete() {
        // Arrange
        let env = init_test_env();

        // Act
        let session = AnalysisSession::load(
            &BookmarkLoader::new(),
            &env.resource("bookmarks.csv"),
            None,
            analyzer(),
            SplitMode::C,
        )
        .unwrap();

        // Assert
        assert_eq!(session.raw().len(), session.derived().len());
        assert!(session.source().is_some());
        assert!(!session.word_frequency().is_empty());
        assert_eq!(session.selection(), &YearSelection::all());
    }

    #[test]
    fn given_missing_file_when_loading_then_domain_error_is_returned() {
        let result = AnalysisSession::load(
            &BookmarkLoader::new(),
            Path::new("/nonexistent/bookmarks.csv"),
            None,
            analyzer(),
            SplitMode::C,
        );

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::FileNotFound(_)))
        ));
    }

    #[test]
    fn given_all_years_off_without_years_when_applying_then_latest_year_is_selected() {
        let mut session = session();

        session.apply_years(false, &[]).unwrap();

        assert_eq!(session.selection(), &YearSelection::years([2024]));
        assert_eq!(session.filtered_table().len(), 2);
        assert_eq!(session.word_frequency().get("rust"), 1);
    }

    #[test]
    fn given_two_years_when_applying_then_frequencies_are_merged() {
        let mut session = session();

        session.apply_years(false, &[2022, 2023]).unwrap();

        let freq = session.word_frequency();
        assert_eq!(freq.get("rust"), 2);
        assert_eq!(freq.get("axum"), 0);
        assert_eq!(session.filtered_table().len(), 2);
    }

    #[test]
    fn given_unknown_year_when_applying_then_selection_is_unchanged() {
        let mut session = session();

        let result = session.apply_years(false, &[1999]);

        assert!(matches!(result, Err(ApplicationError::Validation(_))));
        assert_eq!(session.selection(), &YearSelection::all());
    }

    #[test]
    fn given_new_mode_when_switching_then_cache_is_rebuilt_and_selection_kept() {
        let mut session = session();
        session.apply_years(false, &[2024]).unwrap();

        let session = session.with_mode(SplitMode::A);

        assert_eq!(session.mode(), SplitMode::A);
        assert_eq!(session.cache().mode(), SplitMode::A);
        assert_eq!(session.selection(), &YearSelection::years([2024]));
        assert_eq!(session.available_years(), &[2022, 2023, 2024]);
    }
}
