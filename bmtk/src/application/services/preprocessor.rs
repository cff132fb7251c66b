// bmtk/src/application/services/preprocessor.rs
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, instrument};
use url::Url;

use crate::domain::bookmark::{BookmarkRecord, BookmarkTable, FOLDER_SEPARATOR};
use crate::domain::derived::{DerivedBookmark, DerivedTable};
use crate::domain::word_frequency::YearSelection;

/// Export timestamp format; the hour may have one or two digits
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const FALLBACK_FORMATS: [&str; 3] = ["%Y/%m/%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses an export timestamp; empty or unparsable input yields `None`
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    std::iter::once(TIMESTAMP_FORMAT)
        .chain(FALLBACK_FORMATS)
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Host (and explicit port) of `url`, empty when it has none
pub fn extract_domain(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) => match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        },
        Err(_) => String::new(),
    }
}

/// Derives every computed column for one record
pub fn derive(record: &BookmarkRecord) -> DerivedBookmark {
    let created = parse_timestamp(&record.created_time);
    let modified = parse_timestamp(&record.modified_time);
    let mut segments = record.folder_path.split(FOLDER_SEPARATOR);
    let root_folder = segments.next().unwrap_or_default().to_string();
    let hierarchy_level = 1 + segments.count();

    DerivedBookmark {
        record: record.clone(),
        created_datetime: created,
        modified_datetime: modified,
        hierarchy_level,
        root_folder,
        created_year: created.map(|d| d.year()),
        created_month: created.map(|d| d.month()),
        created_day: created.map(|d| d.day()),
        created_hour: created.map(|d| d.hour()),
        created_date: created.map(|d| d.date()),
        created_weekday: created.map(|d| d.weekday().num_days_from_monday()),
        domain: extract_domain(&record.url),
        is_modified: modified.is_some(),
        title_length: record.title.chars().count(),
    }
}

/// One derived row per input row, same order
#[instrument(skip_all, fields(rows = table.len()), level = "debug")]
pub fn preprocess(table: &BookmarkTable) -> DerivedTable {
    let derived: DerivedTable = table.iter().map(derive).collect();
    let unparsed = derived
        .iter()
        .filter(|r| r.created_datetime.is_none())
        .count();
    if unparsed > 0 {
        debug!("{} rows with unparsable Created Time", unparsed);
    }
    derived
}

/// Rows created within `[start, end]`; rows without a date drop out once a bound is set
pub fn filter_by_date_range(
    table: &DerivedTable,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> DerivedTable {
    table.filter(|r| {
        let after_start = match start {
            Some(s) => r.created_date.is_some_and(|d| d >= s),
            None => true,
        };
        let before_end = match end {
            Some(e) => r.created_date.is_some_and(|d| d <= e),
            None => true,
        };
        after_start && before_end
    })
}

/// Rows whose `Folder Path` contains `folder_path`
pub fn filter_by_folder(table: &DerivedTable, folder_path: &str) -> DerivedTable {
    table.filter(|r| r.record.folder_path.contains(folder_path))
}

pub fn filter_by_browser(table: &DerivedTable, browser: &str) -> DerivedTable {
    table.filter(|r| r.record.web_browser == browser)
}

/// Case-insensitive substring match on title or URL
pub fn search(table: &DerivedTable, query: &str) -> DerivedTable {
    let query = query.to_lowercase();
    table.filter(|r| {
        r.record.title.to_lowercase().contains(&query)
            || r.record.url.to_lowercase().contains(&query)
    })
}

/// Rows created in one of the selected years; everything when no year filter applies
pub fn filter_by_years(table: &DerivedTable, selection: &YearSelection) -> DerivedTable {
    if !selection.is_filtering() {
        return table.clone();
    }
    table.filter(|r| selection.includes(r.created_year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::record;
    use rstest::rstest;

    fn table(records: Vec<BookmarkRecord>) -> BookmarkTable {
        BookmarkTable::new(records)
    }

    #[rstest]
    #[case("2023/05/01 9:15:00", Some((2023, 5, 1, 9)))]
    #[case("2023/05/01 09:15:00", Some((2023, 5, 1, 9)))]
    #[case(" 2024/12/31 23:59:59 ", Some((2024, 12, 31, 23)))]
    #[case("2024-03-04 10:00:00", Some((2024, 3, 4, 10)))]
    #[case("2024/03/04 10:00", Some((2024, 3, 4, 10)))]
    #[case("", None)]
    #[case("yesterday", None)]
    fn given_timestamp_when_parsing_then_returns_expected_parts(
        #[case] input: &str,
        #[case] expected: Option<(i32, u32, u32, u32)>,
    ) {
        let parsed = parse_timestamp(input).map(|d| (d.year(), d.month(), d.day(), d.hour()));

        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("https://www.example.com/path?q=1", "www.example.com")]
    #[case("http://localhost:8080/", "localhost:8080")]
    #[case("https://example.com:443/", "example.com")]
    #[case("not a url", "")]
    #[case("javascript:void(0)", "")]
    fn given_url_when_extracting_domain_then_returns_host(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(extract_domain(url), expected);
    }

    #[test]
    fn given_table_when_preprocessing_then_row_count_and_levels_match() {
        // Arrange
        let input = table(vec![
            record("a", "https://a.org", r"Work\Projects", "2023/05/01 9:15:00"),
            record("b", "https://b.org", "Work", "2024/01/07 14:30:00"),
            record("c", "https://c.org", r"A\B\C\D", "garbage"),
            record("d", "https://d.org", "", "2024/01/07 14:30:00"),
        ]);

        // Act
        let derived = preprocess(&input);

        // Assert
        assert_eq!(derived.len(), input.len());
        for row in derived.iter() {
            assert_eq!(
                row.hierarchy_level,
                row.record.folder_path.split('\\').count()
            );
            assert!(row.hierarchy_level >= 1);
        }
        assert_eq!(derived.rows()[0].root_folder, "Work");
        assert_eq!(derived.rows()[2].hierarchy_level, 4);
        assert_eq!(derived.rows()[3].root_folder, "");
    }

    #[test]
    fn given_known_monday_and_sunday_when_preprocessing_then_weekday_is_zero_and_six() {
        let input = table(vec![
            record("mon", "", "F", "2023/05/01 9:15:00"),
            record("sun", "", "F", "2024/01/07 14:30:00"),
        ]);

        let derived = preprocess(&input);

        assert_eq!(derived.rows()[0].created_weekday, Some(0));
        assert_eq!(derived.rows()[1].created_weekday, Some(6));
    }

    #[test]
    fn given_unparsable_created_time_when_preprocessing_then_temporal_columns_are_none() {
        let derived = preprocess(&table(vec![record("x", "", "F", "n/a")]));

        let row = &derived.rows()[0];
        assert!(row.created_datetime.is_none());
        assert!(row.created_year.is_none());
        assert!(row.created_weekday.is_none());
        assert!(row.created_date.is_none());
    }

    #[test]
    fn given_modified_time_when_preprocessing_then_is_modified_reflects_parse() {
        let mut modified = record("m", "", "F", "2023/05/01 9:15:00");
        modified.modified_time = "2023/06/01 10:00:00".into();
        let mut bad = record("b", "", "F", "2023/05/01 9:15:00");
        bad.modified_time = "later".into();

        let derived = preprocess(&table(vec![modified, bad, record("n", "", "F", "")]));

        let flags: Vec<bool> = derived.iter().map(|r| r.is_modified).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn given_multibyte_title_when_preprocessing_then_length_counts_characters() {
        let derived = preprocess(&table(vec![record("東京都庁", "", "F", "")]));

        assert_eq!(derived.rows()[0].title_length, 4);
    }

    #[test]
    fn given_same_input_when_preprocessing_twice_then_results_are_identical() {
        let input = table(vec![
            record("a", "https://a.org", r"Work\Projects", "2023/05/01 9:15:00"),
            record("b", "bad", "Work", "bad"),
        ]);

        assert_eq!(preprocess(&input), preprocess(&input));
    }

    fn filter_fixture() -> DerivedTable {
        preprocess(&table(vec![
            record("Rust Book", "https://doc.rust-lang.org", r"Work\Rust", "2023/05/01 9:15:00"),
            record("Tokio", "https://TOKIO.rs", "Work", "2024/01/07 14:30:00"),
            record("Cooking", "https://food.example", "Home", "2024/06/01 8:00:00"),
            record("Undated", "https://x.example", "Home", ""),
        ]))
    }

    #[test]
    fn given_date_range_when_filtering_then_bounds_are_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7);
        let end = NaiveDate::from_ymd_opt(2024, 6, 1);

        let filtered = filter_by_date_range(&filter_fixture(), start, end);

        let titles: Vec<&str> = filtered.iter().map(|r| r.record.title.as_str()).collect();
        assert_eq!(titles, vec!["Tokio", "Cooking"]);
        assert_eq!(filter_by_date_range(&filter_fixture(), None, None).len(), 4);
    }

    #[test]
    fn given_query_when_searching_then_matches_title_or_url_case_insensitively() {
        let found = search(&filter_fixture(), "tokio");

        assert_eq!(found.len(), 1);
        assert_eq!(search(&filter_fixture(), "RUST").len(), 1);
    }

    #[test]
    fn given_folder_and_browser_when_filtering_then_matches() {
        assert_eq!(filter_by_folder(&filter_fixture(), "Work").len(), 2);
        assert_eq!(filter_by_browser(&filter_fixture(), "Chrome").len(), 4);
        assert_eq!(filter_by_browser(&filter_fixture(), "chrome").len(), 0);
    }

    #[test]
    fn given_year_selection_when_filtering_then_keeps_selected_years_only() {
        let filtered = filter_by_years(&filter_fixture(), &YearSelection::years([2024]));

        assert_eq!(filtered.len(), 2);
        assert_eq!(filter_by_years(&filter_fixture(), &YearSelection::all()).len(), 4);
    }
}
