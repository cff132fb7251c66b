// bmtk/src/application/services/statistics.rs
use std::collections::HashSet;

use tracing::instrument;

use crate::domain::aggregate::{
    count_by, sorted_desc, BasicStats, CategoryCount, DepthCount, TitleLengthStats,
};
use crate::domain::derived::DerivedTable;

#[instrument(skip_all, fields(rows = table.len()), level = "debug")]
pub fn basic_stats(table: &DerivedTable) -> BasicStats {
    let levels: Vec<usize> = table.iter().map(|r| r.hierarchy_level).collect();
    let total = table.len();

    BasicStats {
        total_bookmarks: total,
        total_folders: table
            .iter()
            .map(|r| r.record.folder_path.as_str())
            .collect::<HashSet<_>>()
            .len(),
        date_range_start: table.iter().filter_map(|r| r.created_datetime).min(),
        date_range_end: table.iter().filter_map(|r| r.created_datetime).max(),
        browsers: count_by(table.iter().map(|r| r.record.web_browser.clone())),
        avg_hierarchy_depth: if total == 0 {
            0.0
        } else {
            levels.iter().sum::<usize>() as f64 / total as f64
        },
        max_hierarchy_depth: levels.iter().copied().max().unwrap_or(0),
        min_hierarchy_depth: levels.iter().copied().min().unwrap_or(0),
        total_modified: table.iter().filter(|r| r.is_modified).count(),
    }
}

pub fn browser_distribution(table: &DerivedTable) -> Vec<CategoryCount> {
    sorted_desc(count_by(table.iter().map(|r| r.record.web_browser.clone())))
}

/// Top folders by bookmark count, keyed by folder name
pub fn folder_distribution(table: &DerivedTable, top_n: usize) -> Vec<CategoryCount> {
    let mut rows = sorted_desc(count_by(table.iter().map(|r| r.record.folder_name.clone())));
    rows.truncate(top_n);
    rows
}

/// Top domains by bookmark count; rows without a domain are skipped
pub fn domain_distribution(table: &DerivedTable, top_n: usize) -> Vec<CategoryCount> {
    let mut rows = sorted_desc(count_by(
        table
            .iter()
            .filter(|r| !r.domain.is_empty())
            .map(|r| r.domain.clone()),
    ));
    rows.truncate(top_n);
    rows
}

/// Ascending by depth
pub fn hierarchy_depth_distribution(table: &DerivedTable) -> Vec<DepthCount> {
    let mut rows: Vec<DepthCount> = count_by(table.iter().map(|r| r.hierarchy_level))
        .into_iter()
        .map(|(hierarchy_level, count)| DepthCount {
            hierarchy_level,
            count,
        })
        .collect();
    rows.sort_by_key(|r| r.hierarchy_level);
    rows
}

pub fn root_folder_distribution(table: &DerivedTable) -> Vec<CategoryCount> {
    sorted_desc(count_by(table.iter().map(|r| r.root_folder.clone())))
}

/// Mean, median, max and min title length; all zero for an empty table
pub fn title_length_stats(table: &DerivedTable) -> TitleLengthStats {
    let mut lengths: Vec<usize> = table.iter().map(|r| r.title_length).collect();
    if lengths.is_empty() {
        return TitleLengthStats {
            mean_length: 0.0,
            median_length: 0.0,
            max_length: 0.0,
            min_length: 0.0,
        };
    }
    lengths.sort_unstable();

    let n = lengths.len();
    let median = if n % 2 == 1 {
        lengths[n / 2] as f64
    } else {
        (lengths[n / 2 - 1] + lengths[n / 2]) as f64 / 2.0
    };

    TitleLengthStats {
        mean_length: lengths.iter().sum::<usize>() as f64 / n as f64,
        median_length: median,
        max_length: lengths[n - 1] as f64,
        min_length: lengths[0] as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::preprocessor::preprocess;
    use crate::domain::aggregate::with_percentages;
    use crate::domain::bookmark::BookmarkTable;
    use crate::util::testing::record;

    fn fixture() -> DerivedTable {
        let mut records = vec![
            record("Rust", "https://doc.rust-lang.org/a", r"Work\Dev", "2023/05/01 9:15:00"),
            record("Rust 2", "https://doc.rust-lang.org/b", r"Work\Dev", "2024/01/07 14:30:00"),
            record("Home", "https://example.com", "Home", "2022/02/02 2:02:02"),
            record("Local", "notes.txt", r"Work\Dev\Deep", "bad"),
        ];
        records[2].web_browser = "Firefox".into();
        records[3].modified_time = "2024/01/01 0:00:00".into();
        preprocess(&BookmarkTable::new(records))
    }

    #[test]
    fn given_table_when_basic_stats_then_reports_totals_and_ranges() {
        // Act
        let stats = basic_stats(&fixture());

        // Assert
        assert_eq!(stats.total_bookmarks, 4);
        assert_eq!(stats.total_folders, 3);
        assert_eq!(stats.browsers["Chrome"], 3);
        assert_eq!(stats.browsers["Firefox"], 1);
        assert_eq!(stats.max_hierarchy_depth, 3);
        assert_eq!(stats.min_hierarchy_depth, 1);
        assert!((stats.avg_hierarchy_depth - 2.0).abs() < 1e-9);
        assert_eq!(stats.total_modified, 1);
        assert_eq!(
            stats.date_range_start.map(|d| d.to_string()),
            Some("2022-02-02 02:02:02".to_string())
        );
    }

    #[test]
    fn given_empty_table_when_basic_stats_then_everything_is_zero() {
        let stats = basic_stats(&DerivedTable::default());

        assert_eq!(stats.total_bookmarks, 0);
        assert_eq!(stats.avg_hierarchy_depth, 0.0);
        assert!(stats.date_range_start.is_none());
    }

    #[test]
    fn given_table_when_distributions_then_sorted_descending() {
        let table = fixture();

        let browsers = browser_distribution(&table);
        let folders = folder_distribution(&table, 1);
        let domains = domain_distribution(&table, 20);

        assert_eq!(browsers[0], CategoryCount::new("Chrome", 3));
        assert_eq!(folders, vec![CategoryCount::new("Dev", 2)]);
        assert_eq!(domains[0], CategoryCount::new("doc.rust-lang.org", 2));
        assert_eq!(domains.len(), 2);
    }

    #[test]
    fn given_table_when_depth_distribution_then_ascending_by_level() {
        let depths = hierarchy_depth_distribution(&fixture());

        let levels: Vec<(usize, usize)> = depths.iter().map(|d| (d.hierarchy_level, d.count)).collect();
        assert_eq!(levels, vec![(1, 1), (2, 2), (3, 1)]);
    }

    #[test]
    fn given_table_when_root_distribution_with_percentages_then_shares_sum_to_hundred() {
        let shares = with_percentages(&root_folder_distribution(&fixture()));

        assert_eq!(shares[0].category, "Work");
        assert!((shares.iter().map(|s| s.percentage).sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn given_even_row_count_when_title_length_stats_then_median_is_midpoint() {
        let stats = title_length_stats(&fixture());

        // lengths: 4, 6, 4, 5
        assert_eq!(stats.median_length, 4.5);
        assert_eq!(stats.mean_length, 4.75);
        assert_eq!(stats.max_length, 6.0);
        assert_eq!(stats.min_length, 4.0);
    }
}
