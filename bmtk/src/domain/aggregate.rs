// bmtk/src/domain/aggregate.rs
use std::collections::HashMap;
use std::hash::Hash;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;

/// `{category, count}` row of a distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new<S: Into<String>>(category: S, count: usize) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

/// `{category, count, percentage}` row; percentage of the total over all rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

/// Fixed-shape count matrix, row-major by `y_labels`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub values: Vec<Vec<usize>>,
}

impl Heatmap {
    /// Zero-filled matrix with one row per y label and one column per x label
    pub fn zeroed(x_labels: Vec<String>, y_labels: Vec<String>) -> Self {
        let values = vec![vec![0; x_labels.len()]; y_labels.len()];
        Self {
            x_labels,
            y_labels,
            values,
        }
    }

    /// Sets a cell; coordinates outside the matrix are ignored
    pub fn set(&mut self, y: usize, x: usize, count: usize) {
        if let Some(cell) = self.values.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = count;
        }
    }

    pub fn get(&self, y: usize, x: usize) -> Option<usize> {
        self.values.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn total(&self) -> usize {
        self.values.iter().flatten().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub count: usize,
}

impl MonthCount {
    /// `YYYY-MM` label
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CumulativeCount {
    pub date: NaiveDate,
    pub count: usize,
    pub cumulative_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayCount {
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u32,
    pub weekday_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepthCount {
    pub hierarchy_level: usize,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicStats {
    pub total_bookmarks: usize,
    pub total_folders: usize,
    pub date_range_start: Option<NaiveDateTime>,
    pub date_range_end: Option<NaiveDateTime>,
    pub browsers: IndexMap<String, usize>,
    pub avg_hierarchy_depth: f64,
    pub max_hierarchy_depth: usize,
    pub min_hierarchy_depth: usize,
    pub total_modified: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleLengthStats {
    pub mean_length: f64,
    pub median_length: f64,
    pub max_length: f64,
    pub min_length: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderStatistics {
    pub folder_path: String,
    pub bookmark_count: usize,
    pub depth: usize,
    pub first_bookmark: Option<NaiveDateTime>,
    pub last_bookmark: Option<NaiveDateTime>,
}

/// Counts occurrences per key, keys in first-seen order
pub fn count_by<K, I>(keys: I) -> IndexMap<K, usize>
where
    K: Hash + Eq,
    I: IntoIterator<Item = K>,
{
    let mut counts: IndexMap<K, usize> = IndexMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Sorts descending by count; ties keep their first-seen order
pub fn sorted_desc(counts: IndexMap<String, usize>) -> Vec<CategoryCount> {
    let mut rows: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount::new(category, count))
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Adds a percentage column relative to the sum of all counts
pub fn with_percentages(rows: &[CategoryCount]) -> Vec<CategoryShare> {
    let total: usize = rows.iter().map(|r| r.count).sum();
    rows.iter()
        .map(|r| CategoryShare {
            category: r.category.clone(),
            count: r.count,
            percentage: if total == 0 {
                0.0
            } else {
                r.count as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

/// Index of each label for O(1) placement into a heatmap
pub(crate) fn label_index(labels: &[String]) -> HashMap<&str, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect()
}
