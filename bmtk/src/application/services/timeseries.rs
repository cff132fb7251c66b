// bmtk/src/application/services/timeseries.rs
//! Counts over creation time. Rows whose `Created Time` did not parse carry no
//! temporal columns and are left out of every aggregation here.
use std::collections::{BTreeMap, BTreeSet};

use tracing::instrument;

use crate::domain::aggregate::{
    CumulativeCount, DateCount, Heatmap, HourCount, MonthCount, WeekdayCount, YearCount,
};
use crate::domain::derived::DerivedTable;
use crate::domain::locale::{hour_label, month_names, weekday_names, weekday_short_names, Locale};

pub(crate) fn count_sorted<K: Ord, I: IntoIterator<Item = K>>(keys: I) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Per (year, month), ascending; restricted to `year` when given
pub fn monthly_counts(table: &DerivedTable, year: Option<i32>) -> Vec<MonthCount> {
    count_sorted(
        table
            .iter()
            .filter(|r| year.is_none() || r.created_year == year)
            .filter_map(|r| r.created_year.zip(r.created_month)),
    )
    .into_iter()
    .map(|((year, month), count)| MonthCount { year, month, count })
    .collect()
}

pub fn yearly_counts(table: &DerivedTable) -> Vec<YearCount> {
    count_sorted(table.iter().filter_map(|r| r.created_year))
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

pub fn daily_counts(table: &DerivedTable) -> Vec<DateCount> {
    count_sorted(table.iter().filter_map(|r| r.created_date))
        .into_iter()
        .map(|(date, count)| DateCount { date, count })
        .collect()
}

fn weekday_name(weekday: u32, names: &[String]) -> String {
    names
        .get(weekday as usize)
        .cloned()
        .unwrap_or_else(|| format!("Unknown({})", weekday))
}

/// Per weekday (0 = Monday), ascending, with localized names
pub fn weekday_distribution(table: &DerivedTable, locale: Locale) -> Vec<WeekdayCount> {
    let names = weekday_names(locale);
    count_sorted(table.iter().filter_map(|r| r.created_weekday))
        .into_iter()
        .map(|(weekday, count)| WeekdayCount {
            weekday,
            weekday_name: weekday_name(weekday, &names),
            count,
        })
        .collect()
}

pub fn hourly_distribution(table: &DerivedTable) -> Vec<HourCount> {
    count_sorted(table.iter().filter_map(|r| r.created_hour))
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}

/// 7 x 24 matrix, rows Monday..Sunday, columns 00..23
#[instrument(skip_all, fields(rows = table.len()), level = "debug")]
pub fn weekday_hour_heatmap(table: &DerivedTable, locale: Locale) -> Heatmap {
    let mut heatmap = Heatmap::zeroed(
        (0..24).map(|h| hour_label(h, locale)).collect(),
        weekday_short_names(locale),
    );
    let counts = count_sorted(
        table
            .iter()
            .filter_map(|r| r.created_weekday.zip(r.created_hour)),
    );
    for ((weekday, hour), count) in counts {
        heatmap.set(weekday as usize, hour as usize, count);
    }
    heatmap
}

/// years x 12 matrix, one row per year present, ascending
#[instrument(skip_all, fields(rows = table.len()), level = "debug")]
pub fn year_month_heatmap(table: &DerivedTable, locale: Locale) -> Heatmap {
    let years = available_years(table);
    let mut heatmap = Heatmap::zeroed(
        month_names(locale),
        years.iter().map(|y| y.to_string()).collect(),
    );
    for row in monthly_counts(table, None) {
        if let Ok(y) = years.binary_search(&row.year) {
            heatmap.set(y, row.month as usize - 1, row.count);
        }
    }
    heatmap
}

/// Daily counts with a running total
pub fn cumulative_counts(table: &DerivedTable) -> Vec<CumulativeCount> {
    let mut running = 0;
    daily_counts(table)
        .into_iter()
        .map(|d| {
            running += d.count;
            CumulativeCount {
                date: d.date,
                count: d.count,
                cumulative_count: running,
            }
        })
        .collect()
}

/// Modifications per modification date
pub fn modified_timeline(table: &DerivedTable) -> Vec<DateCount> {
    count_sorted(
        table
            .iter()
            .filter_map(|r| r.modified_datetime.map(|d| d.date())),
    )
    .into_iter()
    .map(|(date, count)| DateCount { date, count })
    .collect()
}

/// Distinct creation years, ascending
pub fn available_years(table: &DerivedTable) -> Vec<i32> {
    table
        .iter()
        .filter_map(|r| r.created_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::preprocessor::preprocess;
    use crate::domain::bookmark::BookmarkTable;
    use crate::util::testing::record;
    use chrono::NaiveDate;

    fn fixture() -> DerivedTable {
        let mut records = vec![
            record("a", "", r"Work\Projects", "2023/05/01 9:15:00"),
            record("b", "", r"Work\Projects", "2024/01/07 14:30:00"),
            record("c", "", "Home", "2024/01/07 9:00:00"),
            record("d", "", "Home", "2024/03/04 23:05:10"),
            record("e", "", "Home", "unknown"),
        ];
        records[1].modified_time = "2024/02/01 10:00:00".into();
        records[2].modified_time = "2024/02/01 11:00:00".into();
        preprocess(&BookmarkTable::new(records))
    }

    #[test]
    fn given_two_years_when_yearly_counts_then_one_row_per_year() {
        let years = yearly_counts(&fixture());

        assert_eq!(
            years,
            vec![YearCount { year: 2023, count: 1 }, YearCount { year: 2024, count: 3 }]
        );
    }

    #[test]
    fn given_year_when_monthly_counts_then_only_that_year() {
        let months = monthly_counts(&fixture(), Some(2024));

        let labels: Vec<(String, usize)> = months.iter().map(|m| (m.label(), m.count)).collect();
        assert_eq!(labels, vec![("2024-01".into(), 2), ("2024-03".into(), 1)]);
        assert_eq!(monthly_counts(&fixture(), None).len(), 3);
    }

    #[test]
    fn given_table_when_weekday_distribution_then_names_are_localized() {
        let weekdays = weekday_distribution(&fixture(), Locale::En);

        let rows: Vec<(u32, &str, usize)> = weekdays
            .iter()
            .map(|w| (w.weekday, w.weekday_name.as_str(), w.count))
            .collect();
        assert_eq!(rows, vec![(0, "Monday", 2), (6, "Sunday", 2)]);
    }

    #[test]
    fn given_out_of_range_weekday_when_naming_then_renders_unknown() {
        assert_eq!(weekday_name(9, &weekday_names(Locale::En)), "Unknown(9)");
    }

    #[test]
    fn given_table_when_weekday_hour_heatmap_then_shape_is_seven_by_twenty_four() {
        // Act
        let heatmap = weekday_hour_heatmap(&fixture(), Locale::Ja);

        // Assert
        assert_eq!(heatmap.y_labels.len(), 7);
        assert_eq!(heatmap.x_labels.len(), 24);
        assert!(heatmap.values.iter().all(|row| row.len() == 24));
        assert_eq!(heatmap.get(0, 9), Some(1));
        assert_eq!(heatmap.get(6, 14), Some(1));
        assert_eq!(heatmap.get(0, 23), Some(1));
        assert_eq!(heatmap.total(), 4);
        assert_eq!(heatmap.x_labels[9], "09時");
    }

    #[test]
    fn given_table_when_year_month_heatmap_then_rows_are_years() {
        let heatmap = year_month_heatmap(&fixture(), Locale::En);

        assert_eq!(heatmap.y_labels, vec!["2023", "2024"]);
        assert_eq!(heatmap.x_labels.len(), 12);
        assert_eq!(heatmap.get(0, 4), Some(1));
        assert_eq!(heatmap.get(1, 0), Some(2));
        assert_eq!(heatmap.get(1, 2), Some(1));
    }

    #[test]
    fn given_table_when_cumulative_counts_then_running_total_ends_at_dated_rows() {
        let cumulative = cumulative_counts(&fixture());

        let totals: Vec<usize> = cumulative.iter().map(|c| c.cumulative_count).collect();
        assert_eq!(totals, vec![1, 3, 4]);
    }

    #[test]
    fn given_modified_rows_when_modified_timeline_then_grouped_by_date() {
        let timeline = modified_timeline(&fixture());

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].count, 2);
        assert_eq!(timeline[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn given_table_when_available_years_then_sorted_and_distinct() {
        assert_eq!(available_years(&fixture()), vec![2023, 2024]);
        assert!(available_years(&DerivedTable::default()).is_empty());
    }
}
