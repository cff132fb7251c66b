// bmtk/src/domain/derived.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::bookmark::BookmarkRecord;

/// A bookmark record together with the columns derived from its raw fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedBookmark {
    #[serde(flatten)]
    pub record: BookmarkRecord,
    pub created_datetime: Option<NaiveDateTime>,
    pub modified_datetime: Option<NaiveDateTime>,
    /// Number of segments in `Folder Path`, always >= 1
    pub hierarchy_level: usize,
    pub root_folder: String,
    pub created_year: Option<i32>,
    pub created_month: Option<u32>,
    pub created_day: Option<u32>,
    pub created_hour: Option<u32>,
    pub created_date: Option<NaiveDate>,
    /// 0 = Monday .. 6 = Sunday
    pub created_weekday: Option<u32>,
    /// Host of `URL`, empty when the URL cannot be parsed
    pub domain: String,
    pub is_modified: bool,
    /// Character count of `Title`
    pub title_length: usize,
}

/// Preprocessed working table. Row order matches the raw table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedTable {
    rows: Vec<DerivedBookmark>,
}

impl DerivedTable {
    pub fn new(rows: Vec<DerivedBookmark>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DerivedBookmark] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivedBookmark> {
        self.rows.iter()
    }

    /// New table holding the rows matching `predicate`
    pub fn filter<P>(&self, predicate: P) -> DerivedTable
    where
        P: Fn(&DerivedBookmark) -> bool,
    {
        DerivedTable::new(self.rows.iter().filter(|r| predicate(r)).cloned().collect())
    }
}

impl FromIterator<DerivedBookmark> for DerivedTable {
    fn from_iter<I: IntoIterator<Item = DerivedBookmark>>(iter: I) -> Self {
        DerivedTable::new(iter.into_iter().collect())
    }
}
