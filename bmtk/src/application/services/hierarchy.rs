// bmtk/src/application/services/hierarchy.rs
//! Folder hierarchy views built from the flat `Folder Path` column.
//!
//! Paths are normalized (empty segments from doubled, leading or trailing
//! separators dropped) before grouping. A folder's subfolder count is the
//! number of distinct paths exactly one segment below it. It is computed from
//! the path set alone, so a folder can have tree children materialized through
//! deeper paths while reporting zero subfolders.
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::application::services::statistics::folder_distribution;
use crate::application::services::timeseries::count_sorted;
use crate::domain::aggregate::{count_by, label_index, sorted_desc, FolderStatistics, Heatmap, MonthCount};
use crate::domain::bookmark::FOLDER_SEPARATOR;
use crate::domain::derived::DerivedTable;
use crate::domain::folder_tree::{FolderTreeNode, TreemapData, TreemapMode, TREEMAP_ROOT, TREE_ROOT};
use crate::domain::locale::{Locale, Message};

/// Drops empty segments: `Work\\Projects\` becomes `Work\Projects`
pub fn normalize_path(path: &str) -> String {
    let separator = FOLDER_SEPARATOR.to_string();
    path.split(FOLDER_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Bookmarks per normalized path, first-seen order
fn path_counts(table: &DerivedTable) -> IndexMap<String, usize> {
    count_by(table.iter().map(|r| normalize_path(&r.record.folder_path)))
}

fn parent_of(path: &str) -> Option<&str> {
    path.rfind(FOLDER_SEPARATOR).map(|i| &path[..i])
}

/// Distinct paths one segment below each path.
///
/// Equivalent to scanning every pair of paths for "one more segment and
/// prefixed by `path\`", in O(P) instead of O(P²).
fn child_counts<'a, I>(paths: I) -> HashMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = HashMap::new();
    let distinct: HashSet<&str> = paths.into_iter().collect();
    for path in distinct {
        if let Some(parent) = parent_of(path) {
            *counts.entry(parent).or_insert(0) += 1;
        }
    }
    counts
}

fn node_text(name: &str, url_count: usize, child_count: usize, locale: Locale) -> String {
    format!(
        "{}<br>{}: {}<br>{}: {}",
        name,
        Message::UrlCount.text(locale),
        url_count,
        Message::SubfolderCount.text(locale),
        child_count
    )
}

/// Treemap arrays for the table. `max_depth` of `Some(d)` with `d > 0` keeps
/// rows whose hierarchy level is at most `d`.
#[instrument(skip(table, locale), fields(rows = table.len()), level = "debug")]
pub fn build_treemap(
    table: &DerivedTable,
    max_depth: Option<usize>,
    mode: TreemapMode,
    locale: Locale,
) -> TreemapData {
    let filtered;
    let table = match max_depth.filter(|d| *d > 0) {
        Some(depth) => {
            filtered = table.filter(|r| r.hierarchy_level <= depth);
            &filtered
        }
        None => table,
    };

    let mut data = TreemapData::default();
    data.push(TREEMAP_ROOT, "", 0, format!("{} URLs", table.len()));

    match mode {
        TreemapMode::Hierarchical => push_hierarchical(table, locale, &mut data),
        TreemapMode::Grouped => push_grouped(table, locale, &mut data),
    }
    debug!("treemap with {} nodes", data.len());
    data
}

fn push_hierarchical(table: &DerivedTable, locale: Locale, data: &mut TreemapData) {
    let counts = path_counts(table);
    let children = child_counts(counts.keys().map(String::as_str));
    let mut seen: HashSet<String> = HashSet::new();

    for row in sorted_desc(counts.clone()) {
        let parts: Vec<&str> = row.category.split(FOLDER_SEPARATOR).collect();
        for i in 0..parts.len() {
            let current = parts[..=i].join("\\");
            if !seen.insert(current.clone()) {
                continue;
            }
            let parent = if i == 0 {
                TREEMAP_ROOT.to_string()
            } else {
                parts[..i].join("\\")
            };
            let direct = counts.get(&current).copied().unwrap_or(0);
            let child_count = children.get(current.as_str()).copied().unwrap_or(0);
            let text = node_text(parts[i], direct, child_count, locale);
            data.push(current, parent, direct.max(1), text);
        }
    }
}

fn push_grouped(table: &DerivedTable, locale: Locale, data: &mut TreemapData) {
    let by_name = sorted_desc(count_by(table.iter().map(|r| r.record.folder_name.clone())));
    for row in by_name {
        let text = format!(
            "{}<br>{}: {}",
            row.category,
            Message::UrlCount.text(locale),
            row.count
        );
        data.push(row.category, TREEMAP_ROOT, row.count, text);
    }
}

/// Same arrays as the hierarchical treemap
pub fn build_sunburst(table: &DerivedTable, max_depth: Option<usize>, locale: Locale) -> TreemapData {
    build_treemap(table, max_depth, TreemapMode::Hierarchical, locale)
}

/// Per raw folder path: bookmark count, depth and creation range, busiest first
#[instrument(skip_all, fields(rows = table.len()), level = "debug")]
pub fn folder_statistics(table: &DerivedTable) -> Vec<FolderStatistics> {
    let mut stats: IndexMap<&str, FolderStatistics> = IndexMap::new();
    for row in table.iter() {
        let entry = stats
            .entry(row.record.folder_path.as_str())
            .or_insert_with(|| FolderStatistics {
                folder_path: row.record.folder_path.clone(),
                bookmark_count: 0,
                depth: row.hierarchy_level,
                first_bookmark: None,
                last_bookmark: None,
            });
        entry.bookmark_count += 1;
        if let Some(created) = row.created_datetime {
            entry.first_bookmark = Some(entry.first_bookmark.map_or(created, |f| f.min(created)));
            entry.last_bookmark = Some(entry.last_bookmark.map_or(created, |l| l.max(created)));
        }
    }

    let mut rows: Vec<FolderStatistics> = stats.into_values().collect();
    rows.sort_by(|a, b| b.bookmark_count.cmp(&a.bookmark_count));
    rows
}

/// Top `top_n` folder names by count against the year-months they received bookmarks
#[instrument(skip(table), fields(rows = table.len()), level = "debug")]
pub fn folder_timeline_heatmap(table: &DerivedTable, top_n: usize) -> Heatmap {
    let folders: Vec<String> = folder_distribution(table, top_n)
        .into_iter()
        .map(|c| c.category)
        .collect();
    let folder_index = label_index(&folders);

    let cells = count_sorted(table.iter().filter_map(|r| {
        let folder = folder_index.get(r.record.folder_name.as_str())?;
        Some(((r.created_year?, r.created_month?), *folder))
    }));

    let mut months: Vec<(i32, u32)> = cells.keys().map(|(ym, _)| *ym).collect();
    months.dedup();
    let x_labels = months
        .iter()
        .map(|&(year, month)| MonthCount { year, month, count: 0 }.label())
        .collect();

    let mut heatmap = Heatmap::zeroed(x_labels, folders);
    for ((year_month, folder), count) in cells {
        if let Ok(x) = months.binary_search(&year_month) {
            heatmap.set(folder, x, count);
        }
    }
    heatmap
}

/// Nested folder tree under a synthetic `Root`, children in first-seen path order
#[instrument(skip_all, fields(rows = table.len()), level = "debug")]
pub fn build_folder_tree(table: &DerivedTable) -> FolderTreeNode {
    let counts = path_counts(table);
    let children = child_counts(counts.keys().map(String::as_str));

    let mut root = FolderTreeNode::new(TREE_ROOT);
    for (path, count) in &counts {
        let node = path
            .split(FOLDER_SEPARATOR)
            .fold(&mut root, |node, segment| node.child_mut_or_insert(segment));
        node.url_count = *count;
        node.subfolder_count = children.get(path.as_str()).copied().unwrap_or(0);
    }
    root
}

pub fn render_tree_text(tree: &FolderTreeNode, locale: Locale) -> String {
    tree.render_text(locale)
}
