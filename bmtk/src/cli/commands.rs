// src/cli/commands.rs
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::application::services::hierarchy::{
    build_folder_tree, build_treemap, folder_statistics, folder_timeline_heatmap,
    render_tree_text,
};
use crate::application::services::preprocessor::preprocess;
use crate::application::services::statistics::{
    basic_stats, browser_distribution, domain_distribution, folder_distribution,
    hierarchy_depth_distribution, root_folder_distribution, title_length_stats,
};
use crate::application::services::text_analysis::{word_ranking, TextAnalyzer};
use crate::application::services::timeseries::{
    available_years, cumulative_counts, daily_counts, hourly_distribution, modified_timeline,
    monthly_counts, weekday_distribution, weekday_hour_heatmap, year_month_heatmap,
    yearly_counts,
};
use crate::application::AnalysisSession;
use crate::cli::args::{DistKind, HeatmapKind, InputArgs, TimelineKind};
use crate::cli::display::{format_heatmap, format_key_values, format_table, print_output};
use crate::cli::error::{CliError, CliResult};
use crate::config::{Settings, TOP_N_RANGE};
use crate::domain::aggregate::{with_percentages, CategoryCount};
use crate::domain::bookmark::{BookmarkTable, FileFormat};
use crate::domain::derived::DerivedTable;
use crate::domain::folder_tree::TreemapMode;
use crate::domain::locale::{hour_label, Locale, Message};
use crate::domain::tokenizer::SplitMode;
use crate::infrastructure::export::export_rows;
use crate::infrastructure::loader::BookmarkLoader;
use crate::infrastructure::tokenizer::LinderaTokenizer;
use crate::util::path::expand_path;

/// Settings resolved against the global flags
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub settings: Settings,
    pub locale: Locale,
    pub color: bool,
}

impl CommandContext {
    pub fn new(settings: Settings, lang: Option<Locale>, color: bool) -> Self {
        let locale = lang.unwrap_or(settings.locale);
        Self {
            settings,
            locale,
            color,
        }
    }

    fn text(&self, message: Message) -> &'static str {
        message.text(self.locale)
    }

    fn table<S: AsRef<str>>(&self, headers: &[S], rows: &[Vec<String>]) -> String {
        format_table(headers, rows, self.color)
    }
}

fn load_records(input: &InputArgs) -> CliResult<BookmarkTable> {
    let path = expand_path(&input.file);
    Ok(BookmarkLoader::new().load(&path, input.format)?)
}

fn load_table(input: &InputArgs) -> CliResult<DerivedTable> {
    Ok(preprocess(&load_records(input)?))
}

/// JSON when requested, otherwise the rendered text
fn emit<T, F>(value: &T, json: bool, render: F) -> CliResult<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    let text = if json {
        serde_json::to_string_pretty(value)
            .map_err(|e| CliError::CommandFailed(format!("JSON output: {}", e)))?
    } else {
        render()
    };
    print_output(&text)?;
    Ok(())
}

fn resolve_top(top: Option<usize>, default: usize) -> CliResult<usize> {
    let top = top.unwrap_or(default);
    if TOP_N_RANGE.contains(&top) {
        Ok(top)
    } else {
        Err(CliError::InvalidInput(format!(
            "--top must be between {} and {}, got {}",
            TOP_N_RANGE.start(),
            TOP_N_RANGE.end(),
            top
        )))
    }
}

fn fmt_percentage(p: f64) -> String {
    format!("{:.1}", p)
}

fn fmt_datetime(value: Option<chrono::NaiveDateTime>) -> String {
    value.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

#[instrument(skip(ctx), level = "debug")]
pub fn summary(ctx: &CommandContext, input: &InputArgs) -> CliResult<()> {
    let table = load_table(input)?;
    let stats = basic_stats(&table);
    let titles = title_length_stats(&table);
    let years = available_years(&table);

    let value = json!({
        "basic": stats,
        "title_length": titles,
        "years": years,
    });
    emit(&value, input.json, || {
        let browsers = stats
            .browsers
            .iter()
            .map(|(name, count)| format!("{} ({})", name, count))
            .collect::<Vec<_>>()
            .join(", ");
        let pairs = vec![
            (ctx.text(Message::Bookmarks).to_string(), stats.total_bookmarks.to_string()),
            (ctx.text(Message::Folders).to_string(), stats.total_folders.to_string()),
            (ctx.text(Message::Modified).to_string(), stats.total_modified.to_string()),
            (ctx.text(Message::FirstCreated).to_string(), fmt_datetime(stats.date_range_start)),
            (ctx.text(Message::LastCreated).to_string(), fmt_datetime(stats.date_range_end)),
            (ctx.text(Message::Browsers).to_string(), browsers),
            (
                ctx.text(Message::DepthRange).to_string(),
                format!(
                    "{} / {:.2} / {}",
                    stats.min_hierarchy_depth, stats.avg_hierarchy_depth, stats.max_hierarchy_depth
                ),
            ),
            (
                ctx.text(Message::TitleLength).to_string(),
                format!("{:.1} / {:.1}", titles.mean_length, titles.median_length),
            ),
            (
                ctx.text(Message::Years).to_string(),
                years.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(", "),
            ),
        ];
        format_key_values(&pairs, ctx.color)
    })
}

#[instrument(skip(ctx), level = "debug")]
pub fn dist(
    ctx: &CommandContext,
    input: &InputArgs,
    by: DistKind,
    top: Option<usize>,
) -> CliResult<()> {
    let table = load_table(input)?;
    let (label, counts): (Message, Vec<CategoryCount>) = match by {
        DistKind::Browser => (Message::Browser, browser_distribution(&table)),
        DistKind::Folder => {
            let top = resolve_top(top, ctx.settings.distribution_top_n)?;
            (Message::Folder, folder_distribution(&table, top))
        }
        DistKind::Domain => {
            let top = resolve_top(top, ctx.settings.distribution_top_n)?;
            (Message::Domain, domain_distribution(&table, top))
        }
        DistKind::Root => (Message::RootFolder, root_folder_distribution(&table)),
        DistKind::Depth => {
            let rows = hierarchy_depth_distribution(&table);
            return emit(&rows, input.json, || {
                let cells: Vec<Vec<String>> = rows
                    .iter()
                    .map(|r| vec![r.hierarchy_level.to_string(), r.count.to_string()])
                    .collect();
                ctx.table(&[ctx.text(Message::Depth), ctx.text(Message::Count)], &cells)
            });
        }
    };

    let shares = with_percentages(&counts);
    emit(&shares, input.json, || {
        let cells: Vec<Vec<String>> = shares
            .iter()
            .map(|s| vec![s.category.clone(), s.count.to_string(), fmt_percentage(s.percentage)])
            .collect();
        ctx.table(
            &[
                ctx.text(label),
                ctx.text(Message::Count),
                ctx.text(Message::Percentage),
            ],
            &cells,
        )
    })
}

fn two_columns(ctx: &CommandContext, label: Message, rows: Vec<(String, usize)>) -> String {
    let cells: Vec<Vec<String>> = rows
        .into_iter()
        .map(|(key, count)| vec![key, count.to_string()])
        .collect();
    ctx.table(&[ctx.text(label), ctx.text(Message::Count)], &cells)
}

#[instrument(skip(ctx), level = "debug")]
pub fn timeline(
    ctx: &CommandContext,
    input: &InputArgs,
    by: TimelineKind,
    year: Option<i32>,
) -> CliResult<()> {
    let table = load_table(input)?;
    let json = input.json;

    match by {
        TimelineKind::Year => {
            let rows = yearly_counts(&table);
            emit(&rows, json, || {
                let cells = rows.iter().map(|r| (r.year.to_string(), r.count)).collect();
                two_columns(ctx, Message::Year, cells)
            })
        }
        TimelineKind::Month => {
            let rows = monthly_counts(&table, year);
            emit(&rows, json, || {
                let cells = rows.iter().map(|r| (r.label(), r.count)).collect();
                two_columns(ctx, Message::Month, cells)
            })
        }
        TimelineKind::Day => {
            let rows = daily_counts(&table);
            emit(&rows, json, || {
                let cells = rows.iter().map(|r| (r.date.to_string(), r.count)).collect();
                two_columns(ctx, Message::Date, cells)
            })
        }
        TimelineKind::Weekday => {
            let rows = weekday_distribution(&table, ctx.locale);
            emit(&rows, json, || {
                let cells = rows
                    .iter()
                    .map(|r| (r.weekday_name.clone(), r.count))
                    .collect();
                two_columns(ctx, Message::Weekday, cells)
            })
        }
        TimelineKind::Hour => {
            let rows = hourly_distribution(&table);
            emit(&rows, json, || {
                let cells = rows
                    .iter()
                    .map(|r| (hour_label(r.hour, ctx.locale), r.count))
                    .collect();
                two_columns(ctx, Message::Hour, cells)
            })
        }
        TimelineKind::Cumulative => {
            let rows = cumulative_counts(&table);
            emit(&rows, json, || {
                let cells: Vec<Vec<String>> = rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.date.to_string(),
                            r.count.to_string(),
                            r.cumulative_count.to_string(),
                        ]
                    })
                    .collect();
                ctx.table(
                    &[
                        ctx.text(Message::Date),
                        ctx.text(Message::Count),
                        ctx.text(Message::Cumulative),
                    ],
                    &cells,
                )
            })
        }
        TimelineKind::Modified => {
            let rows = modified_timeline(&table);
            emit(&rows, json, || {
                let cells = rows.iter().map(|r| (r.date.to_string(), r.count)).collect();
                two_columns(ctx, Message::Date, cells)
            })
        }
    }
}

#[instrument(skip(ctx), level = "debug")]
pub fn heatmap(
    ctx: &CommandContext,
    input: &InputArgs,
    kind: HeatmapKind,
    top: Option<usize>,
) -> CliResult<()> {
    let table = load_table(input)?;
    let (corner, heatmap) = match kind {
        HeatmapKind::WeekdayHour => (
            ctx.text(Message::Weekday),
            weekday_hour_heatmap(&table, ctx.locale),
        ),
        HeatmapKind::YearMonth => (ctx.text(Message::Year), year_month_heatmap(&table, ctx.locale)),
        HeatmapKind::FolderTimeline => {
            let top = resolve_top(top, ctx.settings.distribution_top_n)?;
            (ctx.text(Message::Folder), folder_timeline_heatmap(&table, top))
        }
    };
    emit(&heatmap, input.json, || format_heatmap(&heatmap, corner, ctx.color))
}

#[instrument(skip(ctx), level = "debug")]
pub fn tree(ctx: &CommandContext, input: &InputArgs) -> CliResult<()> {
    let table = load_table(input)?;
    let tree = build_folder_tree(&table);
    emit(&tree, input.json, || render_tree_text(&tree, ctx.locale))
}

#[instrument(skip(ctx), level = "debug")]
pub fn folders(ctx: &CommandContext, input: &InputArgs) -> CliResult<()> {
    let table = load_table(input)?;
    let stats = folder_statistics(&table);
    emit(&stats, input.json, || {
        let cells: Vec<Vec<String>> = stats
            .iter()
            .map(|s| {
                vec![
                    s.folder_path.clone(),
                    s.bookmark_count.to_string(),
                    s.depth.to_string(),
                    fmt_datetime(s.first_bookmark),
                    fmt_datetime(s.last_bookmark),
                ]
            })
            .collect();
        ctx.table(
            &[
                ctx.text(Message::Folder),
                ctx.text(Message::Count),
                ctx.text(Message::Depth),
                ctx.text(Message::FirstBookmark),
                ctx.text(Message::LastBookmark),
            ],
            &cells,
        )
    })
}

#[instrument(skip(ctx), level = "debug")]
pub fn treemap(
    ctx: &CommandContext,
    input: &InputArgs,
    grouped: bool,
    max_depth: Option<usize>,
) -> CliResult<()> {
    let table = load_table(input)?;
    let mode = if grouped {
        TreemapMode::Grouped
    } else {
        ctx.settings.treemap.mode()
    };
    let max_depth = max_depth.or(ctx.settings.treemap.max_depth);
    let data = build_treemap(&table, max_depth, mode, ctx.locale);

    emit(&data, input.json, || {
        let cells: Vec<Vec<String>> = (0..data.len())
            .map(|i| {
                vec![
                    data.labels[i].clone(),
                    data.parents[i].clone(),
                    data.values[i].to_string(),
                    data.text[i].replace("<br>", " | "),
                ]
            })
            .collect();
        ctx.table(
            &[
                ctx.text(Message::Label),
                ctx.text(Message::Parent),
                ctx.text(Message::Value),
                ctx.text(Message::Text),
            ],
            &cells,
        )
    })
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(ctx), level = "debug")]
pub fn words(
    ctx: &CommandContext,
    input: &InputArgs,
    mode: Option<SplitMode>,
    years: &[i32],
    latest: bool,
    top: Option<usize>,
    export: Option<FileFormat>,
    output: Option<&std::path::Path>,
) -> CliResult<()> {
    let mode = mode.unwrap_or(ctx.settings.tokenizer_mode);
    let top = resolve_top(top, ctx.settings.word_top_n)?;
    let analyzer = TextAnalyzer::with_filter(
        Arc::new(LinderaTokenizer::new()?),
        ctx.settings.pos_filter.clone(),
    );

    let mut session = AnalysisSession::load(
        &BookmarkLoader::new(),
        &expand_path(&input.file),
        input.format,
        analyzer,
        mode,
    )?;
    if latest {
        session.apply_years(false, &[])?;
    } else if !years.is_empty() {
        session.apply_years(false, years)?;
    }
    debug!("Word ranking for {:?}", session.selection());

    let ranking = word_ranking(&session.word_frequency(), top);
    if ranking.is_empty() {
        eprintln!("{}", ctx.text(Message::NoWordsFound));
    }

    if let (Some(format), Some(path)) = (export, output) {
        let path = expand_path(path);
        export_rows(&ranking, format, &path)?;
        eprintln!("Exported {} rows to {}", ranking.len(), path.display());
        return Ok(());
    }

    emit(&ranking, input.json, || {
        let cells: Vec<Vec<String>> = ranking
            .iter()
            .map(|r| {
                vec![
                    r.rank.to_string(),
                    r.word.clone(),
                    r.count.to_string(),
                    format!("{:.2}", r.percentage),
                ]
            })
            .collect();
        ctx.table(
            &[
                ctx.text(Message::Rank),
                ctx.text(Message::Word),
                ctx.text(Message::Count),
                ctx.text(Message::Percentage),
            ],
            &cells,
        )
    })
}

#[instrument(skip(ctx), level = "debug")]
pub fn preview(ctx: &CommandContext, input: &InputArgs, rows: usize) -> CliResult<()> {
    let table = load_records(input)?;
    let head = BookmarkLoader::new().preview(&table, rows);
    emit(head.records(), input.json, || {
        let cells: Vec<Vec<String>> = head
            .iter()
            .map(|r| {
                vec![
                    r.title.clone(),
                    r.url.clone(),
                    r.folder_path.clone(),
                    r.created_time.clone(),
                ]
            })
            .collect();
        ctx.table(
            &[
                ctx.text(Message::Title),
                "URL",
                ctx.text(Message::Folder),
                ctx.text(Message::Date),
            ],
            &cells,
        )
    })
}
