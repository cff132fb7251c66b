// src/cli/args.rs
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::bookmark::FileFormat;
use crate::domain::locale::Locale;
use crate::domain::tokenizer::SplitMode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Analytics for browser bookmark exports
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Output language: ja or en
    #[arg(long, value_name = "LANG")]
    pub lang: Option<Locale>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print the default configuration as TOML
    #[arg(long = "generate-config")]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Input file options shared by every analysis command
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Bookmark export (CSV or JSON)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Input format, overrides the file extension
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<FileFormat>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistKind {
    Browser,
    Folder,
    Domain,
    Depth,
    Root,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineKind {
    Year,
    Month,
    Day,
    Weekday,
    Hour,
    Cumulative,
    Modified,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatmapKind {
    WeekdayHour,
    YearMonth,
    FolderTimeline,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Totals, date range, depth and title length statistics
    Summary {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Bookmark counts per category, busiest first
    Dist {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value = "browser")]
        by: DistKind,

        /// Rows to show for folder and domain distributions
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },

    /// Bookmark counts over creation time
    Timeline {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value = "month")]
        by: TimelineKind,

        /// Restrict monthly counts to one year
        #[arg(long, value_name = "YEAR")]
        year: Option<i32>,
    },

    /// Two-dimensional count matrices
    Heatmap {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value = "weekday-hour")]
        kind: HeatmapKind,

        /// Folders in the folder timeline
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },

    /// Nested folder tree with bookmark and subfolder counts
    Tree {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Per-folder statistics: count, depth, first and last bookmark
    Folders {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Treemap arrays (labels, parents, values, text)
    Treemap {
        #[command(flatten)]
        input: InputArgs,

        /// Group by folder name instead of nesting by path
        #[arg(long)]
        grouped: bool,

        /// Only folders up to this depth
        #[arg(long, value_name = "DEPTH")]
        max_depth: Option<usize>,
    },

    /// Word ranking over bookmark titles
    Words {
        #[command(flatten)]
        input: InputArgs,

        /// Tokenizer granularity: A, B or C
        #[arg(long, value_name = "MODE")]
        mode: Option<SplitMode>,

        /// Comma separated creation years, e.g. 2023,2024
        #[arg(long, value_delimiter = ',', value_name = "YEARS", conflicts_with = "latest")]
        years: Vec<i32>,

        /// Only the most recent year
        #[arg(long)]
        latest: bool,

        /// Rows in the ranking
        #[arg(long, value_name = "N")]
        top: Option<usize>,

        /// Write the ranking as csv or json
        #[arg(long, value_name = "FORMAT", requires = "output")]
        export: Option<FileFormat>,

        /// Export destination
        #[arg(short, long, value_name = "PATH", requires = "export")]
        output: Option<PathBuf>,
    },

    /// First rows of the export
    Preview {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short = 'n', long = "rows", default_value_t = 5)]
        rows: usize,
    },

    /// Generates shell completion scripts
    Completion {
        /// The shell to generate completions for
        #[arg(value_name = "SHELL", value_parser = ["bash", "zsh", "fish"])]
        shell: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn given_cli_command_when_verify_then_debug_asserts_pass() {
        Cli::command().debug_assert()
    }

    #[test]
    fn given_words_arguments_when_parsing_then_years_are_split_on_commas() {
        let cli = Cli::try_parse_from([
            "bmtk", "--lang", "en", "words", "b.csv", "--years", "2023,2024", "--mode", "A",
        ])
        .unwrap();

        assert_eq!(cli.lang, Some(Locale::En));
        match cli.command {
            Some(Commands::Words { years, mode, .. }) => {
                assert_eq!(years, vec![2023, 2024]);
                assert_eq!(mode, Some(SplitMode::A));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn given_export_without_output_when_parsing_then_error() {
        let result = Cli::try_parse_from(["bmtk", "words", "b.csv", "--export", "csv"]);

        assert!(result.is_err());
    }

    #[test]
    fn given_heatmap_kind_when_parsing_then_kebab_case_is_accepted() {
        let cli = Cli::try_parse_from(["bmtk", "heatmap", "b.csv", "--kind", "folder-timeline"]).unwrap();

        assert!(matches!(
            cli.command,
            Some(Commands::Heatmap { kind: HeatmapKind::FolderTimeline, .. })
        ));
    }
}
