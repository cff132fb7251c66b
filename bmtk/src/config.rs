// bmtk/src/config.rs
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::folder_tree::TreemapMode;
use crate::domain::locale::Locale;
use crate::domain::tokenizer::{PosFilter, SplitMode};

/// Word cloud colormaps offered to the presentation layer
pub const COLORMAPS: [&str; 14] = [
    "viridis", "plasma", "inferno", "magma", "cividis", "twilight", "Blues", "Reds", "Greens",
    "Purples", "Oranges", "RdYlBu", "Spectral", "coolwarm",
];

pub const TOP_N_RANGE: RangeInclusive<usize> = 5..=200;
pub const MAX_WORDS_RANGE: RangeInclusive<usize> = 20..=200;
pub const TREEMAP_HEIGHT_RANGE: RangeInclusive<u32> = 400..=1200;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TreemapOpts {
    /// Nest by folder path (true) or group by folder name (false)
    #[serde(default = "default_hierarchical")]
    pub hierarchical: bool,

    /// Chart height in pixels
    #[serde(default = "default_treemap_height")]
    pub height: u32,

    /// Only folders up to this depth; unset or 0 shows everything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

fn default_hierarchical() -> bool {
    true
}

fn default_treemap_height() -> u32 {
    600
}

impl Default for TreemapOpts {
    fn default() -> Self {
        Self {
            hierarchical: default_hierarchical(),
            height: default_treemap_height(),
            max_depth: None,
        }
    }
}

impl TreemapOpts {
    pub fn mode(&self) -> TreemapMode {
        if self.hierarchical {
            TreemapMode::Hierarchical
        } else {
            TreemapMode::Grouped
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Tokenizer granularity: A (finest), B or C (compounds kept)
    #[serde(default)]
    pub tokenizer_mode: SplitMode,

    /// Language of labels and messages
    #[serde(default)]
    pub locale: Locale,

    /// Rows in the word ranking
    #[serde(default = "default_word_top_n")]
    pub word_top_n: usize,

    /// Rows in folder and domain distributions
    #[serde(default = "default_distribution_top_n")]
    pub distribution_top_n: usize,

    #[serde(default = "default_max_words")]
    pub wordcloud_max_words: usize,

    #[serde(default = "default_colormap")]
    pub colormap: String,

    #[serde(default)]
    pub treemap: TreemapOpts,

    /// Which part-of-speech tags count as words
    #[serde(default)]
    pub pos_filter: PosFilter,
}

fn default_word_top_n() -> usize {
    100
}

fn default_distribution_top_n() -> usize {
    20
}

fn default_max_words() -> usize {
    100
}

fn default_colormap() -> String {
    "viridis".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tokenizer_mode: SplitMode::default(),
            locale: Locale::default(),
            word_top_n: default_word_top_n(),
            distribution_top_n: default_distribution_top_n(),
            wordcloud_max_words: default_max_words(),
            colormap: default_colormap(),
            treemap: TreemapOpts::default(),
            pos_filter: PosFilter::default(),
        }
    }
}

fn check_range<T>(name: &str, value: T, range: &RangeInclusive<T>) -> DomainResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(DomainError::InvalidArgument(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

impl Settings {
    pub fn validate(&self) -> DomainResult<()> {
        check_range("word_top_n", self.word_top_n, &TOP_N_RANGE)?;
        check_range("distribution_top_n", self.distribution_top_n, &TOP_N_RANGE)?;
        check_range("wordcloud_max_words", self.wordcloud_max_words, &MAX_WORDS_RANGE)?;
        check_range("treemap.height", self.treemap.height, &TREEMAP_HEIGHT_RANGE)?;
        if !COLORMAPS.contains(&self.colormap.as_str()) {
            return Err(DomainError::InvalidArgument(format!(
                "Unknown colormap '{}', expected one of: {}",
                self.colormap,
                COLORMAPS.join(", ")
            )));
        }
        if self.pos_filter.accepted.is_empty() {
            return Err(DomainError::InvalidArgument(
                "pos_filter.accepted must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// `~/.config/bmtk/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config/bmtk/config.toml"))
}

fn read_config_file(path: &Path) -> DomainResult<Settings> {
    let text = std::fs::read_to_string(path)?;
    toml::from_str::<Settings>(&text).map_err(|e| {
        DomainError::InvalidArgument(format!("Invalid config file {}: {}", path.display(), e))
    })
}

fn env_override<T>(name: &str) -> DomainResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => {
            trace!("Using {} from environment: {}", name, value);
            value
                .parse::<T>()
                .map(Some)
                .map_err(|e| DomainError::InvalidArgument(format!("{}: {}", name, e)))
        }
        Err(_) => Ok(None),
    }
}

/// Defaults, then the config file (explicit path or the default location),
/// then `BMTK_*` environment variables. The result is validated.
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_file {
        Some(path) if !path.exists() => {
            return Err(DomainError::FileNotFound(path.to_path_buf()));
        }
        Some(path) => {
            debug!("Loading config from {}", path.display());
            read_config_file(path)?
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                read_config_file(&path)?
            }
            None => Settings::default(),
        },
    };

    if let Some(mode) = env_override::<SplitMode>("BMTK_TOKENIZER_MODE")? {
        settings.tokenizer_mode = mode;
    }
    if let Some(locale) = env_override::<Locale>("BMTK_LANG")? {
        settings.locale = locale;
    }
    if let Some(top_n) = env_override::<usize>("BMTK_TOP_N")? {
        settings.word_top_n = top_n;
    }

    settings.validate()?;
    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

pub fn generate_default_config() -> String {
    toml::to_string_pretty(&Settings::default())
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}
