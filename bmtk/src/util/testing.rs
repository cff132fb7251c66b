// bmtk/src/util/testing.rs

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::bookmark::BookmarkRecord;
use crate::domain::tokenizer::{PartOfSpeech, SplitMode, Token, Tokenizer};
use crate::infrastructure::tokenizer::LinderaTokenizer;

/// Environment variables read by `config::load_settings`
pub const SETTINGS_ENV_VARS: [&str; 3] = ["BMTK_TOKENIZER_MODE", "BMTK_LANG", "BMTK_TOP_N"];

/// Global test configuration, initialized exactly once via OnceLock.
#[derive(Debug)]
pub struct TestEnv {
    /// Directory holding the sample exports
    pub resources: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            resources: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources"),
        }
    }

    pub fn resource(&self, name: &str) -> PathBuf {
        self.resources.join(name)
    }
}

static TEST_ENV: OnceLock<TestEnv> = OnceLock::new();

/// Initializes logging and the resource paths exactly once.
pub fn init_test_env() -> &'static TestEnv {
    TEST_ENV.get_or_init(|| {
        setup_test_logging();
        let data = TestEnv::new();
        info!("Test environment initialized: {}", data.resources.display());
        data
    })
}

/// Logging setup only runs once; later calls are no-ops.
fn setup_test_logging() {
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let noisy_modules = ["assert_cmd", "predicates"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Clears the `BMTK_*` settings variables and restores them on drop
#[derive(Debug, Clone)]
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        let saved = SETTINGS_ENV_VARS
            .iter()
            .map(|name| (*name, env::var(name).ok()))
            .collect();
        for name in SETTINGS_ENV_VARS {
            env::remove_var(name);
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(val) => env::set_var(name, val),
                None => env::remove_var(name),
            }
        }
    }
}

/// Header line of a complete export, `Modified Time` included
pub const CSV_HEADER: &str = "Title,URL,Folder Name,Folder Path,Position,Created Time,Modified Time,ID,Guid,Web Browser,Bookmarks File";

/// Three bookmarks: a Monday in 2023, a Sunday and a Monday in 2024
pub fn sample_csv() -> String {
    [
        CSV_HEADER,
        r"Rust Book,https://doc.rust-lang.org/book/,Projects,Work\Projects,1,2023/05/01 9:15:00,,1,g-1,Chrome,Bookmarks",
        r"東京都庁に行った,https://www.metro.tokyo.lg.jp/,Travel,Personal\Travel,2,2024/01/07 14:30:00,2024/02/01 10:00:00,2,g-2,Firefox,places.sqlite",
        r"Tokio docs,https://tokio.rs/,Work,Work,3,2024/03/04 23:05:10,,3,g-3,Chrome,Bookmarks",
    ]
    .join("\n")
        + "\n"
}

/// Temp file with the given suffix (e.g. `.csv`) and content
pub fn write_temp_file(suffix: &str, content: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("bmtk-")
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content).expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Record with the fields the analyzers look at; everything else is filler
pub fn record(title: &str, url: &str, folder_path: &str, created: &str) -> BookmarkRecord {
    let folder_name = folder_path
        .rsplit('\\')
        .next()
        .unwrap_or(folder_path)
        .to_string();
    BookmarkRecord {
        title: title.to_string(),
        url: url.to_string(),
        folder_name,
        folder_path: folder_path.to_string(),
        position: "0".to_string(),
        created_time: created.to_string(),
        modified_time: String::new(),
        id: "0".to_string(),
        guid: format!("guid-{}", title),
        web_browser: "Chrome".to_string(),
        bookmarks_file: "Bookmarks".to_string(),
    }
}

static IPADIC_TOKENIZER: OnceLock<Arc<LinderaTokenizer>> = OnceLock::new();

/// IPADIC analyzer shared by all tests of one binary; the dictionary loads once
pub fn ipadic_tokenizer() -> Arc<LinderaTokenizer> {
    IPADIC_TOKENIZER
        .get_or_init(|| {
            Arc::new(LinderaTokenizer::new().expect("Failed to load IPADIC dictionary"))
        })
        .clone()
}

/// Whitespace tokenizer tagging every word as a common noun, regardless of mode
#[derive(Debug, Default, Clone)]
pub struct FakeTokenizer;

impl Tokenizer for FakeTokenizer {
    fn tokenize(&self, text: &str, _mode: SplitMode) -> Vec<Token> {
        text.split_whitespace()
            .map(|w| Token::new(w, PartOfSpeech::new(["名詞", "普通名詞", "一般"])))
            .collect()
    }
}
