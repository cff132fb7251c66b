// bmtk/src/infrastructure/mod.rs
pub mod encoding;
pub mod error;
pub mod export;
pub mod loader;
pub mod tokenizer;

pub use loader::BookmarkLoader;
pub use tokenizer::LinderaTokenizer;
