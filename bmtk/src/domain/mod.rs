// bmtk/src/domain/mod.rs
pub mod aggregate;
pub mod bookmark;
pub mod derived;
pub mod error;
pub mod folder_tree;
pub mod locale;
pub mod tokenizer;
pub mod word_frequency;

pub use bookmark::{BookmarkRecord, BookmarkTable, FileFormat, RawTable};
pub use derived::{DerivedBookmark, DerivedTable};
pub use error::{DomainError, DomainResult};
