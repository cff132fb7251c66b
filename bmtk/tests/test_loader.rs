use bmtk::domain::bookmark::FileFormat;
use bmtk::domain::error::DomainError;
use bmtk::infrastructure::encoding::{detect_file_encoding, TextEncoding};
use bmtk::infrastructure::loader::BookmarkLoader;
use bmtk::util::testing::{init_test_env, write_temp_file};
use rstest::*;

#[fixture]
fn loader() -> BookmarkLoader {
    BookmarkLoader::new()
}

#[rstest]
fn given_utf8_export_when_loading_then_all_rows_are_read(loader: BookmarkLoader) {
    // Arrange
    let env = init_test_env();

    // Act
    let table = loader.load(&env.resource("bookmarks.csv"), None).unwrap();

    // Assert
    assert_eq!(table.len(), 8);
    let first = &table.records()[0];
    assert_eq!(first.title, "Rust Book");
    assert_eq!(first.folder_path, r"Work\Projects");
    assert_eq!(table.records()[1].modified_time, "2024/02/01 10:00:00");
}

#[rstest]
fn given_export_without_guid_column_when_loading_then_schema_error_names_guid(
    loader: BookmarkLoader,
) {
    let env = init_test_env();

    let result = loader.load(&env.resource("bookmarks_missing_guid.csv"), None);

    match result {
        Err(DomainError::SchemaError { missing, message }) => {
            assert!(missing.contains(&"Guid".to_string()));
            assert!(message.contains("Guid"));
        }
        other => panic!("Expected SchemaError, got {:?}", other),
    }
}

#[rstest]
fn given_utf16le_bom_export_when_loading_then_matches_utf8_equivalent(loader: BookmarkLoader) {
    // Arrange
    let env = init_test_env();
    let path = env.resource("bookmarks_utf16le_bom.csv");

    // Act
    let detected = detect_file_encoding(&path).unwrap();
    let utf16 = loader.load(&path, None).unwrap();
    let utf8 = loader.load(&env.resource("bookmarks.csv"), None).unwrap();

    // Assert
    assert_eq!(detected, TextEncoding::Utf16Le);
    assert_eq!(utf16.len(), utf8.len());
    assert_eq!(utf16, utf8);
}

#[rstest]
fn given_shift_jis_export_when_loading_then_japanese_titles_survive(loader: BookmarkLoader) {
    let env = init_test_env();

    let table = loader.load(&env.resource("bookmarks_sjis.csv"), None).unwrap();

    assert_eq!(table.len(), 8);
    assert_eq!(table.records()[1].title, "東京都庁に行った");
    assert_eq!(table.records()[4].title, "京都の観光ガイド");
}

#[rstest]
fn given_json_export_when_loading_then_scalars_become_text(loader: BookmarkLoader) {
    let env = init_test_env();

    let table = loader.load(&env.resource("bookmarks.json"), None).unwrap();

    assert_eq!(table.len(), 8);
    assert_eq!(table.records()[0].position, "1");
    assert_eq!(table.records()[0].id, "1");
    assert_eq!(table.records()[0].folder_path, r"Work\Projects");
}

#[rstest]
fn given_json_object_root_when_loading_then_schema_error(loader: BookmarkLoader) {
    let env = init_test_env();

    let result = loader.load(&env.resource("bookmarks_object_root.json"), None);

    assert!(matches!(result, Err(DomainError::SchemaError { .. })));
}

#[rstest]
fn given_csv_and_json_exports_when_loading_then_records_are_equal(loader: BookmarkLoader) {
    let env = init_test_env();

    let csv = loader.load(&env.resource("bookmarks.csv"), None).unwrap();
    let json = loader.load(&env.resource("bookmarks.json"), None).unwrap();

    assert_eq!(csv, json);
}

#[rstest]
fn given_unknown_extension_when_loading_then_unsupported_format(loader: BookmarkLoader) {
    let file = write_temp_file(".txt", b"Title\n");

    let result = loader.load(file.path(), None);

    assert!(matches!(result, Err(DomainError::UnsupportedFormat(_))));
}

#[rstest]
fn given_explicit_format_when_loading_then_extension_is_ignored(loader: BookmarkLoader) {
    let env = init_test_env();
    let content = std::fs::read(env.resource("bookmarks.csv")).unwrap();
    let file = write_temp_file(".export", &content);

    let table = loader.load(file.path(), Some(FileFormat::Csv)).unwrap();

    assert_eq!(table.len(), 8);
}

#[rstest]
fn given_loaded_table_when_previewing_then_first_rows_only(loader: BookmarkLoader) {
    let env = init_test_env();
    let table = loader.load(&env.resource("bookmarks.csv"), None).unwrap();

    let head = loader.preview(&table, 3);

    assert_eq!(head.len(), 3);
    assert_eq!(head.records()[2].title, "Tokio docs");
    assert_eq!(loader.preview(&table, 100).len(), 8);
}
