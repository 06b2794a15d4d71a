//! Tests for Engine
//!
//! These tests verify:
//! - Query dispatch and the response vocabulary
//! - Value validation
//! - Startup from a snapshot file (missing, empty, valid, corrupt)

use std::fs;

use kvdb::backup::snapshot;
use kvdb::config::Config;
use kvdb::engine::Engine;
use kvdb::protocol::{ErrorCode, Query, Response};
use kvdb::KvdbError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn run(engine: &Engine, line: &str) -> String {
    engine.execute_line(line).to_string()
}

fn setup_engine_with_file() -> (TempDir, Config) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .backup_path(temp_dir.path().join("kvdb.snap"))
        .build();
    (temp_dir, config)
}

// =============================================================================
// Dispatch Tests
// =============================================================================

#[test]
fn test_full_lifecycle_of_a_key() {
    let engine = Engine::in_memory();

    assert_eq!(run(&engine, "CREATEDB users"), "OK");
    assert_eq!(run(&engine, r#"SET users.alice "hello""#), "OK");
    assert_eq!(run(&engine, "GET users.alice"), "hello");
    assert_eq!(run(&engine, r#"UPDATE users.alice "world""#), "OK");
    assert_eq!(run(&engine, "GET users.alice"), "world");
    assert_eq!(run(&engine, "REMOVE KEY users.alice"), "OK");
    assert_eq!(run(&engine, "GET users.alice"), "KEY_NOT_FOUND");
}

#[test]
fn test_get_on_empty_storage() {
    let engine = Engine::in_memory();
    assert_eq!(run(&engine, "GET missing.key"), "DATABASE_NOT_FOUND");
}

#[test]
fn test_malformed_input() {
    let engine = Engine::in_memory();
    assert_eq!(run(&engine, "FOO bar"), "BAD_QUERY");
    assert_eq!(run(&engine, ""), "BAD_QUERY");
}

#[test]
fn test_createdb_twice() {
    let engine = Engine::in_memory();
    assert_eq!(run(&engine, "CREATEDB users"), "OK");
    assert_eq!(run(&engine, "CREATEDB users"), "ALREADY_EXISTS");
}

#[test]
fn test_set_existing_key() {
    let engine = Engine::in_memory();
    run(&engine, "CREATEDB users");
    assert_eq!(run(&engine, r#"SET users.alice "a""#), "OK");
    assert_eq!(run(&engine, r#"SET users.alice "b""#), "ALREADY_EXISTS");
    assert_eq!(run(&engine, "GET users.alice"), "a");
}

#[test]
fn test_set_into_missing_namespace() {
    let engine = Engine::in_memory();
    assert_eq!(run(&engine, r#"SET users.alice "a""#), "DATABASE_NOT_FOUND");
}

#[test]
fn test_update_missing_key() {
    let engine = Engine::in_memory();
    run(&engine, "CREATEDB users");
    assert_eq!(run(&engine, r#"UPDATE users.ghost "a""#), "KEY_NOT_FOUND");
    assert_eq!(run(&engine, "GET users.ghost"), "KEY_NOT_FOUND");
}

#[test]
fn test_illegal_characters_are_rejected_before_storage() {
    let engine = Engine::in_memory();

    // Validation runs first, even with no namespace
    assert_eq!(run(&engine, r#"SET users.alice "a:b""#), "ILLEGAL_CHARACTERS");

    run(&engine, "CREATEDB users");
    assert_eq!(run(&engine, r#"SET users.alice "a:b""#), "ILLEGAL_CHARACTERS");
    assert_eq!(run(&engine, "GET users.alice"), "KEY_NOT_FOUND");

    run(&engine, r#"SET users.alice "ok""#);
    assert_eq!(run(&engine, r#"UPDATE users.alice "x:y""#), "ILLEGAL_CHARACTERS");
    assert_eq!(run(&engine, "GET users.alice"), "ok");
    assert!(!engine.store().list_keys("users").unwrap().is_empty());
}

#[test]
fn test_values_with_dots_and_spaces() {
    let engine = Engine::in_memory();
    run(&engine, "CREATEDB cfg");
    assert_eq!(run(&engine, r#"SET cfg.url "example.com/some path""#), "OK");
    assert_eq!(run(&engine, "GET cfg.url"), "example.com/some path");
}

#[test]
fn test_remove_key_without_key() {
    let engine = Engine::in_memory();
    assert_eq!(run(&engine, "REMOVE KEY users"), "KEY_NOT_PROVIDED");
}

#[test]
fn test_remove_key_errors() {
    let engine = Engine::in_memory();
    assert_eq!(run(&engine, "REMOVE KEY users.alice"), "DATABASE_NOT_FOUND");
    run(&engine, "CREATEDB users");
    assert_eq!(run(&engine, "REMOVE KEY users.alice"), "KEY_NOT_FOUND");
}

#[test]
fn test_remove_db() {
    let engine = Engine::in_memory();
    assert_eq!(run(&engine, "REMOVE DB users"), "DATABASE_NOT_FOUND");
    run(&engine, "CREATEDB users");
    assert_eq!(run(&engine, "REMOVE DB users"), "OK");
    assert_eq!(run(&engine, "GET users.alice"), "DATABASE_NOT_FOUND");
}

#[test]
fn test_list() {
    let engine = Engine::in_memory();
    assert_eq!(run(&engine, "LIST"), "DATABASE_IS_EMPTY");
    assert_eq!(run(&engine, "LIST users"), "DATABASE_IS_EMPTY");

    run(&engine, "CREATEDB users");
    run(&engine, "CREATEDB admins");
    assert_eq!(run(&engine, "LIST"), "admins users");
    assert_eq!(run(&engine, "LIST users"), "");
    assert_eq!(run(&engine, "LIST nobody"), "DATABASE_NOT_FOUND");

    run(&engine, r#"SET users.bob "1""#);
    run(&engine, r#"SET users.alice "2""#);
    assert_eq!(run(&engine, "LIST users"), "alice bob");
}

#[test]
fn test_execute_typed_query() {
    let engine = Engine::in_memory();
    let response = engine.execute(Query::List { namespace: None });
    assert_eq!(response, Response::error(ErrorCode::DatabaseIsEmpty));
    assert!(!response.is_ok());

    let response = engine.execute(Query::CreateNamespace {
        name: "users".to_string(),
    });
    assert_eq!(response, Response::Ok);
}

#[test]
fn test_mutations_mark_store_dirty() {
    let engine = Engine::in_memory();
    assert!(!engine.store().is_dirty());

    run(&engine, "GET a.b");
    run(&engine, "LIST");
    assert!(!engine.store().is_dirty());

    run(&engine, "CREATEDB a");
    assert!(engine.store().is_dirty());
}

// =============================================================================
// Startup Tests
// =============================================================================

#[test]
fn test_open_without_backup_path() {
    let engine = Engine::open(Config::default()).unwrap();
    assert!(engine.backup_path().is_none());
    assert_eq!(engine.store().namespace_count(), 0);
}

#[test]
fn test_open_with_missing_file_starts_empty() {
    let (_temp, config) = setup_engine_with_file();
    let path = config.backup_path.clone().unwrap();

    let engine = Engine::open(config).unwrap();

    assert_eq!(engine.store().namespace_count(), 0);
    assert!(!engine.store().is_dirty());
    // Opening does not create the file
    assert!(!path.exists());
}

#[test]
fn test_open_with_empty_file_starts_empty() {
    let (_temp, config) = setup_engine_with_file();
    fs::write(config.backup_path.as_ref().unwrap(), b"").unwrap();

    let engine = Engine::open(config).unwrap();

    assert_eq!(engine.store().namespace_count(), 0);
}

#[test]
fn test_open_seeds_from_snapshot() {
    let (_temp, config) = setup_engine_with_file();
    let path = config.backup_path.clone().unwrap();

    let source = Engine::in_memory();
    run(&source, "CREATEDB users");
    run(&source, r#"SET users.alice "hello""#);
    let bytes = snapshot::encode(&source.store().to_namespaces()).unwrap();
    fs::write(&path, bytes).unwrap();

    let engine = Engine::open(config).unwrap();

    assert_eq!(run(&engine, "GET users.alice"), "hello");
    assert!(!engine.store().is_dirty());
}

#[test]
fn test_open_with_corrupt_file_is_fatal() {
    let (_temp, config) = setup_engine_with_file();
    let path = config.backup_path.clone().unwrap();
    fs::write(&path, b"this is not a snapshot").unwrap();

    let result = Engine::open(config);

    assert!(matches!(result, Err(KvdbError::SnapshotCorrupted(_))));
    // The file is left as it was
    assert_eq!(fs::read(&path).unwrap(), b"this is not a snapshot");
}

#[test]
fn test_open_rejects_invalid_config() {
    let config = Config::builder().backup_interval_ms(0).build();
    assert!(matches!(Engine::open(config), Err(KvdbError::Config(_))));
}
