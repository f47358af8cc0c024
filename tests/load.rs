use std::collections::BTreeMap;
use std::path::Path;

use minenv::{EnvLoader, Error, KeyParsingMode, LoadOutcome, ParseErrorKind, TargetEnv, Var};
use tempfile::TempDir;

#[test]
fn loads_entries_into_memory_target() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let file = dir.path().join(".env");
    write_file(&file, "# comment\n\nFOO=bar\nKEY = \"hello world\"\n");

    let mut loader = EnvLoader::new().path(&file);
    let outcome = loader.load().expect("quiet load never errors");
    let report = outcome.report().copied().expect("load should succeed");
    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped_existing, 0);

    let map = loader.target_env().as_memory().expect("memory target");
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("FOO").expect("FOO should exist"), "bar");
    assert_eq!(map.get("KEY").expect("KEY should exist"), "hello world");
}

#[test]
fn override_existing_true_replaces_values() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let file = dir.path().join(".env");
    write_file(&file, "A=from_file\n");

    let mut loader = EnvLoader::new()
        .path(&file)
        .target(TargetEnv::from_memory(initial(&[("A", "existing")])));

    let report = loader
        .load()
        .and_then(LoadOutcome::into_result)
        .expect("load should succeed");
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped_existing, 0);

    let map = loader.target_env().as_memory().expect("memory target");
    assert_eq!(map.get("A").expect("A should exist"), "from_file");
}

#[test]
fn override_existing_false_skips_existing_values() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let file = dir.path().join(".env");
    write_file(&file, "A=from_file\nB=2\n");

    let mut loader = EnvLoader::new()
        .path(&file)
        .target(TargetEnv::from_memory(initial(&[("A", "existing")])))
        .override_existing(false);

    let report = loader
        .load()
        .and_then(LoadOutcome::into_result)
        .expect("load should succeed");
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped_existing, 1);

    let map = loader.target_env().as_memory().expect("memory target");
    assert_eq!(map.get("A").expect("A should exist"), "existing");
    assert_eq!(map.get("B").expect("B should exist"), "2");
}

#[test]
fn override_existing_false_fills_empty_values() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let file = dir.path().join(".env");
    write_file(&file, "EMPTY=from_file\nSET=from_file\n");

    let mut loader = EnvLoader::new()
        .path(&file)
        .target(TargetEnv::from_memory(initial(&[("EMPTY", ""), ("SET", "kept")])))
        .override_existing(false);

    let report = loader
        .load()
        .and_then(LoadOutcome::into_result)
        .expect("load should succeed");
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped_existing, 1);

    let map = loader.target_env().as_memory().expect("memory target");
    assert_eq!(map.get("EMPTY").expect("EMPTY should exist"), "from_file");
    assert_eq!(map.get("SET").expect("SET should exist"), "kept");
}

#[test]
fn unmatched_quotes_do_not_fail_the_load() {
    let mut loader = EnvLoader::new().verbose(true);
    let report = loader
        .load_from_reader(std::io::Cursor::new(
            "GOOD=1\nA=\"abc\nB=\"x\" # c\nMSG=\"hello\" # greeting\nLAST='done'\n",
        ))
        .and_then(LoadOutcome::into_result)
        .expect("load should succeed");
    assert_eq!(report.loaded, 5);

    let map = loader.target_env().as_memory().expect("memory target");
    assert_eq!(map.get("GOOD").expect("GOOD should exist"), "1");
    assert_eq!(map.get("A").expect("A should exist"), "\"abc");
    assert_eq!(map.get("B").expect("B should exist"), "\"x\" # c");
    assert_eq!(
        map.get("MSG").expect("MSG should exist"),
        "\"hello\" # greeting"
    );
    assert_eq!(map.get("LAST").expect("LAST should exist"), "done");
}

#[test]
fn missing_file_is_captured_when_quiet() {
    let dir = TempDir::new().expect("failed to create temp dir");

    let mut loader = EnvLoader::new().path(dir.path().join("missing.env"));
    let outcome = loader.load().expect("quiet load never errors");

    assert!(!outcome.is_loaded());
    match outcome.error() {
        Some(Error::FileAccess { path, source }) => {
            assert!(path.ends_with("missing.env"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn missing_file_is_propagated_when_verbose() {
    let dir = TempDir::new().expect("failed to create temp dir");

    let mut loader = EnvLoader::new()
        .path(dir.path().join("missing.env"))
        .verbose(true);
    let err = loader.load().expect_err("expected file access error");

    assert!(matches!(err, Error::FileAccess { .. }));
}

#[test]
fn malformed_file_writes_nothing() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let file = dir.path().join(".env");
    write_file(&file, "A=ok\nBAD LINE\nC=ok\n");

    let mut loader = EnvLoader::new().path(&file).verbose(true);
    let err = loader.load().expect_err("expected parse error");

    match err {
        Error::Parse(parse_err) => {
            assert_eq!(parse_err.kind, ParseErrorKind::InvalidSyntax);
            assert_eq!(parse_err.line, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let map = loader.target_env().as_memory().expect("memory target");
    assert!(map.is_empty());
}

#[test]
fn invalid_utf8_is_an_encoding_error() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let file = dir.path().join(".env");
    std::fs::write(&file, b"A=\xff\xfe\n").expect("failed to write test file");

    let mut loader = EnvLoader::new().path(&file);
    let outcome = loader.load().expect("quiet load never errors");

    assert!(matches!(outcome.error(), Some(Error::InvalidEncoding(_))));
}

#[test]
fn empty_path_is_rejected() {
    let mut loader = EnvLoader::new().path("").verbose(true);
    let err = loader.load().expect_err("expected empty path error");
    assert!(matches!(err, Error::EmptyPath));
}

#[test]
fn loading_twice_is_idempotent() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let file = dir.path().join(".env");
    write_file(&file, "A=1\nB='two'\n");

    let mut loader = EnvLoader::new().path(&file);
    loader.load().and_then(LoadOutcome::into_result).expect("first load");
    let once = loader.target_env().clone();
    loader.load().and_then(LoadOutcome::into_result).expect("second load");

    assert_eq!(loader.target_env(), &once);
}

#[test]
fn strict_key_mode_is_honoured() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let file = dir.path().join(".env");
    write_file(&file, "APP:NAME=demo\n");

    let mut permissive = EnvLoader::new().path(&file);
    assert!(permissive.load().expect("quiet load never errors").is_loaded());

    let mut strict = EnvLoader::new()
        .path(&file)
        .key_parsing_mode(KeyParsingMode::Strict);
    let outcome = strict.load().expect("quiet load never errors");
    match outcome.error() {
        Some(Error::Parse(parse_err)) => assert_eq!(parse_err.kind, ParseErrorKind::InvalidKey),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn parse_only_leaves_target_untouched() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let file = dir.path().join(".env");
    write_file(&file, "A=1\nB=2\n");

    let loader = EnvLoader::new().path(&file);
    let entries = loader.parse_only().expect("parse should succeed");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source.as_deref(), Some(file.as_path()));
    assert_eq!(entries[1].line, 2);
    assert!(loader.target_env().as_memory().expect("memory target").is_empty());
}

#[test]
fn loads_from_reader() {
    let mut loader = EnvLoader::new();
    let outcome = loader
        .load_from_reader(std::io::Cursor::new("PORT=8080\nNAME=\"svc\"\n"))
        .expect("quiet load never errors");
    assert!(outcome.is_loaded());

    let port: u16 = Var::parsed("PORT")
        .get_in(loader.target_env())
        .expect("PORT should parse");
    assert_eq!(port, 8080);
    let name = Var::new("NAME")
        .get_in(loader.target_env())
        .expect("NAME should resolve");
    assert_eq!(name, "svc");
}

#[test]
fn reader_parse_failure_follows_verbose_flag() {
    let mut quiet = EnvLoader::new();
    let outcome = quiet
        .load_from_reader(std::io::Cursor::new("NO_SEPARATOR\n"))
        .expect("quiet load never errors");
    assert!(matches!(outcome, LoadOutcome::Failed(Error::Parse(_))));

    let mut verbose = EnvLoader::new().verbose(true);
    let err = verbose
        .load_from_reader(std::io::Cursor::new("NO_SEPARATOR\n"))
        .expect_err("expected parse error");
    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn reader_with_invalid_utf8_is_an_encoding_error() {
    let mut loader = EnvLoader::new();
    let outcome = loader
        .load_from_reader(std::io::Cursor::new(b"A=\xff\n".to_vec()))
        .expect("quiet load never errors");
    assert!(matches!(outcome.error(), Some(Error::InvalidEncoding(_))));
}

fn initial(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).expect("failed to write test file");
}
