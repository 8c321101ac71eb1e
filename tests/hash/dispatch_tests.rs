// Tests for the dispatcher and its reporters

use std::path::PathBuf;

use hsh::cli::ParsedCommand;
use hsh::dispatch::{Dispatcher, RunStatus};
use hsh::hash::{Algorithm, HashUtilityError};
use hsh::output::{JsonReporter, TextReporter};
use tempfile::TempDir;

use crate::write_file;

const SHA256_HELLO: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

fn run_text(command: ParsedCommand) -> (RunStatus, String, String) {
    let mut reporter = TextReporter::new(Vec::new(), Vec::new(), false);
    let status = Dispatcher::default().dispatch(command, &mut reporter).unwrap();
    let (out, err) = reporter.into_inner();
    (status, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[test]
fn test_batch_text_output() {
    let dir = TempDir::new().unwrap();
    let hello = write_file(&dir, "hello.txt", b"hello world");
    let missing = dir.path().join("missing.txt");

    let (status, out, err) = run_text(ParsedCommand::DigestBatch {
        algorithm: Algorithm::Sha256,
        files: vec![missing.clone(), hello.clone()],
    });

    assert_eq!(status, RunStatus::Failure);
    assert_eq!(out, format!("SHA256 ({}) :\n{}\n", hello.display(), SHA256_HELLO));
    assert!(err.contains("File not found"));
    assert!(err.contains(&missing.display().to_string()));
}

#[test]
fn test_batch_success_status() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a", b"");
    let b = write_file(&dir, "b", b"hello world");

    let (status, out, err) = run_text(ParsedCommand::DigestBatch {
        algorithm: Algorithm::Md5,
        files: vec![a, b],
    });

    assert_eq!(status, RunStatus::Success);
    assert!(err.is_empty());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("MD5 ("));
    assert_eq!(lines[1], "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(lines[3], "5eb63bbbe01eeed093cb22bb8f5acdc3");
}

#[test]
fn test_verify_statuses() {
    let dir = TempDir::new().unwrap();
    let hello = write_file(&dir, "hello.txt", b"hello world");
    let hello = hello.to_str().unwrap().to_string();

    let (status, out, _) = run_text(ParsedCommand::Verify {
        token_a: hello.clone(),
        token_b: SHA256_HELLO.to_string(),
        algorithm: None,
    });
    assert_eq!(status, RunStatus::Success);
    assert!(out.starts_with("MATCH (SHA256)"));

    let (status, out, _) = run_text(ParsedCommand::Verify {
        token_a: hello.clone(),
        token_b: "f".repeat(64),
        algorithm: None,
    });
    assert_eq!(status, RunStatus::Failure);
    assert!(out.starts_with("MISMATCH (SHA256)"));

    let (status, out, err) = run_text(ParsedCommand::Verify {
        token_a: "missing-file".to_string(),
        token_b: hello,
        algorithm: None,
    });
    assert_eq!(status, RunStatus::Failure);
    assert!(out.is_empty());
    assert!(err.contains("file not found: missing-file"));
}

#[test]
fn test_invalid_command_is_usage_error() {
    let (status, out, err) = run_text(ParsedCommand::Invalid(HashUtilityError::InvalidArguments {
        message: "bad shape".to_string(),
    }));

    assert_eq!(status, RunStatus::UsageError);
    assert_eq!(status.code(), 2);
    assert!(out.is_empty());
    assert!(err.contains("bad shape"));
}

#[test]
fn test_static_text_commands() {
    let (status, out, _) = run_text(ParsedCommand::Version);
    assert_eq!(status, RunStatus::Success);
    assert!(out.starts_with("hsh "));

    let (status, out, _) = run_text(ParsedCommand::Help);
    assert_eq!(status, RunStatus::Success);
    assert!(out.contains("check"));

    let (_, out, _) = run_text(ParsedCommand::Usage);
    assert!(out.contains("hsh"));
}

#[test]
fn test_json_reporter() {
    let dir = TempDir::new().unwrap();
    let hello = write_file(&dir, "hello.txt", b"hello world");

    let mut reporter = JsonReporter::new(Vec::new());
    let status = Dispatcher::default()
        .with_parallel(true)
        .dispatch(
            ParsedCommand::DigestBatch {
                algorithm: Algorithm::Sha256,
                files: vec![hello, PathBuf::from("definitely-missing.bin")],
            },
            &mut reporter,
        )
        .unwrap();
    assert_eq!(status, RunStatus::Failure);

    let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["type"], "digest");
    assert_eq!(records[0]["algorithm"], "SHA256");
    assert_eq!(records[0]["digest"], SHA256_HELLO);
    assert_eq!(records[1]["type"], "file_error");
    assert_eq!(records[1]["path"], "definitely-missing.bin");
}

#[test]
fn test_json_comparison_record() {
    let mut reporter = JsonReporter::new(Vec::new());
    let status = Dispatcher::default()
        .dispatch(
            ParsedCommand::Verify {
                token_a: SHA256_HELLO.to_string(),
                token_b: SHA256_HELLO.to_uppercase(),
                algorithm: None,
            },
            &mut reporter,
        )
        .unwrap();
    assert_eq!(status, RunStatus::Success);

    let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
    let record = &value[0];
    assert_eq!(record["type"], "comparison");
    assert_eq!(record["outcome"], "match");
    assert_eq!(record["algorithm"], "SHA256");
    assert_eq!(record["right"], SHA256_HELLO);
}

#[test]
fn test_json_algorithm_spelling_is_consistent() {
    let dir = TempDir::new().unwrap();
    let hello = write_file(&dir, "hello.txt", b"hello world");

    let mut digests = JsonReporter::new(Vec::new());
    Dispatcher::default()
        .dispatch(
            ParsedCommand::DigestBatch {
                algorithm: Algorithm::Sha256,
                files: vec![hello.clone()],
            },
            &mut digests,
        )
        .unwrap();

    let mut comparisons = JsonReporter::new(Vec::new());
    Dispatcher::default()
        .dispatch(
            ParsedCommand::Verify {
                token_a: hello.to_str().unwrap().to_string(),
                token_b: SHA256_HELLO.to_string(),
                algorithm: None,
            },
            &mut comparisons,
        )
        .unwrap();

    let digests: serde_json::Value = serde_json::from_slice(&digests.into_inner()).unwrap();
    let comparisons: serde_json::Value = serde_json::from_slice(&comparisons.into_inner()).unwrap();
    assert_eq!(digests[0]["algorithm"], comparisons[0]["algorithm"]);
    assert_eq!(digests[0]["algorithm"], Algorithm::Sha256.to_string());
}

#[test]
fn test_invalid_command_with_runtime_error_is_failure() {
    let (status, out, err) = run_text(ParsedCommand::Invalid(HashUtilityError::ConfigError {
        path: None,
        reason: "unknown default_algorithm 'crc32'".to_string(),
    }));

    assert_eq!(status, RunStatus::Failure);
    assert_eq!(status.code(), 1);
    assert!(out.is_empty());
    assert!(err.contains("crc32"));
}

#[test]
fn test_error_verdict_color_follows_error_stream() {
    colored::control::set_override(true);

    let verify_missing = || ParsedCommand::Verify {
        token_a: "missing-file".to_string(),
        token_b: SHA256_HELLO.to_string(),
        algorithm: None,
    };

    // results piped, errors on a terminal
    let mut reporter = TextReporter::new(Vec::new(), Vec::new(), false).with_stream_colors(false, true);
    Dispatcher::default().dispatch(verify_missing(), &mut reporter).unwrap();
    let (out, err) = reporter.into_inner();
    assert!(out.is_empty());
    assert!(String::from_utf8(err).unwrap().contains("\x1b["));

    // results on a terminal, errors piped
    let mut reporter = TextReporter::new(Vec::new(), Vec::new(), false).with_stream_colors(true, false);
    Dispatcher::default().dispatch(verify_missing(), &mut reporter).unwrap();
    let (_, err) = reporter.into_inner();
    let err = String::from_utf8(err).unwrap();
    assert!(err.starts_with("ERROR: "));
    assert!(!err.contains("\x1b["));
}
