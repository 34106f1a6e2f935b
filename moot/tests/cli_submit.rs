//! CLI tests for `moot submit`.
//!
//! Latency is configured to zero so the simulated transport returns at once.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use moot::exit_codes;
use moot::io::config::{MootConfig, write_config};

fn setup(dir: &Path) {
    let mut config = MootConfig::default();
    config.latency.upload_ms = 0;
    config.latency.submit_ms = 0;
    write_config(&dir.join("moot.toml"), &config).expect("write config");
    fs::write(dir.join("argument.mp4"), vec![0u8; 2048]).expect("video");
    fs::write(dir.join("notes.pdf"), b"%PDF").expect("pdf");
    fs::write(dir.join("brief.exe"), b"MZ").expect("exe");
}

fn submit(dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_moot"))
        .current_dir(dir)
        .arg("submit")
        .args(["--exercise", "2"])
        .args(extra)
        .output()
        .expect("run moot submit")
}

#[test]
fn submit_prints_reference_and_skips_unsupported_case_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    setup(temp.path());

    let output = submit(
        temp.path(),
        &[
            "--video",
            "argument.mp4",
            "--case-file",
            "notes.pdf",
            "--case-file",
            "brief.exe",
            "--description",
            "Appellant's submissions on duty of care.",
        ],
    );

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("submitted MOOT-"));
    assert!(stdout.contains("Negligence Case - Duty of Care"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skipped 1 file with an unsupported type: brief.exe"));
}

#[test]
fn document_as_video_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    setup(temp.path());

    let output = submit(
        temp.path(),
        &["--video", "notes.pdf", "--description", "Opening submissions."],
    );

    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid file type"));
}

#[test]
fn whitespace_description_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    setup(temp.path());

    let output = submit(
        temp.path(),
        &["--video", "argument.mp4", "--description", "   "],
    );

    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing required field: description"));
}

#[test]
fn missing_video_file_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    setup(temp.path());

    let output = submit(
        temp.path(),
        &["--video", "absent.mp4", "--description", "Opening submissions."],
    );

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}
