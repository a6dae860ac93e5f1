use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn sample_path(family: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("samples")
        .join(family)
        .join(name)
}

#[test]
fn lex_prints_simple_listing() {
    let mut cmd = cargo_bin_cmd!("tac");
    cmd.arg("lex").arg(sample_path("metar", "002-nil.tac"));

    let output_pred = predicate::str::contains("METAR_START")
        .and(predicate::str::contains("NIL"))
        .and(predicate::str::contains("END_TOKEN"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn lex_prints_json() {
    let mut cmd = cargo_bin_cmd!("tac");
    cmd.arg("lex")
        .arg(sample_path("taf", "002-cavok.tac"))
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"TAF_START\""));
}

#[test]
fn lex_rejects_unknown_format() {
    let mut cmd = cargo_bin_cmd!("tac");
    cmd.arg("lex")
        .arg(sample_path("taf", "002-cavok.tac"))
        .arg("--format")
        .arg("xml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("format 'xml' not found"));
}

#[test]
fn sniff_prints_message_type() {
    let mut cmd = cargo_bin_cmd!("tac");
    cmd.arg("sniff").arg(sample_path("sigmet", "001-cancel-airmet.tac"));

    cmd.assert().success().stdout("SIGMET\n");
}

#[test]
fn wrap_with_heading() {
    let mut cmd = cargo_bin_cmd!("tac");
    cmd.arg("wrap")
        .arg(sample_path("taf", "002-cavok.tac"))
        .arg("--heading")
        .arg("FTFI33 EFPP 011700");

    cmd.assert()
        .success()
        .stdout("FTFI33 EFPP 011700\nTAF EFHK 011733Z 0118/0218 CAVOK=\n");
}

#[test]
fn config_file_changes_row_length() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[bulletin]\nrow_length = 20").unwrap();

    let mut cmd = cargo_bin_cmd!("tac");
    cmd.arg("--config")
        .arg(config.path())
        .arg("wrap")
        .arg(sample_path("taf", "002-cavok.tac"));

    cmd.assert()
        .success()
        .stdout("TAF EFHK 011733Z\n\t0118/0218 CAVOK=\n");
}

#[test]
fn missing_file_fails() {
    let mut cmd = cargo_bin_cmd!("tac");
    cmd.arg("sniff").arg("does/not/exist.tac");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error reading"));
}
