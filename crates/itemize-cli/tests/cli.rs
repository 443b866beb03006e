use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const WALMART: &str = "\
WALMART
123 MAIN ST
04/01/24 10:15
BANANAS 1.29
BREAD 2X1.50 3.00
TAX 0.32
TOTAL 4.61
";

/// Command with an isolated config file inside `dir`.
fn itemize(dir: &TempDir) -> Command {
    let config = dir.path().join("config.json");
    if !config.exists() {
        fs::write(&config, "{}").unwrap();
    }

    let mut cmd = Command::cargo_bin("itemize").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn test_parse_file_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("walmart.txt");
    fs::write(&input, WALMART).unwrap();

    itemize(&dir)
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""item": "BANANAS""#))
        .stdout(predicate::str::contains(r#""amount": "3.00""#))
        .stdout(predicate::str::contains("TOTAL").not());
}

#[test]
fn test_parse_stdin_csv() {
    let dir = TempDir::new().unwrap();

    itemize(&dir)
        .args(["parse", "-", "--format", "csv"])
        .write_stdin(WALMART)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("item,amount,source_line,processed_at"))
        .stdout(predicate::str::contains("BREAD,3.00,BREAD 2X1.50 3.00,"));
}

#[test]
fn test_parse_explain_and_total() {
    let dir = TempDir::new().unwrap();

    itemize(&dir)
        .args(["parse", "-", "--format", "text", "--explain", "--show-total"])
        .write_stdin(WALMART)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 items, total 4.29"))
        .stderr(predicate::str::contains("skipped (summary)"))
        .stderr(predicate::str::contains("accepted"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();

    itemize(&dir)
        .args(["-v", "parse", "-"])
        .write_stdin(WALMART)
        .assert()
        .success()
        .stderr(predicate::str::contains("Parsed 2 items from 7 lines"))
        .stdout(predicate::str::contains("Parsed").not());
}

#[test]
fn test_parse_missing_file() {
    let dir = TempDir::new().unwrap();

    itemize(&dir)
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_parse_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("items.json");

    itemize(&dir)
        .args(["parse", "-", "--output"])
        .arg(&output)
        .write_stdin("Milk\n1.50\nBread\n2.00\nSubtotal\n3.50\n")
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("Milk 1.50"));
    assert!(!written.contains(r#""3.50""#));
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let receipts = dir.path().join("receipts");
    let out = dir.path().join("out");
    fs::create_dir_all(&receipts).unwrap();
    fs::write(receipts.join("a.txt"), WALMART).unwrap();
    fs::write(receipts.join("b.txt"), "COFFEE 3.75\nTOTAL 3.75\n").unwrap();
    fs::write(receipts.join("empty.txt"), "  \n").unwrap();
    fs::write(receipts.join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();

    let pattern = format!("{}/*.txt", receipts.display());

    itemize(&dir)
        .args(["batch", &pattern, "--summary", "--continue-on-error", "--format", "csv", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 4 files"));

    assert!(out.join("a.csv").exists());
    assert!(out.join("b.csv").exists());
    assert!(out.join("empty.csv").exists());
    assert!(!out.join("bad.csv").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,lines,items,total,processing_time_ms,error"));
    assert!(summary.contains("a.txt,success,7,2,4.29,"));
    assert!(summary.contains("empty.txt,success,0,0,0,"));
    assert!(summary.contains("bad.txt,error"));
}

#[test]
fn test_batch_stops_on_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    itemize(&dir)
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_batch_empty_file_has_no_items() {
    let dir = TempDir::new().unwrap();
    let receipts = dir.path().join("receipts");
    fs::create_dir_all(&receipts).unwrap();
    fs::write(receipts.join("blank.txt"), "").unwrap();
    let pattern = format!("{}/*.txt", receipts.display());

    itemize(&dir)
        .args(["batch", &pattern, "--format", "json", "--output-dir"])
        .arg(dir.path().join("out"))
        .assert()
        .success();

    let written = fs::read_to_string(dir.path().join("out").join("blank.json")).unwrap();
    assert_eq!(written.trim(), "[]");
}

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.json");

    let cmd = |args: &[&str]| {
        let mut cmd = Command::cargo_bin("itemize").unwrap();
        cmd.arg("--config").arg(&path).args(args);
        cmd
    };

    cmd(&["config", "init"]).assert().success();
    assert!(path.exists());

    cmd(&["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cmd(&["config", "get", "extraction.dedup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("source_line"));

    cmd(&["config", "set", "extraction.dedup", "name_price"]).assert().success();

    cmd(&["config", "get", "extraction.dedup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name_price"));

    cmd(&["config", "set", "extraction.extra_noise_patterns", r#"["(unclosed"]"#])
        .assert()
        .failure();

    cmd(&["config", "set", "extraction.thresholds.max_digit_ratio", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_digit_ratio"));

    cmd(&["config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_configured_noise_pattern_applies() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{ "extraction": { "extra_noise_patterns": ["(?i)^bag fee"] } }"#,
    )
    .unwrap();

    itemize(&dir)
        .args(["parse", "-", "--format", "csv"])
        .write_stdin("BAG FEE 0.10\nCOLA 1.99\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("COLA"))
        .stdout(predicate::str::contains("BAG FEE").not());
}
