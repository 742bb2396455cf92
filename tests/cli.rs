#![cfg(feature = "io-csv")]

use std::fs;
use std::process::Command;

const SCHEMA: &str = r#"
header: true
ignore_duplicates: true
columns:
  - { index: 0, field: id, type: int }
  - { index: 1, field: when, type: date, format: "%m/%d/%Y" }
"#;

#[test]
fn converts_csv_to_json_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("in.csv");
    let schema = dir.path().join("schema.yaml");
    let output = dir.path().join("nested").join("out.json");
    let stats = dir.path().join("stats.json");
    fs::write(&input, "id,when\n7,01/02/2023\n7,01/02/2023\n9,\n")?;
    fs::write(&schema, SCHEMA)?;

    let status = Command::new(env!("CARGO_BIN_EXE_ironcast"))
        .arg(&input)
        .arg(&schema)
        .arg(&output)
        .args(["--workers", "2", "--stats-out"])
        .arg(&stats)
        .status()?;
    assert!(status.success());

    let out: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(
        out,
        serde_json::json!([{"id": 7, "when": "2023-01-02"}, {"id": 9, "when": null}])
    );
    let stats: serde_json::Value = serde_json::from_str(&fs::read_to_string(&stats)?)?;
    assert_eq!(stats["duplicates_ignored"], 1);
    Ok(())
}

#[test]
fn parse_failure_exits_nonzero_and_writes_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("in.csv");
    let schema = dir.path().join("schema.yaml");
    let output = dir.path().join("out.jsonl");
    fs::write(&input, "id,when\n1,01/02/2023\nx,01/02/2023\n")?;
    fs::write(&schema, SCHEMA)?;

    let result = Command::new(env!("CARGO_BIN_EXE_ironcast"))
        .arg(&input)
        .arg(&schema)
        .arg(&output)
        .args(["--format", "jsonl"])
        .output()?;
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("field 'id'"));
    assert!(!output.exists());
    Ok(())
}
