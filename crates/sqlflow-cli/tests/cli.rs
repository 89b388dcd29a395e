use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn sqlflow(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sqlflow"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run CLI")
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("write input");
}

#[test]
fn json_output_for_sql_file() {
    let dir = tempdir().expect("temp dir");
    write(
        dir.path(),
        "view.sql",
        "CREATE VIEW v AS SELECT * FROM a JOIN b ON a.id = b.id",
    );

    let output = sqlflow(dir.path(), &["-f", "json", "-c", "view.sql"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["summary"]["totalTables"], 3);
    assert_eq!(value["summary"]["totalRelationships"], 3);
    assert_eq!(value["edges"][0]["data"]["type"], "join");
}

#[test]
fn writes_output_file() {
    let dir = tempdir().expect("temp dir");
    write(dir.path(), "fk.sql", "CREATE TABLE orders (user_id INT REFERENCES users(id))");

    let output = sqlflow(
        dir.path(),
        &["-f", "mermaid", "-o", "graph.mmd", "fk.sql"],
    );
    assert!(output.status.success());

    let diagram = std::fs::read_to_string(dir.path().join("graph.mmd")).expect("output exists");
    assert!(diagram.starts_with("flowchart LR"));
    assert!(diagram.contains("table_1 -->|foreign_key| table_3"));
}

#[test]
fn multiple_files_share_one_graph() {
    let dir = tempdir().expect("temp dir");
    write(dir.path(), "schema.sql", "CREATE TABLE staging (id INT);");
    write(dir.path(), "load.sql", "INSERT INTO report SELECT * FROM staging;");

    let output = sqlflow(
        dir.path(),
        &[
            "-f",
            "json",
            "--source-linking",
            "statement-sources",
            "schema.sql",
            "load.sql",
        ],
    );
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["summary"]["totalTables"], 2);
    assert_eq!(value["edges"][0]["data"]["type"], "insert");
}

#[test]
fn config_file_supplies_defaults() {
    let dir = tempdir().expect("temp dir");
    write(dir.path(), "sqlflow.toml", "format = \"json\"\nrecurse-conditions = true\n");
    write(
        dir.path(),
        "query.sql",
        "SELECT * FROM a, b, c WHERE a.id = b.a_id AND b.id = c.b_id",
    );

    let output = sqlflow(dir.path(), &["query.sql"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["summary"]["totalRelationships"], 2);
}

#[test]
fn statements_mode_reads_json_model() {
    let dir = tempdir().expect("temp dir");
    write(
        dir.path(),
        "statements.json",
        r#"[{"type": "create_view", "view": "v", "query": {"from": [{"source": {"kind": "table", "name": "a"}}]}}]"#,
    );

    let output = sqlflow(dir.path(), &["--statements", "-f", "json", "statements.json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["edges"][0]["data"]["type"], "view_dependency");
}

#[test]
fn statements_mode_skips_unknown_statement_type() {
    let dir = tempdir().expect("temp dir");
    write(
        dir.path(),
        "statements.json",
        r#"[{"type": "select", "from": []}, {"type": "drop", "name": "x"}]"#,
    );

    let output = sqlflow(dir.path(), &["--statements", "-f", "json", "statements.json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["issues"][0]["code"], "UNSUPPORTED_STATEMENT");
    assert_eq!(value["issues"][0]["severity"], "warning");
    assert_eq!(value["issues"][0]["statementIndex"], 1);
}

#[test]
fn mermaid_reports_skipped_statements_on_stderr() {
    let dir = tempdir().expect("temp dir");
    write(dir.path(), "fk.sql", "CREATE TABLE orders (user_id INT REFERENCES users(id))");
    write(dir.path(), "drop.sql", "DROP TABLE x");

    let clean = sqlflow(dir.path(), &["-f", "mermaid", "fk.sql"]);
    assert!(clean.status.success());
    assert!(!String::from_utf8_lossy(&clean.stderr).contains("sqlflow: warning:"));

    let skipped = sqlflow(dir.path(), &["-f", "mermaid", "drop.sql"]);
    assert!(skipped.status.success());
    let stderr = String::from_utf8_lossy(&skipped.stderr);
    assert!(stderr.contains("sqlflow: warning:"), "{stderr}");
    assert!(stderr.contains("DROP TABLE"), "{stderr}");
}

#[test]
fn parse_error_exits_with_failure() {
    let dir = tempdir().expect("temp dir");
    write(dir.path(), "broken.sql", "SELECT * FROM users WHERE (");

    let output = sqlflow(dir.path(), &["broken.sql"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sqlflow: error:"));
}

#[test]
fn missing_input_exits_with_config_error() {
    let dir = tempdir().expect("temp dir");
    let output = sqlflow(dir.path(), &["does-not-exist.sql"]);
    assert_eq!(output.status.code(), Some(66));
}

#[test]
fn invalid_config_exits_with_config_error() {
    let dir = tempdir().expect("temp dir");
    write(dir.path(), "bad.toml", "format = \"xlsx\"\n");
    write(dir.path(), "query.sql", "SELECT 1");

    let output = sqlflow(dir.path(), &["--config", "bad.toml", "query.sql"]);
    assert_eq!(output.status.code(), Some(66));
}

#[test]
fn lists_dialects() {
    let dir = tempdir().expect("temp dir");
    let output = sqlflow(dir.path(), &["--list-dialects"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 13);
    assert!(stdout.contains("postgres"));
    assert!(stdout.contains("PostgreSQL"));
}

#[test]
fn prints_schema() {
    let dir = tempdir().expect("temp dir");
    let output = sqlflow(dir.path(), &["--schema"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert!(value.get("AnalyzeResult").is_some());
}
