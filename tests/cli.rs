mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::{Value, json};

use common::{SMALL_CSV, TestWorkspace};

fn analyst_cmd(workspace: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("csv-analyst").expect("binary exists");
    cmd.env_remove("CSV_ANALYST_DATA_DIR")
        .env("RUST_LOG", "off")
        .arg("--data-dir")
        .arg(workspace.data_dir());
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("json stdout")
}

#[test]
fn list_prints_sorted_json_array() {
    let workspace = TestWorkspace::new();
    workspace.write("b.csv", SMALL_CSV);
    workspace.write("a.csv", SMALL_CSV);
    let listed = stdout_json(analyst_cmd(&workspace).arg("list"));
    assert_eq!(listed, json!(["a.csv", "b.csv"]));
}

#[test]
fn preview_prints_json_with_requested_rows() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    let preview = stdout_json(analyst_cmd(&workspace).args(["preview", "t.csv", "-n", "1"]));
    assert_eq!(preview["count_returned"], 1);
    assert_eq!(preview["rows"][0], json!({"name": "a", "val": "1"}));
}

#[test]
fn preview_table_renders_aligned_rows() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    analyst_cmd(&workspace)
        .args(["preview", "t.csv", "--table"])
        .assert()
        .success()
        .stdout(contains("name  val").and(contains("b     x")));
}

#[test]
fn describe_prints_summary() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    let description = stdout_json(analyst_cmd(&workspace).args(["describe", "t.csv"]));
    assert_eq!(description["summary"]["val"]["type"], "text_or_mixed");
    assert_eq!(description["sampled_rows"], 3);
}

#[test]
fn describe_table_lists_each_column() {
    let workspace = TestWorkspace::new();
    workspace.write("n.csv", "x\n1\n4\n");
    analyst_cmd(&workspace)
        .args(["describe", "n.csv", "--table"])
        .assert()
        .success()
        .stdout(contains("column").and(contains("numeric")));
}

#[test]
fn filter_prints_matches() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    let result = stdout_json(analyst_cmd(&workspace).args(["filter", "t.csv", "name", "a"]));
    assert_eq!(result["count_returned"], 2);
}

#[test]
fn filter_accepts_negative_number_values() {
    let workspace = TestWorkspace::new();
    workspace.write("neg.csv", "id,delta\n1,-3\n2,3\n");
    let result = stdout_json(analyst_cmd(&workspace).args(["filter", "neg.csv", "delta", "-3.0"]));
    assert_eq!(result["rows"][0]["id"], "1");
    assert_eq!(result["count_returned"], 1);
}

#[test]
fn filter_unknown_column_fails_with_message() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    analyst_cmd(&workspace)
        .args(["filter", "t.csv", "nope", "a"])
        .assert()
        .failure()
        .stderr(contains("Column 'nope' not found"));
}

#[test]
fn negative_limit_fails() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    analyst_cmd(&workspace)
        .args(["filter", "t.csv", "name", "a", "--limit", "-2"])
        .assert()
        .failure()
        .stderr(contains("'limit' must be >= 0"));
}

#[test]
fn escaping_the_data_dir_is_denied() {
    let workspace = TestWorkspace::new();
    workspace.write_outside("secret.csv", SMALL_CSV);
    analyst_cmd(&workspace)
        .args(["preview", "../secret.csv"])
        .assert()
        .failure()
        .stderr(contains("Access denied"));
}

#[test]
fn missing_data_dir_fails_except_for_paths() {
    let workspace = TestWorkspace::new();
    let missing = workspace.outer().join("nowhere");
    Command::cargo_bin("csv-analyst")
        .expect("binary exists")
        .env("RUST_LOG", "off")
        .arg("--data-dir")
        .arg(&missing)
        .arg("list")
        .assert()
        .failure()
        .stderr(contains("File not found"));

    let output = Command::cargo_bin("csv-analyst")
        .expect("binary exists")
        .env("RUST_LOG", "off")
        .arg("--data-dir")
        .arg(&missing)
        .arg("paths")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: Value = serde_json::from_slice(&output).expect("json");
    assert_eq!(report["exists"], false);
}

#[test]
fn data_dir_can_come_from_environment() {
    let workspace = TestWorkspace::new();
    workspace.write("env.csv", SMALL_CSV);
    let output = Command::cargo_bin("csv-analyst")
        .expect("binary exists")
        .env("RUST_LOG", "off")
        .env("CSV_ANALYST_DATA_DIR", workspace.data_dir())
        .arg("list")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listed: Value = serde_json::from_slice(&output).expect("json");
    assert_eq!(listed, json!(["env.csv"]));
}

#[test]
fn config_file_sets_defaults() {
    let workspace = TestWorkspace::new();
    let mut contents = String::from("n\n");
    for i in 0..10 {
        contents.push_str(&format!("{i}\n"));
    }
    workspace.write("ten.csv", &contents);
    let config = workspace.outer().join("analyst.yml");
    fs::write(
        &config,
        format!(
            "data_dir: {}\npreview_rows: 2\nsample_rows: 4\n",
            workspace.data_dir().display()
        ),
    )
    .unwrap();

    let mut preview_cmd = Command::cargo_bin("csv-analyst").expect("binary exists");
    preview_cmd
        .env_remove("CSV_ANALYST_DATA_DIR")
        .env("RUST_LOG", "off")
        .arg("--config")
        .arg(&config)
        .args(["preview", "ten.csv"]);
    assert_eq!(stdout_json(&mut preview_cmd)["count_returned"], 2);

    let mut describe_cmd = Command::cargo_bin("csv-analyst").expect("binary exists");
    describe_cmd
        .env_remove("CSV_ANALYST_DATA_DIR")
        .env("RUST_LOG", "off")
        .arg("--config")
        .arg(&config)
        .args(["describe", "ten.csv"]);
    let description = stdout_json(&mut describe_cmd);
    assert_eq!(description["sampled_rows"], 4);
    assert_eq!(description["summary"]["n"]["max"], 3.0);
}

#[test]
fn prompt_explain_columns_accepts_comma_list() {
    Command::cargo_bin("csv-analyst")
        .expect("binary exists")
        .env("RUST_LOG", "off")
        .args(["prompt", "explain-columns", "games.csv", "title, price"])
        .assert()
        .success()
        .stdout(contains("\"games.csv\"").and(contains(r#"["title","price"]"#)));
}

#[test]
fn prompt_detect_anomalies_guides_on_bad_json() {
    Command::cargo_bin("csv-analyst")
        .expect("binary exists")
        .env("RUST_LOG", "off")
        .args(["prompt", "detect-anomalies", "games.csv", "{broken"])
        .assert()
        .success()
        .stdout(contains("must be valid JSON"));
}

#[test]
fn serve_answers_line_delimited_requests() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    let requests = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
               "params": {"name": "filter_equals",
                          "arguments": {"filename": "t.csv", "column": "name", "value": "a"}}}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "resources/read",
               "params": {"uri": "csv://index"}}),
    ]
    .iter()
    .map(|request| request.to_string())
    .collect::<Vec<_>>()
    .join("\n");

    let output = analyst_cmd(&workspace)
        .arg("serve")
        .write_stdin(requests)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let responses = String::from_utf8(output)
        .expect("utf-8")
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).expect("json line"))
        .collect::<Vec<_>>();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "CSV Analyst");
    assert_eq!(
        responses[1]["result"]["structuredContent"]["count_returned"],
        2
    );
    assert_eq!(
        responses[2]["result"]["contents"][0]["text"],
        "Available CSV files:\n- t.csv"
    );
}
