mod common;

use csv_analyst::{AnalystError, preview};
use encoding_rs::UTF_8;

use common::{SMALL_CSV, TestWorkspace};

#[test]
fn preview_defaults_to_five_rows() {
    let workspace = TestWorkspace::new();
    let mut contents = String::from("id,label\n");
    for i in 0..8 {
        contents.push_str(&format!("{i},row{i}\n"));
    }
    workspace.write("eight.csv", &contents);

    let preview = workspace
        .analyst()
        .preview_csv("eight.csv", None)
        .expect("preview");
    assert_eq!(preview.columns, vec!["id", "label"]);
    assert_eq!(preview.count_returned, 5);
    assert_eq!(preview.rows[4].get("label"), Some("row4"));
}

#[test]
fn preview_caps_at_file_length() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    let preview = workspace
        .analyst()
        .preview_csv("t.csv", Some(50))
        .expect("preview");
    assert_eq!(preview.count_returned, 3);
    assert_eq!(preview.rows.len(), 3);
    assert_eq!(preview.rows[2].get("val"), Some("x"));
}

#[test]
fn preview_of_header_only_file_keeps_columns() {
    let workspace = TestWorkspace::new();
    workspace.write("empty.csv", "a,b,c\n");
    let preview = workspace
        .analyst()
        .preview_csv("empty.csv", Some(5))
        .expect("preview");
    assert_eq!(preview.columns, vec!["a", "b", "c"]);
    assert!(preview.rows.is_empty());
    assert_eq!(preview.count_returned, 0);
}

#[test]
fn preview_zero_rows_returns_header_only() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    let preview = workspace
        .analyst()
        .preview_csv("t.csv", Some(0))
        .expect("preview");
    assert_eq!(preview.columns, vec!["name", "val"]);
    assert_eq!(preview.count_returned, 0);
}

#[test]
fn preview_rejects_negative_row_count() {
    let workspace = TestWorkspace::new();
    workspace.write("t.csv", SMALL_CSV);
    let err = workspace
        .analyst()
        .preview_csv("t.csv", Some(-1))
        .unwrap_err();
    assert!(matches!(err, AnalystError::InvalidArgument(_)));
}

#[test]
fn preview_returns_cells_verbatim_and_nulls_for_gaps() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "gaps.csv",
        "id,note,extra\n1,\"  padded, quoted  \",\n2\n",
    );
    let preview = preview::preview(&path, 10, UTF_8).expect("preview");
    let first = &preview.rows[0];
    assert_eq!(first.get("note"), Some("  padded, quoted  "));
    assert_eq!(first.get("extra"), None);
    let second = &preview.rows[1];
    assert_eq!(second.get("id"), Some("2"));
    assert_eq!(second.cells(), &[Some("2".to_string()), None, None]);

    let json = serde_json::to_value(&preview).expect("serialize");
    assert!(json["rows"][1]["note"].is_null());
    assert_eq!(json["count_returned"], 2);
}

#[test]
fn preview_handles_very_long_fields() {
    let workspace = TestWorkspace::new();
    let long = "y".repeat(1 << 20);
    workspace.write("long.csv", &format!("id,blob\n1,{long}\n2,short\n"));
    let preview = workspace
        .analyst()
        .preview_csv("long.csv", Some(1))
        .expect("preview");
    assert_eq!(preview.rows[0].get("blob").map(str::len), Some(1 << 20));
}

#[test]
fn preview_stops_before_malformed_tail() {
    let workspace = TestWorkspace::new();
    let mut bytes = b"id,name\n1,ok\n2,fine\n".to_vec();
    bytes.extend_from_slice(&[b'3', b',', 0xff, 0xfe, b'\n']);
    workspace.write_bytes("tail.csv", &bytes);

    let analyst = workspace.analyst();
    let preview = analyst.preview_csv("tail.csv", Some(2)).expect("preview");
    assert_eq!(preview.count_returned, 2);

    let err = analyst.preview_csv("tail.csv", Some(3)).unwrap_err();
    assert!(matches!(err, AnalystError::Decode { .. }));
}

#[test]
fn preview_strips_utf8_bom_from_header() {
    let workspace = TestWorkspace::new();
    let mut bytes = vec![0xef, 0xbb, 0xbf];
    bytes.extend_from_slice(b"name,val\na,1\n");
    workspace.write_bytes("bom.csv", &bytes);
    let preview = workspace
        .analyst()
        .preview_csv("bom.csv", None)
        .expect("preview");
    assert_eq!(preview.columns, vec!["name", "val"]);
    assert_eq!(preview.rows[0].get("name"), Some("a"));
}
