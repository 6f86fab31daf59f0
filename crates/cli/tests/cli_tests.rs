// End-to-end tests for the `acsx` binary.
//
// Run with: cargo test -p acsx-cli --test cli_tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use calamine::{open_workbook_auto, Data, Reader};
use tempfile::TempDir;

const SHEET: &str = "\
Label,\"Autauga County, Alabama\",,\"Baldwin County, Alabama\",,\"Barbour County, Alabama\",
Total population,55000,+/-10,200000,+/-20,25000,+/-5
Under 5 years,3025,+/-3,12000,+/-4,1500,+/-1
";

const CONFIG: &str = r#"
name = "Alabama kids"
geography = "county"
geographies = ["Autauga County, Alabama", "Baldwin County, Alabama"]

[source]
file = "acs.csv"

[columns]
start = "B"
per_block = 2
target_offset = 1

[[rows]]
label = "Total"
spec = "2"

[[rows]]
label = "Under 5"
spec = 3

[[percentages]]
numerator = "Under 5"
denominator = "Total"
label = "% Under 5"

[output]
percent_decimals = 1
"#;

fn acsx() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_acsx"));
    cmd.env_remove("ACSX_LOG").env_remove("RUST_LOG");
    cmd
}

/// Temp dir holding `acs.csv` and `run.toml` (with `config` as its contents).
fn workspace(config: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("acs.csv"), SHEET).unwrap();
    let config_path = dir.path().join("run.toml");
    std::fs::write(&config_path, config).unwrap();
    (dir, config_path)
}

fn run(args: &[&str]) -> Output {
    acsx().args(args).output().expect("spawn acsx")
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ===========================================================================
// acsx extract
// ===========================================================================

#[test]
fn extract_tsv_to_stdout() {
    let (_dir, config) = workspace(CONFIG);
    let out = run(&["extract", path_str(&config)]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "County\tTotal\tUnder 5\t% Under 5\n\
         Autauga County, Alabama\t55000\t3025\t5.5\n\
         Baldwin County, Alabama\t200000\t12000\t6.0\n"
    );
    assert!(stderr(&out).contains("2 geographies, 2 matched, 0 unmatched, 0 warning(s)"));
}

#[test]
fn extract_csv_quotes_names_with_commas() {
    let (_dir, config) = workspace(CONFIG);
    let out = run(&["extract", path_str(&config), "--format", "csv", "-q"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.starts_with("County,Total,Under 5,% Under 5\n"));
    assert!(text.contains("\"Autauga County, Alabama\",55000,3025,5.5\n"));
    assert!(stderr(&out).is_empty(), "quiet run wrote to stderr: {}", stderr(&out));
}

#[test]
fn extract_json_carries_meta_and_match_diagnostics() {
    let config_text = CONFIG.replace(
        r#"geographies = ["Autauga County, Alabama", "Baldwin County, Alabama"]"#,
        r#"geographies = ["Autauga County, Alabama", "Xyz Parish, Louisiana"]"#,
    );
    let (_dir, config) = workspace(&config_text);
    let out = run(&["extract", path_str(&config), "--format", "json", "-q"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();

    assert_eq!(json["meta"]["config_name"], "Alabama kids");
    assert_eq!(json["meta"]["geography"], "county");
    assert!(json["meta"]["run_at"].as_str().is_some());
    assert_eq!(json["summary"]["matched"], 1);
    assert_eq!(json["summary"]["unmatched"], 1);

    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["values"]["Total"], 55000.0);
    assert_eq!(rows[0]["match"]["column_block_start"], 1);
    assert_eq!(rows[1]["geography"], "Xyz Parish, Louisiana");
    assert!(rows[1]["values"]["Total"].is_null());
    assert!(rows[1]["match"]["column_block_start"].is_null());

    assert_eq!(json["warnings"][0]["reason"]["kind"], "no_match");
}

#[test]
fn unmatched_geography_warns_but_succeeds() {
    let config_text = CONFIG.replace("\"Baldwin County, Alabama\"]", "\"Xyz Parish, Louisiana\"]");
    let (_dir, config) = workspace(&config_text);
    let out = run(&["extract", path_str(&config)]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).ends_with("Xyz Parish, Louisiana\t\t\t\n"));
    assert!(stderr(&out).contains("warning: Xyz Parish, Louisiana: no match"));
}

#[test]
fn strict_exits_5_after_writing_table() {
    let config_text = CONFIG.replace("\"Baldwin County, Alabama\"]", "\"Xyz Parish, Louisiana\"]");
    let (_dir, config) = workspace(&config_text);
    let out = run(&["extract", path_str(&config), "--strict"]);

    assert_eq!(out.status.code(), Some(5));
    assert!(stdout(&out).starts_with("County\t"));
    assert!(stderr(&out).contains("--strict"));
}

#[test]
fn output_flag_writes_file() {
    let (dir, config) = workspace(CONFIG);
    let dest = dir.path().join("out.tsv");
    let out = run(&["extract", path_str(&config), "-o", path_str(&dest)]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty());
    let written = std::fs::read_to_string(&dest).unwrap();
    assert!(written.starts_with("County\tTotal"));
    assert!(written.ends_with('\n'));
}

#[test]
fn xlsx_workbook_has_header_values_and_note() {
    let config_text = CONFIG.replace(
        "percent_decimals = 1",
        "percent_decimals = 1\nsheet_name = \"Kids\"\nsource_note = \"ACS 5-year estimates\"",
    );
    let (dir, config) = workspace(&config_text);
    let dest = dir.path().join("kids.xlsx");
    let out = run(&["extract", path_str(&config), "--format", "xlsx", "-o", path_str(&dest)]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("wrote"));

    let mut workbook = open_workbook_auto(&dest).unwrap();
    assert_eq!(workbook.sheet_names().to_vec(), vec!["Kids".to_string()]);
    let range = workbook.worksheet_range("Kids").unwrap();

    assert_eq!(range.get_value((0, 0)), Some(&Data::String("County".into())));
    assert_eq!(range.get_value((0, 3)), Some(&Data::String("% Under 5".into())));
    assert_eq!(range.get_value((1, 0)), Some(&Data::String("Autauga County, Alabama".into())));
    assert_eq!(range.get_value((1, 1)), Some(&Data::Float(55000.0)));
    assert_eq!(range.get_value((2, 3)), Some(&Data::Float(6.0)));
    // Four table columns, one spacer, note in F4.
    assert_eq!(range.get_value((3, 5)), Some(&Data::String("ACS 5-year estimates".into())));
}

#[test]
fn xlsx_without_output_is_usage_error() {
    let (_dir, config) = workspace(CONFIG);
    let out = run(&["extract", path_str(&config), "--format", "xlsx"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("--output"));
}

#[test]
fn input_flag_overrides_source_file() {
    let (dir, config) = workspace(&CONFIG.replace("file = \"acs.csv\"", "file = \"missing.csv\""));
    let out = run(&[
        "extract",
        path_str(&config),
        "--input",
        path_str(&dir.path().join("acs.csv")),
        "-q",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
}

#[test]
fn names_file_is_resolved_next_to_config() {
    let config_text = CONFIG.replace(
        r#"geographies = ["Autauga County, Alabama", "Baldwin County, Alabama"]"#,
        r#"geographies_file = "counties.txt""#,
    );
    let (dir, config) = workspace(&config_text);
    std::fs::write(
        dir.path().join("counties.txt"),
        "Barbour County, Alabama\n\nAutauga County, Alabama\n",
    )
    .unwrap();

    let out = run(&["extract", path_str(&config), "-q"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Barbour County, Alabama\t25000"));
    assert!(lines[2].starts_with("Autauga County, Alabama\t55000"));
}

#[test]
fn missing_input_file_exits_4() {
    let (_dir, config) = workspace(&CONFIG.replace("acs.csv", "nope.csv"));
    let out = run(&["extract", path_str(&config)]);
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("nope.csv"));
}

#[test]
fn no_input_at_all_is_usage_error() {
    let (_dir, config) = workspace(&CONFIG.replace("file = \"acs.csv\"", ""));
    let out = run(&["extract", path_str(&config)]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn invalid_config_exits_3_before_reading_input() {
    let (_dir, config) = workspace(&CONFIG.replace("target_offset = 1", "target_offset = 3"));
    let out = run(&["extract", path_str(&config)]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stdout(&out).is_empty());
}

// ===========================================================================
// acsx validate
// ===========================================================================

#[test]
fn validate_accepts_good_config() {
    let (_dir, config) = workspace(CONFIG);
    let out = run(&["validate", path_str(&config)]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("valid: county extraction 'Alabama kids'"));
}

#[test]
fn validate_rejects_bad_row_spec() {
    let (_dir, config) = workspace(&CONFIG.replace("spec = \"2\"", "spec = \"2-x\""));
    let out = run(&["validate", path_str(&config)]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("Total"));
}

#[test]
fn validate_rejects_unknown_percentage_label() {
    let (_dir, config) = workspace(&CONFIG.replace("denominator = \"Total\"", "denominator = \"Everyone\""));
    let out = run(&["validate", path_str(&config)]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("Everyone"));
}

// ===========================================================================
// acsx sheets
// ===========================================================================

#[test]
fn sheets_json_is_single_array() {
    let (dir, _config) = workspace(CONFIG);
    let out = run(&["sheets", path_str(&dir.path().join("acs.csv")), "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(json, serde_json::json!(["acs"]));
}

#[test]
fn sheets_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, "x").unwrap();
    let out = run(&["sheets", path_str(&path)]);
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("hint:"));
}
