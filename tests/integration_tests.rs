//! Integration tests: CLI smoke tests and end-to-end `ptl` runs against
//! item fixtures in a scratch HOME.

mod common;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

const ITEMS_FIXTURE: &str = r#"[
  {
    "id": "PO-1",
    "label": "Jacket run",
    "startDate": "2025-01-01",
    "endDate": "2025-01-05",
    "flags": { "shortage": true, "problem": true }
  },
  {
    "id": "PO-2",
    "label": "Trousers",
    "startDate": "2025-01-10",
    "endDate": "2025-01-20",
    "deliveryDate": "2025-01-21",
    "flags": { "inProgress": true, "stage": "sewing" }
  },
  {
    "id": "PO-3",
    "label": "Broken import",
    "startDate": "31/02/2025",
    "endDate": "2025-02-10"
  }
]"#;

/// Scratch HOME with an items fixture and a private activity log.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("create sandbox");
        fs::write(dir.path().join("items.json"), ITEMS_FIXTURE).expect("write fixture");
        Self { dir }
    }

    fn items(&self) -> String {
        self.dir.path().join("items.json").display().to_string()
    }

    fn log_path(&self) -> PathBuf {
        self.dir.path().join("logs/activity.jsonl")
    }

    fn home(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self, case: &str, args: &[&str]) -> common::CmdResult {
        let home = self.home().display().to_string();
        let log = self.log_path().display().to_string();
        common::run_cli_case_with_env(
            case,
            args,
            &[("HOME", home.as_str()), ("PTL_PATHS_JSONL_LOG", log.as_str())],
        )
    }

    fn log_events(&self) -> Vec<Value> {
        fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(|line| serde_json::from_str(line).expect("log line is JSON"))
            .collect()
    }
}

fn parse_stdout(result: &common::CmdResult) -> Value {
    serde_json::from_str(result.stdout.trim()).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}); log: {}",
            result.log_path.display()
        )
    })
}

#[test]
fn help_command_prints_usage() {
    let result = common::run_cli_case("help_command_prints_usage", &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: ptl [OPTIONS] <COMMAND>"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
}

#[test]
fn subcommand_help_flags_work() {
    for subcmd in ["render", "edit", "config", "completions"] {
        let case_name = format!("subcommand_{subcmd}_help");
        let result = common::run_cli_case(&case_name, &[subcmd, "--help"]);
        assert!(
            result.status.success(),
            "subcommand '{subcmd} --help' failed; log: {}",
            result.log_path.display()
        );
        assert!(
            result.stdout.contains("Usage"),
            "subcommand '{subcmd} --help' missing usage info; log: {}",
            result.log_path.display()
        );
    }
}

#[test]
fn completions_command_generates_shell_script() {
    let result = common::run_cli_case(
        "completions_command_generates_shell_script",
        &["completions", "bash"],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("ptl"),
        "expected completion script contents; log: {}",
        result.log_path.display()
    );
}

#[test]
fn render_json_reports_frame_and_rejections() {
    let sandbox = Sandbox::new();
    let items = sandbox.items();
    let result = sandbox.run(
        "render_json_reports_frame_and_rejections",
        &[
            "render",
            "--json",
            "--items",
            &items,
            "--resolution",
            "day",
            "--today",
            "2025-01-03",
        ],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );

    let payload = parse_stdout(&result);
    assert_eq!(payload["command"], "render");
    let frame = &payload["frame"];
    assert_eq!(frame["resolution"], "day");
    // 2024-12-25 ..= 2025-01-28: seven days of padding around 01-01 ..= 01-21.
    assert_eq!(frame["ticks"].as_array().map(Vec::len), Some(35));
    assert_eq!(frame["range"]["min"], "2024-12-25");
    assert_eq!(frame["range"]["max"], "2025-01-28");

    let bars = frame["bars"].as_array().expect("bars array");
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0]["item_id"], "PO-1");
    assert_eq!(bars[0]["category"]["kind"], "shortage");
    assert_eq!(bars[0]["left"].as_f64(), Some(210.0));
    assert_eq!(bars[0]["width"].as_f64(), Some(120.0));
    assert_eq!(bars[1]["category"]["kind"], "in_progress");
    assert!(frame["today"].is_object());

    let rejected = payload["rejected"].as_array().expect("rejected array");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["itemId"], "PO-3");
    assert_eq!(rejected[0]["code"], "PTL-2001");

    let events: Vec<String> = sandbox
        .log_events()
        .iter()
        .map(|e| e["event"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        events,
        vec!["config_loaded", "item_rejected", "render_completed"]
    );
}

#[test]
fn render_human_output_lists_bars() {
    let sandbox = Sandbox::new();
    let items = sandbox.items();
    let home = sandbox.home().display().to_string();
    let log = sandbox.log_path().display().to_string();
    // stdout is a pipe here, so auto mode would pick JSON.
    let result = common::run_cli_case_with_env(
        "render_human_output_lists_bars",
        &[
            "render",
            "--no-color",
            "--items",
            &items,
            "--today",
            "2025-01-03",
        ],
        &[
            ("HOME", home.as_str()),
            ("PTL_PATHS_JSONL_LOG", log.as_str()),
            ("PTL_OUTPUT_FORMAT", "human"),
        ],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("Timeline"));
    assert!(result.stdout.contains("PO-1"));
    assert!(result.stdout.contains("Jacket run"));
    assert!(result.stdout.contains("URGENT"));
    assert!(result.stderr.contains("PO-3"));
}

#[test]
fn edit_appends_request_to_activity_log() {
    let sandbox = Sandbox::new();
    let items = sandbox.items();
    let result = sandbox.run(
        "edit_appends_request_to_activity_log",
        &[
            "edit",
            "--json",
            "--items",
            &items,
            "--resolution",
            "day",
            "--today",
            "2025-01-03",
            "--id",
            "PO-2",
            "--resize-end",
            "90",
        ],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );

    let payload = parse_stdout(&result);
    assert_eq!(payload["request"]["itemId"], "PO-2");
    assert_eq!(payload["request"]["proposedStart"], "2025-01-10");
    assert_eq!(payload["request"]["proposedEnd"], "2025-01-23");

    let edits: Vec<Value> = sandbox
        .log_events()
        .into_iter()
        .filter(|e| e["event"] == "date_edit_requested")
        .collect();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0]["item_id"], "PO-2");
    assert_eq!(edits[0]["proposed_end"], "2025-01-23");
}

#[test]
fn edit_unknown_item_exits_with_user_error() {
    let sandbox = Sandbox::new();
    let items = sandbox.items();
    let result = sandbox.run(
        "edit_unknown_item_exits_with_user_error",
        &[
            "edit", "--json", "--items", &items, "--id", "PO-404", "--move", "30",
        ],
    );
    assert_eq!(
        result.status.code(),
        Some(1),
        "expected user error; log: {}",
        result.log_path.display()
    );
    assert!(result.stderr.contains("PTL-2003"));
}

#[test]
fn missing_items_file_is_a_runtime_error() {
    let sandbox = Sandbox::new();
    let missing = sandbox.home().join("nope.json").display().to_string();
    let result = sandbox.run(
        "missing_items_file_is_a_runtime_error",
        &["render", "--json", "--items", &missing],
    );
    assert_eq!(
        result.status.code(),
        Some(2),
        "expected runtime error; log: {}",
        result.log_path.display()
    );
    assert!(result.stderr.contains("PTL-3002"));
}

#[test]
fn config_show_reflects_env_overrides() {
    let sandbox = Sandbox::new();
    let home = sandbox.home().display().to_string();
    let result = common::run_cli_case_with_env(
        "config_show_reflects_env_overrides",
        &["config", "show", "--json"],
        &[
            ("HOME", home.as_str()),
            ("PTL_TIMELINE_PADDING_DAYS", "3"),
            ("PTL_TIMELINE_DEFAULT_RESOLUTION", "month"),
        ],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    let payload = parse_stdout(&result);
    assert_eq!(payload["config"]["timeline"]["padding_days"], 3);
    assert_eq!(payload["config"]["timeline"]["default_resolution"], "month");
    assert!(payload["hash"].as_str().is_some_and(|h| !h.is_empty()));
}

#[test]
fn explicit_missing_config_is_rejected() {
    let sandbox = Sandbox::new();
    let missing = sandbox.home().join("absent.toml").display().to_string();
    let result = sandbox.run(
        "explicit_missing_config_is_rejected",
        &["config", "show", "--config", &missing],
    );
    assert_eq!(
        result.status.code(),
        Some(1),
        "expected user error; log: {}",
        result.log_path.display()
    );
    assert!(result.stderr.contains("PTL-1002"));
}
