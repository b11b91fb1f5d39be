//! Top-level CLI definition and dispatch.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use planning_timeline::core::config::Config;
use planning_timeline::core::errors::PtlError;
use planning_timeline::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};
use planning_timeline::schedule::ingest::{IngestReport, ingest_json};
use planning_timeline::schedule::item::ScheduleItem;
use planning_timeline::timeline::bars::{BarCategory, BarGeometry, BarInteraction};
use planning_timeline::timeline::clock::{Clock, FixedClock, SystemClock};
use planning_timeline::timeline::resolution::Resolution;
use planning_timeline::timeline::view::{TimelineFrame, TimelineView};
use planning_timeline::timeline::viewport::ViewportMsg;

/// Planning Timeline: project production orders onto a zoomable calendar grid.
#[derive(Debug, Parser)]
#[command(
    name = "ptl",
    author,
    version,
    about = "Planning Timeline - Gantt projection for production orders",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Increase verbosity.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Render the timeline for a set of schedule items.
    Render(RenderArgs),
    /// Turn a bar interaction into a date edit request.
    Edit(EditArgs),
    /// View configuration state.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Inputs shared by every command that builds a timeline.
#[derive(Debug, Clone, Args)]
struct TimelineArgs {
    /// JSON array of schedule items.
    #[arg(long, value_name = "FILE")]
    items: PathBuf,
    /// Grid resolution (day, week, month). Defaults to the configured one.
    #[arg(long, value_name = "RES")]
    resolution: Option<Resolution>,
    /// Apply N zoom-in steps before projecting.
    #[arg(long, default_value_t = 0, value_name = "N")]
    zoom_in: u32,
    /// Apply N zoom-out steps before projecting.
    #[arg(long, default_value_t = 0, value_name = "N")]
    zoom_out: u32,
    /// Horizontal scroll offset in pixels.
    #[arg(long, default_value_t = 0, value_name = "PX", allow_negative_numbers = true)]
    scroll: i64,
    /// Pin "today" (YYYY-MM-DD) instead of reading the local clock.
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Args)]
struct RenderArgs {
    #[command(flatten)]
    timeline: TimelineArgs,
    /// Only list bars visible in a pane this many pixels wide.
    #[arg(long, value_name = "PX")]
    pane_width: Option<f64>,
}

#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("interaction")
        .required(true)
        .args(["move_px", "resize_start", "resize_end", "start"])
))]
struct EditArgs {
    #[command(flatten)]
    timeline: TimelineArgs,
    /// Item to edit.
    #[arg(long, value_name = "ID")]
    id: String,
    /// Drag the whole bar by PX pixels.
    #[arg(long = "move", value_name = "PX", allow_negative_numbers = true)]
    move_px: Option<f64>,
    /// Drag the left edge by PX pixels.
    #[arg(long, value_name = "PX", allow_negative_numbers = true)]
    resize_start: Option<f64>,
    /// Drag the right edge by PX pixels.
    #[arg(long, value_name = "PX", allow_negative_numbers = true)]
    resize_end: Option<f64>,
    /// New start date (YYYY-MM-DD); requires --end.
    #[arg(long, value_name = "DATE", requires = "end")]
    start: Option<NaiveDate>,
    /// New end date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE", requires = "start")]
    end: Option<NaiveDate>,
}

impl EditArgs {
    fn interaction(&self) -> Option<BarInteraction> {
        if let Some(delta_px) = self.move_px {
            return Some(BarInteraction::Move { delta_px });
        }
        if let Some(delta_px) = self.resize_start {
            return Some(BarInteraction::ResizeStart { delta_px });
        }
        if let Some(delta_px) = self.resize_end {
            return Some(BarInteraction::ResizeEnd { delta_px });
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(BarInteraction::SetDates { start, end }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<PtlError> for CliError {
    fn from(err: PtlError) -> Self {
        if err.is_input_error() {
            return Self::User(err.to_string());
        }
        match err {
            PtlError::Serialization { .. } => Self::Internal(err.to_string()),
            _ => Self::Runtime(err.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }
    init_tracing(cli);

    match &cli.command {
        Command::Render(args) => run_render(cli, args),
        Command::Edit(args) => run_edit(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("PTL_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (tests driving `run` twice) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

// ──────────────────── shared session setup ────────────────────

/// Everything a timeline command needs after config, items and viewport are resolved.
struct Session {
    log: JsonlWriter,
    report: IngestReport,
    view: TimelineView,
    today: NaiveDate,
}

fn open_session(cli: &Cli, args: &TimelineArgs) -> Result<Session, CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let mut log = JsonlWriter::open(JsonlConfig::at(&config.paths.jsonl_log));
    log.write_entry(&LogEntry {
        details: config.stable_hash().ok(),
        ..LogEntry::new(EventType::ConfigLoaded, Severity::Info)
    });

    let report = load_items(&args.items)?;
    for rejected in &report.rejected {
        log.write_entry(&LogEntry::rejected(rejected));
    }

    let mut view = TimelineView::new(&config.timeline);
    if let Some(resolution) = args.resolution {
        view.dispatch(ViewportMsg::SetResolution(resolution));
    }
    dispatch_repeated(&mut view, ViewportMsg::ZoomIn, args.zoom_in);
    dispatch_repeated(&mut view, ViewportMsg::ZoomOut, args.zoom_out);
    view.dispatch(ViewportMsg::SetScroll(args.scroll));

    let clock: Box<dyn Clock> = match args.today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };

    Ok(Session {
        log,
        report,
        view,
        today: clock.today(),
    })
}

/// Dispatch `msg` up to `times` times, stopping once the viewport saturates.
/// Returns the number of dispatches that changed it.
fn dispatch_repeated(view: &mut TimelineView, msg: ViewportMsg, times: u32) -> u32 {
    let mut applied = 0;
    while applied < times && view.dispatch(msg) {
        applied += 1;
    }
    applied
}

fn load_items(path: &Path) -> Result<IngestReport, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| PtlError::io(path, source))?;
    ingest_json(&raw).map_err(|e| {
        CliError::User(format!("cannot parse items file {}: {e}", path.display()))
    })
}

fn rejected_json(report: &IngestReport) -> Vec<Value> {
    report
        .rejected
        .iter()
        .map(|r| {
            json!({
                "itemId": r.item_id,
                "code": r.error.code(),
                "message": r.error.to_string(),
            })
        })
        .collect()
}

fn print_rejected(report: &IngestReport) {
    for rejected in &report.rejected {
        eprintln!(
            "{} {}: {}",
            "skipped".yellow().bold(),
            rejected.item_id,
            rejected.error
        );
    }
}

// ──────────────────── render ────────────────────

fn run_render(cli: &Cli, args: &RenderArgs) -> Result<(), CliError> {
    let mut session = open_session(cli, &args.timeline)?;
    let frame = session.view.render(&session.report.items, session.today);
    session.log.write_entry(&LogEntry::render(&frame));

    let bars: Vec<&BarGeometry> = match args.pane_width {
        Some(width) => frame.visible_bars(width).collect(),
        None => frame.bars.iter().collect(),
    };

    match output_mode(cli) {
        OutputMode::Human => {
            print_rejected(&session.report);
            print_frame(&frame, &bars, &session.report.items);
        }
        OutputMode::Json => {
            let mut frame_value = serde_json::to_value(&frame)?;
            if args.pane_width.is_some() {
                frame_value["bars"] = serde_json::to_value(&bars)?;
            }
            let payload = json!({
                "command": "render",
                "today": session.today,
                "frame": frame_value,
                "rejected": rejected_json(&session.report),
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn print_frame(frame: &TimelineFrame, bars: &[&BarGeometry], items: &[ScheduleItem]) {
    println!(
        "{} {} → {}  ({}, zoom {:.2}, scroll {}px, {} ticks × {:.1}px)",
        "Timeline".bold(),
        frame.range.min,
        frame.range.max,
        frame.resolution,
        frame.viewport.zoom_factor(),
        frame.viewport.scroll_offset(),
        frame.ticks.len(),
        frame.unit_width,
    );

    let months: Vec<String> = frame
        .month_spans
        .iter()
        .map(|span| format!("{} ({})", span.label, span.tick_count))
        .collect();
    println!("{} {}", "Months:".dimmed(), months.join(" | "));

    match &frame.today {
        Some(marker) => println!(
            "{} {} at {:.1}px",
            "Today:".dimmed(),
            marker.date,
            marker.position
        ),
        None => println!("{} outside the visible range", "Today:".dimmed()),
    }

    if bars.is_empty() {
        println!("\n(no bars)");
        return;
    }

    println!(
        "\n{:<14} {:<24} {:>9} {:>9}  {}",
        "ID".bold(),
        "LABEL".bold(),
        "LEFT".bold(),
        "WIDTH".bold(),
        "CATEGORY".bold()
    );
    for bar in bars {
        let label = items
            .iter()
            .find(|item| item.id == bar.item_id)
            .map_or("", |item| item.label.as_str());
        let key = bar.category.key();
        let category = match bar.category {
            BarCategory::Shortage => key.as_str().red(),
            BarCategory::Problem => key.as_str().yellow(),
            BarCategory::InProgress => key.as_str().blue(),
            BarCategory::Stage(_) => key.as_str().normal(),
        };
        let urgent = if bar.urgent {
            "  URGENT".red().bold().to_string()
        } else {
            String::new()
        };
        println!(
            "{:<14} {:<24} {:>9.1} {:>9.1}  {category}{urgent}",
            bar.item_id, label, bar.left, bar.width
        );
    }
}

// ──────────────────── edit ────────────────────

fn run_edit(cli: &Cli, args: &EditArgs) -> Result<(), CliError> {
    let interaction = args
        .interaction()
        .ok_or_else(|| CliError::User("one interaction flag is required".to_string()))?;
    let mut session = open_session(cli, &args.timeline)?;

    let request = match session.view.edit(
        &session.report.items,
        &args.id,
        interaction,
        session.today,
        &mut session.log,
    ) {
        Ok(request) => request,
        Err(err) => {
            session
                .log
                .write_entry(&LogEntry::from_error(EventType::Error, Severity::Error, &err));
            return Err(err.into());
        }
    };

    match output_mode(cli) {
        OutputMode::Human => {
            print_rejected(&session.report);
            println!(
                "{} {}: {} → {}",
                "edit".green().bold(),
                request.item_id,
                request.proposed_start,
                request.proposed_end
            );
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "edit",
                "request": request,
                "rejected": rejected_json(&session.report),
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────── config ────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = Config::load(cli.config.as_deref())?;
            let hash = config.stable_hash()?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Internal(format!("serialize config: {e}")))?;
                    println!("# hash: {hash}");
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config show",
                        "hash": hash,
                        "config": serde_json::to_value(&config)?,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
    }
}

// ──────────────────── output helpers ────────────────────

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("PTL_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
