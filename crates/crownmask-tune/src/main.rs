//! crownmask-tune: replay scripted operator edits against the parameter panel.
//!
//! Builds a [`ParameterPanel`], optionally applies a settings map, then
//! replays a JSON script of slider moves, keystrokes, tab switches and go
//! presses. Every notification the panel dispatches is printed together
//! with the committed vector at that moment. Useful for:
//!
//! - Checking which edits are announced and which are suppressed
//! - Reproducing listener-visible behavior from a recorded session
//! - Inspecting the settings map produced for a parameter set
//!
//! # Usage
//!
//! ```text
//! cargo run --bin crownmask-tune -- --script edits.json [--json]
//! ```
//!
//! Script format (a JSON array):
//!
//! ```json
//! [
//!   { "action": "type", "parameter": "sigma_filter", "text": "2.5" },
//!   { "action": "slide", "parameter": "gamma", "position": -12 },
//!   { "action": "select", "tab": 2 },
//!   { "action": "estimate", "minutes": 14.2 },
//!   { "action": "go" }
//! ]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::cell::RefCell;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use crownmask_params::{
    ChangeEvent, Edit, ListenerContext, Parameter, ParameterPanel, ParameterVector, SettingsMap,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Replay operator edits against the crownmask parameter panel.
///
/// Prints every change notification the panel dispatches, followed by
/// the final committed vector.
#[derive(Parser)]
#[command(name = "crownmask-tune", version)]
struct Cli {
    /// Path to a JSON edit script, or `-` to read it from stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Settings map as a JSON object, applied before the script runs.
    #[arg(long)]
    settings_json: Option<String>,

    /// Title of the target image shown by the panel.
    #[arg(long, default_value = "untitled")]
    title: String,

    /// Print notifications and the final state as JSON.
    #[arg(long)]
    json: bool,

    /// Print the final settings map.
    #[arg(long)]
    print_settings: bool,
}

/// One scripted operator action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Step {
    /// Move a slider to a bounded position.
    Slide { parameter: Parameter, position: i32 },
    /// Replace a text field's content.
    Type { parameter: Parameter, text: String },
    /// Switch to a tab.
    Select { tab: usize },
    /// Press the go button.
    Go,
    /// Show an externally computed duration estimate.
    Estimate { minutes: f64 },
}

impl Step {
    /// The panel edit for this step, or `None` for display-only steps.
    fn edit(&self) -> Option<Edit> {
        match self {
            Self::Slide {
                parameter,
                position,
            } => Some(Edit::Slide {
                parameter: *parameter,
                position: *position,
            }),
            Self::Type { parameter, text } => Some(Edit::Type {
                parameter: *parameter,
                text: text.clone(),
            }),
            Self::Select { tab } => Some(Edit::Select { tab: *tab }),
            Self::Go => Some(Edit::Go),
            Self::Estimate { .. } => None,
        }
    }
}

/// A notification observed during replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct Notification {
    /// Zero-based index of the script step that caused it.
    step: usize,
    /// Event identity.
    event: ChangeEvent,
    /// Action command name of the event.
    command: &'static str,
    /// Committed vector when the listener ran.
    parameters: ParameterVector,
}

/// Final state printed after replay.
#[derive(Debug, Serialize)]
struct Report<'a> {
    title: &'a str,
    notifications: &'a [Notification],
    parameters: &'a ParameterVector,
    duration_label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<SettingsMap>,
}

/// Install a stderr fmt subscriber filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

/// Read a script from `path`, or stdin for `-`.
fn read_script(path: &Path) -> Result<Vec<Step>, String> {
    let text = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())
            .map_err(|e| format!("Error reading script from stdin: {e}"))?
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?
    };
    parse_script(&text)
}

fn parse_script(text: &str) -> Result<Vec<Step>, String> {
    serde_json::from_str(text).map_err(|e| format!("Error parsing script: {e}"))
}

fn parse_settings(json: &str) -> Result<SettingsMap, String> {
    serde_json::from_str(json).map_err(|e| format!("Error parsing --settings-json: {e}"))
}

/// Run `steps` against `panel`, collecting every notification.
///
/// A recording listener is registered for the duration of the replay and
/// removed afterwards.
fn replay(panel: &mut ParameterPanel, steps: &[Step]) -> Vec<Notification> {
    let current_step = Rc::new(RefCell::new(0_usize));
    let recorded = Rc::new(RefCell::new(Vec::new()));

    let recorder: Rc<dyn crownmask_params::ChangeListener> = {
        let current_step = Rc::clone(&current_step);
        let recorded = Rc::clone(&recorded);
        Rc::new(move |event: ChangeEvent, ctx: &mut ListenerContext<'_>| {
            recorded.borrow_mut().push(Notification {
                step: *current_step.borrow(),
                event,
                command: event.command(),
                parameters: *ctx.parameters(),
            });
        })
    };
    panel.add_listener(Rc::clone(&recorder));

    for (index, step) in steps.iter().enumerate() {
        *current_step.borrow_mut() = index;
        debug!(index, ?step, "replaying step");
        match step.edit() {
            Some(edit) => panel.apply(edit),
            None => {
                if let Step::Estimate { minutes } = step {
                    panel.set_duration_estimate(*minutes);
                }
            }
        }
    }

    panel.remove_listener(&recorder);
    recorded.take()
}

fn format_vector(vector: &ParameterVector) -> String {
    vector
        .iter()
        .map(|(parameter, value)| format!("{parameter}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let steps = match cli.script.as_deref().map(read_script).transpose() {
        Ok(steps) => steps.unwrap_or_default(),
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let mut panel = ParameterPanel::with_standard_defaults(cli.title.as_str());

    if let Some(ref json) = cli.settings_json {
        let settings = match parse_settings(json) {
            Ok(settings) => settings,
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
        };
        if !panel.set_settings(&settings) {
            eprintln!("Settings could not be applied; keeping defaults");
            return ExitCode::FAILURE;
        }
    }

    info!(steps = steps.len(), title = panel.target_title(), "replaying script");
    let notifications = replay(&mut panel, &steps);

    if cli.json {
        let report = Report {
            title: panel.target_title(),
            notifications: &notifications,
            parameters: panel.parameters(),
            duration_label: panel.duration_label(),
            settings: cli.print_settings.then(|| panel.settings()),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("Target image: {}", panel.target_title());
    println!("{}", "=".repeat(60));
    for n in &notifications {
        println!(
            "step {:>3}  {:<40} {}",
            n.step,
            n.command,
            format_vector(&n.parameters)
        );
    }
    if notifications.is_empty() {
        println!("(no notifications)");
    }
    println!("{}", "-".repeat(60));
    println!("Final: {}", format_vector(panel.parameters()));
    println!("{}", panel.duration_label());

    if cli.print_settings {
        match serde_json::to_string_pretty(&panel.settings()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing settings: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
