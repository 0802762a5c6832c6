//! Colorful console output for solver events.
//!
//! Provides a custom `tracing` layer that formats the solver's structured
//! events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solving/phase start/end)
//! - **DEBUG**: New best scores and stuck local search steps
//! - **TRACE**: Individual steps
//!
//! Set `RUST_LOG` to override the default `info` filter, e.g.
//! `RUST_LOG=plansmith_solver=debug`.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event targets the layer prints.
const TARGETS: [&str; 2] = ["plansmith_solver", "plansmith::"];

/// Initializes the solver console output.
///
/// Safe to call multiple times - only the first call has effect. Does
/// nothing beyond the banner when another global subscriber is set.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ___ _              ___       _ _   _
| _ \ |__ _ _ _  __/ __|_ __ (_) |_| |_
|  _/ / _` | ' \(_-<__ \ '  \| |  _| ' \
|_| |_\__,_|_||_/__/___/_|_|_|_|\__|_||_|
"#;

    let version_line = format!("            v{} - Constraint Planning Engine\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !TARGETS.iter().any(|t| metadata.target().starts_with(t)) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    move_type: Option<String>,
    message: Option<String>,
    score: Option<String>,
    best_score: Option<String>,
    phase_index: Option<u64>,
    steps: Option<u64>,
    step: Option<u64>,
    speed: Option<u64>,
    moves_evaluated: Option<u64>,
    candidates: Option<u64>,
    duration_ms: Option<u64>,
    entity_count: Option<u64>,
    value_count: Option<u64>,
    variable_count: Option<u64>,
    constraint_count: Option<u64>,
    move_threads: Option<u64>,
    accepted: Option<bool>,
    feasible: Option<bool>,
    terminated_early: Option<bool>,
}

impl EventVisitor {
    fn set_str(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "phase" => self.phase = Some(value),
            "move_type" => self.move_type = Some(value),
            "message" => self.message = Some(value),
            "score" => self.score = Some(value),
            "best_score" => self.best_score = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_str(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_str(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "phase_index" => self.phase_index = Some(value),
            "steps" => self.steps = Some(value),
            "step" => self.step = Some(value),
            "speed" => self.speed = Some(value),
            "moves_evaluated" => self.moves_evaluated = Some(value),
            "candidates" => self.candidates = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "entity_count" => self.entity_count = Some(value),
            "value_count" => self.value_count = Some(value),
            "variable_count" => self.variable_count = Some(value),
            "constraint_count" => self.constraint_count = Some(value),
            "move_threads" => self.move_threads = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "accepted" => self.accepted = Some(value),
            "feasible" => self.feasible = Some(value),
            "terminated_early" => self.terminated_early = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "new_best" => format_new_best(v),
        "stuck" => format_stuck(v),
        "step" => format_step(v, level),
        "score_corruption" => format_corruption(v),
        "no_termination" => format_warning(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let entities = v.entity_count.unwrap_or(0);
    let values = v.value_count.unwrap_or(0);
    let variables = v.variable_count.unwrap_or(entities);
    let scale = calculate_problem_scale(variables as usize, values as usize);

    let mut output = format!(
        "{} {} Solving │ {} entities │ {} values │ scale {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        entities.to_formatted_string(&Locale::en).bright_yellow(),
        values.to_formatted_string(&Locale::en).bright_yellow(),
        scale.bright_magenta()
    );

    if let Some(constraints) = v.constraint_count.filter(|&c| c > 0) {
        output.push_str(&format!(
            " │ {} constraints",
            constraints.to_formatted_string(&Locale::en).bright_yellow()
        ));
    }
    if let Some(threads) = v.move_threads.filter(|&t| t > 1) {
        output.push_str(&format!(" │ {} move threads", threads.bright_yellow()));
    }
    if let Some(score) = v.score.as_deref() {
        output.push_str(&format!(" │ initial {}", format_score(score)));
    }

    output
}

fn format_solve_end(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let is_feasible = v.feasible.unwrap_or_else(|| !score.starts_with('-'));

    let status = if is_feasible {
        "FEASIBLE".bright_green().bold().to_string()
    } else {
        "INFEASIBLE".bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_score(score),
        status
    );
    if v.terminated_early == Some(true) {
        output.push_str(&format!(" │ {}", "cancelled".yellow()));
    }

    let inner_width: usize = 58;
    let border = "═".repeat(inner_width);
    output.push_str("\n\n");
    output.push_str(&format!("╔{}╗", border).bright_cyan().to_string());
    output.push('\n');

    let status_text = if is_feasible {
        "FEASIBLE SOLUTION FOUND"
    } else {
        "INFEASIBLE (hard constraints violated)"
    };
    let total_pad = inner_width.saturating_sub(status_text.len());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    let status_colored = if is_feasible {
        status_text.bright_green().bold().to_string()
    } else {
        status_text.bright_red().bold().to_string()
    };
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');
    output.push_str(&format!("╠{}╣", border).bright_cyan().to_string());
    output.push('\n');

    let rows = [
        ("Final Score:", score.to_string()),
        (
            "Steps:",
            v.steps.unwrap_or(0).to_formatted_string(&Locale::en),
        ),
        (
            "Moves evaluated:",
            v.moves_evaluated
                .unwrap_or(0)
                .to_formatted_string(&Locale::en),
        ),
        ("Time spent:", format_duration_ms(v.duration_ms.unwrap_or(0))),
    ];
    for (label, value) in rows {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }

    output.push_str(&format!("╚{}╝", border).bright_cyan().to_string());
    output.push('\n');

    output
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");

    format!(
        "{} {} {} #{} started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold(),
        v.phase_index.unwrap_or(0)
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let steps = v.steps.unwrap_or(0);
    let speed = v.speed.unwrap_or(0);
    let duration = v.duration_ms.unwrap_or(0);

    let mut output = format!(
        "{} {} {} ended │ {} │ {} steps │ {} moves/s",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        format_duration_ms(duration).yellow(),
        steps.to_formatted_string(&Locale::en).white(),
        speed.to_formatted_string(&Locale::en).bright_magenta().bold(),
    );

    if let Some(score) = v.score.as_deref() {
        output.push_str(&format!(" │ {}", format_score(score)));
    }
    if let Some(best) = v.best_score.as_deref() {
        output.push_str(&format!(" │ best {}", format_score(best)));
    }

    output
}

fn format_new_best(v: &EventVisitor) -> String {
    format!(
        "{} {} New best │ step {} │ {}",
        format_elapsed(),
        "★".bright_yellow(),
        v.steps.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_stuck(v: &EventVisitor) -> String {
    format!(
        "{} {} No move accepted among {} candidates │ {}",
        format_elapsed(),
        "⊘".yellow(),
        v.candidates.unwrap_or(0).to_formatted_string(&Locale::en),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_step(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    let step = v.step.unwrap_or(0);
    let score = v.score.as_deref().unwrap_or("N/A");
    let icon = if v.accepted.unwrap_or(false) {
        "✓".bright_green().to_string()
    } else {
        "✗".bright_red().to_string()
    };

    format!(
        "{} {} Step {:>10} │ {:<10} │ {}",
        format_elapsed(),
        icon,
        step.to_formatted_string(&Locale::en).bright_black(),
        v.move_type
            .as_deref()
            .or(v.phase.as_deref())
            .unwrap_or("-")
            .bright_black(),
        format_score(score)
    )
}

fn format_corruption(v: &EventVisitor) -> String {
    format!(
        "{} {} {}",
        format_elapsed(),
        "✗ Score corruption".bright_red().bold(),
        v.message.as_deref().unwrap_or("")
    )
}

fn format_warning(v: &EventVisitor) -> String {
    format!(
        "{} {} {}",
        format_elapsed(),
        "!".yellow().bold(),
        v.message.as_deref().unwrap_or("").yellow()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Colors each level of a `"{hard}hard/{soft}soft"` score by sign.
fn format_score(score: &str) -> String {
    let Some((hard, soft)) = score.split_once('/') else {
        return score.white().to_string();
    };
    let hard = hard.trim_end_matches("hard");
    let soft = soft.trim_end_matches("soft");
    let (Ok(hard_num), Ok(soft_num)) = (hard.parse::<i64>(), soft.parse::<i64>()) else {
        return score.white().to_string();
    };

    let hard_str = if hard_num < 0 {
        format!("{}hard", hard).bright_red().to_string()
    } else {
        format!("{}hard", hard).bright_green().to_string()
    };
    let soft_str = match soft_num {
        n if n < 0 => format!("{}soft", soft).yellow().to_string(),
        0 => format!("{}soft", soft).white().to_string(),
        _ => format!("{}soft", soft).bright_green().to_string(),
    };
    format!("{}/{}", hard_str, soft_str)
}

/// Size of the search space as `m x 10^e`: values raised to the number
/// of variables.
fn calculate_problem_scale(variable_count: usize, value_count: usize) -> String {
    if variable_count == 0 || value_count == 0 {
        return "0".to_string();
    }

    let log_scale = (variable_count as f64) * (value_count as f64).log10();
    let exponent = log_scale.floor() as i32;
    let mantissa = 10f64.powf(log_scale - exponent as f64);

    format!("{:.3} x 10^{}", mantissa, exponent)
}
