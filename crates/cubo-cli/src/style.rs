//! Visual styling utilities for the CLI.
//!
//! Status markers, alert coloring, trend arrows and table styles shared by
//! every command's text output.

use owo_colors::OwoColorize;

use crate::cli::StyleMode;

/// Placeholder for an indicator that could not be computed.
pub const MISSING: &str = "—";

// ============================================================================
// Colored Value Formatting
// ============================================================================

/// Format an indicator value, red when it tripped an alert and green otherwise.
pub fn format_value_colored(text: &str, alerting: bool, no_color: bool) -> String {
    if no_color || text == MISSING {
        return text.to_string();
    }

    if alerting {
        format!("{}", text.red())
    } else {
        format!("{}", text.green())
    }
}

// ============================================================================
// Status Messages
// ============================================================================

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

/// Format an alert line: bold title followed by its detail.
pub fn format_alert(title: &str, detail: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}: {}", title, detail)
    } else {
        format!("{} {}: {}", "[!!]".red(), title.bold(), detail)
    }
}

// ============================================================================
// Trend Indicators
// ============================================================================

/// Get trend indicator comparing current and previous values.
///
/// Changes smaller than `tolerance` are shown as flat.
pub fn trend_indicator(current: f64, previous: f64, tolerance: f64, no_color: bool) -> &'static str {
    let diff = current - previous;
    if diff.abs() < tolerance {
        "-"
    } else if diff > 0.0 {
        if no_color { "^" } else { "↑" }
    } else if no_color {
        "v"
    } else {
        "↓"
    }
}

// ============================================================================
// Section Headers
// ============================================================================

/// Format a title header.
pub fn format_title(title: &str, no_color: bool) -> String {
    let underline = "━".repeat(title.chars().count());
    if no_color {
        format!("{}\n{}", title, underline)
    } else {
        format!("{}\n{}", title.bold(), underline.dimmed())
    }
}

/// Get terminal width, defaulting to 80 if detection fails.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Apply table style based on StyleMode.
pub fn apply_table_style(table: &mut tabled::Table, style: StyleMode) {
    use tabled::settings::Style;
    match style {
        StyleMode::Rich => {
            table.with(Style::rounded());
        }
        StyleMode::Minimal => {
            table.with(Style::psql());
        }
        StyleMode::Plain => {
            table.with(Style::blank());
        }
    }
}
