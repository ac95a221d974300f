//! Output formatting utilities for CLI

use console::style;
use ode_core::environment::Environment;

/// Format an environment as `label (name)`
pub fn format_environment(env: &Environment) -> String {
    format!("{} ({})", style(&env.label).green(), style(&env.name).dim())
}

/// Format a poll attempt line
pub fn format_tick(count: u32, status: &str) -> String {
    let status = if status == ode_core::STATUS_NORMAL {
        style(status).green()
    } else {
        style(status).yellow()
    };
    format!("tick {}: {}", count, status)
}

/// Format one row of the environment listing
pub fn format_listing(env: &Environment, current: bool) -> String {
    let marker = if current { "*" } else { " " };
    format!(
        "{} {} [{}] {} {}",
        marker,
        format_environment(env),
        style(&env.id).dim(),
        style(&env.status).yellow(),
        env.vcs_path().unwrap_or("-")
    )
}

/// Format an API failure
pub fn format_api_error(msg: &str) -> String {
    style(format!("Cloud API error: {}", msg)).red().to_string()
}

/// Format an error message
pub fn format_error(msg: &str) -> String {
    style(format!("Error: {}", msg)).red().to_string()
}
