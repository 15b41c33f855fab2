//! CLI command implementations for seodash.
//!
//! Provides subcommand handlers for:
//! - `seodash serve` (web dashboard)
//! - `seodash status` (one connection probe)
//! - `seodash start <tool> --url <url>` (start one tool)
//! - `seodash console` (interactive command prompt)
//! - `seodash export` (write the session log to a file)
//! - `seodash config show|init|set|reset`

use std::cell::Cell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::activity::{LogEntry, LogKind, LogObserver};
use crate::app::Dashboard;
use crate::backend::ToolKind;
use crate::config::{self, DashConfig};
use crate::dispatch::Outcome;
use crate::web;

/// Longest the console waits for input before running due timers.
const CONSOLE_TICK: Duration = Duration::from_millis(200);

// ---------------------------------------------------------------------------
// Log printing
// ---------------------------------------------------------------------------

/// Prints activity entries to stdout as they arrive.
#[derive(Default)]
struct TerminalLog {
    last_printed: Cell<i64>,
}

impl LogObserver for TerminalLog {
    fn refresh(&self, entries: &VecDeque<LogEntry>) {
        let last = self.last_printed.get();
        for entry in entries.iter().rev().filter(|e| e.id > last) {
            println!("{}", colorize_entry(entry));
            self.last_printed.set(entry.id);
        }
    }
}

fn colorize_entry(entry: &LogEntry) -> String {
    let stamp = format!("[{}]", entry.timestamp).dimmed();
    let label = entry.kind.label();
    let label = match entry.kind {
        LogKind::System => label.purple(),
        LogKind::Info => label.blue(),
        LogKind::Success => label.green(),
        LogKind::Warning => label.yellow(),
        LogKind::Error => label.red(),
        LogKind::Security => label.cyan(),
        LogKind::Tool => label.normal(),
    };
    format!("{stamp} {}: {}", label.bold(), entry.message)
}

fn session(config: &DashConfig) -> Dashboard {
    let mut dashboard = Dashboard::from_config(config);
    dashboard.set_log_observer(Box::new(TerminalLog::default()));
    dashboard
}

// ---------------------------------------------------------------------------
// seodash serve
// ---------------------------------------------------------------------------

pub fn run_serve(addr: Option<String>, no_open: bool) -> Result<()> {
    let config = config::load();
    let addr = addr.unwrap_or_else(|| config.dashboard.addr.clone());
    let mut dashboard = Dashboard::from_config(&config);
    web::serve(&mut dashboard, &addr, config.dashboard.open_browser && !no_open)
}

// ---------------------------------------------------------------------------
// seodash status
// ---------------------------------------------------------------------------

pub fn run_status() -> Result<()> {
    let config = config::load();
    let mut dashboard = Dashboard::from_config(&config);
    let connected = dashboard.poll_connection();

    println!("{}", "seodash Backend Status".bold().cyan());
    println!("{}", "=".repeat(50));
    println!("  {} {}", "Mode:    ".bold(), dashboard.mode().label());
    match dashboard.mode() {
        crate::backend::TransportMode::Direct => {
            println!("  {} {}", "Backend: ".bold(), config.backend.base_url);
        }
        crate::backend::TransportMode::Proxy => {
            println!("  {} {}", "Relay:   ".bold(), config.proxy.relay_url);
        }
    }
    let label = dashboard.connection().label();
    let label = if connected { label.green() } else { label.red() };
    println!("  {} {}", "Status:  ".bold(), label);
    if let Some(entry) = dashboard.log().latest() {
        println!("  {} {}", "Detail:  ".bold(), entry.message);
    }

    let tools = &dashboard.connection().backend_tools;
    if !tools.is_empty() {
        println!();
        println!("{}", "Backend Tools".bold().cyan());
        for tool in tools {
            println!("  {:<28} {}", tool.name, tool.status.dimmed());
        }
    }

    println!();
    println!("{}", "Tools".bold().cyan());
    let snapshot = dashboard.snapshot();
    for card in &snapshot.tools {
        let mark = if card.available {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {} {:<20} {}",
            mark,
            card.descriptor.display_name,
            card.descriptor.endpoint.dimmed()
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// seodash start
// ---------------------------------------------------------------------------

pub fn run_start(tool: &str, url: &str) -> Result<()> {
    let config = config::load();
    let mut dashboard = session(&config);
    dashboard.start();

    let result = dashboard.start_tool(tool, url);
    println!();
    match result.outcome {
        Outcome::Success => println!("{} {}", "✓".green().bold(), "Tool started".bold()),
        Outcome::Warning => println!("{} {}", "!".yellow().bold(), "Tool started with warnings".bold()),
        Outcome::Failure => println!("{} {}", "✗".red().bold(), "Tool did not start".bold()),
    }
    if let Some(message) = &result.message {
        println!("  {} {}", "Message:".bold(), message);
    }
    if let Some(payload) = &result.payload {
        let pretty = serde_json::to_string_pretty(payload).context("failed to render payload")?;
        println!("  {}", "Data:".bold());
        for line in pretty.lines() {
            println!("    {}", line.dimmed());
        }
    }

    if !result.outcome.is_started() {
        anyhow::bail!("{}", result.message.unwrap_or_else(|| "start failed".to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// seodash console
// ---------------------------------------------------------------------------

/// Interactive prompt over the command surface. Timers keep running between
/// lines of input. `quit` or end of input leaves.
pub fn run_console() -> Result<()> {
    let config = config::load();
    let mut dashboard = session(&config);

    println!("{}", "seodash console".bold().cyan());
    println!(
        "  {}",
        "Type `help` for commands, `quit` to leave.".dimmed()
    );
    println!();

    dashboard.start();

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    prompt()?;
    loop {
        match rx.recv_timeout(CONSOLE_TICK) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
                    break;
                }
                dashboard.run_command(trimmed);
                prompt()?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        dashboard.tick();
    }

    dashboard.stop();
    Ok(())
}

fn prompt() -> Result<()> {
    print!("{} ", ">".cyan().bold());
    io::stdout().flush().context("failed to flush stdout")
}

// ---------------------------------------------------------------------------
// seodash export
// ---------------------------------------------------------------------------

/// Probe once and write the resulting session log.
pub fn run_export(dir: Option<String>) -> Result<()> {
    let mut config = config::load();
    if let Some(dir) = dir {
        config.log.export_dir = dir;
    }
    let mut dashboard = Dashboard::from_config(&config);
    dashboard.start();

    match dashboard.export_logs_to_disk() {
        Some(path) => {
            println!(
                "{} Logs exported to {}",
                "✓".green().bold(),
                path.display()
            );
            Ok(())
        }
        None => {
            let reason = dashboard
                .log()
                .latest()
                .map(|e| e.message.clone())
                .unwrap_or_default();
            anyhow::bail!("export failed: {reason}")
        }
    }
}

// ---------------------------------------------------------------------------
// seodash tools
// ---------------------------------------------------------------------------

/// List the known tools and how each one is reached.
pub fn run_tools() -> Result<()> {
    println!("{}", "seodash Tools".bold().cyan());
    println!(
        "  {:<10} {:<20} {:<40} Proxy method",
        "Key", "Name", "Endpoint"
    );
    println!("  {}", "-".repeat(90));
    for tool in ToolKind::ALL {
        let method = tool
            .proxy_capability()
            .map(|c| c.method_name().normal())
            .unwrap_or_else(|| "(direct only)".dimmed());
        println!(
            "  {:<10} {:<20} {:<40} {}",
            tool.key(),
            tool.display_name(),
            tool.endpoint(),
            method
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// seodash config show | init | set | reset
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective seodash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.seodash/config.toml", global_exists);
    print_source(".seodash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "SEODASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Write a default config file at `~/.seodash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
