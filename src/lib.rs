pub mod cli;
pub mod config;
pub mod desk;
pub mod errors;
pub mod filter;
pub mod models;
pub mod render;
pub mod seed;
pub mod shell;
pub mod state;
pub mod store;

use crate::cli::{Cli, DeskCommand};
use crate::config::DeskSettings;
use crate::desk::DeskCore;
use crate::errors::{AppError, AppResult};
use crate::models::CommentOutcomeKind;
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

const SHELL_PROMPT: &str = "permit-desk> ";

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn execute<W: Write>(desk: &mut DeskCore, command: &DeskCommand, out: &mut W) -> AppResult<()> {
    match command {
        DeskCommand::List { search, tab, json } => {
            desk.switch_tab(tab)?;
            let response = desk.search(search);
            if *json {
                write_json(out, &response)?;
            } else {
                let renderer = desk.renderer();
                writeln!(out, "{}", renderer.tab_bar(&response.tabs, &response.active_tab))?;
                let records = response.records.iter().collect::<Vec<_>>();
                write!(out, "{}", renderer.list(&records))?;
            }
        }
        DeskCommand::Show { id, json } => {
            let record = desk.show(id)?;
            if *json {
                write_json(out, &record)?;
            } else {
                write!(out, "{}", desk.renderer().card(&record))?;
            }
        }
        DeskCommand::Comment { id, text, json } => {
            let response = desk.comment(id, text);
            if *json {
                write_json(out, &response)?;
            } else if response.outcome == CommentOutcomeKind::Appended {
                if let Some(record) = &response.record {
                    write!(out, "{}", desk.renderer().card(record))?;
                }
            }
        }
        DeskCommand::Shell => {
            return Err(AppError::Invalid("shell is interactive and cannot run as a one-shot command".to_string()));
        }
    }
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = DeskSettings::load(cli.config.as_deref()).map_err(to_client_error)?;
    if cli.no_color {
        settings.color = false;
    }
    init_tracing(&settings.resolved_log_dir(), &settings.log_level)
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let mut desk = DeskCore::new(&settings);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(DeskCommand::Shell) {
        DeskCommand::Shell => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start runtime")?;
            writeln!(out, "{}", shell::HELP_TEXT)?;
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            runtime
                .block_on(shell::run_shell(&mut desk, input, &mut out, Some(SHELL_PROMPT)))
                .map_err(to_client_error)?;
        }
        command => execute(&mut desk, &command, &mut out).map_err(to_client_error)?,
    }
    Ok(())
}

fn init_tracing(log_dir: &Path, default_level: &str) -> Result<(), String> {
    std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "desk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}

fn to_client_error(error: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!(error.to_string())
}
