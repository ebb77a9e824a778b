use crate::desk::DeskCore;
use crate::errors::{AppError, AppResult};
use crate::models::{CommentOutcomeKind, CommentResponse, ListResponse};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

static COMMAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\S+)(?:\s+(.*?))?\s*$").expect("valid command regex"));
static ARG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:"([^"]*)"|(\S+))(?:\s+(.*))?$"#).expect("valid argument regex"));

pub const HELP_TEXT: &str = "\
commands:
  list                     show the visible applications
  tabs                     show the tab bar with counts
  search [text]            set the search text (empty clears it)
  tab <all|status|0-3>     switch the status tab
  open <id>                open an application in the detail view
  close                    close the detail view
  draft <id> <text>        type into an application's comment box
  submit [id]              submit the comment box (defaults to the open application)
  comment <id> <text>      add a comment in one step
  help                     show this help
  quit                     leave the desk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    List,
    Tabs,
    Search(String),
    Tab(String),
    Open(String),
    Close,
    Draft { record_id: String, text: String },
    Submit(Option<String>),
    Comment { record_id: String, text: String },
}

fn split_arg(rest: &str) -> Option<(String, String)> {
    let caps = ARG_RE.captures(rest)?;
    let head = caps.get(1).or_else(|| caps.get(2))?.as_str().to_string();
    let tail = caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default();
    Some((head, tail))
}

fn unquote(text: &str) -> String {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
        .to_string()
}

pub fn parse_line(line: &str) -> AppResult<Option<ShellCommand>> {
    let Some(caps) = COMMAND_RE.captures(line) else {
        return Ok(None);
    };
    let verb = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    let require_id = |usage: &str| -> AppResult<(String, String)> {
        split_arg(rest).ok_or_else(|| AppError::Invalid(format!("usage: {}", usage)))
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        "list" | "ls" => ShellCommand::List,
        "tabs" => ShellCommand::Tabs,
        "search" => ShellCommand::Search(unquote(rest)),
        "tab" => {
            let (tab, _) = require_id("tab <all|status|0-3>")?;
            ShellCommand::Tab(tab)
        }
        "open" => {
            let (record_id, _) = require_id("open <id>")?;
            ShellCommand::Open(record_id)
        }
        "close" => ShellCommand::Close,
        "draft" => {
            let (record_id, text) = require_id("draft <id> <text>")?;
            ShellCommand::Draft {
                record_id,
                text: unquote(&text),
            }
        }
        "submit" => ShellCommand::Submit(split_arg(rest).map(|(record_id, _)| record_id)),
        "comment" => {
            let (record_id, text) = require_id("comment <id> <text>")?;
            ShellCommand::Comment {
                record_id,
                text: unquote(&text),
            }
        }
        other => return Err(AppError::Invalid(format!("unknown command: {} (try help)", other))),
    };
    Ok(Some(command))
}

fn write_list<W: Write>(desk: &DeskCore, out: &mut W, response: &ListResponse) -> AppResult<()> {
    let renderer = desk.renderer();
    writeln!(out, "{}", renderer.tab_bar(&response.tabs, &response.active_tab))?;
    if !response.search_text.is_empty() {
        writeln!(out, "検索: {}", response.search_text)?;
    }
    let records = response.records.iter().collect::<Vec<_>>();
    write!(out, "{}", renderer.list(&records))?;
    Ok(())
}

fn write_comment<W: Write>(desk: &DeskCore, out: &mut W, response: &CommentResponse) -> AppResult<()> {
    // Rejected and unknown-record submissions are silent.
    if response.outcome != CommentOutcomeKind::Appended {
        return Ok(());
    }
    if let Some(record) = &response.record {
        write!(out, "{}", desk.renderer().card(record))?;
    }
    Ok(())
}

pub fn dispatch<W: Write>(desk: &mut DeskCore, command: ShellCommand, out: &mut W) -> AppResult<bool> {
    match command {
        ShellCommand::Help => writeln!(out, "{}", HELP_TEXT)?,
        ShellCommand::Quit => return Ok(false),
        ShellCommand::List => {
            let response = desk.list();
            write_list(desk, out, &response)?;
        }
        ShellCommand::Tabs => {
            let response = desk.list();
            writeln!(out, "{}", desk.renderer().tab_bar(&response.tabs, &response.active_tab))?;
        }
        ShellCommand::Search(text) => {
            let response = desk.search(&text);
            write_list(desk, out, &response)?;
        }
        ShellCommand::Tab(raw) => {
            let response = desk.switch_tab(&raw)?;
            write_list(desk, out, &response)?;
        }
        ShellCommand::Open(record_id) => {
            let record = desk.open(&record_id)?;
            write!(out, "{}", desk.renderer().card(&record))?;
        }
        ShellCommand::Close => {
            desk.close();
        }
        ShellCommand::Draft { record_id, text } => desk.draft(&record_id, &text)?,
        ShellCommand::Submit(record_id) => {
            let record_id = match record_id {
                Some(record_id) => record_id,
                None => desk
                    .state()
                    .selected()
                    .map(|record| record.id.clone())
                    .ok_or_else(|| AppError::Invalid("no application is open; use submit <id>".to_string()))?,
            };
            let response = desk.submit_draft(&record_id);
            write_comment(desk, out, &response)?;
        }
        ShellCommand::Comment { record_id, text } => {
            let response = desk.comment(&record_id, &text);
            write_comment(desk, out, &response)?;
        }
    }
    Ok(true)
}

pub async fn run_shell<R, W>(desk: &mut DeskCore, input: R, out: &mut W, prompt: Option<&str>) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        if let Some(prompt) = prompt {
            write!(out, "{}", prompt)?;
            out.flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                writeln!(out, "{}", error)?;
                continue;
            }
        };
        match dispatch(desk, command, out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(error) => {
                tracing::warn!(error = %error, "shell command failed");
                writeln!(out, "{}", error)?;
            }
        }
    }
    tracing::info!("shell closed");
    Ok(())
}
