use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "permit-desk",
    version,
    about = "Browse and annotate building-permit applications"
)]
pub struct Cli {
    /// YAML settings file (falls back to PERMIT_DESK_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored badges
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<DeskCommand>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum DeskCommand {
    /// List applications visible for a search text and status tab
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// all, 修正依頼中, 申請準備中, 審査中 or a tab index 0-3
        #[arg(long, default_value = "all")]
        tab: String,
        #[arg(long)]
        json: bool,
    },
    /// Show one application with its comment thread
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Add a comment to a freshly seeded desk and print the result
    Comment {
        id: String,
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// Interactive desk (default)
    Shell,
}
