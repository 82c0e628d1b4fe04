use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dsa_lib::StyleKind;

#[derive(Parser, Debug)]
#[command(
    name = "dsa",
    version,
    about = "Design Style Auditor: find layers not bound to named styles"
)]
pub struct Cli {
    /// Optional TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the selection (or the current page) for unbound styles
    Scan {
        /// Document snapshot (.json, .yaml, .yml)
        #[arg(long)]
        document: PathBuf,

        /// Comma-separated layer ids to select before scanning
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit with code 1 when any critical reason is found
        #[arg(long)]
        fail_on_critical: bool,
    },

    /// Bind layer properties to catalog styles
    Apply {
        #[arg(long)]
        document: PathBuf,

        /// JSON file with a list of {nodeId, kind, styleId} actions
        #[arg(long, conflicts_with = "node", required_unless_present = "node")]
        actions: Option<PathBuf>,

        #[arg(long, requires_all = ["kind", "style"])]
        node: Option<String>,

        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        #[arg(long)]
        style: Option<String>,

        /// Save the updated document here
        #[arg(long)]
        write: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// JSON-lines session on stdin/stdout
    Serve {
        #[arg(long)]
        document: PathBuf,

        /// Save the updated document here when the session ends
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Pretty,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Text,
    Fill,
    Stroke,
}

impl From<KindArg> for StyleKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Text => StyleKind::Text,
            KindArg::Fill => StyleKind::Fill,
            KindArg::Stroke => StyleKind::Stroke,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
