use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "usheader",
    version,
    about = "Generate userscript metadata headers from bundled scripts"
)]
pub struct Args {
    /// Path to the bundled script
    pub artifact: PathBuf,

    /// Project manifest providing name, version, repository, etc.
    #[arg(long, default_value = "package.json")]
    pub manifest: PathBuf,

    /// JSON options file of the form { "meta": { ... } }
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Header field override; VALUE is parsed as JSON when possible.
    /// Applied after --options, later pairs win.
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    pub meta: Vec<String>,

    /// Output format
    #[arg(long, default_value = "script")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long, conflicts_with = "in_place")]
    pub out: Option<PathBuf>,

    /// Rewrite the artifact with its header prepended
    #[arg(long)]
    pub in_place: bool,

    /// Log filter (tracing EnvFilter syntax); logs go to stderr
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Optional git commit hash for tool metadata
    #[arg(long)]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Artifact with the header prepended
    Script,
    /// Header block only
    Header,
    /// Inspection report
    Json,
}
