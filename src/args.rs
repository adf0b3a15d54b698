use clap::{Parser, Subcommand};
use clonesmith::RunMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clonesmith")]
#[command(about = "Crawl a web application and generate a React clone of it")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// JSON config file (environment variables override it)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Exit non-zero when any artifact was accepted with violations
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl, extract, generate and write the project
    Run(Overrides),
    /// Crawl and extract only
    Crawl(Overrides),
    /// Generate from a previous extraction
    Regenerate(Overrides),
    /// Check already generated files against the checklist
    Validate(Overrides),
}

/// Per-run overrides applied on top of file and environment configuration
#[derive(clap::Args, Debug, Default)]
pub struct Overrides {
    /// Target application URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Comma separated page paths to visit
    #[arg(short, long, value_delimiter = ',')]
    pub pages: Vec<String>,

    /// Extraction output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Generated project directory
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Corrective re-prompt ceiling
    #[arg(long)]
    pub max_retries: Option<u32>,
}

impl Command {
    pub fn mode(&self) -> RunMode {
        match self {
            Command::Run(_) => RunMode::Full,
            Command::Crawl(_) => RunMode::Crawl,
            Command::Regenerate(_) => RunMode::Regenerate,
            Command::Validate(_) => RunMode::Validate,
        }
    }

    pub fn overrides(&self) -> &Overrides {
        match self {
            Command::Run(o) | Command::Crawl(o) | Command::Regenerate(o) | Command::Validate(o) => o,
        }
    }
}
