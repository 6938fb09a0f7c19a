use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "repctl",
    version,
    about = "Load finding templates and import compliance scan results into SysReptor"
)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Summary output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update finding templates from snippet files
    LoadTemplates {
        /// SysReptor API key, may also be passed as env var REPTOR_KEY
        #[arg(long)]
        api_key: Option<String>,

        /// Validate and assemble templates without contacting the server
        #[arg(long)]
        dry_run: bool,

        /// Base URL of the SysReptor instance, e.g. https://sysreptor.example.com
        reptor_url: String,

        /// Template snippet or directory containing snippets
        input: PathBuf,
    },

    /// Import findings from a scan report into a project
    LoadFindings {
        /// SysReptor API key, may also be passed as env var REPTOR_KEY
        #[arg(long)]
        api_key: Option<String>,

        #[command(subcommand)]
        loader: Loader,
    },
}

#[derive(Debug, Subcommand)]
pub enum Loader {
    /// ScubaGear results (ScubaResults_<id>.json)
    Scuba {
        /// URL of the project on your SysReptor instance
        project_url: String,

        /// ScubaGear results file
        report: PathBuf,

        /// Template language used for created findings
        #[arg(long, default_value = "en-US")]
        language: String,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
