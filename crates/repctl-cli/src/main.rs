use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use repctl_core::backend::memory::InMemoryBackend;
use repctl_core::backend::reptor::{ReptorSession, SessionConfig};
use repctl_core::config::{parse_base_url, parse_project_url, resolve_api_key};
use repctl_core::findings::project::ProjectTarget;
use repctl_core::summary;

mod args;

use args::{Args, Command, Loader, OutputFormat};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let output = match args.command {
        Command::LoadTemplates {
            api_key,
            dry_run,
            reptor_url,
            input,
        } => {
            let api_key = resolve_api_key(api_key.as_deref(), |name| std::env::var(name).ok())?;
            let base_url = parse_base_url(&reptor_url)?;

            let outcome = if dry_run {
                info!("dry run, templates are not sent to {base_url}");
                repctl_core::load_templates(&input, &mut InMemoryBackend::new())?
            } else {
                let mut session = ReptorSession::new(SessionConfig { base_url, api_key })?;
                repctl_core::load_templates(&input, &mut session)?
            };

            match args.format {
                OutputFormat::Json => serde_json::to_string_pretty(&outcome)?,
                OutputFormat::Text => summary::render_sync_text(&outcome),
            }
        }
        Command::LoadFindings { api_key, loader } => {
            let api_key = resolve_api_key(api_key.as_deref(), |name| std::env::var(name).ok())?;
            let Loader::Scuba {
                project_url,
                report,
                language,
            } = loader;
            let (base_url, project_id) = parse_project_url(&project_url)?;
            info!(project = %project_id, loader = "scuba", "importing findings");

            let target = ProjectTarget {
                project_id,
                language,
            };
            let mut session = ReptorSession::new(SessionConfig { base_url, api_key })?;
            let outcome = repctl_core::import_report(&report, &target, &mut session)?;

            match args.format {
                OutputFormat::Json => serde_json::to_string_pretty(&outcome)?,
                OutputFormat::Text => summary::render_projection_text(&outcome),
            }
        }
    };

    print!("{output}");
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
