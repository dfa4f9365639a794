mod commands;
mod manifest;
mod patient;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use commands::CommandContext;
use omicia_cli_api::{ApiClient, ApiError};
use omicia_cli_auth::Credentials;
use omicia_cli_config::Config;
use omicia_cli_output::OutputRenderer;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "omicia-cli", version, about = "Omicia clinical reporting CLI", long_about = None)]
struct Cli {
    /// Path to config file (defaults to ~/.omicia-cli/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: OmiciaCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum OmiciaCommand {
    /// Launch a panel trio report with no genomes
    CreateReport(commands::reports::CreateReportArgs),
    /// Get a clinical report's variants
    Variants(commands::variants::VariantsArgs),
    /// Add an internal note to a clinical report variant
    AddNote(commands::notes::AddNoteArgs),
    /// Fill patient info fields of an existing clinical report
    SetFields(commands::fields::SetFieldsArgs),
    /// Set a clinical report's status
    SetStatus(commands::status::SetStatusArgs),
    /// Show the assay types of the API user's workspace
    AssayTypes(commands::assay_types::AssayTypesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let result = run(cli).await;
    if let Some(hint) = result.as_ref().err().and_then(suggestion) {
        eprintln!("Hint: {hint}");
    }
    result
}

async fn run(cli: Cli) -> Result<()> {

    let config = Config::load(cli.config.as_ref())?;
    let credentials = Credentials::from_env(config.api_url())?;
    tracing::debug!(login = %credentials.login, base_url = %credentials.base_url, "Loaded credentials");

    let client = build_client(&credentials)?;
    let renderer = OutputRenderer::new();
    let ctx = CommandContext {
        client,
        renderer: &renderer,
    };

    match cli.command {
        OmiciaCommand::CreateReport(args) => commands::reports::execute(args, &ctx).await?,
        OmiciaCommand::Variants(args) => commands::variants::execute(args, &ctx).await?,
        OmiciaCommand::AddNote(args) => commands::notes::execute(args, &ctx).await?,
        OmiciaCommand::SetFields(args) => commands::fields::execute(args, &ctx).await?,
        OmiciaCommand::SetStatus(args) => commands::status::execute(args, &ctx).await?,
        OmiciaCommand::AssayTypes(args) => commands::assay_types::execute(args, &ctx).await?,
    }

    Ok(())
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,omicia_cli=debug,omicia_cli_api=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries response bodies, including raw exports
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}

/// Recovery hint for the first API error in the chain, if it has one.
fn suggestion(err: &anyhow::Error) -> Option<&str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>())
        .and_then(ApiError::suggestion)
}

fn build_client(credentials: &Credentials) -> Result<ApiClient> {
    let client = ApiClient::new(&credentials.base_url)
        .with_context(|| format!("Invalid API URL '{}'", credentials.base_url))?;
    Ok(client.with_basic_auth(credentials.login.clone(), credentials.password.clone()))
}
