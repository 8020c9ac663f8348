//! fastly - Fastly service configuration CLI

mod api;
mod cli;
mod commands;
mod config;
mod context;
mod error;
mod logger;
mod optional;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use error::FastlyError;
use output::{ErrorReport, Output};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let out = Output::new(cli.json, cli.verbose);

    // If no command provided, show help
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            eprintln!("Error: no command provided. Use --help for usage.");
            std::process::exit(1);
        }
    };

    let op = command.name();
    let result = run(command, cli.token.as_deref(), cli.endpoint.as_deref(), &out).await;

    if let Err(e) = result {
        let report = match e.downcast_ref::<FastlyError>() {
            Some(err) => ErrorReport::from_error(err),
            None => ErrorReport::sys("INTERNAL", &format!("{:#}", e)),
        };
        out.error(report.with_op(op));
    }
}

async fn run(
    command: Commands,
    token: Option<&str>,
    endpoint: Option<&str>,
    out: &Output,
) -> anyhow::Result<()> {
    config::load_env()?;

    let (endpoint, source) =
        config::resolve_endpoint(endpoint, config::env_var(config::ENV_ENDPOINT));
    tracing::debug!(%endpoint, %source, "using API endpoint");

    let token = config::api_token(token)?;
    let client = api::FastlyClient::new(&endpoint, &token)?;

    match command {
        Commands::Service(cmd) => commands::service::run(cmd, &client, out).await,
        Commands::ServiceVersion(cmd) => commands::version::run(cmd, &client, out).await,
        Commands::Acl(cmd) => commands::acl::run(cmd, &client, out).await,
        Commands::AclEntry(cmd) => commands::acl_entry::run(cmd, &client, out).await,
        Commands::Dictionary(cmd) => commands::dictionary::run(cmd, &client, out).await,
        Commands::DictionaryEntry(cmd) => commands::dictionary_entry::run(cmd, &client, out).await,
    }
}
