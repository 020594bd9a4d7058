//! Analytics console binary.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use analytics_console::commands::{self, JobExplorerArgs};
use analytics_console::{ConsoleConfig, logging};
use analytics_sdk::AnalyticsClient;
use anyhow::Context;
use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ConsoleConfig::load_layered(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.verbose);

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(ExitCode::SUCCESS);
    }

    logging::init(&config.logging);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    let client = Arc::new(
        AnalyticsClient::from_config(&config.client_config(), config.auth_gate())
            .context("Failed to create analytics client")?,
    );

    let output = match command {
        Command::JobExplorer(cmd) => {
            let args = JobExplorerArgs {
                url: cmd.url,
                filters: cmd.filters,
                page: cmd.page,
                per_page: cmd.per_page,
            };
            commands::job_explorer(&config, &client, &args).await
        }
        Command::Plans { url } => commands::plans(&config, &client, url.as_deref()).await,
        Command::Flags => commands::flags(&client).await,
        Command::DeletePlan { id } => commands::delete_plan(&client, &id).await,
    };

    print!("{}", output.text);
    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
