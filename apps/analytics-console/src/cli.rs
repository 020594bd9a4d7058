//! Command line arguments

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use view_state::pagination::PER_PAGE_OPTIONS;

#[derive(Parser)]
#[command(
    name = "analytics-console",
    version,
    about = "Automation analytics in the terminal",
    long_about = "Browse the job explorer and savings plans of the automation analytics API.\n\n\
                  Views keep their filters in a namespaced page URL, so any printed URL can be\n\
                  passed back with --url to reopen the same view."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a YAML configuration file.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as YAML and exit.
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show one page of the job explorer.
    JobExplorer(JobExplorerCmd),

    /// List savings plans.
    Plans {
        /// Page URL carrying savings planner filters.
        #[arg(long)]
        url: Option<String>,
    },

    /// Print feature flags.
    Flags,

    /// Delete a savings plan.
    DeletePlan {
        /// Plan id.
        id: String,
    },
}

#[derive(Args)]
pub struct JobExplorerCmd {
    /// Page URL carrying job explorer filters, e.g. "/job-explorer?job-explorer.limit=10".
    #[arg(long)]
    pub url: Option<String>,

    /// Toolbar filter as KEY=VALUE; repeat for several values.
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Page to show.
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub page: Option<i64>,

    /// Items per page.
    #[arg(long, value_parser = parse_per_page)]
    pub per_page: Option<i64>,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn parse_per_page(raw: &str) -> Result<i64, String> {
    let value: i64 = raw.parse().map_err(|e| format!("{e}"))?;
    if PER_PAGE_OPTIONS.contains(&value) {
        Ok(value)
    } else {
        let allowed: Vec<String> = PER_PAGE_OPTIONS.iter().map(ToString::to_string).collect();
        Err(format!("must be one of {}", allowed.join(", ")))
    }
}
