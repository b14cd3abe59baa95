use crate::config::parse_metadata_pair;
use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;

#[derive(Parser, Debug, Clone)]
#[command(name = "looplog")]
#[command(about = "A small log-entry service and its terminal dashboard")]
pub struct AppArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP log service.
    Serve(ServeArgs),
    /// Open the terminal dashboard against a running service.
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (default 5001)")]
    pub port: Option<u16>,

    #[arg(long, help = "Address to bind (default 0.0.0.0)")]
    pub host: Option<IpAddr>,

    #[arg(
        long,
        help = "Database path, sled://<path> or memory: (or set LOOPLOG_DATABASE)"
    )]
    pub database: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DashboardArgs {
    #[arg(long, help = "URL of the /api/logs collection (or set LOOPLOG_API_URL)")]
    pub url: Option<String>,

    #[arg(long, help = "Keep the list flat")]
    pub no_grouping: bool,

    #[arg(
        long = "category",
        value_name = "LABEL",
        help = "Category offered in the draft; repeat to build the list"
    )]
    pub categories: Vec<String>,

    #[arg(long, help = "Disable categories entirely", conflicts_with = "categories")]
    pub no_categories: bool,

    #[arg(
        long = "meta",
        value_name = "KEY=VALUE",
        value_parser = parse_metadata_pair,
        help = "Metadata attached to every new entry"
    )]
    pub metadata: Vec<(String, serde_json::Value)>,
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }
}
