pub mod args;
mod server;
mod setup;

pub use args::AppArgs;

use crate::logging;
use crate::ui::run_dashboard;
use anyhow::Result;
use args::Command;

pub async fn launch() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    launch_with_args(AppArgs::from_cli()).await
}

pub async fn launch_with_args(args: AppArgs) -> Result<()> {
    match args.command {
        Command::Serve(serve) => {
            let config = setup::server_config(&serve, setup::process_env)?;
            logging::init_console_logging();
            setup::print_start_banner(&config);
            server::run(config).await
        }
        Command::Dashboard(dashboard) => {
            let options = setup::dashboard_options(&dashboard, setup::process_env);
            run_dashboard(options).await
        }
    }
}
