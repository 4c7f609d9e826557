mod args;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use sql_admin::prelude::{AdminConsole, Gateway};
use tracing::Level;

use crate::args::{AdminConfig, Args};
use crate::logging::LogWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = AdminConfig::from_args(&args);
    let writer = LogWriter::new(config.log.clone()).unwrap_or_else(|err| {
        eprintln!("failed to open log file: {err}");
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_max_level(if config.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let config_json = serde_json::to_string(&config).unwrap_or_else(|_| "{}".to_string());
    tracing::debug!("config: {}", config_json);

    let gateway = match Gateway::connect(AdminConfig::sqlite_options(&args)).await {
        Ok(gateway) => gateway,
        Err(err) => {
            tracing::error!(error = %err, db = %config.db, "cannot open database");
            return ExitCode::FAILURE;
        }
    };

    let console = AdminConsole::new(gateway);
    let response = console.handle(args.command.into_request()).await;
    match response.to_json_pretty() {
        Ok(text) => println!("{text}"),
        Err(err) => {
            tracing::error!(error = %err, "cannot serialize response");
            return ExitCode::FAILURE;
        }
    }

    if response.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
