use anyhow::Context;
use clap::Parser;
use qrfeedz::commands::{self, AppCommand, Cli};
use qrfeedz::config::Config;
use qrfeedz::storage;
use std::process::ExitCode;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("qrfeedz", log::LevelFilter::Info)
        .filter_module("sqlx", log::LevelFilter::Error)
        .filter_module("sea_orm", log::LevelFilter::Error)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(command: AppCommand) -> anyhow::Result<()> {
    let config = Config::from_env();
    let db = storage::establish_connection(&config.database_url)
        .await
        .context("cannot open the database")?;

    match command {
        AppCommand::Fresh { test, seeder } => {
            commands::fresh::run(&db, &config, test, seeder.as_deref()).await?
        }
        AppCommand::Migrate => commands::migrate(&db).await?,
        AppCommand::Seed(seed) => commands::seed::run(&db, &config, seed.class()).await?,
    }

    db.close().await?;
    Ok(())
}
