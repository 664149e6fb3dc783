use clap::Parser;
use expense_insights::args::{Args, Command};
use expense_insights::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for testing the program without hitting the Google APIs. When
    // EXPENSE_INSIGHTS_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Google.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.service_account(), init_args.sheet_url())
                .await?
                .print()
        }

        Command::Analytics => commands::analytics(&Config::load(home).await?)
            .await?
            .print(),

        Command::Insights(insights_args) => {
            let config = Config::load(home).await?;
            commands::insights(&config, mode, insights_args.month())
                .await?
                .print()
        }

        Command::Subscriptions => commands::subscriptions(&Config::load(home).await?)
            .await?
            .print(),

        Command::Log(log_args) => {
            let config = Config::load(home).await?;
            commands::log(
                &config,
                mode,
                log_args.amount(),
                log_args.category(),
                log_args.mood(),
            )
            .await?
            .print()
        }

        Command::Forecast => {
            let config = Config::load(home).await?;
            let today = chrono::Local::now().date_naive();
            commands::forecast(&config, mode, today).await?.print()
        }

        Command::Consolidate(consolidate_args) => {
            let config = Config::load(home).await?;
            commands::consolidate(
                &config,
                consolidate_args.input(),
                consolidate_args.output(),
                consolidate_args.append(),
            )
            .await?
            .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
