use std::io;
use std::process::ExitCode;

use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commute_finder::cache::ResponseCache;
use commute_finder::config::AppConfig;
use commute_finder::error::AppError;
use commute_finder::pipeline::Pipeline;
use commute_finder::report;
use commute_finder::sources::DatasetClient;

/// Log to stderr so stdout only carries the report.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("commute_finder=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Variables from a `.env` file feed the environment overrides.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "ignoring unreadable environment file"),
    }
}

async fn run() -> Result<String, AppError> {
    load_dotenv();
    let config = AppConfig::load()?;
    info!(cache_dir = %config.cache_dir.display(), "starting");

    let cache = ResponseCache::new(&config.cache_dir);
    let client = DatasetClient::new(config.dataset, cache)?;

    let stations = Pipeline::new(&client, &config.pipeline).run().await?;

    Ok(report::render(&stations))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(report) => {
            println!();
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("commute-finder: {e}");
            ExitCode::FAILURE
        }
    }
}
