//! wordwar binary entry point.

use std::process::ExitCode;

use tracing::{error, info, warn};
use wordwar::api::{serve_with_state, AppState};
use wordwar::cli::{self, Args};
use wordwar::config::Config;
use wordwar::logging;
use wordwar::security::generate_api_key;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Try 'wordwar --help' for more information.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load(args)?;

    if logging::init_with_filter(config.log_filter()).is_err() {
        eprintln!("warning: logging was already initialized");
    }

    info!("wordwar v{}", env!("CARGO_PKG_VERSION"));

    if config.security.auth.enabled && config.security.auth.api_keys.is_empty() {
        let key = generate_api_key();
        warn!("Authentication enabled without keys; generated API key: {}", key);
        config.security.auth.api_keys.push(key);
    }

    let server_config = config.to_server_config()?;
    let settings = config.war_settings();

    let state = AppState::new(&settings).with_auth(server_config.key_store());

    info!(
        tick_secs = settings.tick.as_secs(),
        max_countdown = settings.limits.max_countdown,
        auth = server_config.auth.enabled,
        "war ticker starting"
    );
    let ticker = state.ticker().spawn(settings.tick);

    let result = serve_with_state(server_config, state).await;

    ticker.stop();
    info!("wordwar stopped");

    result.map_err(Into::into)
}
