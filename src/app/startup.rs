//! Process startup: arguments, configuration, logging, store, dispatch

use crate::app::cli::{load_config_file, Args, Command, ConfigError, Settings, StoreLocation};
use crate::app::commands::{dispatch, CommandEnv};
use crate::app::error::{AppError, AppResult};
use crate::core::context::CancelToken;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::styles::palette_to_clap;
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::io::BufReader;

/// Exit status after a shutdown signal
pub const EXIT_INTERRUPTED: i32 = 130;

/// Run the application and return the process exit code
pub async fn startup() -> i32 {
    let args = parse_args();

    let settings = match resolve_settings(&args).await {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {}", err);
            return 2;
        }
    };

    let log_file = settings
        .log_file
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned());
    let _logger = match init_logging(
        settings.log_level.as_deref(),
        settings.log_format,
        log_file.as_deref(),
        settings.use_color(),
    ) {
        Ok(handle) => handle,
        Err(err) => {
            let err = AppError::Logging {
                message: err.to_string(),
            };
            eprintln!("Error: {}", err);
            return 1;
        }
    };
    log::debug!("Settings: {:?}", settings);

    let (command, settings) = (&args.command, &settings);
    let result = ShutdownCoordinator::guard(|coordinator| async move {
        let token = coordinator.cancel_token();
        run(command, settings, token.clone())
            .await
            .map_err(|err| (err, token.is_cancelled()))
    })
    .await;

    match result {
        Ok(()) => 0,
        Err((err, interrupted)) => {
            let code = failure_exit_code(&err, interrupted);
            let context = if code == EXIT_INTERRUPTED {
                "Interrupted"
            } else {
                command_context(&args.command)
            };
            log_error_with_context(&err, context);
            code
        }
    }
}

/// 130 only when a shutdown signal cancelled the command; a deadline is a failure
fn failure_exit_code(err: &AppError, interrupted: bool) -> i32 {
    if interrupted && err.is_cancellation() {
        EXIT_INTERRUPTED
    } else {
        1
    }
}

fn parse_args() -> Args {
    let color = std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none()
        && !std::env::args().any(|arg| arg == "--no-color");
    let matches = Args::command().styles(palette_to_clap(color)).get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
}

/// Merge the configuration file and the command line
pub async fn resolve_settings(args: &Args) -> Result<Settings, ConfigError> {
    let mut settings = Settings::new();
    if let Some(table) = load_config_file(args.config_file.as_deref()).await? {
        settings.apply_toml_values(&table)?;
    }
    settings.apply_args(args)?;
    Ok(settings)
}

/// Open the store `location` names
pub async fn open_store(location: &StoreLocation) -> AppResult<Arc<dyn KeyValueStore>> {
    match location {
        StoreLocation::Memory => {
            log::warn!("Using an in-memory store; nothing is kept after exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreLocation::File(path) => {
            log::debug!("Opening store {}", path.display());
            Ok(Arc::new(FileStore::open(path).await?))
        }
    }
}

async fn run(command: &Command, settings: &Settings, token: CancelToken) -> AppResult<()> {
    let config = settings.queue_config()?;
    let store = open_store(&settings.store_location()).await?;
    log::info!(
        "Table '{}' with destinations {:?}",
        config.table_name,
        config.destinations.names()
    );

    let mut env = CommandEnv::new(
        store,
        config,
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
    )
    .with_token(token)
    .with_timeout(settings.timeout)
    .with_color(settings.use_color());

    dispatch(command, &mut env).await
}

fn command_context(command: &Command) -> &'static str {
    match command {
        Command::Init(_) => "Table initialisation failed",
        Command::Stream(_) => "Streaming records failed",
        Command::Receive(_) => "Receiving records failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueError;
    use crate::store::StoreError;
    use clap::Parser;
    use std::time::Duration;

    #[tokio::test]
    async fn test_resolve_settings_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprinkler.toml");
        std::fs::write(&path, "table = \"events\"\nstore = \"memory\"\n").unwrap();

        let args = Args::try_parse_from([
            "sprinkler",
            "-C",
            path.to_str().unwrap(),
            "-t",
            "override",
            "receive",
        ])
        .unwrap();
        let settings = resolve_settings(&args).await.unwrap();

        assert_eq!(settings.table.as_deref(), Some("override"));
        assert_eq!(settings.store_location(), StoreLocation::Memory);
    }

    #[tokio::test]
    async fn test_open_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let location = StoreLocation::File(dir.path().join("nested").join("store.json"));
        let store = open_store(&location).await.unwrap();
        assert!(store.describe_table("sprinkler").await.unwrap().is_none());
    }

    #[test]
    fn test_timeout_without_signal_is_a_failure() {
        let timed_out = AppError::from(QueueError::TimedOut {
            operation: "dequeue",
            timeout: Duration::from_secs(1),
        });
        assert_eq!(failure_exit_code(&timed_out, false), 1);
        assert_eq!(failure_exit_code(&timed_out, true), EXIT_INTERRUPTED);
    }

    #[test]
    fn test_signal_cancellation_exits_interrupted() {
        let cancelled = AppError::from(QueueError::Cancelled {
            operation: "enqueue",
        });
        assert_eq!(failure_exit_code(&cancelled, true), EXIT_INTERRUPTED);

        let unrelated = AppError::from(StoreError::Unavailable {
            message: "disk gone".into(),
        });
        assert_eq!(failure_exit_code(&unrelated, true), 1);
    }

    #[test]
    fn test_command_context_names_the_command() {
        let args = Args::try_parse_from(["sprinkler", "stream"]).unwrap();
        assert_eq!(command_context(&args.command), "Streaming records failed");
    }
}
