//! Usersync Server binary.

use std::path::PathBuf;
use std::process::ExitCode;

use usersync_server::{
    init_tracing, load_config, Config, Secrets, ServerError, UsersyncServer, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH,
};

#[tokio::main]
async fn main() -> ExitCode {
    let path = std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = load_config(&path).and_then(|config| config.with_env_overrides(|name| std::env::var(name).ok()));

    let log_level = config
        .as_ref()
        .map(|config| config.server.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(&log_level);

    match start(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, config = %path.display(), "Usersync server failed");
            ExitCode::FAILURE
        }
    }
}

async fn start(config: Result<Config, usersync_server::ConfigError>) -> Result<(), ServerError> {
    let config = config?;
    let secrets = Secrets::from_env()?;

    UsersyncServer::new(config, secrets).run().await
}
