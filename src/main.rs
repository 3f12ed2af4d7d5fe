mod action;
mod app;
mod cli;
mod components;
mod config;
mod data;
mod error;
mod event;
mod input;
mod modal;
mod nav;
mod screens;

use color_eyre::eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::ConfigManager;

fn main() -> Result<()> {
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse_args();

    if cli.write_config {
        let manager = match &cli.config_dir {
            Some(dir) => ConfigManager::from_dir(dir.clone()),
            None => ConfigManager::new()?,
        };
        manager.ensure_config_dir()?;
        manager.write_default_configs()?;
        println!(
            "Default configs written to {}",
            manager.config_dir().display()
        );
        return Ok(());
    }

    let _log_guard = init_tracing(&cli)?;

    // Page loaders and the focus watchdog run on tokio; the event loop
    // itself stays synchronous.
    let runtime = tokio::runtime::Runtime::new()?;
    let _enter = runtime.enter();

    let mut app = app::App::with_cli(&cli)?;
    app.mount_initial();
    app.run()?;

    Ok(())
}

/// Logs go to a rolling file under the config dir; stdout belongs to the
/// TUI while raw mode is up.
fn init_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let log_dir = directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("reel-control").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::daily(&log_dir, "reel-control.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
