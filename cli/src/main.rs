use std::path::PathBuf;

use clap::Parser;
use siteup_cli::app;
use siteup_cli::commands::cli;
use siteup_core::api::{AppConfig, CliError, LoggingConfig, Platform};
use siteup_core::config::get_siteup_data_dir;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

fn main() {
    let exit = match real_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let mut cfg = app::load_config(&args)?;
    app::apply_cli_overrides(&mut cfg, &args);
    init_tracing(&cfg).map_err(CliError::Config)?;

    app::run_app_with_config(args, cfg)
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config error
    // 20: platform / IO error
    // 30: update stopped or completed with errors
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Platform(_) => 20,
        CliError::Io(_) => 20,
        CliError::Update(_) => 30,
        CliError::Anyhow(_) => 50,
    }
}

/// Where a run's log file goes: the configured directory, else
/// `~/.siteup/logs`. Kubernetes and Podman runs log to separate files.
fn log_file_target(logging: &LoggingConfig, platform: Platform) -> (PathBuf, String) {
    let dir = match logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(d) => PathBuf::from(shellexpand::tilde(d).into_owned()),
        None => get_siteup_data_dir()
            .map(|d| d.join("logs"))
            .unwrap_or_else(|_| std::env::temp_dir().join("siteup")),
    };
    (dir, format!("siteup-{platform}.log"))
}

fn init_tracing(cfg: &AppConfig) -> Result<(), String> {
    let logging = &cfg.logging;
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let (dir, file_name) = log_file_target(logging, cfg.platform);
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("create log dir {} failed: {e}", dir.display()))?;
        // One file per day; update runs of the same day append to it.
        let appender = tracing_appender::rolling::daily(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::debug!(platform = %cfg.platform, version = env!("CARGO_PKG_VERSION"), "siteup starting");
    Ok(())
}
