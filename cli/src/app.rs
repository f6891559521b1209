//! CLI assembly: merge flag overrides into the config, build the platform
//! client and registry, then dispatch the subcommand.
use siteup_core::api::{
    self as core_api, AppConfig, CliError, ExecutionContext, Platform, TaskRegistry,
    UpdateProcessor,
};
use siteup_plugins::client::SiteClient;
use siteup_plugins::factory;

use crate::commands::cli::{Args, Commands};

/// Load the configuration, honoring `--config` when given.
pub fn load_config(args: &Args) -> Result<AppConfig, CliError> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => {
            let path = shellexpand::tilde(path).into_owned();
            core_api::load_from_path(std::path::Path::new(&path))
                .map_err(|e| CliError::Config(format!("{path}: {e}")))?
        }
        None => core_api::load_default().map_err(|e| CliError::Config(e.to_string()))?,
    };
    if args.config.is_some() {
        core_api::apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())
            .map_err(|e| CliError::Config(e.to_string()))?;
    }
    Ok(cfg)
}

/// Command line flags win over file and environment settings.
pub fn apply_cli_overrides(cfg: &mut AppConfig, args: &Args) {
    if let Some(platform) = args.platform {
        cfg.platform = platform;
    }
    if let Some(namespace) = &args.namespace {
        cfg.namespace = Some(namespace.clone());
    }
    if let Some(format) = args.format {
        cfg.output.format = format.as_str().to_string();
    }
    if args.verbose {
        cfg.output.verbose = true;
    }
}

#[tracing::instrument(name = "cli.run_app", skip_all, fields(platform = %cfg.platform))]
pub fn run_app_with_config(args: Args, cfg: AppConfig) -> Result<i32, CliError> {
    match cfg.platform {
        Platform::Kubernetes => {
            let registry = factory::build_kube_registry(&cfg).map_err(config_error)?;
            run_on_platform(args.command, &cfg, registry, || factory::build_kube_client(&cfg))
        }
        Platform::Podman => {
            let registry = factory::build_podman_registry(&cfg).map_err(config_error)?;
            run_on_platform(args.command, &cfg, registry, || {
                factory::build_podman_client(&cfg)
            })
        }
    }
}

fn run_on_platform<C, F>(
    command: Commands,
    cfg: &AppConfig,
    registry: TaskRegistry<C>,
    build_client: F,
) -> Result<i32, CliError>
where
    C: SiteClient + 'static,
    F: FnOnce() -> C,
{
    if matches!(command, Commands::Tasks) {
        for task in registry.iter() {
            println!("{}", task_summary(task.version().to_string(), task.priority(), task.info()));
        }
        return Ok(0);
    }

    let client = build_client();
    let renderer = factory::build_renderer(&cfg.output.format, cfg.output.verbose);
    let builder = UpdateProcessor::builder(cfg.platform, registry)
        .renderer(renderer)
        .verbose(cfg.output.verbose);

    let (site_version, dry_run) = match command {
        Commands::Update(update) => (update.site_version, update.dry_run),
        Commands::Plan(plan) => (plan.site_version, true),
        Commands::Tasks => return Ok(0),
    };

    let site_version = match site_version {
        Some(v) => v,
        None => client
            .site_version()
            .map_err(|e| CliError::Platform(format!("unable to read site version: {e:#}")))?,
    };
    tracing::info!(site_version = %site_version, dry_run, "site version resolved");

    let processor = builder.dry_run(dry_run).build();
    processor.process(&site_version, ExecutionContext::new(client))?;
    Ok(0)
}

fn config_error(e: anyhow::Error) -> CliError {
    CliError::Config(format!("{e:#}"))
}

fn task_summary(version: String, priority: core_api::Priority, info: &str) -> String {
    format!("{version:<8} {:<7} {info}", priority.to_string())
}
