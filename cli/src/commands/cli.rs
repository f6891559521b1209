use clap::{Args as ClapArgs, Parser, Subcommand};
use siteup_core::api::Platform;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Jsonl,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// Bring an installed site up to date with this release.
#[derive(Parser, Debug)]
#[command(name = "siteup", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// kubernetes (kube, k8s) or podman. Overrides the configured platform.
    #[arg(long, global = true)]
    pub platform: Option<Platform>,

    /// Namespace of the site (Kubernetes only).
    #[arg(long, short = 'n', global = true)]
    pub namespace: Option<String>,

    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Also report what every task changed or skipped.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.siteup/config.toml or ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct UpdateArgs {
    /// Version the site currently runs. Read from the site when omitted.
    #[arg(long)]
    pub site_version: Option<String>,

    /// Show the tasks that would run without running them.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct PlanArgs {
    #[arg(long)]
    pub site_version: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every pending update task.
    Update(UpdateArgs),
    /// Print the pending tasks in execution order.
    Plan(PlanArgs),
    /// List every registered task for the platform.
    Tasks,
}
