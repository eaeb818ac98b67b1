//! CLI commands.

mod inventory;
mod render;
mod run;

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use nomad_run_jobspec::JobDescriptor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::actions;
use crate::client::SchedulerClient;
use crate::config::{self, SchedulerConfig, Secrets};
use crate::error::CliError;
use crate::output::OutputFormat;

/// nomad-run - Ensure a job is running on a Nomad cluster.
#[derive(Debug, Parser)]
#[command(name = "nomad-run")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Log format (text or json). Logs go to stderr.
    #[arg(long, global = true, env = "NOMAD_RUN_LOG_FORMAT", default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ensure the job is running, refusing port conflicts.
    Run(run::RunCommand),

    /// Print the job definition without contacting the scheduler.
    Render(render::RenderCommand),

    /// List jobs and their reserved ports.
    Inventory(inventory::InventoryCommand),

    /// Show version.
    Version,
}

impl Cli {
    /// Install the tracing subscriber.
    ///
    /// `RUST_LOG` wins; otherwise `debug` when the runner has step debugging
    /// enabled, `info` else.
    pub fn init_tracing(&self) {
        let default_level = if actions::runner_debug() { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());
        let registry = tracing_subscriber::registry().with(filter);

        if self.log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::parse(&self.format)
    }

    /// Run the command.
    pub async fn run(self) -> Result<()> {
        let ctx = CommandContext {
            format: self.output_format(),
        };

        match self.command {
            Commands::Run(cmd) => cmd.run(ctx).await,
            Commands::Render(cmd) => cmd.run(ctx).await,
            Commands::Inventory(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("nomad-run {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub format: OutputFormat,
}

/// The desired job, from flags or action inputs.
#[derive(Debug, Args)]
pub struct JobArgs {
    /// Job identifier.
    #[arg(long, env = "INPUT_JOB-ID")]
    pub job_id: Option<String>,

    /// Container image reference.
    #[arg(long, env = "INPUT_IMAGE-URL")]
    pub image_url: Option<String>,

    /// Static host port to reserve.
    #[arg(long, env = "INPUT_STATIC-PORT")]
    pub static_port: Option<String>,

    /// Port the container listens on.
    #[arg(long, env = "INPUT_CONTAINER-PORT")]
    pub container_port: Option<String>,
}

impl JobArgs {
    /// Build the descriptor, failing on missing or invalid inputs.
    ///
    /// The runner sets every declared input, possibly empty; empty counts as
    /// missing.
    pub fn descriptor(&self) -> Result<JobDescriptor, CliError> {
        let fields = [
            ("job-id", &self.job_id),
            ("image-url", &self.image_url),
            ("static-port", &self.static_port),
            ("container-port", &self.container_port),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(CliError::Configuration { missing });
        }

        let get = |value: &Option<String>| value.clone().unwrap_or_default();
        Ok(JobDescriptor::from_inputs(
            &get(&self.job_id),
            &get(&self.static_port),
            &get(&self.container_port),
            &get(&self.image_url),
        )?)
    }
}

/// Where and how to reach the scheduler.
#[derive(Debug, Args)]
pub struct SchedulerArgs {
    /// Scheduler domain, served over HTTPS.
    #[arg(long, env = "INPUT_NOMAD-DOMAIN")]
    pub nomad_domain: Option<String>,

    /// Full scheduler address; overrides --nomad-domain.
    #[arg(long, env = "NOMAD_ADDR")]
    pub nomad_addr: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "NOMAD_RUN_REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl SchedulerArgs {
    /// Build the scheduler client. Secrets come from the environment.
    pub fn client(&self) -> Result<SchedulerClient> {
        let base_url = config::base_url(self.nomad_domain.as_deref(), self.nomad_addr.as_deref())?;
        let secrets = Secrets::from_env()?;
        let config = SchedulerConfig::new(base_url, secrets)
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs));

        tracing::info!(
            base_url = %config.base_url,
            request_timeout_secs = self.request_timeout_secs,
            "Scheduler configured"
        );
        SchedulerClient::new(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(id: &str, image: &str, static_port: &str, container_port: &str) -> JobArgs {
        let opt = |s: &str| Some(s.to_string());
        JobArgs {
            job_id: opt(id),
            image_url: opt(image),
            static_port: opt(static_port),
            container_port: opt(container_port),
        }
    }

    #[test]
    fn test_descriptor_from_args() {
        let d = args("web", "img:1", "8080", "80").descriptor().unwrap();
        assert_eq!(d.id, "web");
        assert_eq!(d.static_port.get(), 8080);
    }

    #[test]
    fn test_empty_inputs_are_missing() {
        let mut a = args("", "img:1", " ", "80");
        a.container_port = None;
        match a.descriptor() {
            Err(CliError::Configuration { missing }) => {
                assert_eq!(missing, vec!["job-id", "static-port", "container-port"]);
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_port_is_invalid_input() {
        assert!(matches!(
            args("web", "img", "http", "80").descriptor(),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "nomad-run",
            "run",
            "--job-id",
            "web",
            "--image-url",
            "img",
            "--static-port",
            "8080",
            "--container-port",
            "80",
            "--nomad-domain",
            "nomad.example.com",
            "--dry-run",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Run(_)));
    }
}
