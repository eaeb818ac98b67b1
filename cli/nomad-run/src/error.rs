//! Error handling and display for the action.

use std::time::Duration;

use colored::Colorize;
use nomad_run_jobspec::JobSpecError;
use nomad_run_reconcile::ConflictError;
use thiserror::Error;

use crate::actions;
use crate::output::{format_error_json, OutputFormat};

/// Action errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing required configuration: {}", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    #[error("invalid input: {0}")]
    InvalidInput(#[from] JobSpecError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("{method} {path} failed with status {status}: {body}")]
    Api {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("run did not finish within {}s", .0.as_secs())]
    Deadline(Duration),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a decode error for a response body.
    pub fn decode(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error for one missing name.
    pub fn missing(name: &'static str) -> Self {
        Self::Configuration {
            missing: vec![name],
        }
    }
}

/// Report a failed run.
///
/// The workflow error annotation goes to stdout so the runner marks the step
/// failed with the message, and a human-readable version to stderr. In JSON
/// mode stdout carries a JSON error document instead and the annotation moves
/// to stderr.
pub fn print_error(err: &anyhow::Error, format: OutputFormat) {
    let message = err.to_string();
    let annotation = actions::error_annotation(&message);
    match format {
        OutputFormat::Table => println!("{annotation}"),
        OutputFormat::Json => {
            eprintln!("{annotation}");
            let conflict = match err.downcast_ref::<CliError>() {
                Some(CliError::Conflict(conflict)) => Some(conflict),
                _ => None,
            };
            println!("{}", format_error_json(&message, conflict));
        }
    }
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::Configuration { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Secrets are read from the step environment (nomad-acl, cf-access-client-id, cf-access-client-secret)."
                        .yellow()
                );
            }
            CliError::Api { status, .. } if *status == 401 || *status == 403 => {
                eprintln!(
                    "\n{}",
                    "Hint: Check the Nomad ACL token and the edge gateway credentials.".yellow()
                );
            }
            CliError::Conflict(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Pick a free static port, or stop the job holding it.".yellow()
                );
            }
            CliError::Network(_) | CliError::Deadline(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and the Nomad domain.".yellow()
                );
            }
            _ => {}
        }
    }
}
