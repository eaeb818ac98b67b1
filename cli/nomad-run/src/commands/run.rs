//! Run command: the action entry point.
//!
//! Reads the inventory, refuses conflicts, then parses and submits the job.
//! On success the job inputs are echoed back as step outputs.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::actions;
use crate::output::{print_info, print_single, print_success, OutputFormat};
use crate::pipeline::{ensure_job_within, Outcome};

use super::{CommandContext, JobArgs, SchedulerArgs};

/// Ensure the job is running.
#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub job: JobArgs,

    #[command(flatten)]
    pub scheduler: SchedulerArgs,

    /// Stop after the conflict check and print the job definition.
    #[arg(long)]
    pub dry_run: bool,

    /// Overall deadline for the run, in seconds.
    #[arg(long, env = "NOMAD_RUN_DEADLINE", default_value_t = 300)]
    pub deadline_secs: u64,
}

#[derive(Debug, Serialize)]
struct RunReceipt<'a> {
    status: &'static str,
    outputs: Vec<(&'static str, String)>,
    outcome: &'a Outcome,
}

impl RunCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let descriptor = self.job.descriptor()?;
        let client = self.scheduler.client()?;
        let deadline = Duration::from_secs(self.deadline_secs);

        let outcome = ensure_job_within(&client, &descriptor, self.dry_run, deadline).await?;

        if outcome.registration.is_none() {
            match ctx.format {
                OutputFormat::Table => {
                    print_info(&format!(
                        "Dry run: no conflict among {} job(s); definition not submitted",
                        outcome.inventory_size
                    ));
                    print!("{}", outcome.hcl);
                }
                OutputFormat::Json => print_single(&RunReceipt {
                    status: "dry_run",
                    outputs: Vec::new(),
                    outcome: &outcome,
                }),
            }
            return Ok(());
        }

        // In JSON mode stdout carries only the receipt, which lists the outputs.
        let echo = ctx.format == OutputFormat::Table;
        let outputs = step_outputs(&outcome);
        for (name, value) in &outputs {
            actions::set_output(name, value, echo)?;
        }

        match ctx.format {
            OutputFormat::Table => {
                print_success(&format!(
                    "Job {} submitted on static port {}",
                    descriptor.id, descriptor.static_port
                ));
                if let Some(eval_id) = outcome.registration.as_ref().and_then(|r| r.eval_id.as_deref()) {
                    print_info(&format!("Evaluation: {eval_id}"));
                }
            }
            OutputFormat::Json => print_single(&RunReceipt {
                status: "submitted",
                outputs,
                outcome: &outcome,
            }),
        }

        Ok(())
    }
}

/// Outputs set after a successful submission.
fn step_outputs(outcome: &Outcome) -> Vec<(&'static str, String)> {
    let d = &outcome.descriptor;
    let mut outputs = vec![
        ("job-id", d.id.to_string()),
        ("static-port", d.static_port.to_string()),
        ("image-url", d.image.clone()),
        ("container-port", d.container_port.to_string()),
    ];
    if let Some(eval_id) = outcome.registration.as_ref().and_then(|r| r.eval_id.clone()) {
        outputs.push(("eval-id", eval_id));
    }
    outputs
}
