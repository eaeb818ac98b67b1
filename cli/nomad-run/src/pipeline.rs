//! The ensure-job pipeline.
//!
//! inventory -> reconcile -> render -> parse -> submit. Any failing stage
//! aborts the run; nothing is retried.

use std::time::Duration;

use nomad_run_jobspec::{render_hcl, JobDefinition, JobDescriptor};
use nomad_run_reconcile::decide;
use serde::Serialize;
use tracing::info;

use crate::client::SchedulerClient;
use crate::definition::resolve_definition;
use crate::error::CliError;
use crate::inventory::get_all_jobs;
use crate::submit::{submit, JobRegisterResponse};

/// Result of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub descriptor: JobDescriptor,
    /// Number of jobs found on the cluster.
    pub inventory_size: usize,
    pub hcl: String,
    /// `None` on a dry run.
    pub registration: Option<JobRegisterResponse>,
}

/// Ensure `descriptor` is running.
///
/// With `dry_run`, stops after rendering; nothing is parsed or submitted.
pub async fn ensure_job(
    client: &SchedulerClient,
    descriptor: &JobDescriptor,
    dry_run: bool,
) -> Result<Outcome, CliError> {
    info!(
        job_id = %descriptor.id,
        static_port = %descriptor.static_port,
        container_port = %descriptor.container_port,
        image = %descriptor.image,
        "Ensuring job"
    );

    let inventory = get_all_jobs(client).await?;
    decide(descriptor, &inventory)?;
    info!(job_id = %descriptor.id, "No conflicting job");

    let hcl = render_hcl(&JobDefinition::from_descriptor(descriptor));
    let mut outcome = Outcome {
        descriptor: descriptor.clone(),
        inventory_size: inventory.len(),
        hcl,
        registration: None,
    };

    if dry_run {
        info!("Dry run, skipping parse and submit");
        return Ok(outcome);
    }

    let job = resolve_definition(client, &outcome.hcl).await?;
    outcome.registration = Some(submit(client, &job).await?);
    Ok(outcome)
}

/// Run [`ensure_job`] under an overall deadline.
pub async fn ensure_job_within(
    client: &SchedulerClient,
    descriptor: &JobDescriptor,
    dry_run: bool,
    deadline: Duration,
) -> Result<Outcome, CliError> {
    tokio::time::timeout(deadline, ensure_job(client, descriptor, dry_run))
        .await
        .map_err(|_| CliError::Deadline(deadline))?
}
