//! Job submission.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::SchedulerClient;
use crate::definition::StructuredJob;
use crate::error::CliError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterJobRequest<'a> {
    job: &'a StructuredJob,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterJobWire {
    #[serde(rename = "EvalID", default)]
    eval_id: Option<String>,
    #[serde(default)]
    eval_create_index: Option<u64>,
    #[serde(default)]
    job_modify_index: Option<u64>,
    #[serde(default)]
    warnings: Option<String>,
}

/// The scheduler's acknowledgment of a job registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRegisterResponse {
    /// Evaluation created for the registration, if any.
    pub eval_id: Option<String>,
    pub eval_create_index: Option<u64>,
    pub job_modify_index: Option<u64>,
    pub warnings: Option<String>,
    /// The response body as received.
    pub raw: serde_json::Value,
}

impl JobRegisterResponse {
    fn from_raw(raw: serde_json::Value) -> Self {
        // Unknown shapes are kept as raw; only the typed view is best effort.
        let wire: RegisterJobWire = serde_json::from_value(raw.clone()).unwrap_or_default();
        Self {
            eval_id: wire.eval_id.filter(|id| !id.is_empty()),
            eval_create_index: wire.eval_create_index,
            job_modify_index: wire.job_modify_index,
            warnings: wire.warnings.filter(|w| !w.is_empty()),
            raw,
        }
    }
}

/// Submit a structured job via `POST /v1/jobs`.
pub async fn submit(
    client: &SchedulerClient,
    job: &StructuredJob,
) -> Result<JobRegisterResponse, CliError> {
    let url = client.endpoint(&["v1", "jobs"])?;
    let raw: serde_json::Value = client.post(url, &RegisterJobRequest { job }).await?;
    debug!(response = %raw, "Registered job");

    let response = JobRegisterResponse::from_raw(raw);
    if let Some(warnings) = &response.warnings {
        warn!(warnings = %warnings, "Scheduler returned warnings");
    }
    info!(
        job_id = job.id().unwrap_or("<none>"),
        eval_id = response.eval_id.as_deref().unwrap_or("<none>"),
        job_modify_index = response.job_modify_index,
        "Job submitted"
    );
    Ok(response)
}
