//! Job definition resolution.
//!
//! The HCL text is converted to the scheduler's structured job form by the
//! scheduler itself; no local validation happens here.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::SchedulerClient;
use crate::error::CliError;

/// A structured job, as returned by the parse endpoint.
///
/// Opaque to this crate; it is passed back to the scheduler untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredJob(pub serde_json::Value);

impl StructuredJob {
    /// The job id, if the structure carries one.
    pub fn id(&self) -> Option<&str> {
        self.0.get("ID").and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ParseJobRequest<'a> {
    canonicalize: bool,
    #[serde(rename = "JobHCL")]
    job_hcl: &'a str,
}

/// Resolve HCL text into a structured job via `POST /v1/jobs/parse`.
pub async fn resolve_definition(
    client: &SchedulerClient,
    hcl: &str,
) -> Result<StructuredJob, CliError> {
    let mut url = client.endpoint(&["v1", "jobs", "parse"])?;
    url.set_query(Some("namespace=*"));

    let request = ParseJobRequest {
        canonicalize: true,
        job_hcl: hcl,
    };
    let job: StructuredJob = client.post(url, &request).await?;
    debug!(job_id = job.id().unwrap_or("<none>"), "Parsed job definition");
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_shape() {
        let request = ParseJobRequest {
            canonicalize: true,
            job_hcl: "job \"web\" {}",
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "Canonicalize": true, "JobHCL": "job \"web\" {}" })
        );
    }

    #[test]
    fn test_structured_job_is_transparent() {
        let job: StructuredJob = serde_json::from_value(json!({ "ID": "web", "Type": "service" })).unwrap();
        assert_eq!(job.id(), Some("web"));
        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({ "ID": "web", "Type": "service" })
        );
    }
}
