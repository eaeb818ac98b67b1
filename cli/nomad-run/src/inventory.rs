//! Job inventory reader.
//!
//! Lists every job on the scheduler and fetches each job's detail to collect
//! its reserved static ports. The detail fetches run concurrently.

use futures_util::future::try_join_all;
use nomad_run_id::{JobId, Port};
use nomad_run_reconcile::JobInfo;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::client::SchedulerClient;
use crate::error::CliError;

/// Entry of `GET /v1/jobs`.
#[derive(Debug, Deserialize)]
struct JobListStub {
    #[serde(rename = "ID")]
    id: String,
}

/// The subset of `GET /v1/job/{id}` this reader needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JobDetail {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    task_groups: Option<Vec<TaskGroupDetail>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TaskGroupDetail {
    #[serde(default)]
    networks: Option<Vec<NetworkDetail>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NetworkDetail {
    #[serde(default)]
    reserved_ports: Option<Vec<ReservedPort>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReservedPort {
    #[serde(default, deserialize_with = "reserved_port_value")]
    value: Option<Port>,
}

/// Normalize a reserved port value.
///
/// Numbers and numeric strings become a [`Port`]; `0`, `""`, `false` and
/// `null` are dropped. Anything else is a decode error.
fn reserved_port_value<'de, D>(deserializer: D) -> Result<Option<Port>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
        Flag(bool),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Number(0)) => Ok(None),
        Some(Raw::Number(n)) => Port::try_from_u64(n).map(Some).map_err(D::Error::custom),
        Some(Raw::Text(s)) => match s.trim() {
            "" | "0" => Ok(None),
            trimmed => Port::parse(trimmed).map(Some).map_err(D::Error::custom),
        },
        Some(Raw::Flag(false)) => Ok(None),
        Some(Raw::Flag(true)) => Err(D::Error::custom("reserved port value is `true`")),
    }
}

impl JobDetail {
    fn into_job_info(self) -> Result<JobInfo, CliError> {
        let id = JobId::parse(&self.id)
            .map_err(|e| CliError::decode(format!("/v1/job/{}", self.id), e))?;

        let ports = self
            .task_groups
            .into_iter()
            .flatten()
            .flat_map(|group| group.networks.into_iter().flatten())
            .flat_map(|network| network.reserved_ports.into_iter().flatten())
            .filter_map(|reserved| reserved.value)
            .collect();

        Ok(JobInfo::new(id, self.name, ports))
    }
}

/// List the ids of every job, in the scheduler's order.
pub async fn list_jobs(client: &SchedulerClient) -> Result<Vec<String>, CliError> {
    let stubs: Vec<JobListStub> = client.get(client.endpoint(&["v1", "jobs"])?).await?;
    let ids: Vec<String> = stubs.into_iter().map(|stub| stub.id).collect();
    debug!(count = ids.len(), jobs = ?ids, "Listed jobs");
    Ok(ids)
}

/// Fetch one job and flatten its reserved ports.
pub async fn get_job_info(client: &SchedulerClient, id: &str) -> Result<JobInfo, CliError> {
    let detail: JobDetail = client.get(client.endpoint(&["v1", "job", id])?).await?;
    let info = detail.into_job_info()?;
    debug!(
        job_id = %info.id,
        name = %info.name,
        ports = %info.ports_display(),
        "Fetched job info"
    );
    Ok(info)
}

/// Read the full inventory.
///
/// Detail fetches run concurrently; the result keeps the listing order. The
/// first failing fetch fails the whole read.
pub async fn get_all_jobs(client: &SchedulerClient) -> Result<Vec<JobInfo>, CliError> {
    let ids = list_jobs(client).await?;
    let inventory = try_join_all(ids.iter().map(|id| get_job_info(client, id))).await?;
    info!(count = inventory.len(), "Inventory read");
    Ok(inventory)
}
