//! Desired job state.

use nomad_run_id::{JobId, Port};
use serde::Serialize;

use crate::JobSpecError;

/// The job this run wants to have running.
///
/// Built fresh per invocation from action inputs and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    pub id: JobId,
    pub static_port: Port,
    pub container_port: Port,
    pub image: String,
}

impl JobDescriptor {
    /// Build a descriptor from already-validated parts.
    pub fn new(id: JobId, static_port: Port, container_port: Port, image: impl Into<String>) -> Self {
        Self {
            id,
            static_port,
            container_port,
            image: image.into(),
        }
    }

    /// Parse a descriptor from raw string inputs.
    ///
    /// Each error names the input it came from.
    pub fn from_inputs(
        job_id: &str,
        static_port: &str,
        container_port: &str,
        image: &str,
    ) -> Result<Self, JobSpecError> {
        let id = JobId::parse(job_id).map_err(|source| JobSpecError::Invalid {
            field: "job-id",
            source,
        })?;
        let static_port = Port::parse(static_port).map_err(|source| JobSpecError::Invalid {
            field: "static-port",
            source,
        })?;
        let container_port =
            Port::parse(container_port).map_err(|source| JobSpecError::Invalid {
                field: "container-port",
                source,
            })?;

        let image = image.trim();
        if image.is_empty() {
            return Err(JobSpecError::EmptyImage);
        }
        if let Some(ch) = image.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(JobSpecError::InvalidImageCharacter { ch });
        }

        Ok(Self::new(id, static_port, container_port, image))
    }
}
