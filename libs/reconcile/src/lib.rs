//! Reconciliation of a desired job against the cluster inventory.
//!
//! Before a job is rendered and submitted, the desired [`JobDescriptor`] is
//! compared with every job already known to the scheduler. Two situations
//! block submission:
//!
//! - **Drift**: a job with the same id exists but does not reserve the
//!   desired static port.
//! - **Collision**: a job with a different id already reserves the desired
//!   static port.
//!
//! A job with the same id that already reserves the desired port is the
//! steady state and is not a conflict.
//!
//! # Invariants
//!
//! - At most one job occupies a given static port
//! - A job id always maps to the same static port
//! - The scan is linear and deterministic: the first conflicting job in
//!   inventory order is the one reported, even if several conflict

use std::fmt;

use nomad_run_id::{JobId, Port};
use nomad_run_jobspec::JobDescriptor;
use serde::Serialize;
use tracing::debug;

/// Observed state of one job on the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobInfo {
    pub id: JobId,
    pub name: String,
    /// Reserved static ports across all task groups and networks, in
    /// response order.
    pub ports: Vec<Port>,
}

impl JobInfo {
    pub fn new(id: JobId, name: impl Into<String>, ports: Vec<Port>) -> Self {
        Self {
            id,
            name: name.into(),
            ports,
        }
    }

    /// Returns true if this job reserves the given port.
    pub fn reserves(&self, port: Port) -> bool {
        self.ports.contains(&port)
    }

    /// Comma-separated port list, as shown in conflict messages.
    pub fn ports_display(&self) -> String {
        self.ports
            .iter()
            .map(Port::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Why an existing job blocks the desired one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Same id, desired static port not reserved.
    Drift,

    /// Different id, desired static port already reserved.
    Collision,
}

impl ConflictKind {
    /// Classify one inventory entry against the desired job.
    pub fn classify(desired: &JobDescriptor, existing: &JobInfo) -> Option<Self> {
        let same_id = existing.id == desired.id;
        let holds_port = existing.reserves(desired.static_port);

        match (same_id, holds_port) {
            (true, false) => Some(Self::Drift),
            (false, true) => Some(Self::Collision),
            _ => None,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Drift => "job exists with a different static port",
            Self::Collision => "static port is reserved by another job",
        }
    }
}

/// A conflict between the desired job and an existing one.
///
/// Carries everything needed to diagnose the conflict from the run log, and
/// serializes to the same fields for machine-readable reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictError {
    pub kind: ConflictKind,
    pub existing: JobInfo,
    pub desired_id: JobId,
    pub desired_port: Port,
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Job conflict:")?;
        writeln!(
            f,
            "  exist: {}|{}|{}",
            self.existing.id,
            self.existing.name,
            self.existing.ports_display()
        )?;
        writeln!(f, "  this job: {}|{}", self.desired_id, self.desired_port)?;
        write!(f, "  reason: {}", self.kind.describe())
    }
}

impl std::error::Error for ConflictError {}

/// Find the first job in `inventory` that conflicts with `desired`.
pub fn find_conflict(desired: &JobDescriptor, inventory: &[JobInfo]) -> Option<ConflictError> {
    inventory.iter().find_map(|existing| {
        let kind = ConflictKind::classify(desired, existing)?;
        debug!(
            kind = ?kind,
            existing_id = %existing.id,
            existing_ports = %existing.ports_display(),
            desired_id = %desired.id,
            desired_port = %desired.static_port,
            "Conflicting job found"
        );
        Some(ConflictError {
            kind,
            existing: existing.clone(),
            desired_id: desired.id.clone(),
            desired_port: desired.static_port,
        })
    })
}

/// Decide whether `desired` may be submitted.
///
/// Returns `Ok(())` when no job conflicts, including when the job is already
/// running with the desired port.
pub fn decide(desired: &JobDescriptor, inventory: &[JobInfo]) -> Result<(), ConflictError> {
    match find_conflict(desired, inventory) {
        Some(conflict) => Err(conflict),
        None => Ok(()),
    }
}
