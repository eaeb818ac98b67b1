//! # nomad-run-jobspec
//!
//! Desired-state model and job definition rendering.
//!
//! - [`JobDescriptor`]: the desired job, built once per run from inputs
//! - [`JobDefinition`]: the full job shape, with every fixed value named in
//!   [`defaults`]
//! - [`render_hcl`]: serializes a definition to HCL text for the scheduler's
//!   parse endpoint
//!
//! The scheduler validates the HCL; this crate only guarantees that every
//! interpolated value is escaped.

pub mod defaults;
mod definition;
mod descriptor;
mod error;
mod hcl;

pub use definition::{
    DockerConfig, HealthCheck, JobDefinition, Network, Resources, Service, Task, TaskGroup,
    UpdatePolicy,
};
pub use descriptor::JobDescriptor;
pub use error::JobSpecError;
pub use hcl::render_hcl;
