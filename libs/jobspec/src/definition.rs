//! The structured job definition.
//!
//! A [`JobDefinition`] is a plain value object: every field the rendered job
//! carries is named here, with the descriptor-independent ones taken from
//! [`crate::defaults`].

use std::collections::BTreeMap;
use std::time::Duration;

use nomad_run_id::{JobId, Port};

use crate::defaults;
use crate::JobDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    pub id: JobId,
    pub region: String,
    pub datacenters: Vec<String>,
    pub job_type: String,
    pub update: UpdatePolicy,
    pub group: TaskGroup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePolicy {
    pub stagger: Duration,
    pub max_parallel: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup {
    pub name: String,
    pub count: u32,
    pub network: Network,
    pub service: Service,
    pub task: Task,
}

/// A single statically allocated port forwarded to the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub port_label: String,
    pub static_port: Port,
    pub to: Port,
    pub host_network: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub check: HealthCheck,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    pub name: String,
    pub port_label: String,
    pub kind: String,
    pub path: String,
    pub interval: Duration,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub driver: String,
    pub config: DockerConfig,
    pub resources: Resources,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerConfig {
    pub image: String,
    pub force_pull: bool,
    pub ports: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    pub cpu_mhz: u32,
    pub memory_mb: u32,
}

impl JobDefinition {
    /// Build the fixed job shape for a descriptor.
    ///
    /// The job id doubles as the group, task and port label names.
    pub fn from_descriptor(descriptor: &JobDescriptor) -> Self {
        let name = descriptor.id.as_str().to_string();

        let (label_key, label_value) = defaults::ACCESS_CONTROL_LABEL;
        let mut labels = BTreeMap::new();
        labels.insert(label_key.to_string(), label_value.to_string());

        Self {
            id: descriptor.id.clone(),
            region: defaults::REGION.to_string(),
            datacenters: vec![defaults::DATACENTER.to_string()],
            job_type: defaults::JOB_TYPE.to_string(),
            update: UpdatePolicy {
                stagger: defaults::UPDATE_STAGGER,
                max_parallel: defaults::UPDATE_MAX_PARALLEL,
            },
            group: TaskGroup {
                name: name.clone(),
                count: defaults::GROUP_COUNT,
                network: Network {
                    port_label: name.clone(),
                    static_port: descriptor.static_port,
                    to: descriptor.container_port,
                    host_network: defaults::HOST_NETWORK.to_string(),
                },
                service: Service {
                    check: HealthCheck {
                        name: format!("{name} Check"),
                        port_label: name.clone(),
                        kind: defaults::CHECK_TYPE.to_string(),
                        path: defaults::CHECK_PATH.to_string(),
                        interval: defaults::CHECK_INTERVAL,
                        timeout: defaults::CHECK_TIMEOUT,
                    },
                },
                task: Task {
                    name: name.clone(),
                    driver: defaults::DRIVER.to_string(),
                    config: DockerConfig {
                        image: descriptor.image.clone(),
                        force_pull: defaults::FORCE_PULL,
                        ports: vec![name],
                        labels,
                    },
                    resources: Resources {
                        cpu_mhz: defaults::CPU_MHZ,
                        memory_mb: defaults::MEMORY_MB,
                    },
                },
            },
        }
    }
}
