//! Fixed values of the rendered job definition.
//!
//! None of these are parameterized by the job descriptor.

use std::time::Duration;

pub const REGION: &str = "global";
pub const DATACENTER: &str = "scholar";
pub const JOB_TYPE: &str = "service";

/// Rolling update: delay between allocation updates.
pub const UPDATE_STAGGER: Duration = Duration::from_secs(30);
pub const UPDATE_MAX_PARALLEL: u32 = 2;

pub const GROUP_COUNT: u32 = 1;

/// Host network the static port is bound on.
pub const HOST_NETWORK: &str = "tailscale";

pub const CHECK_TYPE: &str = "http";
pub const CHECK_PATH: &str = "/";
pub const CHECK_INTERVAL: Duration = Duration::from_secs(10);
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

pub const DRIVER: &str = "docker";
pub const FORCE_PULL: bool = true;

/// Container label granting the development team access in Portainer.
pub const ACCESS_CONTROL_LABEL: (&str, &str) = ("io.portainer.accesscontrol.teams", "development");

pub const CPU_MHZ: u32 = 100;
pub const MEMORY_MB: u32 = 64;
