//! Shared helpers for tests against the fake scheduler.

#![allow(dead_code)]

use std::time::Duration;

use nomad_run::client::SchedulerClient;
use nomad_run::config::{SchedulerConfig, Secrets};
use nomad_run_testing::{FakeScheduler, TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_TOKEN};
use reqwest::Url;

pub fn test_secrets() -> Secrets {
    Secrets::from_lookup(|name| match name {
        "nomad-acl" => Some(TEST_TOKEN.to_string()),
        "cf-access-client-id" => Some(TEST_CLIENT_ID.to_string()),
        "cf-access-client-secret" => Some(TEST_CLIENT_SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn test_config(fake: &FakeScheduler) -> SchedulerConfig {
    SchedulerConfig::new(Url::parse(&fake.uri()).unwrap(), test_secrets())
}

pub fn test_client(fake: &FakeScheduler) -> SchedulerClient {
    SchedulerClient::new(&test_config(fake)).unwrap()
}

pub fn test_client_with_timeout(fake: &FakeScheduler, timeout: Duration) -> SchedulerClient {
    SchedulerClient::new(&test_config(fake).with_request_timeout(timeout)).unwrap()
}
