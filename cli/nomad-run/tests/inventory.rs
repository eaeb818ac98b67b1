//! Integration tests for the inventory reader.
//!
//! Every test runs against a wiremock scheduler that only answers requests
//! carrying the three credential headers.

mod common;

use std::time::{Duration, Instant};

use nomad_run::error::CliError;
use nomad_run::inventory::{get_all_jobs, get_job_info, list_jobs};
use nomad_run_testing::{FakeJob, FakeScheduler};
use serde_json::json;

use common::{test_client, test_client_with_timeout};

fn ports(info: &nomad_run_reconcile::JobInfo) -> Vec<u16> {
    info.ports.iter().map(|p| p.get()).collect()
}

#[tokio::test]
async fn test_empty_cluster() {
    let fake = FakeScheduler::start().await;
    fake.with_jobs(&[]).await;

    let inventory = get_all_jobs(&test_client(&fake)).await.unwrap();
    assert!(inventory.is_empty());
}

#[tokio::test]
async fn test_list_jobs_keeps_scheduler_order() {
    let fake = FakeScheduler::start().await;
    fake.mount_listing(&[
        FakeJob::new("zeta", &[]),
        FakeJob::new("alpha", &[]),
        FakeJob::new("mid", &[]),
    ])
    .await;

    let ids = list_jobs(&test_client(&fake)).await.unwrap();
    assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn test_inventory_keeps_listing_order_under_uneven_latency() {
    let fake = FakeScheduler::start().await;
    fake.with_jobs(&[
        FakeJob::new("slow", &[8080]).delayed(Duration::from_millis(300)),
        FakeJob::new("fast", &[8081]),
        FakeJob::new("medium", &[8082]).delayed(Duration::from_millis(100)),
    ])
    .await;

    let inventory = get_all_jobs(&test_client(&fake)).await.unwrap();
    let ids: Vec<&str> = inventory.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["slow", "fast", "medium"]);
    assert_eq!(ports(&inventory[0]), vec![8080]);
    assert_eq!(ports(&inventory[2]), vec![8082]);
}

#[tokio::test]
async fn test_detail_fetches_run_concurrently() {
    let fake = FakeScheduler::start().await;
    let delay = Duration::from_millis(400);
    fake.with_jobs(&[
        FakeJob::new("a", &[1001]).delayed(delay),
        FakeJob::new("b", &[1002]).delayed(delay),
        FakeJob::new("c", &[1003]).delayed(delay),
    ])
    .await;

    let started = Instant::now();
    let inventory = get_all_jobs(&test_client(&fake)).await.unwrap();
    assert_eq!(inventory.len(), 3);
    // Sequential fetches would take at least 1.2s.
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_reserved_ports_flatten_and_drop_falsy_values() {
    let fake = FakeScheduler::start().await;
    let job = FakeJob::new("web", &[])
        .named("Web Frontend")
        .with_networks(vec![
            vec![json!(0), json!(""), json!(8080)],
            vec![json!(null), json!(false), json!("9090")],
        ]);
    fake.mount_detail(&job, Some(1)).await;

    let info = get_job_info(&test_client(&fake), "web").await.unwrap();
    assert_eq!(info.id, "web");
    assert_eq!(info.name, "Web Frontend");
    assert_eq!(ports(&info), vec![8080, 9090]);
}

#[tokio::test]
async fn test_failing_detail_fails_the_read() {
    let fake = FakeScheduler::start().await;
    let healthy = FakeJob::new("healthy", &[8080]);
    let broken = FakeJob::new("broken", &[8081]);
    fake.mount_listing(&[healthy.clone(), broken]).await;
    fake.mount_detail(&healthy, None).await;
    fake.fail_job_detail("broken", 500).await;

    match get_all_jobs(&test_client(&fake)).await {
        Err(CliError::Api { status, path, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(path, "/v1/job/broken");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_request_timeout_is_a_network_error() {
    let fake = FakeScheduler::start().await;
    let slow = FakeJob::new("slow", &[8080]).delayed(Duration::from_secs(2));
    fake.mount_listing(&[slow.clone()]).await;
    fake.mount_detail(&slow, None).await;

    let client = test_client_with_timeout(&fake, Duration::from_millis(200));
    assert!(matches!(
        get_all_jobs(&client).await,
        Err(CliError::Network(_))
    ));
}
