//! Test support: a wiremock-backed fake of the scheduler HTTP API.
//!
//! Every mock mounted here requires the three credential headers, so a test
//! passing through [`FakeScheduler`] also proves the client sent them.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-nomad-token";
pub const TEST_CLIENT_ID: &str = "test-cf-client-id.access";
pub const TEST_CLIENT_SECRET: &str = "test-cf-client-secret";

/// A job as the fake scheduler reports it.
#[derive(Debug, Clone)]
pub struct FakeJob {
    pub id: String,
    pub name: String,
    /// Raw `ReservedPorts[].Value` entries, one inner vec per network.
    pub networks: Vec<Vec<Value>>,
    /// Delay before the detail response is sent.
    pub delay: Option<Duration>,
}

impl FakeJob {
    /// A job with one network reserving the given ports.
    pub fn new(id: &str, ports: &[u16]) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            networks: vec![ports.iter().map(|p| json!(p)).collect()],
            delay: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_networks(mut self, networks: Vec<Vec<Value>>) -> Self {
        self.networks = networks;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The `GET /v1/job/{id}` body for this job.
    pub fn detail_json(&self) -> Value {
        let networks: Vec<Value> = self
            .networks
            .iter()
            .map(|ports| {
                let reserved: Vec<Value> = ports.iter().map(|v| json!({ "Value": v })).collect();
                json!({ "ReservedPorts": reserved, "DynamicPorts": null })
            })
            .collect();

        json!({
            "ID": self.id,
            "Name": self.name,
            "Type": "service",
            "TaskGroups": [{ "Name": self.id, "Count": 1, "Networks": networks }]
        })
    }
}

/// Fake scheduler API on a local port.
pub struct FakeScheduler {
    server: MockServer,
}

impl FakeScheduler {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to point the client at.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    fn authed(method_name: &str, route: &str) -> wiremock::MockBuilder {
        Mock::given(method(method_name))
            .and(path(route))
            .and(header("X-Nomad-Token", TEST_TOKEN))
            .and(header("CF-Access-Client-Id", TEST_CLIENT_ID))
            .and(header("CF-Access-Client-Secret", TEST_CLIENT_SECRET))
    }

    /// Mount the job listing and one detail endpoint per job.
    ///
    /// Each endpoint expects exactly one request.
    pub async fn with_jobs(&self, jobs: &[FakeJob]) {
        self.mount_listing(jobs).await;
        for job in jobs {
            self.mount_detail(job, Some(1)).await;
        }
    }

    /// Mount only `GET /v1/jobs`, listing `jobs` in order.
    pub async fn mount_listing(&self, jobs: &[FakeJob]) {
        let listing: Vec<Value> = jobs
            .iter()
            .map(|job| json!({ "ID": job.id, "Name": job.name, "Status": "running" }))
            .collect();

        Self::authed("GET", "/v1/jobs")
            .respond_with(ResponseTemplate::new(200).set_body_json(listing))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mount `GET /v1/job/{id}` for one job, optionally verifying the call count.
    pub async fn mount_detail(&self, job: &FakeJob, expect: Option<u64>) {
        let mut response = ResponseTemplate::new(200).set_body_json(job.detail_json());
        if let Some(delay) = job.delay {
            response = response.set_delay(delay);
        }
        let mut mock = Self::authed("GET", &format!("/v1/job/{}", job.id)).respond_with(response);
        if let Some(times) = expect {
            mock = mock.expect(times);
        }
        mock.mount(&self.server).await;
    }

    /// Make the detail endpoint for `id` fail with `status`.
    pub async fn fail_job_detail(&self, id: &str, status: u16) {
        Self::authed("GET", &format!("/v1/job/{id}"))
            .respond_with(ResponseTemplate::new(status).set_body_string("job lookup failed"))
            .mount(&self.server)
            .await;
    }

    /// Mount the parse endpoint, returning `job` for any HCL body.
    pub async fn expect_parse(&self, job: Value, times: u64) {
        Self::authed("POST", "/v1/jobs/parse")
            .and(query_param("namespace", "*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(job))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Mount the parse endpoint with a scheduler-side error.
    pub async fn reject_parse(&self, status: u16, message: &str) {
        Self::authed("POST", "/v1/jobs/parse")
            .respond_with(ResponseTemplate::new(status).set_body_string(message))
            .mount(&self.server)
            .await;
    }

    /// Mount the register endpoint, requiring `{"Job": job}` as the body.
    pub async fn expect_register(&self, job: Value, times: u64) {
        Self::authed("POST", "/v1/jobs")
            .and(body_json(json!({ "Job": job })))
            .respond_with(ResponseTemplate::new(200).set_body_json(register_response()))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// All requests received so far.
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests received for a path.
    pub async fn requests_to(&self, route: &str) -> Vec<Request> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == route)
            .collect()
    }
}

/// A canonical structured job as returned by the parse endpoint.
pub fn parsed_job(id: &str) -> Value {
    json!({
        "ID": id,
        "Name": id,
        "Region": "global",
        "Datacenters": ["scholar"],
        "Type": "service",
        "TaskGroups": [{ "Name": id, "Count": 1 }]
    })
}

/// The acknowledgment returned by the fake register endpoint.
pub fn register_response() -> Value {
    json!({
        "EvalID": "d092fdc0-e1fd-2536-67d8-43af8ca798ac",
        "EvalCreateIndex": 35,
        "JobModifyIndex": 34,
        "Warnings": "",
        "Index": 35,
        "LastIndex": 0,
        "KnownLeader": false
    })
}
