//! HTTP client for the scheduler API.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::error::CliError;

pub const NOMAD_TOKEN_HEADER: &str = "X-Nomad-Token";
pub const CF_CLIENT_ID_HEADER: &str = "CF-Access-Client-Id";
pub const CF_CLIENT_SECRET_HEADER: &str = "CF-Access-Client-Secret";

/// Client bound to one scheduler, carrying the credential headers.
///
/// Built once at startup and shared by reference; cloning is cheap.
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    client: reqwest::Client,
    base_url: Url,
}

impl SchedulerClient {
    /// Create a new client from config.
    pub fn new(config: &SchedulerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let secrets = &config.secrets;
        for (name, value) in [
            (NOMAD_TOKEN_HEADER, &secrets.nomad_token),
            (CF_CLIENT_ID_HEADER, &secrets.cf_client_id),
            (CF_CLIENT_SECRET_HEADER, &secrets.cf_client_secret),
        ] {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name {name}"))?;
            headers.insert(header_name, sensitive(name, value)?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments.
    ///
    /// Segments are percent-encoded, so job ids can be passed verbatim.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, CliError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CliError::Other(anyhow::anyhow!(
                    "scheduler address {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request.
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, CliError> {
        debug!(method = "GET", path = %url.path(), "Sending request");
        let response = self.client.get(url.clone()).send().await?;

        self.handle_response("GET", &url, response).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, CliError> {
        debug!(method = "POST", path = %url.path(), "Sending request");
        let response = self.client.post(url.clone()).json(body).send().await?;

        self.handle_response("POST", &url, response).await
    }

    /// Handle a successful or error response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &Url,
        response: reqwest::Response,
    ) -> Result<T, CliError> {
        let status = response.status();
        debug!(method, path = %url.path(), status = status.as_u16(), "Received response");

        if !status.is_success() {
            // The scheduler returns plain-text error bodies.
            let body = response.text().await.unwrap_or_default();
            return Err(CliError::Api {
                method,
                path: url.path().to_string(),
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| CliError::decode(url.path(), e))
    }
}

fn sensitive(name: &str, value: &Secret<String>) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value.expose_secret())
        .with_context(|| format!("Invalid {name} header value"))?;
    header.set_sensitive(true);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Secrets;

    fn client(base: &str) -> SchedulerClient {
        let secrets = Secrets::from_lookup(|name| Some(format!("{name}-value"))).unwrap();
        let config = SchedulerConfig::new(Url::parse(base).unwrap(), secrets);
        SchedulerClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_building() {
        let client = client("https://nomad.example.com");
        let url = client.endpoint(&["v1", "jobs"]).unwrap();
        assert_eq!(url.as_str(), "https://nomad.example.com/v1/jobs");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = client("https://gateway.example.com/nomad/");
        let url = client.endpoint(&["v1", "job", "web"]).unwrap();
        assert_eq!(url.as_str(), "https://gateway.example.com/nomad/v1/job/web");
    }

    #[test]
    fn test_endpoint_encodes_job_ids() {
        let client = client("https://nomad.example.com");
        let url = client.endpoint(&["v1", "job", "a b/c?d"]).unwrap();
        assert_eq!(url.path(), "/v1/job/a%20b%2Fc%3Fd");
    }

    #[test]
    fn test_rejects_header_unsafe_secret() {
        let secrets = Secrets::from_lookup(|name| {
            Some(if name == "nomad-acl" { "bad\nvalue".to_string() } else { "ok".to_string() })
        })
        .unwrap();
        let config = SchedulerConfig::new(Url::parse("https://x").unwrap(), secrets);
        assert!(SchedulerClient::new(&config).is_err());
    }
}
