//! Scheduler connection configuration.
//!
//! Handles:
//! - Base URL resolution (`https://{domain}` or an explicit address)
//! - Credential loading from the step environment
//! - Request timeout

use std::time::Duration;

use reqwest::Url;
use secrecy::Secret;

use crate::error::CliError;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Scheduler access token (`X-Nomad-Token`).
pub const NOMAD_ACL: &str = "nomad-acl";

/// Edge gateway client id (`CF-Access-Client-Id`).
pub const CF_ACCESS_CLIENT_ID: &str = "cf-access-client-id";

/// Edge gateway client secret (`CF-Access-Client-Secret`).
pub const CF_ACCESS_CLIENT_SECRET: &str = "cf-access-client-secret";

/// Credentials sent on every scheduler request.
///
/// Never accepted as command-line flags.
pub struct Secrets {
    pub nomad_token: Secret<String>,
    pub cf_client_id: Secret<String>,
    pub cf_client_secret: Secret<String>,
}

impl Secrets {
    /// Load credentials from the process environment.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through `lookup`.
    ///
    /// Each secret is read under its dashed name first, then its upper-snake
    /// alias (`nomad-acl`, then `NOMAD_ACL`). Empty values count as missing,
    /// and the error lists every missing name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let read = |name: &str| {
            let alias = name.replace('-', "_").to_uppercase();
            lookup(name)
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(&alias).filter(|v| !v.is_empty()))
        };

        let nomad_token = read(NOMAD_ACL);
        let cf_client_id = read(CF_ACCESS_CLIENT_ID);
        let cf_client_secret = read(CF_ACCESS_CLIENT_SECRET);

        match (nomad_token, cf_client_id, cf_client_secret) {
            (Some(token), Some(id), Some(secret)) => Ok(Self {
                nomad_token: Secret::new(token),
                cf_client_id: Secret::new(id),
                cf_client_secret: Secret::new(secret),
            }),
            (token, id, secret) => {
                let missing = [
                    (token.is_none(), NOMAD_ACL),
                    (id.is_none(), CF_ACCESS_CLIENT_ID),
                    (secret.is_none(), CF_ACCESS_CLIENT_SECRET),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                Err(CliError::Configuration { missing })
            }
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets").finish_non_exhaustive()
    }
}

/// Everything needed to build a scheduler client.
#[derive(Debug)]
pub struct SchedulerConfig {
    pub base_url: Url,
    pub secrets: Secrets,
    pub request_timeout: Duration,
}

impl SchedulerConfig {
    pub fn new(base_url: Url, secrets: Secrets) -> Self {
        Self {
            base_url,
            secrets,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Resolve the scheduler base URL.
///
/// An explicit address wins; otherwise the domain is served over HTTPS.
pub fn base_url(domain: Option<&str>, addr: Option<&str>) -> Result<Url, CliError> {
    let raw = match (addr.map(str::trim), domain.map(str::trim)) {
        (Some(addr), _) if !addr.is_empty() => addr.to_string(),
        (_, Some(domain)) if !domain.is_empty() => format!("https://{domain}"),
        _ => return Err(CliError::missing("nomad-domain")),
    };

    let url = Url::parse(&raw)
        .map_err(|e| CliError::Other(anyhow::anyhow!("invalid scheduler address {raw:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(CliError::Other(anyhow::anyhow!(
            "invalid scheduler address {raw:?}: not a base URL"
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;
    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_secrets_from_dashed_names() {
        let secrets = Secrets::from_lookup(lookup(&[
            ("nomad-acl", "tok"),
            ("cf-access-client-id", "id"),
            ("cf-access-client-secret", "secret"),
        ]))
        .unwrap();
        assert_eq!(secrets.nomad_token.expose_secret(), "tok");
        assert_eq!(secrets.cf_client_id.expose_secret(), "id");
        assert_eq!(secrets.cf_client_secret.expose_secret(), "secret");
    }

    #[test]
    fn test_secrets_fall_back_to_upper_snake_aliases() {
        let secrets = Secrets::from_lookup(lookup(&[
            ("nomad-acl", ""),
            ("NOMAD_ACL", "tok"),
            ("CF_ACCESS_CLIENT_ID", "id"),
            ("CF_ACCESS_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(secrets.nomad_token.expose_secret(), "tok");
    }

    #[test]
    fn test_missing_secrets_are_listed() {
        let err = Secrets::from_lookup(lookup(&[("cf-access-client-id", "id")])).unwrap_err();
        match err {
            CliError::Configuration { missing } => {
                assert_eq!(missing, vec!["nomad-acl", "cf-access-client-secret"]);
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_secrets_debug_hides_values() {
        let secrets = Secrets::from_lookup(lookup(&[
            ("nomad-acl", "tok"),
            ("cf-access-client-id", "id"),
            ("cf-access-client-secret", "secret"),
        ]))
        .unwrap();
        assert!(!format!("{secrets:?}").contains("tok"));
    }

    #[rstest]
    #[case::domain(Some("nomad.example.com"), None, "https://nomad.example.com/")]
    #[case::domain_trimmed(Some(" nomad.example.com "), None, "https://nomad.example.com/")]
    #[case::address_wins(Some("nomad.example.com"), Some("http://127.0.0.1:4646"), "http://127.0.0.1:4646/")]
    #[case::empty_address_ignored(Some("nomad.example.com"), Some(""), "https://nomad.example.com/")]
    #[case::address_with_prefix(None, Some("https://edge.example.com/nomad"), "https://edge.example.com/nomad")]
    fn test_base_url(
        #[case] domain: Option<&str>,
        #[case] addr: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(base_url(domain, addr).unwrap().as_str(), expected);
    }

    #[test]
    fn test_base_url_requires_domain() {
        assert!(matches!(
            base_url(Some("  "), None),
            Err(CliError::Configuration { .. })
        ));
        assert!(base_url(Some("bad domain"), None).is_err());
    }
}
