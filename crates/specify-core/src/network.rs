//! HTTP access to the template release channel.

use crate::error::{Result, SpecifyError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TEMPLATE_REPO: &str = "github/spec-kit";

const USER_AGENT: &str = concat!("specify/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Where to look for template releases.
#[derive(Debug, Clone)]
pub struct ReleaseChannel {
    pub api_base: String,
    pub repo: String,
}

impl Default for ReleaseChannel {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            repo: DEFAULT_TEMPLATE_REPO.to_string(),
        }
    }
}

impl ReleaseChannel {
    /// Defaults overridden by `SPECIFY_GITHUB_API` and `SPECIFY_TEMPLATE_REPO`.
    pub fn from_env() -> Self {
        let mut channel = Self::default();
        if let Ok(base) = std::env::var("SPECIFY_GITHUB_API") {
            if !base.trim().is_empty() {
                channel.api_base = base.trim().to_string();
            }
        }
        if let Ok(repo) = std::env::var("SPECIFY_TEMPLATE_REPO") {
            if !repo.trim().is_empty() {
                channel.repo = repo.trim().to_string();
            }
        }
        channel
    }

    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/releases/latest",
            self.api_base.trim_end_matches('/'),
            self.repo
        )
    }
}

/// Build the blocking HTTP client. `skip_tls` disables certificate validation.
pub fn http_client(skip_tls: bool) -> Result<Client> {
    if skip_tls {
        tracing::warn!("TLS certificate verification disabled; use only for local experimentation");
    }
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .danger_accept_invalid_certs(skip_tls)
        .build()?;
    Ok(client)
}

/// Fetch the latest published template release.
pub fn latest_release(client: &Client, channel: &ReleaseChannel) -> Result<ReleaseInfo> {
    let url = channel.latest_release_url();
    tracing::debug!(%url, "querying latest template release");

    let mut request = client
        .get(&url)
        .header("Accept", "application/vnd.github+json");
    if let Ok(token) = std::env::var("GH_TOKEN").or_else(|_| std::env::var("GITHUB_TOKEN")) {
        if !token.trim().is_empty() {
            request = request.bearer_auth(token.trim());
        }
    }

    let response = request.send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(SpecifyError::Http(format!("GET {url} returned {status}")));
    }
    let release: ReleaseInfo = response.json()?;
    Ok(release)
}

/// Outcome of a release check, suitable for reporting without failing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReleaseCheck {
    Skipped,
    Reachable { release: ReleaseInfo },
    Unreachable { reason: String },
}

pub fn check_release(channel: &ReleaseChannel, skip_tls: bool) -> ReleaseCheck {
    let outcome = http_client(skip_tls).and_then(|client| latest_release(&client, channel));
    match outcome {
        Ok(release) => ReleaseCheck::Reachable { release },
        Err(e) => {
            tracing::warn!(error = %e, "template release check failed");
            ReleaseCheck::Unreachable {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_for(server: &mockito::Server) -> ReleaseChannel {
        ReleaseChannel {
            api_base: server.url(),
            repo: "acme/templates".to_string(),
        }
    }

    #[test]
    fn latest_release_url_trims_trailing_slash() {
        let channel = ReleaseChannel {
            api_base: "https://example.test/".to_string(),
            repo: "o/r".to_string(),
        };
        assert_eq!(
            channel.latest_release_url(),
            "https://example.test/repos/o/r/releases/latest"
        );
    }

    #[test]
    fn latest_release_parses_tag() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/repos/acme/templates/releases/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tag_name":"v0.0.42","html_url":"https://example.test/r"}"#)
            .create();

        let client = http_client(false).unwrap();
        let release = latest_release(&client, &channel_for(&server)).unwrap();
        assert_eq!(release.tag_name, "v0.0.42");
        assert_eq!(release.html_url.as_deref(), Some("https://example.test/r"));
        mock.assert();
    }

    #[test]
    fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/repos/acme/templates/releases/latest")
            .with_status(404)
            .create();

        let client = http_client(true).unwrap();
        let err = latest_release(&client, &channel_for(&server)).unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn check_reports_unreachable_instead_of_failing() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/repos/acme/templates/releases/latest")
            .with_status(500)
            .create();

        match check_release(&channel_for(&server), false) {
            ReleaseCheck::Unreachable { reason } => assert!(reason.contains("500")),
            other => panic!("expected unreachable, got {other:?}"),
        }
    }
}
