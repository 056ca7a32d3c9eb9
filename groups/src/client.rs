//! HTTP membership oracle backed by a group's verification endpoint.

use crate::error::GroupError;

use agora_governance::{MembershipOracle, OracleError};
use agora_types::Address;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for group verification requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Parsed answer of a group's verification endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberStatus {
    /// Whether the address is currently a valid member.
    pub valid: bool,
    /// Optional trust score [0.0, 1.0] assigned by the group.
    pub score: Option<f64>,
    /// Optional membership start (Unix seconds).
    pub since: Option<u64>,
}

/// Raw JSON response from a group's verification endpoint.
///
/// The API contract: `GET /verify/{address}` returns
/// `{"valid": bool, "score": float?, "since": timestamp?}`.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    valid: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    since: Option<u64>,
}

/// Membership oracle that asks a group endpoint on every call.
///
/// Timeouts and connection failures surface as
/// [`OracleError::Unreachable`], never as "not a member".
pub struct HttpMembershipOracle {
    base: Url,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::blocking::Client,
}

impl HttpMembershipOracle {
    /// Create an oracle for `endpoint` with default timeout settings.
    pub fn new(endpoint: &str) -> Result<Self, GroupError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create an oracle with a custom request timeout.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, GroupError> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| GroupError::RequestFailed(format!("failed to build HTTP client: {e}")))?;
        Self::with_client(endpoint, http_client)
    }

    /// Create an oracle around a preconfigured client (proxies, TLS roots, ...).
    pub fn with_client(
        endpoint: &str,
        http_client: reqwest::blocking::Client,
    ) -> Result<Self, GroupError> {
        let base = Url::parse(endpoint)
            .map_err(|e| GroupError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(GroupError::InvalidEndpoint(endpoint.to_string()));
        }
        Ok(Self { base, http_client })
    }

    /// `{endpoint}/verify/{address}`, with the address percent-encoded as
    /// a single path segment.
    pub fn verify_url(&self, address: &Address) -> Result<Url, GroupError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GroupError::InvalidEndpoint(self.base.to_string()))?
            .pop_if_empty()
            .push("verify")
            .push(address.as_str());
        Ok(url)
    }

    /// Query the group for `address`.
    pub fn verify_member(&self, address: &Address) -> Result<MemberStatus, GroupError> {
        let url = self.verify_url(address)?;

        let response = self.http_client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                GroupError::Unreachable(format!("request timed out: {e}"))
            } else if e.is_connect() {
                GroupError::Unreachable(format!("connection failed: {e}"))
            } else {
                GroupError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(GroupError::Unreachable(format!("HTTP status {status}")));
        }
        if !status.is_success() {
            return Err(GroupError::RequestFailed(format!("HTTP status {status}")));
        }

        let body = response
            .text()
            .map_err(|e| GroupError::InvalidResponse(format!("failed to read body: {e}")))?;
        parse_verify_response(&body)
    }
}

fn parse_verify_response(body: &str) -> Result<MemberStatus, GroupError> {
    let resp: VerifyResponse = serde_json::from_str(body).map_err(|e| {
        GroupError::InvalidResponse(format!("failed to parse verification response: {e}"))
    })?;
    Ok(MemberStatus {
        valid: resp.valid,
        score: resp.score,
        since: resp.since,
    })
}

impl MembershipOracle for HttpMembershipOracle {
    fn is_member(&self, address: &Address) -> Result<bool, OracleError> {
        match self.verify_member(address) {
            Ok(status) => {
                tracing::trace!(address = %address, valid = status.valid, "group verification answered");
                Ok(status.valid)
            }
            Err(e) => Err(e.into()),
        }
    }
}
