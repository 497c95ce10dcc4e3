// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP reflection pre-filter

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Candidate;
use crate::error::Error;
use crate::http::{mentions_dns, mentions_tls, HttpClient};
use crate::payload::decode;
use crate::scan::CancelSignal;

/// Why a probe could not tell whether the payload reflects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkFault {
    /// Host name did not resolve
    Dns,
    /// TCP/TLS connection was not established in time
    ConnectTimeout,
    /// Connected, but the server did not send data in time
    ReadTimeout,
    /// Certificate verification or handshake failed
    Tls,
    /// Connection refused or reset
    Connection,
    /// Server kept answering 5xx after every retry
    ServerError { status: u16 },
    /// Candidate URL was rejected by the client
    InvalidUrl,
    /// Run was cancelled before the request was issued
    Abandoned,
    /// Anything else
    Other(String),
}

impl NetworkFault {
    /// Classify a client error
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::Timeout { .. } => NetworkFault::ReadTimeout,
            Error::RetriesExhausted { status, .. } => NetworkFault::ServerError { status: *status },
            Error::Url(_) => NetworkFault::InvalidUrl,
            Error::Http(e) => {
                if e.is_builder() {
                    NetworkFault::InvalidUrl
                } else if mentions_tls(e) {
                    NetworkFault::Tls
                } else if mentions_dns(e) {
                    NetworkFault::Dns
                } else if e.is_timeout() && e.is_connect() {
                    NetworkFault::ConnectTimeout
                } else if e.is_timeout() {
                    NetworkFault::ReadTimeout
                } else if e.is_connect() {
                    NetworkFault::Connection
                } else {
                    NetworkFault::Other(e.to_string())
                }
            }
            other => NetworkFault::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for NetworkFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkFault::Dns => write!(f, "DNS resolution failed"),
            NetworkFault::ConnectTimeout => write!(f, "connection timeout"),
            NetworkFault::ReadTimeout => write!(f, "read timeout"),
            NetworkFault::Tls => write!(f, "TLS verification failed"),
            NetworkFault::Connection => write!(f, "connection failed"),
            NetworkFault::ServerError { status } => write!(f, "server error {} after retries", status),
            NetworkFault::InvalidUrl => write!(f, "invalid URL"),
            NetworkFault::Abandoned => write!(f, "abandoned after cancellation"),
            NetworkFault::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Outcome of probing one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReflectionResult {
    /// Decoded payload appears verbatim in the decoded body
    Reflected,
    /// Request succeeded, payload absent
    NotReflected,
    /// Could not test; never counts as "not vulnerable"
    NetworkError(NetworkFault),
}

impl ReflectionResult {
    /// Only this outcome may proceed to confirmation
    pub fn is_reflected(&self) -> bool {
        matches!(self, ReflectionResult::Reflected)
    }

    /// Check if the probe could not be completed
    pub fn is_network_error(&self) -> bool {
        matches!(self, ReflectionResult::NetworkError(_))
    }

    /// Check if the probe was skipped because the run was cancelled
    pub fn is_abandoned(&self) -> bool {
        matches!(self, ReflectionResult::NetworkError(NetworkFault::Abandoned))
    }
}

/// Decode-then-compare reflection test.
///
/// Both sides are percent-decoded once so payloads encoded before injection
/// still match what the server echoes back.
pub fn is_reflected(payload: &str, body: &str) -> bool {
    let decoded_payload = decode(payload, 1);
    if decoded_payload.is_empty() {
        return false;
    }
    decode(body, 1).contains(&decoded_payload)
}

/// Issues one GET per candidate and checks the body for the payload
#[derive(Clone)]
pub struct ReflectionProber {
    client: HttpClient,
}

impl ReflectionProber {
    /// Create a prober sharing `client`
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Get the underlying client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Probe one candidate.
    ///
    /// Timeouts come from the client configuration. Once `cancel` is raised
    /// the probe returns [`NetworkFault::Abandoned`] without a request.
    pub async fn probe(&self, candidate: &Candidate, cancel: &CancelSignal) -> ReflectionResult {
        if cancel.is_cancelled() {
            return ReflectionResult::NetworkError(NetworkFault::Abandoned);
        }

        match self.client.get(&candidate.url).await {
            Ok(response) => {
                if is_reflected(&candidate.payload, &response.body) {
                    debug!("Reflected ({}): {}", response.status_code(), candidate.url);
                    ReflectionResult::Reflected
                } else {
                    debug!("Not reflected ({}): {}", response.status_code(), candidate.url);
                    ReflectionResult::NotReflected
                }
            }
            Err(e) => {
                let fault = NetworkFault::from_error(&e);
                match fault {
                    NetworkFault::ReadTimeout => warn!(
                        "Read timeout during reflection check for {}: server slow, overloaded or delayed by a WAF",
                        candidate.url
                    ),
                    NetworkFault::Tls => warn!("TLS verification failed for {}", candidate.url),
                    _ => warn!("Reflection check failed for {}: {} ({})", candidate.url, fault, e),
                }
                ReflectionResult::NetworkError(fault)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_reflection() {
        let body = r#"<div>Results for "><script>alert(1)</script></div>"#;
        assert!(is_reflected(r#""><script>alert(1)</script>"#, body));
    }

    #[test]
    fn test_stripped_payload_not_reflected() {
        let body = r#"<div>Results for ">alert(1)</div>"#;
        assert!(!is_reflected(r#""><script>alert(1)</script>"#, body));
    }

    #[test]
    fn test_encoded_body_still_matches() {
        let body = "<a href=\"/next?q=%3Cscript%3Ealert(1)%3C/script%3E\">next</a>";
        assert!(is_reflected("<script>alert(1)</script>", body));
    }

    #[test]
    fn test_encoded_payload_matches_raw_body() {
        assert!(is_reflected("%3Csvg%20onload%3Dalert(1)%3E", "<svg onload=alert(1)>"));
    }

    #[test]
    fn test_empty_payload_never_reflects() {
        assert!(!is_reflected("", "anything"));
    }

    #[test]
    fn test_result_predicates() {
        assert!(ReflectionResult::Reflected.is_reflected());
        assert!(!ReflectionResult::NotReflected.is_network_error());
        let abandoned = ReflectionResult::NetworkError(NetworkFault::Abandoned);
        assert!(abandoned.is_network_error());
        assert!(abandoned.is_abandoned());
        assert!(!abandoned.is_reflected());
    }

    #[test]
    fn test_fault_classification() {
        let err = Error::RetriesExhausted {
            url: "http://test.local/".into(),
            status: 503,
            attempts: 3,
        };
        assert_eq!(NetworkFault::from_error(&err), NetworkFault::ServerError { status: 503 });

        let err = Error::timeout_with_url("read response body", 20_000, "http://test.local/");
        assert_eq!(NetworkFault::from_error(&err), NetworkFault::ReadTimeout);
    }

    #[tokio::test]
    async fn test_probe_after_cancel_issues_no_request() {
        let prober = ReflectionProber::new(HttpClient::new().unwrap());
        let cancel = CancelSignal::new();
        cancel.cancel();

        let candidate = Candidate {
            target: "http://127.0.0.1:9/".into(),
            injection: super::super::InjectionPoint::Appended,
            payload: "<b>".into(),
            encoding_rounds: 0,
            url: "http://127.0.0.1:9/<b>".into(),
        };

        assert!(prober.probe(&candidate, &cancel).await.is_abandoned());
    }
}
