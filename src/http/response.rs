// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use reqwest::StatusCode;
use url::Url;

/// HTTP response representation
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Response body, decoded lossily as UTF-8
    pub body: String,
    /// Final URL (after redirects)
    pub url: Url,
    /// Number of attempts it took, including retries
    pub attempts: u32,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl Response {
    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }
}
