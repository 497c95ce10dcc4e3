// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Reflected XSS pipeline
//!
//! Provides the two verification stages and the values flowing between them:
//! - Candidate generation from a target and a payload corpus
//! - Cheap HTTP reflection probing
//! - Browser confirmation through JavaScript dialog interception

mod confirm;
mod reflection;
mod variation;

pub use confirm::{ConfirmationEngine, ConfirmationOutcome, ConfirmationResult};
pub use reflection::{is_reflected, NetworkFault, ReflectionProber, ReflectionResult};
pub use variation::VariationGenerator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a payload was placed in the target URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjectionPoint {
    /// Payload concatenated to the end of the base URL
    Appended,
    /// Value of an existing query parameter replaced by the payload
    Parameter(String),
    /// Target URL could not be parsed; tested unmodified
    Unmodified,
}

/// One concrete (target, parameter, payload) combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Base URL the candidate was derived from
    pub target: String,
    /// How the payload was injected
    pub injection: InjectionPoint,
    /// Payload as it appears in the corpus
    pub payload: String,
    /// Percent-encoding rounds applied before injection
    pub encoding_rounds: u32,
    /// Materialized test URL
    pub url: String,
}

impl Candidate {
    /// Parameter responsible for the injection, if it can be determined.
    ///
    /// An appended payload lands in the last query parameter when the base
    /// URL ends inside a query string.
    pub fn parameter(&self) -> Option<String> {
        match &self.injection {
            InjectionPoint::Parameter(name) => Some(name.clone()),
            InjectionPoint::Appended => url::Url::parse(&self.target).ok().and_then(|u| {
                if u.fragment().is_some() {
                    return None;
                }
                u.query_pairs().last().map(|(name, _)| name.into_owned())
            }),
            InjectionPoint::Unmodified => None,
        }
    }
}

/// JavaScript dialog types that prove execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogKind {
    /// alert() was called
    Alert,
    /// confirm() was called
    Confirm,
    /// prompt() was called
    Prompt,
    /// beforeunload handler fired
    BeforeUnload,
}

impl std::fmt::Display for DialogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DialogKind::Alert => "alert",
            DialogKind::Confirm => "confirm",
            DialogKind::Prompt => "prompt",
            DialogKind::BeforeUnload => "beforeunload",
        };
        f.write_str(name)
    }
}

/// A dialog captured during confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    /// Dialog type
    pub kind: DialogKind,
    /// Message passed to the dialog
    pub message: String,
}

/// A candidate confirmed to execute script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Full URL with the injected payload
    pub url: String,
    /// Payload as it appears in the corpus
    pub payload: String,
    /// Parameter responsible, when determinable
    pub parameter: Option<String>,
    /// Base URL
    pub target: String,
    /// Encoding rounds applied
    pub encoding_rounds: u32,
    /// Dialog that fired
    pub dialog: Option<Dialog>,
    /// When the confirmation completed
    pub confirmed_at: DateTime<Utc>,
}

impl Finding {
    /// Build a finding from a candidate and its confirmation
    pub fn new(candidate: &Candidate, confirmation: &ConfirmationResult) -> Self {
        Self {
            url: candidate.url.clone(),
            payload: candidate.payload.clone(),
            parameter: candidate.parameter(),
            target: candidate.target.clone(),
            encoding_rounds: candidate.encoding_rounds,
            dialog: confirmation.dialog.clone(),
            confirmed_at: Utc::now(),
        }
    }

    /// Captured dialog text, if any
    pub fn dialog_text(&self) -> Option<&str> {
        self.dialog.as_ref().map(|d| d.message.as_str())
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)?;
        if let Some(ref param) = self.parameter {
            write!(f, " [param: {}]", param)?;
        }
        if let Some(ref dialog) = self.dialog {
            write!(f, " [{}: {}]", dialog.kind, dialog.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(target: &str, injection: InjectionPoint) -> Candidate {
        Candidate {
            target: target.to_string(),
            injection,
            payload: "<b>".to_string(),
            encoding_rounds: 0,
            url: format!("{}<b>", target),
        }
    }

    #[test]
    fn test_parameter_from_replacement() {
        let c = candidate(
            "http://test.local/search?q=1&page=2",
            InjectionPoint::Parameter("q".into()),
        );
        assert_eq!(c.parameter().as_deref(), Some("q"));
    }

    #[test]
    fn test_parameter_from_append_is_last_param() {
        let c = candidate("http://test.local/search?q=1&page=", InjectionPoint::Appended);
        assert_eq!(c.parameter().as_deref(), Some("page"));

        let c = candidate("http://test.local/search", InjectionPoint::Appended);
        assert_eq!(c.parameter(), None);
    }

    #[test]
    fn test_finding_display() {
        let c = candidate("http://test.local/?q=", InjectionPoint::Appended);
        let confirmation = ConfirmationResult::dialog(Dialog {
            kind: DialogKind::Alert,
            message: "1".into(),
        });
        let finding = Finding::new(&c, &confirmation);

        assert_eq!(finding.dialog_text(), Some("1"));
        assert_eq!(
            finding.to_string(),
            "http://test.local/?q=<b> [param: q] [alert: 1]"
        );
    }
}
