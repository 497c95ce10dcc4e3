// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Newline-delimited input files

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Read a file and return its trimmed, non-blank lines in order
pub fn load_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::config(format!(
            "File '{}' does not exist",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path)?;
    let lines: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    debug!("Loaded {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Load the payload corpus, deduplicated in first-seen order
pub fn load_payloads(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut seen = HashSet::new();
    let payloads: Vec<String> = load_lines(path)?
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect();

    if payloads.is_empty() {
        return Err(Error::config(format!(
            "Payload file '{}' is empty",
            path.display()
        )));
    }
    Ok(payloads)
}

/// Load the target URL list
pub fn load_targets(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let targets = load_lines(path)?;
    if targets.is_empty() {
        return Err(Error::config(format!(
            "No valid URLs found in '{}'",
            path.display()
        )));
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_blank_lines_ignored() {
        let file = write_temp("http://a.test/?q=1\n\n   \nhttp://b.test/\n");
        let targets = load_targets(file.path()).unwrap();
        assert_eq!(targets, vec!["http://a.test/?q=1", "http://b.test/"]);
    }

    #[test]
    fn test_payloads_deduplicated_in_order() {
        let file = write_temp("<b>\n<script>alert(1)</script>\n<b>\n  <i>  \n");
        let payloads = load_payloads(file.path()).unwrap();
        assert_eq!(payloads, vec!["<b>", "<script>alert(1)</script>", "<i>"]);
    }

    #[test]
    fn test_empty_payload_file_is_fatal() {
        let file = write_temp("\n\n");
        let err = load_payloads(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_lines("/nonexistent/lazyxss/payloads.txt").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
