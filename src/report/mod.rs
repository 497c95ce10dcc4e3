// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scan reports
//!
//! Paginated HTML pages for findings and a JSON export of the run summary.

mod html;

pub use html::{escape_html, page_file_name, render_page};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::scan::ScanSummary;

/// Findings per HTML page
pub const FINDINGS_PER_PAGE: usize = 10;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Paginated HTML pages
    Html,
    /// JSON summary
    Json,
}

/// Writes report files into a directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    base: String,
    per_page: usize,
    formats: Vec<ReportFormat>,
}

impl ReportWriter {
    /// Writer producing `<dir>/<base>_page_<n>.html` and
    /// `<dir>/<base>_summary.json`
    pub fn new(dir: impl Into<PathBuf>, base: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base: base.into(),
            per_page: FINDINGS_PER_PAGE,
            formats: vec![ReportFormat::Html, ReportFormat::Json],
        }
    }

    /// Set findings per page
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Restrict output formats
    pub fn formats(mut self, formats: Vec<ReportFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// Get output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of HTML pages for `findings` findings
    pub fn page_count(&self, findings: usize) -> usize {
        findings.div_ceil(self.per_page)
    }

    /// Path of the JSON summary
    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(format!("{}_summary.json", self.base))
    }

    /// Path of HTML page `page` (1-based)
    pub fn page_path(&self, page: usize) -> PathBuf {
        self.dir.join(page_file_name(&self.base, page))
    }

    /// Write every configured format and return the files written.
    ///
    /// No HTML is produced when there are no findings.
    pub fn write(&self, summary: &ScanSummary) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.dir)?;
        let mut written = Vec::new();

        if self.formats.contains(&ReportFormat::Json) {
            let path = self.summary_path();
            std::fs::write(&path, serde_json::to_string_pretty(summary)?)?;
            written.push(path);
        }

        if self.formats.contains(&ReportFormat::Html) {
            written.extend(self.write_pages(summary)?);
        }

        Ok(written)
    }

    fn write_pages(&self, summary: &ScanSummary) -> Result<Vec<PathBuf>> {
        if summary.findings.is_empty() {
            info!("No vulnerabilities found, skipping HTML report");
            return Ok(Vec::new());
        }

        let total_pages = self.page_count(summary.findings.len());
        let mut written = Vec::with_capacity(total_pages);

        for (index, chunk) in summary.findings.chunks(self.per_page).enumerate() {
            let page = index + 1;
            let html = render_page(
                summary,
                &self.base,
                page,
                total_pages,
                chunk,
                index * self.per_page + 1,
            );
            let path = self.page_path(page);
            std::fs::write(&path, html)?;
            info!("Generated HTML report: {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::PoolStats;
    use crate::scan::StatsSnapshot;
    use crate::xss::{Candidate, ConfirmationResult, Dialog, DialogKind, Finding, InjectionPoint};

    fn summary(findings: usize, interrupted: bool) -> ScanSummary {
        let findings = (0..findings)
            .map(|i| {
                let candidate = Candidate {
                    target: "http://test.local/search?q=1".into(),
                    injection: InjectionPoint::Parameter("q".into()),
                    payload: format!("\"><script>alert({})</script>", i),
                    encoding_rounds: 0,
                    url: format!("http://test.local/search?q=%22%3E%3Cscript%3Ealert({})", i),
                };
                let confirmation = ConfirmationResult::dialog(Dialog {
                    kind: DialogKind::Alert,
                    message: i.to_string(),
                });
                Finding::new(&candidate, &confirmation)
            })
            .collect();

        ScanSummary {
            targets: 1,
            payloads: 25,
            stats: StatsSnapshot::default(),
            findings,
            elapsed_secs: 1.5,
            interrupted,
            pool: PoolStats::default(),
        }
    }

    #[test]
    fn test_page_count() {
        let writer = ReportWriter::new(".", "result");
        assert_eq!(writer.page_count(0), 0);
        assert_eq!(writer.page_count(10), 1);
        assert_eq!(writer.page_count(11), 2);
        assert_eq!(writer.page_count(25), 3);
    }

    #[test]
    fn test_pages_written_and_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), "result");

        let written = writer.write(&summary(25, false)).unwrap();
        assert_eq!(written.len(), 4);
        assert!(writer.summary_path().exists());
        assert!(writer.page_path(3).exists());
        assert!(!writer.page_path(4).exists());

        let page = std::fs::read_to_string(writer.page_path(3)).unwrap();
        assert_eq!(page.matches("class=\"vuln-item\"").count(), 5);
        assert!(page.contains("id=\"finding-21\""));
        assert!(page.contains("&lt;script&gt;alert(20)&lt;/script&gt;"));
        assert!(!page.contains("<script>alert"));
        assert!(page.contains("href=\"result_page_2.html\""));
    }

    #[test]
    fn test_no_findings_no_html() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), "result");

        let written = writer.write(&summary(0, false)).unwrap();
        assert_eq!(written, vec![writer.summary_path()]);
        assert!(!writer.page_path(1).exists());
    }

    #[test]
    fn test_interrupted_banner() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), "scan").formats(vec![ReportFormat::Html]);

        writer.write(&summary(1, true)).unwrap();
        let page = std::fs::read_to_string(writer.page_path(1)).unwrap();
        assert!(page.contains("Scan Interrupted"));
        assert!(!page.contains("Scan Duration"));
        assert!(!writer.summary_path().exists());
    }
}
