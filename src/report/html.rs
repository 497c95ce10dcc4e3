// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML report pages

use std::fmt::Write;

use chrono::Utc;

use crate::scan::ScanSummary;
use crate::xss::Finding;

const STYLE: &str = r#"
    body { background: #0f172a; color: #e2e8f0; font-family: Inter, system-ui, sans-serif; margin: 0; }
    .container { max-width: 1100px; margin: 0 auto; padding: 2rem; }
    header { display: flex; align-items: center; justify-content: space-between; }
    .metrics-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; margin: 1.5rem 0; }
    .metric-card { background: #1e293b; border-radius: 8px; padding: 1rem; border-left: 4px solid #3b82f6; }
    .metric-card.red { border-color: #ef4444; }
    .metric-card.green { border-color: #22c55e; }
    .metric-card.cyan { border-color: #06b6d4; }
    .metric-value { font-size: 2rem; font-weight: 700; }
    .metric-detail { color: #94a3b8; font-size: 0.85rem; }
    .badge { background: #ef4444; color: #fff; border-radius: 4px; padding: 0.2rem 0.5rem; }
    .vuln-item { background: #1e293b; border-radius: 8px; padding: 1rem; margin-bottom: 0.75rem; }
    .vuln-label { color: #94a3b8; font-size: 0.8rem; }
    .vuln-data { font-family: ui-monospace, monospace; word-break: break-all; }
    .vuln-data a { color: #06b6d4; }
    .pagination { display: flex; gap: 0.5rem; list-style: none; padding: 0; }
    .page-item a { color: #e2e8f0; padding: 0.3rem 0.6rem; border: 1px solid #334155; border-radius: 4px; text-decoration: none; }
    .page-item.active a { background: #06b6d4; color: #0f172a; }
    .page-item.disabled a { pointer-events: none; opacity: 0.4; }
    footer { color: #64748b; margin-top: 2rem; font-size: 0.8rem; }
"#;

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// File name of page `page` (1-based)
pub fn page_file_name(base: &str, page: usize) -> String {
    format!("{}_page_{}.html", base, page)
}

/// Render one report page.
///
/// `findings` are the findings of this page; `first_index` is the 1-based
/// number of the first one.
pub fn render_page(
    summary: &ScanSummary,
    base: &str,
    page: usize,
    total_pages: usize,
    findings: &[Finding],
    first_index: usize,
) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>LazyXSS Scan Report - Page {page}/{total_pages}</title>
  <style>{STYLE}</style>
</head>
<body>
<div class="container">
  <header>
    <h1>LazyXSS Scan Report</h1>
    {banner}
  </header>
  <main>
    <div class="metrics-grid">
"#,
        banner = if summary.interrupted {
            r#"<span class="badge">Scan Interrupted</span>"#
        } else {
            ""
        },
    );

    metric_card(&mut html, "", "URLs Tested", summary.targets, "Total URLs scanned");
    metric_card(
        &mut html,
        "red",
        "Vulnerabilities Found",
        summary.vulnerable(),
        "Reflected &amp; confirmed XSS",
    );
    if !summary.interrupted {
        metric_card(
            &mut html,
            "green",
            "Non-Vulnerable",
            summary.not_vulnerable(),
            "Candidates without confirmed XSS",
        );
        metric_card(
            &mut html,
            "cyan",
            "Scan Duration",
            format!("{:.2}s", summary.elapsed_secs),
            "Total time elapsed",
        );
    }

    html.push_str("    </div>\n    <h2>Detected Vulnerabilities</h2>\n");

    for (offset, finding) in findings.iter().enumerate() {
        let url = escape_html(&finding.url);
        let _ = write!(
            html,
            r#"    <div class="vuln-item" id="finding-{index}">
      <div class="vuln-label">URL:</div>
      <div class="vuln-data"><a href="{url}" target="_blank" rel="noopener noreferrer">{url}</a></div>
      <div class="vuln-label">Payload:</div>
      <div class="vuln-data">{payload}</div>
"#,
            index = first_index + offset,
            payload = escape_html(&finding.payload),
        );
        if let Some(ref param) = finding.parameter {
            let _ = write!(
                html,
                "      <div class=\"vuln-label\">Parameter:</div>\n      <div class=\"vuln-data\">{}</div>\n",
                escape_html(param)
            );
        }
        if let Some(ref dialog) = finding.dialog {
            let _ = write!(
                html,
                "      <div class=\"vuln-label\">Dialog ({}):</div>\n      <div class=\"vuln-data\">{}</div>\n",
                dialog.kind,
                escape_html(&dialog.message)
            );
        }
        html.push_str("    </div>\n");
    }

    if total_pages > 1 {
        pagination(&mut html, base, page, total_pages);
    }

    let _ = write!(
        html,
        r#"  </main>
  <footer>LazyXSS Scanner | Generated: {}</footer>
</div>
</body>
</html>
"#,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );

    html
}

fn metric_card(
    html: &mut String,
    class: &str,
    title: &str,
    value: impl std::fmt::Display,
    detail: &str,
) {
    let _ = write!(
        html,
        r#"      <div class="metric-card {class}">
        <div>{title}</div>
        <div class="metric-value">{value}</div>
        <div class="metric-detail">{detail}</div>
      </div>
"#
    );
}

fn pagination(html: &mut String, base: &str, page: usize, total_pages: usize) {
    let base = escape_html(base);
    html.push_str("    <nav aria-label=\"Vulnerability pages\"><ul class=\"pagination\">");

    if page > 1 {
        let _ = write!(
            html,
            r#"<li class="page-item"><a href="{}">&laquo; Prev</a></li>"#,
            page_file_name(&base, page - 1)
        );
    } else {
        html.push_str(r##"<li class="page-item disabled"><a href="#">&laquo; Prev</a></li>"##);
    }

    for n in 1..=total_pages {
        let active = if n == page { " active" } else { "" };
        let _ = write!(
            html,
            r#"<li class="page-item{}"><a href="{}">{}</a></li>"#,
            active,
            page_file_name(&base, n),
            n
        );
    }

    if page < total_pages {
        let _ = write!(
            html,
            r#"<li class="page-item"><a href="{}">Next &raquo;</a></li>"#,
            page_file_name(&base, page + 1)
        );
    } else {
        html.push_str(r##"<li class="page-item disabled"><a href="#">Next &raquo;</a></li>"##);
    }

    html.push_str("</ul></nav>\n");
}
