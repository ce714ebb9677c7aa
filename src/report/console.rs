use std::fmt::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use super::target_passed;
use crate::probe::prelude::*;

const BANNER: &str = "========== Network Diagnostic Summary ==========";
const RULE_WIDTH: usize = 50;
const MAX_URL_WIDTH: usize = 60;

fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::UnicodeTruncateStr;

    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

fn raw<T: Serialize>(value: Option<&T>) -> String {
    match value {
        Some(value) => serde_json::to_string(value).unwrap_or_else(|e| format!("<{e}>")),
        None => "N/A".to_string(),
    }
}

/// The per-target summary block printed after a run.
pub fn render_summary(results: &[DiagnosticResult]) -> String {
    let url_width = results
        .iter()
        .map(|r| r.url.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_URL_WIDTH);

    let mut out = String::new();
    let _ = writeln!(out, "\n{BANNER}\n");

    for res in results {
        let status = if target_passed(res) {
            "OK".green()
        } else {
            "FAILED".red()
        };
        // Urls longer than the column are printed whole.
        let url = if res.url.chars().count() > url_width {
            res.url.clone()
        } else {
            to_fixed_width(&res.url, url_width)
        };

        let _ = writeln!(out, "{url} -> {status}");
        let _ = writeln!(out, " DNS: {}", raw(res.dns.as_ref()));
        let _ = writeln!(out, " Ping: {}", raw(res.ping.as_ref()));
        let _ = writeln!(out, " TCP 80: {}", raw(res.tcp_80.as_ref()));
        let _ = writeln!(out, " TCP 443: {}", raw(res.tcp_443.as_ref()));
        let _ = writeln!(out, " HTTP: {}", raw(res.http.as_ref()));
        if let Some(ssl) = &res.ssl {
            let _ = writeln!(out, " SSL: {}", raw(Some(ssl)));
        }
        if let Some(error) = &res.error {
            let _ = writeln!(out, " Error: {error}");
        }
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    }

    out
}

pub fn print_summary(results: &[DiagnosticResult], report_path: &Path) {
    print!("{}", render_summary(results));
    println!("\nReport saved as {}\n", report_path.display());
}
