pub mod console;
pub mod json;

use crate::probe::prelude::*;

pub use console::print_summary;
pub use json::write_report;

/// A target passes unless it has a top-level error, a DNS error or an HTTP
/// error. Ping, TCP and TLS failures are shown but never fail a target.
pub fn target_passed(result: &DiagnosticResult) -> bool {
    result.error.is_none()
        && !result.dns.as_ref().is_some_and(DnsResult::is_error)
        && !result.http.as_ref().is_some_and(HttpResult::is_error)
}

pub fn overall_success(results: &[DiagnosticResult]) -> bool {
    results.iter().all(target_passed)
}

/// Process exit status for a finished run: 0 when every target passed.
pub fn exit_status(results: &[DiagnosticResult]) -> u8 {
    if overall_success(results) { 0 } else { 1 }
}
