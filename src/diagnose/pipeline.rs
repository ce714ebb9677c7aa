use std::any::Any;
use std::net::IpAddr;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;

use crate::error::DiagnoseError;
use crate::probe::prelude::*;

const HTTP_PORT: u16 = 80;
const HTTPS_PORT: u16 = 443;

#[derive(Debug, Clone, Copy)]
pub struct DiagnoseOptions {
    /// Applied to ping, each TCP connect, the HTTP GET and the TLS handshake.
    pub timeout: Duration,
    /// Whole-pipeline attempts per target.
    pub retries: u32,
}

/// Host part of a target URL: a leading `https://` or `http://` is dropped
/// and everything from the first `/` on is cut. No validation happens here;
/// odd input yields an odd host that fails at the DNS step.
pub fn extract_host(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.split('/').next().unwrap_or_default()
}

fn is_https(url: &str) -> bool {
    url.starts_with("https://")
}

/// Run every probe against one target and return its record.
///
/// Probes never fail: their errors are part of the record. The retry loop
/// therefore only covers what escapes them, a glue error or a panic anywhere
/// in the attempt. Fields set by an earlier attempt are kept and overwritten
/// in place by later ones. This is intentional; do not reset the record
/// between attempts.
pub async fn diagnose<P>(prober: &P, url: &str, opts: DiagnoseOptions) -> DiagnosticResult
where
    P: Prober + ?Sized,
{
    let mut result = DiagnosticResult::new(url);
    let host = extract_host(url);

    for attempt in 1..=opts.retries {
        let outcome = AssertUnwindSafe(run_probes(prober, url, host, opts.timeout, &mut result))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(DiagnoseError::Panicked(panic_message(payload))));

        match outcome {
            Ok(()) => return result,
            Err(e) => {
                log::warn!("Attempt {attempt}/{} for {url} failed: {e}", opts.retries);
                if attempt == opts.retries {
                    result.error = Some(e.to_string());
                }
            }
        }
    }

    result
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast_ref::<&str>() {
            Some(message) => message.to_string(),
            None => "attempt panicked".to_string(),
        },
    }
}

async fn run_probes<P>(
    prober: &P,
    url: &str,
    host: &str,
    timeout: Duration,
    result: &mut DiagnosticResult,
) -> Result<(), DiagnoseError>
where
    P: Prober + ?Sized,
{
    let dns = prober.resolve(host).await;
    let address = match &dns {
        DnsResult::Resolved { ip } => Some(ip.clone()),
        DnsResult::Failed { error } => {
            log::info!("DNS resolution failed for {host:?}: {error}");
            None
        }
    };
    result.dns = Some(dns);
    let Some(address) = address else {
        return Ok(());
    };

    let ip: IpAddr = address
        .parse()
        .map_err(|source| DiagnoseError::InvalidAddress { address, source })?;

    result.ping = Some(prober.ping(ip, timeout).await);
    result.tcp_80 = Some(prober.tcp_connect(ip, HTTP_PORT, timeout).await);
    result.tcp_443 = Some(prober.tcp_connect(ip, HTTPS_PORT, timeout).await);
    result.http = Some(prober.http_get(url, timeout).await);

    if is_https(url) {
        result.ssl = Some(prober.ssl_expiry(host, timeout).await);
    }

    log::debug!("Finished probes for {url}");
    Ok(())
}
