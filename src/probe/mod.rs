pub mod ping;
pub mod probe;
pub mod result;
pub mod tls;

use std::fmt::Write;
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;

pub mod prelude {
    pub use super::Prober;
    pub use super::probe::SystemProber;
    pub use super::result::{DiagnosticResult, DnsResult, HttpResult, PingResult, SslResult};
}

use result::{DnsResult, HttpResult, PingResult, SslResult};

/// One method per network check. Implementations must be total: every
/// failure is returned as an error-tagged record, never as a panic or an
/// out-of-band error, so the pipeline only ever retries its own glue.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn resolve(&self, host: &str) -> DnsResult;

    async fn ping(&self, ip: IpAddr, timeout: Duration) -> PingResult;

    async fn tcp_connect(&self, ip: IpAddr, port: u16, timeout: Duration) -> bool;

    async fn http_get(&self, url: &str, timeout: Duration) -> HttpResult;

    async fn ssl_expiry(&self, host: &str, timeout: Duration) -> SslResult;
}

/// Flatten an error and its sources into a single line.
fn error_chain(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}
