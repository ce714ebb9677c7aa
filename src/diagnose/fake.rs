//! Deterministic in-memory prober for pipeline and driver tests.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::probe::prelude::*;

#[derive(Default)]
pub struct FakeProber {
    unresolvable: HashSet<String>,
    bogus: HashSet<String>,
    panics: HashSet<String>,
    delays: HashMap<String, Duration>,
    failing: bool,
    http_panics: usize,
    calls: Mutex<HashMap<&'static str, usize>>,
    last_http_url: Mutex<Option<String>>,
    last_ssl_host: Mutex<Option<String>>,
    resolved_order: Mutex<Vec<String>>,
}

impl FakeProber {
    pub fn unresolvable(mut self, host: &str) -> Self {
        self.unresolvable.insert(host.to_string());
        self
    }

    /// DNS "succeeds" with an address that is not an IP.
    pub fn bogus_address(mut self, host: &str) -> Self {
        self.bogus.insert(host.to_string());
        self
    }

    pub fn panicking(mut self, host: &str) -> Self {
        self.panics.insert(host.to_string());
        self
    }

    pub fn delayed(mut self, host: &str, delay: Duration) -> Self {
        self.delays.insert(host.to_string(), delay);
        self
    }

    /// Every probe after DNS reports a failure.
    pub fn all_probes_failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// The first `times` HTTP calls panic instead of returning.
    pub fn panicking_http(mut self, times: usize) -> Self {
        self.http_panics = times;
        self
    }

    pub fn calls(&self, probe: &str) -> usize {
        self.calls.lock().unwrap().get(probe).copied().unwrap_or(0)
    }

    pub fn last_http_url(&self) -> Option<String> {
        self.last_http_url.lock().unwrap().clone()
    }

    pub fn last_ssl_host(&self) -> Option<String> {
        self.last_ssl_host.lock().unwrap().clone()
    }

    /// Hosts in the order their DNS step completed.
    pub fn resolved_order(&self) -> Vec<String> {
        self.resolved_order.lock().unwrap().clone()
    }

    fn record(&self, probe: &'static str) {
        *self.calls.lock().unwrap().entry(probe).or_default() += 1;
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn resolve(&self, host: &str) -> DnsResult {
        self.record("resolve");
        if let Some(delay) = self.delays.get(host) {
            tokio::time::sleep(*delay).await;
        }
        if self.panics.contains(host) {
            panic!("fake prober blew up on {host}");
        }
        self.resolved_order.lock().unwrap().push(host.to_string());

        if self.unresolvable.contains(host) {
            DnsResult::Failed {
                error: format!("no record found for {host}"),
            }
        } else if self.bogus.contains(host) {
            DnsResult::Resolved {
                ip: "not-an-ip".to_string(),
            }
        } else {
            DnsResult::Resolved {
                ip: "93.184.216.34".to_string(),
            }
        }
    }

    async fn ping(&self, _ip: IpAddr, _timeout: Duration) -> PingResult {
        self.record("ping");
        if self.failing {
            PingResult::unreachable()
        } else {
            PingResult::Reply {
                latency_ms: "12.3".to_string(),
            }
        }
    }

    async fn tcp_connect(&self, _ip: IpAddr, _port: u16, _timeout: Duration) -> bool {
        self.record("tcp");
        !self.failing
    }

    async fn http_get(&self, url: &str, _timeout: Duration) -> HttpResult {
        self.record("http");
        if self.calls("http") <= self.http_panics {
            panic!("http handler bug");
        }
        *self.last_http_url.lock().unwrap() = Some(url.to_string());
        if self.failing {
            HttpResult::Failed {
                error: "error sending request: connection refused".to_string(),
            }
        } else {
            HttpResult::Response {
                status_code: 200,
                reason: "OK".to_string(),
            }
        }
    }

    async fn ssl_expiry(&self, host: &str, _timeout: Duration) -> SslResult {
        self.record("ssl");
        *self.last_ssl_host.lock().unwrap() = Some(host.to_string());
        if self.failing {
            SslResult::Failed {
                error: "handshake failed".to_string(),
            }
        } else {
            SslResult::Valid { days_to_expiry: 90 }
        }
    }
}
