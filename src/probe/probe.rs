use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::Client;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_native_tls::TlsConnector as TokioTlsConnector;
use trust_dns_resolver::TokioAsyncResolver;

use super::prelude::*;
use super::{error_chain, ping, tls};

/// Probes backed by the real network: a DNS resolver, the system `ping`
/// binary, plain TCP sockets, a shared HTTP client and a TLS connector.
#[derive(Clone)]
pub struct SystemProber {
    client: Client,
    connector: TokioTlsConnector,
    resolver: TokioAsyncResolver,
}

impl SystemProber {
    pub fn new(client: Client, connector: TokioTlsConnector, resolver: TokioAsyncResolver) -> Self {
        Self {
            client,
            connector,
            resolver,
        }
    }
}

/// Prefer an IPv4 address, like a classic `gethostbyname` lookup would.
fn pick_address(addrs: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    let mut fallback = None;
    for addr in addrs {
        if addr.is_ipv4() {
            return Some(addr);
        }
        fallback.get_or_insert(addr);
    }
    fallback
}

/// The reason phrase the server sent. hyper only keeps it in the response
/// extensions when it differs from the canonical phrase for the status.
fn reason_phrase(resp: &reqwest::Response) -> String {
    match resp.extensions().get::<ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => resp.status().canonical_reason().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl Prober for SystemProber {
    async fn resolve(&self, host: &str) -> DnsResult {
        match self.resolver.lookup_ip(host).await {
            Ok(lookup) => match pick_address(lookup.iter()) {
                Some(ip) => DnsResult::Resolved { ip: ip.to_string() },
                None => DnsResult::Failed {
                    error: format!("no addresses found for {host}"),
                },
            },
            Err(e) => {
                log::debug!("DNS lookup of {host:?} failed: {e}");
                DnsResult::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn ping(&self, ip: IpAddr, limit: Duration) -> PingResult {
        ping::ping_host(ip, limit).await
    }

    async fn tcp_connect(&self, ip: IpAddr, port: u16, limit: Duration) -> bool {
        matches!(timeout(limit, TcpStream::connect((ip, port))).await, Ok(Ok(_)))
    }

    async fn http_get(&self, url: &str, limit: Duration) -> HttpResult {
        match self.client.get(url).timeout(limit).send().await {
            Ok(resp) => HttpResult::Response {
                status_code: resp.status().as_u16(),
                reason: reason_phrase(&resp),
            },
            Err(e) => HttpResult::Failed {
                error: error_chain(&e),
            },
        }
    }

    async fn ssl_expiry(&self, host: &str, limit: Duration) -> SslResult {
        tls::check_ssl(host, &self.connector, limit).await
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_pick_address_prefers_ipv4() {
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        let v4 = IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34));
        assert_eq!(pick_address([v6, v4]), Some(v4));
    }

    #[test]
    fn test_pick_address_falls_back_to_ipv6() {
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        assert_eq!(pick_address([v6]), Some(v6));
        assert_eq!(pick_address(Vec::<IpAddr>::new()), None);
    }

    fn loopback_system() -> SystemProber {
        let client = Client::new();
        let connector = crate::config::app_config::setup_tls_connector().expect("tls");
        let resolver = crate::config::app_config::setup_resolver(&["127.0.0.1".to_string()])
            .expect("resolver");
        SystemProber::new(client, connector, resolver)
    }

    /// Serve one HTTP/1.1 response with the given status line, then close.
    async fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response =
                format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_http_get_keeps_server_reason_phrase() {
        let url = serve_once("HTTP/1.1 200 Alright").await;
        let result = loopback_system().http_get(&url, Duration::from_secs(2)).await;
        assert_eq!(
            result,
            HttpResult::Response {
                status_code: 200,
                reason: "Alright".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_http_get_canonical_reason_phrase() {
        let url = serve_once("HTTP/1.1 404 Not Found").await;
        let result = loopback_system().http_get(&url, Duration::from_secs(2)).await;
        assert_eq!(
            result,
            HttpResult::Response {
                status_code: 404,
                reason: "Not Found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_tcp_connect_reports_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        let prober = loopback_system();

        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(prober.tcp_connect(ip, port, Duration::from_secs(1)).await);

        drop(listener);
        assert!(!prober.tcp_connect(ip, port, Duration::from_secs(1)).await);
    }
}
