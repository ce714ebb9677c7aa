use std::env;
use std::path::{Path, PathBuf};
use std::{net::IpAddr, time::Duration};

use reqwest::Client;
use tokio_native_tls::TlsConnector as TokioTlsConnector;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts},
};
use url::Url;

use super::cli::Cli;
use super::model::{
    DEFAULT_CONFIG_FILE, DEFAULT_REPORT_FILE, DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECONDS,
    FileConfig,
};
use crate::error::ConfigError;

pub struct AppConfig {
    pub urls: Vec<String>,
    pub timeout: Duration,
    pub retries: u32,
    pub dns_hosts: Vec<String>,
    pub report_path: PathBuf,
}

/// Load the application configuration from the command line, the process
/// environment and an optional YAML file.
///
/// Precedence is flags, then environment (`DNS_HOSTS`, `REPORT_FILE`), then
/// the file named by `--config` or `CONFIG_FILE`, then built-in defaults.
/// The default `netdiag.yml` is only read if it exists.
pub fn load_config(cli: Cli) -> Result<AppConfig, ConfigError> {
    load_config_with(cli, |key| env::var(key).ok())
}

pub fn load_config_with<F>(cli: Cli, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file_config = match cli.config.clone().or_else(|| lookup("CONFIG_FILE").map(PathBuf::from)) {
        Some(path) => read_file_config(&path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_file_config(path)?
            } else {
                FileConfig::default()
            }
        }
    };

    let dns_hosts = match lookup("DNS_HOSTS") {
        Some(hosts) => split_hosts(&hosts),
        None => file_config.dns_hosts,
    };
    log::info!("Using DNS hosts: {:?}", dns_hosts);

    let report_path = cli
        .output
        .or_else(|| lookup("REPORT_FILE").map(PathBuf::from))
        .or(file_config.report_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE));

    let timeout_seconds = cli
        .timeout
        .or(file_config.timeout_seconds)
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    let retries = cli.retries.or(file_config.retries).unwrap_or(DEFAULT_RETRIES);

    for url in &cli.urls {
        warn_if_unusable(url);
    }

    Ok(AppConfig {
        urls: cli.urls,
        timeout: Duration::from_secs(timeout_seconds),
        retries,
        dns_hosts,
        report_path,
    })
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded config file {}", path.display());
    FileConfig::from_yaml(&yaml).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn split_hosts(hosts: &str) -> Vec<String> {
    hosts
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Targets are diagnosed no matter what; this only tells the user early
/// that scheme-dependent checks will not behave.
fn warn_if_unusable(url: &str) {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => log::warn!("Target {url} has unsupported scheme {:?}", parsed.scheme()),
        Err(e) => log::warn!("Target {url} is not a valid URL: {e}"),
    }
}

/// Setup a TLS connector that accepts invalid certificates, so expired or
/// self-signed certificates can still be inspected.
pub fn setup_tls_connector() -> Result<TokioTlsConnector, ConfigError> {
    let mut builder = native_tls::TlsConnector::builder();
    builder.danger_accept_invalid_certs(true);
    let connector = builder.build()?;
    Ok(TokioTlsConnector::from(connector))
}

/// Setup the DNS resolver used by the DNS probe.
/// With no `dns_hosts` the system resolver configuration is used; otherwise
/// each host is queried over TCP on port 53.
pub fn setup_resolver(dns_hosts: &[String]) -> Result<TokioAsyncResolver, ConfigError> {
    if dns_hosts.is_empty() {
        return Ok(TokioAsyncResolver::tokio_from_system_conf()?);
    }

    let mut opts = ResolverOpts::default();
    opts.attempts = 2;
    opts.cache_size = 1024;

    let mut name_servers = NameServerConfigGroup::new();

    for host in dns_hosts {
        let ip: IpAddr = host.parse().map_err(|source| ConfigError::InvalidDnsHost {
            host: host.clone(),
            source,
        })?;
        name_servers.push(NameServerConfig {
            socket_addr: (ip, 53).into(),
            protocol: Protocol::Tcp,
            tls_dns_name: None,
            trust_negative_responses: false,
            bind_addr: None,
        });
    }

    let resolver_config = ResolverConfig::from_parts(None, vec![], name_servers);
    Ok(TokioAsyncResolver::tokio(resolver_config, opts))
}

/// Shared HTTP client for the HTTP probe. Timeouts are set per request.
/// Certificates are verified here, unlike the TLS inspection connector.
pub fn setup_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("netdiag/", env!("CARGO_PKG_VERSION")))
        .build()
}
