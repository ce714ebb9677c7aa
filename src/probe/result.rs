use serde::{Deserialize, Serialize};

/// Everything learned about one target. Fields stay `None` when the pipeline
/// never reached the probe that fills them and are then left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping: Option<PingResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_80: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_443: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<SslResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiagnosticResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// A result for a target whose pipeline never produced a record at all.
    pub fn aborted(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DnsResult {
    Resolved { ip: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PingResult {
    Reply { latency_ms: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HttpResult {
    Response { status_code: u16, reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SslResult {
    Valid { days_to_expiry: i64 },
    Failed { error: String },
}

impl DnsResult {
    pub fn is_error(&self) -> bool {
        matches!(self, DnsResult::Failed { .. })
    }
}

impl HttpResult {
    pub fn is_error(&self) -> bool {
        matches!(self, HttpResult::Failed { .. })
    }
}

impl PingResult {
    pub fn unreachable() -> Self {
        PingResult::Failed {
            error: "Host unreachable".to_string(),
        }
    }
}
