use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_native_tls::TlsConnector as TokioTlsConnector;
use x509_parser::parse_x509_certificate;

use crate::error::ProbeError;

use super::result::SslResult;

const HTTPS_PORT: u16 = 443;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Read the `notAfter` of the certificate `host` presents on port 443.
///
/// The connector is expected to skip chain verification so an expired
/// certificate is still inspected rather than failing the handshake.
pub async fn get_cert_expiry(
    host: &str,
    connector: &TokioTlsConnector,
    limit: Duration,
) -> Result<DateTime<Utc>, ProbeError> {
    let stream = timeout(limit, TcpStream::connect((host, HTTPS_PORT)))
        .await
        .map_err(|_| ProbeError::Timeout(limit))??;

    let tls_stream = timeout(limit, connector.connect(host, stream))
        .await
        .map_err(|_| ProbeError::Timeout(limit))??;

    let cert = tls_stream
        .get_ref()
        .peer_certificate()?
        .ok_or(ProbeError::MissingCertificate)?;
    let cert_der = cert.to_der()?;

    let (_, parsed) =
        parse_x509_certificate(&cert_der).map_err(|e| ProbeError::Certificate(e.to_string()))?;

    let not_after = parsed.validity().not_after.timestamp();
    DateTime::<Utc>::from_timestamp(not_after, 0).ok_or(ProbeError::ExpiryOutOfRange(not_after))
}

/// Whole days from `now` until `expiry`, rounded towards negative infinity,
/// so a certificate that expired an hour ago reports -1.
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

pub async fn check_ssl(host: &str, connector: &TokioTlsConnector, limit: Duration) -> SslResult {
    match get_cert_expiry(host, connector, limit).await {
        Ok(expiry) => SslResult::Valid {
            days_to_expiry: days_until(expiry, Utc::now()),
        },
        Err(e) => {
            log::debug!("TLS inspection of {host} failed: {e}");
            SslResult::Failed {
                error: e.to_string(),
            }
        }
    }
}
