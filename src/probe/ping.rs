use std::net::IpAddr;
use std::time::Duration;

use tokio::process::Command;

use super::result::PingResult;

/// Send a single echo request through the system `ping` utility.
///
/// The utility's `-W` flag takes whole seconds, so the timeout is truncated.
pub async fn ping_host(ip: IpAddr, timeout: Duration) -> PingResult {
    let output = Command::new("ping")
        .args(["-c", "1", "-W"])
        .arg(timeout.as_secs().to_string())
        .arg(ip.to_string())
        .kill_on_drop(true)
        .output()
        .await;

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            log::debug!("Failed to run ping for {ip}: {e}");
            return PingResult::Failed {
                error: e.to_string(),
            };
        }
    };

    if !output.status.success() {
        return PingResult::unreachable();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    match parse_latency(&stdout) {
        Some(latency_ms) => PingResult::Reply { latency_ms },
        None => PingResult::unreachable(),
    }
}

/// Latency text from the first line carrying `time=`, e.g. `"11.2"` out of
/// `64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=11.2 ms`.
pub fn parse_latency(stdout: &str) -> Option<String> {
    let line = stdout.lines().find(|line| line.contains("time="))?;
    let rest = line.rsplit("time=").next()?;
    rest.split_whitespace().next().map(str::to_string)
}
