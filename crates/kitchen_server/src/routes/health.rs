//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

const PROC_STATUS: &str = "/proc/self/status";

/// Resident memory, formatted for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    rss: String,
}

/// Health payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory: Option<MemoryUsage>,
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    let memory = std::fs::read_to_string(PROC_STATUS)
        .ok()
        .and_then(|status| parse_rss_kib(&status))
        .map(|kib| MemoryUsage {
            rss: format_mib(kib),
        });
    Json(HealthResponse { ok: true, memory })
}

/// Resident set size in KiB from a `/proc/<pid>/status` dump.
fn parse_rss_kib(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kib| kib.parse().ok())
}

/// KiB rendered as mebibytes with one decimal, e.g. `52.5 MB`.
fn format_mib(kib: u64) -> String {
    format!("{:.1} MB", kib as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rss() {
        let status = "Name:\tkitchen-server\nVmPeak:\t  90000 kB\nVmRSS:\t   52480 kB\nThreads:\t8\n";
        assert_eq!(parse_rss_kib(status), Some(52480));
        assert_eq!(parse_rss_kib("Name:\tx\n"), None);
    }

    #[test]
    fn test_rss_has_one_decimal() {
        assert_eq!(format_mib(53_760), "52.5 MB");
        assert_eq!(format_mib(1024), "1.0 MB");
        assert_eq!(format_mib(0), "0.0 MB");
    }
}
