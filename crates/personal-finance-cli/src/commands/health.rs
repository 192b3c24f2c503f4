use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

/// Liveness check: always healthy once the binary runs.
pub fn run_health() -> Value {
    let status = HealthStatus {
        status: "healthy",
        timestamp: Utc::now(),
    };
    serde_json::to_value(status).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_shape() {
        let body = run_health();
        assert_eq!(body["status"], "healthy");
        let stamp = body["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
