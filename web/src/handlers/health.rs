//! Liveness endpoint.
//!
//! Reports that the process is up. It does not call the remote store, so a
//! backend outage does not take the service out of rotation.

use axum::Json;
use serde::Serialize;

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Health {
    /// Always `"ok"` while the process serves requests
    pub status: &'static str,
    /// Version of the serving binary
    pub version: &'static str,
}

/// Liveness response for a binary at `version`
///
/// ```ignore
/// async fn health() -> Json<Health> {
///     liveness(env!("CARGO_PKG_VERSION"))
/// }
/// ```
#[must_use]
pub const fn liveness(version: &'static str) -> Json<Health> {
    Json(Health {
        status: "ok",
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liveness_reports_version() {
        let Json(health) = liveness("1.2.3");
        assert_eq!(
            health,
            Health {
                status: "ok",
                version: "1.2.3"
            }
        );
    }
}
