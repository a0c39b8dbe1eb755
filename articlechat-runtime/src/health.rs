use articlechat_core::config::ClientConfig;
use articlechat_providers::chat::{ChatEndpointConfig, build_health_request};
use articlechat_providers::parse::parse_health_response;
use articlechat_providers::runtime::{TransportOptions, execute};
use std::time::Duration;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
    Unreachable(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Probe `GET /health` on the chat service. Never fails; problems are folded into the status.
pub async fn check_health(cfg: &ClientConfig) -> HealthStatus {
    let req = build_health_request(&ChatEndpointConfig::from_client_config(cfg));
    let opts = TransportOptions {
        connect_timeout: cfg.connect_timeout().min(HEALTH_TIMEOUT),
        request_timeout: Some(HEALTH_TIMEOUT),
    };

    let resp = match execute(&req, &opts).await {
        Ok(r) => r,
        Err(e) => {
            log::warn!("health probe failed: {e:#}");
            return HealthStatus::Unreachable(format!("{e:#}"));
        }
    };

    if !resp.is_success() {
        return HealthStatus::Unhealthy(format!("HTTP {}", resp.status));
    }

    match parse_health_response(&resp.body) {
        Ok(h) if h.is_healthy() => HealthStatus::Healthy,
        Ok(h) => HealthStatus::Unhealthy(format!("status={}", h.status)),
        Err(e) => HealthStatus::Unhealthy(format!("{e:#}")),
    }
}
