use async_trait::async_trait;
use articlechat_core::params::ChatRequest;

/// The remote chat service, seen from the turn controller.
///
/// Implementations return the answer text. Transport errors, non-2xx statuses, timeouts and
/// malformed bodies all come back as `Err`; the controller does not tell them apart.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> anyhow::Result<String>;
}
