use anyhow::Context;
use articlechat_core::config::ClientConfig;
use articlechat_core::params::ChatRequest;
use articlechat_core::text::preview_text;
use articlechat_engine::traits::ChatEndpoint;
use articlechat_providers::chat::{ChatEndpointConfig, build_chat_request};
use articlechat_providers::parse::parse_chat_response;
use articlechat_providers::runtime::{TransportOptions, execute};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("chat endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// `ChatEndpoint` backed by `POST {base_url}{chat_path}`.
#[derive(Debug, Clone)]
pub struct HttpChatEndpoint {
    endpoint: ChatEndpointConfig,
    transport: TransportOptions,
}

impl HttpChatEndpoint {
    pub fn new(endpoint: ChatEndpointConfig, transport: TransportOptions) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn from_client_config(cfg: &ClientConfig) -> Self {
        Self::new(
            ChatEndpointConfig::from_client_config(cfg),
            TransportOptions::from_client_config(cfg),
        )
    }
}

#[async_trait::async_trait]
impl ChatEndpoint for HttpChatEndpoint {
    async fn send(&self, request: &ChatRequest) -> anyhow::Result<String> {
        let req = build_chat_request(&self.endpoint, request)?;
        log::debug!("chat request: {req:?}");

        let resp = execute(&req, &self.transport).await?;
        if !resp.is_success() {
            return Err(EndpointError::Status {
                status: resp.status,
                body: preview_text(&String::from_utf8_lossy(&resp.body)),
            }
            .into());
        }

        let parsed = parse_chat_response(&resp.body)
            .with_context(|| format!("unexpected response from {}", req.url))?;
        log::debug!(
            "chat response: status={:?} webhook_status={} session_id={:?}",
            parsed.status,
            parsed.webhook_status,
            parsed.session_id
        );
        Ok(parsed.into_output())
    }
}
