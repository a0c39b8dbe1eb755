use std::sync::Arc;

use articlechat_core::config::ClientConfig;
use articlechat_engine::controller::{TurnController, TurnPolicy};
use articlechat_engine::traits::ChatEndpoint;
use articlechat_engine::transcript::Transcript;

use crate::chat::HttpChatEndpoint;

/// Build a turn controller talking to the configured chat service, with an empty transcript.
pub fn build_controller(cfg: &ClientConfig) -> TurnController {
    build_controller_with_endpoint(cfg, Arc::new(HttpChatEndpoint::from_client_config(cfg)))
}

pub fn build_controller_with_endpoint(
    cfg: &ClientConfig,
    endpoint: Arc<dyn ChatEndpoint>,
) -> TurnController {
    log::info!(
        "chat session targeting {}{} (timeout={:?})",
        cfg.base_url.trim_end_matches('/'),
        cfg.chat_path,
        cfg.request_timeout()
    );

    TurnController::new(
        endpoint,
        Transcript::new(),
        cfg.defaults.to_params(),
        TurnPolicy::from_client_config(cfg),
    )
}
