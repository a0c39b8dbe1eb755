use crate::params::{ParamField, RequestParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CHAT_PATH: &str = "/chat";

// The chat service waits up to ten minutes on its upstream webhook; don't give up before it does.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub chat_path: String,

    // `None` means no overall deadline: a stalled server keeps the turn in flight.
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: u64,

    // When false the pending question is cleared after a failed turn as well as a successful one.
    pub retain_question_on_failure: bool,

    pub defaults: ParamDefaults,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            chat_path: DEFAULT_CHAT_PATH.into(),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            retain_question_on_failure: false,
            defaults: ParamDefaults::default(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Values the non-question fields start with at session start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamDefaults {
    pub user_email: String,
    pub session_id: String,
    pub article_reference: String,
}

impl ParamDefaults {
    pub fn to_params(&self) -> RequestParams {
        let mut p = RequestParams::default();
        p.set(ParamField::UserEmail, self.user_email.clone());
        p.set(ParamField::SessionId, self.session_id.clone());
        p.set(ParamField::ArticleReference, self.article_reference.clone());
        p
    }
}
