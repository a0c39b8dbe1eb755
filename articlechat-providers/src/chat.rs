use crate::request::{Body, HttpRequest};
use articlechat_core::config::ClientConfig;
use articlechat_core::params::ChatRequest;

pub const HEALTH_PATH: &str = "/health";

/// Where the chat service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEndpointConfig {
    pub base_url: String,
    pub chat_path: String,
}

impl ChatEndpointConfig {
    pub fn from_client_config(cfg: &ClientConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            chat_path: cfg.chat_path.clone(),
        }
    }
}

pub fn build_chat_request(
    cfg: &ChatEndpointConfig,
    req: &ChatRequest,
) -> anyhow::Result<HttpRequest> {
    let payload = serde_json::to_string(req)?;

    Ok(HttpRequest {
        method: "POST".into(),
        url: join_url(&cfg.base_url, &cfg.chat_path),
        headers: vec![
            ("Accept".into(), "application/json".into()),
            ("Content-Type".into(), "application/json".into()),
        ],
        body: Body::Json(payload),
    })
}

pub fn build_health_request(cfg: &ChatEndpointConfig) -> HttpRequest {
    HttpRequest {
        method: "GET".into(),
        url: join_url(&cfg.base_url, HEALTH_PATH),
        headers: vec![("Accept".into(), "application/json".into())],
        body: Body::Empty,
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ChatEndpointConfig {
        ChatEndpointConfig {
            base_url: "http://127.0.0.1:8000/".into(),
            chat_path: "/chat".into(),
        }
    }

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(join_url("http://h:1/", "/chat"), "http://h:1/chat");
        assert_eq!(join_url("http://h:1", "chat"), "http://h:1/chat");
    }

    #[test]
    fn builds_json_post_with_wire_fields() {
        let req = build_chat_request(
            &cfg(),
            &ChatRequest {
                user_question: "What is this article about?".into(),
                user_email: "a@b.com".into(),
                session_id: "s1".into(),
                article_url: "https://x.com/a".into(),
            },
        )
        .unwrap();

        assert_eq!(req.method, "POST");
        assert_eq!(req.url, "http://127.0.0.1:8000/chat");
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        match req.body {
            Body::Json(s) => {
                let v: serde_json::Value = serde_json::from_str(&s).unwrap();
                assert_eq!(v["user_question"], "What is this article about?");
                assert_eq!(v["article_url"], "https://x.com/a");
                assert_eq!(v.as_object().unwrap().len(), 4);
            }
            _ => panic!("expected json"),
        }
    }

    #[test]
    fn health_probe_is_a_bodyless_get() {
        let req = build_health_request(&cfg());
        assert_eq!(req.method, "GET");
        assert_eq!(req.url, "http://127.0.0.1:8000/health");
        assert_eq!(req.body, Body::Empty);
    }
}
