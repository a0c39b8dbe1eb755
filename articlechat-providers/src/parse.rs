use anyhow::Context;
use serde::Deserialize;

/// Response envelope of `POST /chat`.
///
/// Only `data.output` is required. The envelope fields are informational and never branched on,
/// so they fall back to defaults when the service omits them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub webhook_status: i64,
    #[serde(default)]
    pub session_id: String,
    pub data: ChatResponseData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponseData {
    pub output: String,
}

impl ChatResponse {
    pub fn output(&self) -> &str {
        &self.data.output
    }

    pub fn into_output(self) -> String {
        self.data.output
    }
}

pub fn parse_chat_response(body: &[u8]) -> anyhow::Result<ChatResponse> {
    serde_json::from_slice(body).context("decode chat response JSON")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

pub fn parse_health_response(body: &[u8]) -> anyhow::Result<HealthResponse> {
    serde_json::from_slice(body).context("decode health JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_chat_envelope() {
        let body = br#"{"status":"ok","webhook_status":200,"session_id":"s1","data":{"output":"It is about X."}}"#;
        let resp = parse_chat_response(body).unwrap();
        assert_eq!(resp.output(), "It is about X.");
        assert_eq!(resp.webhook_status, 200);
        assert_eq!(resp.session_id, "s1");
    }

    #[test]
    fn envelope_fields_are_optional() {
        let body = br#"{"data":{"output":"hi"}}"#;
        assert_eq!(parse_chat_response(body).unwrap().into_output(), "hi");
    }

    #[test]
    fn empty_object_is_malformed() {
        assert!(parse_chat_response(b"{}").is_err());
    }

    #[test]
    fn data_without_output_is_malformed() {
        // The service wraps non-JSON webhook replies as {"response": "..."}.
        let body = br#"{"status":"success","webhook_status":200,"session_id":"s1","data":{"response":"plain"}}"#;
        assert!(parse_chat_response(body).is_err());
    }

    #[test]
    fn non_string_output_is_malformed() {
        assert!(parse_chat_response(br#"{"data":{"output":null}}"#).is_err());
        assert!(parse_chat_response(b"not json").is_err());
    }

    #[test]
    fn parses_health() {
        assert!(parse_health_response(br#"{"status":"healthy"}"#).unwrap().is_healthy());
        assert!(!parse_health_response(br#"{"status":"degraded"}"#).unwrap().is_healthy());
    }
}
