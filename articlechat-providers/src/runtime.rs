use crate::request::{Body, HttpRequest};
use anyhow::{Context, anyhow};
use articlechat_core::config::ClientConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    // `None` lets a request run until the server answers or the connection drops.
    pub request_timeout: Option<Duration>,
}

impl TransportOptions {
    pub fn from_client_config(cfg: &ClientConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            request_timeout: cfg.request_timeout(),
        }
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::from_client_config(&ClientConfig::default())
    }
}

pub async fn execute(req: &HttpRequest, opts: &TransportOptions) -> anyhow::Result<HttpResponse> {
    let mut client = reqwest::Client::builder().connect_timeout(opts.connect_timeout);
    if let Some(t) = opts.request_timeout {
        client = client.timeout(t);
    }
    let client = client.build().context("build http client")?;

    let mut headers = HeaderMap::new();
    for (k, v) in &req.headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .with_context(|| format!("invalid header name: {k}"))?;
        let value =
            HeaderValue::from_str(v).with_context(|| format!("invalid header value for {k}"))?;
        headers.insert(name, value);
    }

    let builder = match req.method.as_str() {
        "GET" => client.get(&req.url),
        "POST" => client.post(&req.url),
        other => return Err(anyhow!("unsupported method: {other}")),
    }
    .headers(headers);

    let builder = match &req.body {
        Body::Empty => builder,
        Body::Json(s) => builder.body(s.clone()),
    };

    let resp = builder.send().await.context("http request failed")?;
    let status = resp.status().as_u16();
    let body = resp
        .bytes()
        .await
        .context("failed reading response body")?
        .to_vec();

    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"k": "v"})))
            .respond_with(ResponseTemplate::new(201).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let req = HttpRequest {
            method: "POST".into(),
            url: format!("{}/chat", server.uri()),
            headers: vec![
                ("Accept".into(), "application/json".into()),
                ("Content-Type".into(), "application/json".into()),
            ],
            body: Body::Json(r#"{"k":"v"}"#.into()),
        };
        let resp = execute(&req, &TransportOptions::default()).await.unwrap();
        assert_eq!(resp.status, 201);
        assert!(resp.is_success());
        assert_eq!(resp.body, b"ok");
    }

    #[tokio::test]
    async fn request_timeout_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let req = HttpRequest {
            method: "GET".into(),
            url: server.uri(),
            headers: vec![],
            body: Body::Empty,
        };
        let opts = TransportOptions {
            connect_timeout: Duration::from_secs(1),
            request_timeout: Some(Duration::from_millis(100)),
        };
        assert!(execute(&req, &opts).await.is_err());
    }

    #[tokio::test]
    async fn rejects_unsupported_method() {
        let req = HttpRequest {
            method: "PATCH".into(),
            url: "http://127.0.0.1:1".into(),
            headers: vec![],
            body: Body::Empty,
        };
        assert!(execute(&req, &TransportOptions::default()).await.is_err());
    }
}
