use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

/// Messaging is owned by the chat upstream; this service only forwards
/// requests with the caller's bearer token and passes upstream errors
/// through with their original status where possible.
#[derive(Debug, Clone)]
pub struct ChatUpstreamError {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ChatUpstreamError {
    fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }
}

fn chat_base_url() -> String {
    std::env::var("CHAT_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

fn chat_host_header() -> String {
    std::env::var("CHAT_API_HOST").unwrap_or_else(|_| "chat.localhost".to_string())
}

fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(auth_value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
        headers.insert(AUTHORIZATION, auth_value);
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn connect_failed(url: &str, err: impl ToString) -> ChatUpstreamError {
    ChatUpstreamError::new(
        StatusCode::BAD_GATEWAY,
        Some(serde_json::json!({
            "error": "connect_failed",
            "detail": err.to_string(),
            "url": url
        })),
    )
}

async fn read_upstream(resp: reqwest::Response, url: &str) -> Result<Value, ChatUpstreamError> {
    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.map_err(|e| connect_failed(url, e))?;
    if !status.is_success() {
        return Err(ChatUpstreamError::new(status, Some(body)));
    }
    Ok(body)
}

pub async fn health() -> Result<Value, ChatUpstreamError> {
    let url = format!("{}/health", chat_base_url().trim_end_matches('/'));

    let client = reqwest::Client::new();
    let resp = client
        .get(&url)
        .header("Host", chat_host_header())
        .send()
        .await
        .map_err(|e| connect_failed(&url, e))?;

    read_upstream(resp, &url).await
}

pub async fn list_conversations(
    token: &str,
    limit: i64,
    before: Option<String>,
) -> Result<Value, ChatUpstreamError> {
    let mut url = format!(
        "{}/api/v1/conversations?limit={}",
        chat_base_url().trim_end_matches('/'),
        limit.clamp(1, 50)
    );
    if let Some(before) = before {
        url.push_str(&format!("&before={}", before));
    }

    let client = reqwest::Client::new();
    let resp = client
        .get(&url)
        .header("Host", chat_host_header())
        .headers(bearer_headers(token))
        .send()
        .await
        .map_err(|e| connect_failed(&url, e))?;

    read_upstream(resp, &url).await
}

pub async fn list_messages(
    token: &str,
    conversation_id: &str,
    limit: i64,
    before: Option<String>,
) -> Result<Value, ChatUpstreamError> {
    let mut url = format!(
        "{}/api/v1/conversations/{}/messages?limit={}",
        chat_base_url().trim_end_matches('/'),
        conversation_id,
        limit.clamp(1, 100)
    );
    if let Some(before) = before {
        url.push_str(&format!("&before={}", before));
    }

    let client = reqwest::Client::new();
    let resp = client
        .get(&url)
        .header("Host", chat_host_header())
        .headers(bearer_headers(token))
        .send()
        .await
        .map_err(|e| connect_failed(&url, e))?;

    read_upstream(resp, &url).await
}

pub async fn send_message(
    token: &str,
    conversation_id: &str,
    content: String,
) -> Result<Value, ChatUpstreamError> {
    let url = format!(
        "{}/api/v1/conversations/{}/messages",
        chat_base_url().trim_end_matches('/'),
        conversation_id
    );

    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .header("Host", chat_host_header())
        .headers(bearer_headers(token))
        .json(&serde_json::json!({
            "content": content,
            "message_type": "text",
            "metadata": {}
        }))
        .send()
        .await
        .map_err(|e| connect_failed(&url, e))?;

    read_upstream(resp, &url).await
}
