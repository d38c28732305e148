// Upstream data provider client
//
// Every provider endpoint answers GET requests with the same envelope:
// { "code": 200, "message": "...", "data": { ... } }

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::config::ResolverConfig;
use super::errors::FetchError;
use super::utils::build_http_client;

/// Provider response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub const SUCCESS_CODE: i64 = 200;

    pub fn ok(data: Value) -> Self {
        Self {
            code: Self::SUCCESS_CODE,
            message: "Request successful".to_string(),
            data: Some(data),
        }
    }

    /// The payload, if the envelope reports success and carries data
    pub fn into_payload(self) -> Result<Value, FetchError> {
        let ApiResponse { code, message, data } = self;
        match data {
            Some(data) if code == Self::SUCCESS_CODE && is_usable(&data) => Ok(data),
            _ => Err(FetchError::Envelope {
                code,
                message: if message.is_empty() {
                    "empty payload".to_string()
                } else {
                    message
                },
            }),
        }
    }
}

fn is_usable(data: &Value) -> bool {
    match data {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Source of provider payloads
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name of the provider (for logging)
    fn name(&self) -> &'static str;

    /// GET `path` with `query` and decode the envelope
    async fn fetch(&self, path: &str, query: &[(String, String)]) -> Result<ApiResponse, FetchError>;
}

/// HTTP provider authenticated with a bearer token
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ResolverConfig) -> Result<Self, String> {
        let http = build_http_client(
            config.proxy.as_deref(),
            config.timeout,
            &config.user_agent,
            true,
        )?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            token: config.api_token.clone(),
        })
    }

    /// Extract a readable message from an error body
    fn error_message(body: &str) -> String {
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            for key in ["message", "detail", "error"] {
                match &json[key] {
                    Value::String(s) if !s.is_empty() => return s.clone(),
                    Value::Object(obj) => {
                        if let Some(Value::String(s)) = obj.get("message") {
                            return s.clone();
                        }
                    }
                    _ => {}
                }
            }
        }
        body.chars().take(200).collect()
    }
}

#[async_trait]
impl Provider for ApiClient {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn fetch(&self, path: &str, query: &[(String, String)]) -> Result<ApiResponse, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[ApiClient] GET {}", url);

        let mut request = self.http.get(&url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(FetchError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(FetchError::from)?;

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        serde_json::from_str::<ApiResponse>(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
