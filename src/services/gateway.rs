// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API gateway: the single chokepoint for backend calls.
//!
//! Handles:
//! - JSON request bodies (multipart for uploads)
//! - Response decoding by content type, for errors too
//! - Error message extraction from error bodies
//! - Redirect to the login page on 401, with loop-avoiding exceptions
//! - Collapsing transport failures into one actionable network error

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::navigation::{Navigator, LOGIN_PATH};
use crate::services::transport::{
    ApiRequest, MultipartForm, RawResponse, RequestBody, ReqwestTransport, Transport, UploadFile,
};

/// Login endpoint.
pub const AUTH_LOGIN_PATH: &str = "/api/auth/login";
/// Current-identity endpoint.
pub const AUTH_USER_PATH: &str = "/api/auth/user";

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    Json(Value),
    Text(String),
}

impl ApiBody {
    /// Decode a JSON body into `T`. Text bodies are a decode error.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ApiBody::Json(value) => {
                serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
            }
            ApiBody::Text(text) => Err(ClientError::Decode(format!(
                "expected JSON, got text: {}",
                truncate(&text, 120)
            ))),
        }
    }

    /// Body as text; JSON bodies are re-serialized.
    pub fn into_text(self) -> String {
        match self {
            ApiBody::Json(Value::String(s)) => s,
            ApiBody::Json(value) => value.to_string(),
            ApiBody::Text(text) => text,
        }
    }

    /// Human-readable message carried by an error body, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            ApiBody::Text(text) if !text.is_empty() => Some(text.clone()),
            ApiBody::Json(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            ApiBody::Json(value) => value
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            _ => None,
        }
    }

    fn decode(raw: &RawResponse) -> Self {
        let is_json = raw
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"));

        if is_json {
            if let Ok(value) = serde_json::from_slice(&raw.body) {
                return ApiBody::Json(value);
            }
        }
        ApiBody::Text(String::from_utf8_lossy(&raw.body).into_owned())
    }
}

/// Whether a 401 on `request_path` should send the user to the login page.
///
/// Not when already there, and not for the login or identity probes: those
/// answer 401 as a normal outcome and redirecting would loop.
pub fn should_redirect_to_login(current_path: &str, request_path: &str) -> bool {
    current_path != LOGIN_PATH
        && !request_path.contains(AUTH_LOGIN_PATH)
        && !request_path.contains(AUTH_USER_PATH)
}

/// Backend API gateway.
#[derive(Clone)]
pub struct Gateway {
    base_url: String,
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
}

impl Gateway {
    /// Create a gateway over an explicit transport.
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            navigator,
        }
    }

    /// Create a gateway talking HTTP to the configured backend.
    pub fn from_config(
        config: &Config,
        navigator: Arc<dyn Navigator>,
    ) -> std::result::Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::new(
            config.api_base_url.clone(),
            Arc::new(transport),
            navigator,
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// GET with optional query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiBody> {
        let mut request = ApiRequest::new(Method::GET, path);
        request.query = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.send(request).await
    }

    /// POST a JSON body; `None` sends `{}`.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<ApiBody> {
        self.send(json_request(Method::POST, path, body)?).await
    }

    /// PUT a JSON body; `None` sends `{}`.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<ApiBody> {
        self.send(json_request(Method::PUT, path, body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiBody> {
        self.send(ApiRequest::new(Method::DELETE, path)).await
    }

    /// POST a multipart form with `file` and any extra fields.
    pub async fn upload_file(
        &self,
        path: &str,
        file: UploadFile,
        extra_fields: &[(&str, String)],
    ) -> Result<ApiBody> {
        self.send(upload_request(path, file, extra_fields)).await
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.get(path, query).await?.into_json()
    }

    /// POST and decode a JSON body.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        self.post(path, body).await?.into_json()
    }

    /// Send a prepared request and apply the response policy.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiBody> {
        tracing::debug!(method = %request.method, path = %request.path, "API request");

        let raw = match self.transport.send(&self.base_url, &request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %request.path, error = %e, "Backend unreachable");
                return Err(ClientError::Network);
            }
        };

        let body = ApiBody::decode(&raw);
        if (200..300).contains(&raw.status) {
            return Ok(body);
        }

        let message = body
            .message()
            .unwrap_or_else(|| format!("HTTP {}: Request failed", raw.status));
        tracing::warn!(
            path = %request.path,
            status = raw.status,
            error = %message,
            "API request failed"
        );

        if raw.status == 401 {
            let redirected =
                should_redirect_to_login(&self.navigator.current_path(), &request.path);
            if redirected {
                tracing::info!(path = %request.path, "Session rejected, redirecting to login");
                self.navigator.navigate(LOGIN_PATH);
            }
            return Err(ClientError::Unauthorized {
                message,
                redirected,
            });
        }

        Err(ClientError::Http {
            status: raw.status,
            message,
        })
    }
}

/// Build a JSON request. An absent body is sent as `{}`.
pub fn json_request<B: Serialize + ?Sized>(
    method: Method,
    path: &str,
    body: Option<&B>,
) -> Result<ApiRequest> {
    let value = match body {
        Some(b) => serde_json::to_value(b).map_err(|e| ClientError::Encode(e.to_string()))?,
        None => Value::Object(Default::default()),
    };
    let mut request = ApiRequest::new(method, path);
    request
        .headers
        .push(("Content-Type".to_string(), "application/json".to_string()));
    request.body = RequestBody::Json(value);
    Ok(request)
}

/// Build a multipart upload. No content-type header is set here; the
/// transport supplies it together with the boundary.
pub fn upload_request(path: &str, file: UploadFile, extra_fields: &[(&str, String)]) -> ApiRequest {
    let mut request = ApiRequest::new(Method::POST, path);
    request.body = RequestBody::Multipart(MultipartForm {
        file,
        fields: extra_fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    });
    request
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
