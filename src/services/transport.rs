// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wire-level request/response types and the transport that sends them.
//!
//! The gateway builds an [`ApiRequest`] value and hands it to a [`Transport`].
//! Keeping the request a plain value means its exact configuration (headers,
//! body kind, query string) can be inspected before anything hits the wire.

use futures_util::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

/// A file to send with [`crate::services::Gateway::upload_file`].
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Multipart payload: the file under part `file`, then each extra field.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartForm {
    pub file: UploadFile,
    pub fields: Vec<(String, String)>,
}

/// Request body variants.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Boundary and content type are left to the transport.
    Multipart(MultipartForm),
}

/// A fully described API request, relative to the backend base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Percent-encoded query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Path plus query string, as it appears after the base URL.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string())
        }
    }
}

/// What came back from the server, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Failures below HTTP: the server never produced a usable response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Send(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Sends requests to the backend.
pub trait Transport: Send + Sync {
    fn send<'a>(
        &'a self,
        base_url: &'a str,
        request: &'a ApiRequest,
    ) -> BoxFuture<'a, Result<RawResponse, TransportError>>;
}

/// Production transport backed by `reqwest`.
///
/// The client keeps a cookie store, so the session cookie issued at login is
/// sent with every later request.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(concat!("market-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        base_url: &'a str,
        request: &'a ApiRequest,
    ) -> BoxFuture<'a, Result<RawResponse, TransportError>> {
        Box::pin(async move {
            let url = format!("{}{}", base_url, request.path_and_query());
            let mut builder = self.http.request(request.method.clone(), &url);

            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            builder = match &request.body {
                RequestBody::Empty => builder,
                RequestBody::Json(value) => builder.body(value.to_string()),
                RequestBody::Multipart(form) => {
                    let part = reqwest::multipart::Part::bytes(form.file.bytes.clone())
                        .file_name(form.file.file_name.clone());
                    let mut multipart = reqwest::multipart::Form::new().part("file", part);
                    for (key, value) in &form.fields {
                        multipart = multipart.text(key.clone(), value.clone());
                    }
                    builder.multipart(multipart)
                }
            };

            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Send(e.to_string()))?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?
                .to_vec();

            Ok(RawResponse {
                status,
                content_type,
                body,
            })
        })
    }
}
