// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication endpoints.

use serde_json::Value;
use std::fmt;

use crate::error::Result;
use crate::services::gateway::{Gateway, AUTH_LOGIN_PATH, AUTH_USER_PATH};
use crate::validation::{LoginRequest, RegisterRequest};

pub const AUTH_REGISTER_PATH: &str = "/api/auth/register";
pub const AUTH_LOGOUT_PATH: &str = "/api/auth/logout";

/// Third-party identity providers supported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    Google,
    Facebook,
}

impl FederatedProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "google",
            FederatedProvider::Facebook => "facebook",
        }
    }

    /// Backend-owned URL that starts the authorization flow.
    pub fn authorization_url(&self, base_url: &str) -> String {
        format!("{}/oauth2/authorization/{}", base_url, self.as_str())
    }
}

impl fmt::Display for FederatedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FederatedProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(FederatedProvider::Google),
            "facebook" => Ok(FederatedProvider::Facebook),
            other => Err(format!("unsupported provider: {}", other)),
        }
    }
}

/// Authentication API client.
#[derive(Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Create an account. The response is returned raw (`{user, message}`).
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        self.gateway
            .post_json(AUTH_REGISTER_PATH, Some(request))
            .await
    }

    /// Log in with email and password. On success the backend sets the
    /// session cookie, which the gateway's transport keeps.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Value> {
        self.gateway
            .post_json(AUTH_LOGIN_PATH, Some(credentials))
            .await
    }

    /// Raw current-identity response.
    pub async fn current_user(&self) -> Result<Value> {
        self.gateway.get_json(AUTH_USER_PATH, &[]).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.gateway
            .post::<Value>(AUTH_LOGOUT_PATH, None)
            .await
            .map(|_| ())
    }

    pub fn federated_login_url(&self, provider: FederatedProvider) -> String {
        provider.authorization_url(self.gateway.base_url())
    }
}
