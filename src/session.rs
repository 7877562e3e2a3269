// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state machine.
//!
//! [`AuthContext`] owns the [`Session`] and is the only thing that changes
//! it, always through [`Session::reduce`]. Observers subscribe to a `watch`
//! channel. The context is created once at startup and shared behind an
//! `Arc` for the life of the process.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::Result;
use crate::models::Identity;
use crate::navigation::{Navigator, HOME_PATH, PUBLIC_PATHS};
use crate::services::auth::{AuthApi, FederatedProvider};
use crate::validation::{self, LoginRequest, RegisterRequest, RegistrationForm};

/// Recorded when the identity probe fails, whatever the backend said.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Client-side view of the user's session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<Identity>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
    /// Set once any auth outcome has been recorded; tells idle apart from
    /// signed out.
    settled: bool,
}

/// State-machine view of a [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    Idle,
    Loading,
    Authenticated(Identity),
    Unauthenticated { error: Option<String> },
}

/// Session transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Loading,
    Success(Identity),
    Failure(String),
    Logout,
    ClearError,
}

impl Session {
    /// Apply one transition.
    pub fn reduce(self, action: AuthAction) -> Session {
        match action {
            AuthAction::Loading => Session {
                loading: true,
                error: None,
                ..self
            },
            AuthAction::Success(user) => Session {
                user: Some(user),
                is_authenticated: true,
                loading: false,
                error: None,
                settled: true,
            },
            AuthAction::Failure(error) => Session {
                user: None,
                is_authenticated: false,
                loading: false,
                error: Some(error),
                settled: true,
            },
            AuthAction::Logout => Session {
                user: None,
                is_authenticated: false,
                loading: false,
                error: None,
                settled: true,
            },
            AuthAction::ClearError => Session {
                error: None,
                ..self
            },
        }
    }

    /// Signed-in identity, when authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        self.user.as_ref().filter(|_| self.is_authenticated)
    }

    pub fn status(&self) -> AuthStatus {
        if self.loading {
            return AuthStatus::Loading;
        }
        match (&self.user, self.is_authenticated) {
            (Some(user), true) => AuthStatus::Authenticated(user.clone()),
            _ if self.settled || self.error.is_some() => AuthStatus::Unauthenticated {
                error: self.error.clone(),
            },
            _ => AuthStatus::Idle,
        }
    }
}

/// Owner of the session and entry point for auth operations.
pub struct AuthContext {
    auth: AuthApi,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<Session>,
}

impl AuthContext {
    pub fn new(auth: AuthApi) -> Self {
        let navigator = auth.gateway().navigator().clone();
        let (state, _) = watch::channel(Session::default());
        Self {
            auth,
            navigator,
            state,
        }
    }

    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> AuthStatus {
        self.state.borrow().status()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    fn dispatch(&self, action: AuthAction) {
        tracing::debug!(?action, "Session transition");
        self.state
            .send_modify(|session| *session = std::mem::take(session).reduce(action));
    }

    /// Startup check. Skipped on the login and registration pages, where
    /// there is nothing to restore. Returns whether the check ran.
    pub async fn init(&self) -> bool {
        let path = self.navigator.current_path();
        if PUBLIC_PATHS.contains(&path.as_str()) {
            tracing::debug!(path = %path, "Skipping auth check on public page");
            return false;
        }
        tracing::debug!(path = %path, "Checking auth status");
        self.check_auth_status().await;
        true
    }

    /// Ask the backend who we are. Returns whether the session is authenticated.
    pub async fn check_auth_status(&self) -> bool {
        self.dispatch(AuthAction::Loading);

        let identity = match self.auth.current_user().await {
            Ok(body) => Identity::from_response(&body),
            Err(e) => Err(e),
        };

        match identity {
            Ok(user) => {
                tracing::info!(email = %user.email, "Session restored");
                self.dispatch(AuthAction::Success(user));
                true
            }
            Err(e) => {
                tracing::info!(error = %e, "Auth check failed");
                self.dispatch(AuthAction::Failure(NOT_AUTHENTICATED.to_string()));
                false
            }
        }
    }

    /// Log in with email and password and return the raw response.
    ///
    /// Invalid credentials are rejected locally without touching the
    /// session. Backend failures are recorded in the session and returned.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Value> {
        validation::check(credentials)?;
        self.dispatch(AuthAction::Loading);

        let outcome = match self.auth.login(credentials).await {
            Ok(body) => Identity::from_login_response(&body).map(|user| (user, body)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok((user, body)) => {
                tracing::info!(email = %user.email, "Login successful");
                self.dispatch(AuthAction::Success(user));
                Ok(body)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.dispatch(AuthAction::Failure(e.to_string()));
                Err(e)
            }
        }
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, form: &RegistrationForm) -> Result<Value> {
        validation::check(form)?;
        let request = RegisterRequest::from(form);
        let response = self.auth.register(&request).await;
        match &response {
            Ok(_) => tracing::info!(email = %request.email, "Registration successful"),
            Err(e) => tracing::warn!(error = %e, "Registration failed"),
        }
        response
    }

    /// End the session. Local state is cleared even if the backend call
    /// fails, then the user is sent to the landing page.
    pub async fn logout(&self) {
        if let Err(e) = self.auth.logout().await {
            tracing::warn!(error = %e, "Logout request failed, clearing session anyway");
        }
        self.dispatch(AuthAction::Logout);
        self.navigator.navigate(HOME_PATH);
    }

    pub fn clear_error(&self) {
        self.dispatch(AuthAction::ClearError);
    }

    /// Hand the user to the provider's authorization flow. The session is
    /// picked up by [`AuthContext::check_auth_status`] when they come back.
    pub fn initiate_federated_login(&self, provider: FederatedProvider) {
        let url = self.auth.federated_login_url(provider);
        tracing::info!(%provider, "Starting federated login");
        self.navigator.navigate(&url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdentityKind;

    fn identity() -> Identity {
        Identity {
            id: Some(1),
            name: "Yaw".into(),
            email: "yaw@example.com".into(),
            phone: None,
            location: None,
            avatar_url: None,
            kind: IdentityKind::Password,
        }
    }

    #[test]
    fn test_starts_idle() {
        assert_eq!(Session::default().status(), AuthStatus::Idle);
    }

    #[test]
    fn test_loading_keeps_user() {
        let session = Session::default()
            .reduce(AuthAction::Success(identity()))
            .reduce(AuthAction::Loading);
        assert!(session.loading);
        assert_eq!(session.user, Some(identity()));
        assert_eq!(session.status(), AuthStatus::Loading);
    }

    #[test]
    fn test_failure_clears_identity() {
        let session = Session::default()
            .reduce(AuthAction::Success(identity()))
            .reduce(AuthAction::Failure("Login failed".into()));
        assert_eq!(session.user, None);
        assert!(!session.is_authenticated);
        assert_eq!(
            session.status(),
            AuthStatus::Unauthenticated {
                error: Some("Login failed".into())
            }
        );
    }

    #[test]
    fn test_clear_error_touches_nothing_else() {
        let session = Session::default()
            .reduce(AuthAction::Failure("x".into()))
            .reduce(AuthAction::ClearError);
        assert_eq!(session.error, None);
        assert_eq!(session.status(), AuthStatus::Unauthenticated { error: None });

        let signed_in = Session::default().reduce(AuthAction::Success(identity()));
        let cleared = signed_in.clone().reduce(AuthAction::ClearError);
        assert_eq!(cleared, signed_in);
    }

    #[test]
    fn test_logout_resets() {
        let session = Session::default()
            .reduce(AuthAction::Success(identity()))
            .reduce(AuthAction::Logout);
        assert_eq!(session.user, None);
        assert!(!session.is_authenticated);
        assert_eq!(session.error, None);
        assert_eq!(session.status(), AuthStatus::Unauthenticated { error: None });
    }
}
