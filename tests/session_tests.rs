// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

mod common;

use common::{test_client, user_json, Reply};
use market_client::error::ClientError;
use market_client::models::IdentityKind;
use market_client::services::{FederatedProvider, RequestBody};
use market_client::session::{AuthStatus, NOT_AUTHENTICATED};
use market_client::validation::{LoginRequest, RegistrationForm};
use serde_json::json;

fn registration() -> RegistrationForm {
    RegistrationForm {
        first_name: "Akosua".into(),
        last_name: "Mensah".into(),
        email: "akosua@example.com".into(),
        password: "kenkey42".into(),
        confirm_password: "kenkey42".into(),
        accept_terms: true,
    }
}

#[tokio::test]
async fn test_check_auth_accepts_nested_identity() {
    let (client, transport, _) = test_client("/markets");
    transport.route(
        "/api/auth/user",
        Reply::Json(200, json!({"user": user_json("Kofi", "kofi@example.com")})),
    );

    assert!(client.auth.check_auth_status().await);

    let session = client.auth.session();
    assert!(session.is_authenticated);
    assert!(!session.loading);
    let user = session.identity().unwrap();
    assert_eq!(user.name, "Kofi");
    assert_eq!(user.email, "kofi@example.com");
}

#[tokio::test]
async fn test_check_auth_accepts_flat_identity() {
    let (client, transport, _) = test_client("/markets");
    transport.route(
        "/api/auth/user",
        Reply::Json(
            200,
            json!({
                "email": "ama@example.com",
                "name": "Ama",
                "picture": "https://example.com/ama.png",
                "type": "oauth2",
                "provider": "google"
            }),
        ),
    );

    assert!(client.auth.check_auth_status().await);

    match client.auth.status() {
        AuthStatus::Authenticated(user) => {
            assert_eq!(user.email, "ama@example.com");
            assert_eq!(user.avatar_url.as_deref(), Some("https://example.com/ama.png"));
            assert_eq!(
                user.kind,
                IdentityKind::Federated {
                    provider: Some("google".into())
                }
            );
        }
        other => panic!("expected authenticated, got {other:?}"),
    }
}

#[tokio::test]
async fn test_check_auth_rejects_unknown_shape() {
    let (client, transport, navigator) = test_client("/markets");
    transport.route("/api/auth/user", Reply::Json(200, json!({"authenticated": true})));

    assert!(!client.auth.check_auth_status().await);

    let session = client.auth.session();
    assert!(!session.is_authenticated);
    assert_eq!(session.user, None);
    assert_eq!(session.error.as_deref(), Some(NOT_AUTHENTICATED));
    assert!(navigator.history().is_empty());
}

#[tokio::test]
async fn test_check_auth_401_records_generic_error() {
    let (client, transport, navigator) = test_client("/markets");
    transport.route(
        "/api/auth/user",
        Reply::Json(401, json!({"message": "Full authentication is required"})),
    );

    assert!(!client.auth.check_auth_status().await);

    assert_eq!(
        client.auth.status(),
        AuthStatus::Unauthenticated {
            error: Some(NOT_AUTHENTICATED.into())
        }
    );
    assert!(navigator.history().is_empty());
}

#[tokio::test]
async fn test_init_skipped_on_public_pages() {
    for page in ["/login", "/register"] {
        let (client, transport, _) = test_client(page);
        assert!(!client.auth.init().await);
        assert!(transport.requests().is_empty());
        assert_eq!(client.auth.status(), AuthStatus::Idle);
    }
}

#[tokio::test]
async fn test_init_checks_elsewhere() {
    let (client, transport, _) = test_client("/");
    transport.route("/api/auth/user", Reply::Json(200, user_json("Kofi", "kofi@example.com")));

    assert!(client.auth.init().await);
    assert_eq!(transport.requests_to("/api/auth/user").len(), 1);
    assert!(client.auth.session().is_authenticated);
}

#[tokio::test]
async fn test_login_success_sets_identity() {
    let (client, transport, _) = test_client("/login");
    transport.route(
        "/api/auth/login",
        Reply::Json(
            200,
            json!({"user": user_json("Yaa", "yaa@example.com"), "message": "Login successful"}),
        ),
    );

    let body = client
        .auth
        .login(&LoginRequest::new("yaa@example.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(body["message"], "Login successful");

    let session = client.auth.session();
    assert!(session.is_authenticated);
    assert_eq!(session.user.unwrap().email, "yaa@example.com");

    let sent = transport.requests_to("/api/auth/login");
    assert_eq!(
        sent[0].body,
        RequestBody::Json(json!({"email": "yaa@example.com", "password": "secret1"}))
    );
}

#[tokio::test]
async fn test_login_failure_recorded_and_returned() {
    let (client, transport, navigator) = test_client("/login");
    transport.route(
        "/api/auth/login",
        Reply::Json(401, json!({"message": "Invalid email or password"})),
    );

    let err = client
        .auth
        .login(&LoginRequest::new("yaa@example.com", "wrong-pass"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    let session = client.auth.session();
    assert!(!session.is_authenticated);
    assert!(!session.loading);
    assert_eq!(session.error.as_deref(), Some("Invalid email or password"));
    assert!(navigator.history().is_empty());

    client.auth.clear_error();
    assert_eq!(client.auth.session().error, None);
}

#[tokio::test]
async fn test_login_validation_sends_nothing() {
    let (client, transport, _) = test_client("/login");

    let err = client
        .auth
        .login(&LoginRequest::new("not-an-email", "123"))
        .await
        .unwrap_err();

    match err {
        ClientError::Validation(errors) => {
            assert_eq!(errors.get("email"), Some("Email is invalid"));
            assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(transport.requests().is_empty());
    assert_eq!(client.auth.status(), AuthStatus::Idle);
}

#[tokio::test]
async fn test_logout_clears_session_on_success() {
    let (client, transport, navigator) = test_client("/markets");
    transport.route("/api/auth/user", Reply::Json(200, user_json("Kofi", "kofi@example.com")));
    transport.route("/api/auth/logout", Reply::Json(200, json!({"message": "Logged out"})));
    client.auth.check_auth_status().await;

    client.auth.logout().await;

    let session = client.auth.session();
    assert!(!session.is_authenticated);
    assert_eq!(session.user, None);
    assert_eq!(navigator.last_location().as_deref(), Some("/"));
}

#[tokio::test]
async fn test_logout_clears_session_when_backend_fails() {
    let (client, transport, navigator) = test_client("/markets");
    transport.route("/api/auth/user", Reply::Json(200, user_json("Kofi", "kofi@example.com")));
    transport.route("/api/auth/logout", Reply::Text(500, "boom".into()));
    client.auth.check_auth_status().await;
    assert!(client.auth.session().is_authenticated);

    client.auth.logout().await;

    let session = client.auth.session();
    assert!(!session.is_authenticated);
    assert_eq!(session.user, None);
    assert_eq!(session.error, None);
    assert_eq!(navigator.last_location().as_deref(), Some("/"));
}

#[tokio::test]
async fn test_logout_clears_session_when_backend_unreachable() {
    let (client, transport, _) = test_client("/markets");
    transport.route("/api/auth/user", Reply::Json(200, user_json("Kofi", "kofi@example.com")));
    client.auth.check_auth_status().await;

    transport.set_offline(true);
    client.auth.logout().await;

    let session = client.auth.session();
    assert!(!session.is_authenticated);
    assert_eq!(session.user, None);
}

#[tokio::test]
async fn test_register_sends_combined_name() {
    let (client, transport, _) = test_client("/register");
    transport.route(
        "/api/auth/register",
        Reply::Json(201, json!({"message": "User registered successfully"})),
    );

    client.auth.register(&registration()).await.unwrap();

    let sent = transport.requests_to("/api/auth/register");
    assert_eq!(
        sent[0].body,
        RequestBody::Json(json!({
            "name": "Akosua Mensah",
            "email": "akosua@example.com",
            "password": "kenkey42"
        }))
    );
    // Registering does not sign in.
    assert_eq!(client.auth.status(), AuthStatus::Idle);
}

#[tokio::test]
async fn test_register_mismatched_passwords_sends_nothing() {
    let (client, transport, _) = test_client("/register");
    let mut form = registration();
    form.confirm_password = "kenkey43".into();

    let err = client.auth.register(&form).await.unwrap_err();

    match err {
        ClientError::Validation(errors) => {
            assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_register_requires_terms() {
    let (client, transport, _) = test_client("/register");
    let mut form = registration();
    form.accept_terms = false;
    form.first_name = String::new();

    let err = client.auth.register(&form).await.unwrap_err();

    match err {
        ClientError::Validation(errors) => {
            assert_eq!(
                errors.get("acceptTerms"),
                Some("You must accept the terms and conditions")
            );
            assert_eq!(errors.get("firstName"), Some("First name is required"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_federated_login_navigates_to_provider() {
    let (client, transport, navigator) = test_client("/login");

    client.auth.initiate_federated_login(FederatedProvider::Facebook);

    assert_eq!(
        navigator.last_location().as_deref(),
        Some("http://backend.test/oauth2/authorization/facebook")
    );
    assert!(transport.requests().is_empty());
}
