// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{RoutedTransport, create_context, create_test_rider, request_body};
use crate::{AuthWorkflow, Notice, Outcome};
use qwikride_api::{Method, TransportError};
use qwikride_domain::{RegisterRequest, Role, SessionUser};
use serde_json::json;

fn create_register_request() -> RegisterRequest {
    RegisterRequest {
        full_name: String::from("Ada Rider"),
        address: String::from("1 Dock Street"),
        email: String::from("ada@example.com"),
        username: String::from("ada"),
        password: String::from("secret"),
        payment_info: String::from("4111"),
    }
}

#[tokio::test]
async fn test_login_stores_session() {
    let transport: RoutedTransport = RoutedTransport::default();
    transport.json(
        Method::Post,
        "/auth/login",
        200,
        json!({ "token": "jwt-1", "username": "ada", "fullName": "Ada Rider", "role": "RIDER", "id": 42 }),
    );
    let ctx = create_context(&transport, None);
    let mut auth = AuthWorkflow::new(ctx.clone());

    let outcome: Outcome = auth.login(" ada ", "secret").await;

    assert_eq!(outcome, Outcome::Completed);
    let user: SessionUser = ctx.current_user().unwrap();
    assert_eq!(user.id, 42);
    assert_eq!(user.role, Role::Rider);
    assert_eq!(ctx.session().bearer_token().as_deref(), Some("jwt-1"));
    let body = request_body(&transport.last_to(Method::Post, "/auth/login"));
    assert_eq!(body, json!({ "username": "ada", "password": "secret" }));
}

#[tokio::test]
async fn test_login_with_blank_field_makes_no_call() {
    let transport: RoutedTransport = RoutedTransport::default();
    let mut auth = AuthWorkflow::new(create_context(&transport, None));

    let outcome: Outcome = auth.login("ada", "").await;

    assert!(matches!(outcome, Outcome::Rejected(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_rejected_credentials_are_not_detailed() {
    let transport: RoutedTransport = RoutedTransport::default();
    transport.json(
        Method::Post,
        "/auth/login",
        401,
        json!({ "message": "Bad password for ada" }),
    );
    let ctx = create_context(&transport, None);
    let mut auth = AuthWorkflow::new(ctx.clone());

    let outcome: Outcome = auth.login("ada", "wrong").await;

    assert_eq!(
        outcome,
        Outcome::Failed(String::from("Invalid username or password"))
    );
    assert!(ctx.current_user().is_none());
    assert!(auth.notice().is_some_and(Notice::is_error));
}

#[tokio::test]
async fn test_login_against_unreachable_backend() {
    let transport: RoutedTransport = RoutedTransport::default();
    transport.route(
        Method::Post,
        "/auth/login",
        Err(TransportError::Timeout(String::from("timed out"))),
    );
    let mut auth = AuthWorkflow::new(create_context(&transport, None));

    let outcome: Outcome = auth.login("ada", "secret").await;

    assert_eq!(
        outcome,
        Outcome::Failed(String::from(
            "Failed to connect to server. Please ensure the backend is running."
        ))
    );
}

#[tokio::test]
async fn test_register_reports_success() {
    let transport: RoutedTransport = RoutedTransport::default();
    transport.json(
        Method::Post,
        "/auth/register",
        201,
        json!({ "id": 42, "username": "ada", "fullName": "Ada Rider", "email": "ada@example.com", "role": "RIDER" }),
    );
    let ctx = create_context(&transport, None);
    let mut auth = AuthWorkflow::new(ctx.clone());

    let outcome: Outcome = auth.register(&create_register_request()).await;

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(
        auth.notice(),
        Some(&Notice::Success(String::from(
            "Account created successfully. Please sign in."
        )))
    );
    assert!(ctx.current_user().is_none());
    let body = request_body(&transport.last_to(Method::Post, "/auth/register"));
    assert_eq!(body["fullName"], json!("Ada Rider"));
    assert_eq!(body["paymentInfo"], json!("4111"));
}

#[tokio::test]
async fn test_register_requires_email() {
    let transport: RoutedTransport = RoutedTransport::default();
    let mut auth = AuthWorkflow::new(create_context(&transport, None));
    let request: RegisterRequest = RegisterRequest {
        email: String::from("  "),
        ..create_register_request()
    };

    let outcome: Outcome = auth.register(&request).await;

    assert!(matches!(outcome, Outcome::Rejected(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_register_rejection_is_shown_verbatim() {
    let transport: RoutedTransport = RoutedTransport::default();
    transport.json(
        Method::Post,
        "/auth/register",
        400,
        json!({ "message": "Username already taken" }),
    );
    let mut auth = AuthWorkflow::new(create_context(&transport, None));

    let outcome: Outcome = auth.register(&create_register_request()).await;

    assert_eq!(
        outcome,
        Outcome::Failed(String::from("Username already taken"))
    );
}

#[tokio::test]
async fn test_register_failure_without_message_uses_fallback() {
    let transport: RoutedTransport = RoutedTransport::default();
    transport.json(Method::Post, "/auth/register", 500, json!({}));
    let mut auth = AuthWorkflow::new(create_context(&transport, None));

    let outcome: Outcome = auth.register(&create_register_request()).await;

    assert_eq!(
        outcome,
        Outcome::Failed(String::from("Registration failed. Please try again."))
    );
}

#[test]
fn test_logout_clears_session() {
    let transport: RoutedTransport = RoutedTransport::default();
    let ctx = create_context(&transport, Some(create_test_rider()));
    let mut auth = AuthWorkflow::new(ctx.clone());

    assert_eq!(auth.logout(), Outcome::Completed);
    assert!(ctx.current_user().is_none());
    assert_eq!(auth.logout(), Outcome::Completed);
}
