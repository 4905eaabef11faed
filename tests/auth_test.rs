use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kerala_classifieds::error::Error;
use kerala_classifieds::forms::{SignInForm, SignUpForm};
use kerala_classifieds::Marketplace;

fn token_response(user_id: Uuid) -> serde_json::Value {
    json!({
        "access_token": "jwt-access",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "jwt-refresh",
        "user": {
            "id": user_id,
            "email": "user@example.com",
            "phone": null,
            "user_metadata": { "full_name": "Asha Menon" },
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }
    })
}

#[tokio::test]
async fn sign_in_folds_the_token_response_into_a_session() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(user_id)))
        .expect(1)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let session = app
        .auth()
        .sign_in(&SignInForm {
            email: "user@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(session.user_id, user_id);
    assert_eq!(session.access_token, "jwt-access");
    assert_eq!(session.email.as_deref(), Some("user@example.com"));
    assert!(!session.is_expired());
}

#[tokio::test]
async fn rejected_credentials_surface_the_backend_description() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let error = app
        .auth()
        .sign_in(&SignInForm {
            email: "user@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();

    match error {
        Error::Auth(message) => assert_eq!(message, "Invalid login credentials"),
        other => panic!("expected an auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn an_invalid_form_never_reaches_the_network() {
    let server = MockServer::start().await;
    let app = Marketplace::new(&server.uri(), "anon-key");

    let error = app
        .auth()
        .sign_in(&SignInForm {
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(error, Error::Validation(_)));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn sign_up_sends_the_full_name_as_metadata() {
    let server = MockServer::start().await;

    // Email confirmation pending: the backend returns the user alone.
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": Uuid::new_v4(),
                "email": "new@example.com",
                "user_metadata": { "full_name": "Asha Menon" },
                "created_at": "2025-01-01T00:00:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let response = app
        .auth()
        .sign_up(&SignUpForm {
            email: "new@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            full_name: "Asha Menon".to_string(),
        })
        .await
        .unwrap();

    assert!(response.session().is_none());
    assert_eq!(
        response.user.as_ref().and_then(|u| u.full_name()),
        Some("Asha Menon")
    );

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["data"]["full_name"], "Asha Menon");
}

#[tokio::test]
async fn sign_out_posts_the_bearer_token() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(user_id)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("Authorization", "Bearer jwt-access"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let session = app
        .auth()
        .sign_in(&SignInForm {
            email: "user@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    app.auth().sign_out(&session).await.unwrap();
}

#[tokio::test]
async fn get_user_returns_the_authenticated_record() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response(user_id)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer jwt-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": user_id,
            "email": "user@example.com",
            "user_metadata": { "full_name": "Asha Menon" },
            "created_at": "2025-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let session = app
        .auth()
        .sign_in(&SignInForm {
            email: "user@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    let user = app.auth().get_user(&session).await.unwrap();
    assert_eq!(user.id, user_id);
    assert_eq!(user.full_name(), Some("Asha Menon"));
}
