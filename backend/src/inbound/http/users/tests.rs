//! Tests for users and session handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{
    json_body, session_cookie, sign_up_and_log_in, test_app, test_state,
};

#[rstest]
#[case("   ", "pw")]
#[case("ada", "")]
#[actix_web::test]
async fn sign_up_rejects_blank_credentials(#[case] username: &str, #[case] password: &str) {
    let app = actix_test::init_service(test_app(test_state())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = json_body(response).await;
    assert_eq!(value["code"], "invalid_argument");
    assert_eq!(value["message"], "Username and password must be non-empty!");
}

#[actix_web::test]
async fn duplicate_username_conflicts() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let body = json!({ "username": "ada", "password": "pw" });
    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let created = json_body(first).await;
    assert_eq!(created["msg"], "User created successfully!");
    assert!(created["user"].get("password").is_none());

    let second = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorised() {
    let app = actix_test::init_service(test_app(test_state())).await;
    sign_up_and_log_in(&app, "ada").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": "ada", "password": "nope" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let value = json_body(response).await;
    assert_eq!(value["code"], "unauthorized");
}

#[actix_web::test]
async fn session_user_round_trips_through_cookie() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let cookie = sign_up_and_log_in(&app, "ada").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/session")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert_eq!(value["username"], "ada");
    assert!(value.get("password").is_none());
}

#[actix_web::test]
async fn session_without_login_is_unauthorised() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/session")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn sign_up_while_logged_in_is_forbidden() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let cookie = sign_up_and_log_in(&app, "ada").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .cookie(cookie)
            .set_json(json!({ "username": "grace", "password": "pw" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn rename_to_taken_username_conflicts() {
    let app = actix_test::init_service(test_app(test_state())).await;
    sign_up_and_log_in(&app, "grace").await;
    let cookie = sign_up_and_log_in(&app, "ada").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/users")
            .cookie(cookie.clone())
            .set_json(json!({ "username": "grace" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/users")
            .cookie(cookie)
            .set_json(json!({ "profilePictureUrl": "https://example.org/ada.png" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert_eq!(value["msg"], "User updated successfully!");
}

#[actix_web::test]
async fn listing_filters_by_username() {
    let app = actix_test::init_service(test_app(test_state())).await;
    sign_up_and_log_in(&app, "ada").await;
    sign_up_and_log_in(&app, "grace").await;

    let all = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;
    let all = json_body(all).await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let one = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users?username=grace")
            .to_request(),
    )
    .await;
    let one = json_body(one).await;
    let names: Vec<&str> = one
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect();
    assert_eq!(names, ["grace"]);
}

#[actix_web::test]
async fn unknown_username_is_not_found() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/nobody")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let value: Value = json_body(response).await;
    assert_eq!(value["message"], "User nobody not found!");
}

#[actix_web::test]
async fn deleting_account_ends_session() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let cookie = sign_up_and_log_in(&app, "ada").await;

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let cleared = session_cookie(&deleted);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/session")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let gone = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/ada")
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
