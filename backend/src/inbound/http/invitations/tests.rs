//! Tests for invitation handlers.

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{json_body, sign_up_and_log_in, test_app, test_state};

/// Ada creates a book and invites Grace; returns the invitation id.
async fn invite_grace<S>(app: &S, ada: Cookie<'static>) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let book = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/books")
            .cookie(ada.clone())
            .set_json(json!({ "title": "Dune", "author": "Frank Herbert" }))
            .to_request(),
    )
    .await;
    let book = json_body(book).await;
    let book_id = book["book"]["_id"].as_str().expect("book id").to_owned();

    let posted = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/books/{book_id}/invitation"))
            .cookie(ada)
            .set_json(json!({ "invitees": ["grace"] }))
            .to_request(),
    )
    .await;
    assert_eq!(posted.status(), StatusCode::OK);
    let posted = json_body(posted).await;
    assert_eq!(posted["msg"], "Invitation successfully posted!");
    posted["invitation"]["_id"]
        .as_str()
        .expect("invitation id")
        .to_owned()
}

async fn list<S>(app: &S, uri: &str) -> Vec<Value>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response =
        actix_test::call_service(app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    json_body(response)
        .await
        .as_array()
        .cloned()
        .expect("array")
}

#[actix_web::test]
async fn accepting_moves_user_out_of_received() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let grace = sign_up_and_log_in(&app, "grace").await;
    let ada = sign_up_and_log_in(&app, "ada").await;
    let id = invite_grace(&app, ada).await;

    assert_eq!(list(&app, "/api/v1/user/grace/invitations/received").await.len(), 1);
    assert_eq!(list(&app, "/api/v1/user/ada/invitations/posted").await.len(), 1);

    let accepted = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/invitations/{id}/accept"))
            .cookie(grace.clone())
            .to_request(),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    assert!(list(&app, "/api/v1/user/grace/invitations/received").await.is_empty());

    let again = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/invitations/{id}/decline"))
            .cookie(grace)
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::FORBIDDEN);

    let invitation = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/invitations/{id}"))
            .to_request(),
    )
    .await;
    let invitation = json_body(invitation).await;
    assert_eq!(invitation["usersPending"], json!([]));
    assert_eq!(invitation["usersAccepted"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn only_the_poster_may_edit() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let grace = sign_up_and_log_in(&app, "grace").await;
    let ada = sign_up_and_log_in(&app, "ada").await;
    let id = invite_grace(&app, ada.clone()).await;

    let by_grace = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/invitations/{id}"))
            .cookie(grace)
            .to_request(),
    )
    .await;
    assert_eq!(by_grace.status(), StatusCode::FORBIDDEN);

    let reserved = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/invitations/{id}"))
            .cookie(ada.clone())
            .set_json(json!({ "book": id }))
            .to_request(),
    )
    .await;
    assert_eq!(reserved.status(), StatusCode::FORBIDDEN);
    let reserved = json_body(reserved).await;
    assert_eq!(reserved["message"], "Cannot update 'book' field!");

    let cleared = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/invitations/{id}"))
            .cookie(ada.clone())
            .set_json(json!({ "usersPending": [] }))
            .to_request(),
    )
    .await;
    assert_eq!(cleared.status(), StatusCode::OK);

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/invitations/{id}"))
            .cookie(ada)
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
}

#[actix_web::test]
async fn answering_requires_login() {
    let app = actix_test::init_service(test_app(test_state())).await;
    let ada = sign_up_and_log_in(&app, "ada").await;
    sign_up_and_log_in(&app, "grace").await;
    let id = invite_grace(&app, ada).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/invitations/{id}/accept"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
