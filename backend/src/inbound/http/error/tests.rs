//! Tests for error envelopes and extractor rejections.

use super::*;
use actix_web::body::to_bytes;
use actix_web::test::TestRequest;
use rstest::{fixture, rstest};
use serde::de::Error as _;
use serde_json::{Value, json};

const TRACE_ID: &str = "6f1c8a52-3d0e-4b8e-9a57-1f0f3a1c2b4d";

#[fixture]
fn trace_id() -> TraceId {
    TRACE_ID.parse().expect("canonical trace id")
}

async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = error.error_response();
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("error body readable");
    let body = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, header, body)
}

#[rstest]
#[case(Error::invalid_argument("Username must be non-empty!"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("Must be logged in!"), StatusCode::UNAUTHORIZED)]
#[case(Error::permission_denied("Cannot update 'title' field!"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("Book not found!"), StatusCode::NOT_FOUND)]
#[case(Error::already_exists("Folder favourites already exists!"), StatusCode::CONFLICT)]
#[case(Error::internal("store offline"), StatusCode::INTERNAL_SERVER_ERROR)]
fn each_kind_has_its_status(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(error.status_code(), status);
}

#[rstest]
#[actix_web::test]
async fn internal_failures_are_redacted() {
    let error = Error::internal("ratings store unreachable")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "collection": "ratings" }));

    let (status, header, body) = render(&error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({ "code": "internal_error", "message": REDACTED_MESSAGE, "traceId": TRACE_ID })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::permission_denied("Cannot update 'title' field!")
        .with_details(json!({ "field": "title" }));

    let (status, header, body) = render(&error).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(header.is_none());
    assert_eq!(body["message"], "Cannot update 'title' field!");
    assert_eq!(body["details"], json!({ "field": "title" }));
    assert!(body.get("traceId").is_none());
}

#[rstest]
#[actix_web::test]
async fn errors_built_before_the_scope_pick_up_the_active_trace_id(trace_id: TraceId) {
    let error = Error::not_found("Invitation not found!");
    assert!(error.trace_id().is_none());

    let (_, header, body) = TraceId::scope(trace_id, async move { render(&error).await }).await;
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body["traceId"], TRACE_ID);
}

#[rstest]
#[actix_web::test]
async fn query_rejection_is_tagged_with_its_source() {
    let req = TestRequest::default().to_http_request();
    let err = reject_query(
        QueryPayloadError::Deserialize(serde::de::value::Error::custom("missing field `title`")),
        &req,
    );

    let response = err.error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("error body readable");
    let body: Value = serde_json::from_slice(&bytes).expect("error body is JSON");
    assert_eq!(body["code"], "invalid_argument");
    assert_eq!(body["details"]["source"], "query");
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Invalid query string"))
    );
}
