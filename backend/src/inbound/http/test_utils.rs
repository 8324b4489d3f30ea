//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use crate::inbound::http::routes;
use crate::inbound::http::state::{HttpState, HttpStateStores};
use crate::test_support::SteppingClock;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Fresh in-memory state on a deterministic clock.
pub fn test_state() -> web::Data<HttpState> {
    let start = Utc
        .with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    web::Data::new(HttpState::new(HttpStateStores::in_memory(Arc::new(
        SteppingClock::new(start),
    ))))
}

/// Application serving the full API table under `/api/v1`.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .configure(routes::configure),
    )
}

/// Extract the session cookie set by `response`.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Decode a JSON response body.
pub async fn json_body(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("response JSON")
}

/// Register `username` and log in, returning the session cookie.
pub async fn sign_up_and_log_in<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let credentials = json!({ "username": username, "password": "pw" });
    let created = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert!(created.status().is_success(), "sign-up failed");

    let logged_in = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert!(logged_in.status().is_success(), "login failed");
    session_cookie(&logged_in)
}
