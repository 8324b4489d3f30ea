//! Static route table for the versioned API scope.
//!
//! Every endpoint is registered here so the full surface is visible in one
//! place. Item-list endpoints share generic handlers; the list kind is picked
//! per resource.

use actix_web::web;

use crate::domain::{Folders, Ratings};
use crate::inbound::http::error::{reject_body, reject_path, reject_query};
use crate::inbound::http::item_lists::{self, ListRoute};
use crate::inbound::http::{books, invitations, profiles, recommendations, users};

/// Register all API routes on `cfg`.
///
/// Body, query and path extraction failures are reported as
/// `invalid_argument` errors in the standard envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(reject_body))
        .app_data(web::QueryConfig::default().error_handler(reject_query))
        .app_data(web::PathConfig::default().error_handler(reject_path))
        .service(users::session_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::login)
        .service(users::logout)
        .service(books::list_books)
        .service(books::create_book)
        .service(books::get_book)
        .service(books::update_book)
        .service(books::delete_book)
        .service(books::rate_book)
        .service(books::send_recommendation)
        .service(books::post_invitation)
        .service(invitations::received_invitations)
        .service(invitations::posted_invitations)
        .service(invitations::get_invitation)
        .service(invitations::update_invitation)
        .service(invitations::delete_invitation)
        .service(invitations::accept_invitation)
        .service(invitations::decline_invitation)
        .service(recommendations::received_recommendations)
        .service(recommendations::sent_recommendations)
        .service(recommendations::get_recommendation)
        .service(recommendations::delete_recommendation)
        .service(profiles::get_profile)
        .service(profiles::list_friends)
        .service(profiles::create_profile)
        .service(profiles::add_to_shelf)
        .service(profiles::remove_from_shelf)
        .service(profiles::add_friend)
        .service(profiles::remove_friend);
    item_list_routes::<Folders>(cfg, "folders");
    item_list_routes::<Ratings>(cfg, "ratings");
}

fn item_list_routes<K: ListRoute>(cfg: &mut web::ServiceConfig, segment: &str) {
    cfg.service(
        web::resource(format!("/user/{{username}}/{segment}"))
            .route(web::get().to(item_lists::get_lists::<K>)),
    )
    .service(
        web::resource(format!("/user/{{username}}/{segment}/{{name}}"))
            .route(web::get().to(item_lists::get_list_contents::<K>))
            .route(web::post().to(item_lists::create_list::<K>))
            .route(web::patch().to(item_lists::add_items::<K>))
            .route(web::delete().to(item_lists::delete_list::<K>)),
    )
    .service(
        web::resource(format!("/user/{{username}}/{segment}/{{name}}/items"))
            .route(web::delete().to(item_lists::remove_items::<K>)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;

    use crate::inbound::http::test_utils::{json_body, sign_up_and_log_in, test_app, test_state};

    #[actix_web::test]
    async fn malformed_json_is_invalid_argument() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let cookie = sign_up_and_log_in(&app, "ada").await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/books")
                .cookie(cookie)
                .insert_header(("content-type", "application/json"))
                .set_payload("{\"title\":")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "invalid_argument");
        assert_eq!(body["details"]["source"], "body");
    }

    #[actix_web::test]
    async fn unknown_route_is_not_found() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/nowhere")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
