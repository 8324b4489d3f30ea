//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the macro-routed HTTP handlers, the schema wrappers
//! from [`crate::inbound::http::schemas`] and the session cookie security
//! scheme. The document is served by Swagger UI in debug builds and exported
//! with `openapi-dump`. Folder and rating-list routes are generic over the
//! list kind and are described in the route table instead.

use crate::inbound::http::books::{
    CreateBookRequest, InvitationRequest, RatingRequest, RecommendationRequest,
};
use crate::inbound::http::item_lists::ItemsRequest;
use crate::inbound::http::profiles::CreateProfileRequest;
use crate::inbound::http::schemas::{
    BookSchema, ErrorCodeSchema, ErrorSchema, InvitationSchema, MessageSchema, PatchSchema,
    ProfileSchema, PublicUserSchema, RecommendationSchema,
};
use crate::inbound::http::users::{CredentialsRequest, UpdateUserRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Shelfmates API",
        description = "Social reading tracker: accounts, books, shelves, ratings, invitations and recommendations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::session_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::update_book,
        crate::inbound::http::books::delete_book,
        crate::inbound::http::books::rate_book,
        crate::inbound::http::books::send_recommendation,
        crate::inbound::http::books::post_invitation,
        crate::inbound::http::invitations::received_invitations,
        crate::inbound::http::invitations::posted_invitations,
        crate::inbound::http::invitations::get_invitation,
        crate::inbound::http::invitations::update_invitation,
        crate::inbound::http::invitations::delete_invitation,
        crate::inbound::http::invitations::accept_invitation,
        crate::inbound::http::invitations::decline_invitation,
        crate::inbound::http::recommendations::received_recommendations,
        crate::inbound::http::recommendations::sent_recommendations,
        crate::inbound::http::recommendations::get_recommendation,
        crate::inbound::http::recommendations::delete_recommendation,
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::profiles::list_friends,
        crate::inbound::http::profiles::create_profile,
        crate::inbound::http::profiles::add_to_shelf,
        crate::inbound::http::profiles::remove_from_shelf,
        crate::inbound::http::profiles::add_friend,
        crate::inbound::http::profiles::remove_friend,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MessageSchema,
        PublicUserSchema,
        BookSchema,
        InvitationSchema,
        RecommendationSchema,
        ProfileSchema,
        PatchSchema,
        CredentialsRequest,
        UpdateUserRequest,
        CreateBookRequest,
        RatingRequest,
        RecommendationRequest,
        InvitationRequest,
        ItemsRequest,
        CreateProfileRequest,
    )),
    tags(
        (name = "users", description = "Accounts and sessions"),
        (name = "books", description = "Book catalogue, ratings and sharing"),
        (name = "invitations", description = "Reading invitations between users"),
        (name = "recommendations", description = "Book recommendations between users"),
        (name = "profiles", description = "Profiles, shelves and friends"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("crate.domain.Error", "code")]
    #[case("crate.domain.Error", "message")]
    #[case("crate.domain.PublicUser", "username")]
    #[case("crate.domain.Book", "avgRating")]
    #[case("crate.domain.Invitation", "usersPending")]
    #[case("crate.domain.Profile", "booksToRead")]
    fn schemas_expose_wire_fields(#[case] schema_name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(schema_name).expect("schema registered");
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/books/{id}/rating")]
    #[case("/api/v1/invitations/{id}/accept")]
    #[case("/api/v1/user/{username}/recommendations")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
