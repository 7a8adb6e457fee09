//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` handler, the health probes and the
//! schema wrappers from [`crate::inbound::http::schemas`]. Swagger UI serves
//! it in debug builds and `openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::posts::{CommentBody, CreatePostBody, EditCaptionBody, MessageResponse};
use crate::inbound::http::reminders::CreateReminderBody;
use crate::inbound::http::schemas::{
    AuthorSchema, CommentSchema, CompletionSchema, ErrorCodeSchema, ErrorSchema,
    NotificationSchema, PostSchema, ReminderSchema, UserProfileSchema,
};
use crate::inbound::http::users::{FollowResponse, InterestsField, UpdateProfileBody};

/// Adds the bearer token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Opaque access token issued by the identity service."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "GreenCare API",
        description = "Plant-care social platform: posts, follows, care reminders and notifications."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::edit_caption,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::toggle_like,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::posts::delete_comment,
        crate::inbound::http::users::toggle_follow,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::reminders::list_reminders,
        crate::inbound::http::reminders::create_reminder,
        crate::inbound::http::reminders::toggle_complete,
        crate::inbound::http::reminders::delete_reminder,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AuthorSchema,
        CommentSchema,
        PostSchema,
        ReminderSchema,
        CompletionSchema,
        NotificationSchema,
        UserProfileSchema,
        CreatePostBody,
        EditCaptionBody,
        CommentBody,
        MessageResponse,
        CreateReminderBody,
        FollowResponse,
        InterestsField,
        UpdateProfileBody,
    )),
    tags(
        (name = "posts", description = "Posts, likes and comments"),
        (name = "users", description = "Profiles and the follow graph"),
        (name = "reminders", description = "Care reminders"),
        (name = "notifications", description = "Activity notifications"),
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

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

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
    fn error_schema_has_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        for field in ["code", "message", "traceId", "details"] {
            assert_object_schema_has_field(error_schema, field);
        }
    }

    #[rstest]
    #[case("/api/posts")]
    #[case("/api/posts/{id}/like")]
    #[case("/api/posts/{post_id}/comment/{comment_id}")]
    #[case("/api/users/follow/{id}")]
    #[case("/api/users/{id}")]
    #[case("/api/reminders/{id}/complete")]
    #[case("/api/notifications")]
    #[case("/health/ready")]
    fn documents_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn declares_bearer_security() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
    }
}
