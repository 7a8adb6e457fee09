//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape and are registered with
//! utoipa under the domain type's name.

#![expect(
    dead_code,
    reason = "Schema wrappers are only used for OpenAPI generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A concurrent update won; retry the request.
    #[schema(rename = "conflict")]
    Conflict,
    /// The backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "caption must not be empty")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::AuthorProjection`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AuthorProjection)]
#[schema(rename_all = "camelCase")]
pub struct AuthorSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "Ada")]
    name: String,
    #[schema(example = "ada.png")]
    profile_image_ref: Option<String>,
}

/// OpenAPI schema for [`crate::domain::CommentView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CommentView)]
#[schema(rename_all = "camelCase")]
pub struct CommentSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// `null` when the author no longer exists.
    author: Option<AuthorSchema>,
    #[schema(example = "Lovely fern!")]
    text: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::PostView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PostView)]
#[schema(rename_all = "camelCase")]
pub struct PostSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// `null` when the author no longer exists.
    author: Option<AuthorSchema>,
    #[schema(example = "Hello plants")]
    caption: String,
    #[schema(example = "1717171717-monstera.jpg")]
    image_ref: Option<String>,
    /// Ids of users who like the post.
    #[schema(value_type = Vec<String>)]
    likes: Vec<String>,
    /// Comments in the order they were added.
    comments: Vec<CommentSchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::ReminderView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ReminderView)]
#[schema(rename_all = "camelCase")]
pub struct ReminderSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(value_type = String, format = Uuid)]
    owner_id: String,
    #[schema(example = "Weekly soak")]
    title: String,
    #[schema(example = "Monstera")]
    plant_name: String,
    #[schema(rename = "type", example = "watering")]
    care_type: String,
    #[schema(rename = "date", value_type = String, format = DateTime)]
    due_at: String,
    #[schema(rename = "repeat", example = "weekly")]
    recurrence: String,
    completed: bool,
    /// Not completed and due before now.
    overdue: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ports::CompletionOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::CompletionOutcome)]
pub struct CompletionSchema {
    reminder: ReminderSchema,
    /// Next occurrence, present when a recurring reminder was completed.
    successor: Option<ReminderSchema>,
}

/// OpenAPI schema for [`crate::domain::NotificationView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::NotificationView)]
#[schema(rename_all = "camelCase")]
pub struct NotificationSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    sender: Option<AuthorSchema>,
    #[schema(example = "like")]
    kind: String,
    #[schema(value_type = Option<String>, format = Uuid)]
    related_post_id: Option<String>,
    is_read: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::UserProfileView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserProfileView)]
#[schema(rename_all = "camelCase")]
pub struct UserProfileSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "Ada")]
    name: String,
    /// Only returned to the profile owner.
    email: Option<String>,
    bio: String,
    profile_image_ref: Option<String>,
    interests: Vec<String>,
    #[schema(value_type = Vec<String>)]
    followers: Vec<String>,
    #[schema(value_type = Vec<String>)]
    following: Vec<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}
