//! User profile and follow HTTP handlers.
//!
//! ```text
//! POST /api/users/follow/{id}
//! GET  /api/users/{id}
//! PUT  /api/users/{id}
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UpdateProfileRequest;
use crate::domain::{ProfileUpdate, UserId, UserProfileView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, UserProfileSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const USER_ID: FieldName = FieldName::new("userId");

/// Result of a follow toggle.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FollowResponse {
    /// `Followed` or `Unfollowed`.
    #[schema(example = "Followed")]
    pub message: String,
    /// Whether the caller now follows the target.
    pub following: bool,
}

/// Interests may arrive as a list or as one comma-separated string.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum InterestsField {
    List(Vec<String>),
    Csv(String),
}

impl InterestsField {
    fn into_list(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Partial profile edit; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileBody {
    #[schema(example = "Ada")]
    pub name: Option<String>,
    #[schema(example = "Fern collector")]
    pub bio: Option<String>,
    pub interests: Option<InterestsField>,
    /// Filename of an already stored image; an empty string clears it.
    #[schema(example = "ada.png")]
    pub profile_pic: Option<String>,
}

impl From<UpdateProfileBody> for ProfileUpdate {
    fn from(body: UpdateProfileBody) -> Self {
        Self {
            name: body.name,
            bio: body.bio,
            interests: body.interests.map(InterestsField::into_list),
            profile_image_ref: body.profile_pic,
        }
    }
}

/// Follow the target, or unfollow if the caller already follows them.
#[utoipa::path(
    post,
    path = "/api/users/follow/{id}",
    params(("id" = String, Path, description = "User to follow or unfollow")),
    responses(
        (status = 200, description = "Follow state after the toggle", body = FollowResponse),
        (status = 400, description = "Self-follow or malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "toggleFollow"
)]
#[post("/users/follow/{id}")]
pub async fn toggle_follow(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<FollowResponse>> {
    let target: UserId = parse_id(&path, USER_ID)?;
    let outcome = state
        .relationships
        .toggle_follow(caller.id(), target)
        .await?;
    let message = if outcome.following {
        "Followed"
    } else {
        "Unfollowed"
    };
    Ok(web::Json(FollowResponse {
        message: message.to_owned(),
        following: outcome.following,
    }))
}

/// Fetch a user's public profile. The owner also sees their email.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile", body = UserProfileSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserProfile"
)]
#[get("/users/{id}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfileView>> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let profile = state
        .profiles_query
        .fetch_profile(caller.id(), user_id)
        .await?;
    Ok(web::Json(profile))
}

/// Edit the caller's own profile.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id; must be the caller")),
    request_body = UpdateProfileBody,
    responses(
        (status = 200, description = "Updated profile", body = UserProfileSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the caller's profile", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUserProfile"
)]
#[put("/users/{id}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateProfileBody>,
) -> ApiResult<web::Json<UserProfileView>> {
    let user_id: UserId = parse_id(&path, USER_ID)?;
    let profile = state
        .profiles
        .update_profile(UpdateProfileRequest {
            actor_id: caller.id(),
            user_id,
            update: payload.into_inner().into(),
        })
        .await?;
    Ok(web::Json(profile))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
