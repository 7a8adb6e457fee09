//! Profile reads and owner-only profile edits.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::ports::{
    ProfileCommand, ProfileQuery, UpdateProfileRequest, UserRepository, map_user_repository_error,
};
use super::{Error, UserId, UserProfile, UserValidationError};

/// Profile as returned over the API.
///
/// `email` is only present when the viewer is the profile owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileView {
    pub id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub bio: String,
    pub profile_image_ref: Option<String>,
    pub interests: Vec<String>,
    pub followers: Vec<UserId>,
    pub following: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl UserProfileView {
    pub fn for_viewer(profile: &UserProfile, viewer: UserId) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            email: (viewer == profile.id).then(|| profile.email.clone()),
            bio: profile.bio.clone(),
            profile_image_ref: profile.profile_image_ref.clone(),
            interests: profile.interests.iter().cloned().collect(),
            followers: profile.followers.iter().copied().collect(),
            following: profile.following.iter().copied().collect(),
            created_at: profile.created_at,
        }
    }
}

fn map_validation_error(error: UserValidationError) -> Error {
    let field = match error {
        UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => "name",
        UserValidationError::BioTooLong { .. } => "bio",
        UserValidationError::TooManyInterests { .. } | UserValidationError::EmptyInterest => {
            "interests"
        }
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

#[derive(Clone)]
pub struct ProfileService<U> {
    users: Arc<U>,
}

impl<U> ProfileService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U: UserRepository> ProfileService<U> {
    async fn load(&self, user_id: UserId) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U: UserRepository> ProfileCommand for ProfileService<U> {
    async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UserProfileView, Error> {
        if request.actor_id != request.user_id {
            return Err(Error::forbidden("users may only edit their own profile"));
        }
        let mut profile = self.load(request.user_id).await?;
        request
            .update
            .apply_to(&mut profile)
            .map_err(map_validation_error)?;
        self.users
            .save(&profile)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %profile.id, "profile updated");
        Ok(UserProfileView::for_viewer(&profile, request.actor_id))
    }
}

#[async_trait]
impl<U: UserRepository> ProfileQuery for ProfileService<U> {
    async fn fetch_profile(
        &self,
        viewer: UserId,
        user_id: UserId,
    ) -> Result<UserProfileView, Error> {
        let profile = self.load(user_id).await?;
        Ok(UserProfileView::for_viewer(&profile, viewer))
    }
}
