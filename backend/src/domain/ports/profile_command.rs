//! Driving ports for user profiles.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, UserId, UserProfileView};

/// Request to edit a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    pub actor_id: UserId,
    pub user_id: UserId,
    pub update: ProfileUpdate,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Apply a profile edit; only the profile owner may edit.
    async fn update_profile(&self, request: UpdateProfileRequest)
    -> Result<UserProfileView, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Fetch `user_id`'s profile as seen by `viewer`.
    async fn fetch_profile(&self, viewer: UserId, user_id: UserId)
    -> Result<UserProfileView, Error>;
}
