//! Port for the identity store holding user records.
//!
//! Credential issuance is external. The core reads users, writes profile
//! edits and applies follow changes through this port.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{AuthorProjection, Error, FollowChange, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserRepositoryError>;

    /// Fetch a user by email address (case-insensitive).
    async fn find_by_email(&self, email: &str)
    -> Result<Option<UserProfile>, UserRepositoryError>;

    /// Fetch author projections for the given users.
    ///
    /// Unknown ids are absent from the returned map rather than an error.
    async fn find_projections(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, AuthorProjection>, UserRepositoryError>;

    /// Persist editable profile fields (name, bio, interests, image).
    ///
    /// The social sets are not written here; they change only through
    /// [`UserRepository::apply_follow_change`].
    async fn save(&self, profile: &UserProfile) -> Result<(), UserRepositoryError>;

    /// Apply a follow change to both user records atomically.
    ///
    /// Either both `following` on the follower and `followers` on the
    /// followee change, or neither does.
    async fn apply_follow_change(&self, change: &FollowChange) -> Result<(), UserRepositoryError>;
}

/// Translate user repository failures into domain errors.
pub fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}
