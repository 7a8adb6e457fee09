//! Driving port for the follow graph.

use async_trait::async_trait;

use crate::domain::{Error, FollowOutcome, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipCommand: Send + Sync {
    /// Follow `target`, or unfollow if `actor` already follows them.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when `actor == target`.
    /// - `not_found` when `target` does not exist.
    async fn toggle_follow(&self, actor: UserId, target: UserId) -> Result<FollowOutcome, Error>;
}
