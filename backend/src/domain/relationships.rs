//! Relationship graph: the symmetric follow relation between users.
//!
//! The edge is stored redundantly on both user records (`following` on the
//! follower, `followers` on the followee). Deciding the direction of a toggle
//! is pure ([`FollowChange::between`]); applying it to both records is the
//! repository's job and must be all-or-nothing.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::locks::EntityLocks;
use super::notifications::{NotificationKind, NotificationRecorder};
use super::ports::{
    NotificationRepository, RelationshipCommand, UserRepository, map_user_repository_error,
};
use super::{Error, UserId, UserProfile};

/// Direction of a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDirection {
    Follow,
    Unfollow,
}

/// A follow-graph mutation spanning two user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowChange {
    pub follower: UserId,
    pub followee: UserId,
    pub direction: FollowDirection,
}

/// Reasons a follow toggle is rejected before touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RelationshipError {
    #[error("users cannot follow themselves")]
    SelfFollow,
}

impl FollowChange {
    /// Decide what toggling `actor → target` does given current state.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use greencare::domain::{FollowChange, FollowDirection, UserId, UserProfile};
    ///
    /// let actor = UserProfile::new(UserId::random(), "Ada", "ada@example.com", Utc::now());
    /// let target = UserProfile::new(UserId::random(), "Bo", "bo@example.com", Utc::now());
    /// let change = FollowChange::between(&actor, &target).expect("distinct users");
    /// assert_eq!(change.direction, FollowDirection::Follow);
    /// ```
    pub fn between(
        actor: &UserProfile,
        target: &UserProfile,
    ) -> Result<Self, RelationshipError> {
        if actor.id == target.id {
            return Err(RelationshipError::SelfFollow);
        }
        let direction = if actor.is_following(&target.id) {
            FollowDirection::Unfollow
        } else {
            FollowDirection::Follow
        };
        Ok(Self {
            follower: actor.id,
            followee: target.id,
            direction,
        })
    }

    /// Whether the follower follows the followee once applied.
    pub fn is_following(&self) -> bool {
        matches!(self.direction, FollowDirection::Follow)
    }
}

/// Result of a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowOutcome {
    pub following: bool,
}

/// Service implementing the follow toggle.
#[derive(Clone)]
pub struct RelationshipService<U, N> {
    users: Arc<U>,
    notifications: NotificationRecorder<N>,
    locks: Arc<EntityLocks>,
}

impl<U, N> RelationshipService<U, N> {
    /// Create a new service.
    pub fn new(
        users: Arc<U>,
        notifications: NotificationRecorder<N>,
        locks: Arc<EntityLocks>,
    ) -> Self {
        Self {
            users,
            notifications,
            locks,
        }
    }
}

#[async_trait]
impl<U, N> RelationshipCommand for RelationshipService<U, N>
where
    U: UserRepository,
    N: NotificationRepository,
{
    async fn toggle_follow(&self, actor: UserId, target: UserId) -> Result<FollowOutcome, Error> {
        if actor == target {
            return Err(Error::invalid_request(
                RelationshipError::SelfFollow.to_string(),
            ));
        }

        let _guard = self
            .locks
            .lock_all([*actor.as_uuid(), *target.as_uuid()])
            .await;

        let target_profile = self
            .users
            .find_by_id(&target)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        let actor_profile = self
            .users
            .find_by_id(&actor)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthorized("caller is not a registered user"))?;

        let change = FollowChange::between(&actor_profile, &target_profile)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.users
            .apply_follow_change(&change)
            .await
            .map_err(map_user_repository_error)?;

        info!(
            follower = %change.follower,
            followee = %change.followee,
            following = change.is_following(),
            "follow graph updated"
        );

        if change.is_following() {
            self.notifications
                .record_best_effort(NotificationKind::Follow, actor, target, None)
                .await;
        }

        Ok(FollowOutcome {
            following: change.is_following(),
        })
    }
}

#[cfg(test)]
#[path = "relationships_tests.rs"]
mod tests;
