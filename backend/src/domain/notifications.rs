//! Notification records derived from follow, like and comment events.
//!
//! Recording is purely additive. Nothing in the core reads notifications
//! back to make a decision, so a failure to record one is logged and
//! swallowed by [`NotificationRecorder::record_best_effort`] instead of
//! failing the operation that triggered it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ports::{
    NotificationRepository, NotificationRepositoryError, NotificationsQuery, UserRepository,
    map_user_repository_error,
};
use super::{AuthorProjection, Error, NotificationId, PostId, TraceId, UserId};

/// Event that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Follow,
    Like,
    Comment,
}

impl NotificationKind {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Like => "like",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown notification kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct UnknownNotificationKind(pub String);

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow" => Ok(Self::Follow),
            "like" => Ok(Self::Like),
            "comment" => Ok(Self::Comment),
            other => Err(UnknownNotificationKind(other.to_owned())),
        }
    }
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub kind: NotificationKind,
    pub related_post_id: Option<PostId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification joined with its sender projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: NotificationId,
    pub sender: Option<AuthorProjection>,
    pub kind: NotificationKind,
    pub related_post_id: Option<PostId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Records notifications on behalf of the content and relationship services.
pub struct NotificationRecorder<N> {
    repo: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<N> Clone for NotificationRecorder<N> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<N> NotificationRecorder<N>
where
    N: NotificationRepository,
{
    /// Create a recorder writing to `repo`.
    pub fn new(repo: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Record a notification for `receiver`.
    ///
    /// Returns `Ok(None)` when sender and receiver are the same user: nobody
    /// is notified about their own likes or comments.
    pub async fn record(
        &self,
        kind: NotificationKind,
        sender: UserId,
        receiver: UserId,
        related_post: Option<PostId>,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        if sender == receiver {
            debug!(%kind, user_id = %sender, "self-notification suppressed");
            return Ok(None);
        }
        let notification = Notification {
            id: NotificationId::random(),
            sender_id: sender,
            receiver_id: receiver,
            kind,
            related_post_id: related_post,
            is_read: false,
            created_at: self.clock.utc(),
        };
        self.repo.insert(&notification).await?;
        Ok(Some(notification))
    }

    /// Record a notification, logging instead of propagating failures.
    pub async fn record_best_effort(
        &self,
        kind: NotificationKind,
        sender: UserId,
        receiver: UserId,
        related_post: Option<PostId>,
    ) {
        if let Err(error) = self.record(kind, sender, receiver, related_post).await {
            let trace_id = TraceId::current().map(|id| id.to_string());
            warn!(
                %kind,
                sender_id = %sender,
                receiver_id = %receiver,
                trace_id = trace_id.as_deref().unwrap_or("-"),
                %error,
                "failed to record notification"
            );
        }
    }
}

/// Read side of the notification recorder.
#[derive(Clone)]
pub struct NotificationService<N, U> {
    notifications: Arc<N>,
    users: Arc<U>,
}

impl<N, U> NotificationService<N, U> {
    pub fn new(notifications: Arc<N>, users: Arc<U>) -> Self {
        Self {
            notifications,
            users,
        }
    }
}

fn map_notification_repository_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => Error::service_unavailable(
            format!("notification repository unavailable: {message}"),
        ),
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[async_trait]
impl<N, U> NotificationsQuery for NotificationService<N, U>
where
    N: NotificationRepository,
    U: UserRepository,
{
    async fn list_for_receiver(&self, receiver: UserId) -> Result<Vec<NotificationView>, Error> {
        let notifications = self
            .notifications
            .list_for_receiver(&receiver)
            .await
            .map_err(map_notification_repository_error)?;

        let senders: Vec<UserId> = notifications
            .iter()
            .map(|n| n.sender_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let projections = self
            .users
            .find_projections(&senders)
            .await
            .map_err(map_user_repository_error)?;

        Ok(notifications
            .into_iter()
            .map(|n| NotificationView {
                id: n.id,
                sender: projections.get(&n.sender_id).cloned(),
                kind: n.kind,
                related_post_id: n.related_post_id,
                is_read: n.is_read,
                created_at: n.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
