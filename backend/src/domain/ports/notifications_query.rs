//! Driving port for reading notifications.

use async_trait::async_trait;

use crate::domain::{Error, NotificationView, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsQuery: Send + Sync {
    /// Notifications addressed to `receiver`, newest first.
    async fn list_for_receiver(&self, receiver: UserId) -> Result<Vec<NotificationView>, Error>;
}
