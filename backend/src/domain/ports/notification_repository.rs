//! Port for stored notifications.

use async_trait::async_trait;

use crate::domain::{Notification, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append a notification.
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;

    /// Notifications addressed to `receiver`, newest first.
    async fn list_for_receiver(
        &self,
        receiver: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;
}
