//! Driving ports for the care reminder ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{CareType, Error, Recurrence, ReminderId, ReminderView, UserId};

/// Request to create a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReminderRequest {
    pub owner_id: UserId,
    pub title: String,
    pub plant_name: String,
    pub care_type: CareType,
    pub due_at: DateTime<Utc>,
    pub recurrence: Recurrence,
}

/// Result of toggling completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub reminder: ReminderView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successor: Option<ReminderView>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemindersCommand: Send + Sync {
    /// Create a reminder owned by the caller.
    async fn create_reminder(&self, request: CreateReminderRequest) -> Result<ReminderView, Error>;

    /// Flip `completed`; owner only.
    ///
    /// Completing a recurring reminder also schedules its successor.
    async fn toggle_complete(
        &self,
        reminder_id: ReminderId,
        actor_id: UserId,
    ) -> Result<CompletionOutcome, Error>;

    /// Delete a reminder; owner only.
    async fn delete_reminder(&self, reminder_id: ReminderId, actor_id: UserId)
    -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemindersQuery: Send + Sync {
    /// The owner's reminders, earliest due first, with `overdue` derived.
    async fn list_reminders(&self, owner_id: UserId) -> Result<Vec<ReminderView>, Error>;
}
