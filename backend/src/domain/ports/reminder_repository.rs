//! Port for the care reminder ledger.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{CompletionChange, Error, Reminder, ReminderId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reminder repository adapters.
    pub enum ReminderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "reminder repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "reminder repository query failed: {message}",
        /// The stored revision moved on since the reminder was read.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Fetch a reminder by identifier.
    async fn find_by_id(&self, id: &ReminderId) -> Result<Option<Reminder>, ReminderRepositoryError>;

    /// Reminders owned by `owner`, earliest due first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Reminder>, ReminderRepositoryError>;

    /// Store a new reminder.
    async fn insert(&self, reminder: &Reminder) -> Result<(), ReminderRepositoryError>;

    /// Write a completion flip and its successor, if any, as one unit.
    ///
    /// The flip is checked against `expected_revision`. When it fails the
    /// successor is not stored either.
    async fn apply_completion(
        &self,
        change: &CompletionChange,
        expected_revision: u32,
    ) -> Result<(), ReminderRepositoryError>;

    /// Remove a reminder. Successors it spawned are left alone.
    ///
    /// Returns `false` when no such reminder existed.
    async fn delete(&self, id: &ReminderId) -> Result<bool, ReminderRepositoryError>;
}

/// Translate reminder repository failures into domain errors.
pub fn map_reminder_repository_error(error: ReminderRepositoryError) -> Error {
    match error {
        ReminderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reminder repository unavailable: {message}"))
        }
        ReminderRepositoryError::Query { message } => {
            Error::internal(format!("reminder repository error: {message}"))
        }
        ReminderRepositoryError::RevisionMismatch { expected, actual } => {
            Error::conflict("reminder was modified concurrently").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
    }
}
