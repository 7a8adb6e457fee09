//! Reminder service implementing the ledger's driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::{PlantName, Reminder, ReminderDraft, ReminderError, ReminderTitle, ReminderView};
use crate::domain::locks::EntityLocks;
use crate::domain::ports::{
    CompletionOutcome, CreateReminderRequest, ReminderRepository, RemindersCommand,
    RemindersQuery, map_reminder_repository_error,
};
use crate::domain::{Error, ReminderId, UserId};

pub struct ReminderService<R> {
    reminders: Arc<R>,
    locks: Arc<EntityLocks>,
    clock: Arc<dyn Clock>,
}

impl<R> ReminderService<R> {
    pub fn new(reminders: Arc<R>, locks: Arc<EntityLocks>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reminders,
            locks,
            clock,
        }
    }
}

fn map_reminder_error(error: ReminderError) -> Error {
    let message = error.to_string();
    match error {
        ReminderError::EmptyPlantName | ReminderError::PlantNameTooLong { .. } => {
            Error::invalid_request(message).with_details(json!({ "field": "plantName" }))
        }
        ReminderError::TitleTooLong { .. } => {
            Error::invalid_request(message).with_details(json!({ "field": "title" }))
        }
        ReminderError::DueDateOutOfRange => {
            Error::invalid_request(message).with_details(json!({ "field": "date" }))
        }
        ReminderError::NotOwner => Error::forbidden(message),
    }
}

impl<R: ReminderRepository> ReminderService<R> {
    async fn load(&self, reminder_id: ReminderId) -> Result<Reminder, Error> {
        self.reminders
            .find_by_id(&reminder_id)
            .await
            .map_err(map_reminder_repository_error)?
            .ok_or_else(|| Error::not_found(format!("reminder {reminder_id} not found")))
    }
}

#[async_trait]
impl<R: ReminderRepository> RemindersCommand for ReminderService<R> {
    async fn create_reminder(&self, request: CreateReminderRequest) -> Result<ReminderView, Error> {
        let draft = ReminderDraft {
            owner_id: request.owner_id,
            title: ReminderTitle::new(&request.title).map_err(map_reminder_error)?,
            plant_name: PlantName::new(&request.plant_name).map_err(map_reminder_error)?,
            care_type: request.care_type,
            due_at: request.due_at,
            recurrence: request.recurrence,
        };
        let now = self.clock.utc();
        let reminder = Reminder::create(ReminderId::random(), draft, now);
        self.reminders
            .insert(&reminder)
            .await
            .map_err(map_reminder_repository_error)?;
        info!(
            reminder_id = %reminder.id,
            user_id = %reminder.owner_id,
            recurrence = %reminder.recurrence,
            "reminder created"
        );
        Ok(ReminderView::at(&reminder, now))
    }

    async fn toggle_complete(
        &self,
        reminder_id: ReminderId,
        actor_id: UserId,
    ) -> Result<CompletionOutcome, Error> {
        let _guard = self.locks.lock(*reminder_id.as_uuid()).await;
        let current = self.load(reminder_id).await?;
        let now = self.clock.utc();
        let change = current
            .toggle_completion(actor_id, now)
            .map_err(map_reminder_error)?;
        self.reminders
            .apply_completion(&change, current.revision)
            .await
            .map_err(map_reminder_repository_error)?;

        info!(
            %reminder_id,
            completed = change.reminder.completed,
            successor_id = ?change.successor.as_ref().map(|s| s.id),
            "reminder completion toggled"
        );
        Ok(CompletionOutcome {
            reminder: ReminderView::at(&change.reminder, now),
            successor: change
                .successor
                .as_ref()
                .map(|successor| ReminderView::at(successor, now)),
        })
    }

    async fn delete_reminder(
        &self,
        reminder_id: ReminderId,
        actor_id: UserId,
    ) -> Result<(), Error> {
        let _guard = self.locks.lock(*reminder_id.as_uuid()).await;
        let reminder = self.load(reminder_id).await?;
        reminder.ensure_owner(actor_id).map_err(map_reminder_error)?;
        let removed = self
            .reminders
            .delete(&reminder_id)
            .await
            .map_err(map_reminder_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("reminder {reminder_id} not found")));
        }
        info!(%reminder_id, user_id = %actor_id, "reminder deleted");
        Ok(())
    }
}

#[async_trait]
impl<R: ReminderRepository> RemindersQuery for ReminderService<R> {
    async fn list_reminders(&self, owner_id: UserId) -> Result<Vec<ReminderView>, Error> {
        let now = self.clock.utc();
        let reminders = self
            .reminders
            .list_for_owner(&owner_id)
            .await
            .map_err(map_reminder_repository_error)?;
        Ok(reminders
            .iter()
            .map(|reminder| ReminderView::at(reminder, now))
            .collect())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
