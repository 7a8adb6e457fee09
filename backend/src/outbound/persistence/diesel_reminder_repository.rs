//! PostgreSQL-backed `ReminderRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ReminderRepository, ReminderRepositoryError};
use crate::domain::{
    CompletionChange, PlantName, Reminder, ReminderId, ReminderTitle, UserId,
};

use super::diesel_errors::{TxError, revision_from_db, revision_to_db};
use super::models::ReminderRow;
use super::pool::DbPool;
use super::schema::reminders;

/// Diesel-backed implementation of the `ReminderRepository` port.
///
/// Completing a recurring reminder writes the completion and inserts the
/// successor in one transaction, so a reader never sees one without the
/// other.
#[derive(Clone)]
pub struct DieselReminderRepository {
    pool: DbPool,
}

impl DieselReminderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn invalid_row(id: uuid::Uuid, err: impl std::fmt::Display) -> ReminderRepositoryError {
    ReminderRepositoryError::query(format!("stored reminder {id} is invalid: {err}"))
}

fn row_to_reminder(row: ReminderRow) -> Result<Reminder, ReminderRepositoryError> {
    let id = row.id;
    Ok(Reminder {
        id: ReminderId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        title: ReminderTitle::new(&row.title).map_err(|err| invalid_row(id, err))?,
        plant_name: PlantName::new(&row.plant_name).map_err(|err| invalid_row(id, err))?,
        care_type: row.care_type.parse().map_err(|err| invalid_row(id, err))?,
        due_at: row.due_at,
        recurrence: row.recurrence.parse().map_err(|err| invalid_row(id, err))?,
        completed: row.completed,
        created_at: row.created_at,
        revision: revision_from_db(row.revision),
    })
}

fn reminder_to_row(reminder: &Reminder) -> ReminderRow {
    ReminderRow {
        id: *reminder.id.as_uuid(),
        owner_id: *reminder.owner_id.as_uuid(),
        title: reminder.title.as_str().to_owned(),
        plant_name: reminder.plant_name.as_str().to_owned(),
        care_type: reminder.care_type.as_str().to_owned(),
        due_at: reminder.due_at,
        recurrence: reminder.recurrence.as_str().to_owned(),
        completed: reminder.completed,
        created_at: reminder.created_at,
        revision: revision_to_db(reminder.revision),
    }
}

#[async_trait]
impl ReminderRepository for DieselReminderRepository {
    async fn find_by_id(
        &self,
        id: &ReminderId,
    ) -> Result<Option<Reminder>, ReminderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(ReminderRepositoryError::from_store)?;

        let row: Option<ReminderRow> = reminders::table
            .find(id.as_uuid())
            .select(ReminderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(ReminderRepositoryError::from_store)?;

        row.map(row_to_reminder).transpose()
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Reminder>, ReminderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(ReminderRepositoryError::from_store)?;

        let rows: Vec<ReminderRow> = reminders::table
            .filter(reminders::owner_id.eq(owner.as_uuid()))
            .order((reminders::due_at.asc(), reminders::created_at.asc()))
            .select(ReminderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(ReminderRepositoryError::from_store)?;

        rows.into_iter().map(row_to_reminder).collect()
    }

    async fn insert(&self, reminder: &Reminder) -> Result<(), ReminderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(ReminderRepositoryError::from_store)?;

        diesel::insert_into(reminders::table)
            .values(&reminder_to_row(reminder))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(ReminderRepositoryError::from_store)
    }

    async fn apply_completion(
        &self,
        change: &CompletionChange,
        expected_revision: u32,
    ) -> Result<(), ReminderRepositoryError> {
        let reminder_id = *change.reminder.id.as_uuid();
        let completed = change.reminder.completed;
        let revision = revision_to_db(change.reminder.revision);
        let successor = change.successor.as_ref().map(reminder_to_row);
        let mut conn = self.pool.get().await.map_err(ReminderRepositoryError::from_store)?;

        conn.transaction::<_, TxError, _>(move |conn| {
            async move {
                let stored: Option<i32> = reminders::table
                    .find(reminder_id)
                    .select(reminders::revision)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(stored) = stored else {
                    return Err(TxError::Missing("reminder"));
                };
                let actual = revision_from_db(stored);
                if actual != expected_revision {
                    return Err(TxError::RevisionMismatch {
                        expected: expected_revision,
                        actual,
                    });
                }

                diesel::update(reminders::table.find(reminder_id))
                    .set((
                        reminders::completed.eq(completed),
                        reminders::revision.eq(revision),
                    ))
                    .execute(conn)
                    .await?;
                if let Some(successor) = successor {
                    diesel::insert_into(reminders::table)
                        .values(&successor)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(ReminderRepositoryError::from)
    }

    async fn delete(&self, id: &ReminderId) -> Result<bool, ReminderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(ReminderRepositoryError::from_store)?;

        let deleted = diesel::delete(reminders::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(ReminderRepositoryError::from_store)?;

        Ok(deleted > 0)
    }
}
