//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{Notification, NotificationId, PostId, UserId};

use super::models::NotificationRow;
use super::pool::DbPool;
use super::schema::notifications;

#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_notification(row: NotificationRow) -> Result<Notification, NotificationRepositoryError> {
    let kind = row.kind.parse().map_err(|err| {
        NotificationRepositoryError::query(format!("stored notification {} is invalid: {err}", row.id))
    })?;
    Ok(Notification {
        id: NotificationId::from_uuid(row.id),
        sender_id: UserId::from_uuid(row.sender_id),
        receiver_id: UserId::from_uuid(row.receiver_id),
        kind,
        related_post_id: row.related_post_id.map(PostId::from_uuid),
        is_read: row.is_read,
        created_at: row.created_at,
    })
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(NotificationRepositoryError::from_store)?;

        let row = NotificationRow {
            id: *notification.id.as_uuid(),
            sender_id: *notification.sender_id.as_uuid(),
            receiver_id: *notification.receiver_id.as_uuid(),
            kind: notification.kind.as_str().to_owned(),
            related_post_id: notification.related_post_id.map(|id| *id.as_uuid()),
            is_read: notification.is_read,
            created_at: notification.created_at,
        };

        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(NotificationRepositoryError::from_store)
    }

    async fn list_for_receiver(
        &self,
        receiver: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(NotificationRepositoryError::from_store)?;

        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::receiver_id.eq(receiver.as_uuid()))
            .order(notifications::created_at.desc())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(NotificationRepositoryError::from_store)?;

        rows.into_iter().map(row_to_notification).collect()
    }
}
