//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Follow changes lock both user rows (in id order, to avoid deadlocks
//! between opposite toggles) and rewrite the two sets in one transaction.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{AuthorProjection, FollowChange, UserId, UserProfile};

use super::diesel_errors::TxError;
use super::models::{AuthorRow, ProfileChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

diesel::define_sql_function!(fn lower(x: Text) -> Text);

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: UserRow) -> UserProfile {
    UserProfile {
        id: UserId::from_uuid(row.id),
        name: row.name,
        email: row.email,
        bio: row.bio,
        profile_image_ref: row.profile_image_ref,
        interests: row.interests.into_iter().collect(),
        followers: row.followers.into_iter().map(UserId::from_uuid).collect(),
        following: row.following.into_iter().map(UserId::from_uuid).collect(),
        created_at: row.created_at,
    }
}

fn id_column(set: &BTreeSet<UserId>) -> Vec<Uuid> {
    set.iter().map(|id| *id.as_uuid()).collect()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_store)?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(UserRepositoryError::from_store)?;

        Ok(row.map(row_to_profile))
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserProfile>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_store)?;

        let row: Option<UserRow> = users::table
            .filter(lower(users::email).eq(email.trim().to_lowercase()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(UserRepositoryError::from_store)?;

        Ok(row.map(row_to_profile))
    }

    async fn find_projections(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, AuthorProjection>, UserRepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_store)?;
        let wanted: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<AuthorRow> = users::table
            .filter(users::id.eq_any(wanted))
            .select(AuthorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(UserRepositoryError::from_store)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = UserId::from_uuid(row.id);
                let projection = AuthorProjection {
                    id,
                    name: row.name,
                    profile_image_ref: row.profile_image_ref,
                };
                (id, projection)
            })
            .collect())
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_store)?;

        let changes = ProfileChangeset {
            name: &profile.name,
            bio: &profile.bio,
            interests: profile.interests.iter().cloned().collect(),
            profile_image_ref: profile.profile_image_ref.as_deref(),
        };

        let updated = diesel::update(users::table.find(profile.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(UserRepositoryError::from_store)?;

        if updated == 0 {
            return Err(UserRepositoryError::query("user not found for update"));
        }
        Ok(())
    }

    async fn apply_follow_change(&self, change: &FollowChange) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_store)?;
        let change = *change;

        conn.transaction::<_, TxError, _>(move |conn| {
            async move {
                let follower = *change.follower.as_uuid();
                let followee = *change.followee.as_uuid();

                let rows: Vec<UserRow> = users::table
                    .filter(users::id.eq_any([follower, followee]))
                    .order(users::id.asc())
                    .for_update()
                    .select(UserRow::as_select())
                    .load(conn)
                    .await?;
                if rows.len() != 2 {
                    return Err(TxError::Missing("user"));
                }

                for row in rows {
                    let mut profile = row_to_profile(row);
                    profile.apply_follow_change(&change);
                    diesel::update(users::table.find(profile.id.as_uuid()))
                        .set((
                            users::followers.eq(id_column(&profile.followers)),
                            users::following.eq(id_column(&profile.following)),
                        ))
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(UserRepositoryError::from)
    }
}
