//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! The post row carries caption, likes and the revision; comments live in
//! `post_comments` ordered by `position`. A save locks the post row, checks
//! the revision, then rewrites the row and its comments in one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{
    Caption, Comment, CommentId, CommentText, Post, PostId, PostParts, UserId,
};

use super::diesel_errors::{TxError, revision_from_db, revision_to_db};
use super::models::{CommentRow, PostChangeset, PostRow};
use super::pool::DbPool;
use super::schema::{post_comments, posts};

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_comment(row: CommentRow) -> Result<Comment, PostRepositoryError> {
    let text = CommentText::new(&row.body).map_err(|err| {
        PostRepositoryError::query(format!("stored comment {} is invalid: {err}", row.id))
    })?;
    Ok(Comment {
        id: CommentId::from_uuid(row.id),
        author_id: UserId::from_uuid(row.author_id),
        text,
        created_at: row.created_at,
    })
}

fn rows_to_post(row: PostRow, comments: Vec<CommentRow>) -> Result<Post, PostRepositoryError> {
    let caption = Caption::new(&row.caption).map_err(|err| {
        PostRepositoryError::query(format!("stored post {} is invalid: {err}", row.id))
    })?;
    let comments = comments
        .into_iter()
        .map(row_to_comment)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Post::from_parts(PostParts {
        id: PostId::from_uuid(row.id),
        author_id: UserId::from_uuid(row.author_id),
        caption,
        image_ref: row.image_ref,
        likes: row.likes.into_iter().map(UserId::from_uuid).collect(),
        comments,
        created_at: row.created_at,
        updated_at: row.updated_at,
        revision: revision_from_db(row.revision),
    }))
}

fn post_to_row(post: &Post) -> PostRow {
    PostRow {
        id: *post.id().as_uuid(),
        author_id: *post.author_id().as_uuid(),
        caption: post.caption().as_str().to_owned(),
        image_ref: post.image_ref().map(str::to_owned),
        likes: like_column(post),
        created_at: post.created_at(),
        updated_at: post.updated_at(),
        revision: revision_to_db(post.revision()),
    }
}

fn like_column(post: &Post) -> Vec<Uuid> {
    post.likes().iter().map(|id| *id.as_uuid()).collect()
}

fn comment_rows(post: &Post) -> Result<Vec<CommentRow>, PostRepositoryError> {
    post.comments()
        .iter()
        .enumerate()
        .map(|(index, comment)| {
            let position = i32::try_from(index)
                .map_err(|_| PostRepositoryError::query("too many comments on post"))?;
            Ok(CommentRow {
                id: *comment.id.as_uuid(),
                post_id: *post.id().as_uuid(),
                author_id: *comment.author_id.as_uuid(),
                body: comment.text.as_str().to_owned(),
                position,
                created_at: comment.created_at,
            })
        })
        .collect()
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(PostRepositoryError::from_store)?;

        let Some(row) = posts::table
            .find(id.as_uuid())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PostRepositoryError::from_store)?
        else {
            return Ok(None);
        };

        let comments: Vec<CommentRow> = post_comments::table
            .filter(post_comments::post_id.eq(row.id))
            .order(post_comments::position.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(PostRepositoryError::from_store)?;

        rows_to_post(row, comments).map(Some)
    }

    async fn list_recent(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(PostRepositoryError::from_store)?;

        let rows: Vec<PostRow> = posts::table
            .order((posts::created_at.desc(), posts::id.asc()))
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(PostRepositoryError::from_store)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let comment_rows: Vec<CommentRow> = post_comments::table
            .filter(post_comments::post_id.eq_any(ids))
            .order((post_comments::post_id.asc(), post_comments::position.asc()))
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(PostRepositoryError::from_store)?;

        let mut by_post: HashMap<Uuid, Vec<CommentRow>> = HashMap::new();
        for comment in comment_rows {
            by_post.entry(comment.post_id).or_default().push(comment);
        }

        rows.into_iter()
            .map(|row| {
                let comments = by_post.remove(&row.id).unwrap_or_default();
                rows_to_post(row, comments)
            })
            .collect()
    }

    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let row = post_to_row(post);
        let comments = comment_rows(post)?;
        let mut conn = self.pool.get().await.map_err(PostRepositoryError::from_store)?;

        conn.transaction::<_, TxError, _>(move |conn| {
            async move {
                diesel::insert_into(posts::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                if !comments.is_empty() {
                    diesel::insert_into(post_comments::table)
                        .values(&comments)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(PostRepositoryError::from)
    }

    async fn save(&self, post: &Post, expected_revision: u32) -> Result<(), PostRepositoryError> {
        let post_id = *post.id().as_uuid();
        let caption = post.caption().as_str().to_owned();
        let image_ref = post.image_ref().map(str::to_owned);
        let likes = like_column(post);
        let updated_at = post.updated_at();
        let revision = revision_to_db(post.revision());
        let comments = comment_rows(post)?;
        let mut conn = self.pool.get().await.map_err(PostRepositoryError::from_store)?;

        conn.transaction::<_, TxError, _>(move |conn| {
            async move {
                let stored: Option<i32> = posts::table
                    .find(post_id)
                    .select(posts::revision)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(stored) = stored else {
                    return Err(TxError::Missing("post"));
                };
                let actual = revision_from_db(stored);
                if actual != expected_revision {
                    return Err(TxError::RevisionMismatch {
                        expected: expected_revision,
                        actual,
                    });
                }

                let changes = PostChangeset {
                    caption: &caption,
                    image_ref: image_ref.as_deref(),
                    likes,
                    updated_at,
                    revision,
                };
                diesel::update(posts::table.find(post_id))
                    .set(&changes)
                    .execute(conn)
                    .await?;

                diesel::delete(post_comments::table.filter(post_comments::post_id.eq(post_id)))
                    .execute(conn)
                    .await?;
                if !comments.is_empty() {
                    diesel::insert_into(post_comments::table)
                        .values(&comments)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(PostRepositoryError::from)
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(PostRepositoryError::from_store)?;

        // Comments go with the post through ON DELETE CASCADE.
        let deleted = diesel::delete(posts::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(PostRepositoryError::from_store)?;

        Ok(deleted > 0)
    }
}
