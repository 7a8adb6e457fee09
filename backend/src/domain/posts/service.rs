//! Post service implementing the content aggregate's driving ports.
//!
//! Every mutation runs under the post's entity lock: load, apply the
//! aggregate operation, then save against the revision that was read. The
//! lock serialises toggles inside this process and the revision check
//! catches writers elsewhere.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use super::{Caption, Comment, CommentText, LikeChange, Post, PostError, PostView};
use crate::domain::locks::EntityLocks;
use crate::domain::notifications::{NotificationKind, NotificationRecorder};
use crate::domain::ports::{
    AddCommentRequest, CreatePostRequest, EditCaptionRequest, NotificationRepository,
    PostRepository, PostsCommand, PostsQuery, UserRepository, map_post_repository_error,
    map_user_repository_error,
};
use crate::domain::{AuthorProjection, CommentId, Error, PostId, UserId};

/// Post service coordinating persistence, author projections and
/// notifications.
pub struct PostService<P, U, N> {
    posts: Arc<P>,
    users: Arc<U>,
    notifications: NotificationRecorder<N>,
    locks: Arc<EntityLocks>,
    clock: Arc<dyn Clock>,
}

impl<P, U, N> PostService<P, U, N> {
    pub fn new(
        posts: Arc<P>,
        users: Arc<U>,
        notifications: NotificationRecorder<N>,
        locks: Arc<EntityLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            users,
            notifications,
            locks,
            clock,
        }
    }
}

/// Map aggregate failures onto the domain error taxonomy.
fn map_post_error(error: PostError) -> Error {
    let message = error.to_string();
    match error {
        PostError::EmptyCaption | PostError::CaptionTooLong { .. } => {
            Error::invalid_request(message).with_details(json!({ "field": "caption" }))
        }
        PostError::EmptyComment | PostError::CommentTooLong { .. } => {
            Error::invalid_request(message).with_details(json!({ "field": "text" }))
        }
        PostError::NotPostAuthor | PostError::NotCommentAuthor => Error::forbidden(message),
        PostError::CommentNotFound => Error::not_found(message),
    }
}

fn post_not_found(post_id: PostId) -> Error {
    Error::not_found(format!("post {post_id} not found"))
}

impl<P, U, N> PostService<P, U, N>
where
    P: PostRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    async fn load(&self, post_id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(&post_id)
            .await
            .map_err(map_post_repository_error)?
            .ok_or_else(|| post_not_found(post_id))
    }

    async fn projections<'a>(
        &self,
        posts: impl IntoIterator<Item = &'a Post>,
    ) -> Result<HashMap<UserId, AuthorProjection>, Error> {
        let ids: BTreeSet<UserId> = posts
            .into_iter()
            .flat_map(PostView::referenced_users)
            .collect();
        let ids: Vec<UserId> = ids.into_iter().collect();
        self.users
            .find_projections(&ids)
            .await
            .map_err(map_user_repository_error)
    }

    async fn populate(&self, post: &Post) -> Result<PostView, Error> {
        let authors = self.projections([post]).await?;
        Ok(PostView::populate(post, &authors))
    }

    /// Load the post under its lock, apply `mutate`, and save the result.
    async fn mutate<T, F>(&self, post_id: PostId, mutate: F) -> Result<(Post, T), Error>
    where
        F: FnOnce(&mut Post) -> Result<T, PostError> + Send,
        T: Send,
    {
        let _guard = self.locks.lock(*post_id.as_uuid()).await;
        let mut post = self.load(post_id).await?;
        let expected_revision = post.revision();
        let outcome = mutate(&mut post).map_err(map_post_error)?;
        self.posts
            .save(&post, expected_revision)
            .await
            .map_err(map_post_repository_error)?;
        debug!(%post_id, revision = post.revision(), "post saved");
        Ok((post, outcome))
    }
}

#[async_trait]
impl<P, U, N> PostsCommand for PostService<P, U, N>
where
    P: PostRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    async fn create_post(&self, request: CreatePostRequest) -> Result<PostView, Error> {
        let caption = Caption::new(&request.caption).map_err(map_post_error)?;
        let post = Post::publish(
            PostId::random(),
            request.author_id,
            caption,
            request.image_ref,
            self.clock.utc(),
        );
        self.posts
            .insert(&post)
            .await
            .map_err(map_post_repository_error)?;
        info!(post_id = %post.id(), user_id = %post.author_id(), "post published");
        self.populate(&post).await
    }

    async fn edit_caption(&self, request: EditCaptionRequest) -> Result<PostView, Error> {
        let now = self.clock.utc();
        let EditCaptionRequest {
            post_id,
            actor_id,
            caption,
        } = request;
        // Existence and ownership are reported before caption validity.
        let (post, ()) = self
            .mutate(post_id, move |post| {
                post.ensure_author(actor_id)?;
                post.edit_caption(actor_id, Caption::new(&caption)?, now)
            })
            .await?;
        self.populate(&post).await
    }

    async fn delete_post(&self, post_id: PostId, actor_id: UserId) -> Result<(), Error> {
        let _guard = self.locks.lock(*post_id.as_uuid()).await;
        let post = self.load(post_id).await?;
        post.ensure_author(actor_id).map_err(map_post_error)?;
        let removed = self
            .posts
            .delete(&post_id)
            .await
            .map_err(map_post_repository_error)?;
        if !removed {
            return Err(post_not_found(post_id));
        }
        info!(%post_id, user_id = %actor_id, comments = post.comments().len(), "post deleted");
        Ok(())
    }

    async fn toggle_like(&self, post_id: PostId, actor_id: UserId) -> Result<PostView, Error> {
        let now = self.clock.utc();
        let (post, change) = self
            .mutate(post_id, |post| Ok(post.toggle_like(actor_id, now)))
            .await?;
        if let LikeChange::Liked(fan) = change {
            self.notifications
                .record_best_effort(NotificationKind::Like, fan, post.author_id(), Some(post_id))
                .await;
        }
        self.populate(&post).await
    }

    async fn add_comment(&self, request: AddCommentRequest) -> Result<PostView, Error> {
        let text = CommentText::new(&request.text).map_err(map_post_error)?;
        let comment = Comment {
            id: CommentId::random(),
            author_id: request.actor_id,
            text,
            created_at: self.clock.utc(),
        };
        let (post, ()) = self
            .mutate(request.post_id, |post| {
                post.add_comment(comment);
                Ok(())
            })
            .await?;
        self.notifications
            .record_best_effort(
                NotificationKind::Comment,
                request.actor_id,
                post.author_id(),
                Some(post.id()),
            )
            .await;
        self.populate(&post).await
    }

    async fn delete_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        actor_id: UserId,
    ) -> Result<PostView, Error> {
        let now = self.clock.utc();
        let (post, removed) = self
            .mutate(post_id, |post| post.remove_comment(comment_id, actor_id, now))
            .await?;
        debug!(%post_id, comment_id = %removed.id, "comment removed");
        self.populate(&post).await
    }
}

#[async_trait]
impl<P, U, N> PostsQuery for PostService<P, U, N>
where
    P: PostRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    async fn list_posts(&self) -> Result<Vec<PostView>, Error> {
        let posts = self
            .posts
            .list_recent()
            .await
            .map_err(map_post_repository_error)?;
        let authors = self.projections(&posts).await?;
        Ok(posts
            .iter()
            .map(|post| PostView::populate(post, &authors))
            .collect())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
