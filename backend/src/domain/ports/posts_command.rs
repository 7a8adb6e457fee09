//! Driving ports for the content aggregate.
//!
//! [`PostsCommand`] covers every post mutation and [`PostsQuery`] the feed
//! read. Both return populated [`PostView`]s so handlers never join author
//! data themselves.

use async_trait::async_trait;

use crate::domain::{CommentId, Error, PostId, PostView, UserId};

/// Request to publish a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostRequest {
    pub author_id: UserId,
    pub caption: String,
    /// Filename of an already stored image asset.
    pub image_ref: Option<String>,
}

/// Request to replace a post's caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCaptionRequest {
    pub post_id: PostId,
    pub actor_id: UserId,
    pub caption: String,
}

/// Request to append a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCommentRequest {
    pub post_id: PostId,
    pub actor_id: UserId,
    pub text: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Publish a post. Fails with `invalid_request` for a blank caption.
    async fn create_post(&self, request: CreatePostRequest) -> Result<PostView, Error>;

    /// Replace the caption; author only.
    async fn edit_caption(&self, request: EditCaptionRequest) -> Result<PostView, Error>;

    /// Delete a post and its comments; author only.
    async fn delete_post(&self, post_id: PostId, actor_id: UserId) -> Result<(), Error>;

    /// Like the post, or unlike it if the actor already did.
    async fn toggle_like(&self, post_id: PostId, actor_id: UserId) -> Result<PostView, Error>;

    /// Append a comment. Any authenticated user may comment.
    async fn add_comment(&self, request: AddCommentRequest) -> Result<PostView, Error>;

    /// Remove a comment; comment author only.
    async fn delete_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        actor_id: UserId,
    ) -> Result<PostView, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Every post, newest first.
    async fn list_posts(&self) -> Result<Vec<PostView>, Error>;
}
