//! Populated read models for posts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, Post};
use crate::domain::{AuthorProjection, CommentId, PostId, UserId};

/// A comment joined with its author projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: CommentId,
    pub author: Option<AuthorProjection>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A post with author projections joined in for the post and every comment.
///
/// `author` is `None` when the referenced user no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: PostId,
    pub author: Option<AuthorProjection>,
    pub caption: String,
    pub image_ref: Option<String>,
    pub likes: Vec<UserId>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    /// User ids whose projections are needed to populate `post`.
    pub fn referenced_users(post: &Post) -> impl Iterator<Item = UserId> + '_ {
        std::iter::once(post.author_id()).chain(post.comments().iter().map(|c| c.author_id))
    }

    /// Join `post` with the projections available in `authors`.
    pub fn populate(post: &Post, authors: &HashMap<UserId, AuthorProjection>) -> Self {
        Self {
            id: post.id(),
            author: authors.get(&post.author_id()).cloned(),
            caption: post.caption().as_str().to_owned(),
            image_ref: post.image_ref().map(str::to_owned),
            likes: post.likes().iter().copied().collect(),
            comments: post
                .comments()
                .iter()
                .map(|comment| CommentView::populate(comment, authors))
                .collect(),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
        }
    }
}

impl CommentView {
    fn populate(comment: &Comment, authors: &HashMap<UserId, AuthorProjection>) -> Self {
        Self {
            id: comment.id,
            author: authors.get(&comment.author_id).cloned(),
            text: comment.text.as_str().to_owned(),
            created_at: comment.created_at,
        }
    }
}
