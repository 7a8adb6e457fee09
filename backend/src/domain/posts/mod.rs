//! Post aggregate: a post with its embedded likes and comments.
//!
//! Comments have no lifecycle of their own. They live in an ordered sequence
//! on the post, are appended and removed only through the aggregate, and
//! disappear with it. Likes are a set of user ids, so one user can never be
//! counted twice and toggling is decided by membership alone.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};

use super::{CommentId, PostId, UserId};

pub mod service;
mod view;

pub use view::{CommentView, PostView};

/// Maximum caption length in characters.
pub const CAPTION_MAX: usize = 2200;
/// Maximum comment length in characters.
pub const COMMENT_MAX: usize = 1000;

/// Validation and authorisation failures raised by the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostError {
    #[error("caption must not be empty")]
    EmptyCaption,
    #[error("caption must be at most {max} characters")]
    CaptionTooLong { max: usize },
    #[error("comment text must not be empty")]
    EmptyComment,
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
    #[error("only the author may modify this post")]
    NotPostAuthor,
    #[error("comment not found")]
    CommentNotFound,
    #[error("only the comment author may delete this comment")]
    NotCommentAuthor,
}

fn validated_text(
    raw: &str,
    max: usize,
    empty: PostError,
    too_long: PostError,
) -> Result<String, PostError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Post caption; non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    /// Validate and trim a caption.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PostError> {
        validated_text(
            raw.as_ref(),
            CAPTION_MAX,
            PostError::EmptyCaption,
            PostError::CaptionTooLong { max: CAPTION_MAX },
        )
        .map(Self)
    }

    /// Borrow the caption text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comment body; non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Validate and trim comment text.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PostError> {
        validated_text(
            raw.as_ref(),
            COMMENT_MAX,
            PostError::EmptyComment,
            PostError::CommentTooLong { max: COMMENT_MAX },
        )
        .map(Self)
    }

    /// Borrow the comment text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A comment embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub author_id: UserId,
    pub text: CommentText,
    pub created_at: DateTime<Utc>,
}

/// Outcome of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeChange {
    Liked(UserId),
    Unliked(UserId),
}

impl LikeChange {
    /// Decide what toggling `actor`'s like does given the current like set.
    pub fn for_actor(likes: &BTreeSet<UserId>, actor: UserId) -> Self {
        if likes.contains(&actor) {
            Self::Unliked(actor)
        } else {
            Self::Liked(actor)
        }
    }
}

/// Raw post state used by persistence adapters to rebuild the aggregate.
#[derive(Debug, Clone)]
pub struct PostParts {
    pub id: PostId,
    pub author_id: UserId,
    pub caption: Caption,
    pub image_ref: Option<String>,
    pub likes: BTreeSet<UserId>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: u32,
}

/// Post aggregate root.
///
/// ## Invariants
/// - Only `author_id` may change the caption or delete the post.
/// - `comments` keeps insertion order; removing one leaves the rest in place.
/// - Every mutation bumps `revision`, which persistence uses to detect lost
///   updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    author_id: UserId,
    caption: Caption,
    image_ref: Option<String>,
    likes: BTreeSet<UserId>,
    comments: Vec<Comment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u32,
}

impl Post {
    /// Publish a new post with no likes and no comments.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use greencare::domain::{Caption, Post, PostId, UserId};
    ///
    /// let caption = Caption::new("Hello plants").expect("valid caption");
    /// let post = Post::publish(PostId::random(), UserId::random(), caption, None, Utc::now());
    /// assert!(post.likes().is_empty());
    /// assert!(post.comments().is_empty());
    /// ```
    pub fn publish(
        id: PostId,
        author_id: UserId,
        caption: Caption,
        image_ref: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            caption,
            image_ref: image_ref.filter(|image| !image.trim().is_empty()),
            likes: BTreeSet::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
            revision: 1,
        }
    }

    /// Rebuild a post from stored parts.
    pub fn from_parts(parts: PostParts) -> Self {
        let PostParts {
            id,
            author_id,
            caption,
            image_ref,
            likes,
            comments,
            created_at,
            updated_at,
            revision,
        } = parts;
        Self {
            id,
            author_id,
            caption,
            image_ref,
            likes,
            comments,
            created_at,
            updated_at,
            revision,
        }
    }

    /// Decompose into stored parts.
    pub fn into_parts(self) -> PostParts {
        PostParts {
            id: self.id,
            author_id: self.author_id,
            caption: self.caption,
            image_ref: self.image_ref,
            likes: self.likes,
            comments: self.comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
            revision: self.revision,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn caption(&self) -> &Caption {
        &self.caption
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    pub fn likes(&self) -> &BTreeSet<UserId> {
        &self.likes
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.as_slice()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Revision of the stored state this value was built from.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Reject actors other than the author.
    pub fn ensure_author(&self, actor: UserId) -> Result<(), PostError> {
        if actor == self.author_id {
            Ok(())
        } else {
            Err(PostError::NotPostAuthor)
        }
    }

    /// Replace the caption. Likes and comments are untouched.
    pub fn edit_caption(
        &mut self,
        actor: UserId,
        caption: Caption,
        now: DateTime<Utc>,
    ) -> Result<(), PostError> {
        self.ensure_author(actor)?;
        self.caption = caption;
        self.touch(now);
        Ok(())
    }

    /// Toggle `actor`'s like. Applying it twice restores the original set.
    pub fn toggle_like(&mut self, actor: UserId, now: DateTime<Utc>) -> LikeChange {
        let change = LikeChange::for_actor(&self.likes, actor);
        match change {
            LikeChange::Liked(user) => {
                self.likes.insert(user);
            }
            LikeChange::Unliked(user) => {
                self.likes.remove(&user);
            }
        }
        self.touch(now);
        change
    }

    /// Append a comment at the end of the sequence.
    pub fn add_comment(&mut self, comment: Comment) {
        let at = comment.created_at;
        self.comments.push(comment);
        self.touch(at);
    }

    /// Remove a comment authored by `actor`, keeping the order of the rest.
    pub fn remove_comment(
        &mut self,
        comment_id: CommentId,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<Comment, PostError> {
        let index = self
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)
            .ok_or(PostError::CommentNotFound)?;
        if self
            .comments
            .get(index)
            .is_some_and(|comment| comment.author_id != actor)
        {
            return Err(PostError::NotCommentAuthor);
        }
        let removed = self.comments.remove(index);
        self.touch(now);
        Ok(removed)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
        self.revision = self.revision.saturating_add(1);
    }
}
