//! Port for post aggregate persistence.
//!
//! A post is stored together with its likes and ordered comments. Adapters
//! write the whole aggregate in one transaction and use the revision to
//! reject saves built from stale reads.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{Error, Post, PostId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// The stored revision moved on since the post was read.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
    }
}

/// Storage for post aggregates.
///
/// # Revision Semantics
///
/// - Inserted posts carry revision 1.
/// - `save` succeeds only when the stored revision equals
///   `expected_revision`; the post passed in already carries its bumped
///   revision.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Fetch a post with its likes and comments.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// All posts ordered by creation time, newest first.
    async fn list_recent(&self) -> Result<Vec<Post>, PostRepositoryError>;

    /// Store a newly published post.
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Replace caption, likes and comments of an existing post.
    async fn save(&self, post: &Post, expected_revision: u32) -> Result<(), PostRepositoryError>;

    /// Remove a post and every comment it owns.
    ///
    /// Returns `false` when no such post existed.
    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError>;
}

/// Translate post repository failures into domain errors.
pub fn map_post_repository_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
        PostRepositoryError::RevisionMismatch { expected, actual } => {
            Error::conflict("post was modified concurrently").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
    }
}
