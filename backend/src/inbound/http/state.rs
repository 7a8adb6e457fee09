//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    NotificationsQuery, PostsCommand, PostsQuery, ProfileCommand, ProfileQuery,
    RelationshipCommand, RemindersCommand, RemindersQuery, TokenVerifier,
};

/// Dependency bundle for HTTP handlers.
///
/// `tokens` backs the [`AuthenticatedUser`](super::auth::AuthenticatedUser)
/// extractor; every other field is a driving port.
#[derive(Clone)]
pub struct HttpState {
    pub tokens: Arc<dyn TokenVerifier>,
    pub posts: Arc<dyn PostsCommand>,
    pub posts_query: Arc<dyn PostsQuery>,
    pub relationships: Arc<dyn RelationshipCommand>,
    pub reminders: Arc<dyn RemindersCommand>,
    pub reminders_query: Arc<dyn RemindersQuery>,
    pub notifications: Arc<dyn NotificationsQuery>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub profiles_query: Arc<dyn ProfileQuery>,
}
