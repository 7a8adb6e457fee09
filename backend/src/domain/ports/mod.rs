//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`TokenVerifier`]) are implemented by the
//! outbound adapters. Driving ports (`*Command`, `*Query`) are implemented by
//! domain services and consumed by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod notification_repository;
mod notifications_query;
mod post_repository;
mod posts_command;
mod profile_command;
mod relationship_command;
mod reminder_repository;
mod reminders_command;
mod token_verifier;
mod user_repository;

#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use notifications_query::MockNotificationsQuery;
pub use notifications_query::NotificationsQuery;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError, map_post_repository_error};
#[cfg(test)]
pub use posts_command::{MockPostsCommand, MockPostsQuery};
pub use posts_command::{
    AddCommentRequest, CreatePostRequest, EditCaptionRequest, PostsCommand, PostsQuery,
};
#[cfg(test)]
pub use profile_command::{MockProfileCommand, MockProfileQuery};
pub use profile_command::{ProfileCommand, ProfileQuery, UpdateProfileRequest};
#[cfg(test)]
pub use relationship_command::MockRelationshipCommand;
pub use relationship_command::RelationshipCommand;
#[cfg(test)]
pub use reminder_repository::MockReminderRepository;
pub use reminder_repository::{
    ReminderRepository, ReminderRepositoryError, map_reminder_repository_error,
};
#[cfg(test)]
pub use reminders_command::{MockRemindersCommand, MockRemindersQuery};
pub use reminders_command::{
    CompletionOutcome, CreateReminderRequest, RemindersCommand, RemindersQuery,
};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenVerifier, TokenVerifierError, token_fingerprint};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError, map_user_repository_error};
