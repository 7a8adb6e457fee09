//! Domain primitives, aggregates and services.
//!
//! Purpose: model the content and relationship core (posts with embedded
//! likes and comments, the symmetric follow graph), the care reminder ledger
//! and the notification recorder, independent of HTTP and storage.
//!
//! Public surface:
//! - Error / ErrorCode: the error taxonomy shared by every layer.
//! - Identifiers (`UserId`, `PostId`, ...) and validated value types.
//! - Aggregates: `Post`, `Reminder`, `UserProfile`.
//! - Services implementing the driving ports in [`ports`].

pub mod error;
pub mod ids;
pub mod locks;
pub mod notifications;
pub mod ports;
pub mod posts;
pub mod profile;
pub mod relationships;
pub mod reminders;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::ids::{CommentId, IdParseError, NotificationId, PostId, ReminderId, UserId};
pub use self::locks::{EntityGuard, EntityLocks};
pub use self::notifications::{
    Notification, NotificationKind, NotificationRecorder, NotificationService, NotificationView,
    UnknownNotificationKind,
};
pub use self::posts::service::PostService;
pub use self::posts::{
    CAPTION_MAX, COMMENT_MAX, Caption, Comment, CommentText, CommentView, LikeChange, Post,
    PostError, PostParts, PostView,
};
pub use self::profile::{ProfileService, UserProfileView};
pub use self::relationships::{
    FollowChange, FollowDirection, FollowOutcome, RelationshipError, RelationshipService,
};
pub use self::reminders::service::ReminderService;
pub use self::reminders::{
    CareType, CompletionChange, PlantName, Recurrence, Reminder, ReminderDraft, ReminderError,
    ReminderTitle, ReminderView, UnknownVariant,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{AuthorProjection, ProfileUpdate, UserProfile, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use greencare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
