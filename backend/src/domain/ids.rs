//! UUID-backed identifiers for users, posts, comments, reminders and
//! notifications.
//!
//! Each identifier is a distinct type so a `PostId` can never be passed where
//! a `UserId` is expected. All of them serialise as hyphenated UUID strings.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Error raised when parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// Input was empty.
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },
    /// Input was not a UUID.
    #[error("{kind} must be a valid UUID")]
    Invalid { kind: &'static str },
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its string form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdParseError> {
                let raw = raw.as_ref();
                if raw.is_empty() {
                    return Err(IdParseError::Empty { kind: $kind });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdParseError::Invalid { kind: $kind })
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

uuid_identifier!(
    /// Stable identifier of a user held by the identity store.
    UserId,
    "user id"
);
uuid_identifier!(
    /// Identifier of a post aggregate.
    PostId,
    "post id"
);
uuid_identifier!(
    /// Identifier of a comment, unique within its post.
    CommentId,
    "comment id"
);
uuid_identifier!(
    /// Identifier of a care reminder.
    ReminderId,
    "reminder id"
);
uuid_identifier!(
    /// Identifier of a recorded notification.
    NotificationId,
    "notification id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdParseError::Empty { kind: "post id" })]
    #[case("abc", IdParseError::Invalid { kind: "post id" })]
    fn rejects_bad_input(#[case] raw: &str, #[case] expected: IdParseError) {
        assert_eq!(PostId::new(raw), Err(expected));
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
        let back: UserId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }
}
