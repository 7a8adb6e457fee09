//! User records as seen by the content and relationship core.
//!
//! Identity issuance (registration, credentials) happens elsewhere; this
//! module only models the fields the core reads and the profile fields a
//! user may edit about themselves.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FollowChange, FollowDirection, UserId};

/// Maximum length of a display name in characters.
pub const NAME_MAX: usize = 64;
/// Maximum length of a bio in characters.
pub const BIO_MAX: usize = 500;
/// Maximum number of interests on a profile.
pub const INTERESTS_MAX: usize = 20;

/// Validation errors raised by [`ProfileUpdate::apply_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    NameTooLong { max: usize },
    BioTooLong { max: usize },
    TooManyInterests { max: usize },
    EmptyInterest,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::BioTooLong { max } => write!(f, "bio must be at most {max} characters"),
            Self::TooManyInterests { max } => {
                write!(f, "a profile may list at most {max} interests")
            }
            Self::EmptyInterest => write!(f, "interests must not be empty strings"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Minimal projection of a user embedded in populated views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProjection {
    pub id: UserId,
    pub name: String,
    pub profile_image_ref: Option<String>,
}

/// A user record held by the identity store.
///
/// ## Invariants
/// - `followers` and `following` never contain `id`.
/// - For any two users `a` and `b`, `b ∈ a.following ⇔ a ∈ b.followers`.
///   Only [`UserProfile::apply_follow_change`] touches these sets, and the
///   repository applies it to both records atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub profile_image_ref: Option<String>,
    pub interests: BTreeSet<String>,
    pub followers: BTreeSet<UserId>,
    pub following: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a profile with empty social sets.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            bio: String::new(),
            profile_image_ref: None,
            interests: BTreeSet::new(),
            followers: BTreeSet::new(),
            following: BTreeSet::new(),
            created_at,
        }
    }

    /// Projection embedded in posts, comments and notifications.
    pub fn projection(&self) -> AuthorProjection {
        AuthorProjection {
            id: self.id,
            name: self.name.clone(),
            profile_image_ref: self.profile_image_ref.clone(),
        }
    }

    /// Whether this user currently follows `other`.
    pub fn is_following(&self, other: &UserId) -> bool {
        self.following.contains(other)
    }

    /// Apply this user's side of a follow change.
    ///
    /// The follower gains or loses the followee in `following`; the followee
    /// gains or loses the follower in `followers`. Records not named by the
    /// change are left untouched.
    pub fn apply_follow_change(&mut self, change: &FollowChange) {
        let (set, other) = if self.id == change.follower {
            (&mut self.following, change.followee)
        } else if self.id == change.followee {
            (&mut self.followers, change.follower)
        } else {
            return;
        };
        match change.direction {
            FollowDirection::Follow => {
                set.insert(other);
            }
            FollowDirection::Unfollow => {
                set.remove(&other);
            }
        }
    }
}

/// Partial profile edit submitted by the profile owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<Vec<String>>,
    pub profile_image_ref: Option<String>,
}

impl ProfileUpdate {
    /// Validate the edit and apply it to `profile`.
    ///
    /// Nothing is written when validation fails.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use greencare::domain::{ProfileUpdate, UserId, UserProfile};
    ///
    /// let mut profile = UserProfile::new(UserId::random(), "Ada", "ada@example.com", Utc::now());
    /// let update = ProfileUpdate {
    ///     bio: Some("Fern collector".to_owned()),
    ///     ..ProfileUpdate::default()
    /// };
    /// update.apply_to(&mut profile).expect("valid update");
    /// assert_eq!(profile.bio, "Fern collector");
    /// ```
    pub fn apply_to(&self, profile: &mut UserProfile) -> Result<(), UserValidationError> {
        let name = self.name.as_deref().map(str::trim).map(validate_name).transpose()?;
        let bio = self.bio.as_deref().map(str::trim).map(validate_bio).transpose()?;
        let interests = self
            .interests
            .as_deref()
            .map(validate_interests)
            .transpose()?;

        if let Some(name) = name {
            profile.name = name.to_owned();
        }
        if let Some(bio) = bio {
            profile.bio = bio.to_owned();
        }
        if let Some(interests) = interests {
            profile.interests = interests;
        }
        if let Some(image) = self.profile_image_ref.as_deref() {
            let image = image.trim();
            profile.profile_image_ref = (!image.is_empty()).then(|| image.to_owned());
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<&str, UserValidationError> {
    if name.is_empty() {
        return Err(UserValidationError::EmptyName);
    }
    if name.chars().count() > NAME_MAX {
        return Err(UserValidationError::NameTooLong { max: NAME_MAX });
    }
    Ok(name)
}

fn validate_bio(bio: &str) -> Result<&str, UserValidationError> {
    if bio.chars().count() > BIO_MAX {
        return Err(UserValidationError::BioTooLong { max: BIO_MAX });
    }
    Ok(bio)
}

fn validate_interests(raw: &[String]) -> Result<BTreeSet<String>, UserValidationError> {
    let mut interests = BTreeSet::new();
    for interest in raw {
        let interest = interest.trim();
        if interest.is_empty() {
            return Err(UserValidationError::EmptyInterest);
        }
        interests.insert(interest.to_owned());
    }
    if interests.len() > INTERESTS_MAX {
        return Err(UserValidationError::TooManyInterests { max: INTERESTS_MAX });
    }
    Ok(interests)
}
