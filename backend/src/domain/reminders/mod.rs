//! Care reminder ledger.
//!
//! Reminders are owned by exactly one user. Completing a recurring reminder
//! schedules a successor one recurrence unit after the original due date;
//! the flip and the successor are produced together as a
//! [`CompletionChange`] so the repository can store them in one unit.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{ReminderId, UserId};

pub mod service;

/// Maximum plant name length in characters.
pub const PLANT_NAME_MAX: usize = 100;
/// Maximum title length in characters.
pub const TITLE_MAX: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReminderError {
    #[error("plant name must not be empty")]
    EmptyPlantName,
    #[error("plant name must be at most {max} characters")]
    PlantNameTooLong { max: usize },
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("only the owner may modify this reminder")]
    NotOwner,
    #[error("next due date is out of range")]
    DueDateOutOfRange,
}

/// Name of the plant a reminder is about; non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantName(String);

impl PlantName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ReminderError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ReminderError::EmptyPlantName);
        }
        if trimmed.chars().count() > PLANT_NAME_MAX {
            return Err(ReminderError::PlantNameTooLong {
                max: PLANT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Free-form reminder title. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderTitle(String);

impl ReminderTitle {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ReminderError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() > TITLE_MAX {
            return Err(ReminderError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Error returned when a wire name does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$variant_meta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            /// Lowercase wire name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.trim().eq_ignore_ascii_case($wire) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownVariant { kind: $kind, value: s.to_owned() })
            }
        }
    };
}

wire_enum!(
    /// Kind of care a reminder asks for.
    CareType, "care type" {
        Watering => "watering",
        Fertilizing => "fertilizing",
        Pruning => "pruning",
    }
);

wire_enum!(
    /// How often a reminder repeats.
    #[derive(Default)]
    Recurrence, "recurrence" {
        #[default]
        None => "none",
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
);

impl Recurrence {
    /// Due date one recurrence unit after `due_at`.
    ///
    /// Monthly steps land on the same day of the next month, clamped to
    /// that month's last day.
    ///
    /// Returns `Ok(None)` for [`Recurrence::None`].
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use greencare::domain::Recurrence;
    ///
    /// let jan31 = Utc.with_ymd_and_hms(2024, 1, 31, 8, 0, 0).single().expect("valid");
    /// let next = Recurrence::Monthly.advance(jan31).expect("in range");
    /// let feb29 = Utc.with_ymd_and_hms(2024, 2, 29, 8, 0, 0).single().expect("valid");
    /// assert_eq!(next, Some(feb29));
    /// ```
    pub fn advance(self, due_at: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, ReminderError> {
        let next = match self {
            Self::None => return Ok(None),
            Self::Daily => due_at.checked_add_signed(TimeDelta::days(1)),
            Self::Weekly => due_at.checked_add_signed(TimeDelta::weeks(1)),
            Self::Monthly => due_at.checked_add_months(Months::new(1)),
        };
        next.map(Some).ok_or(ReminderError::DueDateOutOfRange)
    }
}

/// Fields needed to create a reminder.
#[derive(Debug, Clone)]
pub struct ReminderDraft {
    pub owner_id: UserId,
    pub title: ReminderTitle,
    pub plant_name: PlantName,
    pub care_type: CareType,
    pub due_at: DateTime<Utc>,
    pub recurrence: Recurrence,
}

/// A care reminder.
///
/// Fields are public so adapters can rebuild stored rows; the ledger itself
/// changes a reminder only through [`Reminder::toggle_completion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub owner_id: UserId,
    pub title: ReminderTitle,
    pub plant_name: PlantName,
    pub care_type: CareType,
    pub due_at: DateTime<Utc>,
    pub recurrence: Recurrence,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub revision: u32,
}

/// A completion flip plus the successor it schedules, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionChange {
    pub reminder: Reminder,
    pub successor: Option<Reminder>,
}

impl Reminder {
    /// Create an incomplete reminder at revision 1.
    pub fn create(id: ReminderId, draft: ReminderDraft, now: DateTime<Utc>) -> Self {
        let ReminderDraft {
            owner_id,
            title,
            plant_name,
            care_type,
            due_at,
            recurrence,
        } = draft;
        Self {
            id,
            owner_id,
            title,
            plant_name,
            care_type,
            due_at,
            recurrence,
            completed: false,
            created_at: now,
            revision: 1,
        }
    }

    /// Reject actors other than the owner.
    pub fn ensure_owner(&self, actor: UserId) -> Result<(), ReminderError> {
        if actor == self.owner_id {
            Ok(())
        } else {
            Err(ReminderError::NotOwner)
        }
    }

    /// Whether the reminder is past due and still open at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_at < now
    }

    /// Flip `completed`.
    ///
    /// Only a false→true flip of a recurring reminder yields a successor.
    /// Reopening never retracts one spawned earlier.
    pub fn toggle_completion(
        &self,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<CompletionChange, ReminderError> {
        self.ensure_owner(actor)?;
        let mut reminder = self.clone();
        reminder.completed = !self.completed;
        reminder.revision = self.revision.saturating_add(1);

        let successor = if reminder.completed {
            self.recurrence.advance(self.due_at)?.map(|due_at| Self {
                id: ReminderId::random(),
                due_at,
                completed: false,
                created_at: now,
                revision: 1,
                ..self.clone()
            })
        } else {
            None
        };
        Ok(CompletionChange {
            reminder,
            successor,
        })
    }
}

/// Reminder as returned to its owner, with the derived overdue flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderView {
    pub id: ReminderId,
    pub owner_id: UserId,
    pub title: String,
    pub plant_name: String,
    #[serde(rename = "type")]
    pub care_type: CareType,
    #[serde(rename = "date")]
    pub due_at: DateTime<Utc>,
    #[serde(rename = "repeat")]
    pub recurrence: Recurrence,
    pub completed: bool,
    pub overdue: bool,
    pub created_at: DateTime<Utc>,
}

impl ReminderView {
    pub fn at(reminder: &Reminder, now: DateTime<Utc>) -> Self {
        Self {
            id: reminder.id,
            owner_id: reminder.owner_id,
            title: reminder.title.as_str().to_owned(),
            plant_name: reminder.plant_name.as_str().to_owned(),
            care_type: reminder.care_type,
            due_at: reminder.due_at,
            recurrence: reminder.recurrence,
            completed: reminder.completed,
            overdue: reminder.is_overdue(now),
            created_at: reminder.created_at,
        }
    }
}
