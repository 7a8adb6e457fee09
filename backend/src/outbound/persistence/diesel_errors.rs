//! Classification of pool and Diesel failures shared by the repositories.
//!
//! Every port error enum has `Connection` and `Query` variants. The
//! repositories classify failures once here and convert the result into
//! their own port error.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;
use crate::domain::ports::{
    NotificationRepositoryError, PostRepositoryError, ReminderRepositoryError, TokenVerifierError,
    UserRepositoryError,
};

/// A storage failure reduced to the two cases services distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Query(String),
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        Self::Connection(error.into_message())
    }
}

impl From<DieselError> for StoreFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            other => debug!(error = %other, "diesel operation failed"),
        }
        match error {
            DieselError::NotFound => Self::Query("record not found".into()),
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection closed".into())
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                Self::Query("duplicate record".into())
            }
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
                Self::Query("transaction serialisation failure".into())
            }
            DieselError::DatabaseError(_, _) => Self::Query("database error".into()),
            _ => Self::Query("database query error".into()),
        }
    }
}

macro_rules! impl_from_store_failure {
    ($($port_error:ty),+ $(,)?) => {
        $(
            impl From<StoreFailure> for $port_error {
                fn from(failure: StoreFailure) -> Self {
                    match failure {
                        StoreFailure::Connection(message) => Self::connection(message),
                        StoreFailure::Query(message) => Self::query(message),
                    }
                }
            }

            impl $port_error {
                /// Classify a pool or Diesel error as this port's failure.
                pub(crate) fn from_store<E>(error: E) -> Self
                where
                    E: Into<StoreFailure>,
                {
                    Self::from(error.into())
                }
            }
        )+
    };
}

impl_from_store_failure!(
    UserRepositoryError,
    PostRepositoryError,
    ReminderRepositoryError,
    NotificationRepositoryError,
    TokenVerifierError,
);

/// Failure inside a read-modify-write transaction.
#[derive(Debug)]
pub(crate) enum TxError {
    Diesel(DieselError),
    Missing(&'static str),
    RevisionMismatch { expected: u32, actual: u32 },
}

impl From<DieselError> for TxError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl From<TxError> for PostRepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Diesel(err) => Self::from_store(err),
            TxError::Missing(what) => Self::query(format!("{what} not found for update")),
            TxError::RevisionMismatch { expected, actual } => {
                Self::revision_mismatch(expected, actual)
            }
        }
    }
}

impl From<TxError> for ReminderRepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Diesel(err) => Self::from_store(err),
            TxError::Missing(what) => Self::query(format!("{what} not found for update")),
            TxError::RevisionMismatch { expected, actual } => {
                Self::revision_mismatch(expected, actual)
            }
        }
    }
}

impl From<TxError> for UserRepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Diesel(err) => Self::from_store(err),
            TxError::Missing(what) => Self::query(format!("{what} not found for update")),
            TxError::RevisionMismatch { expected, actual } => {
                Self::query(format!("unexpected revision check: {expected} vs {actual}"))
            }
        }
    }
}

/// Domain revisions are small positive counters.
#[expect(
    clippy::cast_possible_wrap,
    reason = "revisions stay far below i32::MAX"
)]
pub(crate) fn revision_to_db(revision: u32) -> i32 {
    revision as i32
}

#[expect(
    clippy::cast_sign_loss,
    reason = "revision column carries a CHECK (revision > 0) constraint"
)]
pub(crate) fn revision_from_db(revision: i32) -> u32 {
    revision as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let err = PostRepositoryError::from_store(PoolError::checkout("refused"));
        assert_eq!(err, PostRepositoryError::connection("refused"));
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        let err = UserRepositoryError::from_store(DieselError::NotFound);
        assert!(matches!(err, UserRepositoryError::Query { .. }));
    }

    #[rstest]
    fn transaction_mismatch_keeps_revisions() {
        let err = ReminderRepositoryError::from(TxError::RevisionMismatch {
            expected: 3,
            actual: 4,
        });
        assert_eq!(err, ReminderRepositoryError::revision_mismatch(3_u32, 4_u32));
    }

    #[rstest]
    #[case(1)]
    #[case(42)]
    fn revision_conversions_agree(#[case] revision: u32) {
        assert_eq!(revision_from_db(revision_to_db(revision)), revision);
    }
}
