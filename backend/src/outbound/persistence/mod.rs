//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven ports backed by PostgreSQL through
//! `diesel-async` and a `bb8` connection pool.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Aggregates are written in a single transaction; posts and reminders
//!   compare revisions under `SELECT ... FOR UPDATE`.
//! - Pool and Diesel failures are classified once in `diesel_errors` and
//!   surface as the port's `Connection` or `Query` variant.
//!
//! # Example
//!
//! ```ignore
//! use greencare::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/greencare")).await?;
//! let posts = DieselPostRepository::new(pool);
//! ```

mod diesel_errors;
mod diesel_notification_repository;
mod diesel_post_repository;
mod diesel_reminder_repository;
mod diesel_token_verifier;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_reminder_repository::DieselReminderRepository;
pub use diesel_token_verifier::DieselTokenVerifier;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
