//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel and diesel-async.
//! - **memory**: a process-local store for development mode and tests.
//!
//! Adapters translate between domain types and storage representations and
//! carry no business logic.

pub mod memory;
pub mod persistence;
