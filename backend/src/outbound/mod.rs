//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local repositories for development and tests
//! - **password**: bcrypt password hashing

pub mod memory;
pub mod password;
pub mod persistence;
