//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between row structs and domain types and hold no
//! business rules. Row structs and the schema stay private to this module.
//!
//! ```ignore
//! use todo_backend::outbound::persistence::{DbPool, DieselTodoRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/todos")).await?;
//! let todos = DieselTodoRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_todo_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_todo_repository::DieselTodoRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
