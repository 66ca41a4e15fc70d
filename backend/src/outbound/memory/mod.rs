//! In-process adapters used when no database URL is configured.
//!
//! State lives for the lifetime of the process only.

mod todo_repository;
mod user_repository;

pub use todo_repository::InMemoryTodoRepository;
pub use user_repository::InMemoryUserRepository;

fn poisoned() -> String {
    "in-memory store lock poisoned".to_owned()
}
