//! Embedded schema migrations applied at startup.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Migrations compiled into the binary from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures while bringing the schema up to date.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {0}")]
    Connect(String),
    #[error("failed to apply migrations: {0}")]
    Apply(String),
}

/// Apply every pending migration and return the versions that ran.
///
/// Blocking; call it from `spawn_blocking` inside an async runtime.
pub fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| MigrationError::Connect(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply(err.to_string()))?;
    Ok(applied.iter().map(ToString::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::migration::MigrationSource;
    use diesel::pg::Pg;

    #[test]
    fn schema_migration_is_embedded() {
        let migrations =
            MigrationSource::<Pg>::migrations(&MIGRATIONS).expect("embedded migrations load");
        assert!(
            migrations
                .iter()
                .any(|m| m.name().to_string().contains("create_users_and_todos"))
        );
    }

    const CREATE_SQL: &str = include_str!(
        "../../../migrations/2026-01-12-090000_create_users_and_todos/up.sql"
    );

    #[test]
    fn todos_reference_users_without_cascading() {
        let sql = CREATE_SQL.to_ascii_lowercase();
        assert!(sql.contains("references users (id)"));
        assert!(!sql.contains("on delete"));
        assert!(!sql.contains("on update"));
    }
}
