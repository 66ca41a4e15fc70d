//! PostgreSQL-backed `TodoRepository`.
//!
//! Updates and deletes filter on both `id` and `user_id` in the same
//! statement, so an item can never be changed through another user's id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TodoPersistenceError, TodoRepository};
use crate::domain::{Todo, TodoId, TodoText, UserId};

use super::diesel_error_mapping::DieselFailure;
use super::models::{NewTodoRow, TodoRow, TodoTextUpdate};
use super::pool::DbPool;
use super::schema::todos;

/// Diesel implementation of the [`TodoRepository`] port.
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
}

impl DieselTodoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DieselFailure>) -> TodoPersistenceError {
    match failure.into() {
        DieselFailure::Connection(message) => TodoPersistenceError::connection(message),
        DieselFailure::Query(message) => TodoPersistenceError::query(message),
        DieselFailure::UniqueViolation => TodoPersistenceError::query("duplicate todo id"),
    }
}

fn row_to_todo(row: TodoRow) -> Result<Todo, TodoPersistenceError> {
    let text = TodoText::new(&row.text).map_err(|err| {
        TodoPersistenceError::query(format!("stored todo {} is invalid: {err}", row.id))
    })?;
    Ok(Todo::from_parts(
        TodoId::from(row.id),
        text,
        UserId::from(row.user_id),
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Todo>, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<TodoRow> = todos::table
            .filter(todos::user_id.eq(owner.as_uuid()))
            .order((todos::created_at.asc(), todos::id.asc()))
            .select(TodoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<TodoRow> = todos::table
            .find(*id.as_uuid())
            .select(TodoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(row_to_todo).transpose()
    }

    async fn insert(&self, todo: &Todo) -> Result<(), TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewTodoRow {
            id: *todo.id().as_uuid(),
            user_id: *todo.owner().as_uuid(),
            text: todo.text().as_ref(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        };
        diesel::insert_into(todos::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_failure)
    }

    async fn update_text(
        &self,
        id: &TodoId,
        owner: &UserId,
        text: &TodoText,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Todo>, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let changes = TodoTextUpdate {
            text: text.as_ref(),
            updated_at,
        };
        let row: Option<TodoRow> = diesel::update(
            todos::table
                .filter(todos::id.eq(id.as_uuid()))
                .filter(todos::user_id.eq(owner.as_uuid())),
        )
        .set(&changes)
        .returning(TodoRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_failure)?;
        row.map(row_to_todo).transpose()
    }

    async fn delete_owned(
        &self,
        id: &TodoId,
        owner: &UserId,
    ) -> Result<bool, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let removed = diesel::delete(
            todos::table
                .filter(todos::id.eq(id.as_uuid()))
                .filter(todos::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_failure)?;
        Ok(removed > 0)
    }
}
