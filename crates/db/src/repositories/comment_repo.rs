//! Repository for the `comments` table.

use sqlx::PgPool;
use tripboard_core::types::DbId;

use crate::models::comment::{Comment, CommentWithAuthor, CreateComment};

const COLUMNS: &str = "id, activity_id, user_id, content, created_at, updated_at";

/// Provides CRUD operations for activity comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        activity_id: DbId,
        user_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (activity_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(activity_id)
            .bind(user_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an activity's comments, oldest first.
    pub async fn list_for_activity(
        pool: &PgPool,
        activity_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.activity_id, c.user_id, u.username, c.content, c.created_at
             FROM comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.activity_id = $1
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(activity_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a comment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
