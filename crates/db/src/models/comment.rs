//! Activity comment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tripboard_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub activity_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub activity_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}
