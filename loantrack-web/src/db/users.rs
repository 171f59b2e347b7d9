//! User persistence

use loantrack_common::db::models::User;
use loantrack_common::Result;
use sqlx::{Row, SqlitePool};

/// All users in name order
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT user_id, name FROM users ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| User {
            user_id: row.get("user_id"),
            name: row.get("name"),
        })
        .collect())
}

/// Insert a new user and return the assigned id
pub async fn insert_user(pool: &SqlitePool, name: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO users (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}
