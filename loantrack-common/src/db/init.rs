//! Database initialization
//!
//! Creates the database file on first run and brings the schema up
//! idempotently. Every table creation is `CREATE TABLE IF NOT EXISTS`, so
//! calling `init_database` against an existing database is a no-op apart
//! from seeding any missing reference rows.

use crate::db::models::{ACTION_LOAN, ACTION_RETURN};
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and seed reference data (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_categories_table(pool).await?;
    create_books_table(pool).await?;
    create_book_details_table(pool).await?;
    create_actions_table(pool).await?;
    create_loan_logs_table(pool).await?;
    Ok(())
}

pub async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_categories_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            category_id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_books_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            isbn TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            category_id INTEGER REFERENCES categories(category_id),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// One-to-one long-form descriptive text, present only when extracted
pub async fn create_book_details_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS book_details (
            isbn TEXT PRIMARY KEY REFERENCES books(isbn),
            text_content TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Actions are reference data, not created at runtime by normal flows
pub async fn create_actions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS actions (
            action_id INTEGER PRIMARY KEY,
            action_name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Seed the fixed enumeration if missing
    sqlx::query("INSERT OR IGNORE INTO actions (action_id, action_name) VALUES (1, ?), (2, ?)")
        .bind(ACTION_LOAN)
        .bind(ACTION_RETURN)
        .execute(pool)
        .await?;

    Ok(())
}

/// Append-only loan log: the source of truth for loan state.
///
/// Referential integrity is enforced by explicit existence checks before
/// insert, not by declared foreign keys on this table.
pub async fn create_loan_logs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS loan_logs (
            loan_id INTEGER PRIMARY KEY AUTOINCREMENT,
            logged_at TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            isbn TEXT NOT NULL,
            action_id INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_loan_logs_isbn ON loan_logs(isbn)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_loan_logs_logged_at ON loan_logs(logged_at)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_creation_is_idempotent() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        create_schema(&pool).await.expect("First creation failed");
        create_schema(&pool).await.expect("Second creation failed");

        let actions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM actions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(actions, 2, "Seeded actions should not duplicate");
    }

    #[tokio::test]
    async fn test_actions_are_seeded() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();

        let name: String =
            sqlx::query_scalar("SELECT action_name FROM actions WHERE action_id = 1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(name, ACTION_LOAN);

        let name: String =
            sqlx::query_scalar("SELECT action_name FROM actions WHERE action_id = 2")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(name, ACTION_RETURN);
    }

    #[tokio::test]
    async fn test_init_database_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("loantrack.db");

        let pool = init_database(&db_path).await.expect("init failed");
        assert!(db_path.exists());

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 0);
    }
}
