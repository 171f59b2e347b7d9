//! Loan log operations
//!
//! The loan log is append-only and is the sole source of truth for loan
//! state: "currently on loan" is always recomputed from the most recent
//! entry per ISBN, never stored as a flag.

use loantrack_common::db::models::{Action, CurrentLoanView, LogEntryView, ACTION_LOAN};
use loantrack_common::{Error, Result};
use sqlx::{Row, SqlitePool};

/// Combined validation message when any referenced entity is missing
pub const MISSING_REFERENCE: &str = "selected user, book, or action does not exist";

/// Append one loan log entry after validating all three references.
///
/// Runs in a single transaction: the existence checks and the insert either
/// all take effect or none do. A missing user, book, or action is reported
/// as one combined condition, not per field.
pub async fn record_action(
    pool: &SqlitePool,
    user_id: i64,
    isbn: &str,
    action_id: i64,
    logged_at: &str,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_scalar::<_, i64>("SELECT 1 FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    let book = sqlx::query_scalar::<_, i64>("SELECT 1 FROM books WHERE isbn = ?")
        .bind(isbn)
        .fetch_optional(&mut *tx)
        .await?;
    let action = sqlx::query_scalar::<_, i64>("SELECT 1 FROM actions WHERE action_id = ?")
        .bind(action_id)
        .fetch_optional(&mut *tx)
        .await?;

    if user.is_none() || book.is_none() || action.is_none() {
        return Err(Error::NotFound(MISSING_REFERENCE.to_string()));
    }

    sqlx::query("INSERT INTO loan_logs (logged_at, user_id, isbn, action_id) VALUES (?, ?, ?, ?)")
        .bind(logged_at)
        .bind(user_id)
        .bind(isbn)
        .bind(action_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Most recent log entries joined with display names, newest first.
///
/// LEFT JOINs keep entries whose referenced rows have since disappeared.
pub async fn recent_logs(pool: &SqlitePool, limit: i64) -> Result<Vec<LogEntryView>> {
    let rows = sqlx::query(
        r#"
        SELECT l.loan_id, l.logged_at, u.name AS user_name,
               b.title AS book_title, l.isbn, a.action_name
        FROM loan_logs l
        LEFT JOIN users u ON l.user_id = u.user_id
        LEFT JOIN books b ON l.isbn = b.isbn
        LEFT JOIN actions a ON l.action_id = a.action_id
        ORDER BY l.logged_at DESC, l.loan_id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| LogEntryView {
            loan_id: row.get("loan_id"),
            logged_at: row.get("logged_at"),
            user_name: row.get("user_name"),
            book_title: row.get("book_title"),
            isbn: row.get("isbn"),
            action_name: row.get("action_name"),
        })
        .collect())
}

/// Currently loaned books: for each ISBN the single most recent log entry,
/// filtered to those whose latest action is a loan.
pub async fn current_loans(pool: &SqlitePool) -> Result<Vec<CurrentLoanView>> {
    let rows = sqlx::query(
        r#"
        SELECT l.loan_id, l.logged_at, l.isbn, b.title AS book_title,
               u.name AS user_name, a.action_name
        FROM loan_logs l
        JOIN (SELECT isbn, MAX(logged_at) AS latest FROM loan_logs GROUP BY isbn) m
            ON l.isbn = m.isbn AND l.logged_at = m.latest
        LEFT JOIN actions a ON l.action_id = a.action_id
        LEFT JOIN books b ON l.isbn = b.isbn
        LEFT JOIN users u ON l.user_id = u.user_id
        WHERE a.action_name = ?
        ORDER BY l.logged_at DESC
        "#,
    )
    .bind(ACTION_LOAN)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CurrentLoanView {
            loan_id: row.get("loan_id"),
            logged_at: row.get("logged_at"),
            isbn: row.get("isbn"),
            book_title: row.get("book_title"),
            user_name: row.get("user_name"),
            action_name: row.get("action_name"),
        })
        .collect())
}

/// All actions in id order (reference data)
pub async fn list_actions(pool: &SqlitePool) -> Result<Vec<Action>> {
    let rows = sqlx::query("SELECT action_id, action_name FROM actions ORDER BY action_id")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| Action {
            action_id: row.get("action_id"),
            action_name: row.get("action_name"),
        })
        .collect())
}

/// Resolve an action id by its display name
pub async fn find_action_id_by_name(pool: &SqlitePool, name: &str) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT action_id FROM actions WHERE action_name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}
