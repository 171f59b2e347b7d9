//! Book and category persistence
//!
//! Books upsert on their ISBN; categories are created lazily the first time
//! a subject label is seen.

use loantrack_common::db::models::Book;
use loantrack_common::Result;
use sqlx::{Row, SqlitePool};

/// All books in title order
pub async fn list_books(pool: &SqlitePool) -> Result<Vec<Book>> {
    let rows = sqlx::query("SELECT isbn, title, category_id FROM books ORDER BY title")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| Book {
            isbn: row.get("isbn"),
            title: row.get("title"),
            category_id: row.get("category_id"),
        })
        .collect())
}

/// Register a book with its category and optional descriptive text.
///
/// One transaction covering the category upsert, the book upsert, and the
/// details upsert: any failure rolls back all three. Re-registering an ISBN
/// overwrites its title and category and leaves exactly one row.
///
/// Returns the category id for the response echo.
pub async fn register_book(
    pool: &SqlitePool,
    isbn: &str,
    title: &str,
    category_name: &str,
    text: Option<&str>,
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let existing =
        sqlx::query_scalar::<_, i64>("SELECT category_id FROM categories WHERE category_name = ?")
            .bind(category_name)
            .fetch_optional(&mut *tx)
            .await?;
    let category_id = match existing {
        Some(id) => id,
        None => {
            sqlx::query("INSERT INTO categories (category_name) VALUES (?)")
                .bind(category_name)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid()
        }
    };

    sqlx::query(
        r#"
        INSERT INTO books (isbn, title, category_id) VALUES (?, ?, ?)
        ON CONFLICT(isbn) DO UPDATE SET
            title = excluded.title,
            category_id = excluded.category_id,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(isbn)
    .bind(title)
    .bind(category_id)
    .execute(&mut *tx)
    .await?;

    if let Some(text) = text {
        sqlx::query(
            r#"
            INSERT INTO book_details (isbn, text_content) VALUES (?, ?)
            ON CONFLICT(isbn) DO UPDATE SET text_content = excluded.text_content
            "#,
        )
        .bind(isbn)
        .bind(text)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(category_id)
}
