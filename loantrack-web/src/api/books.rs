//! Book registration via metadata lookup

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use loantrack_common::db::models::UNCATEGORIZED;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::{flash_redirect, respond_failure, ResponseFormat};
use crate::db;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddBookForm {
    pub isbn_new: Option<String>,
}

/// POST /add_book
///
/// Registers a book by ISBN: fetches OpenBD metadata, derives title and
/// category (first subject, else the uncategorized sentinel), and upserts
/// the book, its category, and its descriptive text in one transaction.
/// A failed lookup fails the request; it does not fall back to a manual
/// registration.
pub async fn add_book(
    State(state): State<AppState>,
    format: ResponseFormat,
    Form(form): Form<AddBookForm>,
) -> Response {
    let isbn = form.isbn_new.unwrap_or_default().trim().to_string();
    if isbn.is_empty() {
        return respond_failure(
            format,
            StatusCode::BAD_REQUEST,
            "missing_isbn",
            "ISBN is required",
        );
    }

    let metadata = match state.metadata.lookup(&isbn).await {
        Some(metadata) => metadata,
        None => {
            return respond_failure(
                format,
                StatusCode::NOT_FOUND,
                "openbd_not_found",
                "no matching record found on OpenBD",
            )
        }
    };

    let title = metadata.title.clone().unwrap_or_else(|| isbn.clone());
    let category_name = metadata
        .subjects
        .first()
        .cloned()
        .unwrap_or_else(|| UNCATEGORIZED.to_string());

    match db::books::register_book(
        &state.db,
        &isbn,
        &title,
        &category_name,
        metadata.text.as_deref(),
    )
    .await
    {
        Ok(category_id) => {
            if format.is_json() {
                Json(json!({
                    "ok": true,
                    "isbn": isbn,
                    "title": title,
                    "text": metadata.text,
                    "category_id": category_id,
                    "category_name": category_name,
                }))
                .into_response()
            } else {
                flash_redirect("success", &format!("registered book: {}", title))
                    .into_response()
            }
        }
        Err(e) => {
            error!("Storage failure while adding book: {}", e);
            respond_failure(
                format,
                StatusCode::INTERNAL_SERVER_ERROR,
                "db_error",
                &e.to_string(),
            )
        }
    }
}
