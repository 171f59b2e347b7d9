//! Read-only list views

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use loantrack_common::db::models::{Action, Book, CurrentLoanView, LogEntryView, User};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::db;
use crate::AppState;

/// Number of log entries shown on the list view
const RECENT_LOG_LIMIT: i64 = 20;

/// List view data: all users, books, actions, and the latest log entries
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub users: Vec<User>,
    pub books: Vec<Book>,
    pub actions: Vec<Action>,
    pub logs: Vec<LogEntryView>,
}

/// Currently loaned books, newest first
#[derive(Debug, Serialize)]
pub struct CurrentLoansResponse {
    pub loans: Vec<CurrentLoanView>,
}

/// GET /api/overview
///
/// Users ordered by name, books by title, actions by id; the 20 most recent
/// log entries joined with display names, newest first.
pub async fn overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>, ViewError> {
    let users = db::users::list_users(&state.db).await?;
    let books = db::books::list_books(&state.db).await?;
    let actions = db::loans::list_actions(&state.db).await?;
    let logs = db::loans::recent_logs(&state.db, RECENT_LOG_LIMIT).await?;

    Ok(Json(OverviewResponse {
        users,
        books,
        actions,
        logs,
    }))
}

/// GET /api/current_loans
pub async fn current_loans(
    State(state): State<AppState>,
) -> Result<Json<CurrentLoansResponse>, ViewError> {
    let loans = db::loans::current_loans(&state.db).await?;
    Ok(Json(CurrentLoansResponse { loans }))
}

/// Storage failure at a read-only view boundary
#[derive(Debug)]
pub struct ViewError(loantrack_common::Error);

impl From<loantrack_common::Error> for ViewError {
    fn from(e: loantrack_common::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        error!("View query failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": self.0.to_string()})),
        )
            .into_response()
    }
}
