//! Recording loan and return actions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use loantrack_common::db::models::{
    ACTION_LOAN, ACTION_LOAN_FALLBACK_ID, ACTION_RETURN, ACTION_RETURN_FALLBACK_ID,
};
use loantrack_common::Error;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::{flash_redirect, respond_failure, ResponseFormat};
use crate::db;
use crate::AppState;

/// Caller-supplied timestamps arrive as `YYYY-MM-DDTHH:MM[:SS]` from
/// datetime-local inputs; the single `T` separator becomes a space. Absent
/// timestamps default to current server time.
fn normalize_logged_at(raw: Option<String>) -> String {
    match raw {
        Some(value) if !value.is_empty() => value.replacen('T', " ", 1),
        _ => chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub user_id: Option<String>,
    pub isbn: Option<String>,
    pub action_id: Option<String>,
    pub logged_at: Option<String>,
}

/// POST /submit
///
/// Browser form submission: record an action and redirect back to the list
/// view with a status message.
pub async fn submit(State(state): State<AppState>, Form(form): Form<SubmitForm>) -> Redirect {
    let logged_at = normalize_logged_at(form.logged_at);

    // Unparsable or absent identifiers fail the reference check the same
    // way nonexistent ones do.
    let user_id = parse_id(form.user_id.as_deref());
    let action_id = parse_id(form.action_id.as_deref());
    let isbn = form.isbn.unwrap_or_default();

    match db::loans::record_action(&state.db, user_id, &isbn, action_id, &logged_at).await {
        Ok(()) => flash_redirect("success", "record added"),
        Err(Error::NotFound(message)) => flash_redirect("error", &message),
        Err(e) => {
            error!("Storage failure while recording action: {}", e);
            flash_redirect("error", &format!("an error occurred: {}", e))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DoActionParams {
    pub user_id: Option<String>,
    pub isbn: Option<String>,
    pub logged_at: Option<String>,
    /// Response-format flag; consumed by the `ResponseFormat` extractor
    #[allow(dead_code)]
    pub redirect: Option<String>,
}

/// GET|POST /do/:what
///
/// Perform an action by URL, e.g. `/do/loan?user_id=1&isbn=9784094078263`.
/// Supported `what`: `loan`, `return`. Parameters come from the query string
/// on GET or the form body on POST. The action id is resolved by display
/// name with a hard-coded numeric fallback.
pub async fn do_action(
    State(state): State<AppState>,
    Path(what): Path<String>,
    format: ResponseFormat,
    Form(params): Form<DoActionParams>,
) -> Response {
    let (action_name, fallback_id) = match what.as_str() {
        "loan" => (ACTION_LOAN, ACTION_LOAN_FALLBACK_ID),
        "return" => (ACTION_RETURN, ACTION_RETURN_FALLBACK_ID),
        _ => return (StatusCode::NOT_FOUND, "unknown action").into_response(),
    };

    let user_id_raw = params.user_id.filter(|v| !v.is_empty());
    let isbn = params.isbn.filter(|v| !v.is_empty());
    let (user_id_raw, isbn) = match (user_id_raw, isbn) {
        (Some(user_id), Some(isbn)) => (user_id, isbn),
        _ => {
            return respond_failure(
                format,
                StatusCode::BAD_REQUEST,
                "missing_parameters",
                "user_id and isbn are required",
            )
        }
    };

    let action_id = match db::loans::find_action_id_by_name(&state.db, action_name).await {
        Ok(Some(id)) => id,
        Ok(None) => fallback_id,
        Err(e) => {
            debug!("Action lookup failed, using fallback id: {}", e);
            fallback_id
        }
    };

    let logged_at = normalize_logged_at(params.logged_at);
    let user_id = parse_id(Some(user_id_raw.as_str()));

    match db::loans::record_action(&state.db, user_id, &isbn, action_id, &logged_at).await {
        Ok(()) => {
            if format.is_json() {
                Json(json!({
                    "ok": true,
                    "action": what,
                    "user_id": user_id_raw,
                    "isbn": isbn,
                }))
                .into_response()
            } else {
                flash_redirect("success", &format!("recorded {} (ISBN: {})", what, isbn))
                    .into_response()
            }
        }
        Err(Error::NotFound(message)) => respond_failure(
            format,
            StatusCode::BAD_REQUEST,
            "invalid_reference",
            &message,
        ),
        Err(e) => {
            error!("Storage failure while recording action: {}", e);
            respond_failure(
                format,
                StatusCode::INTERNAL_SERVER_ERROR,
                "db_error",
                &e.to_string(),
            )
        }
    }
}

/// Parse a form identifier; anything unparsable maps to an id that cannot
/// exist, so it fails the reference check rather than the request parse.
fn parse_id(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok()).unwrap_or(-1)
}
