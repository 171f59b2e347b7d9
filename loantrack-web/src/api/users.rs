//! User registration

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::{flash_redirect, respond_failure, ResponseFormat};
use crate::db;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    pub user_name_new: Option<String>,
}

/// POST /add_user
///
/// Registers a user. The name is trimmed; an empty result is a validation
/// failure, otherwise the new id is returned.
pub async fn add_user(
    State(state): State<AppState>,
    format: ResponseFormat,
    Form(form): Form<AddUserForm>,
) -> Response {
    let name = form.user_name_new.unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return respond_failure(
            format,
            StatusCode::BAD_REQUEST,
            "missing_name",
            "user name is required",
        );
    }

    match db::users::insert_user(&state.db, &name).await {
        Ok(user_id) => {
            if format.is_json() {
                Json(json!({"ok": true, "user_id": user_id, "name": name})).into_response()
            } else {
                flash_redirect("success", "user added").into_response()
            }
        }
        Err(e) => {
            error!("Storage failure while adding user: {}", e);
            respond_failure(
                format,
                StatusCode::INTERNAL_SERVER_ERROR,
                "db_error",
                &e.to_string(),
            )
        }
    }
}
