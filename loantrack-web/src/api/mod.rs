//! HTTP API for loantrack-web
//!
//! Mutating endpoints serve two kinds of callers: browser forms, which get a
//! redirect back to the list view with a transient status message, and
//! machine callers, which get a JSON body with an `ok` boolean. The caller's
//! preference is resolved once per request by the [`ResponseFormat`]
//! extractor and passed down; handlers never re-sniff headers.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use std::convert::Infallible;

pub mod actions;
pub mod books;
pub mod health;
pub mod ui;
pub mod users;
pub mod views;

pub use actions::{do_action, submit};
pub use books::add_book;
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index};
pub use users::add_user;
pub use views::{current_loans, overview};

/// Response mode for dual-mode endpoints, resolved once at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Browser caller: redirect to the list view with a status message
    Html,
    /// Machine caller: structured JSON acknowledgment
    Json,
}

impl ResponseFormat {
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ResponseFormat
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        Ok(resolve_format(parts))
    }
}

/// A machine-readable response is requested via an explicit `redirect=0`
/// query flag, the AJAX marker header, or a JSON-accepting Accept header.
fn resolve_format(parts: &Parts) -> ResponseFormat {
    let query = parts.uri.query().unwrap_or("");
    if query.split('&').any(|pair| pair == "redirect=0") {
        return ResponseFormat::Json;
    }

    let requested_with = parts
        .headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok());
    if requested_with == Some("XMLHttpRequest") {
        return ResponseFormat::Json;
    }

    let accepts_json = parts
        .headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"));
    if accepts_json {
        return ResponseFormat::Json;
    }

    ResponseFormat::Html
}

/// Redirect to the list view carrying a transient status message
pub fn flash_redirect(level: &str, message: &str) -> Redirect {
    Redirect::to(&format!(
        "/?flash={}&level={}",
        urlencoding::encode(message),
        level
    ))
}

/// Failure response in the resolved format: `{ok:false, error, message}`
/// with the given status for JSON callers, flash redirect for browsers.
pub fn respond_failure(
    format: ResponseFormat,
    status: StatusCode,
    code: &str,
    message: &str,
) -> Response {
    if format.is_json() {
        (
            status,
            Json(json!({"ok": false, "error": code, "message": message})),
        )
            .into_response()
    } else {
        flash_redirect("error", message).into_response()
    }
}
