//! Database models

use serde::{Deserialize, Serialize};

/// Display name of the loan action (reference data)
pub const ACTION_LOAN: &str = "loan";
/// Display name of the return action (reference data)
pub const ACTION_RETURN: &str = "return";

/// Fallback action id when display-name lookup fails
pub const ACTION_LOAN_FALLBACK_ID: i64 = 1;
/// Fallback action id when display-name lookup fails
pub const ACTION_RETURN_FALLBACK_ID: i64 = 2;

/// Sentinel category assigned when no subject can be extracted
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub action_id: i64,
    pub action_name: String,
}

/// One append-only loan log fact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanLogEntry {
    pub loan_id: i64,
    pub logged_at: String,
    pub user_id: i64,
    pub isbn: String,
    pub action_id: i64,
}

/// Log entry joined with display names for the list view.
///
/// Joined via LEFT JOIN, so the display names are absent when the referenced
/// row has since disappeared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryView {
    pub loan_id: i64,
    pub logged_at: String,
    pub user_name: Option<String>,
    pub book_title: Option<String>,
    pub isbn: String,
    pub action_name: Option<String>,
}

/// Latest log entry for a book whose most recent action is a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentLoanView {
    pub loan_id: i64,
    pub logged_at: String,
    pub isbn: String,
    pub book_title: Option<String>,
    pub user_name: Option<String>,
    pub action_name: Option<String>,
}
