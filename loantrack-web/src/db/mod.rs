//! Database access layer for loantrack-web

pub mod books;
pub mod loans;
pub mod users;
