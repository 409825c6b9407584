//! A personal finance tracker.
//!
//! Users register, log in, record income and expense transactions against
//! their own categories, and read aggregated summaries of those
//! transactions (totals, monthly trends, category breakdowns and a calendar
//! heatmap).
//!
//! This library provides a JSON REST API backed by SQLite, the pure
//! aggregation functions used to build the summaries, and a client-side cache
//! that mirrors a user's data for UI code.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod category;
pub mod client;
pub mod dashboard;
mod database_id;
mod db;
pub mod endpoints;
mod extract;
mod health;
mod logging;
mod not_found;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_email,
    normalize_email, update_password,
};
pub use category::{
    Category, CategoryColor, CategoryIcon, CategoryId, CategoryKind, CategoryName,
    DEFAULT_CATEGORIES, DefaultCategory, EmojiIcons, IconProvider, LucideIcons, reconcile,
};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    NewTransaction, Transaction, TransactionId, TransactionType, TransactionWithCategory,
    create_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid auth cookie.
    #[error("you must be logged in to access this resource")]
    Unauthenticated,

    /// The user provided an unknown email or the wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Either the auth token cookie is missing from the cookie jar in the
    /// request or it could not be parsed.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error formatting or extending a cookie expiry date.
    #[error("could not create the auth cookie expiry date")]
    InvalidDateFormat,

    /// A request field was missing or malformed.
    ///
    /// `field` names the offending field in the request body or query so the
    /// client can point the user at it.
    #[error("{message}")]
    Validation {
        /// The wire name of the offending field.
        field: &'static str,
        /// A human readable explanation.
        message: String,
    },

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used to create a category or display name.
    #[error("name cannot be empty")]
    EmptyName,

    /// A string that is not a `#RRGGBB` hex colour was used as a category colour.
    #[error("\"{0}\" is not a hex colour like #FF6B6B")]
    InvalidColor(String),

    /// The email address is already registered.
    #[error("email already in use")]
    DuplicateEmail,

    /// The user already owns a category with this name.
    #[error("a category with this name already exists")]
    DuplicateCategoryName,

    /// The category ID does not refer to a category owned by the caller.
    #[error("the category could not be found")]
    CategoryNotFound,

    /// The transaction type does not agree with the kind of its category,
    /// e.g. an income recorded against an expense category.
    #[error("a {transaction_type} transaction cannot use a {category_kind} category")]
    KindMismatch {
        /// The type requested for the transaction.
        transaction_type: TransactionType,
        /// The kind of the referenced category.
        category_kind: CategoryKind,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The local timezone configured for the server is not a valid canonical
    /// timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl Error {
    /// A shortcut for [Error::Validation].
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("category.name") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Unauthenticated | Error::InvalidCredentials | Error::CookieMissing => {
                StatusCode::UNAUTHORIZED
            }
            Error::Validation { .. }
            | Error::TooWeak(_)
            | Error::EmptyName
            | Error::InvalidColor(_)
            | Error::DuplicateEmail
            | Error::DuplicateCategoryName
            | Error::KindMismatch { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::CategoryNotFound => StatusCode::NOT_FOUND,
            Error::InvalidDateFormat
            | Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            Error::Validation { field, message } => json!({ "error": message, "field": field }),
            Error::KindMismatch { .. } => json!({ "error": self.to_string(), "field": "type" }),
            Error::CategoryNotFound => json!({ "error": self.to_string(), "field": "categoryId" }),
            // Internal errors are not intended to be shown to the client.
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", self);
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{CategoryKind, Error, TransactionType};

    #[tokio::test]
    async fn validation_error_names_field() {
        let response = Error::validation("amount", "amount must be a number").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["field"], "amount");
        assert_eq!(body["error"], "amount must be a number");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = Error::HashingError("secret detail".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(!text.contains("secret detail"), "got body {text}");
    }

    #[test]
    fn kind_mismatch_is_bad_request() {
        let response = Error::KindMismatch {
            transaction_type: TransactionType::Income,
            category_kind: CategoryKind::Expense,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
