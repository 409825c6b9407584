//! A client-side mirror of one user's transactions and categories.
//!
//! [TransactionCache] is the only writer of the mirror. It fetches everything
//! once after logging in, appends what the server confirms on each add, and
//! only sees writes from other sessions after an explicit refresh.

mod api;
mod cache;

pub use api::{FinanceApi, HttpFinanceApi};
pub use cache::{Notice, TransactionCache};

/// The errors a client call may return.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The request could not be sent or the response could not be decoded.
    #[error("could not reach the server: {0}")]
    Request(#[from] reqwest::Error),

    /// The session cookie is missing or expired, or the credentials were wrong.
    #[error("not logged in")]
    Unauthenticated,

    /// The server rejected the request.
    #[error("the server responded with {status}: {message}")]
    Server {
        /// The HTTP status code.
        status: u16,
        /// The `error` field of the response body.
        message: String,
    },
}
