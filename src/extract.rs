//! Request extractors that report failures with the crate's JSON errors.

use axum::{extract::FromRequest, extract::rejection::JsonRejection};

use crate::Error;

/// Like [axum::Json], but a body that is not valid JSON for `T` is rejected
/// with a 400 [Error::Validation] naming the body instead of a plain text
/// response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Error::validation("body", rejection.body_text())
    }
}
