//! The registration endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, User, ValidatedPassword, create_user, normalize_email, set_auth_cookie},
    category::reconcile_or_log,
    db::lock,
    extract::ApiJson,
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The bcrypt work factor for new password hashes.
    pub password_hash_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a registration request.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn required(field: &'static str, value: Option<String>) -> Result<String, Error> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::validation(field, format!("{field} is required")))
}

/// Handler for registration requests.
///
/// Creates the user, gives them the default categories and logs them in.
/// Responds with 201 and the new user. A failure to create the categories
/// is logged and does not fail the registration.
///
/// # Errors
///
/// Returns a validation error naming the field for a missing name, a
/// malformed email or a weak password, and [Error::DuplicateEmail] if the
/// email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    ApiJson(user_data): ApiJson<RegisterData>,
) -> Result<(StatusCode, PrivateCookieJar, Json<User>), Error> {
    let name = required("name", user_data.name)?.trim().to_owned();
    let email = normalize_email(&required("email", user_data.email)?)?;
    let password = required("password", user_data.password)?;

    let validated_password =
        ValidatedPassword::new(&password, &[&name, &email]).map_err(|error| match error {
            Error::TooWeak(reason) => {
                Error::validation("password", format!("password is too weak: {reason}"))
            }
            error => error,
        })?;

    let password_hash = PasswordHash::new(validated_password, state.password_hash_cost)
        .inspect_err(|error| tracing::error!("an error occurred while hashing a password: {error}"))?;

    let connection = lock(&state.db_connection)?;
    let user = create_user(&email, &name, password_hash, &connection).inspect_err(|error| {
        if *error == Error::DuplicateEmail {
            tracing::warn!("Registration with an email that is already in use");
        }
    })?;
    tracing::info!("Registered user {}", user.id);

    reconcile_or_log(user.id, &connection);
    drop(connection);

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((StatusCode::CREATED, jar, Json(user)))
}
