//! The log-in endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{User, get_user_by_email, set_auth_cookie},
    category::reconcile_or_log,
    db::lock,
    extract::ApiJson,
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
pub const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials sent to the log-in endpoint.
///
/// The password is a plain string. There is no need for validation here since
/// it is only compared against the stored hash.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInData {
    pub email: String,
    pub password: String,
    /// Keep the user logged in for [REMEMBER_ME_COOKIE_DURATION].
    #[serde(default)]
    pub remember_me: bool,
}

/// Handler for log-in requests.
///
/// On success the auth cookie is set, the user's default categories are
/// created if any are missing, and the user is returned. A failure to create
/// the categories is logged and does not fail the log-in.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] for an unknown email or wrong password.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    ApiJson(credentials): ApiJson<LogInData>,
) -> Result<(PrivateCookieJar, Json<User>), Error> {
    let email = credentials.email.trim().to_lowercase();
    let user = match get_user_by_email(&email, &*lock(&state.db_connection)?) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            tracing::warn!("Log-in attempt for unknown email");
            return Err(Error::InvalidCredentials);
        }
        Err(error) => return Err(error),
    };

    let is_password_valid = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !is_password_valid {
        tracing::warn!("Wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    reconcile_or_log(user.id, &*lock(&state.db_connection)?);

    let cookie_duration = if credentials.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let jar = set_auth_cookie(jar, user.id, cookie_duration)?;
    tracing::info!("User {} logged in", user.id);

    Ok((jar, Json(user)))
}
