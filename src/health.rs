//! Reports whether the server can reach its database.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;

use crate::{
    AppState, Error, auth::count_users, category::count_categories,
    transaction::count_transactions,
};

/// The state needed for the health check.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HealthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Row counts across all users.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// The number of registered users.
    pub users: usize,
    /// The number of categories across all users.
    pub categories: usize,
    /// The number of transactions across all users.
    pub transactions: usize,
}

fn collect_stats(db_connection: &Mutex<Connection>) -> Result<Stats, Error> {
    let connection = crate::db::lock(db_connection)?;

    Ok(Stats {
        users: count_users(&connection)?,
        categories: count_categories(&connection)?,
        transactions: count_transactions(&connection)?,
    })
}

/// A route handler that counts the stored rows.
///
/// Responds with 500 and `"status": "unhealthy"` when the database cannot be read.
pub async fn get_health(State(state): State<HealthState>) -> Response {
    match collect_stats(&state.db_connection) {
        Ok(stats) => Json(json!({
            "status": "healthy",
            "database": "connected",
            "stats": stats,
        }))
        .into_response(),
        Err(error) => {
            tracing::error!("Health check failed: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "unhealthy",
                    "error": error.to_string(),
                })),
            )
                .into_response()
        }
    }
}
