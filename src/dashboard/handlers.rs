//! Route handlers for the dashboard summary and the calendar heatmap.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    AppState, Error,
    auth::UserID,
    category::get_categories_by_user,
    dashboard::{
        aggregation::{DayActivity, daily_activity},
        summary::{DEFAULT_SUMMARY_MONTHS, Summary, summarize},
    },
    db::lock,
    timezone::local_today,
    transaction::{Transaction, get_transactions_by_user},
};

/// The most months a summary may cover.
pub const MAX_SUMMARY_MONTHS: usize = 24;

/// The state needed for the dashboard endpoints.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl DashboardState {
    fn today(&self) -> Result<Date, Error> {
        local_today(&self.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", self.local_timezone);
            Error::InvalidTimezoneError(self.local_timezone.clone())
        })
    }
}

/// Query parameters for [get_summary_endpoint].
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// How many months the rollup covers, 1 to [MAX_SUMMARY_MONTHS].
    pub months: Option<usize>,
}

/// Query parameters for [get_activity_endpoint].
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    /// 1 for January. Defaults to the current month.
    pub month: Option<u8>,
    /// Defaults to the current year.
    pub year: Option<i32>,
}

/// The heatmap for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityResponse {
    /// 1 for January.
    pub month: u8,
    /// The calendar year of `month`.
    pub year: i32,
    /// One entry per day of the month.
    pub days: Vec<DayActivity>,
}

fn query_error(rejection: QueryRejection) -> Error {
    tracing::warn!("Rejected query: {}", rejection.body_text());
    Error::validation("query", rejection.body_text())
}

fn load_transactions(user_id: UserID, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    Ok(get_transactions_by_user(user_id, connection)?
        .into_iter()
        .map(|with_category| with_category.transaction)
        .collect())
}

fn validate_months(months: Option<usize>) -> Result<usize, Error> {
    match months.unwrap_or(DEFAULT_SUMMARY_MONTHS) {
        months @ 1..=MAX_SUMMARY_MONTHS => Ok(months),
        _ => Err(Error::validation(
            "months",
            format!("months must be between 1 and {MAX_SUMMARY_MONTHS}"),
        )),
    }
}

/// Route handler for the caller's totals, monthly rollup and category breakdowns.
pub async fn get_summary_endpoint(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<Summary>, Error> {
    let Query(query) = query.map_err(query_error)?;
    let month_count = validate_months(query.months)?;
    let today = state.today()?;

    let connection = lock(&state.db_connection)?;
    let transactions = load_transactions(user_id, &connection)?;
    let categories = get_categories_by_user(user_id, &connection)?;

    Ok(Json(summarize(&transactions, &categories, month_count, today)))
}

/// Route handler for the caller's transaction counts per day of a month.
pub async fn get_activity_endpoint(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<ActivityQuery>, QueryRejection>,
) -> Result<Json<ActivityResponse>, Error> {
    let Query(query) = query.map_err(query_error)?;
    let today = state.today()?;

    let month = match query.month {
        Some(month) => Month::try_from(month)
            .map_err(|_| Error::validation("month", "month must be between 1 and 12"))?,
        None => today.month(),
    };
    let year = query.year.unwrap_or(today.year());

    let connection = lock(&state.db_connection)?;
    let transactions = load_transactions(user_id, &connection)?;

    Ok(Json(ActivityResponse {
        month: month as u8,
        year,
        days: daily_activity(&transactions, month, year),
    }))
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{DEFAULT_SUMMARY_MONTHS, MAX_SUMMARY_MONTHS, validate_months};

    #[test]
    fn months_default_to_six() {
        assert_eq!(validate_months(None), Ok(DEFAULT_SUMMARY_MONTHS));
        assert_eq!(DEFAULT_SUMMARY_MONTHS, 6);
    }

    #[test]
    fn months_outside_range_are_rejected() {
        for months in [0, MAX_SUMMARY_MONTHS + 1] {
            assert!(matches!(
                validate_months(Some(months)),
                Err(Error::Validation { field: "months", .. })
            ));
        }
        assert_eq!(validate_months(Some(MAX_SUMMARY_MONTHS)), Ok(MAX_SUMMARY_MONTHS));
    }
}
