//! Route handlers for listing and recording transactions.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{
    AppState, Error,
    auth::UserID,
    database_id::CategoryId,
    db::lock,
    extract::ApiJson,
    transaction::{
        NewTransaction, TransactionType, TransactionWithCategory, create_transaction,
        get_transactions_by_user,
    },
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The state needed to get or create a transaction.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a request to record a transaction.
///
/// Fields are loosely typed so that each can be checked and reported by name:
/// `amount` and `categoryId` may be JSON numbers or numeric strings, and
/// `date` may be `YYYY-MM-DD` or an RFC 3339 date-time.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub description: Option<String>,
    pub amount: Option<Value>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category_id: Option<Value>,
    pub date: Option<String>,
}

impl TransactionRequest {
    fn validate(self) -> Result<NewTransaction, Error> {
        let description = self
            .description
            .filter(|description| !description.trim().is_empty())
            .ok_or_else(|| Error::validation("description", "description is required"))?;

        let amount = parse_amount(self.amount)?;

        let transaction_type = self
            .transaction_type
            .ok_or_else(|| Error::validation("type", "type is required"))?;
        let transaction_type = TransactionType::from_str(&transaction_type)?;

        let category_id = parse_category_id(self.category_id)?;

        let date = self
            .date
            .ok_or_else(|| Error::validation("date", "date is required"))?;
        let date = parse_date(&date)?;

        Ok(NewTransaction {
            description,
            amount,
            transaction_type,
            date,
            category_id,
        })
    }
}

fn parse_amount(raw_amount: Option<Value>) -> Result<f64, Error> {
    let amount = match raw_amount {
        None | Some(Value::Null) => return Err(Error::validation("amount", "amount is required")),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(Error::validation(
            "amount",
            "amount must be a number greater than zero",
        )),
    }
}

fn parse_category_id(raw_category_id: Option<Value>) -> Result<CategoryId, Error> {
    let category_id = match raw_category_id {
        None | Some(Value::Null) => {
            return Err(Error::validation("categoryId", "categoryId is required"));
        }
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse::<CategoryId>().ok(),
        Some(_) => None,
    };

    category_id.ok_or_else(|| Error::validation("categoryId", "categoryId must be an integer ID"))
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 date-time whose date part is kept.
fn parse_date(raw_date: &str) -> Result<Date, Error> {
    let raw_date = raw_date.trim();

    Date::parse(raw_date, DATE_FORMAT)
        .or_else(|_| OffsetDateTime::parse(raw_date, &Rfc3339).map(|date_time| date_time.date()))
        .map_err(|_| {
            Error::validation(
                "date",
                format!("\"{raw_date}\" is not a date like 2026-10-19"),
            )
        })
}

/// Route handler that lists the caller's transactions, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<TransactionWithCategory>>, Error> {
    let connection = lock(&state.db_connection)?;

    get_transactions_by_user(user_id, &connection).map(Json)
}

/// Route handler that records a transaction for the caller.
///
/// Responds with 201 and the stored transaction, including its category.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(request): ApiJson<TransactionRequest>,
) -> Result<(StatusCode, Json<TransactionWithCategory>), Error> {
    let new_transaction = request.validate().inspect_err(|error| {
        tracing::warn!("Rejected transaction for user {user_id}: {error}");
    })?;

    let connection = lock(&state.db_connection)?;
    let transaction = create_transaction(new_transaction, user_id, &connection)
        .inspect_err(|error| tracing::warn!("Could not create transaction: {error}"))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod request_tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{Error, transaction::TransactionType};

    use super::{TransactionRequest, parse_amount, parse_date};

    fn valid_request() -> TransactionRequest {
        serde_json::from_value(json!({
            "description": "Rent",
            "amount": 1200,
            "type": "EXPENSE",
            "categoryId": 3,
            "date": "2026-10-01"
        }))
        .unwrap()
    }

    #[track_caller]
    fn assert_field_error(result: Result<impl std::fmt::Debug, Error>, want_field: &str) {
        match result {
            Err(Error::Validation { field, .. }) => assert_eq!(field, want_field),
            other => panic!("want validation error for {want_field}, got {other:?}"),
        }
    }

    #[test]
    fn valid_request_is_accepted() {
        let new_transaction = valid_request().validate().unwrap();

        assert_eq!(new_transaction.description, "Rent");
        assert_eq!(new_transaction.amount, 1200.0);
        assert_eq!(new_transaction.transaction_type, TransactionType::Expense);
        assert_eq!(new_transaction.category_id, 3);
        assert_eq!(new_transaction.date, date!(2026 - 10 - 01));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let request: TransactionRequest = serde_json::from_value(json!({
            "description": "Rent",
            "amount": "1200.50",
            "type": "EXPENSE",
            "categoryId": "3",
            "date": "2026-10-01T14:30:00Z"
        }))
        .unwrap();

        let new_transaction = request.validate().unwrap();

        assert_eq!(new_transaction.amount, 1200.5);
        assert_eq!(new_transaction.category_id, 3);
        assert_eq!(new_transaction.date, date!(2026 - 10 - 01));
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        assert_field_error(parse_amount(Some(json!("abc"))), "amount");
        assert_field_error(parse_amount(Some(json!(true))), "amount");
        assert_field_error(parse_amount(Some(json!(-5))), "amount");
        assert_field_error(parse_amount(Some(json!(0))), "amount");
        assert_field_error(parse_amount(None), "amount");
    }

    #[test]
    fn missing_fields_are_named() {
        let cases = [
            ("description", TransactionRequest { description: None, ..valid_request() }),
            ("amount", TransactionRequest { amount: None, ..valid_request() }),
            ("type", TransactionRequest { transaction_type: None, ..valid_request() }),
            ("categoryId", TransactionRequest { category_id: None, ..valid_request() }),
            ("date", TransactionRequest { date: None, ..valid_request() }),
        ];

        for (want_field, request) in cases {
            assert_field_error(request.validate(), want_field);
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let request = TransactionRequest {
            transaction_type: Some("TRANSFER".to_owned()),
            ..valid_request()
        };

        assert_field_error(request.validate(), "type");
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert_field_error(parse_date("yesterday"), "date");
        assert_field_error(parse_date("2026-02-30"), "date");
        assert_field_error(parse_date("19/10/2026"), "date");
    }
}
