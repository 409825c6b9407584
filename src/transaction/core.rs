//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryKind, get_category, map_row_with_offset},
    database_id::{CategoryId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionType {
    /// The value stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }

    /// The kind of category a transaction of this type must use.
    pub fn category_kind(&self) -> CategoryKind {
        match self {
            TransactionType::Income => CategoryKind::Income,
            TransactionType::Expense => CategoryKind::Expense,
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(Error::validation(
                "type",
                format!("\"{other}\" is not one of INCOME or EXPENSE"),
            )),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// How much money moved. Always positive, `transaction_type` gives the direction.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction belongs to. Owned by `user_id`.
    pub category_id: CategoryId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// When the server stored the transaction.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A transaction along with the category it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionWithCategory {
    /// The stored transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The category `transaction.category_id` refers to.
    pub category: Category,
}

/// The fields of a transaction that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// How much money moved, must be positive.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// A category owned by the same user with a kind matching `transaction_type`.
    pub category_id: CategoryId,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table and its indexes.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            type TEXT NOT NULL CHECK (type IN ('INCOME', 'EXPENSE')),
            date TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
    )?;

    Ok(())
}

/// Validate and store a new transaction for `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] naming `description` or `amount` if either is empty or not positive,
/// - [Error::CategoryNotFound] if the category does not exist or belongs to another user,
/// - [Error::KindMismatch] if the category kind does not match the transaction type,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<TransactionWithCategory, Error> {
    let description = new_transaction.description.trim();
    if description.is_empty() {
        return Err(Error::validation("description", "description is required"));
    }

    if !new_transaction.amount.is_finite() || new_transaction.amount <= 0.0 {
        return Err(Error::validation(
            "amount",
            "amount must be a number greater than zero",
        ));
    }

    let category = get_category(new_transaction.category_id, user_id, connection)?;
    if category.kind != new_transaction.transaction_type.category_kind() {
        return Err(Error::KindMismatch {
            transaction_type: new_transaction.transaction_type,
            category_kind: category.kind,
        });
    }

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (description, amount, type, date, category_id, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, description, amount, type, date, category_id, user_id, created_at",
        )?
        .query_row(
            (
                description,
                new_transaction.amount,
                new_transaction.transaction_type.as_str(),
                new_transaction.date,
                category.id,
                user_id.as_i64(),
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    tracing::debug!(
        "Created {} transaction {} for user {user_id}",
        transaction.transaction_type,
        transaction.id
    );

    Ok(TransactionWithCategory {
        transaction,
        category,
    })
}

/// Retrieve the transactions of `user_id` with their categories, newest date first.
///
/// Transactions on the same date are ordered newest first by ID.
pub fn get_transactions_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.description, t.amount, t.type, t.date, t.category_id, t.user_id, t.created_at,
                    c.id, c.name, c.color, c.icon, c.kind, c.user_id
             FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             WHERE t.user_id = :user_id
             ORDER BY t.date DESC, t.id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            Ok(TransactionWithCategory {
                transaction: map_transaction_row(row)?,
                category: map_row_with_offset(row, 8)?,
            })
        })?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_type: String = row.get(3)?;
    let transaction_type = TransactionType::from_str(&raw_type).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error))
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        transaction_type,
        date: row.get(4)?,
        category_id: row.get(5)?,
        user_id: UserID::new(row.get(6)?),
        created_at: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
