//! Recording income and expenses.

mod core;
mod endpoints;

pub use core::{
    NewTransaction, Transaction, TransactionType, TransactionWithCategory, count_transactions,
    create_transaction, create_transaction_table, get_transactions_by_user,
};
pub use endpoints::{create_transaction_endpoint, get_transactions_endpoint};

pub use crate::database_id::TransactionId;
