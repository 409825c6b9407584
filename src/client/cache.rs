//! The in-memory mirror of a user's transactions and categories.

use time::{Date, Month};

use crate::{
    category::{Category, CategoryKind},
    client::{FinanceApi, SyncError},
    dashboard::{
        Summary,
        aggregation::{DayActivity, daily_activity},
        summarize,
    },
    transaction::{NewTransaction, Transaction, TransactionWithCategory},
};

/// A message for the user about the outcome of the last cache operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The operation worked.
    Success(String),
    /// The operation failed and the cache was left as it was.
    Error(String),
}

/// Holds the logged in user's transactions and categories.
///
/// Writes made from other sessions are not seen until [TransactionCache::refresh]
/// is called. Nothing is retried: a failed call leaves the cache as it was and
/// records a [Notice::Error].
#[derive(Debug)]
pub struct TransactionCache<A> {
    api: A,
    transactions: Vec<TransactionWithCategory>,
    categories: Vec<Category>,
    loaded: bool,
    notice: Option<Notice>,
}

impl<A: FinanceApi> TransactionCache<A> {
    /// Create an empty cache that fetches through `api`.
    pub fn new(api: A) -> Self {
        Self {
            api,
            transactions: Vec::new(),
            categories: Vec::new(),
            loaded: false,
            notice: None,
        }
    }

    /// Log in through the underlying API, then [TransactionCache::load].
    ///
    /// # Errors
    /// Returns an error if logging in or loading failed.
    pub async fn log_in(&mut self, email: &str, password: &str) -> Result<(), SyncError> {
        if let Err(error) = self.api.log_in(email, password).await {
            self.notice = Some(Notice::Error(format!("Could not log in: {error}")));
            return Err(error);
        }

        self.load().await
    }

    /// Fetch the user's transactions and categories, replacing the cached ones.
    ///
    /// Call once after logging in.
    ///
    /// # Errors
    /// Returns the first failed fetch. The previously cached data is kept.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        let fetched = async {
            let transactions = self.api.fetch_transactions().await?;
            let categories = self.api.fetch_categories().await?;
            Ok::<_, SyncError>((transactions, categories))
        }
        .await;

        match fetched {
            Ok((transactions, categories)) => {
                tracing::debug!(
                    "Loaded {} transactions and {} categories",
                    transactions.len(),
                    categories.len()
                );
                self.transactions = transactions;
                self.categories = categories;
                self.loaded = true;
                Ok(())
            }
            Err(error) => {
                tracing::error!("Could not load transactions: {error}");
                self.notice = Some(Notice::Error(format!(
                    "Could not load your transactions: {error}"
                )));
                Err(error)
            }
        }
    }

    /// Reload everything from the server. Same as [TransactionCache::load].
    ///
    /// # Errors
    /// Returns the first failed fetch. The previously cached data is kept.
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        self.load().await
    }

    /// Save `transaction` and append the record the server returns.
    ///
    /// # Errors
    /// Returns the error from the server. The cache is left unchanged.
    pub async fn add(
        &mut self,
        transaction: NewTransaction,
    ) -> Result<&TransactionWithCategory, SyncError> {
        match self.api.create_transaction(&transaction).await {
            Ok(created) => {
                self.notice = Some(Notice::Success(format!(
                    "Added \"{}\"",
                    created.transaction.description
                )));
                self.transactions.push(created);
                Ok(&self.transactions[self.transactions.len() - 1])
            }
            Err(error) => {
                tracing::error!("Could not add transaction: {error}");
                self.notice = Some(Notice::Error(format!(
                    "Could not add the transaction: {error}"
                )));
                Err(error)
            }
        }
    }

    /// The cached transactions, in the order they were received.
    pub fn transactions(&self) -> &[TransactionWithCategory] {
        &self.transactions
    }

    /// The cached categories.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The cached categories that expenses may use.
    pub fn expense_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories_of_kind(CategoryKind::Expense)
    }

    /// The cached categories that income may use.
    pub fn income_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories_of_kind(CategoryKind::Income)
    }

    fn categories_of_kind(&self, kind: CategoryKind) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(move |category| category.kind == kind)
    }

    /// Whether a load has succeeded since the cache was created.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Take the pending notice, if any, so it is only shown once.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn snapshot(&self) -> Vec<Transaction> {
        self.transactions
            .iter()
            .map(|with_category| with_category.transaction.clone())
            .collect()
    }

    /// Summarize the cached transactions over the `month_count` months ending
    /// at `reference_date`.
    pub fn summary(&self, month_count: usize, reference_date: Date) -> Summary {
        summarize(
            &self.snapshot(),
            &self.categories,
            month_count,
            reference_date,
        )
    }

    /// The heatmap of the cached transactions for one month.
    pub fn activity(&self, month: Month, year: i32) -> Vec<DayActivity> {
        daily_activity(&self.snapshot(), month, year)
    }
}
