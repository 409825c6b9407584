//! The calls the cache makes to the server.

use std::future::Future;

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

use crate::{
    category::Category,
    client::SyncError,
    endpoints,
    transaction::{NewTransaction, TransactionWithCategory},
};

/// The remote store of a user's transactions and categories.
pub trait FinanceApi {
    /// Start a session for `email`.
    fn log_in(&self, email: &str, password: &str)
    -> impl Future<Output = Result<(), SyncError>> + Send;

    /// All of the user's transactions, newest first.
    fn fetch_transactions(
        &self,
    ) -> impl Future<Output = Result<Vec<TransactionWithCategory>, SyncError>> + Send;

    /// All of the user's categories, ordered by name.
    fn fetch_categories(&self) -> impl Future<Output = Result<Vec<Category>, SyncError>> + Send;

    /// Save `transaction` and return the stored record.
    fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> impl Future<Output = Result<TransactionWithCategory, SyncError>> + Send;
}

/// A [FinanceApi] that talks to the JSON API over HTTP.
///
/// The auth cookie from [FinanceApi::log_in] is kept and sent with every
/// later request.
#[derive(Debug, Clone)]
pub struct HttpFinanceApi {
    client: Client,
    base_url: String,
}

impl HttpFinanceApi {
    /// Create a client for the server at `base_url`, e.g. "http://localhost:3000".
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, SyncError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

/// Turn non-success responses into a [SyncError].
async fn check_status(response: Response) -> Result<Response, SyncError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(SyncError::Unauthenticated);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body["error"].as_str().map(str::to_owned))
        .unwrap_or_else(|| status.to_string());

    tracing::warn!("Request failed with {status}: {message}");

    Err(SyncError::Server {
        status: status.as_u16(),
        message,
    })
}

impl FinanceApi for HttpFinanceApi {
    async fn log_in(&self, email: &str, password: &str) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.url(endpoints::LOG_IN))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    async fn fetch_transactions(&self) -> Result<Vec<TransactionWithCategory>, SyncError> {
        let response = self
            .client
            .get(self.url(endpoints::TRANSACTIONS))
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, SyncError> {
        let response = self
            .client
            .get(self.url(endpoints::CATEGORIES))
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<TransactionWithCategory, SyncError> {
        let response = self
            .client
            .post(self.url(endpoints::TRANSACTIONS))
            .json(transaction)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}
