//! Route handlers for listing, creating and seeding categories.

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

use crate::{
    AppState, Error,
    auth::UserID,
    category::{
        Category, CategoryColor, CategoryIcon, CategoryKind, CategoryName, NewCategory,
        create_category, get_categories_by_user, reconcile, reset_categories,
    },
    db::lock,
    extract::ApiJson,
};

/// The state needed to read and write categories.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a request to create a category.
///
/// Every field is optional here so that a missing field is reported by name.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub kind: Option<String>,
}

impl CategoryRequest {
    fn validate(self) -> Result<NewCategory, Error> {
        let name = required("name", self.name)?;
        let name = CategoryName::new(&name)
            .map_err(|error| Error::validation("name", error.to_string()))?;

        let color = required("color", self.color)?;
        let color = CategoryColor::new(&color)
            .map_err(|error| Error::validation("color", error.to_string()))?;

        let icon = CategoryIcon::from_str(&required("icon", self.icon)?)?;
        let kind = CategoryKind::from_str(&required("kind", self.kind)?)?;

        Ok(NewCategory {
            name,
            color,
            icon,
            kind,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, Error> {
    value.ok_or_else(|| Error::validation(field, format!("{field} is required")))
}

/// Route handler that lists the caller's categories ordered by name.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock(&state.db_connection)?;

    get_categories_by_user(user_id, &connection).map(Json)
}

/// Route handler that creates a custom category for the caller.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(request): ApiJson<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let new_category = request.validate().inspect_err(|error| {
        tracing::warn!("Rejected category for user {user_id}: {error}");
    })?;

    let connection = lock(&state.db_connection)?;
    let category = create_category(new_category, user_id, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Route handler that creates any missing default categories for the caller
/// and returns all of their categories.
pub async fn seed_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock(&state.db_connection)?;

    reconcile(user_id, &connection).map(Json)
}

/// Route handler that removes the caller's unused categories and restores
/// the defaults.
pub async fn reset_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock(&state.db_connection)?;

    reset_categories(user_id, &connection).map(Json)
}
