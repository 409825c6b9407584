//! Gives every user the default categories.
//!
//! The reconciler compares a user's categories against [DEFAULT_CATEGORIES]
//! by name and creates the missing ones. It is safe to run any number of
//! times, including concurrently for the same user: inserts are conditional
//! on the `(user_id, name)` unique constraint, so a lost race is a no-op.

use std::collections::HashSet;

use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    category::{
        Category, DEFAULT_CATEGORIES, create_category_if_missing, delete_unreferenced_categories,
        get_categories_by_user,
    },
};

/// Create the default categories that `user_id` is missing.
///
/// Returns every category of the user, old and new, ordered by name.
/// Categories the user created are never modified or deleted.
///
/// # Errors
///
/// Returns [Error::SqlError] if the store fails. Categories inserted before
/// the failure are kept and the next call picks up where this one stopped.
pub fn reconcile(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    let existing_names: HashSet<String> = get_categories_by_user(user_id, connection)?
        .into_iter()
        .map(|category| category.name.to_string())
        .collect();

    let mut created = 0;
    for default in DEFAULT_CATEGORIES
        .iter()
        .filter(|default| !existing_names.contains(default.name))
    {
        if create_category_if_missing(&default.to_new_category(), user_id, connection)? {
            created += 1;
        }
    }

    if created > 0 {
        tracing::info!("Created {created} default categories for user {user_id}");
    }

    get_categories_by_user(user_id, connection)
}

/// Run [reconcile] and log, rather than return, any error.
///
/// Used after log-in and registration where a seeding failure must not stop
/// the user from getting in.
pub fn reconcile_or_log(user_id: UserID, connection: &Connection) {
    if let Err(error) = reconcile(user_id, connection) {
        tracing::error!("Could not create default categories for user {user_id}: {error}");
    }
}

/// Delete the categories of `user_id` that no transaction uses and then
/// create the missing defaults, all in one database transaction.
///
/// Categories that have transactions survive unchanged.
pub fn reset_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    let transaction = connection.unchecked_transaction()?;

    let deleted = delete_unreferenced_categories(user_id, &transaction)?;
    let categories = reconcile(user_id, &transaction)?;

    transaction.commit()?;
    tracing::info!("Reset categories for user {user_id}, removed {deleted} unused categories");

    Ok(categories)
}
