#![allow(missing_docs)]

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState,
    auth::{PasswordHash, User, ValidatedPassword, create_user},
    db::initialize,
    endpoints,
};

/// A password strong enough to pass registration.
pub(crate) const TEST_PASSWORD: &str = "violet kettle drums over 9 tall ferns";

/// SQL that makes every later insert into the category table fail.
pub(crate) const FAIL_CATEGORY_INSERT: &str = "
    CREATE TRIGGER fail_category_insert BEFORE INSERT ON category
    BEGIN
        SELECT RAISE(ABORT, 'storage down');
    END;";

/// The lowest bcrypt cost, keeps the auth tests fast.
const TEST_HASH_COST: u32 = 4;

/// An in-memory database with all tables created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    connection
}

/// Insert a user whose password hash is never checked.
pub(crate) fn create_test_user(connection: &Connection, email: &str) -> User {
    create_user(
        email,
        "Test",
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
}

pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    let mut state = AppState::new(connection, "42", "Etc/UTC")
        .expect("Could not create app state for tests.");
    state.password_hash_cost = TEST_HASH_COST;
    state
}

/// Insert a user that can log in with [TEST_PASSWORD].
pub(crate) fn insert_user_with_password(state: &AppState, email: &str) -> User {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        TEST_HASH_COST,
    )
    .expect("Could not hash test password");
    let connection = state.db_connection.lock().unwrap();

    create_user(email, "Test", password_hash, &connection).expect("Could not create test user")
}

/// Register `email` through the API and return the auth cookie from the response.
pub(crate) async fn register_and_get_cookie(server: &TestServer, email: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::USERS)
        .json(&json!({
            "name": "Test",
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.cookie(crate::auth::COOKIE_TOKEN)
}
