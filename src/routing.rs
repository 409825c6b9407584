//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    auth::{auth_guard, get_log_out, post_log_in, register_user},
    category::{
        create_category_endpoint, get_categories_endpoint, reset_categories_endpoint,
        seed_categories_endpoint,
    },
    dashboard::{get_activity_endpoint, get_summary_endpoint},
    endpoints,
    health::get_health,
    not_found::get_404_not_found,
    transaction::{create_transaction_endpoint, get_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::SEED,
            get(seed_categories_endpoint).post(seed_categories_endpoint),
        )
        .route(endpoints::CATEGORIES_RESET, post(reset_categories_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(endpoints::ACTIVITY, get(get_activity_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({ "error": "I'm a teapot" })),
    )
        .into_response()
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        build_router, endpoints,
        test_utils::{get_test_app_state, register_and_get_cookie},
    };

    fn get_test_server() -> TestServer {
        TestServer::try_new(build_router(get_test_app_state())).expect("Could not create test server.")
    }

    async fn category_id_by_name(
        server: &TestServer,
        cookie: &Cookie<'static>,
        name: &str,
    ) -> i64 {
        let categories: Vec<Value> = server
            .get(endpoints::CATEGORIES)
            .add_cookie(cookie.clone())
            .await
            .json();

        categories
            .iter()
            .find(|category| category["name"] == name)
            .and_then(|category| category["id"].as_i64())
            .unwrap_or_else(|| panic!("no category named {name}"))
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = get_test_server();

        server
            .get(endpoints::COFFEE)
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let server = get_test_server();

        let response = server.get("/api/does_not_exist").await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert!(body["error"].is_string(), "got body {body}");
    }

    #[tokio::test]
    async fn protected_routes_require_cookie() {
        let server = get_test_server();

        for endpoint in [
            endpoints::CATEGORIES,
            endpoints::SEED,
            endpoints::TRANSACTIONS,
            endpoints::SUMMARY,
            endpoints::ACTIVITY,
        ] {
            let response = server.get(endpoint).await;

            response.assert_status_unauthorized();
            let body: Value = response.json();
            assert!(body["error"].is_string(), "got body {body} for {endpoint}");
        }
    }

    #[tokio::test]
    async fn health_reports_counts() {
        let server = get_test_server();
        register_and_get_cookie(&server, "ana@example.com").await;

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["stats"]["users"], 1);
        assert_eq!(body["stats"]["categories"], 13);
        assert_eq!(body["stats"]["transactions"], 0);
    }

    #[tokio::test]
    async fn register_record_and_summarize() {
        let server = get_test_server();
        let cookie = register_and_get_cookie(&server, "ana@example.com").await;

        let categories: Vec<Value> = server
            .get(endpoints::CATEGORIES)
            .add_cookie(cookie.clone())
            .await
            .json();
        assert_eq!(categories.len(), 13);

        let food_id = category_id_by_name(&server, &cookie, "Alimentação").await;
        let salary_id = category_id_by_name(&server, &cookie, "Salário").await;

        server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({
                "description": "Groceries",
                "amount": 100,
                "type": "EXPENSE",
                "categoryId": food_id,
                "date": "2026-10-02"
            }))
            .await
            .assert_status(StatusCode::CREATED);
        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({
                "description": "October pay",
                "amount": 500,
                "type": "INCOME",
                "categoryId": salary_id,
                "date": "2026-10-01"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["category"]["name"], "Salário");

        let transactions: Vec<Value> = server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .await
            .json();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0]["description"], "Groceries");
        assert_eq!(transactions[0]["category"]["name"], "Alimentação");

        let response = server
            .get(endpoints::SUMMARY)
            .add_cookie(cookie.clone())
            .await;
        response.assert_status_ok();
        let summary: Value = response.json();
        assert_eq!(summary["totals"]["income"], 500.0);
        assert_eq!(summary["totals"]["expense"], 100.0);
        assert_eq!(summary["balance"], 400.0);
        assert_eq!(summary["monthly"].as_array().map(Vec::len), Some(6));
        assert_eq!(summary["expenseBreakdown"][0]["name"], "Alimentação");
        assert_eq!(summary["expenseBreakdown"][0]["percentage"], 100.0);
    }

    #[tokio::test]
    async fn non_numeric_amount_is_rejected_without_saving() {
        let server = get_test_server();
        let cookie = register_and_get_cookie(&server, "ana@example.com").await;
        let food_id = category_id_by_name(&server, &cookie, "Alimentação").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({
                "description": "Groceries",
                "amount": "abc",
                "type": "EXPENSE",
                "categoryId": food_id,
                "date": "2026-10-02"
            }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["field"], "amount");

        let transactions: Vec<Value> = server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .await
            .json();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn other_users_category_is_not_found() {
        let server = get_test_server();
        let ana = register_and_get_cookie(&server, "ana@example.com").await;
        let bia = register_and_get_cookie(&server, "bia@example.com").await;
        let bias_food_id = category_id_by_name(&server, &bia, "Alimentação").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(ana.clone())
            .json(&json!({
                "description": "Groceries",
                "amount": 10,
                "type": "EXPENSE",
                "categoryId": bias_food_id,
                "date": "2026-10-02"
            }))
            .await;

        response.assert_status_not_found();

        let transactions: Vec<Value> = server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(bia)
            .await
            .json();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn income_against_expense_category_is_rejected() {
        let server = get_test_server();
        let cookie = register_and_get_cookie(&server, "ana@example.com").await;
        let food_id = category_id_by_name(&server, &cookie, "Alimentação").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .json(&json!({
                "description": "Refund",
                "amount": 10,
                "type": "INCOME",
                "categoryId": food_id,
                "date": "2026-10-02"
            }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["field"], "type");
    }

    #[tokio::test]
    async fn seeding_twice_keeps_thirteen_categories() {
        let server = get_test_server();
        let cookie = register_and_get_cookie(&server, "ana@example.com").await;

        server
            .post(endpoints::SEED)
            .add_cookie(cookie.clone())
            .await
            .assert_status_ok();
        let categories: Vec<Value> = server
            .get(endpoints::SEED)
            .add_cookie(cookie)
            .await
            .json();

        assert_eq!(categories.len(), 13);
    }

    #[tokio::test]
    async fn custom_category_then_reset() {
        let server = get_test_server();
        let cookie = register_and_get_cookie(&server, "ana@example.com").await;

        let response = server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie.clone())
            .json(&json!({
                "name": "Pets",
                "color": "#123ABC",
                "icon": "Heart",
                "kind": "EXPENSE"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let duplicate = server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie.clone())
            .json(&json!({
                "name": "Pets",
                "color": "#123ABC",
                "icon": "Heart",
                "kind": "EXPENSE"
            }))
            .await;
        duplicate.assert_status_bad_request();

        let categories: Vec<Value> = server
            .post(endpoints::CATEGORIES_RESET)
            .add_cookie(cookie)
            .await
            .json();

        assert_eq!(categories.len(), 13);
        assert!(categories.iter().all(|category| category["name"] != "Pets"));
    }

    #[tokio::test]
    async fn activity_counts_days() {
        let server = get_test_server();
        let cookie = register_and_get_cookie(&server, "ana@example.com").await;
        let food_id = category_id_by_name(&server, &cookie, "Alimentação").await;

        for _ in 0..2 {
            server
                .post(endpoints::TRANSACTIONS)
                .add_cookie(cookie.clone())
                .json(&json!({
                    "description": "Coffee",
                    "amount": 5,
                    "type": "EXPENSE",
                    "categoryId": food_id,
                    "date": "2026-02-03"
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::ACTIVITY)
            .add_query_param("month", 2)
            .add_query_param("year", 2026)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let days = body["days"].as_array().unwrap();
        assert_eq!(days.len(), 28);
        assert_eq!(days[2]["count"], 2);
        assert_eq!(days[2]["level"], 4);
        assert_eq!(days[0]["level"], 0);
    }
}
