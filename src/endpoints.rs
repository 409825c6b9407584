//! The API endpoints URIs.

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for checking the server and database are up.
pub const HEALTH: &str = "/api/health";
/// The route for registering a new user.
pub const USERS: &str = "/api/users";
/// The route to log in a user.
pub const LOG_IN: &str = "/api/log_in";
/// The route to log out a user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for listing and creating the user's categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route that tops up any default categories missing for the user.
pub const SEED: &str = "/api/seed";
/// The route that removes unused categories and restores the defaults.
pub const CATEGORIES_RESET: &str = "/api/categories/reset";
/// The route for listing and creating the user's transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the aggregated totals, monthly trend and category breakdowns.
pub const SUMMARY: &str = "/api/summary";
/// The route for the calendar heatmap of a single month.
pub const ACTIVITY: &str = "/api/activity";
