//! Per-user categories, the defaults every user gets, and how they are drawn.

mod db;
mod defaults;
mod domain;
mod endpoints;
mod icon;
mod seed;

pub(crate) use db::map_row_with_offset;
pub use db::{
    count_categories, create_category, create_category_if_missing, create_category_table,
    delete_unreferenced_categories, get_categories_by_user, get_category,
};
pub use defaults::{DEFAULT_CATEGORIES, DefaultCategory};
pub use domain::{Category, CategoryColor, CategoryIcon, CategoryKind, CategoryName, NewCategory};
pub use endpoints::{
    create_category_endpoint, get_categories_endpoint, reset_categories_endpoint,
    seed_categories_endpoint,
};
pub use icon::{EmojiIcons, IconProvider, LucideIcons};
pub use seed::{reconcile, reconcile_or_log, reset_categories};

pub use crate::database_id::CategoryId;
