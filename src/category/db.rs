//! Database operations for categories.

use std::str::FromStr;

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryColor, CategoryIcon, CategoryKind, CategoryName, NewCategory},
    database_id::CategoryId,
};

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            icon TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('EXPENSE', 'INCOME')),
            user_id INTEGER NOT NULL,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if the user already has a category
/// with the same name.
pub fn create_category(
    category: NewCategory,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (name, color, icon, kind, user_id) VALUES (?1, ?2, ?3, ?4, ?5);",
        (
            category.name.as_ref(),
            category.color.as_ref(),
            category.icon.as_str(),
            category.kind.as_str(),
            user_id.as_i64(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name: category.name,
        color: category.color,
        icon: category.icon,
        kind: category.kind,
        user_id,
    })
}

/// Insert `category` for `user_id` unless the user already has one with the
/// same name.
///
/// Returns whether a row was inserted. Losing a race against another insert
/// of the same name is not an error.
pub fn create_category_if_missing(
    category: &NewCategory,
    user_id: UserID,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "INSERT INTO category (name, color, icon, kind, user_id) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id, name) DO NOTHING;",
        (
            category.name.as_ref(),
            category.color.as_ref(),
            category.icon.as_str(),
            category.kind.as_str(),
            user_id.as_i64(),
        ),
    )?;

    Ok(rows_affected > 0)
}

/// Retrieve the category `category_id` if it is owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the category does not exist or belongs
/// to another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, color, icon, kind, user_id FROM category
             WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
            error => error.into(),
        })
}

/// Retrieve the categories of `user_id` ordered alphabetically by name.
pub fn get_categories_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, color, icon, kind, user_id FROM category
             WHERE user_id = :user_id ORDER BY name ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete the categories of `user_id` that no transaction refers to.
///
/// Returns the number of deleted categories.
pub fn delete_unreferenced_categories(
    user_id: UserID,
    connection: &Connection,
) -> Result<usize, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category
         WHERE user_id = ?1
         AND NOT EXISTS (
            SELECT 1 FROM \"transaction\" t WHERE t.category_id = category.id
         );",
        (user_id.as_i64(),),
    )?;

    Ok(rows_affected)
}

/// Get the number of categories across all users.
pub fn count_categories(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM category;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Map a row of `id, name, color, icon, kind, user_id` starting at `offset`.
pub(crate) fn map_row_with_offset(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(offset + 1)?;
    let raw_color: String = row.get(offset + 2)?;
    let raw_icon: String = row.get(offset + 3)?;
    let raw_kind: String = row.get(offset + 4)?;

    let icon = CategoryIcon::from_str(&raw_icon).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(offset + 3, Type::Text, Box::new(error))
    })?;
    let kind = CategoryKind::from_str(&raw_kind).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(offset + 4, Type::Text, Box::new(error))
    })?;

    Ok(Category {
        id: row.get(offset)?,
        name: CategoryName::new_unchecked(&raw_name),
        color: CategoryColor::new_unchecked(&raw_color),
        icon,
        kind,
        user_id: UserID::new(row.get(offset + 5)?),
    })
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    map_row_with_offset(row, 0)
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::UserID,
        category::{
            CategoryColor, CategoryIcon, CategoryKind, CategoryName, NewCategory,
            create_category, get_categories_by_user, get_category,
        },
        test_utils::{create_test_user, get_test_connection},
    };

    use super::{count_categories, create_category_if_missing, delete_unreferenced_categories};

    fn mercado() -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked("Mercado"),
            color: CategoryColor::new_unchecked("#FF6B6B"),
            icon: CategoryIcon::ShoppingBag,
            kind: CategoryKind::Expense,
        }
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "ana@example.com");

        let category = create_category(mercado(), user.id, &connection).unwrap();

        assert!(category.id > 0);
        assert_eq!(category.name, CategoryName::new_unchecked("Mercado"));
        assert_eq!(category.user_id, user.id);
        assert_eq!(get_category(category.id, user.id, &connection), Ok(category));
    }

    #[test]
    fn create_duplicate_name_fails() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "ana@example.com");
        create_category(mercado(), user.id, &connection).unwrap();

        let result = create_category(mercado(), user.id, &connection);

        assert_eq!(result, Err(Error::DuplicateCategoryName));
    }

    #[test]
    fn same_name_for_different_users_succeeds() {
        let connection = get_test_connection();
        let ana = create_test_user(&connection, "ana@example.com");
        let bia = create_test_user(&connection, "bia@example.com");
        create_category(mercado(), ana.id, &connection).unwrap();

        let result = create_category(mercado(), bia.id, &connection);

        assert!(result.is_ok());
    }

    #[test]
    fn create_if_missing_skips_existing_name() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "ana@example.com");

        assert_eq!(
            create_category_if_missing(&mercado(), user.id, &connection),
            Ok(true)
        );
        assert_eq!(
            create_category_if_missing(&mercado(), user.id, &connection),
            Ok(false)
        );
        assert_eq!(count_categories(&connection), Ok(1));
    }

    #[test]
    fn get_category_of_other_user_fails() {
        let connection = get_test_connection();
        let ana = create_test_user(&connection, "ana@example.com");
        let bia = create_test_user(&connection, "bia@example.com");
        let category = create_category(mercado(), ana.id, &connection).unwrap();

        let result = get_category(category.id, bia.id, &connection);

        assert_eq!(result, Err(Error::CategoryNotFound));
    }

    #[test]
    fn get_categories_by_user_is_scoped_and_sorted() {
        let connection = get_test_connection();
        let ana = create_test_user(&connection, "ana@example.com");
        let bia = create_test_user(&connection, "bia@example.com");
        let mut zoo = mercado();
        zoo.name = CategoryName::new_unchecked("Zoológico");
        create_category(zoo, ana.id, &connection).unwrap();
        create_category(mercado(), ana.id, &connection).unwrap();
        create_category(mercado(), bia.id, &connection).unwrap();

        let names: Vec<String> = get_categories_by_user(ana.id, &connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();

        assert_eq!(names, vec!["Mercado", "Zoológico"]);
    }

    #[test]
    fn delete_unreferenced_keeps_other_users() {
        let connection = get_test_connection();
        let ana = create_test_user(&connection, "ana@example.com");
        let bia = create_test_user(&connection, "bia@example.com");
        create_category(mercado(), ana.id, &connection).unwrap();
        create_category(mercado(), bia.id, &connection).unwrap();

        let deleted = delete_unreferenced_categories(ana.id, &connection).unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(get_categories_by_user(ana.id, &connection), Ok(vec![]));
        assert_eq!(get_categories_by_user(bia.id, &connection).unwrap().len(), 1);
    }

    #[test]
    fn stored_unknown_icon_is_an_error() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "ana@example.com");
        connection
            .execute(
                "INSERT INTO category (name, color, icon, kind, user_id)
                 VALUES ('Foo', '#000000', 'Rocket', 'EXPENSE', ?1)",
                (user.id.as_i64(),),
            )
            .unwrap();

        let result = get_categories_by_user(user.id, &connection);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }
}
