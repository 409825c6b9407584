//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID, database_id::CategoryId};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyName] if `name` is empty or just whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A display colour in the `#RRGGBB` hex format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryColor(String);

impl CategoryColor {
    /// Parse a `#RRGGBB` colour. Hex digits are stored upper case.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidColor] for anything else, including the short `#RGB` form.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();
        let is_hex = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());

        if is_hex {
            Ok(Self(color.to_ascii_uppercase()))
        } else {
            Err(Error::InvalidColor(color.to_owned()))
        }
    }

    /// Create a colour without validation.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_string())
    }
}

impl AsRef<str> for CategoryColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether a category groups money going out or money coming in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryKind {
    /// Spending, e.g. rent or groceries.
    Expense,
    /// Earnings, e.g. a salary.
    Income,
}

impl CategoryKind {
    /// The value stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "EXPENSE",
            CategoryKind::Income => "INCOME",
        }
    }
}

impl FromStr for CategoryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXPENSE" => Ok(CategoryKind::Expense),
            "INCOME" => Ok(CategoryKind::Income),
            other => Err(Error::validation(
                "kind",
                format!("\"{other}\" is not one of EXPENSE or INCOME"),
            )),
        }
    }
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryKind::Expense => write!(f, "expense"),
            CategoryKind::Income => write!(f, "income"),
        }
    }
}

/// The icons a category can be drawn with.
///
/// The variant names are the wire and storage format.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum CategoryIcon {
    Utensils,
    Car,
    Gamepad2,
    Lightbulb,
    Home,
    Shirt,
    Heart,
    GraduationCap,
    ShoppingBag,
    CircleDollarSign,
    Briefcase,
    Laptop,
    TrendingUp,
    Gift,
    HelpCircle,
    User,
    Users,
}

impl CategoryIcon {
    /// Every icon, in declaration order.
    pub const ALL: [CategoryIcon; 17] = [
        CategoryIcon::Utensils,
        CategoryIcon::Car,
        CategoryIcon::Gamepad2,
        CategoryIcon::Lightbulb,
        CategoryIcon::Home,
        CategoryIcon::Shirt,
        CategoryIcon::Heart,
        CategoryIcon::GraduationCap,
        CategoryIcon::ShoppingBag,
        CategoryIcon::CircleDollarSign,
        CategoryIcon::Briefcase,
        CategoryIcon::Laptop,
        CategoryIcon::TrendingUp,
        CategoryIcon::Gift,
        CategoryIcon::HelpCircle,
        CategoryIcon::User,
        CategoryIcon::Users,
    ];

    /// The variant name, e.g. "GraduationCap".
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryIcon::Utensils => "Utensils",
            CategoryIcon::Car => "Car",
            CategoryIcon::Gamepad2 => "Gamepad2",
            CategoryIcon::Lightbulb => "Lightbulb",
            CategoryIcon::Home => "Home",
            CategoryIcon::Shirt => "Shirt",
            CategoryIcon::Heart => "Heart",
            CategoryIcon::GraduationCap => "GraduationCap",
            CategoryIcon::ShoppingBag => "ShoppingBag",
            CategoryIcon::CircleDollarSign => "CircleDollarSign",
            CategoryIcon::Briefcase => "Briefcase",
            CategoryIcon::Laptop => "Laptop",
            CategoryIcon::TrendingUp => "TrendingUp",
            CategoryIcon::Gift => "Gift",
            CategoryIcon::HelpCircle => "HelpCircle",
            CategoryIcon::User => "User",
            CategoryIcon::Users => "Users",
        }
    }
}

impl FromStr for CategoryIcon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryIcon::ALL
            .into_iter()
            .find(|icon| icon.as_str() == s)
            .ok_or_else(|| Error::validation("icon", format!("\"{s}\" is not a known icon")))
    }
}

/// A user's category for grouping transactions, e.g. 'Moradia' or 'Salário'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The category's ID in the application database.
    pub id: CategoryId,
    /// Unique among the categories of `user_id`.
    pub name: CategoryName,
    /// Display hint, e.g. "#FF6B6B".
    pub color: CategoryColor,
    /// Display hint.
    pub icon: CategoryIcon,
    /// Which type of transaction may use this category.
    pub kind: CategoryKind,
    /// The user that owns the category.
    pub user_id: UserID,
}

/// The fields of a category that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub color: CategoryColor,
    pub icon: CategoryIcon,
    pub kind: CategoryKind,
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CategoryName::new(""), Err(Error::EmptyName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(CategoryName::new("\n\t \r"), Err(Error::EmptyName));
    }

    #[test]
    fn new_trims_whitespace() {
        assert_eq!(
            CategoryName::new("  Mercado "),
            Ok(CategoryName::new_unchecked("Mercado"))
        );
    }
}
