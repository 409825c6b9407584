//! Turns a [CategoryIcon] into something a user interface can draw.

use crate::category::CategoryIcon;

/// Maps every category icon to a renderable value.
///
/// Implementations use an exhaustive `match` so that adding an icon variant
/// fails to compile until every provider handles it.
pub trait IconProvider {
    /// The renderable form of an icon, e.g. an icon font name.
    type Output;

    /// Render `icon`.
    fn render(&self, icon: CategoryIcon) -> Self::Output;
}

/// Names from the lucide icon set, e.g. "graduation-cap".
#[derive(Debug, Clone, Copy, Default)]
pub struct LucideIcons;

impl IconProvider for LucideIcons {
    type Output = &'static str;

    fn render(&self, icon: CategoryIcon) -> Self::Output {
        match icon {
            CategoryIcon::Utensils => "utensils",
            CategoryIcon::Car => "car",
            CategoryIcon::Gamepad2 => "gamepad-2",
            CategoryIcon::Lightbulb => "lightbulb",
            CategoryIcon::Home => "house",
            CategoryIcon::Shirt => "shirt",
            CategoryIcon::Heart => "heart",
            CategoryIcon::GraduationCap => "graduation-cap",
            CategoryIcon::ShoppingBag => "shopping-bag",
            CategoryIcon::CircleDollarSign => "circle-dollar-sign",
            CategoryIcon::Briefcase => "briefcase",
            CategoryIcon::Laptop => "laptop",
            CategoryIcon::TrendingUp => "trending-up",
            CategoryIcon::Gift => "gift",
            CategoryIcon::HelpCircle => "circle-help",
            CategoryIcon::User => "user",
            CategoryIcon::Users => "users",
        }
    }
}

/// Emoji for plain text output such as terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiIcons;

impl IconProvider for EmojiIcons {
    type Output = &'static str;

    fn render(&self, icon: CategoryIcon) -> Self::Output {
        match icon {
            CategoryIcon::Utensils => "🍴",
            CategoryIcon::Car => "🚗",
            CategoryIcon::Gamepad2 => "🎮",
            CategoryIcon::Lightbulb => "💡",
            CategoryIcon::Home => "🏠",
            CategoryIcon::Shirt => "👕",
            CategoryIcon::Heart => "❤️",
            CategoryIcon::GraduationCap => "🎓",
            CategoryIcon::ShoppingBag => "🛍️",
            CategoryIcon::CircleDollarSign => "💲",
            CategoryIcon::Briefcase => "💼",
            CategoryIcon::Laptop => "💻",
            CategoryIcon::TrendingUp => "📈",
            CategoryIcon::Gift => "🎁",
            CategoryIcon::HelpCircle => "❓",
            CategoryIcon::User => "👤",
            CategoryIcon::Users => "👥",
        }
    }
}
