//! The categories every user starts with.

use crate::category::{CategoryColor, CategoryIcon, CategoryKind, CategoryName, NewCategory};

/// A category the reconciler creates for every user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultCategory {
    /// The canonical name, used to detect whether the user already has it.
    pub name: &'static str,
    /// `#RRGGBB` display colour.
    pub color: &'static str,
    /// Display icon.
    pub icon: CategoryIcon,
    /// Which transaction type the category accepts.
    pub kind: CategoryKind,
}

impl DefaultCategory {
    /// The category to insert for a user that is missing this default.
    pub fn to_new_category(&self) -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked(self.name),
            color: CategoryColor::new_unchecked(self.color),
            icon: self.icon,
            kind: self.kind,
        }
    }
}

const fn expense(name: &'static str, color: &'static str, icon: CategoryIcon) -> DefaultCategory {
    DefaultCategory {
        name,
        color,
        icon,
        kind: CategoryKind::Expense,
    }
}

const fn income(name: &'static str, color: &'static str, icon: CategoryIcon) -> DefaultCategory {
    DefaultCategory {
        name,
        color,
        icon,
        kind: CategoryKind::Income,
    }
}

/// Ten expense and three income categories.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 13] = [
    expense("Moradia", "#118AB2", CategoryIcon::Home),
    expense("Alimentação", "#FF6B6B", CategoryIcon::Utensils),
    expense("Transporte", "#4ECDC4", CategoryIcon::Car),
    expense("Saúde", "#FF9A8B", CategoryIcon::Heart),
    expense("Educação", "#A78BFA", CategoryIcon::GraduationCap),
    expense("Lazer", "#FFD166", CategoryIcon::Gamepad2),
    expense("Despesas Pessoais", "#F472B6", CategoryIcon::User),
    expense("Finanças", "#06D6A0", CategoryIcon::CircleDollarSign),
    expense("Dependentes", "#38BDF8", CategoryIcon::Users),
    expense("Outros", "#94A3B8", CategoryIcon::HelpCircle),
    income("Salário", "#4CAF50", CategoryIcon::Briefcase),
    income("Freelance", "#2196F3", CategoryIcon::Laptop),
    income("Investimentos", "#FFC107", CategoryIcon::TrendingUp),
];
