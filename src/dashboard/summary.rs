//! Combines the aggregation functions into the summary shown on the dashboard.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    category::{Category, CategoryColor, CategoryIcon, CategoryKind, CategoryName},
    dashboard::aggregation::{
        MonthlyTotal, Totals, group_by_category, monthly_rollup, totals_by_type,
    },
    database_id::CategoryId,
    transaction::Transaction,
};

/// How many months the summary covers when the caller does not say.
pub const DEFAULT_SUMMARY_MONTHS: usize = 6;

/// One row of a category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// The category the row is for.
    pub category_id: CategoryId,
    /// The category's name.
    pub name: CategoryName,
    /// The category's display colour.
    pub color: CategoryColor,
    /// The category's icon.
    pub icon: CategoryIcon,
    /// Sum of the transactions in the category.
    pub total: f64,
    /// Share of the total of every category of the same kind, 0 to 100.
    pub percentage: f64,
}

/// Everything the dashboard shows about a user's transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Income and expense over every transaction.
    pub totals: Totals,
    /// `totals.income - totals.expense`.
    pub balance: f64,
    /// Oldest month first.
    pub monthly: Vec<MonthlyTotal>,
    /// Expense categories with transactions, largest total first.
    pub expense_breakdown: Vec<CategoryBreakdown>,
    /// Income categories with transactions, largest total first.
    pub income_breakdown: Vec<CategoryBreakdown>,
}

/// Summarize `transactions` over the `month_count` months ending at `reference_date`.
///
/// Totals, balance and breakdowns cover every transaction, not just the
/// months in the rollup.
pub fn summarize(
    transactions: &[Transaction],
    categories: &[Category],
    month_count: usize,
    reference_date: Date,
) -> Summary {
    let totals = totals_by_type(transactions);
    let groups = group_by_category(transactions, categories);

    let breakdown = |kind: CategoryKind| {
        let mut rows: Vec<CategoryBreakdown> = categories
            .iter()
            .filter(|category| category.kind == kind)
            .filter_map(|category| {
                groups.get(&category.id).map(|group| CategoryBreakdown {
                    category_id: category.id,
                    name: category.name.clone(),
                    color: category.color.clone(),
                    icon: category.icon,
                    total: group.total,
                    percentage: group.percentage,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.total.total_cmp(&a.total));
        rows
    };

    Summary {
        totals,
        balance: totals.balance(),
        monthly: monthly_rollup(transactions, month_count, reference_date),
        expense_breakdown: breakdown(CategoryKind::Expense),
        income_breakdown: breakdown(CategoryKind::Income),
    }
}
