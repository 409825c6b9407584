//! Summaries of a snapshot of transactions.
//!
//! Every function here is pure: it reads the slices it is given and nothing
//! else, so the same input always produces the same output. The server uses
//! them for the summary endpoints and the client cache runs them over its
//! local copy.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    category::{Category, CategoryKind},
    database_id::CategoryId,
    transaction::{Transaction, TransactionType},
};

/// Total income and expense of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of the income amounts.
    pub income: f64,
    /// Sum of the expense amounts.
    pub expense: f64,
}

impl Totals {
    /// Income minus expense.
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }

    fn add(&mut self, transaction_type: TransactionType, amount: f64) {
        match transaction_type {
            TransactionType::Income => self.income += amount,
            TransactionType::Expense => self.expense += amount,
        }
    }
}

/// The total of one category and its share of all transactions of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Sum of the transactions in the category.
    pub total: f64,
    /// `total` as a percentage (0 to 100) of the sum over every category of the same kind.
    pub percentage: f64,
}

/// Income, expense and balance for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// e.g. "Oct 2026".
    pub label: String,
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 for January.
    pub month: u8,
    /// Sum of the income in the month.
    pub income: f64,
    /// Sum of the expenses in the month.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// How many transactions fell on one day, and the heatmap level for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    /// Day of the month, starting at 1.
    pub day: u8,
    /// Number of transactions dated on this day.
    pub count: usize,
    /// 0 for no transactions, otherwise 1 to 4. See [activity_level].
    pub level: u8,
}

/// Sum the amounts of `transactions` by type.
///
/// An empty slice gives zero income and zero expense.
pub fn totals_by_type(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for transaction in transactions {
        totals.add(transaction.transaction_type, transaction.amount);
    }

    totals
}

/// Total income minus total expense.
pub fn balance(transactions: &[Transaction]) -> f64 {
    totals_by_type(transactions).balance()
}

/// Sum `transactions` per category.
///
/// Transactions whose category is not in `categories` are left out of every
/// total, including the totals the percentages are computed against.
pub fn group_by_category(
    transactions: &[Transaction],
    categories: &[Category],
) -> BTreeMap<CategoryId, CategoryTotal> {
    let kinds: HashMap<CategoryId, CategoryKind> = categories
        .iter()
        .map(|category| (category.id, category.kind))
        .collect();

    let mut sums: BTreeMap<CategoryId, f64> = BTreeMap::new();
    let mut kind_totals: HashMap<CategoryKind, f64> = HashMap::new();

    for transaction in transactions {
        let Some(kind) = kinds.get(&transaction.category_id) else {
            continue;
        };

        *sums.entry(transaction.category_id).or_insert(0.0) += transaction.amount;
        *kind_totals.entry(*kind).or_insert(0.0) += transaction.amount;
    }

    sums.into_iter()
        .map(|(category_id, total)| {
            let parent_total = kinds
                .get(&category_id)
                .and_then(|kind| kind_totals.get(kind))
                .copied()
                .unwrap_or(0.0);
            let percentage = if parent_total > 0.0 {
                total / parent_total * 100.0
            } else {
                0.0
            };

            (category_id, CategoryTotal { total, percentage })
        })
        .collect()
}

/// Totals for the `month_count` calendar months ending with the month of
/// `reference_date`, oldest first.
///
/// Returns `month_count` entries, or fewer when the window would reach back
/// before the first month [Date] can represent. Months without transactions
/// are all zero.
pub fn monthly_rollup(
    transactions: &[Transaction],
    month_count: usize,
    reference_date: Date,
) -> Vec<MonthlyTotal> {
    let reference_index = month_index(reference_date);
    let representable = (reference_index - month_index(Date::MIN) + 1) as usize;
    let month_count = month_count.min(representable);

    let months = (0..month_count).rev().map(|offset| {
        let index = reference_index - offset as i64;
        let month = Month::January.nth_next(index.rem_euclid(12) as u8);

        (index.div_euclid(12) as i32, month)
    });

    let mut totals: HashMap<(i32, Month), Totals> = HashMap::new();
    for transaction in transactions {
        let key = (transaction.date.year(), transaction.date.month());
        totals
            .entry(key)
            .or_default()
            .add(transaction.transaction_type, transaction.amount);
    }

    months
        .map(|(year, month)| {
            let month_totals = totals.get(&(year, month)).copied().unwrap_or_default();

            MonthlyTotal {
                label: format!("{} {year}", month_abbreviation(month)),
                year,
                month: month as u8,
                income: month_totals.income,
                expense: month_totals.expense,
                balance: month_totals.balance(),
            }
        })
        .collect()
}

/// Months since January of year 0, which is 0.
fn month_index(date: Date) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month() as u8) - 1
}

/// Count the transactions on each day of `month` in `year`.
///
/// Returns one entry per calendar day, in order, with the heatmap level
/// relative to the busiest day of the month.
pub fn daily_activity(transactions: &[Transaction], month: Month, year: i32) -> Vec<DayActivity> {
    let day_count = days_in_month(year, month);
    let mut counts = vec![0usize; day_count as usize];

    for transaction in transactions {
        if transaction.date.year() == year && transaction.date.month() == month {
            counts[transaction.date.day() as usize - 1] += 1;
        }
    }

    let max_count = counts.iter().copied().max().unwrap_or(0);

    counts
        .into_iter()
        .zip(1..=day_count)
        .map(|(count, day)| DayActivity {
            day,
            count,
            level: activity_level(count, max_count),
        })
        .collect()
}

/// The heatmap level of a day with `count` transactions when the busiest day
/// has `max_count`.
///
/// 0 if `count` is zero, otherwise `ceil(count / max_count * 4)` clamped to 1..=4.
pub fn activity_level(count: usize, max_count: usize) -> u8 {
    if count == 0 {
        return 0;
    }

    let max_count = max_count.max(count);
    let level = (4 * count).div_ceil(max_count);

    level.clamp(1, 4) as u8
}

fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February if time::util::is_leap_year(year) => 29,
        Month::February => 28,
    }
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
