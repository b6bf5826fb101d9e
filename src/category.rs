//! The fixed set of categories that transactions can be filed under.

use crate::transaction::TransactionType;

/// A category that a transaction can belong to, e.g. "Groceries".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// The key stored on transactions, e.g. "groceries".
    pub id: &'static str,
    /// The name shown to the user.
    pub name: &'static str,
    /// Whether the category is for income or expenses.
    pub transaction_type: TransactionType,
    /// The badge colour as a CSS hex colour.
    pub color: &'static str,
}

const fn income(id: &'static str, name: &'static str, color: &'static str) -> Category {
    Category {
        id,
        name,
        transaction_type: TransactionType::Income,
        color,
    }
}

const fn expense(id: &'static str, name: &'static str, color: &'static str) -> Category {
    Category {
        id,
        name,
        transaction_type: TransactionType::Expense,
        color,
    }
}

/// The categories available to every user.
pub const DEFAULT_CATEGORIES: &[Category] = &[
    income("salary", "Salary", "#22c55e"),
    income("freelance", "Freelance", "#06b6d4"),
    income("investments", "Investments", "#6366f1"),
    income("business", "Business", "#ec4899"),
    income("rental", "Rental", "#f59e0b"),
    income("other-income", "Other Income", "#64748b"),
    expense("housing", "Housing", "#ef4444"),
    expense("transportation", "Transportation", "#f97316"),
    expense("groceries", "Groceries", "#84cc16"),
    expense("utilities", "Utilities", "#06b6d4"),
    expense("entertainment", "Entertainment", "#8b5cf6"),
    expense("food", "Food", "#f43f5e"),
    expense("shopping", "Shopping", "#ec4899"),
    expense("healthcare", "Healthcare", "#14b8a6"),
    expense("education", "Education", "#6366f1"),
    expense("personal", "Personal Care", "#d946ef"),
    expense("travel", "Travel", "#0ea5e9"),
    expense("insurance", "Insurance", "#64748b"),
    expense("gifts", "Gifts & Donations", "#f472b6"),
    expense("bills", "Bills & Fees", "#fb7185"),
    expense("other-expense", "Other Expenses", "#94a3b8"),
];

/// The badge colour for categories that are not in [DEFAULT_CATEGORIES].
pub const UNKNOWN_CATEGORY_COLOR: &str = "#9ca3af";

/// Find the category with the key `id`.
pub fn get_category(id: &str) -> Option<&'static Category> {
    DEFAULT_CATEGORIES.iter().find(|category| category.id == id)
}

/// The badge colour for the category `id`.
pub fn category_color(id: &str) -> &'static str {
    get_category(id)
        .map(|category| category.color)
        .unwrap_or(UNKNOWN_CATEGORY_COLOR)
}

/// The categories for one type of transaction, in display order.
pub fn categories_for(transaction_type: TransactionType) -> impl Iterator<Item = &'static Category> {
    DEFAULT_CATEGORIES
        .iter()
        .filter(move |category| category.transaction_type == transaction_type)
}
