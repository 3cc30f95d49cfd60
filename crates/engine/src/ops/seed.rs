//! One-time default data for an empty store.
//!
//! Seeding is an explicit bootstrap step, invoked once by the binary before
//! it starts serving requests. Each collection is guarded by a count query
//! inside the same storage transaction, so starting against a non-empty
//! store (or racing startups against the same database) never duplicates the
//! defaults.

use sea_orm::{ConnectionTrait, PaginatorTrait, TransactionTrait, prelude::*};

use crate::{
    Account, AccountKind, Category, CategoryKind, Currency, ResultEngine, accounts, categories,
};

use super::{Engine, with_tx};

const DEFAULT_ACCOUNTS: &[(&str, AccountKind, &str)] =
    &[("Cash", AccountKind::Cash, "💵"), ("Bank card", AccountKind::Card, "💳")];

const DEFAULT_CATEGORIES: &[(&str, CategoryKind, &str)] = &[
    ("Food", CategoryKind::Expense, "🍔"),
    ("Cafes & restaurants", CategoryKind::Expense, "☕"),
    ("Groceries", CategoryKind::Expense, "🛒"),
    ("Transport", CategoryKind::Expense, "🚗"),
    ("Taxi", CategoryKind::Expense, "🚕"),
    ("Fuel", CategoryKind::Expense, "⛽"),
    ("Entertainment", CategoryKind::Expense, "🎬"),
    ("Shopping", CategoryKind::Expense, "🛍️"),
    ("Health", CategoryKind::Expense, "💊"),
    ("Bills & services", CategoryKind::Expense, "📱"),
    ("Salary", CategoryKind::Income, "💰"),
    ("Bonus", CategoryKind::Income, "🎁"),
    ("Freelance", CategoryKind::Income, "💻"),
];

impl Engine {
    /// Seed default accounts and categories into an empty store.
    ///
    /// Safe to call on every startup: collections that already contain rows
    /// are left untouched.
    pub async fn seed_defaults(&self) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.seed_accounts(&db_tx).await?;
            self.seed_categories(&db_tx).await?;
            Ok(())
        })
    }

    async fn seed_accounts<C: ConnectionTrait>(&self, conn: &C) -> ResultEngine<()> {
        if accounts::Entity::find().count(conn).await? > 0 {
            return Ok(());
        }

        for (name, kind, icon) in DEFAULT_ACCOUNTS {
            let mut account = Account::new((*name).to_string(), *kind, 0, Currency::Tjs);
            account.icon = Some((*icon).to_string());
            accounts::ActiveModel::from(&account).insert(conn).await?;
        }

        tracing::info!(count = DEFAULT_ACCOUNTS.len(), "seeded default accounts");
        Ok(())
    }

    async fn seed_categories<C: ConnectionTrait>(&self, conn: &C) -> ResultEngine<()> {
        if categories::Entity::find().count(conn).await? > 0 {
            return Ok(());
        }

        for (name, kind, icon) in DEFAULT_CATEGORIES {
            let mut category = Category::new((*name).to_string(), *kind);
            category.icon = Some((*icon).to_string());
            category.is_default = true;
            categories::ActiveModel::from(&category).insert(conn).await?;
        }

        tracing::info!(
            count = DEFAULT_CATEGORIES.len(),
            "seeded default categories"
        );
        Ok(())
    }
}
