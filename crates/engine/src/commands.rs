//! Command structs for engine operations.
//!
//! These types group parameters for write operations (posting, account and
//! category creation), keeping call sites readable and avoiding long argument
//! lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{AccountKind, CategoryKind, Currency, DebtKind, TransactionKind};

/// A transaction intent handed to the posting engine.
///
/// `amount_minor` is always a positive magnitude; the settlement rules derive
/// the signed deltas from `kind` and `debt_kind`.
#[derive(Clone, Debug)]
pub struct PostingCmd {
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub currency: Currency,
    pub category_id: Option<Uuid>,
    pub account_id: Uuid,
    pub account_to_id: Option<Uuid>,
    pub description: Option<String>,
    pub place: Option<String>,
    pub person: Option<String>,
    pub comment: Option<String>,
    pub debt_kind: Option<DebtKind>,
    pub occurred_at: DateTime<Utc>,
}

impl PostingCmd {
    #[must_use]
    pub fn new(
        kind: TransactionKind,
        account_id: Uuid,
        amount_minor: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            amount_minor,
            currency: Currency::default(),
            category_id: None,
            account_id,
            account_to_id: None,
            description: None,
            place: None,
            person: None,
            comment: None,
            debt_kind: None,
            occurred_at,
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn account_to_id(mut self, account_to_id: Uuid) -> Self {
        self.account_to_id = Some(account_to_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    #[must_use]
    pub fn person(mut self, person: impl Into<String>) -> Self {
        self.person = Some(person.into());
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn debt_kind(mut self, debt_kind: DebtKind) -> Self {
        self.debt_kind = Some(debt_kind);
        self
    }
}

/// Create a regular account.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    /// Opening balance; defaults to 0.
    pub balance_minor: i64,
    pub currency: Currency,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl NewAccount {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            name: name.into(),
            kind,
            balance_minor: 0,
            currency: Currency::default(),
            color: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn balance_minor(mut self, balance_minor: i64) -> Self {
        self.balance_minor = balance_minor;
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Create a category.
#[derive(Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub kind: CategoryKind,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub parent_id: Option<Uuid>,
}

impl NewCategory {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            icon: None,
            color: None,
            parent_id: None,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn parent_id(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Partial update of a category; `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub kind: Option<CategoryKind>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub parent_id: Option<Uuid>,
}
