use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Tjs,
    Rub,
    Usd,
    Kzt,
}

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountKind {
        Cash,
        Card,
        Bank,
        Savings,
        Debt,
    }

    /// Request body for `POST /accounts`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub kind: AccountKind,
        /// Opening balance in minor units; defaults to 0.
        pub balance_minor: Option<i64>,
        /// Defaults to TJS.
        pub currency: Option<Currency>,
        pub color: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub kind: AccountKind,
        pub balance_minor: i64,
        pub currency: Currency,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub is_debt: bool,
        pub is_hidden: bool,
        /// Counterparty name; set only on debt accounts.
        pub debt_person: Option<String>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryKind {
        Income,
        Expense,
    }

    /// Request body for `POST /categories`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
        pub icon: Option<String>,
        pub color: Option<String>,
        /// Parent category for one-level subcategories.
        pub parent_id: Option<Uuid>,
    }

    /// Request body for `PATCH /categories/{id}`; absent fields are kept.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryPatch {
        pub name: Option<String>,
        pub kind: Option<CategoryKind>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub parent_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: CategoryKind,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub parent_id: Option<Uuid>,
        pub is_default: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
        Transfer,
        Debt,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DebtKind {
        IGave,
        IReturned,
        TheyGave,
        TheyReturned,
    }

    /// Request body for `POST /transactions`.
    ///
    /// `amount_minor` is always a positive magnitude; the sign applied to each
    /// account balance is derived from `kind` (and `debt_kind`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub amount_minor: i64,
        /// Defaults to TJS.
        pub currency: Option<Currency>,
        /// Required for income/expense.
        pub category_id: Option<Uuid>,
        /// Source account.
        pub account_id: Uuid,
        /// Destination account; required for transfers.
        pub account_to_id: Option<Uuid>,
        pub description: Option<String>,
        pub place: Option<String>,
        /// Debt counterparty display name; required for debt.
        pub person: Option<String>,
        pub comment: Option<String>,
        /// Required for debt.
        pub debt_kind: Option<DebtKind>,
        /// User-supplied date; defaults to now.
        pub date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub currency: Currency,
        pub category_id: Option<Uuid>,
        pub account_id: Uuid,
        /// Transfer destination, or the resolved debt account.
        pub account_to_id: Option<Uuid>,
        pub description: Option<String>,
        pub place: Option<String>,
        pub person: Option<String>,
        pub comment: Option<String>,
        pub debt_kind: Option<DebtKind>,
        pub date: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod assistant {
    use super::*;

    /// Request body for `POST /ai/parse`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParseRequest {
        pub text: String,
        /// Account the parsed transactions are attached to; defaults to the
        /// first regular account.
        pub account_id: Option<Uuid>,
    }

    /// Response body for `POST /ai/parse`.
    ///
    /// Exactly one of the three shapes is populated: created transactions
    /// with a message, a clarification question, or a user-readable error.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParseResponse {
        pub success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub transactions: Option<Vec<transaction::TransactionView>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub needs_clarification: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub question: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub error: Option<String>,
    }
}
