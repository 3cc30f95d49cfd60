//! Transaction primitives.
//!
//! A `Transaction` is the durable record of a balance mutation that has
//! already been applied; there is no pending state.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
    Debt,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
            Self::Debt => "debt",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            "debt" => Ok(Self::Debt),
            other => Err(EngineError::InvalidRequest(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// The four directions a debt transaction can take, from the user's point of
/// view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    /// The user lent money to the person.
    IGave,
    /// The user paid money back to the person.
    IReturned,
    /// The person lent money to the user.
    TheyGave,
    /// The person paid money back to the user.
    TheyReturned,
}

impl DebtKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IGave => "i_gave",
            Self::IReturned => "i_returned",
            Self::TheyGave => "they_gave",
            Self::TheyReturned => "they_returned",
        }
    }
}

impl TryFrom<&str> for DebtKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "i_gave" => Ok(Self::IGave),
            "i_returned" => Ok(Self::IReturned),
            "they_gave" => Ok(Self::TheyGave),
            "they_returned" => Ok(Self::TheyReturned),
            other => Err(EngineError::InvalidRequest(format!(
                "invalid debt kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    /// Positive magnitude; signs are derived from `kind`/`debt_kind`.
    pub amount_minor: i64,
    pub currency: Currency,
    pub category_id: Option<Uuid>,
    /// Primary/source account.
    pub account_id: Uuid,
    /// Transfer destination, or the resolved debt account.
    pub account_to_id: Option<Uuid>,
    pub description: Option<String>,
    pub place: Option<String>,
    pub person: Option<String>,
    pub comment: Option<String>,
    pub debt_kind: Option<DebtKind>,
    /// User-supplied date of the event.
    pub occurred_at: DateTime<Utc>,
    /// When the engine posted the record; distinct from `occurred_at`.
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub currency: String,
    pub category_id: Option<String>,
    pub account_id: String,
    pub account_to_id: Option<String>,
    pub description: Option<String>,
    pub place: Option<String>,
    pub person: Option<String>,
    pub comment: Option<String>,
    pub debt_kind: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            category_id: ActiveValue::Set(tx.category_id.map(|id| id.to_string())),
            account_id: ActiveValue::Set(tx.account_id.to_string()),
            account_to_id: ActiveValue::Set(tx.account_to_id.map(|id| id.to_string())),
            description: ActiveValue::Set(tx.description.clone()),
            place: ActiveValue::Set(tx.place.clone()),
            person: ActiveValue::Set(tx.person.clone()),
            comment: ActiveValue::Set(tx.comment.clone()),
            debt_kind: ActiveValue::Set(tx.debt_kind.map(|k| k.as_str().to_string())),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound(format!("transaction {}", model.id)))?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            category_id: model.category_id.and_then(|s| Uuid::parse_str(&s).ok()),
            account_id: Uuid::parse_str(&model.account_id)
                .map_err(|_| EngineError::NotFound(format!("account {}", model.account_id)))?,
            account_to_id: model.account_to_id.and_then(|s| Uuid::parse_str(&s).ok()),
            description: model.description,
            place: model.place,
            person: model.person,
            comment: model.comment,
            debt_kind: model
                .debt_kind
                .as_deref()
                .map(DebtKind::try_from)
                .transpose()?,
            occurred_at: model.occurred_at,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_kind_round_trips_through_storage_strings() {
        for kind in [
            DebtKind::IGave,
            DebtKind::IReturned,
            DebtKind::TheyGave,
            DebtKind::TheyReturned,
        ] {
            assert_eq!(DebtKind::try_from(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(TransactionKind::try_from("refund").is_err());
        assert!(DebtKind::try_from("i_borrowed").is_err());
    }
}
