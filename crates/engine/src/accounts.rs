//! The module contains the `Account` struct and its storage entity.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

/// Where an account keeps its money.
///
/// `Debt` is special: such accounts are synthetic, created per counterparty
/// by the debt resolver, and their balance is the net amount that person owes
/// the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Cash,
    Card,
    Bank,
    Savings,
    Debt,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Bank => "bank",
            Self::Savings => "savings",
            Self::Debt => "debt",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "bank" => Ok(Self::Bank),
            "savings" => Ok(Self::Savings),
            "debt" => Ok(Self::Debt),
            other => Err(EngineError::InvalidRequest(format!(
                "invalid account kind: {other}"
            ))),
        }
    }
}

/// An account.
///
/// A representation of a real place money lives (wallet, bank card, savings)
/// or a per-person debt ledger. The balance accumulates over time and is only
/// mutated through the posting engine's atomic adjustment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub balance_minor: i64,
    pub currency: Currency,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_debt: bool,
    /// Soft-delete/archive flag; closed debts are hidden, not deleted.
    pub is_hidden: bool,
    /// Counterparty display name; acts as the natural key of debt accounts.
    pub debt_person: Option<String>,
}

impl Account {
    pub fn new(name: String, kind: AccountKind, balance_minor: i64, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            balance_minor,
            currency,
            color: None,
            icon: None,
            is_debt: false,
            is_hidden: false,
            debt_person: None,
        }
    }

    /// A fresh debt account for `person`, starting at zero.
    pub fn new_debt(person: String, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: person.clone(),
            kind: AccountKind::Debt,
            balance_minor: 0,
            currency,
            color: None,
            icon: Some("📝".to_string()),
            is_debt: true,
            is_hidden: false,
            debt_person: Some(person),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub kind: String,
    pub balance_minor: i64,
    pub currency: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_debt: bool,
    pub is_hidden: bool,
    pub debt_person: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            balance_minor: ActiveValue::Set(value.balance_minor),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            color: ActiveValue::Set(value.color.clone()),
            icon: ActiveValue::Set(value.icon.clone()),
            is_debt: ActiveValue::Set(value.is_debt),
            is_hidden: ActiveValue::Set(value.is_hidden),
            debt_person: ActiveValue::Set(value.debt_person.clone()),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound(format!("account {}", model.id)))?,
            name: model.name,
            kind: AccountKind::try_from(model.kind.as_str())?,
            balance_minor: model.balance_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            color: model.color,
            icon: model.icon,
            is_debt: model.is_debt,
            is_hidden: model.is_hidden,
            debt_person: model.debt_person,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_debt_account_carries_person_as_natural_key() {
        let account = Account::new_debt("Ivan".to_string(), Currency::Tjs);

        assert_eq!(account.kind, AccountKind::Debt);
        assert_eq!(account.balance_minor, 0);
        assert!(account.is_debt);
        assert!(!account.is_hidden);
        assert_eq!(account.debt_person.as_deref(), Some("Ivan"));
        assert_eq!(account.name, "Ivan");
    }

    #[test]
    fn kind_round_trips_through_storage_strings() {
        for kind in [
            AccountKind::Cash,
            AccountKind::Card,
            AccountKind::Bank,
            AccountKind::Savings,
            AccountKind::Debt,
        ] {
            assert_eq!(AccountKind::try_from(kind.as_str()).unwrap(), kind);
        }
    }
}
