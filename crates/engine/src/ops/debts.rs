//! Per-person debt account resolution.
//!
//! A debt account's balance is the net amount the person owes the user:
//! positive means they owe the user, negative means the user owes them.

use sea_orm::{ConnectionTrait, QueryFilter, TransactionTrait, prelude::*};

use crate::{Account, Currency, ResultEngine, accounts};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Find the debt account for `person`, creating it when absent.
    ///
    /// The lookup matches hidden accounts too, so posting against a "closed"
    /// debt reuses the existing ledger instead of opening a second one.
    pub async fn find_or_create_debt_account(
        &self,
        person: &str,
        currency: Currency,
    ) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            self.find_or_create_debt_account_on(&db_tx, person, currency)
                .await
        })
    }

    pub(super) async fn find_or_create_debt_account_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        person: &str,
        currency: Currency,
    ) -> ResultEngine<Account> {
        let person = normalize_required_name(person, "debt person")?;

        if let Some(model) = Self::debt_account_for(conn, &person).await? {
            return Account::try_from(model);
        }

        let account = Account::new_debt(person.clone(), currency);
        if let Err(err) = accounts::ActiveModel::from(&account).insert(conn).await {
            // The unique index on debt_person means a concurrent resolver call
            // may have won the insert; refetch before giving up.
            if let Some(model) = Self::debt_account_for(conn, &person).await? {
                return Account::try_from(model);
            }
            return Err(err.into());
        }

        tracing::info!(person = %person, account_id = %account.id, "created debt account");
        Ok(account)
    }

    async fn debt_account_for<C: ConnectionTrait>(
        conn: &C,
        person: &str,
    ) -> Result<Option<accounts::Model>, sea_orm::DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::IsDebt.eq(true))
            .filter(accounts::Column::DebtPerson.eq(person))
            .one(conn)
            .await
    }
}
