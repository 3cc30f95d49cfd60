//! Account store operations.
//!
//! Balances are only ever changed through [`Engine::adjust_balance`] (or its
//! in-transaction variant used by the posting engine), which increments the
//! stored value in a single storage-level `UPDATE`. Concurrent adjustments to
//! the same account therefore never lose updates.

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{Account, EngineError, NewAccount, ResultEngine, accounts};

use super::{Engine, normalize_required_name};

impl Engine {
    /// Create an account. Balance defaults to 0 and currency to TJS unless
    /// the command says otherwise.
    pub async fn create_account(&self, cmd: NewAccount) -> ResultEngine<Account> {
        let name = normalize_required_name(&cmd.name, "account")?;

        let mut account = Account::new(name, cmd.kind, cmd.balance_minor, cmd.currency);
        account.color = cmd.color;
        account.icon = cmd.icon;

        accounts::ActiveModel::from(&account)
            .insert(&self.database)
            .await?;
        Ok(account)
    }

    /// Return an account by id.
    pub async fn account(&self, id: Uuid) -> ResultEngine<Account> {
        self.require_account(&self.database, id).await
    }

    /// Atomically increment an account balance by `delta_minor` (which may be
    /// negative) and return the updated record.
    ///
    /// The increment is a single `UPDATE ... SET balance = balance + ?` at
    /// the storage layer, never a read-modify-write in application code.
    pub async fn adjust_balance(&self, id: Uuid, delta_minor: i64) -> ResultEngine<Account> {
        self.adjust_balance_on(&self.database, id, delta_minor)
            .await?;
        self.require_account(&self.database, id).await
    }

    /// All accounts, debt ones included.
    pub async fn list_accounts(&self) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find().all(&self.database).await?;
        models.into_iter().map(Account::try_from).collect()
    }

    /// Accounts that are not debt ledgers.
    pub async fn list_regular_accounts(&self) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::IsDebt.eq(false))
            .all(&self.database)
            .await?;
        models.into_iter().map(Account::try_from).collect()
    }

    /// Debt accounts, hidden ones included; callers filter for display.
    pub async fn list_debt_accounts(&self) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::IsDebt.eq(true))
            .all(&self.database)
            .await?;
        models.into_iter().map(Account::try_from).collect()
    }

    /// Hide or unhide a debt account ("close"/"reopen" a debt).
    ///
    /// Only meaningful for debt accounts; a regular account id is reported as
    /// a missing debt account.
    pub async fn set_account_hidden(&self, id: Uuid, hidden: bool) -> ResultEngine<Account> {
        let mut account = self.require_account(&self.database, id).await?;
        if !account.is_debt {
            return Err(EngineError::NotFound(format!("debt account {id}")));
        }

        account.is_hidden = hidden;
        accounts::ActiveModel::from(&account)
            .update(&self.database)
            .await?;
        Ok(account)
    }

    /// Delete an account unconditionally.
    ///
    /// Transactions referencing the account keep their rows; no balance
    /// reversal happens here.
    pub async fn remove_account(&self, id: Uuid) -> ResultEngine<()> {
        let result = accounts::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound(format!("account {id}")));
        }
        Ok(())
    }

    pub(super) async fn require_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> ResultEngine<Account> {
        let model = accounts::Entity::find_by_id(id.to_string())
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("account {id}")))?;
        Account::try_from(model)
    }

    /// Storage-level atomic increment; errors with `NotFound` when the id
    /// matches no row.
    pub(super) async fn adjust_balance_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        delta_minor: i64,
    ) -> ResultEngine<()> {
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::BalanceMinor,
                Expr::col(accounts::Column::BalanceMinor).add(delta_minor),
            )
            .filter(accounts::Column::Id.eq(id.to_string()))
            .exec(conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound(format!("account {id}")));
        }
        Ok(())
    }
}
