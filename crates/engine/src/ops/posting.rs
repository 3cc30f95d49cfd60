//! The posting engine.
//!
//! `post` turns a transaction intent into a settled ledger record: it
//! validates the intent, resolves (or creates) the counterpart account,
//! persists the transaction row and applies the balance deltas — all inside
//! one storage transaction, so a partially settled posting can never be
//! observed.

use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    DebtKind, EngineError, PostingCmd, ResultEngine, Transaction, TransactionKind, transactions,
};

use super::{Engine, normalize_optional_text, with_tx};

/// Signed balance deltas for one settlement: `(main, counterpart)`.
///
/// `amount_minor` is a positive magnitude. The debt rows read from the user's
/// perspective against a counterpart balance of "net owed to the user":
///
/// | kind     | subtype                    | main    | counterpart |
/// |----------|----------------------------|---------|-------------|
/// | income   |                            | +amount |             |
/// | expense  |                            | −amount |             |
/// | transfer |                            | −amount | +amount     |
/// | debt     | i_gave / i_returned        | −amount | +amount     |
/// | debt     | they_gave / they_returned  | +amount | −amount     |
///
/// `i_gave` and `i_returned` apply the same numeric effect, as do
/// `they_gave`/`they_returned`. The pairing conflates lending with repaying;
/// it is kept as-is for compatibility with the system this engine replaces
/// (see DESIGN.md).
fn settlement_deltas(
    kind: TransactionKind,
    debt_kind: Option<DebtKind>,
    amount_minor: i64,
) -> ResultEngine<(i64, Option<i64>)> {
    let deltas = match kind {
        TransactionKind::Income => (amount_minor, None),
        TransactionKind::Expense => (-amount_minor, None),
        TransactionKind::Transfer => (-amount_minor, Some(amount_minor)),
        TransactionKind::Debt => match debt_kind {
            Some(DebtKind::IGave | DebtKind::IReturned) => (-amount_minor, Some(amount_minor)),
            Some(DebtKind::TheyGave | DebtKind::TheyReturned) => {
                (amount_minor, Some(-amount_minor))
            }
            None => {
                return Err(EngineError::InvalidRequest(
                    "debt_kind is required for debt transactions".to_string(),
                ));
            }
        },
    };
    Ok(deltas)
}

impl Engine {
    /// Post a transaction: validate, settle balances and persist the record
    /// as one atomic unit.
    ///
    /// Errors with [`EngineError::InvalidRequest`] before any mutation when a
    /// required field for the kind is missing, and with
    /// [`EngineError::NotFound`] when a referenced account does not resolve.
    pub async fn post(&self, cmd: PostingCmd) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| { self.post_on(&db_tx, cmd).await })
    }

    async fn post_on(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: PostingCmd,
    ) -> ResultEngine<Transaction> {
        if cmd.amount_minor <= 0 {
            return Err(EngineError::InvalidRequest(
                "amount_minor must be > 0".to_string(),
            ));
        }

        let person = normalize_optional_text(cmd.person.as_deref());

        // Validation completes before any write.
        let account = self.require_account(db_tx, cmd.account_id).await?;
        match cmd.kind {
            TransactionKind::Income | TransactionKind::Expense => {
                if cmd.category_id.is_none() {
                    return Err(EngineError::InvalidRequest(format!(
                        "category_id is required for {} transactions",
                        cmd.kind.as_str()
                    )));
                }
            }
            TransactionKind::Transfer => {
                let to_id = cmd.account_to_id.ok_or_else(|| {
                    EngineError::InvalidRequest(
                        "account_to_id is required for transfer transactions".to_string(),
                    )
                })?;
                if to_id == cmd.account_id {
                    return Err(EngineError::InvalidRequest(
                        "account_to_id must differ from account_id".to_string(),
                    ));
                }
                let to = self.require_account(db_tx, to_id).await?;
                if account.is_debt || to.is_debt {
                    return Err(EngineError::InvalidRequest(
                        "transfers cannot involve debt accounts".to_string(),
                    ));
                }
            }
            TransactionKind::Debt => {
                if person.is_none() {
                    return Err(EngineError::InvalidRequest(
                        "person is required for debt transactions".to_string(),
                    ));
                }
                if cmd.debt_kind.is_none() {
                    return Err(EngineError::InvalidRequest(
                        "debt_kind is required for debt transactions".to_string(),
                    ));
                }
            }
        }

        // Resolve the counterpart. For debt this may create the per-person
        // account, which must exist (at balance 0) before the balance math.
        let account_to_id = match cmd.kind {
            TransactionKind::Transfer => cmd.account_to_id,
            TransactionKind::Debt => {
                let Some(person) = person.as_deref() else {
                    return Err(EngineError::InvalidRequest(
                        "person is required for debt transactions".to_string(),
                    ));
                };
                let counterpart = self
                    .find_or_create_debt_account_on(db_tx, person, cmd.currency)
                    .await?;
                Some(counterpart.id)
            }
            TransactionKind::Income | TransactionKind::Expense => None,
        };

        let (main_delta, counter_delta) =
            settlement_deltas(cmd.kind, cmd.debt_kind, cmd.amount_minor)?;

        let tx = Transaction {
            id: Uuid::new_v4(),
            kind: cmd.kind,
            amount_minor: cmd.amount_minor,
            currency: cmd.currency,
            category_id: cmd.category_id,
            account_id: cmd.account_id,
            account_to_id,
            description: normalize_optional_text(cmd.description.as_deref()),
            place: normalize_optional_text(cmd.place.as_deref()),
            person,
            comment: normalize_optional_text(cmd.comment.as_deref()),
            debt_kind: cmd.debt_kind,
            occurred_at: cmd.occurred_at,
            created_at: Utc::now(),
        };

        transactions::ActiveModel::from(&tx).insert(db_tx).await?;

        self.adjust_balance_on(db_tx, tx.account_id, main_delta)
            .await?;
        if let (Some(delta), Some(counterpart_id)) = (counter_delta, tx.account_to_id) {
            self.adjust_balance_on(db_tx, counterpart_id, delta).await?;
        }

        tracing::debug!(
            transaction_id = %tx.id,
            kind = tx.kind.as_str(),
            amount_minor = tx.amount_minor,
            "posted transaction"
        );
        Ok(tx)
    }

    /// Return a transaction by id.
    pub async fn transaction(&self, id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("transaction {id}")))?;
        Transaction::try_from(model)
    }

    /// All transactions, newest first.
    pub async fn list_transactions(&self) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .order_by_desc(transactions::Column::OccurredAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Delete a transaction and reverse its balance effects, atomically.
    ///
    /// Accounts deleted since the posting are skipped; there is no balance
    /// left to fix for them.
    pub async fn remove_transaction(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("transaction {id}")))?;
            let tx = Transaction::try_from(model)?;

            let (main_delta, counter_delta) =
                settlement_deltas(tx.kind, tx.debt_kind, tx.amount_minor)?;

            self.reverse_balance_on(&db_tx, tx.account_id, -main_delta)
                .await?;
            if let (Some(delta), Some(counterpart_id)) = (counter_delta, tx.account_to_id) {
                self.reverse_balance_on(&db_tx, counterpart_id, -delta)
                    .await?;
            }

            transactions::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn reverse_balance_on(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
        delta_minor: i64,
    ) -> ResultEngine<()> {
        match self.adjust_balance_on(db_tx, account_id, delta_minor).await {
            Ok(()) => Ok(()),
            Err(EngineError::NotFound(_)) => {
                tracing::warn!(%account_id, "skipping balance reversal for deleted account");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_and_expense_touch_only_the_main_account() {
        assert_eq!(
            settlement_deltas(TransactionKind::Income, None, 100).unwrap(),
            (100, None)
        );
        assert_eq!(
            settlement_deltas(TransactionKind::Expense, None, 100).unwrap(),
            (-100, None)
        );
    }

    #[test]
    fn transfer_moves_the_amount_between_accounts() {
        assert_eq!(
            settlement_deltas(TransactionKind::Transfer, None, 250).unwrap(),
            (-250, Some(250))
        );
    }

    #[test]
    fn debt_subtypes_follow_the_receivable_convention() {
        for kind in [DebtKind::IGave, DebtKind::IReturned] {
            assert_eq!(
                settlement_deltas(TransactionKind::Debt, Some(kind), 50).unwrap(),
                (-50, Some(50))
            );
        }
        for kind in [DebtKind::TheyGave, DebtKind::TheyReturned] {
            assert_eq!(
                settlement_deltas(TransactionKind::Debt, Some(kind), 50).unwrap(),
                (50, Some(-50))
            );
        }
    }

    #[test]
    fn debt_without_subtype_is_invalid() {
        assert!(matches!(
            settlement_deltas(TransactionKind::Debt, None, 50),
            Err(EngineError::InvalidRequest(_))
        ));
    }
}
