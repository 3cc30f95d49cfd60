//! The hamyon core: account and category stores, the per-person debt account
//! resolver, and the transaction-posting engine that settles balance changes
//! atomically with the ledger write.

pub use accounts::{Account, AccountKind};
pub use categories::{Category, CategoryKind};
pub use commands::{CategoryPatch, NewAccount, NewCategory, PostingCmd};
pub use currency::Currency;
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder};
pub use transactions::{DebtKind, Transaction, TransactionKind};

mod accounts;
mod categories;
mod commands;
mod currency;
mod error;
mod ops;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
