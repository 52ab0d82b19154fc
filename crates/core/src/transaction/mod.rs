//! Transaction records and category classification.

pub mod category;
pub mod types;

#[cfg(test)]
mod category_props;

pub use category::{Category, TaxBucket};
pub use types::{NewTransaction, Transaction, TransactionDraft, TransactionKind, TransactionPatch};
