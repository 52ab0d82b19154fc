//! Transaction domain types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use taxbook_shared::types::{OwnerId, TransactionId};

use super::category::Category;
use crate::validation::{ValidationError, validate_amount, validate_date_on};

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored income or expense record.
///
/// Field names follow the `transactions` collection layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Identifier assigned by the store.
    pub id: TransactionId,
    /// Owning user, immutable.
    pub owner_id: OwnerId,
    /// Calendar date; its year equals `year`.
    pub date: NaiveDate,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Category tag.
    #[serde(default)]
    pub category: Category,
    /// Positive amount.
    pub amount: Decimal,
    /// Free text note.
    #[serde(default)]
    pub note: String,
    /// Optional document number (invoice, statement line).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Source account label such as "bank" or "cash".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Fiscal year the record belongs to.
    pub year: i32,
    /// True once the owning year has been closed.
    #[serde(default)]
    pub archived: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the `YYYY-MM` month key of the transaction date.
    #[must_use]
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Returns true for income records.
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Returns true if the record may still be edited or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        !self.archived
    }
}

/// Validated input for creating a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Calendar date.
    pub date: NaiveDate,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Category tag.
    pub category: Category,
    /// Positive amount.
    pub amount: Decimal,
    /// Free text note.
    pub note: String,
    /// Optional document number.
    pub number: Option<String>,
    /// Optional account label.
    pub account: Option<String>,
}

/// Raw transaction input as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    /// Date as `YYYY-MM-DD`.
    pub date: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Amount as text or number.
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
    /// Free text note.
    #[serde(default)]
    pub note: String,
    /// Optional document number.
    #[serde(default)]
    pub number: Option<String>,
    /// Optional account label.
    #[serde(default)]
    pub account: Option<String>,
}

impl TransactionDraft {
    /// Validates the raw input against the active year.
    pub fn validate(
        self,
        active_year: i32,
        today: NaiveDate,
    ) -> Result<NewTransaction, ValidationError> {
        let date = validate_date_on(&self.date, active_year, false, today)?;
        let amount = validate_amount(&self.amount)?;
        Ok(NewTransaction {
            date,
            kind: self.kind,
            category: Category::parse(&self.category),
            amount,
            note: self.note.trim().to_string(),
            number: non_empty(self.number),
            account: non_empty(self.account),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts an amount sent either as a JSON string or a JSON number.
fn amount_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

/// Validated replacement values for an existing transaction.
///
/// Edits replace every user-editable field; `owner_id`, `created_at` and
/// `archived` are never touched by an edit.
pub type TransactionPatch = NewTransaction;
