//! Ledger domain types.
//!
//! A [`TransactionDraft`] is what callers submit; a [`Transaction`] is what
//! storage hands back, with its assigned id, its breakdown and the derived
//! running balance.

use std::fmt;
use std::str::FromStr;

use cashbox_shared::TransactionId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cash::DenominationBreakdown;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum TransactionType {
    /// Cash put into the box. Amount is positive.
    Deposit,
    /// Cash taken out of the box. Amount is negative.
    Withdrawal,
}

/// Text that is not a transaction type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction type '{0}', expected deposit or withdrawal")]
pub struct ParseTransactionTypeError(pub String);

impl TransactionType {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }

    /// +1 for deposits, -1 for withdrawals.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Deposit => 1,
            Self::Withdrawal => -1,
        }
    }

    /// Returns true when `amount` has the sign this type requires.
    /// Zero is never accepted.
    #[must_use]
    pub const fn accepts(self, amount: i64) -> bool {
        match self {
            Self::Deposit => amount > 0,
            Self::Withdrawal => amount < 0,
        }
    }

    /// Human-readable description of the required sign.
    #[must_use]
    pub const fn expected_sign(self) -> &'static str {
        match self {
            Self::Deposit => "positive",
            Self::Withdrawal => "negative",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("deposit") || trimmed == "入金" {
            Ok(Self::Deposit)
        } else if trimmed.eq_ignore_ascii_case("withdrawal") || trimmed == "出金" {
            Ok(Self::Withdrawal)
        } else {
            Err(ParseTransactionTypeError(s.to_string()))
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = ParseTransactionTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionType> for &'static str {
    fn from(value: TransactionType) -> Self {
        value.as_str()
    }
}

/// Caller-supplied fields of a transaction. The breakdown travels beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Booking date.
    pub date: NaiveDate,
    /// Deposit or withdrawal.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Signed amount in minor units.
    pub amount: i64,
    /// Short description.
    #[serde(default)]
    pub summary: String,
    /// Free-form note.
    #[serde(default)]
    pub memo: String,
    /// Who received or handed over the cash.
    #[serde(default)]
    pub recipient: String,
}

/// A stored transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Storage-assigned id.
    pub id: TransactionId,
    /// Booking date.
    pub date: NaiveDate,
    /// Deposit or withdrawal.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Signed amount in minor units.
    pub amount: i64,
    /// Short description.
    pub summary: String,
    /// Free-form note.
    pub memo: String,
    /// Who received or handed over the cash.
    pub recipient: String,
    /// Physical cash backing the amount.
    pub breakdown: DenominationBreakdown,
    /// Cumulative balance up to and including this transaction.
    pub running_balance: i64,
}

impl Transaction {
    /// Assembles a stored transaction. The running balance starts at zero
    /// until the next recompute.
    #[must_use]
    pub fn from_draft(
        id: TransactionId,
        draft: TransactionDraft,
        breakdown: DenominationBreakdown,
    ) -> Self {
        Self {
            id,
            date: draft.date,
            transaction_type: draft.transaction_type,
            amount: draft.amount,
            summary: draft.summary,
            memo: draft.memo,
            recipient: draft.recipient,
            breakdown,
            running_balance: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("deposit", TransactionType::Deposit)]
    #[case("Deposit", TransactionType::Deposit)]
    #[case(" WITHDRAWAL ", TransactionType::Withdrawal)]
    #[case("入金", TransactionType::Deposit)]
    #[case("出金", TransactionType::Withdrawal)]
    fn test_parse_transaction_type(#[case] input: &str, #[case] expected: TransactionType) {
        assert_eq!(input.parse::<TransactionType>().unwrap(), expected);
    }

    #[test]
    fn test_parse_transaction_type_rejects_unknown() {
        let err = "transfer".parse::<TransactionType>().unwrap_err();
        assert_eq!(err, ParseTransactionTypeError("transfer".to_string()));
    }

    #[rstest]
    #[case(TransactionType::Deposit, 1, true)]
    #[case(TransactionType::Deposit, 0, false)]
    #[case(TransactionType::Deposit, -1, false)]
    #[case(TransactionType::Withdrawal, -1, true)]
    #[case(TransactionType::Withdrawal, 0, false)]
    #[case(TransactionType::Withdrawal, 1, false)]
    fn test_sign_rule(#[case] ty: TransactionType, #[case] amount: i64, #[case] ok: bool) {
        assert_eq!(ty.accepts(amount), ok);
    }

    #[test]
    fn test_draft_serde_uses_type_key() {
        let json = r#"{"date":"2024-01-02","type":"withdrawal","amount":-300}"#;
        let draft: TransactionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.transaction_type, TransactionType::Withdrawal);
        assert_eq!(draft.amount, -300);
        assert!(draft.summary.is_empty());

        let back = serde_json::to_value(&draft).unwrap();
        assert_eq!(back["type"], "withdrawal");
    }

    #[test]
    fn test_from_draft() {
        let draft = TransactionDraft {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            transaction_type: TransactionType::Deposit,
            amount: 1_000,
            summary: "float".to_string(),
            memo: String::new(),
            recipient: "front desk".to_string(),
        };
        let tx = Transaction::from_draft(
            TransactionId::new(5),
            draft.clone(),
            DenominationBreakdown::empty(),
        );
        assert_eq!(tx.id, TransactionId::new(5));
        assert_eq!(tx.running_balance, 0);
        assert_eq!(tx.date, draft.date);
        assert_eq!(tx.amount, 1_000);
        assert_eq!(tx.recipient, "front desk");
    }
}
