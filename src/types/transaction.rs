use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionType {
    Paid,
    Received,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMode {
    Cred,
    GPay,
    Cash,
    Loan,
    #[serde(rename = "Credit card")]
    CreditCard,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Paid => "Paid",
            TransactionType::Received => "Received",
        }
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(TransactionType::Paid),
            "Received" => Ok(TransactionType::Received),
            _ => Err(UnknownVariant {
                kind: "transaction type",
                value: s.to_owned(),
            }),
        }
    }
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cred => "Cred",
            PaymentMode::GPay => "GPay",
            PaymentMode::Cash => "Cash",
            PaymentMode::Loan => "Loan",
            PaymentMode::CreditCard => "Credit card",
        }
    }
}

impl FromStr for PaymentMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cred" => Ok(PaymentMode::Cred),
            "GPay" => Ok(PaymentMode::GPay),
            "Cash" => Ok(PaymentMode::Cash),
            "Loan" => Ok(PaymentMode::Loan),
            "Credit card" => Ok(PaymentMode::CreditCard),
            _ => Err(UnknownVariant {
                kind: "payment mode",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Transaction {
    #[serde(default = "new_id")]
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    // magnitude only, the direction comes from `kind`
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub mode: PaymentMode,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidTransaction {
    #[error("amount must be a finite, non-negative number, got {0}")]
    Amount(f64),
}

impl Transaction {
    #[allow(dead_code)]
    pub fn new(
        date: DateTime<Utc>,
        description: String,
        amount: f64,
        kind: TransactionType,
        mode: PaymentMode,
    ) -> Transaction {
        Transaction {
            id: new_id(),
            date,
            description,
            amount,
            kind,
            mode,
        }
    }

    /// Amount with the sign implied by the transaction type: received money is
    /// positive, paid money is negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Paid => -self.amount,
            TransactionType::Received => self.amount,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidTransaction> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(InvalidTransaction::Amount(self.amount));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_transaction_without_id() {
        let parsed = serde_json::from_str::<Transaction>(
            r#"{"date":"2024-03-01T10:00:00Z","description":"groceries","amount":12.5,"type":"Paid","mode":"Credit card"}"#,
        )
        .unwrap();

        assert!(!parsed.id.is_empty());
        assert_eq!(parsed.kind, TransactionType::Paid);
        assert_eq!(parsed.mode, PaymentMode::CreditCard);
        assert_eq!(parsed.date, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn dump_uses_display_names() {
        let t = Transaction::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            "rent".to_owned(),
            500.0,
            TransactionType::Received,
            PaymentMode::CreditCard,
        );
        let dumped = serde_json::to_value(&t).unwrap();

        assert_eq!(dumped["type"], "Received");
        assert_eq!(dumped["mode"], "Credit card");
    }

    #[test]
    fn from_str_matches_serde_names() {
        for mode in [
            PaymentMode::Cred,
            PaymentMode::GPay,
            PaymentMode::Cash,
            PaymentMode::Loan,
            PaymentMode::CreditCard,
        ] {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode));
            assert_eq!(mode.as_str().parse::<PaymentMode>(), Ok(mode));
        }
        assert!("gpay".parse::<PaymentMode>().is_err());
        assert!("paid".parse::<TransactionType>().is_err());
    }

    #[test]
    fn signed_amount_follows_type() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let paid = Transaction::new(date, String::new(), 30.0, TransactionType::Paid, PaymentMode::Cash);
        let received = Transaction::new(date, String::new(), 30.0, TransactionType::Received, PaymentMode::Cash);

        assert_eq!(paid.signed_amount(), -30.0);
        assert_eq!(received.signed_amount(), 30.0);
    }

    #[test]
    fn validate_rejects_negative_and_nan_amounts() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut t = Transaction::new(date, String::new(), 0.0, TransactionType::Paid, PaymentMode::Cash);
        assert!(t.validate().is_ok());

        t.amount = -1.0;
        assert_eq!(t.validate(), Err(InvalidTransaction::Amount(-1.0)));

        t.amount = f64::NAN;
        assert!(t.validate().is_err());
    }
}
