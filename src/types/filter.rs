use crate::types::choice::Choice;
use crate::types::transaction::{PaymentMode, Transaction, TransactionType};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    #[default]
    Month,
    Year,
    All,
}

impl TimeFrame {
    /// First calendar day admitted by this time frame, relative to `today`.
    pub fn earliest_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeFrame::Month => NaiveDate::from_ymd_opt(today.year(), today.month(), 1),
            TimeFrame::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            TimeFrame::All => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FilterCriteria {
    pub time_frame: TimeFrame,
    #[serde(rename = "type")]
    pub kind: Choice<TransactionType>,
    pub mode: Choice<PaymentMode>,
    #[serde(deserialize_with = "optional_date::deserialize")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "optional_date::deserialize")]
    pub end_date: Option<NaiveDate>,
}

/// Replaces a single criterion, one per filter control.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FilterChange {
    TimeFrame(TimeFrame),
    #[serde(rename = "type")]
    Kind(Choice<TransactionType>),
    Mode(Choice<PaymentMode>),
    StartDate(#[serde(deserialize_with = "optional_date::deserialize")] Option<NaiveDate>),
    EndDate(#[serde(deserialize_with = "optional_date::deserialize")] Option<NaiveDate>),
}

impl FilterCriteria {
    /// Criteria that admit every transaction.
    #[allow(dead_code)]
    pub fn everything() -> FilterCriteria {
        FilterCriteria {
            time_frame: TimeFrame::All,
            ..FilterCriteria::default()
        }
    }

    pub fn change(&mut self, change: FilterChange) {
        match change {
            FilterChange::TimeFrame(time_frame) => self.time_frame = time_frame,
            FilterChange::Kind(kind) => self.kind = kind,
            FilterChange::Mode(mode) => self.mode = mode,
            FilterChange::StartDate(date) => self.start_date = date,
            FilterChange::EndDate(date) => self.end_date = date,
        }
    }

    /// Calendar dates are taken in the offset carried by `now`.
    pub fn matches(&self, t: &Transaction, now: &DateTime<FixedOffset>) -> bool {
        let date = t.date.with_timezone(now.offset()).date_naive();
        if let Some(earliest) = self.time_frame.earliest_date(now.date_naive()) {
            if date < earliest {
                return false;
            }
        }
        if !self.kind.admits(&t.kind) || !self.mode.admits(&t.mode) {
            return false;
        }
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        true
    }

    /// Keeps the transactions matching every criterion, in their original order.
    pub fn apply(&self, transactions: &[Transaction], now: &DateTime<FixedOffset>) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.matches(t, now))
            .cloned()
            .collect()
    }
}

// empty strings and nulls both mean "no date", as sent by a cleared date picker
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
