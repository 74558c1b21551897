//! Chart data derived from a filtered set of transactions.
//!
//! Every function here is total and recomputes from scratch on each call.
//! Calendar dates are evaluated in the offset passed in by the caller.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;

use crate::types::transaction::{Transaction, TransactionType};

/// Number of most recent transactions shown in the trend chart.
pub const TREND_WINDOW: usize = 7;

/// One slice of the payment mode pie chart.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub name: String,
    pub value: f64,
}

/// Money paid and received on a single calendar day.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub label: String,
    pub spend: f64,
    pub receive: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub label: String,
    pub balance: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub label: String,
    pub amount: f64,
}

/// Formats a date the way chart axes show it, e.g. "3/1/2024".
pub fn date_label(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn local_date(t: &Transaction, offset: &FixedOffset) -> NaiveDate {
    t.date.with_timezone(offset).date_naive()
}

/// Sums amounts per payment mode, ignoring direction.
///
/// Slices appear in the order their mode is first seen.
pub fn totals_by_mode(transactions: &[Transaction]) -> Vec<CategorySlice> {
    let mut slices: Vec<CategorySlice> = Vec::new();

    for transaction in transactions {
        let name = transaction.mode.as_str();
        match slices.iter_mut().find(|slice| slice.name == name) {
            Some(slice) => slice.value += transaction.amount,
            None => slices.push(CategorySlice {
                name: name.to_owned(),
                value: transaction.amount,
            }),
        }
    }

    slices
}

/// Groups transactions by calendar day into spend and receive totals,
/// sorted chronologically.
pub fn daily_flows(transactions: &[Transaction], offset: &FixedOffset) -> Vec<DailyFlow> {
    let mut totals: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let entry = totals
            .entry(local_date(transaction, offset))
            .or_insert((0.0, 0.0));
        match transaction.kind {
            TransactionType::Paid => entry.0 += transaction.amount,
            TransactionType::Received => entry.1 += transaction.amount,
        }
    }

    totals
        .into_iter()
        .map(|(date, (spend, receive))| DailyFlow {
            date,
            label: date_label(date),
            spend,
            receive,
        })
        .collect()
}

/// Running balance starting from zero, one point per transaction.
///
/// The input order is kept as is, so callers decide which way the curve runs.
pub fn running_balance(transactions: &[Transaction], offset: &FixedOffset) -> Vec<BalancePoint> {
    let mut balance = 0.0;

    transactions
        .iter()
        .map(|transaction| {
            balance += transaction.signed_amount();
            let date = local_date(transaction, offset);
            BalancePoint {
                date,
                label: date_label(date),
                balance,
            }
        })
        .collect()
}

/// Signed amounts of the first [`TREND_WINDOW`] transactions, reversed so the
/// oldest of them comes first.
pub fn recent_trend(transactions: &[Transaction], offset: &FixedOffset) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = transactions
        .iter()
        .take(TREND_WINDOW)
        .map(|transaction| {
            let date = local_date(transaction, offset);
            TrendPoint {
                date,
                label: date_label(date),
                amount: transaction.signed_amount(),
            }
        })
        .collect();
    points.reverse();
    points
}
