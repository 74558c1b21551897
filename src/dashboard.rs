//! Dashboard state: the fetched transactions, the active filter and the
//! filtered view the charts are built from.
//!
//! The filtered view is never edited in place. Every mutation goes through
//! [`Dashboard::recompute`], which rebuilds it from the full collection.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::aggregation::{
    daily_flows, recent_trend, running_balance, totals_by_mode, BalancePoint, CategorySlice,
    DailyFlow, TrendPoint,
};
use crate::storage::Storage;
use crate::types::filter::{FilterChange, FilterCriteria};
use crate::types::transaction::Transaction;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FetchStatus {
    NotLoaded,
    Loaded { count: usize },
    Failed { reason: String },
}

/// Everything the dashboard screen renders.
#[derive(Serialize, Debug, Clone)]
pub struct DashboardCharts {
    pub criteria: FilterCriteria,
    pub fetch_status: FetchStatus,
    pub transaction_count: usize,
    pub by_mode: Vec<CategorySlice>,
    pub spend_vs_receive: Vec<DailyFlow>,
    pub spend_receive_bars: Vec<DailyFlow>,
    pub balance: Vec<BalancePoint>,
    pub trend: Vec<TrendPoint>,
}

pub struct Dashboard {
    transactions: Vec<Transaction>,
    criteria: FilterCriteria,
    filtered: Vec<Transaction>,
    status: FetchStatus,
    offset: FixedOffset,
}

impl Dashboard {
    pub fn new(offset: FixedOffset) -> Dashboard {
        Dashboard {
            transactions: Vec::new(),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            status: FetchStatus::NotLoaded,
            offset,
        }
    }

    /// Fetches up to `limit` transactions, most recent first.
    ///
    /// A failed fetch is logged and recorded in the status; the previously
    /// fetched transactions stay in place.
    pub async fn refresh<S: Storage>(&mut self, storage: &S, limit: usize) {
        match storage.load_recent(limit).await {
            Ok(transactions) => {
                tracing::info!("fetched {} transactions", transactions.len());
                self.status = FetchStatus::Loaded {
                    count: transactions.len(),
                };
                self.transactions = transactions;
            }
            Err(err) => {
                tracing::error!("could not fetch transactions: {}", err);
                self.status = FetchStatus::Failed {
                    reason: err.to_string(),
                };
            }
        }
        self.recompute();
    }

    pub fn apply_change(&mut self, change: FilterChange) {
        tracing::debug!(?change, "filter changed");
        self.criteria.change(change);
        self.recompute();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        let now = Utc::now().with_timezone(&self.offset);
        self.recompute_at(&now);
    }

    pub fn recompute_at(&mut self, now: &DateTime<FixedOffset>) {
        self.filtered = self.criteria.apply(&self.transactions, now);
    }

    pub fn charts(&self) -> DashboardCharts {
        let daily = daily_flows(&self.filtered, &self.offset);

        // the fetched order is newest first, the balance curve runs forward in time
        let mut chronological = self.filtered.clone();
        chronological.sort_by(|a, b| a.date.cmp(&b.date));

        DashboardCharts {
            criteria: self.criteria.clone(),
            fetch_status: self.status.clone(),
            transaction_count: self.filtered.len(),
            by_mode: totals_by_mode(&self.filtered),
            spend_vs_receive: daily.clone(),
            spend_receive_bars: daily,
            balance: running_balance(&chronological, &self.offset),
            trend: recent_trend(&self.filtered, &self.offset),
        }
    }
}
