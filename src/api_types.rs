use crate::dashboard::Dashboard;
use crate::storage;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

// can be adjusted to compile with various DB backend support
pub type AppStorage = storage::SharedInmemoryStorage;

#[derive(Clone)]
pub struct AppState {
    pub storage: AppStorage,
    // one dashboard, every filter change goes through its write lock
    pub dashboard: Arc<RwLock<Dashboard>>,
    pub fetch_limit: usize,
}

impl AppState {
    pub fn new(storage: AppStorage, dashboard: Dashboard, fetch_limit: usize) -> AppState {
        AppState {
            storage,
            dashboard: Arc::new(RwLock::new(dashboard)),
            fetch_limit,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct PaginationParams {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    50
}
