use crate::types::transaction::Transaction;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage error, could not read seed data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error, malformed transaction data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Storage error, invalid transaction: {0}")]
    Invalid(String),
}

pub trait Storage {
    async fn add_transaction(&mut self, transaction: Transaction) -> Result<(), StorageError>;

    /// Most recent first.
    async fn load_transactions(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Transaction>, StorageError>;

    async fn load_recent(&self, limit: usize) -> Result<Vec<Transaction>, StorageError> {
        self.load_transactions(0, limit).await
    }
}

// implementations

#[derive(Default)]
pub struct InmemoryStorage {
    // kept sorted by date, oldest first
    transactions: Vec<Transaction>,
}

impl InmemoryStorage {
    pub fn new() -> InmemoryStorage {
        InmemoryStorage {
            transactions: Vec::new(),
        }
    }

    /// Reads a JSON array of transactions.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<InmemoryStorage, StorageError> {
        let mut transactions: Vec<Transaction> = serde_json::from_reader(reader)?;
        for t in &transactions {
            t.validate()
                .map_err(|e| StorageError::Invalid(format!("transaction {}: {}", t.id, e)))?;
        }
        transactions.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(InmemoryStorage { transactions })
    }

    pub fn from_json_file(path: &Path) -> Result<InmemoryStorage, StorageError> {
        let file = File::open(path)?;
        InmemoryStorage::from_json_reader(BufReader::new(file))
    }
}

impl Storage for InmemoryStorage {
    async fn add_transaction(&mut self, transaction: Transaction) -> Result<(), StorageError> {
        self.transactions.push(transaction);
        self.transactions.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(())
    }

    async fn load_transactions(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Transaction>, StorageError> {
        Ok(self
            .transactions
            .iter()
            .rev()
            .skip(offset)
            .take(count)
            .cloned()
            .collect::<Vec<Transaction>>())
    }
}

/// Cloneable handle to an [`InmemoryStorage`], shared between request handlers.
#[derive(Clone)]
pub struct SharedInmemoryStorage {
    inner: Arc<RwLock<InmemoryStorage>>,
}

impl SharedInmemoryStorage {
    pub fn new(storage: InmemoryStorage) -> SharedInmemoryStorage {
        SharedInmemoryStorage {
            inner: Arc::new(RwLock::new(storage)),
        }
    }
}

impl Storage for SharedInmemoryStorage {
    async fn add_transaction(&mut self, transaction: Transaction) -> Result<(), StorageError> {
        self.inner.write().await.add_transaction(transaction).await
    }

    async fn load_transactions(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Transaction>, StorageError> {
        self.inner.read().await.load_transactions(offset, count).await
    }
}

#[cfg(test)]
mod inmemory_storage_tests {
    use super::*;
    use crate::types::transaction::{PaymentMode, TransactionType};
    use chrono::{Duration, TimeZone, Utc};

    fn transaction(idx: i64) -> Transaction {
        Transaction::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(idx),
            format!("transaction {}", idx),
            100.0,
            TransactionType::Paid,
            PaymentMode::Cash,
        )
    }

    #[tokio::test]
    async fn test_write_read() {
        let mut storage = InmemoryStorage::new();

        for idx in 0..10 {
            let res = storage.add_transaction(transaction(idx)).await;
            assert!(res.is_ok())
        }

        let load_res = storage.load_transactions(0, 3).await;
        assert!(load_res.is_ok());
        let loaded = load_res.unwrap();
        assert_eq!(loaded.len(), 3);
    }

    #[tokio::test]
    async fn test_most_recent_first() {
        let mut storage = InmemoryStorage::new();
        for idx in [3, 0, 7, 5] {
            storage.add_transaction(transaction(idx)).await.unwrap();
        }

        let loaded = storage.load_recent(10).await.unwrap();
        let descriptions: Vec<&str> = loaded.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["transaction 7", "transaction 5", "transaction 3", "transaction 0"]
        );

        let page = storage.load_transactions(1, 2).await.unwrap();
        assert_eq!(page[0].description, "transaction 5");
        assert_eq!(page[1].description, "transaction 3");
    }

    #[tokio::test]
    async fn test_shared_handles_see_the_same_data() {
        let mut writer = SharedInmemoryStorage::new(InmemoryStorage::new());
        let reader = writer.clone();

        writer.add_transaction(transaction(1)).await.unwrap();

        assert_eq!(reader.load_recent(1000).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_from_json() {
        let data = r#"[
            {"date":"2024-03-01T10:00:00Z","description":"lunch","amount":12.0,"type":"Paid","mode":"GPay"},
            {"date":"2024-03-05T10:00:00Z","description":"salary","amount":900.0,"type":"Received","mode":"Cash"}
        ]"#;
        let storage = InmemoryStorage::from_json_reader(data.as_bytes()).unwrap();

        let loaded = storage.load_recent(1000).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].description, "salary");
    }

    #[test]
    fn test_seed_rejects_malformed_data() {
        let res = InmemoryStorage::from_json_reader(r#"[{"date":"yesterday"}]"#.as_bytes());
        assert!(matches!(res, Err(StorageError::Malformed(_))));

        let res = InmemoryStorage::from_json_reader(
            r#"[{"date":"2024-03-01T10:00:00Z","amount":-5.0,"type":"Paid","mode":"Cash"}]"#.as_bytes(),
        );
        assert!(matches!(res, Err(StorageError::Invalid(_))));
    }

    #[test]
    fn test_seed_from_missing_file() {
        let res = InmemoryStorage::from_json_file(Path::new("/nonexistent/seed.json"));
        assert!(matches!(res, Err(StorageError::Io(_))));
    }
}
