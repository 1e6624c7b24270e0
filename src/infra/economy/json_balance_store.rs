// Embedded balance store: every balance in one JSON file.
//
// This is the default backend. It has no raw-write capability, so it can be
// the source of a backend migration but never its destination.

use crate::core::economy::{
    AccountExport, BackendKind, BalanceStore, Cause, Currency, StoreError,
};
use crate::core::migration::RawAccountRecord;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

/// On-disk layout: { accounts: { player_id: { currency_id: amount } } }
#[derive(Debug, Serialize, Deserialize, Default)]
struct JsonBalanceData {
    accounts: BTreeMap<Uuid, BTreeMap<String, Decimal>>,
}

pub struct JsonBalanceStore {
    path: PathBuf,
    cache: RwLock<JsonBalanceData>,
}

impl JsonBalanceStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let cache = read_data(&path)?;

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    async fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let cache = self.cache.read().await;
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, &*cache)?;
        Ok(())
    }
}

fn read_data(path: &Path) -> Result<JsonBalanceData, StoreError> {
    if !path.exists() {
        return Ok(JsonBalanceData::default());
    }
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[async_trait]
impl BalanceStore for JsonBalanceStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Embedded
    }

    async fn get_balance(
        &self,
        player_id: Uuid,
        currency: &Currency,
    ) -> Result<Decimal, StoreError> {
        let cache = self.cache.read().await;
        Ok(cache
            .accounts
            .get(&player_id)
            .and_then(|balances| balances.get(&currency.id))
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn set_balance(
        &self,
        player_id: Uuid,
        amount: Decimal,
        currency: &Currency,
        cause: &Cause,
    ) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        cache
            .accounts
            .entry(player_id)
            .or_default()
            .insert(currency.id.clone(), amount);
        drop(cache); // Release lock before persisting

        tracing::debug!(
            %player_id,
            %amount,
            currency_id = %currency.id,
            %cause,
            migration = cause.is_migration(),
            "Balance set"
        );
        self.persist().await
    }
}

#[async_trait]
impl AccountExport for JsonBalanceStore {
    /// Reads the file again rather than the cache, so the export reflects what
    /// is actually persisted.
    async fn export_account_lines(&self) -> Result<Vec<String>, StoreError> {
        let data = read_data(&self.path)?;
        Ok(data
            .accounts
            .iter()
            .flat_map(|(player_id, balances)| {
                balances.iter().map(move |(currency_id, amount)| {
                    RawAccountRecord::new(player_id.to_string(), amount.to_string(), currency_id)
                        .encode()
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn player(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[tokio::test]
    async fn test_json_persistence_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("balances.json");
        let coins = Currency::new("coins", "Coins");

        let store = JsonBalanceStore::new(&path).unwrap();
        store
            .set_balance(player(1), "12.50".parse().unwrap(), &coins, &Cause::new("Test"))
            .await
            .unwrap();

        // Reload from file
        let store2 = JsonBalanceStore::new(&path).unwrap();
        let balance = store2.get_balance(player(1), &coins).await.unwrap();
        assert_eq!(balance, "12.5".parse::<Decimal>().unwrap());
    }

    #[tokio::test]
    async fn test_missing_account_reads_zero() {
        let dir = tempdir().unwrap();
        let store = JsonBalanceStore::new(dir.path().join("balances.json")).unwrap();

        let balance = store
            .get_balance(player(9), &Currency::new("coins", "Coins"))
            .await
            .unwrap();
        assert_eq!(balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_embedded_store_has_no_raw_write() {
        let dir = tempdir().unwrap();
        let store = JsonBalanceStore::new(dir.path().join("balances.json")).unwrap();

        assert_eq!(store.backend(), BackendKind::Embedded);
        assert!(store.raw_writer().is_none());
    }

    #[tokio::test]
    async fn test_export_emits_one_line_per_balance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("balances.json");
        let store = JsonBalanceStore::new(&path).unwrap();
        let cause = Cause::new("Test");
        let coins = Currency::new("coins", "Coins");
        let gems = Currency::new("gems", "Gems");

        store
            .set_balance(player(1), Decimal::from(5), &coins, &cause)
            .await
            .unwrap();
        store
            .set_balance(player(1), Decimal::from(2), &gems, &cause)
            .await
            .unwrap();
        store
            .set_balance(player(2), Decimal::from(7), &coins, &cause)
            .await
            .unwrap();

        let lines = JsonBalanceStore::new(&path)
            .unwrap()
            .export_account_lines()
            .await
            .unwrap();
        assert_eq!(lines.len(), 3);

        let records: Vec<RawAccountRecord> = lines
            .iter()
            .map(|line| RawAccountRecord::decode(line).unwrap())
            .collect();
        assert_eq!(
            records[0],
            RawAccountRecord::new(player(1).to_string(), "5", "coins")
        );
        assert_eq!(records[1].currency_id, "gems");
        assert_eq!(records[2].player_id, player(2).to_string());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("balances.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonBalanceStore::new(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
