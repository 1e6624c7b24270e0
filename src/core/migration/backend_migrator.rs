// Copies raw account records from the embedded store into another backend.

use super::migration_models::{MigrationError, MigrationMode, MigrationReport};
use super::raw_record::RawAccountRecord;
use crate::core::economy::{AccountExport, Currency, CurrencyRegistry, RawDataWriter};
use std::collections::HashMap;

pub struct BackendMigrator<'a> {
    source: &'a dyn AccountExport,
    destination: &'a dyn RawDataWriter,
    currencies: &'a dyn CurrencyRegistry,
}

impl<'a> BackendMigrator<'a> {
    pub fn new(
        source: &'a dyn AccountExport,
        destination: &'a dyn RawDataWriter,
        currencies: &'a dyn CurrencyRegistry,
    ) -> Self {
        Self {
            source,
            destination,
            currencies,
        }
    }

    /// Move every exported account.
    ///
    /// Lines that don't decode and records for unknown currencies are skipped.
    /// A failed write stops the run; rows written before it stay written.
    pub async fn run(&self) -> Result<MigrationReport, MigrationError> {
        let currencies: HashMap<String, Currency> = self
            .currencies
            .currencies()
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let lines = self.source.export_account_lines().await?;
        tracing::info!(accounts = lines.len(), "Exported accounts from embedded store");

        let mut report = MigrationReport::new(MigrationMode::ToSql);
        for line in &lines {
            let record = match RawAccountRecord::decode(line) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping account line that does not decode");
                    report.skipped += 1;
                    continue;
                }
            };

            let Some(currency) = currencies.get(&record.currency_id) else {
                tracing::warn!(
                    player_id = %record.player_id,
                    currency_id = %record.currency_id,
                    "Skipping account in unknown currency"
                );
                report.skipped += 1;
                continue;
            };

            self.destination
                .set_raw_data(&record.player_id, &record.amount, currency)
                .await?;
            tracing::debug!(
                player_id = %record.player_id,
                amount = %record.amount,
                currency_id = %currency.id,
                "Migrated account"
            );
            report.written += 1;
        }

        Ok(report)
    }
}
