// Storage contracts for player balances.
//
// Backends are swapped at runtime from configuration, so the migration code
// holds them as trait objects. Optional operations are exposed as typed
// capabilities instead of being discovered by inspecting concrete types.

use super::economy_models::{BackendKind, Cause, Currency, StoreError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

// ============================================================================
// STORAGE TRAITS
// ============================================================================

/// The player balance store every backend implements.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Which backend this is.
    fn backend(&self) -> BackendKind;

    /// Get a player's balance in one currency. Unknown accounts read as zero.
    async fn get_balance(&self, player_id: Uuid, currency: &Currency)
        -> Result<Decimal, StoreError>;

    /// Overwrite a player's balance. Idempotent per call.
    async fn set_balance(
        &self,
        player_id: Uuid,
        amount: Decimal,
        currency: &Currency,
        cause: &Cause,
    ) -> Result<(), StoreError>;

    /// The raw-write capability, if this backend has one.
    fn raw_writer(&self) -> Option<&dyn RawDataWriter> {
        None
    }
}

/// Writes balances from their serialized, backend-agnostic form.
///
/// Values are validated here rather than by the caller, so one bad row fails
/// on its own write.
#[async_trait]
pub trait RawDataWriter: Send + Sync {
    async fn set_raw_data(
        &self,
        player_id: &str,
        amount: &str,
        currency: &Currency,
    ) -> Result<(), StoreError>;
}

/// Exports every stored balance as one encoded raw account line.
#[async_trait]
pub trait AccountExport: Send + Sync {
    async fn export_account_lines(&self) -> Result<Vec<String>, StoreError>;
}
