// Migration module - moving balances into the active backend

mod backend_migrator;
pub mod config_tree;
pub mod legacy_balances;
pub mod migration_models;
mod migration_service;
pub mod raw_record;

#[cfg(test)]
pub(crate) mod test_support;

pub use migration_models::{MigrationOutcome, MigrationRequest};
pub use migration_service::MigrationService;
pub use raw_record::RawAccountRecord;
