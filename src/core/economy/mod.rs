// Economy module - player balances, currencies and the storage contracts

mod balance_store;
mod currency_registry;
mod economy_models;

pub use balance_store::{AccountExport, BalanceStore, RawDataWriter};
pub use currency_registry::{ConfiguredCurrencies, CurrencyRegistry};
pub use economy_models::{BackendKind, Cause, Currency, StoreError};
