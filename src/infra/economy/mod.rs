// Economy infrastructure - balance store implementations

mod json_balance_store;
mod sql_balance_store;

pub use json_balance_store::JsonBalanceStore;
pub use sql_balance_store::SqlBalanceStore;
