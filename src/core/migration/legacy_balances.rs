// Pulls per-player balances out of a TotalEconomy `accounts.conf` tree.
//
// Top-level keys are player UUIDs. Under each player, any key whose name
// contains "balance" holds a balance (the old plugin suffixed or prefixed it
// per currency, e.g. `dollar-balance`), so matching is by substring.

use super::config_tree::ConfigNode;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Location of the legacy accounts file under the import base directory.
pub const LEGACY_ACCOUNTS_PATH: &str = "totaleconomy/accounts.conf";

const BALANCE_KEY_MARKER: &str = "balance";

/// One balance read from the legacy document, in the default currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRecord {
    pub player_id: Uuid,
    pub amount: Decimal,
}

/// Lazily yield every balance in the document.
///
/// Subtrees whose key is not a UUID are skipped, as are balance keys without
/// a numeric leaf value. When one player has several balance keys, each one
/// is yielded in key order, so the last key wins once they are written.
pub fn extract_balances(root: &ConfigNode) -> impl Iterator<Item = BalanceRecord> + '_ {
    player_nodes(root).flat_map(|(player_id, node)| {
        node.children()
            .filter(|(key, _)| key.contains(BALANCE_KEY_MARKER))
            .filter_map(move |(_, leaf)| {
                leaf.as_number()
                    .map(|amount| BalanceRecord { player_id, amount })
            })
    })
}

/// Count top-level keys that are not player ids.
pub fn count_non_player_keys(root: &ConfigNode) -> usize {
    root.child_keys()
        .filter(|key| Uuid::parse_str(key).is_err())
        .count()
}

fn player_nodes(root: &ConfigNode) -> impl Iterator<Item = (Uuid, &ConfigNode)> {
    root.children().filter_map(|(key, node)| match Uuid::parse_str(key) {
        Ok(player_id) => Some((player_id, node)),
        Err(_) => {
            tracing::debug!(key, "Skipping legacy entry that is not a player id");
            None
        }
    })
}
