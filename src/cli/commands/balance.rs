// Balance command - prints one player's balance from the active backend.

use super::Data;
use anyhow::Context;
use uuid::Uuid;

pub async fn balance(
    data: &Data,
    player: Uuid,
    currency: Option<String>,
) -> anyhow::Result<String> {
    let currency = match currency {
        Some(id) => data
            .currencies
            .currencies()
            .into_iter()
            .find(|c| c.id == id)
            .with_context(|| format!("Unknown currency '{id}'"))?,
        None => data.currencies.default_currency(),
    };

    let amount = data.balances.get_balance(player, &currency).await?;
    Ok(format!("{player}: {amount} {}", currency.display_name))
}
