// Flat text form of one balance, used to move accounts between backends.

use std::fmt;
use std::str::FromStr;

/// Separator between fields. Never appears in a UUID, a decimal or a
/// currency id.
pub const FIELD_DELIMITER: &str = "%-%";

/// One player's balance in one currency, as untyped strings.
///
/// Only lives for the duration of a migration; the amount and player id are
/// validated by whichever backend writes the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccountRecord {
    pub player_id: String,
    pub amount: String,
    pub currency_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 3 fields separated by '%-%', found {found} in '{line}'")]
pub struct FormatError {
    pub line: String,
    pub found: usize,
}

impl RawAccountRecord {
    pub fn new(
        player_id: impl Into<String>,
        amount: impl Into<String>,
        currency_id: impl Into<String>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            amount: amount.into(),
            currency_id: currency_id.into(),
        }
    }

    /// Join the fields with `%-%`.
    ///
    /// Fields are not escaped. Decoding only gives back the same record when no
    /// field contains `%`: a field ending in `%-` or starting with `-%` shifts
    /// the split point. UUIDs and decimals never do, and currency ids are
    /// checked when the registry is built.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(line: &str) -> Result<Self, FormatError> {
        line.parse()
    }
}

impl fmt::Display for RawAccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.player_id, self.amount, self.currency_id
        )
    }
}

impl FromStr for RawAccountRecord {
    type Err = FormatError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        match fields.as_slice() {
            [player_id, amount, currency_id] => {
                Ok(Self::new(*player_id, *amount, *currency_id))
            }
            _ => Err(FormatError {
                line: line.to_string(),
                found: fields.len(),
            }),
        }
    }
}
