// Domain models shared by every balance backend.
//
// Like the rest of `core/`, nothing in here knows about files, SQL or the CLI.
// Player ids are UUIDs and amounts are exact decimals so balances survive a
// trip between backends without float drift.

use std::fmt;
use std::str::FromStr;

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// A currency the economy understands.
///
/// `id` is the stable identifier stored next to every balance; the display
/// name is only used when printing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency {
    pub id: String,
    pub display_name: String,
}

impl Currency {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Audit tag attached to a balance write.
///
/// Ordinary transactions and migration writes go through the same
/// `set_balance` contract; the cause lets downstream consumers tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    pub reason: String,
}

impl Cause {
    pub const MIGRATION: &'static str = "Migration";

    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The marker used for every write performed by a migration run.
    pub fn migration() -> Self {
        Self::new(Self::MIGRATION)
    }

    pub fn is_migration(&self) -> bool {
        self.reason == Self::MIGRATION
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Which kind of player-balance backend is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The simple file-backed store that ships enabled by default.
    Embedded,
    /// A networked SQL database shared between servers.
    Sql,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Embedded => f.write_str("embedded"),
            BackendKind::Sql => f.write_str("sql"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embedded" | "json" | "file" => Ok(BackendKind::Embedded),
            "sql" | "mysql" => Ok(BackendKind::Sql),
            other => Err(format!("unknown balance backend '{other}'")),
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
