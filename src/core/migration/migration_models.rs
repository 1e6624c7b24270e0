use super::config_tree::ConfigError;
use crate::core::economy::StoreError;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// REQUEST
// ============================================================================

/// Where balances are migrated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationMode {
    /// Import balances from a TotalEconomy `accounts.conf`.
    TotalEconomy,
    /// Copy every account from the embedded store into the active SQL backend.
    ToSql,
}

impl MigrationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationMode::TotalEconomy => "totaleconomy",
            MigrationMode::ToSql => "tomysql",
        }
    }
}

impl fmt::Display for MigrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationMode {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("totaleconomy") {
            Ok(MigrationMode::TotalEconomy)
        } else if s.eq_ignore_ascii_case("tomysql") {
            Ok(MigrationMode::ToSql)
        } else {
            Err(MigrationError::UnknownMode(s.to_string()))
        }
    }
}

/// What the front end received from the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationRequest {
    pub mode: Option<String>,
    pub confirm: Option<bool>,
}

#[cfg(test)]
impl MigrationRequest {
    pub fn new(mode: impl Into<String>, confirm: Option<bool>) -> Self {
        Self {
            mode: Some(mode.into()),
            confirm,
        }
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Counts from a finished migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub mode: MigrationMode,
    pub written: usize,
    pub skipped: usize,
}

impl MigrationReport {
    pub fn new(mode: MigrationMode) -> Self {
        Self {
            mode,
            written: 0,
            skipped: 0,
        }
    }
}

/// Terminal result of one invocation.
#[derive(Debug)]
pub enum MigrationOutcome {
    MissingMode,
    /// A mode was given without confirmation; nothing was touched.
    ConfirmationRequired { mode: String },
    UnknownMode { mode: String },
    Completed(MigrationReport),
    /// The run failed. `error` is for logs and tests, callers only see a
    /// generic message.
    Failed {
        mode: MigrationMode,
        error: MigrationError,
    },
}

impl MigrationOutcome {
    /// Key for the external message catalogue.
    pub fn message_key(&self) -> &'static str {
        match self {
            MigrationOutcome::MissingMode | MigrationOutcome::UnknownMode { .. } => {
                "command.migrate.nomode"
            }
            MigrationOutcome::ConfirmationRequired { .. } => "command.migrate.confirm",
            MigrationOutcome::Completed(_) => "command.migrate.completed",
            MigrationOutcome::Failed { .. } => "command.migrate.fail",
        }
    }

    /// Default English text for the outcome.
    pub fn message(&self) -> &'static str {
        match self {
            MigrationOutcome::MissingMode | MigrationOutcome::UnknownMode { .. } => {
                "Please specify a migration mode: totaleconomy or tomysql."
            }
            MigrationOutcome::ConfirmationRequired { .. } => {
                "Migrating will overwrite existing balances. Run the command again with confirm set to true to continue."
            }
            MigrationOutcome::Completed(_) => "Migration completed.",
            MigrationOutcome::Failed { .. } => "Migration failed! Check the console for details.",
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The legacy document is missing, unreadable or malformed.
    #[error("Legacy balance file: {0}")]
    Config(#[from] ConfigError),
    /// The active backend cannot receive a backend migration.
    #[error("Backend not eligible for migration: {0}")]
    Precondition(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Unknown migration mode '{0}'")]
    UnknownMode(String),
}
