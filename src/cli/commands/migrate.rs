// Migrate command
//
// 1. Hand the raw mode/confirm arguments to the migration service
// 2. Turn the outcome into operator-facing text
//
// Failures only ever show the generic message; the cause is in the log.

use super::Data;
use crate::core::migration::{MigrationOutcome, MigrationRequest};

pub async fn migrate(data: &Data, mode: Option<String>, confirm: Option<bool>) -> String {
    let outcome = data.migration.run(MigrationRequest { mode, confirm }).await;
    tracing::info!(message_key = outcome.message_key(), "Migrate command finished");
    format_outcome(&outcome)
}

fn format_outcome(outcome: &MigrationOutcome) -> String {
    match outcome {
        MigrationOutcome::Completed(report) => format!(
            "{} {} balance(s) written, {} skipped.",
            outcome.message(),
            report.written,
            report.skipped
        ),
        _ => outcome.message().to_string(),
    }
}
