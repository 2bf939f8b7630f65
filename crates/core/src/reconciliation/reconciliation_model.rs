//! Reconciliation result models.

use serde::{Deserialize, Serialize};

/// Result of a completed bulk import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub agency_id: String,
    pub imported: usize,
}

/// Result of linking an agency: credential stored and listings imported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkOutcome {
    pub agency_id: String,
    pub imported: usize,
}

impl From<ImportSummary> for LinkOutcome {
    fn from(summary: ImportSummary) -> Self {
        Self {
            agency_id: summary.agency_id,
            imported: summary.imported,
        }
    }
}
