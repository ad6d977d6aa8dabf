//! Bulk import report

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of a CSV upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of books created
    pub created: usize,
    /// Whether all rows were committed in a single transaction
    pub atomic: bool,
}
