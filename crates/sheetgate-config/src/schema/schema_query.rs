//! Query limits.

use serde::{Deserialize, Serialize};

/// Limits applied by the query service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Cell quota for a single range read (inclusive).
    #[serde(default = "default_max_cells")]
    pub max_cells: u64,

    /// Default cap on returned search matches.
    #[serde(default = "default_search_max_results")]
    pub search_max_results: usize,

    /// Cells one search may read before it stops and reports a partial scan.
    #[serde(default = "default_search_max_cells")]
    pub search_max_cells: u64,

    /// Delay between a scroll and the screenshot that follows it.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Number of sheet names included in the status snapshot.
    #[serde(default = "default_status_sheet_preview")]
    pub status_sheet_preview: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_cells: default_max_cells(),
            search_max_results: default_search_max_results(),
            search_max_cells: default_search_max_cells(),
            settle_delay_ms: default_settle_delay_ms(),
            status_sheet_preview: default_status_sheet_preview(),
        }
    }
}

fn default_max_cells() -> u64 {
    200
}

fn default_search_max_results() -> usize {
    50
}

fn default_search_max_cells() -> u64 {
    100_000
}

fn default_settle_delay_ms() -> u64 {
    300
}

fn default_status_sheet_preview() -> usize {
    10
}
