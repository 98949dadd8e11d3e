//! Keyword search over the active sheet's used range.
//!
//! The used range is read in tiles of at most `quota` cells so no single
//! page evaluation is larger than an ordinary range read. Tiles span
//! whole row bands; a band wider than the quota is split into column
//! chunks and its matches are re-sorted, so results are always row-major
//! then column-major.
//!
//! A scan budget caps how many cells one search reads. The scan stops at
//! the last whole band that fits, and the result says so through
//! `scanComplete` and a `scannedRange` covering only what was read.

use serde_json::Value;
use tracing::{debug, warn};

use super::scripts;
use super::types::{CellRecord, MatchKind, RawBlock, SearchMatch, SearchResults, UsedRange, UsedRangeReply};
use crate::bridge::{evaluate_as, SheetPage};
use crate::error::GatewayError;
use crate::range::{column_to_letters, CellWindow};

pub struct SearchEngine<'a> {
    page: &'a dyn SheetPage,
    tile_cells: u64,
    scan_budget: u64,
}

impl<'a> SearchEngine<'a> {
    pub fn new(page: &'a dyn SheetPage, tile_cells: u64) -> Self {
        Self {
            page,
            tile_cells: tile_cells.max(1),
            scan_budget: u64::MAX,
        }
    }

    /// Stop after roughly `cells` cells. The first band is always read.
    pub fn with_scan_budget(mut self, cells: u64) -> Self {
        self.scan_budget = cells.max(1);
        self
    }

    /// Find `keyword` in the active sheet. Returns at most `max_results`
    /// matches; `total` counts every match.
    pub async fn search(
        &self,
        keyword: &str,
        mode: MatchKind,
        max_results: usize,
    ) -> Result<SearchResults, GatewayError> {
        if keyword.is_empty() {
            return Err(GatewayError::InvalidArguments(
                "keyword must not be empty".to_string(),
            ));
        }

        let used: Option<UsedRangeReply> = evaluate_as(self.page, scripts::USED_RANGE, vec![]).await?;
        let Some(used) = used else {
            return Ok(SearchResults {
                keyword: keyword.to_string(),
                mode,
                sheet_name: None,
                scanned_range: None,
                scan_complete: true,
                total: 0,
                returned: 0,
                truncated: false,
                matches: Vec::new(),
            });
        };

        let needle = keyword.to_lowercase();
        let mut matches = Vec::new();
        let mut total = 0usize;
        let mut scanned = 0u64;
        let mut last_row = used.range.start_row;
        let mut scan_complete = true;

        for band in tiles(&used.range, self.tile_cells) {
            let band_cells: u64 = band.iter().map(CellWindow::cell_count).sum();
            if scanned > 0 && scanned + band_cells > self.scan_budget {
                scan_complete = false;
                break;
            }
            scanned += band_cells;
            if let Some(first) = band.first() {
                last_row = first.start_row + first.num_rows - 1;
            }

            let mut found = Vec::new();
            for window in band {
                let block: RawBlock =
                    evaluate_as(self.page, scripts::READ_RANGE, window.to_args()).await?;
                block.check_fits(&window)?;
                scan_block(&block, &window, &needle, mode, &mut found);
            }
            found.sort_by_key(|m: &SearchMatch| (m.row, m.column));

            total += found.len();
            let room = max_results.saturating_sub(matches.len());
            matches.extend(found.into_iter().take(room));
        }

        if scan_complete {
            debug!(keyword, %mode, total, scanned, "search finished");
        } else {
            warn!(keyword, %mode, total, scanned, budget = self.scan_budget, "search stopped at scan budget");
        }
        let read = UsedRange {
            end_row: last_row,
            ..used.range
        };

        let returned = matches.len();
        Ok(SearchResults {
            keyword: keyword.to_string(),
            mode,
            sheet_name: Some(used.sheet_name),
            scanned_range: Some(used_range_a1(&read)),
            scan_complete,
            total,
            returned,
            truncated: total > returned,
            matches,
        })
    }
}

/// Split a used range into row bands of tiles holding at most
/// `tile_cells` cells each.
pub(crate) fn tiles(used: &UsedRange, tile_cells: u64) -> Vec<Vec<CellWindow>> {
    let tile_cells = tile_cells.max(1);
    let rows = used.end_row.saturating_sub(used.start_row) as u64 + 1;
    let columns = used.end_column.saturating_sub(used.start_column) as u64 + 1;

    let chunk_width = columns.min(tile_cells);
    let band_height = (tile_cells / chunk_width).max(1);

    let mut bands = Vec::new();
    let mut row = 0u64;
    while row < rows {
        let height = band_height.min(rows - row);
        let mut band = Vec::new();
        let mut column = 0u64;
        while column < columns {
            let width = chunk_width.min(columns - column);
            band.push(CellWindow {
                start_row: used.start_row + row as u32,
                start_column: used.start_column + column as u32,
                num_rows: height as u32,
                num_columns: width as u32,
            });
            column += width;
        }
        bands.push(band);
        row += height;
    }
    bands
}

fn scan_block(
    block: &RawBlock,
    window: &CellWindow,
    needle: &str,
    mode: MatchKind,
    out: &mut Vec<SearchMatch>,
) {
    for r in 0..window.num_rows as usize {
        for c in 0..window.num_columns as usize {
            let value = block.value(r, c);
            let formula = block.formula(r, c);
            let text = match mode {
                MatchKind::Value => display_text(&value),
                MatchKind::Formula => formula.clone(),
            };
            let Some(text) = text else { continue };
            if !text.to_lowercase().contains(needle) {
                continue;
            }

            let cell = CellRecord::new(
                window.start_row + r as u32,
                window.start_column + c as u32,
                value,
                formula,
            );
            out.push(SearchMatch {
                row: cell.row,
                column: cell.column,
                address: cell.address,
                text,
                kind: mode,
                value: cell.value,
                formula: cell.formula,
            });
        }
    }
}

/// The text a value shows in the grid, `None` for empty cells.
pub(crate) fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn used_range_a1(used: &UsedRange) -> String {
    format!(
        "{}{}:{}{}",
        column_to_letters(used.start_column),
        used.start_row as u64 + 1,
        column_to_letters(used.end_column),
        used.end_row as u64 + 1
    )
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
