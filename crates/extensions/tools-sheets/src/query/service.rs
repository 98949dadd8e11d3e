//! The gateway's read-only operation set.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use sheetgate_config::QueryConfig;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::result::{Operation, QueryOutput, QueryResult};
use super::scripts;
use super::search::SearchEngine;
use super::types::{ActivityStatus, MatchKind, RangeData, RangeGrid, RawBlock, ScrollCapture, SheetList};
use crate::bridge::{evaluate_as, SheetPage};
use crate::error::GatewayError;
use crate::range::RangeAddress;

type Outcome = Result<(QueryOutput, Option<String>), GatewayError>;

/// Runs the five query operations against one page.
///
/// Operations never return `Err`: every failure becomes a failed
/// [`QueryResult`] carrying its error code. Operations are serialized
/// end to end, so a multi-step read (values then styles then screenshot)
/// sees one state of the sheet.
pub struct SheetQueryService {
    page: Arc<dyn SheetPage>,
    config: QueryConfig,
    ranges: RangeAddress,
    op_lock: Mutex<()>,
}

impl SheetQueryService {
    pub fn new(page: Arc<dyn SheetPage>, config: QueryConfig) -> Self {
        let ranges = RangeAddress::new(config.max_cells);
        Self {
            page,
            config,
            ranges,
            op_lock: Mutex::new(()),
        }
    }

    pub fn page(&self) -> &Arc<dyn SheetPage> {
        &self.page
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Workbook summary, selection and optionally a screenshot.
    pub async fn get_activity_status(&self, include_screenshot: bool) -> QueryResult {
        let started = Instant::now();
        let outcome = self.activity_status(include_screenshot).await;
        self.finish(Operation::GetActivityStatus, "", started, outcome)
    }

    /// Read one range.
    pub async fn get_range_data(
        &self,
        range: &str,
        include_screenshot: bool,
        include_style: bool,
    ) -> QueryResult {
        self.get_ranges_data(&[range], include_screenshot, include_style)
            .await
    }

    /// Read several ranges. The quota covers their combined cell count and
    /// is checked before the page is touched.
    pub async fn get_ranges_data<S: AsRef<str> + Sync>(
        &self,
        ranges: &[S],
        include_screenshot: bool,
        include_style: bool,
    ) -> QueryResult {
        let started = Instant::now();
        let target = ranges
            .iter()
            .map(|r| r.as_ref().trim())
            .collect::<Vec<_>>()
            .join(",");
        let outcome = self
            .range_data(ranges, include_screenshot, include_style)
            .await;
        self.finish(Operation::GetRangeData, &target, started, outcome)
    }

    /// Every sheet in workbook order.
    pub async fn get_sheets(&self) -> QueryResult {
        let started = Instant::now();
        let outcome = self.sheets().await;
        self.finish(Operation::GetSheets, "", started, outcome)
    }

    /// Search the active sheet. `max_results` defaults to the configured
    /// limit.
    pub async fn search_cells(
        &self,
        keyword: &str,
        mode: MatchKind,
        max_results: Option<usize>,
    ) -> QueryResult {
        let started = Instant::now();
        let outcome = self.search(keyword, mode, max_results).await;
        self.finish(Operation::SearchCells, keyword, started, outcome)
    }

    /// Bring a cell into view, let the grid repaint, then capture it.
    pub async fn scroll_and_screenshot(&self, cell: &str) -> QueryResult {
        let started = Instant::now();
        let outcome = self.scroll(cell).await;
        self.finish(Operation::ScrollAndScreenshot, cell.trim(), started, outcome)
    }

    fn ensure_started(&self) -> Result<(), GatewayError> {
        if self.page.is_started() {
            Ok(())
        } else {
            Err(GatewayError::BrowserNotStarted)
        }
    }

    async fn capture(&self, wanted: bool) -> Result<Option<String>, GatewayError> {
        if wanted {
            Ok(Some(self.page.screenshot().await?))
        } else {
            Ok(None)
        }
    }

    async fn activity_status(&self, include_screenshot: bool) -> Outcome {
        self.ensure_started()?;
        let _op = self.op_lock.lock().await;

        let preview = Value::from(self.config.status_sheet_preview);
        let status: ActivityStatus =
            evaluate_as(self.page.as_ref(), scripts::ACTIVITY_STATUS, vec![preview]).await?;
        let screenshot = self.capture(include_screenshot).await?;
        Ok((QueryOutput::Status(status), screenshot))
    }

    async fn range_data<S: AsRef<str> + Sync>(
        &self,
        ranges: &[S],
        include_screenshot: bool,
        include_style: bool,
    ) -> Outcome {
        let bounds = self.ranges.parse_many(ranges)?;
        self.ensure_started()?;
        let _op = self.op_lock.lock().await;

        let mut grids = Vec::with_capacity(bounds.len());
        for bound in &bounds {
            let args = bound.window().to_args();
            let block: RawBlock =
                evaluate_as(self.page.as_ref(), scripts::READ_RANGE, args.clone()).await?;
            let styles: Option<Vec<Vec<Value>>> = if include_style {
                Some(evaluate_as(self.page.as_ref(), scripts::READ_STYLES, args).await?)
            } else {
                None
            };
            grids.push(RangeGrid::from_block(bound, &block, styles.as_deref())?);
        }

        let total_cells = bounds.iter().map(|b| b.cell_count()).sum();
        let screenshot = self.capture(include_screenshot).await?;
        Ok((
            QueryOutput::RangeData(RangeData {
                ranges: grids,
                total_cells,
            }),
            screenshot,
        ))
    }

    async fn sheets(&self) -> Outcome {
        self.ensure_started()?;
        let _op = self.op_lock.lock().await;

        let list: SheetList = evaluate_as(self.page.as_ref(), scripts::LIST_SHEETS, vec![]).await?;
        Ok((QueryOutput::SheetList(list), None))
    }

    async fn search(&self, keyword: &str, mode: MatchKind, max_results: Option<usize>) -> Outcome {
        if keyword.is_empty() {
            return Err(GatewayError::InvalidArguments(
                "keyword must not be empty".to_string(),
            ));
        }
        if max_results == Some(0) {
            return Err(GatewayError::InvalidArguments(
                "max_results must be at least 1".to_string(),
            ));
        }
        let max_results = max_results.unwrap_or(self.config.search_max_results);
        self.ensure_started()?;
        let _op = self.op_lock.lock().await;

        let results = SearchEngine::new(self.page.as_ref(), self.config.max_cells)
            .with_scan_budget(self.config.search_max_cells)
            .search(keyword, mode, max_results)
            .await?;
        Ok((QueryOutput::SearchResults(results), None))
    }

    async fn scroll(&self, cell: &str) -> Outcome {
        let target = self.ranges.parse_cell(cell)?;
        self.ensure_started()?;
        let _op = self.op_lock.lock().await;

        let args = vec![Value::from(target.row), Value::from(target.column)];
        let shown: String = evaluate_as(self.page.as_ref(), scripts::SCROLL_TO_CELL, args).await?;

        // Rendering has no completion event to await.
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        let screenshot = self.page.screenshot().await?;

        let cell = target.to_a1();
        debug!(cell = %cell, shown = %shown, "scrolled");
        Ok((
            QueryOutput::Screenshot(ScrollCapture {
                message: format!("Scrolled to {}", cell),
                cell,
            }),
            Some(screenshot),
        ))
    }

    fn finish(&self, operation: Operation, target: &str, started: Instant, outcome: Outcome) -> QueryResult {
        let duration_ms = started.elapsed().as_millis() as u64;
        let result = match outcome {
            Ok((data, screenshot)) => QueryResult::ok(operation, data, screenshot),
            Err(e) => {
                warn!(operation = %operation, target, code = %e.code(), "{}", e);
                QueryResult::failed(operation, &e)
            }
        };

        let outcome = result
            .error_code()
            .map(|c| c.as_str())
            .unwrap_or("success");
        info!(
            target: "audit",
            operation = operation.as_str(),
            target = target,
            result = outcome,
            duration_ms,
            "tool call"
        );
        result
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
