//! Rectangular ranges and the cell quota.

use std::fmt;

use crate::error::GatewayError;

use super::address::CellRef;

/// Cell quota for a single read (inclusive: 200 cells pass, 201 fail).
pub const DEFAULT_CELL_QUOTA: u64 = 200;

/// An inclusive, normalized rectangle of cells.
///
/// Only produced by [`RangeAddress`]; start <= end on both axes and the
/// cell count never exceeds the quota of the parser that built it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeBound {
    start: CellRef,
    end: CellRef,
    cell_count: u64,
}

impl RangeBound {
    fn from_corners(a: CellRef, b: CellRef) -> Self {
        let start = CellRef::new(a.row.min(b.row), a.column.min(b.column));
        let end = CellRef::new(a.row.max(b.row), a.column.max(b.column));
        let rows = (end.row - start.row) as u64 + 1;
        let columns = (end.column - start.column) as u64 + 1;
        Self {
            start,
            end,
            cell_count: rows.saturating_mul(columns),
        }
    }

    pub fn start_row(&self) -> u32 {
        self.start.row
    }

    pub fn start_column(&self) -> u32 {
        self.start.column
    }

    pub fn end_row(&self) -> u32 {
        self.end.row
    }

    pub fn end_column(&self) -> u32 {
        self.end.column
    }

    pub fn rows(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn columns(&self) -> u32 {
        self.end.column - self.start.column + 1
    }

    pub fn cell_count(&self) -> u64 {
        self.cell_count
    }

    pub fn start(&self) -> CellRef {
        self.start
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Normalized A1 notation (`B2:C3`, or `B2` for a single cell).
    pub fn to_a1(&self) -> String {
        if self.is_single_cell() {
            self.start.to_a1()
        } else {
            format!("{}:{}", self.start.to_a1(), self.end.to_a1())
        }
    }

    pub(crate) fn window(&self) -> CellWindow {
        CellWindow {
            start_row: self.start.row,
            start_column: self.start.column,
            num_rows: self.rows(),
            num_columns: self.columns(),
        }
    }
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// A block of cells addressed the way the page API takes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellWindow {
    pub start_row: u32,
    pub start_column: u32,
    pub num_rows: u32,
    pub num_columns: u32,
}

impl CellWindow {
    pub fn cell_count(&self) -> u64 {
        self.num_rows as u64 * self.num_columns as u64
    }

    pub fn to_args(self) -> Vec<serde_json::Value> {
        vec![
            self.start_row.into(),
            self.start_column.into(),
            self.num_rows.into(),
            self.num_columns.into(),
        ]
    }
}

/// Range parser bound to a cell quota.
#[derive(Debug, Clone, Copy)]
pub struct RangeAddress {
    quota: u64,
}

impl Default for RangeAddress {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_QUOTA)
    }
}

impl RangeAddress {
    pub fn new(quota: u64) -> Self {
        Self { quota }
    }

    pub fn quota(&self) -> u64 {
        self.quota
    }

    /// Parse `A1:B2` or `A1` and enforce the quota.
    pub fn parse(&self, text: &str) -> Result<RangeBound, GatewayError> {
        let bound = Self::parse_unchecked(text)?;
        if bound.cell_count() > self.quota {
            return Err(GatewayError::RangeTooLarge {
                range: bound.to_a1(),
                cells: bound.cell_count(),
                limit: self.quota,
            });
        }
        Ok(bound)
    }

    /// Parse several ranges; the quota applies to their combined cell count.
    pub fn parse_many<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<RangeBound>, GatewayError> {
        if texts.is_empty() {
            return Err(GatewayError::InvalidArguments(
                "at least one range is required".to_string(),
            ));
        }

        let bounds = texts
            .iter()
            .map(|t| self.parse(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let total: u64 = bounds.iter().map(RangeBound::cell_count).sum();
        if total > self.quota {
            let joined = bounds.iter().map(RangeBound::to_a1).collect::<Vec<_>>().join(", ");
            return Err(GatewayError::RangeTooLarge {
                range: joined,
                cells: total,
                limit: self.quota,
            });
        }
        Ok(bounds)
    }

    /// Parse a single cell reference; ranges are rejected.
    pub fn parse_cell(&self, text: &str) -> Result<CellRef, GatewayError> {
        if text.contains(':') {
            return Err(GatewayError::syntax(text, "expected a single cell, got a range"));
        }
        CellRef::parse(text)
    }

    fn parse_unchecked(text: &str) -> Result<RangeBound, GatewayError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::syntax(text, "empty range"));
        }

        let mut parts = trimmed.split(':');
        let first = parts.next().unwrap_or_default();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(GatewayError::syntax(text, "more than one ':'"));
        }

        let start = CellRef::parse(first).map_err(|e| relabel(e, text))?;
        let end = match second {
            Some(s) => CellRef::parse(s).map_err(|e| relabel(e, text))?,
            None => start,
        };
        Ok(RangeBound::from_corners(start, end))
    }
}

/// Report syntax errors against the full input rather than one half of it.
fn relabel(error: GatewayError, input: &str) -> GatewayError {
    match error {
        GatewayError::InvalidRangeSyntax { reason, .. } => GatewayError::syntax(input, reason),
        other => other,
    }
}
