//! Typed shapes for page results and the records built from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;
use crate::range::{column_to_letters, CellWindow, RangeBound};

/// Current selection on the active sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInfo {
    pub range: String,
    pub start_row: u32,
    pub start_column: u32,
    pub num_rows: u32,
    pub num_columns: u32,
}

/// Workbook snapshot returned by `get_activity_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatus {
    #[serde(default)]
    pub workbook_id: Option<String>,
    #[serde(default)]
    pub workbook_name: Option<String>,
    pub sheet_count: usize,
    pub sheet_names: Vec<String>,
    pub active_sheet_name: String,
    pub active_sheet_id: String,
    pub selection: Option<SelectionInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    pub name: String,
    pub id: String,
    pub index: u32,
    pub hidden: bool,
    pub row_count: u32,
    pub column_count: u32,
}

/// All sheets in workbook order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetList {
    pub active_sheet: String,
    pub sheets: Vec<SheetInfo>,
}

impl SheetList {
    pub fn names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Values and formulas of one block, as the page returns them.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawBlock {
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
    #[serde(default)]
    pub formulas: Vec<Vec<Option<String>>>,
}

impl RawBlock {
    /// Reject blocks larger than the window they were read for. Missing
    /// trailing rows or cells are empty cells.
    pub fn check_fits(&self, window: &CellWindow) -> Result<(), GatewayError> {
        let too_tall = self.values.len() > window.num_rows as usize
            || self.formulas.len() > window.num_rows as usize;
        let too_wide = self
            .values
            .iter()
            .map(Vec::len)
            .chain(self.formulas.iter().map(Vec::len))
            .any(|len| len > window.num_columns as usize);

        if too_tall || too_wide {
            return Err(GatewayError::PageEvaluation(format!(
                "page returned a block larger than the requested {}x{} cells",
                window.num_rows, window.num_columns
            )));
        }
        Ok(())
    }

    pub fn value(&self, row: usize, column: usize) -> Value {
        self.values
            .get(row)
            .and_then(|r| r.get(column))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn formula(&self, row: usize, column: usize) -> Option<String> {
        self.formulas
            .get(row)
            .and_then(|r| r.get(column))
            .cloned()
            .flatten()
            .filter(|f| !f.is_empty())
    }
}

/// Bounding rectangle of the non-empty cells on the active sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsedRange {
    pub start_row: u32,
    pub start_column: u32,
    pub end_row: u32,
    pub end_column: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsedRangeReply {
    pub sheet_name: String,
    #[serde(flatten)]
    pub range: UsedRange,
}

/// One addressed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub row: u32,
    pub column: u32,
    pub address: String,
    pub value: Value,
    pub formula: Option<String>,
    /// `None` when styles were not requested. A requested but unstyled
    /// cell holds `Some(Value::Null)` and serializes as `"style": null`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub style: Option<Value>,
}

/// Keeps an explicit `null` distinct from a missing key.
fn present_value<'de, D: serde::Deserializer<'de>>(de: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(de).map(Some)
}

impl CellRecord {
    pub fn new(row: u32, column: u32, value: Value, formula: Option<String>) -> Self {
        Self {
            row,
            column,
            address: format!("{}{}", column_to_letters(column), row as u64 + 1),
            value,
            formula,
            style: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.formula.is_none()
            && match &self.value {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                _ => false,
            }
    }
}

/// A rectangular read, row-major, exactly the shape of its bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeGrid {
    pub range: String,
    pub start_row: u32,
    pub start_column: u32,
    pub num_rows: u32,
    pub num_columns: u32,
    pub rows: Vec<Vec<CellRecord>>,
}

impl RangeGrid {
    /// Shape a page block into a full grid for `bound`.
    pub(crate) fn from_block(
        bound: &RangeBound,
        block: &RawBlock,
        styles: Option<&[Vec<Value>]>,
    ) -> Result<Self, GatewayError> {
        let window = bound.window();
        block.check_fits(&window)?;

        let rows = (0..window.num_rows as usize)
            .map(|r| {
                (0..window.num_columns as usize)
                    .map(|c| {
                        let mut cell = CellRecord::new(
                            window.start_row + r as u32,
                            window.start_column + c as u32,
                            block.value(r, c),
                            block.formula(r, c),
                        );
                        if let Some(styles) = styles {
                            cell.style = Some(
                                styles
                                    .get(r)
                                    .and_then(|row| row.get(c))
                                    .cloned()
                                    .unwrap_or(Value::Null),
                            );
                        }
                        cell
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            range: bound.to_a1(),
            start_row: window.start_row,
            start_column: window.start_column,
            num_rows: window.num_rows,
            num_columns: window.num_columns,
            rows,
        })
    }

    /// Display values, row-major.
    pub fn values(&self) -> Vec<Vec<Value>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.value.clone()).collect())
            .collect()
    }

    pub fn cell_count(&self) -> u64 {
        self.num_rows as u64 * self.num_columns as u64
    }
}

/// Output of `get_range_data`: one grid per requested range, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeData {
    pub ranges: Vec<RangeGrid>,
    pub total_cells: u64,
}

/// Which field a search compares against. Parsing ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MatchKind {
    Value,
    Formula,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Value => "value",
            MatchKind::Formula => "formula",
        }
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for MatchKind {
    type Error = GatewayError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl std::str::FromStr for MatchKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(MatchKind::Value),
            "formula" => Ok(MatchKind::Formula),
            other => Err(GatewayError::InvalidArguments(format!(
                "find_by must be 'value' or 'formula', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub row: u32,
    pub column: u32,
    pub address: String,
    /// The text the keyword was found in.
    pub text: String,
    pub kind: MatchKind,
    pub value: Value,
    pub formula: Option<String>,
}

/// Output of `search_cells`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub keyword: String,
    pub mode: MatchKind,
    pub sheet_name: Option<String>,
    /// The part of the used range that was read, `None` for an empty sheet.
    pub scanned_range: Option<String>,
    /// False when the scan budget ran out before the used range did.
    pub scan_complete: bool,
    /// Every match in `scanned_range`, even past `max_results`.
    pub total: usize,
    pub returned: usize,
    pub truncated: bool,
    pub matches: Vec<SearchMatch>,
}

/// Output of `scroll_and_screenshot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollCapture {
    pub cell: String,
    pub message: String,
}
