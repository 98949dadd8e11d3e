//! In-memory [`SheetPage`] for tests.
//!
//! `FakeWorkbook` answers the gateway's page scripts from a small model of
//! a workbook, records every evaluation, and tracks how many evaluations
//! overlap so tests can observe serialization.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::bridge::SheetPage;
use crate::error::GatewayError;
use crate::query::scripts;
use crate::range::{column_to_letters, CellRef};

/// 1x1 transparent PNG.
pub const BLANK_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[derive(Debug, Clone, PartialEq)]
pub struct FakeCell {
    pub value: Value,
    pub formula: Option<String>,
    pub style: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct FakeSheet {
    pub name: String,
    pub id: String,
    pub hidden: bool,
    pub row_count: u32,
    pub column_count: u32,
    pub cells: BTreeMap<(u32, u32), FakeCell>,
}

impl FakeSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: format!("sheet-{}", name.to_lowercase().replace(' ', "-")),
            hidden: false,
            row_count: 1000,
            column_count: 20,
            cells: BTreeMap::new(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set a plain value. Panics on a malformed fixture address.
    pub fn value(mut self, a1: &str, value: impl Into<Value>) -> Self {
        let at = fixture_cell(a1);
        self.cells.insert(
            (at.row, at.column),
            FakeCell {
                value: value.into(),
                formula: None,
                style: None,
            },
        );
        self
    }

    /// Set a formula together with its computed value.
    pub fn formula(mut self, a1: &str, formula: &str, value: impl Into<Value>) -> Self {
        let at = fixture_cell(a1);
        self.cells.insert(
            (at.row, at.column),
            FakeCell {
                value: value.into(),
                formula: Some(formula.to_string()),
                style: None,
            },
        );
        self
    }

    pub fn style(mut self, a1: &str, style: Value) -> Self {
        let at = fixture_cell(a1);
        self.cells
            .entry((at.row, at.column))
            .or_insert(FakeCell {
                value: Value::Null,
                formula: None,
                style: None,
            })
            .style = Some(style);
        self
    }

    fn cell(&self, row: u32, column: u32) -> Option<&FakeCell> {
        self.cells.get(&(row, column))
    }

    fn used_range(&self) -> Option<(u32, u32, u32, u32)> {
        let occupied = self
            .cells
            .iter()
            .filter(|(_, c)| !c.value.is_null() || c.formula.is_some())
            .map(|(k, _)| *k);
        occupied.fold(None, |acc, (r, c)| match acc {
            None => Some((r, c, r, c)),
            Some((r0, c0, r1, c1)) => Some((r0.min(r), c0.min(c), r1.max(r), c1.max(c))),
        })
    }
}

fn fixture_cell(a1: &str) -> CellRef {
    match CellRef::parse(a1) {
        Ok(cell) => cell,
        Err(e) => panic!("bad fixture cell '{}': {}", a1, e),
    }
}

#[derive(Debug, Default)]
struct Model {
    sheets: Vec<FakeSheet>,
    active: usize,
    selection: Option<(u32, u32, u32, u32)>,
    scrolled_to: Option<(u32, u32)>,
    fail_with: Option<String>,
    log: Vec<String>,
}

/// Scripted spreadsheet page.
pub struct FakeWorkbook {
    model: Mutex<Model>,
    started: AtomicBool,
    evaluations: AtomicUsize,
    screenshots: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    latency: Duration,
}

impl Default for FakeWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWorkbook {
    /// A started workbook with one empty sheet named `Sheet1`.
    pub fn new() -> Self {
        Self {
            model: Mutex::new(Model {
                sheets: vec![FakeSheet::new("Sheet1")],
                ..Default::default()
            }),
            started: AtomicBool::new(true),
            evaluations: AtomicUsize::new(0),
            screenshots: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            latency: Duration::ZERO,
        }
    }

    /// Replace all sheets; the first becomes active.
    pub fn with_sheets(self, sheets: Vec<FakeSheet>) -> Self {
        {
            let mut model = self.model.lock();
            model.sheets = sheets;
            model.active = 0;
        }
        self
    }

    pub fn with_sheet(self, sheet: FakeSheet) -> Self {
        self.with_sheets(vec![sheet])
    }

    pub fn with_active(self, index: usize) -> Self {
        self.model.lock().active = index;
        self
    }

    pub fn with_selection(self, a1_start: &str, rows: u32, columns: u32) -> Self {
        let at = fixture_cell(a1_start);
        self.model.lock().selection = Some((at.row, at.column, rows, columns));
        self
    }

    /// Each evaluation sleeps this long, which widens overlap windows.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Start in the stopped state.
    pub fn stopped(self) -> Self {
        self.started.store(false, Ordering::SeqCst);
        self
    }

    /// Make every following evaluation throw `message`.
    pub fn fail_with(&self, message: &str) {
        self.model.lock().fail_with = Some(message.to_string());
    }

    /// Overwrite one cell of the active sheet while the page is live.
    pub fn set_value(&self, a1: &str, value: impl Into<Value>) {
        let at = fixture_cell(a1);
        let mut model = self.model.lock();
        let active = model.active;
        if let Some(sheet) = model.sheets.get_mut(active) {
            sheet.cells.insert(
                (at.row, at.column),
                FakeCell {
                    value: value.into(),
                    formula: None,
                    style: None,
                },
            );
        }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    pub fn screenshots(&self) -> usize {
        self.screenshots.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Names of the scripts evaluated so far, oldest first.
    pub fn script_log(&self) -> Vec<String> {
        self.model.lock().log.clone()
    }

    /// The cell most recently scrolled to, in A1 notation.
    pub fn scrolled_to(&self) -> Option<String> {
        self.model
            .lock()
            .scrolled_to
            .map(|(r, c)| format!("{}{}", column_to_letters(c), r + 1))
    }

    fn dispatch(&self, function: &str, args: &[Value]) -> Result<Value, GatewayError> {
        let mut model = self.model.lock();
        let name = script_name(function);
        model.log.push(name.to_string());

        if let Some(message) = &model.fail_with {
            return Err(GatewayError::PageEvaluation(message.clone()));
        }

        let arg = |i: usize| -> Result<u32, GatewayError> {
            args.get(i)
                .and_then(Value::as_u64)
                .map(|v| v as u32)
                .ok_or_else(|| GatewayError::PageEvaluation(format!("argument {} is not an index", i)))
        };

        let active = model.active;
        let sheet = model
            .sheets
            .get(active)
            .ok_or_else(|| GatewayError::PageEvaluation("No active sheet".to_string()))?;

        match name {
            "ACTIVITY_STATUS" => {
                let preview = args.first().and_then(Value::as_u64).unwrap_or(10) as usize;
                let selection = model.selection.map(|(r, c, h, w)| {
                    let start = format!("{}{}", column_to_letters(c), r + 1);
                    let range = if h == 1 && w == 1 {
                        start
                    } else {
                        format!("{}:{}{}", start, column_to_letters(c + w - 1), r + h)
                    };
                    json!({
                        "range": range,
                        "startRow": r,
                        "startColumn": c,
                        "numRows": h,
                        "numColumns": w,
                    })
                });
                Ok(json!({
                    "workbookId": "workbook-1",
                    "workbookName": "Fake Workbook",
                    "sheetCount": model.sheets.len(),
                    "sheetNames": model.sheets.iter().take(preview).map(|s| s.name.clone()).collect::<Vec<_>>(),
                    "activeSheetName": sheet.name,
                    "activeSheetId": sheet.id,
                    "selection": selection,
                }))
            }
            "READ_RANGE" | "READ_STYLES" => {
                let (row, column, rows, columns) = (arg(0)?, arg(1)?, arg(2)?, arg(3)?);
                let mut values = Vec::new();
                let mut formulas = Vec::new();
                let mut styles = Vec::new();
                for r in row..row + rows {
                    let mut value_row = Vec::new();
                    let mut formula_row = Vec::new();
                    let mut style_row = Vec::new();
                    for c in column..column + columns {
                        let cell = sheet.cell(r, c);
                        value_row.push(cell.map(|c| c.value.clone()).unwrap_or(Value::Null));
                        formula_row.push(json!(cell.and_then(|c| c.formula.clone()).unwrap_or_default()));
                        style_row.push(cell.and_then(|c| c.style.clone()).unwrap_or(Value::Null));
                    }
                    values.push(value_row);
                    formulas.push(formula_row);
                    styles.push(style_row);
                }
                if name == "READ_STYLES" {
                    Ok(Value::from(styles.into_iter().map(Value::from).collect::<Vec<_>>()))
                } else {
                    Ok(json!({ "values": values, "formulas": formulas }))
                }
            }
            "LIST_SHEETS" => {
                let sheets: Vec<Value> = model
                    .sheets
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        json!({
                            "name": s.name,
                            "id": s.id,
                            "index": i,
                            "hidden": s.hidden,
                            "rowCount": s.row_count,
                            "columnCount": s.column_count,
                        })
                    })
                    .collect();
                Ok(json!({ "activeSheet": sheet.name, "sheets": sheets }))
            }
            "USED_RANGE" => Ok(match sheet.used_range() {
                None => Value::Null,
                Some((r0, c0, r1, c1)) => json!({
                    "sheetName": sheet.name,
                    "startRow": r0,
                    "startColumn": c0,
                    "endRow": r1,
                    "endColumn": c1,
                }),
            }),
            "SCROLL_TO_CELL" => {
                let (row, column) = (arg(0)?, arg(1)?);
                model.scrolled_to = Some((row, column));
                Ok(json!(format!("{}{}", column_to_letters(column), row + 1)))
            }
            _ => Err(GatewayError::PageEvaluation(format!(
                "fake page cannot run script: {}",
                function.lines().next().unwrap_or_default()
            ))),
        }
    }
}

fn script_name(function: &str) -> &'static str {
    [
        ("ACTIVITY_STATUS", scripts::ACTIVITY_STATUS),
        ("READ_RANGE", scripts::READ_RANGE),
        ("READ_STYLES", scripts::READ_STYLES),
        ("LIST_SHEETS", scripts::LIST_SHEETS),
        ("USED_RANGE", scripts::USED_RANGE),
        ("SCROLL_TO_CELL", scripts::SCROLL_TO_CELL),
    ]
    .into_iter()
    .find(|(_, script)| *script == function)
    .map(|(name, _)| name)
    .unwrap_or("UNKNOWN")
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SheetPage for FakeWorkbook {
    async fn start(&self, _url: &str, _headless: bool) -> Result<(), GatewayError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(GatewayError::SessionAlreadyStarted);
        }
        Ok(())
    }

    async fn evaluate(&self, function: &str, args: Vec<Value>) -> Result<Value, GatewayError> {
        if !self.is_started() {
            return Err(GatewayError::BrowserNotStarted);
        }
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.dispatch(function, &args)
    }

    async fn screenshot(&self) -> Result<String, GatewayError> {
        if !self.is_started() {
            return Err(GatewayError::BrowserNotStarted);
        }
        self.screenshots.fetch_add(1, Ordering::SeqCst);
        Ok(BLANK_PNG.to_string())
    }

    async fn cleanup(&self) -> Result<(), GatewayError> {
        self.started.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}
