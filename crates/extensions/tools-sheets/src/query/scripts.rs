//! Page scripts run against the spreadsheet facade.
//!
//! Each script is a function `(api, ...args)`; the bridge supplies the
//! page-global API object as `api` and the JSON arguments after it.

/// `(api, preview)`: workbook summary, first `preview` sheet names and
/// the active selection.
pub const ACTIVITY_STATUS: &str = r#"async (api, preview) => {
    const workbook = api.getActiveWorkbook();
    if (!workbook) throw new Error('No active workbook');
    const sheets = workbook.getSheets();
    const sheet = workbook.getActiveSheet();
    let selection = null;
    const current = typeof sheet.getSelection === 'function' ? sheet.getSelection() : null;
    const range = current ? current.getActiveRange() : null;
    if (range) {
        selection = {
            range: range.getA1Notation(),
            startRow: range.getRow(),
            startColumn: range.getColumn(),
            numRows: range.getHeight(),
            numColumns: range.getWidth(),
        };
    }
    return {
        workbookId: typeof workbook.getId === 'function' ? workbook.getId() : null,
        workbookName: typeof workbook.getName === 'function' ? workbook.getName() : null,
        sheetCount: sheets.length,
        sheetNames: sheets.slice(0, preview).map((s) => s.getSheetName()),
        activeSheetName: sheet.getSheetName(),
        activeSheetId: sheet.getSheetId(),
        selection,
    };
}"#;

/// `(api, row, column, numRows, numColumns)`: values and formulas of a
/// block on the active sheet. Cells without a formula report `''`.
pub const READ_RANGE: &str = r#"async (api, row, column, numRows, numColumns) => {
    const workbook = api.getActiveWorkbook();
    if (!workbook) throw new Error('No active workbook');
    const range = workbook.getActiveSheet().getRange(row, column, numRows, numColumns);
    return { values: range.getValues(), formulas: range.getFormulas() };
}"#;

/// `(api, row, column, numRows, numColumns)`: per-cell style objects.
pub const READ_STYLES: &str = r#"async (api, row, column, numRows, numColumns) => {
    const workbook = api.getActiveWorkbook();
    if (!workbook) throw new Error('No active workbook');
    const range = workbook.getActiveSheet().getRange(row, column, numRows, numColumns);
    return range.getCellStyles().map((cells) =>
        cells.map((style) => {
            if (style == null) return null;
            return typeof style.toJSON === 'function' ? style.toJSON() : style;
        })
    );
}"#;

/// `(api)`: every sheet in workbook order plus the active sheet name.
pub const LIST_SHEETS: &str = r#"async (api) => {
    const workbook = api.getActiveWorkbook();
    if (!workbook) throw new Error('No active workbook');
    const sheets = workbook.getSheets().map((sheet, position) => ({
        name: sheet.getSheetName(),
        id: sheet.getSheetId(),
        index: typeof sheet.getIndex === 'function' ? sheet.getIndex() : position,
        hidden: Boolean(sheet.isSheetHidden()),
        rowCount: sheet.getMaxRows(),
        columnCount: sheet.getMaxColumns(),
    }));
    return { activeSheet: workbook.getActiveSheet().getSheetName(), sheets };
}"#;

/// `(api)`: the rectangle bounding all non-empty cells of the active
/// sheet, or `null` for an empty sheet.
pub const USED_RANGE: &str = r#"async (api) => {
    const workbook = api.getActiveWorkbook();
    if (!workbook) throw new Error('No active workbook');
    const sheet = workbook.getActiveSheet();
    const lastRow = sheet.getLastRow();
    const lastColumn = sheet.getLastColumn();
    if (lastRow < 0 || lastColumn < 0) return null;
    let startRow = 0;
    let startColumn = 0;
    const inner = typeof sheet.getSheet === 'function' ? sheet.getSheet() : null;
    const matrix = inner && typeof inner.getCellMatrix === 'function' ? inner.getCellMatrix() : null;
    if (matrix && typeof matrix.getDataRange === 'function') {
        const bounds = matrix.getDataRange();
        startRow = Math.max(0, bounds.startRow);
        startColumn = Math.max(0, bounds.startColumn);
    }
    return {
        sheetName: sheet.getSheetName(),
        startRow,
        startColumn,
        endRow: lastRow,
        endColumn: lastColumn,
    };
}"#;

/// `(api, row, column)`: select the cell and bring it into view.
pub const SCROLL_TO_CELL: &str = r#"async (api, row, column) => {
    const workbook = api.getActiveWorkbook();
    if (!workbook) throw new Error('No active workbook');
    const sheet = workbook.getActiveSheet();
    const range = sheet.getRange(row, column);
    range.activate();
    if (typeof sheet.scrollToCell === 'function') sheet.scrollToCell(row, column);
    return range.getA1Notation();
}"#;
