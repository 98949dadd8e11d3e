use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use sheetgate_config::QueryConfig;

use super::*;
use crate::error::ErrorCode;
use crate::query::CellRecord;
use crate::testing::{FakeSheet, FakeWorkbook};

fn quick_config() -> QueryConfig {
    QueryConfig {
        settle_delay_ms: 0,
        ..Default::default()
    }
}

fn service(page: &Arc<FakeWorkbook>) -> SheetQueryService {
    SheetQueryService::new(page.clone(), quick_config())
}

fn two_by_two() -> Arc<FakeWorkbook> {
    Arc::new(
        FakeWorkbook::new().with_sheet(
            FakeSheet::new("Sheet1")
                .value("A1", 1)
                .value("A2", 2)
                .value("B1", 3)
                .formula("B2", "=A2*2", 4),
        ),
    )
}

#[tokio::test]
async fn test_range_read_is_row_major() {
    let page = two_by_two();
    let result = service(&page).get_range_data("A1:B2", false, false).await;

    assert!(result.success, "{:?}", result.error);
    let data = result.range_data().unwrap();
    assert_eq!(data.total_cells, 4);
    let grid = &data.ranges[0];
    assert_eq!(grid.values(), vec![vec![json!(1), json!(3)], vec![json!(2), json!(4)]]);
    assert_eq!(grid.rows[1][1].address, "B2");
    assert_eq!(grid.rows[1][1].formula.as_deref(), Some("=A2*2"));
    assert_eq!(grid.rows[0][0].formula, None);
    assert!(grid.rows[0][0].style.is_none());
    assert!(result.screenshot.is_none());
    assert_eq!(page.screenshots(), 0);
}

#[tokio::test]
async fn test_range_read_fills_empty_cells() {
    let page = Arc::new(FakeWorkbook::new().with_sheet(FakeSheet::new("Sheet1").value("B2", "x")));
    let result = service(&page).get_range_data("A1:C3", false, false).await;

    let grid = &result.range_data().unwrap().ranges[0];
    assert_eq!(grid.rows.len(), 3);
    assert!(grid.rows.iter().all(|r| r.len() == 3));
    let empty = grid.rows.iter().flatten().filter(|c| c.is_empty()).count();
    assert_eq!(empty, 8);
    assert_eq!(grid.rows[1][1].value, json!("x"));
}

#[tokio::test]
async fn test_range_read_with_styles_and_screenshot() {
    let page = Arc::new(
        FakeWorkbook::new().with_sheet(
            FakeSheet::new("Sheet1")
                .value("A1", "Header")
                .style("A1", json!({"bl": 1})),
        ),
    );
    let result = service(&page).get_range_data("A1:A2", true, true).await;

    assert!(result.success);
    let grid = &result.range_data().unwrap().ranges[0];
    assert_eq!(grid.rows[0][0].style, Some(json!({"bl": 1})));
    assert_eq!(grid.rows[1][0].style, Some(serde_json::Value::Null));
    assert!(result.screenshot.is_some());
    assert_eq!(page.script_log(), vec!["READ_RANGE", "READ_STYLES"]);
}

#[tokio::test]
async fn test_style_key_present_only_when_requested() {
    let page = Arc::new(
        FakeWorkbook::new().with_sheet(
            FakeSheet::new("Sheet1")
                .value("A1", "Header")
                .style("A1", json!({"bl": 1}))
                .value("A2", "plain"),
        ),
    );
    let styled = service(&page).get_range_data("A1:A2", false, true).await;
    let json = serde_json::to_value(&styled).unwrap();
    let rows = &json["data"]["ranges"][0]["rows"];
    assert_eq!(rows[0][0]["style"], json!({"bl": 1}));
    assert!(rows[1][0].as_object().unwrap().contains_key("style"));
    assert!(rows[1][0]["style"].is_null());

    let back: CellRecord = serde_json::from_value(rows[1][0].clone()).unwrap();
    assert_eq!(back.style, Some(serde_json::Value::Null));

    let plain = service(&page).get_range_data("A1:A2", false, false).await;
    let json = serde_json::to_value(&plain).unwrap();
    let cell = json["data"]["ranges"][0]["rows"][1][0].as_object().unwrap().clone();
    assert!(!cell.contains_key("style"));
}

#[tokio::test]
async fn test_styles_only_read_when_requested() {
    let page = two_by_two();
    service(&page).get_range_data("A1", false, false).await;
    assert_eq!(page.script_log(), vec!["READ_RANGE"]);
}

#[tokio::test]
async fn test_quota_failures_touch_nothing() {
    let page = two_by_two();
    let svc = service(&page);

    let result = svc.get_range_data("A1:Z1000", false, false).await;
    assert_eq!(result.error_code(), Some(ErrorCode::RangeTooLarge));

    let result = svc.get_range_data("A1:A201", true, true).await;
    assert_eq!(result.error_code(), Some(ErrorCode::RangeTooLarge));

    let result = svc.get_ranges_data(&["A1:A150", "B1:B60"], false, false).await;
    assert_eq!(result.error_code(), Some(ErrorCode::RangeTooLarge));

    let result = svc.get_range_data("A1:", false, false).await;
    assert_eq!(result.error_code(), Some(ErrorCode::InvalidRangeSyntax));

    assert_eq!(page.evaluations(), 0);
    assert_eq!(page.screenshots(), 0);
}

#[tokio::test]
async fn test_quota_boundary() {
    let page = two_by_two();
    let svc = service(&page);

    let ok = svc.get_range_data("A1:B100", false, false).await;
    assert!(ok.success);
    assert_eq!(ok.range_data().unwrap().total_cells, 200);

    let ok = svc.get_ranges_data(&["A1:A100", "C1:C100"], false, false).await;
    assert!(ok.success);
    assert_eq!(ok.range_data().unwrap().ranges.len(), 2);
}

#[tokio::test]
async fn test_multiple_ranges_keep_request_order() {
    let page = two_by_two();
    let result = service(&page)
        .get_ranges_data(&["B2", "a1"], false, false)
        .await;

    let data = result.range_data().unwrap();
    assert_eq!(data.ranges[0].range, "B2");
    assert_eq!(data.ranges[1].range, "A1");
    assert_eq!(data.ranges[1].values(), vec![vec![json!(1)]]);
    assert_eq!(data.total_cells, 2);
}

#[tokio::test]
async fn test_page_errors_become_failures() {
    let page = two_by_two();
    page.fail_with("Error: Sheet not found");
    let svc = service(&page);

    let result = svc.get_range_data("A1", false, false).await;
    assert_eq!(result.error_code(), Some(ErrorCode::PageEvaluationError));
    assert!(result.error.unwrap().message.contains("Sheet not found"));

    let result = svc.get_sheets().await;
    assert_eq!(result.error_code(), Some(ErrorCode::PageEvaluationError));
}

#[tokio::test]
async fn test_activity_status() {
    let page = Arc::new(
        FakeWorkbook::new()
            .with_sheets(vec![FakeSheet::new("Data"), FakeSheet::new("Summary")])
            .with_active(1)
            .with_selection("B2", 2, 3),
    );
    let result = service(&page).get_activity_status(true).await;

    let status = result.status().unwrap();
    assert_eq!(status.sheet_count, 2);
    assert_eq!(status.sheet_names, vec!["Data", "Summary"]);
    assert_eq!(status.active_sheet_name, "Summary");
    let selection = status.selection.as_ref().unwrap();
    assert_eq!(selection.range, "B2:D3");
    assert_eq!(selection.num_columns, 3);
    assert!(result.screenshot.is_some());
}

#[tokio::test]
async fn test_activity_status_limits_sheet_preview() {
    let sheets = (1..=12).map(|i| FakeSheet::new(&format!("S{i}"))).collect();
    let page = Arc::new(FakeWorkbook::new().with_sheets(sheets));
    let result = service(&page).get_activity_status(false).await;

    let status = result.status().unwrap();
    assert_eq!(status.sheet_count, 12);
    assert_eq!(status.sheet_names.len(), 10);
    assert!(status.selection.is_none());
    assert!(result.screenshot.is_none());
}

#[tokio::test]
async fn test_get_sheets_keeps_workbook_order() {
    let page = Arc::new(FakeWorkbook::new().with_sheets(vec![
        FakeSheet::new("Zeta"),
        FakeSheet::new("Alpha").hidden(),
        FakeSheet::new("Mid"),
    ]));
    let result = service(&page).get_sheets().await;

    let list = result.sheet_list().unwrap();
    assert_eq!(list.names(), vec!["Zeta", "Alpha", "Mid"]);
    assert_eq!(list.active_sheet, "Zeta");
    assert!(list.sheets[1].hidden);
    assert_eq!(list.sheets[2].index, 2);
}

#[tokio::test]
async fn test_scroll_and_screenshot() {
    let page = two_by_two();
    let result = service(&page).scroll_and_screenshot(" d10 ").await;

    assert!(result.success);
    let capture = result.scroll_capture().unwrap();
    assert_eq!(capture.cell, "D10");
    assert_eq!(capture.message, "Scrolled to D10");
    assert!(result.screenshot.is_some());
    assert_eq!(page.scrolled_to().as_deref(), Some("D10"));
}

#[tokio::test]
async fn test_scroll_rejects_ranges() {
    let page = two_by_two();
    let result = service(&page).scroll_and_screenshot("A1:B2").await;
    assert_eq!(result.error_code(), Some(ErrorCode::InvalidRangeSyntax));
    assert_eq!(page.evaluations(), 0);
}

#[tokio::test]
async fn test_scroll_before_start_is_not_started() {
    let page = Arc::new(FakeWorkbook::new().stopped());
    let result = service(&page).scroll_and_screenshot("A1").await;
    assert_eq!(result.error_code(), Some(ErrorCode::BrowserNotStarted));
}

#[tokio::test]
async fn test_operations_after_cleanup_are_not_started() {
    let page = two_by_two();
    let svc = service(&page);
    page.cleanup().await.unwrap();

    for result in [
        svc.get_activity_status(false).await,
        svc.get_range_data("A1", false, false).await,
        svc.get_sheets().await,
        svc.search_cells("x", MatchKind::Value, None).await,
        svc.scroll_and_screenshot("A1").await,
    ] {
        assert_eq!(result.error_code(), Some(ErrorCode::BrowserNotStarted));
    }
}

#[tokio::test]
async fn test_empty_keyword_is_invalid() {
    let page = two_by_two();
    let result = service(&page).search_cells("", MatchKind::Value, None).await;
    assert_eq!(result.error_code(), Some(ErrorCode::InvalidArguments));
    assert_eq!(page.evaluations(), 0);
}

#[tokio::test]
async fn test_zero_max_results_is_invalid() {
    let page = two_by_two();
    let result = service(&page).search_cells("1", MatchKind::Value, Some(0)).await;
    assert_eq!(result.error_code(), Some(ErrorCode::InvalidArguments));
    assert_eq!(page.evaluations(), 0);

    let result = service(&page).search_cells("1", MatchKind::Value, Some(1)).await;
    assert!(result.success);
}

#[tokio::test]
async fn test_concurrent_reads_do_not_overlap() {
    let page = Arc::new(
        FakeWorkbook::new()
            .with_sheet(FakeSheet::new("Sheet1").value("A1", 1).value("A2", 2))
            .with_latency(Duration::from_millis(20)),
    );
    let svc = Arc::new(service(&page));

    let a = tokio::spawn({
        let svc = svc.clone();
        async move { svc.get_range_data("A1:A2", false, true).await }
    });
    let b = tokio::spawn({
        let svc = svc.clone();
        async move { svc.get_range_data("A1:A2", false, true).await }
    });

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    assert!(a.success && b.success);
    assert_eq!(a.range_data(), b.range_data());
    assert_eq!(page.max_in_flight(), 1);
    // Each read's value and style evaluations ran back to back.
    assert_eq!(
        page.script_log(),
        vec!["READ_RANGE", "READ_STYLES", "READ_RANGE", "READ_STYLES"]
    );
}

#[tokio::test]
async fn test_search_honors_configured_scan_budget() {
    let mut sheet = FakeSheet::new("Sheet1");
    for row in 1..=30 {
        sheet = sheet.value(&format!("A{row}"), "needle");
    }
    let page = Arc::new(FakeWorkbook::new().with_sheet(sheet));
    let config = QueryConfig {
        max_cells: 10,
        search_max_cells: 20,
        ..quick_config()
    };
    let svc = SheetQueryService::new(page.clone(), config);

    let result = svc.search_cells("needle", MatchKind::Value, None).await;
    assert!(result.success, "{:?}", result.error);
    let results = result.search_results().unwrap();
    assert!(!results.scan_complete);
    assert_eq!(results.scanned_range.as_deref(), Some("A1:A20"));
    assert_eq!(results.total, 20);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["data"]["scanComplete"], json!(false));
}
