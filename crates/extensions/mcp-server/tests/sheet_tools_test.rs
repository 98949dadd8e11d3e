//! The sheet tools served through the MCP server over an in-memory workbook.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use sheetgate_config::QueryConfig;
use sheetgate_mcp_server::{LineTransport, McpServer, ToolRegistry};
use sheetgate_tools_sheets::testing::{FakeSheet, FakeWorkbook};
use sheetgate_tools_sheets::{sheet_tools, SheetQueryService};

fn server_over(page: FakeWorkbook) -> (Arc<FakeWorkbook>, McpServer) {
    let page = Arc::new(page);
    let config = QueryConfig {
        settle_delay_ms: 0,
        ..Default::default()
    };
    let service = Arc::new(SheetQueryService::new(page.clone(), config));
    let registry = ToolRegistry::new();
    registry.register_all(sheet_tools(service)).unwrap();
    (page, McpServer::new(registry))
}

fn workbook() -> FakeWorkbook {
    FakeWorkbook::new().with_sheet(
        FakeSheet::new("Sheet1")
            .value("A1", "Region")
            .value("B1", "Total")
            .value("A2", "North")
            .value("B2", 42),
    )
}

async fn call_tool(server: &McpServer, name: &str, arguments: Value) -> Value {
    let line = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
    .to_string();
    let resp = server.handle_line(&line).await.unwrap();
    assert!(resp.error.is_none(), "unexpected protocol error: {:?}", resp.error);
    resp.result.unwrap()
}

fn body(result: &Value) -> Value {
    serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_lists_five_read_only_tools() {
    let (_, server) = server_over(workbook());
    let line = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}).to_string();
    let result = server.handle_line(&line).await.unwrap().result.unwrap();

    let tools = result["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "get_activity_status",
            "get_range_data",
            "get_sheets",
            "scroll_and_screenshot",
            "search_cells",
        ]
    );
    assert!(tools.iter().all(|t| t["annotations"]["readOnlyHint"] == true));

    let range_tool = tools.iter().find(|t| t["name"] == "get_range_data").unwrap();
    assert!(range_tool["description"].as_str().unwrap().contains("200"));
}

#[tokio::test]
async fn test_bad_arguments_are_error_results() {
    let (page, server) = server_over(workbook());
    let result = call_tool(&server, "search_cells", json!({"find_by": "value"})).await;

    assert_eq!(result["isError"], true);
    assert_eq!(body(&result)["error"]["code"], "InvalidArguments");
    assert_eq!(page.evaluations(), 0);
}

#[tokio::test]
async fn test_oversized_range_rejected_without_page_work() {
    let (page, server) = server_over(workbook());
    let result = call_tool(&server, "get_range_data", json!({"range_a1": "A1:Z1000"})).await;

    assert_eq!(result["isError"], true);
    assert_eq!(body(&result)["error"]["code"], "RangeTooLarge");
    assert_eq!(page.evaluations(), 0);
}

#[tokio::test]
async fn test_non_object_arguments_never_reach_the_page() {
    let (page, server) = server_over(workbook());
    let result = call_tool(&server, "get_sheets", json!([1, 2])).await;

    assert_eq!(result["isError"], true);
    let body = body(&result);
    assert_eq!(body["operation"], "get_sheets");
    assert_eq!(body["error"]["code"], "InvalidArguments");
    assert_eq!(page.evaluations(), 0);
}

#[tokio::test]
async fn test_search_through_server() {
    let (_, server) = server_over(workbook());
    let result = call_tool(&server, "search_cells", json!({"keyword": "total", "find_by": "value"})).await;

    assert_eq!(result["isError"], false);
    let body = body(&result);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["matches"][0]["address"], "B1");
}

#[tokio::test]
async fn test_screenshot_becomes_image_block() {
    let (page, server) = server_over(workbook());
    let result = call_tool(&server, "scroll_and_screenshot", json!({"cell_a1": "B2"})).await;

    assert_eq!(result["isError"], false);
    let content = result["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[1]["type"], "image");
    assert_eq!(content[1]["mimeType"], "image/png");
    assert_eq!(page.screenshots(), 1);
}

#[tokio::test]
async fn test_session_transcript() {
    let (_, server) = server_over(workbook());
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
               "params": {"name": "get_sheets"}})
        .to_string(),
    ]
    .join("\n");
    let mut transport = LineTransport::new(input.as_bytes(), Vec::new());

    server.run(&mut transport).await.unwrap();

    let (_, written) = transport.into_inner();
    let responses: Vec<Value> = String::from_utf8(written)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "sheetgate");
    assert_eq!(responses[1]["result"]["isError"], false);
}

#[tokio::test]
async fn test_shutdown_interrupts_slow_request() {
    let (page, server) =
        server_over(workbook().with_latency(Duration::from_secs(5)));
    let input = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
                       "params": {"name": "get_sheets"}})
    .to_string();
    let mut transport = LineTransport::new(input.as_bytes(), Vec::new());

    let outcome = tokio::time::timeout(
        Duration::from_secs(2),
        server.run_until(&mut transport, tokio::time::sleep(Duration::from_millis(100))),
    )
    .await;

    assert!(matches!(outcome, Ok(Ok(()))), "server did not stop: {:?}", outcome);
    assert_eq!(page.max_in_flight(), 1);
    let (_, written) = transport.into_inner();
    assert!(written.is_empty());
}
