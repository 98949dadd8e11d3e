use super::*;
use sheetgate_protocols::ImageData;

#[test]
fn test_request_deserialization() {
    let json = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
    let req: McpRequest = serde_json::from_str(json).unwrap();
    assert_eq!(req.id, Some(RequestId::Number(1)));
    assert_eq!(req.method, "tools/list");
    assert!(req.params.is_none());
    assert!(!req.is_notification());
}

#[test]
fn test_notification_has_no_id() {
    let json = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
    let req: McpRequest = serde_json::from_str(json).unwrap();
    assert!(req.is_notification());

    let built = McpRequest::notification("notifications/initialized");
    let out = serde_json::to_value(&built).unwrap();
    assert!(out.get("id").is_none());
}

#[test]
fn test_request_serialization() {
    let req = McpRequest::new(1i64, "initialize")
        .with_params(serde_json::json!({"capabilities": {}}));

    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("jsonrpc"));
    assert!(json.contains("initialize"));
}

#[test]
fn test_response_success() {
    let resp = McpResponse::success(Some(1i64.into()), serde_json::json!({"tools": []}));
    assert!(!resp.is_error());
    assert!(resp.result.is_some());
}

#[test]
fn test_response_error_with_null_id() {
    let resp = McpResponse::error(None, McpError::parse_error());
    assert!(resp.is_error());

    let out = serde_json::to_value(&resp).unwrap();
    assert!(out["id"].is_null());
    assert_eq!(out["error"]["code"], -32700);
    assert!(out.get("result").is_none());
}

#[test]
fn test_request_id_variants() {
    let id1: RequestId = 42i64.into();
    let id2: RequestId = "abc".into();

    assert_eq!(id1, RequestId::Number(42));
    assert_eq!(id2, RequestId::String("abc".to_string()));
    assert_eq!(id1.to_string(), "42");
    assert_eq!(id2.to_string(), "abc");
}

#[test]
fn test_mcp_method_parse() {
    for method in [
        McpMethod::Initialize,
        McpMethod::Initialized,
        McpMethod::Ping,
        McpMethod::ListTools,
        McpMethod::CallTool,
    ] {
        assert_eq!(McpMethod::parse(method.as_str()), Some(method));
    }
    assert_eq!(McpMethod::parse("resources/list"), None);
}

#[test]
fn test_mcp_error_codes() {
    assert_eq!(McpError::parse_error().code, -32700);
    assert_eq!(McpError::invalid_request().code, -32600);
    assert_eq!(McpError::method_not_found().code, -32601);
    assert_eq!(McpError::invalid_params().code, -32602);
    assert_eq!(McpError::internal_error().code, -32603);
}

#[test]
fn test_tool_call_params_default_arguments() {
    let params: ToolCallParams =
        serde_json::from_value(serde_json::json!({"name": "get_sheets"})).unwrap();
    assert_eq!(params.name, "get_sheets");
    assert!(params.arguments.is_null());
}

#[test]
fn test_tool_result_from_success_with_image() {
    let result = ToolResult::success("{\"success\": true}").with_image(ImageData::png("AAAA"));
    let mcp = McpToolResult::from(result);
    assert!(!mcp.is_error);
    assert_eq!(mcp.content.len(), 2);

    let out = serde_json::to_value(&mcp).unwrap();
    assert_eq!(out["isError"], false);
    assert_eq!(out["content"][0]["type"], "text");
    assert_eq!(out["content"][1]["type"], "image");
    assert_eq!(out["content"][1]["mimeType"], "image/png");
    assert_eq!(out["content"][1]["data"], "AAAA");
}

#[test]
fn test_tool_result_from_error_falls_back_to_message() {
    let mcp = McpToolResult::from(ToolResult::error("boom"));
    assert!(mcp.is_error);
    match &mcp.content[0] {
        McpContent::Text { text } => assert_eq!(text, "boom"),
        other => panic!("Expected text content, got {other:?}"),
    }
}

#[test]
fn test_error_text_result() {
    let mcp = McpToolResult::error_text("Tool not found: write_cells");
    assert!(mcp.is_error);
    assert_eq!(mcp.content.len(), 1);
}

#[test]
fn test_rejected_result_uses_failure_envelope() {
    let mcp = McpToolResult::rejected("get_sheets", "Parameters must be an object");
    assert!(mcp.is_error);
    match &mcp.content[0] {
        McpContent::Text { text } => {
            let body: serde_json::Value = serde_json::from_str(text).unwrap();
            assert_eq!(body["success"], false);
            assert_eq!(body["operation"], "get_sheets");
            assert_eq!(body["error"]["code"], "InvalidArguments");
            assert_eq!(body["error"]["message"], "Parameters must be an object");
        }
        other => panic!("Expected text content, got {other:?}"),
    }
}
