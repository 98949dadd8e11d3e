use super::*;

#[test]
fn test_tool_result_success() {
    let result = ToolResult::success("OK");
    assert!(result.success);
    assert_eq!(result.content, "OK");
    assert!(result.error.is_none());
    assert!(result.structured_output.is_none());
    assert!(result.images.is_empty());
}

#[test]
fn test_tool_result_success_json() {
    let output = serde_json::json!({"sheetCount": 3});
    let result = ToolResult::success_json("{}", output);
    assert!(result.success);
    assert_eq!(result.structured_output.as_ref().unwrap()["sheetCount"], 3);
}

#[test]
fn test_tool_result_error() {
    let result = ToolResult::error("RangeTooLarge: 26000 cells");
    assert!(!result.success);
    assert!(result.content.is_empty());
    assert_eq!(result.error.as_deref(), Some("RangeTooLarge: 26000 cells"));
}

#[test]
fn test_tool_result_with_image() {
    let result = ToolResult::success("ok").with_image(ImageData::png("AAAA"));
    assert_eq!(result.images.len(), 1);
    assert_eq!(result.images[0].media_type, "image/png");
}

#[test]
fn test_tool_result_with_metadata() {
    let result = ToolResult::error("bad").with_metadata("error_code", serde_json::json!("InvalidRangeSyntax"));
    assert_eq!(result.metadata["error_code"], "InvalidRangeSyntax");
}

#[test]
fn test_tool_result_serialization_skips_empty_images() {
    let json = serde_json::to_string(&ToolResult::success("OK")).unwrap();
    assert!(!json.contains("images"));
    assert!(!json.contains("structured_output"));

    let json = serde_json::to_string(&ToolResult::success("OK").with_image(ImageData::png("AA"))).unwrap();
    assert!(json.contains("images"));
}

#[test]
fn test_tool_result_deserialization() {
    let json = r#"{"success": false, "content": "", "error": "boom"}"#;
    let result: ToolResult = serde_json::from_str(json).unwrap();
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("boom"));
    assert!(result.metadata.is_empty());
}
