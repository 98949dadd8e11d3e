use super::*;

#[test]
fn test_definition_new() {
    let def = ToolDefinition::new("get_sheets", "Get Sheets", "List sheets");
    assert_eq!(def.id, "get_sheets");
    assert_eq!(def.name, "Get Sheets");
    assert!(def.parameters_schema.is_none());
}

#[test]
fn test_to_mcp_tool_with_schema() {
    let schema = serde_json::json!({
        "type": "object",
        "properties": {"cell_a1": {"type": "string"}},
        "required": ["cell_a1"]
    });
    let def = ToolDefinition::new("scroll_and_screenshot", "Scroll", "Scroll to a cell")
        .with_parameters_schema(schema.clone());

    let tool = def.to_mcp_tool();
    assert_eq!(tool["name"], "scroll_and_screenshot");
    assert_eq!(tool["inputSchema"], schema);
    assert_eq!(tool["annotations"]["readOnlyHint"], true);
    assert_eq!(tool["annotations"]["title"], "Scroll");
}

#[test]
fn test_to_mcp_tool_without_schema() {
    let def = ToolDefinition::new("get_sheets", "Get Sheets", "List sheets");
    let tool = def.to_mcp_tool();
    assert_eq!(tool["inputSchema"]["type"], "object");
    assert!(tool["inputSchema"]["properties"].as_object().unwrap().is_empty());
}

#[test]
fn test_definition_serializes_without_schema_key() {
    let def = ToolDefinition::new("get_sheets", "Get Sheets", "List sheets");
    let json = serde_json::to_value(&def).unwrap();
    assert_eq!(json["id"], "get_sheets");
    assert!(json.get("parameters_schema").is_none());
}
