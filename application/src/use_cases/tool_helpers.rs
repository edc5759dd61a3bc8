//! Shared helpers for displaying tool calls.

use atlas_domain::RequestedCall;
use serde_json::Value;

/// Extract a short preview string from a call's arguments.
///
/// Looks for the most descriptive keys first (`description`,
/// `nombre_proyecto`, `project_name`, `nombre`, `nuevo_estado`), then falls
/// back to the raw argument text.
pub fn call_args_preview(call: &RequestedCall) -> String {
    let keys = [
        "description",
        "nombre_proyecto",
        "project_name",
        "nombre",
        "nuevo_estado",
    ];
    if let Ok(Value::Object(args)) = serde_json::from_str::<Value>(&call.raw_arguments) {
        for key in &keys {
            if let Some(Value::String(s)) = args.get(*key) {
                return truncate_preview(s, 50);
            }
        }
    }
    truncate_preview(call.raw_arguments.trim(), 50)
}

/// Truncate to `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
