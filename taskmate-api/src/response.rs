/// Success envelope helpers
///
/// Every successful response (login excepted, which has its own documented
/// shape) uses the same envelope:
///
/// ```json
/// { "result": true, "status": "success", "message": "...", "data": { ... } }
/// ```
///
/// `data` is omitted when there is nothing to return.

use axum::Json;
use serde::Serialize;
use serde_json::json;

/// Success envelope with a message only
pub fn success_message(message: &str) -> Json<serde_json::Value> {
    Json(json!({
        "result": true,
        "status": "success",
        "message": message,
    }))
}

/// Success envelope with a message and data payload
pub fn success_data(message: &str, data: impl Serialize) -> Json<serde_json::Value> {
    Json(json!({
        "result": true,
        "status": "success",
        "message": message,
        "data": data,
    }))
}
