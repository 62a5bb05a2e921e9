//! Shared response envelope for API handlers.
//!
//! Successful responses are flat JSON objects carrying `"success": true`
//! next to the payload's own fields. Use [`SuccessResponse`] instead of
//! ad-hoc `serde_json::json!` so every handler serializes the same way.

use serde::Serialize;

/// `{ "success": true, ...T }` response envelope.
///
/// `T` must serialize as a JSON object.
///
/// ```ignore
/// Ok(Json(SuccessResponse::new(HistoryBody { history })))
/// ```
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}
