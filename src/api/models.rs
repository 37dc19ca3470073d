//! Request and response bodies for the relay API.
//!
//! - `GET /api/sections` returns [`SectionsResponse`]
//! - `POST /api/sections` accepts [`SectionsRequest`] and returns [`SectionsSaved`]
//! - `GET /api/recent/{label}` takes [`RecentParams`] and returns the
//!   normalized upstream payload as-is
//!
//! Section mappings travel as plain objects:
//!
//! ```json
//! { "sections": { "movies": 2, "shows": 3 } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::observability::MetricsSnapshot;
use crate::sections::SectionMapping;

/// Admin replacement body. Ids stay raw JSON until the registry validates them.
#[derive(Debug, Deserialize, Clone)]
pub struct SectionsRequest {
    pub sections: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SectionsResponse {
    pub sections: SectionMapping,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SectionsSaved {
    pub success: bool,
    pub sections: SectionMapping,
}

#[derive(Debug, Deserialize, Default)]
pub struct RecentParams {
    /// Kept as text so a junk value falls back to the default instead of a 400
    pub count: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sections: usize,
    pub metrics: MetricsSnapshot,
}
