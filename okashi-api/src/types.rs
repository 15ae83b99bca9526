use serde::{Deserialize, Serialize};

/// Top-level search payload. Only `item` is consumed; `status`, `count` and
/// anything else the API adds are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub item: Option<Vec<RawItem>>,
}

/// One snack record as sent by the API. Every field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub name: Option<String>,
    /// Detail page.
    #[serde(default)]
    pub url: Option<String>,
    /// Thumbnail.
    #[serde(default)]
    pub image: Option<String>,
}
