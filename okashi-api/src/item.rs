use serde::Serialize;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

/// Ordered, immutable snapshot of search results as held by the result store.
pub type ResultList = Arc<[ResultItem]>;

/// One fully populated search hit.
///
/// The `id` is minted locally on construction and only serves as a stable
/// rendering key; two fetches of the same snack produce different ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    id: Uuid,
    name: String,
    detail_url: Url,
    image_url: Url,
}

impl ResultItem {
    pub fn new(name: impl Into<String>, detail_url: Url, image_url: Url) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            detail_url,
            image_url,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn detail_url(&self) -> &Url {
        &self.detail_url
    }

    pub fn image_url(&self) -> &Url {
        &self.image_url
    }

    /// Field equality ignoring `id`.
    pub fn same_content(&self, other: &ResultItem) -> bool {
        self.name == other.name
            && self.detail_url == other.detail_url
            && self.image_url == other.image_url
    }
}
