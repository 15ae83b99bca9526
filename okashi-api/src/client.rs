//! Thin wrapper around the search endpoint.
//!
//! One call, one GET, no retries. Callers decide what a failed search means
//! for their own state.
use crate::error::SearchError;
use crate::extract::complete_items;
use crate::item::ResultItem;
use crate::query::{QueryTemplate, SearchKeyword};
use crate::types::SearchResponse;
use okashi_http::{HttpClient, redacted_url};

#[derive(Clone)]
pub struct OkashiApi {
    http: HttpClient,
    template: QueryTemplate,
}

impl OkashiApi {
    pub fn new(template: QueryTemplate) -> Result<Self, SearchError> {
        let http = HttpClient::new()?;
        Ok(Self::with_http(template, http))
    }

    pub fn with_http(template: QueryTemplate, http: HttpClient) -> Self {
        Self { http, template }
    }

    /// Run one search.
    ///
    /// `Ok(None)` means the payload had no `item` list at all (absent or
    /// `null`), which is distinct from `Ok(Some(vec![]))`: an explicit empty
    /// list, or a list where no record was complete.
    pub async fn search(
        &self,
        keyword: impl Into<SearchKeyword>,
    ) -> Result<Option<Vec<ResultItem>>, SearchError> {
        let keyword = keyword.into();
        let url = self.template.request_url(&keyword)?;

        tracing::info!(keyword=%keyword, url=%redacted_url(&url), "okashi.search.request");

        let resp: SearchResponse = self.http.get_json(&url).await?;

        match resp.item {
            None => {
                tracing::info!(keyword=%keyword, "okashi.search.no_item_list");
                Ok(None)
            }
            Some(records) => {
                let items = complete_items(records);
                tracing::info!(keyword=%keyword, count = items.len(), "okashi.search.items");
                Ok(Some(items))
            }
        }
    }
}
