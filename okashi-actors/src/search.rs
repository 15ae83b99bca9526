use crate::actor::{Actor, Addr, Context};
use crate::store::ResultStore;
use crate::{SearchCmd, SearchReport};
use anyhow::{anyhow, Result};
use okashi_api::{OkashiApi, SearchKeyword};
use tracing::{info, warn};

/// Turns keywords into store updates.
///
/// Every command runs on its own task so a slow request never blocks the
/// mailbox. Nothing orders those tasks: the last one to deliver a list to the
/// store wins.
pub struct SearchActor {
    api: OkashiApi,
    store: Addr<ResultStore>,
    next_id: u64,
}

impl SearchActor {
    pub fn new(api: OkashiApi, store: Addr<ResultStore>) -> Self {
        Self {
            api,
            store,
            next_id: 0,
        }
    }
}

#[async_trait::async_trait]
impl Actor for SearchActor {
    type Msg = SearchCmd;

    async fn handle(&mut self, msg: Self::Msg, _ctx: &mut Context<Self>) -> Result<()> {
        self.next_id += 1;
        let search_id = self.next_id;
        let api = self.api.clone();
        let store = self.store.clone();

        tokio::spawn(async move {
            let SearchCmd { keyword, reply } = msg;
            let report = run_search(search_id, &api, &store, keyword).await;
            if let Some(reply) = reply {
                let _ = reply.send(report);
            }
        });
        Ok(())
    }
}

async fn run_search(
    search_id: u64,
    api: &OkashiApi,
    store: &Addr<ResultStore>,
    keyword: SearchKeyword,
) -> SearchReport {
    match api.search(keyword).await {
        Ok(Some(items)) => {
            let count = items.len();
            match store.replace_all(items).await {
                Ok(()) => {
                    info!(search_id, count, "search.delivered");
                    SearchReport::Replaced { count }
                }
                Err(e) => {
                    warn!(search_id, error = ?e, "search.store_unavailable");
                    SearchReport::StoreUnavailable
                }
            }
        }
        Ok(None) => {
            info!(search_id, "search.no_items");
            SearchReport::NoItems
        }
        Err(e) => {
            warn!(search_id, kind = %e.kind(), error = %e, "search.failed");
            SearchReport::Failed { kind: e.kind() }
        }
    }
}

impl Addr<SearchActor> {
    /// Queue a search and wait for its outcome.
    pub async fn search(&self, keyword: impl Into<SearchKeyword>) -> Result<SearchReport> {
        let (cmd, rx) = SearchCmd::with_reply(keyword);
        self.send(cmd)
            .await
            .map_err(|_| anyhow!("search actor mailbox closed"))?;
        rx.await.map_err(|_| anyhow!("search task dropped its reply"))
    }

    /// Queue a search without waiting for it.
    pub fn submit(&self, keyword: impl Into<SearchKeyword>) -> Result<()> {
        self.try_send(SearchCmd::new(keyword))
            .map_err(|_| anyhow!("search actor mailbox full or closed"))
    }
}
