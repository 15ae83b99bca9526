use anyhow::{Context, Result};
use okashi_actors::{
    actor::Addr, builder::Builder, search::SearchActor, store::ResultStore, SearchReport,
    StoreSnapshot,
};
use okashi_api::{OkashiApi, SearchKeyword};
use okashi_config::{ApiConfig, OkashiConfig};
use okashi_http::HttpClient;
use okashi_tui::{SystemBrowser, TuiActor, spawn_tui_feeders};
use std::time::Duration;

const SEARCH_MAILBOX: usize = 64;
const TUI_MAILBOX: usize = 256;

/// The running actor set: result store and search dispatcher, optionally
/// fronted by the TUI.
pub struct Wiring {
    builder: Builder,
    pub store: Addr<ResultStore>,
    pub search: Addr<SearchActor>,
}

pub fn api_from_config(cfg: &ApiConfig) -> Result<OkashiApi> {
    let template = cfg.template();
    let mut http = HttpClient::new().context("building HTTP client")?;
    if let Some(secs) = cfg.timeout_secs {
        http = http.with_timeout(Duration::from_secs(secs));
    }
    Ok(OkashiApi::with_http(template, http))
}

impl Wiring {
    /// Start the store, then the dispatcher that feeds it.
    pub fn start(cfg: &OkashiConfig) -> Result<Self> {
        let api = api_from_config(&cfg.api)?;
        let mut builder = Builder::new();

        let store = builder.spawn("store:results", cfg.store.mailbox.max(1), ResultStore::new());
        let search = builder.spawn(
            "search:main",
            SEARCH_MAILBOX,
            SearchActor::new(api, store.clone()),
        );

        tracing::info!(
            endpoint = %cfg.api.endpoint,
            max = cfg.api.max,
            order = %cfg.api.order,
            "app.wired"
        );
        Ok(Self {
            builder,
            store,
            search,
        })
    }

    /// Start the terminal UI last, once everything it talks to is running.
    pub async fn attach_tui(&mut self) -> Result<()> {
        let shutdown = self.builder.shutdown_handle();
        let store_rx = self.store.subscribe().await?;

        let r_tui = self.builder.reserve::<TuiActor>("tui:main", TUI_MAILBOX);
        let tui_addr = r_tui.addr();
        let tui = TuiActor::new(self.search.clone(), Box::new(SystemBrowser), shutdown.clone())?;
        self.builder.start_reserved(r_tui, tui);

        spawn_tui_feeders(tui_addr, store_rx, shutdown);
        Ok(())
    }

    /// Run one search through the dispatcher and return what the store holds
    /// afterwards.
    pub async fn search_once(
        &self,
        keyword: impl Into<SearchKeyword>,
    ) -> Result<(SearchReport, StoreSnapshot)> {
        let report = self.search.search(keyword).await?;
        let snap = self.store.snapshot().await?;
        Ok((report, snap))
    }

    pub async fn run(self) -> Result<()> {
        self.builder.run_until_ctrl_c().await
    }

    pub async fn shutdown(self) -> Result<()> {
        self.builder.graceful_shutdown().await
    }
}
