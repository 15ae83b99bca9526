//! Actor runtime plus the two actors that make up the search flow.
//!
//! - [`store::ResultStore`] owns the current result list. Its mailbox is the
//!   only path to mutate it, so writes are serialised no matter how many
//!   searches are in flight; observers receive immutable snapshots.
//! - [`search::SearchActor`] accepts keywords and runs each search as its own
//!   task, forwarding successful lists to the store.
//!
//! Concurrent searches are neither deduplicated nor cancelled: whichever
//! finishes last decides what the store holds.
pub mod actor;
pub mod builder;
pub mod search;
pub mod store;
pub mod system;

use okashi_api::{ResultItem, ResultList, SearchErrorKind, SearchKeyword};
use serde::Serialize;
use tokio::sync::{oneshot, watch};

/// What observers of the store see: the list plus a counter that moves on
/// every replace.
#[derive(Clone, Debug)]
pub struct StoreSnapshot {
    pub revision: u64,
    pub items: ResultList,
}

impl StoreSnapshot {
    pub fn empty() -> Self {
        Self {
            revision: 0,
            items: Vec::new().into(),
        }
    }
}

pub enum StoreMsg {
    /// Discard the current list and install this one.
    ReplaceAll(Vec<ResultItem>),
    Snapshot {
        reply: oneshot::Sender<StoreSnapshot>,
    },
    Subscribe {
        reply: oneshot::Sender<watch::Receiver<StoreSnapshot>>,
    },
}

pub struct SearchCmd {
    pub keyword: SearchKeyword,
    pub reply: Option<oneshot::Sender<SearchReport>>,
}

impl SearchCmd {
    /// Fire-and-forget search.
    pub fn new(keyword: impl Into<SearchKeyword>) -> Self {
        Self {
            keyword: keyword.into(),
            reply: None,
        }
    }

    /// Search whose outcome is reported on the returned receiver.
    pub fn with_reply(
        keyword: impl Into<SearchKeyword>,
    ) -> (Self, oneshot::Receiver<SearchReport>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                keyword: keyword.into(),
                reply: Some(tx),
            },
            rx,
        )
    }
}

/// How a finished search affected the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchReport {
    /// The store now holds `count` items from this search.
    Replaced { count: usize },
    /// The response had no item list; the store was left alone.
    NoItems,
    /// The search failed; the store was left alone.
    Failed { kind: SearchErrorKind },
    /// The store actor was gone before the list could be delivered.
    StoreUnavailable,
}
