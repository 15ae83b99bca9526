//! Result store actor.
//!
//! Holds the current [`ResultList`] inside a `watch` channel. The actor is the
//! channel's only writer; subscribers get read-only receivers and are woken on
//! every wholesale replace. There is no partial update.
use crate::actor::{Actor, Addr, Context};
use crate::{StoreMsg, StoreSnapshot};
use anyhow::{anyhow, Result};
use okashi_api::{ResultItem, ResultList};
use tokio::sync::{oneshot, watch};
use tracing::{debug, info};

pub struct ResultStore {
    tx: watch::Sender<StoreSnapshot>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StoreSnapshot::empty());
        Self { tx }
    }

    fn replace_all(&mut self, items: Vec<ResultItem>) {
        let items: ResultList = items.into();
        let count = items.len();
        let revision = self.tx.borrow().revision + 1;
        let prev = self.tx.send_replace(StoreSnapshot { revision, items });
        info!(
            revision,
            count,
            previous = prev.items.len(),
            observers = self.tx.receiver_count(),
            "store.replace_all"
        );
    }
}

#[async_trait::async_trait]
impl Actor for ResultStore {
    type Msg = StoreMsg;

    async fn handle(&mut self, msg: Self::Msg, _ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            StoreMsg::ReplaceAll(items) => self.replace_all(items),
            StoreMsg::Snapshot { reply } => {
                if reply.send(self.tx.borrow().clone()).is_err() {
                    debug!("store.snapshot.reply_dropped");
                }
            }
            StoreMsg::Subscribe { reply } => {
                if reply.send(self.tx.subscribe()).is_err() {
                    debug!("store.subscribe.reply_dropped");
                }
            }
        }
        Ok(())
    }
}

impl Addr<ResultStore> {
    /// Queue a wholesale replace behind every message already in the mailbox.
    pub async fn replace_all(&self, items: Vec<ResultItem>) -> Result<()> {
        self.send(StoreMsg::ReplaceAll(items))
            .await
            .map_err(|_| anyhow!("result store mailbox closed"))
    }

    pub async fn snapshot(&self) -> Result<StoreSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreMsg::Snapshot { reply })
            .await
            .map_err(|_| anyhow!("result store mailbox closed"))?;
        rx.await.map_err(|_| anyhow!("result store dropped snapshot reply"))
    }

    pub async fn subscribe(&self) -> Result<watch::Receiver<StoreSnapshot>> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreMsg::Subscribe { reply })
            .await
            .map_err(|_| anyhow!("result store mailbox closed"))?;
        rx.await.map_err(|_| anyhow!("result store dropped subscribe reply"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{spawn_actor, ActorHandle};
    use url::Url;

    fn items(names: &[&str]) -> Vec<ResultItem> {
        names
            .iter()
            .map(|n| {
                ResultItem::new(
                    *n,
                    Url::parse(&format!("https://sysbird.jp/toriko/{n}")).unwrap(),
                    Url::parse(&format!("https://sysbird.jp/toriko/{n}.jpg")).unwrap(),
                )
            })
            .collect()
    }

    fn names(snap: &StoreSnapshot) -> Vec<String> {
        snap.items.iter().map(|i| i.name().to_string()).collect()
    }

    #[tokio::test]
    async fn starts_empty_at_revision_zero() {
        let ActorHandle { addr, .. } = spawn_actor(ResultStore::new(), 8);
        let snap = addr.snapshot().await.unwrap();
        assert_eq!(snap.revision, 0);
        assert!(snap.items.is_empty());
    }

    #[tokio::test]
    async fn replace_all_discards_previous_contents() {
        let ActorHandle { addr, .. } = spawn_actor(ResultStore::new(), 8);
        addr.replace_all(items(&["a", "b", "c"])).await.unwrap();
        addr.replace_all(items(&["d"])).await.unwrap();

        let snap = addr.snapshot().await.unwrap();
        assert_eq!(snap.revision, 2);
        assert_eq!(names(&snap), ["d"]);
    }

    #[tokio::test]
    async fn replacing_with_empty_list_clears() {
        let ActorHandle { addr, .. } = spawn_actor(ResultStore::new(), 8);
        addr.replace_all(items(&["a"])).await.unwrap();
        addr.replace_all(Vec::new()).await.unwrap();
        let snap = addr.snapshot().await.unwrap();
        assert_eq!(snap.revision, 2);
        assert!(snap.items.is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_each_replace() {
        let ActorHandle { addr, .. } = spawn_actor(ResultStore::new(), 8);
        let mut rx = addr.subscribe().await.unwrap();
        assert_eq!(rx.borrow_and_update().revision, 0);

        addr.replace_all(items(&["x", "y"])).await.unwrap();
        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.revision, 1);
        assert_eq!(names(&seen), ["x", "y"]);
    }

    #[tokio::test]
    async fn snapshots_are_immutable_after_later_replaces() {
        let ActorHandle { addr, .. } = spawn_actor(ResultStore::new(), 8);
        addr.replace_all(items(&["old"])).await.unwrap();
        let held = addr.snapshot().await.unwrap();
        addr.replace_all(items(&["new"])).await.unwrap();
        assert_eq!(names(&held), ["old"]);
        assert_eq!(names(&addr.snapshot().await.unwrap()), ["new"]);
    }

    #[tokio::test]
    async fn closed_store_surfaces_errors() {
        let ActorHandle { addr, task } = spawn_actor(ResultStore::new(), 8);
        task.abort();
        let _ = task.await;
        assert!(addr.snapshot().await.is_err());
        assert!(addr.replace_all(Vec::new()).await.is_err());
    }
}
