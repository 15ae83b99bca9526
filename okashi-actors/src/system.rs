//! Task tracking and shutdown signalling for the actor set.
//!
//! Actors subscribe to a broadcast channel for cooperative shutdown; their
//! tasks live in a `JoinSet` so teardown can await every one of them and
//! surface the first failure.
use anyhow::Result;
use tokio::{sync::broadcast, task::JoinSet};

#[derive(Clone)]
pub struct ShutdownHandle {
    tx: broadcast::Sender<()>,
}

impl ShutdownHandle {
    pub fn signal(&self) {
        let _ = self.tx.send(());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

pub struct ActorSystem {
    joinset: JoinSet<Result<()>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Default for ActorSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorSystem {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(8);
        Self {
            joinset: JoinSet::new(),
            shutdown_tx,
        }
    }

    pub fn shutdown_notifier(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    pub fn track(&mut self, fut: impl std::future::Future<Output = Result<()>> + Send + 'static) {
        self.joinset.spawn(fut);
    }

    /// Broadcast shutdown and wait for every tracked task.
    pub async fn graceful_shutdown(mut self) -> Result<()> {
        let _ = self.shutdown_tx.send(());
        let mut first_err = None;
        while let Some(res) = self.joinset.join_next().await {
            let outcome = res.map_err(anyhow::Error::from).and_then(|r| r);
            if let Err(e) = outcome {
                tracing::warn!(error = ?e, "system.task_failed");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn graceful_shutdown_waits_for_subscribers() {
        let mut sys = ActorSystem::new();
        let mut rx = sys.shutdown_notifier();
        sys.track(async move {
            let _ = rx.recv().await;
            Ok(())
        });
        tokio::time::timeout(std::time::Duration::from_secs(5), sys.graceful_shutdown())
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn graceful_shutdown_reports_task_failure() {
        let mut sys = ActorSystem::new();
        sys.track(async { anyhow::bail!("boom") });
        sys.track(async { Ok(()) });
        let err = sys.graceful_shutdown().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
