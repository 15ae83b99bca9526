use crate::actor::{
    spawn_actor_reserved, spawn_actor_with_shutdown, Actor, ActorHandle, Addr, Reserved,
};
use crate::system::{ActorSystem, ShutdownHandle};
use anyhow::Result;

/// Wires actors together: reserve or spawn them, hand back their addresses,
/// and own the shutdown of everything it started.
pub struct Builder {
    sys: ActorSystem,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            sys: ActorSystem::new(),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.sys.shutdown_handle()
    }

    /// Reserve an actor's mailbox so its `Addr` can be handed out before it
    /// is constructed.
    pub fn reserve<A: Actor>(&mut self, name: &str, mailbox: usize) -> Reserved<A> {
        tracing::debug!(actor = name, mailbox, "builder.reserved");
        spawn_actor_reserved::<A>(name.to_string(), mailbox)
    }

    /// Start a previously reserved actor and track its task.
    pub fn start_reserved<A>(&mut self, r: Reserved<A>, actor: A) -> &mut Self
    where
        A: Actor,
    {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h = r.start_with_shutdown(actor, Some(shutdown_rx));
        self.sys.track(async move {
            h.task.await??;
            Ok(())
        });
        self
    }

    /// Spawn an actor and track its task under `name`.
    pub fn spawn<A: Actor>(&mut self, name: &str, mailbox: usize, actor: A) -> Addr<A> {
        tracing::debug!(actor = name, mailbox, "builder.spawned");
        let shutdown_rx = self.sys.shutdown_notifier();
        let h: ActorHandle<A> = spawn_actor_with_shutdown(actor, mailbox, Some(shutdown_rx));
        let addr = h.addr.clone();
        self.sys.track(async move {
            h.task.await??;
            Ok(())
        });
        addr
    }

    pub async fn graceful_shutdown(self) -> Result<()> {
        self.sys.graceful_shutdown().await
    }

    /// Block until CTRL-C or an internal shutdown signal, then shut down.
    pub async fn run_until_ctrl_c(self) -> Result<()> {
        let mut shutdown_rx = self.sys.shutdown_notifier();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("builder.ctrl_c");
            }
            _ = shutdown_rx.recv() => {
                tracing::info!("builder.shutdown_signalled");
            }
        }
        self.graceful_shutdown().await
    }
}
