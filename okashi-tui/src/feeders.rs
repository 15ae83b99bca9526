use crate::tui::{TuiActor, TuiMsg};
use crossterm::event::{self, Event as CtEvent};
use okashi_actors::StoreSnapshot;
use okashi_actors::actor::Addr;
use okashi_actors::system::ShutdownHandle;
use std::io;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::{self, time};

/// Upper bound on how long the input thread blocks before rechecking shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Drive the TUI actor: terminal input, redraw ticks, and store updates.
pub fn spawn_tui_feeders(
    tui: Addr<TuiActor>,
    store_rx: watch::Receiver<StoreSnapshot>,
    shutdown: ShutdownHandle,
) {
    spawn_input_feeder(tui.clone(), &shutdown, poll_terminal);

    let tui_tick = tui.clone();
    let mut shutdown_tick = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_millis(80));
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => break,
                _ = interval.tick() => {
                    let _ = tui_tick.try_send(TuiMsg::Tick);
                }
            }
        }
    });

    spawn_store_feeder(tui, store_rx, shutdown);
}

fn spawn_store_feeder(
    tui: Addr<TuiActor>,
    mut store_rx: watch::Receiver<StoreSnapshot>,
    shutdown: ShutdownHandle,
) {
    let mut shutdown_store = shutdown.subscribe();
    tokio::spawn(async move {
        // Deliver whatever the store already holds before waiting for changes.
        let initial = store_rx.borrow_and_update().clone();
        if tui.send(TuiMsg::StoreUpdated(initial)).await.is_err() {
            return;
        }
        loop {
            tokio::select! {
                _ = shutdown_store.recv() => break,
                changed = store_rx.changed() => {
                    if changed.is_err() {
                        tracing::debug!("tui.store_feeder.closed");
                        break;
                    }
                    let snap = store_rx.borrow_and_update().clone();
                    if tui.send(TuiMsg::StoreUpdated(snap)).await.is_err() {
                        break;
                    }
                }
            }
        }
    });
}

/// Wait up to `timeout` for one terminal event.
fn poll_terminal(timeout: Duration) -> io::Result<Option<CtEvent>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Read terminal input on one blocking thread until shutdown, the TUI going
/// away, or a read error. `read` must return within its timeout so the
/// thread never outlives the runtime by more than one poll interval.
fn spawn_input_feeder<R>(
    tui: Addr<TuiActor>,
    shutdown: &ShutdownHandle,
    mut read: R,
) -> JoinHandle<()>
where
    R: FnMut(Duration) -> io::Result<Option<CtEvent>> + Send + 'static,
{
    let mut shutdown_rx = shutdown.subscribe();
    let rt = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || {
        loop {
            if !matches!(shutdown_rx.try_recv(), Err(TryRecvError::Empty)) {
                break;
            }
            match read(INPUT_POLL) {
                Ok(Some(ev)) => {
                    if rt.block_on(tui.send(TuiMsg::InputEvent(ev))).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "tui.input_feeder.read_failed");
                    let _ = rt.block_on(tui.send(TuiMsg::OpError(format!("input: {e}"))));
                    break;
                }
            }
        }
        tracing::debug!("tui.input_feeder.stopped");
    })
}
