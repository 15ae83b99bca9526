//! Terminal front end: keyword input, result list, detail pane and a log,
//! driven by store snapshots. Opening an item goes through [`BrowserView`].
mod browser;
mod command;
mod feeders;
mod results;
mod styles;
mod transcript;
mod tui;
mod view;

pub use browser::{BrowserView, SystemBrowser};
pub use feeders::spawn_tui_feeders;
pub use tui::{TuiActor, TuiMsg};
