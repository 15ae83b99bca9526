//! Presentation-side view of the result store.
//!
//! Only ever updated from store snapshots; the TUI never edits the list.
use okashi_actors::StoreSnapshot;
use okashi_api::{ResultItem, ResultList};

pub struct ResultsPane {
    items: ResultList,
    revision: u64,
    selected: usize,
}

impl Default for ResultsPane {
    fn default() -> Self {
        Self {
            items: Vec::new().into(),
            revision: 0,
            selected: 0,
        }
    }
}

impl ResultsPane {
    /// Adopt a new snapshot. Selection resets to the top whenever the list
    /// was replaced; stale snapshots are ignored.
    pub fn apply(&mut self, snap: &StoreSnapshot) -> bool {
        if snap.revision <= self.revision && self.revision != 0 {
            return false;
        }
        self.items = snap.items.clone();
        self.revision = snap.revision;
        self.selected = 0;
        true
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&ResultItem> {
        self.items.get(self.selected)
    }

    /// 1-based lookup, as shown on screen.
    pub fn nth(&self, n: usize) -> Option<&ResultItem> {
        n.checked_sub(1).and_then(|i| self.items.get(i))
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }
}
