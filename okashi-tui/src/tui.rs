use crate::{
    browser::BrowserView,
    command::{Command, parse_command},
    results::ResultsPane,
    styles,
    transcript::Transcript,
    view::{self, ViewSnap},
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::{
    event::{Event as CtEvent, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use okashi_actors::{
    SearchReport, StoreSnapshot,
    actor::{Actor, Addr, Context},
    search::SearchActor,
    system::ShutdownHandle,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    Submit(String),
    StoreUpdated(StoreSnapshot),
    SearchDone {
        keyword: String,
        report: std::result::Result<SearchReport, String>,
    },
    OpError(String),
    Shutdown,
}

/// Everything on screen that is not the terminal itself.
pub(crate) struct TuiState {
    input: String,
    input_cursor: usize,
    results: ResultsPane,
    log: Transcript,
    scroll: usize, // log lines from bottom
    busy: u32,
    spin_idx: usize,
    dirty: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        let mut log = Transcript::default();
        log.push(
            "Type a snack keyword and press Enter. `/help` lists commands.",
            styles::system(),
        );
        Self {
            input: String::new(),
            input_cursor: 0,
            results: ResultsPane::default(),
            log,
            scroll: 0,
            busy: 0,
            spin_idx: 0,
            dirty: true,
        }
    }
}

impl TuiState {
    fn cursor_left(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        while self.input_cursor > 0 && !self.input.is_char_boundary(self.input_cursor) {
            self.input_cursor -= 1;
        }
    }

    fn cursor_right(&mut self) {
        if self.input_cursor >= self.input.len() {
            return;
        }
        self.input_cursor += 1;
        while self.input_cursor < self.input.len()
            && !self.input.is_char_boundary(self.input_cursor)
        {
            self.input_cursor += 1;
        }
    }

    fn insert_char(&mut self, ch: char) {
        self.input.insert(self.input_cursor, ch);
        self.input_cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let mut prev = self.input_cursor - 1;
        while prev > 0 && !self.input.is_char_boundary(prev) {
            prev -= 1;
        }
        self.input.drain(prev..self.input_cursor);
        self.input_cursor = prev;
    }

    fn delete(&mut self) {
        if self.input_cursor >= self.input.len() {
            return;
        }
        let start = self.input_cursor;
        let mut end = start + 1;
        while end < self.input.len() && !self.input.is_char_boundary(end) {
            end += 1;
        }
        self.input.drain(start..end);
    }

    fn take_input(&mut self) -> String {
        self.input_cursor = 0;
        std::mem::take(&mut self.input)
    }

    /// Apply a key press. Returns a follow-up message for the actor, if any.
    fn handle_key(&mut self, key: KeyEvent) -> Option<TuiMsg> {
        self.dirty = true;
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Some(TuiMsg::Shutdown),
            (KeyCode::Up, _) => self.results.select_prev(),
            (KeyCode::Down, _) => self.results.select_next(),
            (KeyCode::PageUp, _) => self.scroll = self.scroll.saturating_add(3),
            (KeyCode::PageDown, _) => self.scroll = self.scroll.saturating_sub(3),
            (KeyCode::Home, KeyModifiers::CONTROL) => self.results.select_first(),
            (KeyCode::End, KeyModifiers::CONTROL) => self.results.select_last(),
            (KeyCode::Home, _) => self.input_cursor = 0,
            (KeyCode::End, _) => self.input_cursor = self.input.len(),
            (KeyCode::Enter, _) => return Some(TuiMsg::Submit(self.take_input())),
            (KeyCode::Left, _) => self.cursor_left(),
            (KeyCode::Right, _) => self.cursor_right(),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Esc, _) => {
                self.take_input();
            }
            (KeyCode::Char(ch), _) => self.insert_char(ch),
            _ => self.dirty = false,
        }
        None
    }

    fn push(&mut self, text: impl Into<String>, style: ratatui::style::Style) {
        self.log.push(text, style);
        self.scroll = 0;
        self.dirty = true;
    }

    fn set_busy(&mut self, on: bool) {
        if on {
            self.busy = self.busy.saturating_add(1)
        } else {
            self.busy = self.busy.saturating_sub(1)
        }
        self.dirty = true;
    }

    fn step_spinner(&mut self) {
        if self.busy > 0 {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    fn spinner(&self) -> &'static str {
        if self.busy > 0 {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn apply_snapshot(&mut self, snap: &StoreSnapshot) {
        if self.results.apply(snap) {
            self.dirty = true;
        }
    }

    fn record_report(&mut self, keyword: &str, report: std::result::Result<SearchReport, String>) {
        self.set_busy(false);
        match report {
            Ok(SearchReport::Replaced { count }) => {
                self.push(format!("✓ “{keyword}”: {count} item(s)"), styles::ok());
            }
            Ok(SearchReport::NoItems) => self.push(
                format!("“{keyword}”: no item list returned; keeping current results"),
                styles::dim(),
            ),
            Ok(SearchReport::Failed { kind }) => self.push(
                format!("× “{keyword}” failed ({kind}); keeping current results"),
                styles::error(),
            ),
            Ok(SearchReport::StoreUnavailable) => {
                self.push("× result store is gone", styles::error())
            }
            Err(e) => self.push(format!("× search: {e}"), styles::error()),
        }
    }

    /// Open the selected item (`None`) or the `n`th (1-based) in the browser view.
    fn open(&mut self, which: Option<usize>, browser: &dyn BrowserView) {
        let item = match which {
            None => self.results.selected(),
            Some(n) => self.results.nth(n),
        };
        let Some(item) = item.cloned() else {
            let msg = match which {
                None => "Nothing to open yet.".to_string(),
                Some(n) => format!("× No result #{n} (have {}).", self.results.len()),
            };
            self.push(msg, styles::dim());
            return;
        };
        match browser.open(item.detail_url()) {
            Ok(()) => self.push(format!("→ opened {}", item.name()), styles::system()),
            Err(e) => self.push(format!("× open failed: {e:#}"), styles::error()),
        }
    }

    fn help(&mut self) {
        self.push("Commands:", styles::label());
        for line in [
            "  <keyword>       search and replace the result list",
            "  Enter (empty)   open the selected result",
            "  /open [n]       open the selected (or n-th) result",
            "  ↑/↓             move selection · PgUp/PgDn scroll log",
            "  /quit           exit",
        ] {
            self.push(line, styles::value());
        }
    }

    fn snapshot(&self) -> ViewSnap {
        ViewSnap {
            input: self.input.clone(),
            input_cursor: self.input_cursor,
            names: self
                .results
                .items()
                .iter()
                .map(|i| i.name().to_string())
                .collect(),
            selected: self.results.selected_index(),
            detail: self.results.selected().cloned(),
            revision: self.results.revision(),
            lines: self.log.lines(),
            scroll: self.scroll,
            busy: self.busy,
            spinner: self.spinner(),
        }
    }
}

pub struct TuiActor {
    // deps
    search: Addr<SearchActor>,
    browser: Box<dyn BrowserView>,

    // terminal
    term: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
    last_tick: Instant,

    state: TuiState,

    // shutdown coordination
    shutdown: ShutdownHandle,
}

impl TuiActor {
    pub fn new(
        search: Addr<SearchActor>,
        browser: Box<dyn BrowserView>,
        shutdown: ShutdownHandle,
    ) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;
        term.clear()?;

        Ok(Self {
            search,
            browser,
            term,
            tick_rate: Duration::from_millis(80),
            last_tick: Instant::now(),
            state: TuiState::default(),
            shutdown,
        })
    }

    fn draw(&mut self) -> Result<()> {
        let snap = self.state.snapshot();
        view::draw(&mut self.term, &snap)
    }

    fn start_search(&mut self, keyword: String, me: Addr<TuiActor>) {
        self.state.push(format!("→ searching “{keyword}”"), styles::query());
        self.state.set_busy(true);
        let search = self.search.clone();
        tokio::spawn(async move {
            let report = search.search(keyword.as_str()).await.map_err(|e| e.to_string());
            let _ = me.send(TuiMsg::SearchDone { keyword, report }).await;
        });
    }

    fn route_submit(&mut self, line: String, me: Addr<TuiActor>) {
        let Some(cmd) = parse_command(&line) else {
            self.state.open(None, self.browser.as_ref());
            return;
        };
        match cmd {
            Command::Search(keyword) => self.start_search(keyword, me),
            Command::Open(which) => self.state.open(which, self.browser.as_ref()),
            Command::Help => self.state.help(),
            Command::Quit => {
                let _ = me.try_send(TuiMsg::Shutdown);
            }
            Command::Invalid(msg) => self.state.push(format!("× {msg}"), styles::error()),
            Command::Unknown(s) => {
                self.state.push(format!("× Unknown command: {s}"), styles::error());
                self.state.push("Try `/help`.", styles::dim());
            }
        }
    }
}

impl Drop for TuiActor {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[async_trait]
impl Actor for TuiActor {
    type Msg = TuiMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(ev) => {
                if let CtEvent::Key(k) = ev
                    && let Some(next) = self.state.handle_key(k)
                {
                    let _ = ctx.addr().try_send(next);
                }
            }
            TuiMsg::Submit(line) => self.route_submit(line, ctx.addr()),
            TuiMsg::StoreUpdated(snap) => self.state.apply_snapshot(&snap),
            TuiMsg::SearchDone { keyword, report } => self.state.record_report(&keyword, report),
            TuiMsg::OpError(e) => self.state.push(format!("× Error: {e}"), styles::error()),
            TuiMsg::Tick => {
                self.state.step_spinner();
                if self.state.dirty || self.last_tick.elapsed() >= self.tick_rate {
                    self.draw()?;
                    self.last_tick = Instant::now();
                    self.state.dirty = false;
                }
            }
            TuiMsg::Shutdown => {
                self.shutdown.signal();
                ctx.stop();
            }
        }

        Ok(())
    }
}
