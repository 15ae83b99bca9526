use ratatui::style::Style;
use std::collections::VecDeque;

const MAX_LINES: usize = 500;

#[derive(Clone)]
pub struct TranscriptLine {
    pub text: String,
    pub style: Style,
}

impl TranscriptLine {
    pub fn new(text: String, style: Style) -> Self {
        Self { text, style }
    }
}

/// Activity log under the result list. Oldest lines fall off the front.
#[derive(Default)]
pub struct Transcript {
    lines: VecDeque<TranscriptLine>,
}

impl Transcript {
    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        if self.lines.len() == MAX_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(TranscriptLine::new(text.into(), style));
    }

    pub fn lines(&self) -> Vec<TranscriptLine> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
