use crate::styles;
use crate::transcript::TranscriptLine;
use anyhow::Result;
use okashi_api::ResultItem;
use ratatui::{
    Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use textwrap::wrap;

pub struct ViewSnap {
    pub input: String,
    pub input_cursor: usize,
    pub names: Vec<String>,
    pub selected: Option<usize>,
    pub detail: Option<ResultItem>,
    pub revision: u64,
    pub lines: Vec<TranscriptLine>,
    pub scroll: usize,
    pub busy: u32,
    pub spinner: &'static str,
}

pub fn draw<B: Backend>(term: &mut Terminal<B>, snap: &ViewSnap) -> Result<()> {
    term.draw(|frame| {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(7),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![Span::styled(
            " okashi · Toriko snack search ",
            styles::title(),
        )]));
        frame.render_widget(header, layout[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(layout[1]);

        // Result list
        let items: Vec<ListItem> = snap
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>3} ", i + 1), styles::index()),
                    Span::styled(name.clone(), styles::value()),
                ]))
            })
            .collect();
        let title = format!(" Results ({}) ", snap.names.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(styles::selected());
        let mut state = ListState::default().with_selected(snap.selected);
        frame.render_stateful_widget(list, body[0], &mut state);

        // Detail pane
        let detail = Paragraph::new(detail_lines(snap.detail.as_ref()))
            .block(Block::default().borders(Borders::ALL).title(" Detail "))
            .wrap(Wrap { trim: false });
        frame.render_widget(detail, body[1]);

        // Activity log
        let visible_h = layout[2].height.saturating_sub(2) as usize;
        let content_width = layout[2].width.saturating_sub(2) as usize;
        let wrapped = wrap_transcript(&snap.lines, content_width);
        let total = wrapped.len();
        let start = total.saturating_sub(visible_h + snap.scroll);
        let end = total.saturating_sub(snap.scroll);
        let log_items: Vec<ListItem> = wrapped[start..end]
            .iter()
            .map(|(text, style)| ListItem::new(Line::from(Span::styled(text.clone(), *style))))
            .collect();
        let log = List::new(log_items).block(Block::default().borders(Borders::ALL).title(" Log "));
        frame.render_widget(log, layout[2]);

        // Input box
        let input_box = Paragraph::new(snap.input.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keyword (Enter: search · empty Enter: open) "),
        );
        frame.render_widget(Clear, layout[3]);
        frame.render_widget(input_box, layout[3]);

        frame.set_cursor_position(caret_position(layout[3], &snap.input, snap.input_cursor));

        // Status bar
        let status_line = Line::from(vec![
            Span::raw(" "),
            Span::styled(snap.spinner, Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            if snap.busy > 0 {
                Span::styled("Searching…", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("Idle", Style::default().fg(Color::Green))
            },
            Span::raw(format!(" • in flight: {} • rev: {}", snap.busy, snap.revision)),
        ]);
        let status = Paragraph::new(status_line)
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        frame.render_widget(status, layout[4]);
    })?;

    Ok(())
}

fn detail_lines(item: Option<&ResultItem>) -> Vec<Line<'static>> {
    let Some(item) = item else {
        return vec![Line::from(Span::styled(
            "Nothing selected. Type a keyword and press Enter.",
            styles::dim(),
        ))];
    };
    vec![
        Line::from(Span::styled(item.name().to_string(), styles::label())),
        Line::from(""),
        Line::from(Span::styled("Page", styles::dim())),
        Line::from(Span::styled(item.detail_url().to_string(), styles::link())),
        Line::from(""),
        Line::from(Span::styled("Thumbnail", styles::dim())),
        Line::from(Span::styled(item.image_url().to_string(), styles::link())),
    ]
}

fn visual_caret_col(input: &str, cursor: usize) -> usize {
    use unicode_width::UnicodeWidthStr;
    UnicodeWidthStr::width(&input[..cursor])
}

/// Caret inside the bordered input box, pinned to its last column once the
/// text is wider than the box.
fn caret_position(area: Rect, input: &str, cursor: usize) -> Position {
    let inner = area.width.saturating_sub(2);
    let col = u16::try_from(visual_caret_col(input, cursor))
        .unwrap_or(u16::MAX)
        .min(inner);
    Position {
        x: area.x.saturating_add(1).saturating_add(col),
        y: area.y.saturating_add(1),
    }
}

fn wrap_transcript(lines: &[TranscriptLine], width: usize) -> Vec<(String, Style)> {
    let effective_width = width.max(1);
    let mut out = Vec::new();

    for entry in lines {
        let style = entry.style;
        for raw_line in entry.text.split('\n') {
            if raw_line.is_empty() {
                out.push((String::new(), style));
                continue;
            }
            out.extend(
                wrap(raw_line, effective_width)
                    .into_iter()
                    .map(|seg| (seg.into_owned(), style)),
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use url::Url;

    fn screen(term: &Terminal<TestBackend>) -> String {
        term.backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn caret_counts_wide_characters() {
        let s = "ポッキー";
        assert_eq!(visual_caret_col(s, s.len()), 8);
        assert_eq!(visual_caret_col("abc", 1), 1);
    }

    #[test]
    fn caret_stays_inside_input_box_for_wide_input() {
        let area = Rect::new(2, 10, 20, 3);
        assert_eq!(caret_position(area, "abc", 3), Position { x: 6, y: 11 });

        let pasted = "あ".repeat(40_000);
        let pos = caret_position(area, &pasted, pasted.len());
        assert_eq!(pos, Position { x: 2 + 1 + 18, y: 11 });

        let edge = Rect::new(u16::MAX - 4, 0, 4, 3);
        assert_eq!(caret_position(edge, &pasted, pasted.len()).x, u16::MAX - 1);
    }

    #[test]
    fn long_log_lines_wrap() {
        let lines = vec![TranscriptLine::new("one two three four".into(), Style::default())];
        let wrapped = wrap_transcript(&lines, 9);
        let texts: Vec<&str> = wrapped.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, ["one two", "three", "four"]);
    }

    #[test]
    fn renders_list_and_selected_detail() {
        let item = ResultItem::new(
            "Pocky",
            Url::parse("https://sysbird.jp/toriko/pocky").unwrap(),
            Url::parse("https://sysbird.jp/toriko/pocky.jpg").unwrap(),
        );
        let snap = ViewSnap {
            input: String::new(),
            input_cursor: 0,
            names: vec!["Pocky".into(), "Pretz".into()],
            selected: Some(0),
            detail: Some(item),
            revision: 1,
            lines: vec![TranscriptLine::new("searched".into(), Style::default())],
            scroll: 0,
            busy: 0,
            spinner: " ",
        };
        let mut term = Terminal::new(TestBackend::new(100, 24)).unwrap();
        draw(&mut term, &snap).unwrap();

        let text = screen(&term);
        assert!(text.contains("Results (2)"));
        assert!(text.contains("Pretz"));
        assert!(text.contains("https://sysbird.jp/toriko/pocky"));
        assert!(text.contains("Thumbnail"));
        assert!(text.contains("https://sysbird.jp/toriko/pocky.jpg"));
        assert!(text.contains("Idle"));
    }
}
