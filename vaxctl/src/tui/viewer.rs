//! Scrollable read-only text, used for YAML previews and highlighted OCR.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};

use super::highlight::{MATCH_END, MATCH_START};
use super::style;

#[derive(Debug, Clone, Default)]
pub struct TextViewer {
    content: String,
    scroll: usize,
    height: usize,
}

impl TextViewer {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
    }

    fn max_scroll(&self) -> usize {
        self.content.lines().count().saturating_sub(self.height.max(1))
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let page = self.height.max(1);
        self.scroll = match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.scroll + 1,
            KeyCode::Up | KeyCode::Char('k') => self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll + page,
            KeyCode::PageUp => self.scroll.saturating_sub(page),
            KeyCode::Home => 0,
            KeyCode::End => self.max_scroll(),
            _ => return,
        }
        .min(self.max_scroll());
    }

    /// Lines with highlight markers turned into styled spans.
    pub fn lines(&self) -> Vec<Line<'static>> {
        marked_lines(&self.content)
    }
}

/// Split marked text into lines, styling the runs between markers. A run may
/// continue across a line break.
pub fn marked_lines(text: &str) -> Vec<Line<'static>> {
    let mut in_match = false;
    text.lines()
        .map(|raw| {
            let mut spans = Vec::new();
            let mut run = String::new();
            for c in raw.chars() {
                if c == MATCH_START || c == MATCH_END {
                    push_run(&mut spans, &mut run, in_match);
                    in_match = c == MATCH_START;
                } else {
                    run.push(c);
                }
            }
            push_run(&mut spans, &mut run, in_match);
            Line::from(spans)
        })
        .collect()
}

fn push_run(spans: &mut Vec<Span<'static>>, run: &mut String, in_match: bool) {
    if run.is_empty() {
        return;
    }
    let text = std::mem::take(run);
    spans.push(if in_match {
        Span::styled(text, style::MATCH)
    } else {
        Span::raw(text)
    });
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::tui::highlight::highlight;
    use crate::tui::testing::key;

    #[test]
    fn matches_become_styled_spans() {
        let text = highlight("disk", true, "ERROR: disk full").unwrap();
        let lines = marked_lines(&text);
        assert_eq!(lines.len(), 1);
        let spans = &lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "disk");
        assert_eq!(spans[1].style, style::MATCH);
        assert_eq!(spans[2].content, " full");
    }

    #[test]
    fn run_spans_line_breaks() {
        let text = format!("a{MATCH_START}b\nc{MATCH_END}d");
        let lines = marked_lines(&text);
        assert_eq!(lines[1].spans[0].content, "c");
        assert_eq!(lines[1].spans[0].style, style::MATCH);
        assert_eq!(lines[1].spans[1].style, ratatui::style::Style::default());
    }

    #[test]
    fn scroll_is_bounded_by_content() {
        let mut viewer = TextViewer::default();
        viewer.set_height(2);
        viewer.set_content("1\n2\n3\n4");
        viewer.handle_key(key(KeyCode::PageDown));
        viewer.handle_key(key(KeyCode::PageDown));
        assert_eq!(viewer.scroll(), 2);
        viewer.handle_key(key(KeyCode::Home));
        assert_eq!(viewer.scroll(), 0);
        viewer.set_content("short");
        assert_eq!(viewer.scroll(), 0);
    }
}
