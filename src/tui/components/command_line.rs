//! # CommandLine Component
//!
//! The `:` prompt. A single-line buffer that owns the keyboard while open.
//!
//! - Enter submits the line (the navigator parses and runs it)
//! - Esc, or Backspace on an empty line, cancels
//! - Tab completes against services, `service/type` pairs, aliases and
//!   command words: a unique match is filled in, several matches extend the
//!   buffer to their longest common prefix

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLineEvent {
    Submit(String),
    Cancel,
}

pub struct CommandLine {
    pub buffer: String,
    candidates: Vec<String>,
    width: u16,
}

impl CommandLine {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            buffer: String::new(),
            candidates,
            width: 0,
        }
    }

    pub fn resize(&mut self, width: u16) {
        self.width = width;
    }

    /// Candidates that start with the current buffer.
    pub fn matches(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .filter(|c| c.starts_with(self.buffer.as_str()))
            .map(String::as_str)
            .collect()
    }

    fn complete(&mut self) {
        let matches = self.matches();
        let Some(first) = matches.first() else {
            return;
        };
        let common = matches.iter().skip(1).fold(first.to_string(), |prefix, m| {
            prefix
                .chars()
                .zip(m.chars())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect()
        });
        if common.len() > self.buffer.len() {
            self.buffer = common;
        }
    }

    /// Text that fits in `width` cells, keeping the tail (where the cursor is) visible.
    fn visible_tail(&self, width: usize) -> &str {
        let mut start = 0;
        while self.buffer[start..].width() > width {
            match self.buffer[start..].chars().next() {
                Some(c) => start += c.len_utf8(),
                None => break,
            }
        }
        &self.buffer[start..]
    }
}

impl EventHandler for CommandLine {
    type Event = CommandLineEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<CommandLineEvent> {
        match event {
            TuiEvent::Escape => Some(CommandLineEvent::Cancel),
            TuiEvent::Submit => Some(CommandLineEvent::Submit(self.buffer.trim().to_string())),
            TuiEvent::Backspace if self.buffer.is_empty() => Some(CommandLineEvent::Cancel),
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Tab => {
                self.complete();
                None
            }
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            _ => None,
        }
    }
}

impl Component for CommandLine {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);

        let text_width = (inner.width as usize).saturating_sub(1);
        let visible = self.visible_tail(text_width);
        let hint = match self.matches().as_slice() {
            [only] if *only != self.buffer => format!("  → {only}"),
            _ => String::new(),
        };
        let line = Line::from(vec![
            Span::styled(":", Style::default().fg(Color::Cyan)),
            Span::raw(visible.to_string()),
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);

        let cursor_x = inner.x + 1 + visible.width() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> CommandLine {
        CommandLine::new(vec![
            "ec2".to_string(),
            "ec2/instances".to_string(),
            "ec2/volumes".to_string(),
            "sg".to_string(),
        ])
    }

    fn type_str(line: &mut CommandLine, text: &str) {
        for c in text.chars() {
            line.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_submit_returns_trimmed_buffer() {
        let mut cl = line();
        type_str(&mut cl, " sg ");
        assert_eq!(
            cl.handle_event(&TuiEvent::Submit),
            Some(CommandLineEvent::Submit("sg".to_string()))
        );
    }

    #[test]
    fn test_backspace_on_empty_cancels() {
        let mut cl = line();
        type_str(&mut cl, "s");
        assert_eq!(cl.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(
            cl.handle_event(&TuiEvent::Backspace),
            Some(CommandLineEvent::Cancel)
        );
    }

    #[test]
    fn test_tab_extends_to_common_prefix() {
        let mut cl = line();
        type_str(&mut cl, "ec2/");
        cl.handle_event(&TuiEvent::Tab);
        assert_eq!(cl.buffer, "ec2/");

        type_str(&mut cl, "v");
        cl.handle_event(&TuiEvent::Tab);
        assert_eq!(cl.buffer, "ec2/volumes");
    }

    #[test]
    fn test_tab_without_matches_keeps_buffer() {
        let mut cl = line();
        type_str(&mut cl, "zz");
        cl.handle_event(&TuiEvent::Tab);
        assert_eq!(cl.buffer, "zz");
    }

    #[test]
    fn test_visible_tail_keeps_end() {
        let mut cl = line();
        type_str(&mut cl, "abcdefgh");
        assert_eq!(cl.visible_tail(3), "fgh");
    }
}
