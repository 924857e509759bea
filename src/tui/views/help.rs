//! Key bindings, commands and aliases, as a modal.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::core::state::App;
use crate::tui::components::centered_rect;
use crate::tui::event::TuiEvent;
use crate::tui::view::{Intent, View, ViewId, ViewKind, next_view_id};

const KEYS: &[(&str, &str)] = &[
    ("↑/↓ j/k", "move"),
    ("Enter", "open / drill down"),
    ("Esc q", "back (q quits at home)"),
    ("H", "home"),
    (":", "command line"),
    ("/", "filter the list"),
    ("m", "mark for diff"),
    ("Ctrl+D", "delete (press twice)"),
    ("n", "next page"),
    ("r", "reload"),
    ("R / P", "choose regions / profiles"),
    ("L", "activity log"),
    ("Ctrl+C", "quit"),
];

const COMMANDS: &[(&str, &str)] = &[
    (":<service> [type] [id]", "open a service, list or resource"),
    (":<alias>", "open an alias"),
    (":region a,b  :profile x", "change the selection"),
    (":filter <text>", "filter the list"),
    (":diff <id> <id>", "compare two resources"),
    (":home :back :activity", "navigate"),
    (":q", "quit"),
];

pub struct HelpView {
    id: ViewId,
    scroll: u16,
}

impl HelpView {
    pub fn new() -> Self {
        Self {
            id: next_view_id(),
            scroll: 0,
        }
    }
}

impl Default for HelpView {
    fn default() -> Self {
        Self::new()
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn entry(key: &str, what: &str, width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<width$}"), Style::default().fg(Color::Yellow)),
        Span::raw(what.to_string()),
    ])
}

impl View for HelpView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Help
    }

    fn title(&self) -> String {
        "Help".to_string()
    }

    fn init(&mut self, _app: &App) -> Vec<Intent> {
        Vec::new()
    }

    fn handle_event(&mut self, event: &TuiEvent, _app: &App) -> Vec<Intent> {
        match event {
            TuiEvent::Submit => return vec![Intent::CloseModal],
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => {
                self.scroll = self.scroll.saturating_sub(1)
            }
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => self.scroll += 1,
            TuiEvent::Home | TuiEvent::InputChar('g') => self.scroll = 0,
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let popup = centered_rect(70, 80, area);
        frame.render_widget(Clear, popup);

        let mut lines = vec![section("Keys")];
        lines.extend(KEYS.iter().map(|(k, w)| entry(k, w, 10)));
        lines.push(Line::from(""));
        lines.push(section("Commands"));
        lines.extend(COMMANDS.iter().map(|(k, w)| entry(k, w, 26)));
        lines.push(Line::from(""));
        lines.push(section("Aliases"));
        for (alias, target) in app.registry.aliases() {
            lines.push(entry(alias, &target.to_string(), 10));
        }

        let max = (lines.len() as u16).saturating_sub(popup.height.saturating_sub(2));
        self.scroll = self.scroll.min(max);
        let help = Paragraph::new(lines).scroll((self.scroll, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_bottom(" Enter / Esc to close ")
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(help, popup);
    }

    fn status_line(&self) -> String {
        "Enter / Esc close".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_enter_closes() {
        let app = test_app();
        let mut help = HelpView::new();
        let intents = help.handle_event(&TuiEvent::Submit, &app);
        assert!(matches!(intents.as_slice(), [Intent::CloseModal]));
    }

    #[test]
    fn test_lists_keys_and_aliases() {
        let app = test_app();
        let mut help = HelpView::new();
        let mut terminal = Terminal::new(TestBackend::new(120, 60)).unwrap();
        terminal.draw(|f| help.render(f, f.area(), &app)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("command line"));
        assert!(text.contains("ec2/security-groups"));
    }
}
