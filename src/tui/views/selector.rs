//! # Selector
//!
//! Modal multi-select over profiles or regions. Space toggles, Enter applies
//! (the navigator closes every modal and refreshes the current view), `?`
//! opens help on top of the selector, Esc closes it unchanged.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding};

use crate::core::selection::{Selection, SelectionChange, SelectionKind};
use crate::core::state::App;
use crate::core::status::StatusMessage;
use crate::tui::components::centered_rect;
use crate::tui::event::TuiEvent;
use crate::tui::view::{Cursor, Intent, View, ViewId, ViewKind, next_view_id};
use crate::tui::views::help::HelpView;

pub struct SelectorView {
    id: ViewId,
    kind: SelectionKind,
    options: Vec<(String, bool)>,
    cursor: Cursor,
    list_state: ListState,
}

impl SelectorView {
    pub fn new(kind: SelectionKind, selection: &Selection) -> Self {
        let current = selection.current(kind);
        let options: Vec<(String, bool)> = selection
            .options(kind)
            .into_iter()
            .map(|option| {
                let chosen = current.contains(&option);
                (option, chosen)
            })
            .collect();
        let first_chosen = options.iter().position(|(_, chosen)| *chosen).unwrap_or(0);
        Self {
            id: next_view_id(),
            kind,
            options,
            cursor: Cursor { index: first_chosen },
            list_state: ListState::default(),
        }
    }

    pub fn chosen(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|(_, chosen)| *chosen)
            .map(|(option, _)| option.clone())
            .collect()
    }

    fn toggle(&mut self) {
        if let Some((_, chosen)) = self.options.get_mut(self.cursor.index) {
            *chosen = !*chosen;
        }
    }

    fn apply(&self) -> Vec<Intent> {
        let values = self.chosen();
        if values.is_empty() {
            return vec![Intent::Status(StatusMessage::warning(format!(
                "Choose at least one of the {}",
                self.kind.label().to_lowercase()
            )))];
        }
        vec![Intent::Select(SelectionChange {
            kind: self.kind,
            values,
        })]
    }
}

impl View for SelectorView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Selector
    }

    fn title(&self) -> String {
        self.kind.label().to_string()
    }

    fn init(&mut self, _app: &App) -> Vec<Intent> {
        self.cursor.clamp(self.options.len());
        Vec::new()
    }

    fn handle_event(&mut self, event: &TuiEvent, _app: &App) -> Vec<Intent> {
        if self.cursor.handle_key(event, self.options.len(), 10) {
            return Vec::new();
        }
        match event {
            TuiEvent::InputChar(' ') => {
                self.toggle();
                Vec::new()
            }
            TuiEvent::Submit => self.apply(),
            TuiEvent::InputChar('?') => vec![Intent::ShowModal(Box::new(HelpView::new()))],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _app: &App) {
        let popup = centered_rect(40, 60, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.kind.label()))
            .padding(Padding::horizontal(1));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [list_area, hint_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|(option, chosen)| {
                let mark = if *chosen { "[x] " } else { "[ ] " };
                ListItem::new(Line::from(vec![Span::raw(mark), Span::raw(option.clone())]))
            })
            .collect();
        self.list_state
            .select((!self.options.is_empty()).then_some(self.cursor.index));
        let list =
            List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, list_area, &mut self.list_state);

        frame.render_widget(
            Line::from(Span::styled(
                "Space toggle  Enter apply  Esc cancel",
                Style::default().fg(Color::DarkGray),
            )),
            hint_area,
        );
    }

    fn status_line(&self) -> String {
        format!("{} of {} chosen", self.chosen().len(), self.options.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    fn regions() -> Selection {
        let mut selection = Selection::new(
            vec!["dev".to_string()],
            vec!["us-east-1".to_string()],
        );
        selection.merge_regions(&["eu-west-1".to_string(), "us-west-2".to_string()]);
        selection
    }

    #[test]
    fn test_current_values_start_checked() {
        let selector = SelectorView::new(SelectionKind::Regions, &regions());
        assert_eq!(selector.chosen(), vec!["us-east-1"]);
        assert_eq!(selector.options.len(), 3);
        // Options are sorted; the cursor starts on the first chosen one.
        assert_eq!(selector.cursor.index, 1);
    }

    #[test]
    fn test_toggle_and_apply() {
        let app = test_app();
        let mut selector = SelectorView::new(SelectionKind::Regions, &regions());
        selector.handle_event(&TuiEvent::CursorDown, &app);
        selector.handle_event(&TuiEvent::InputChar(' '), &app);

        let intents = selector.handle_event(&TuiEvent::Submit, &app);
        match intents.as_slice() {
            [Intent::Select(change)] => {
                assert_eq!(change.kind, SelectionKind::Regions);
                assert_eq!(change.values, vec!["us-east-1", "us-west-2"]);
            }
            other => panic!("unexpected intents: {other:?}"),
        }
    }

    #[test]
    fn test_empty_choice_is_refused() {
        let app = test_app();
        let mut selector = SelectorView::new(SelectionKind::Regions, &regions());
        selector.handle_event(&TuiEvent::InputChar(' '), &app);

        let intents = selector.handle_event(&TuiEvent::Submit, &app);
        assert!(matches!(intents.as_slice(), [Intent::Status(_)]));
    }

    #[test]
    fn test_help_opens_on_top() {
        let app = test_app();
        let mut selector = SelectorView::new(SelectionKind::Profiles, &app.selection);
        let intents = selector.handle_event(&TuiEvent::InputChar('?'), &app);
        assert!(matches!(intents.as_slice(), [Intent::ShowModal(_)]));
    }
}
