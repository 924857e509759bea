use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable piece of chrome (title bar, status bar, command line).
///
/// Components receive their data as props (struct fields) and render into
/// the `Rect` they are given. Full screens are [`View`](super::view::View)s
/// instead; they are owned by the navigator and can ask for transitions.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
