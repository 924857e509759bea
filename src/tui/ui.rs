//! Frame layout: title line, the navigator's screen, status line. The
//! command line and the startup warnings draw over the top of that.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ cloudnav | ec2/instances | dev @ us-east-1    │  title (1)
//! ├───────────────────────────────────────────────┤
//! │                                               │
//! │   current view, then modals bottom-up         │  body
//! │                                               │
//! ├───────────────────────────────────────────────┤
//! │ :ec2 inst                                     │  command line (2, over body)
//! │ INFO Deleted vol-1                            │  status (1)
//! └───────────────────────────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{StatusBar, TitleBar, WarningsOverlay};
use crate::tui::navigator::Navigator;

/// Body area for a terminal of the given size. Views are told this size on
/// resize so paging matches what they are drawn into.
pub fn body_area(area: Rect) -> Rect {
    let [_, body, _] = split(area);
    body
}

fn split(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area)
}

pub fn draw(frame: &mut Frame, app: &App, nav: &mut Navigator) {
    let [title_area, body, status_area] = split(frame.area());

    TitleBar::new(
        nav.current_title(),
        app.selection.summary(),
        app.refresh.in_progress(),
    )
    .render(frame, title_area);

    nav.render(frame, body, app);

    StatusBar::new(app.status.current().cloned(), nav.status_line()).render(frame, status_area);

    if let Some(line) = nav.command_line_mut() {
        let height = 2.min(body.height);
        let area = Rect::new(body.x, body.bottom() - height, body.width, height);
        line.render(frame, area);
    }

    if let Some(warnings) = nav.warnings() {
        WarningsOverlay::new(warnings).render(frame, frame.area());
    }
}
