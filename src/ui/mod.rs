//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`subplants`]: Stage-grouped subplant table with trends and hotspots
//! - [`assets`]: Filtered asset table and node list
//! - [`alerts`]: Alert table with lifecycle actions
//! - [`common`]: Header, tabs, status bar, help overlay
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │ View content                         │
//! │ (subplants/assets/alerts::render)    │
//! ├──────────────────────────────────────┤
//! │ Status bar (common::render_status)   │
//! └──────────────────────────────────────┘
//! ```

pub mod alerts;
pub mod assets;
pub mod common;
pub mod subplants;
pub mod theme;

pub use theme::Theme;

use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;

use crate::app::{App, View};

/// Row where view tables begin; used for mouse hit-testing.
pub const CONTENT_START_ROW: u16 = 3;

/// Draw one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let [header, tabs, content, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    common::render_header(frame, app, header);
    common::render_tabs(frame, app, tabs);

    if app.data.is_some() {
        match app.current_view {
            View::Subplants => subplants::render(frame, app, content),
            View::Assets => assets::render(frame, app, content),
            View::Alerts => alerts::render(frame, app, content),
        }
    } else {
        common::render_waiting(frame, app, content);
    }

    common::render_status_bar(frame, app, status);

    if app.show_help {
        common::render_help(frame, app, frame.area());
    }
}
