use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View, EXPORT_FILE};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // any key closes help
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    if handle_view_key(app, key) {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        KeyCode::Char('1') => app.set_view(View::Subplants),
        KeyCode::Char('2') => app.set_view(View::Assets),
        KeyCode::Char('3') => app.set_view(View::Alerts),

        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.enter_selected(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        KeyCode::Char('r') => {
            if !app.reload_data() {
                app.set_status_message("No new data".to_string());
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('/') => app.start_filter(),
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => app.set_status_message(format!("Exported to {}", export_path.display())),
                Err(e) => app.set_status_message(format!("Export failed: {}", e)),
            }
        }

        _ => {}
    }
}

/// Keys that only mean something in one view. Returns true if handled.
fn handle_view_key(app: &mut App, key: KeyEvent) -> bool {
    match (app.current_view, key.code) {
        (View::Assets, KeyCode::Char('f')) => app.cycle_subplant_filter(true),
        (View::Assets, KeyCode::Char('F')) => app.cycle_subplant_filter(false),
        (View::Assets, KeyCode::Char('n')) => app.cycle_asset_filter(true),
        (View::Assets, KeyCode::Char('N')) => app.cycle_asset_filter(false),

        (View::Alerts, KeyCode::Char('a')) => app.acknowledge_selected(),
        (View::Alerts, KeyCode::Char('d')) => app.resolve_selected(),
        (View::Alerts, KeyCode::Char('o')) => app.reopen_selected(),
        (View::Alerts, KeyCode::Char('v')) => app.cycle_alert_severity(),
        (View::Alerts, KeyCode::Char('t')) => app.cycle_alert_status(),

        (View::Assets | View::Alerts, KeyCode::Char('x')) => app.clear_view_filters(),

        _ => return false,
    }
    true
}

/// Handle key input while search is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.filter_active = false,
        KeyCode::Esc => app.cancel_filter(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.clear_filter(),
        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }
        KeyCode::Char(c) => app.filter_push(c),
        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Content rows start below the table header
            if clicked_row > content_start_row {
                app.select_row((clicked_row - content_start_row - 1) as usize);
            }

            // Tab bar is row 1: " 1:Subplants " | " 2:Assets " | " 3:Alerts "
            if clicked_row == 1 {
                let col = mouse.column;
                if col < 14 {
                    app.set_view(View::Subplants);
                } else if col < 26 {
                    app.set_view(View::Assets);
                } else if col < 38 {
                    app.set_view(View::Alerts);
                }
            }
        }

        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::alerts::AlertStatus;
    use crate::data::layout::StageLayout;
    use crate::source::ChannelSource;
    use crate::ui::Theme;
    use plantwatch_types::{FeedBuilder, HealthStatus};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app() -> App {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::with_theme(Box::new(source), StageLayout::default(), Theme::dark());
        tx.send(
            FeedBuilder::new()
                .subplant("Bravo Bay", |s| {
                    s.asset("Press-01", |a| a.node("N1", HealthStatus::Offline))
                })
                .build(),
        )
        .unwrap();
        app.reload_data();
        app
    }

    #[test]
    fn test_view_switching_keys() {
        let mut app = loaded_app();
        handle_key_event(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::Alerts);
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.current_view, View::Subplants);
        handle_key_event(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.current_view, View::Alerts);
    }

    #[test]
    fn test_alert_keys() {
        let mut app = loaded_app();
        app.set_view(View::Alerts);
        handle_key_event(&mut app, press(KeyCode::Char('a')));
        assert_eq!(app.alerts.alerts()[0].status, AlertStatus::Acknowledged);
        handle_key_event(&mut app, press(KeyCode::Char('d')));
        assert_eq!(app.alerts.alerts()[0].status, AlertStatus::Resolved);
        handle_key_event(&mut app, press(KeyCode::Char('o')));
        assert_eq!(app.alerts.alerts()[0].status, AlertStatus::New);
    }

    #[test]
    fn test_view_keys_do_not_leak() {
        let mut app = loaded_app();
        // 'a' on the Subplants view does nothing to alerts
        handle_key_event(&mut app, press(KeyCode::Char('a')));
        assert_eq!(app.alerts.alerts()[0].status, AlertStatus::New);
    }

    #[test]
    fn test_search_input() {
        let mut app = loaded_app();
        handle_key_event(&mut app, press(KeyCode::Char('/')));
        assert!(app.filter_active);
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.filter_text, "q");
        handle_key_event(&mut app, press(KeyCode::Backspace));
        assert!(!app.filter_active);
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = loaded_app();
        handle_key_event(&mut app, press(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_enter_drills_into_assets() {
        let mut app = loaded_app();
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.current_view, View::Assets);
        assert_eq!(app.filters.subplant.label(), "Bravo Bay");
        handle_key_event(&mut app, press(KeyCode::Char('x')));
        assert!(!app.filters.is_active());
    }
}
