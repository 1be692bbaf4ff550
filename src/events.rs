use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};
use crate::data::DetailsSession;

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
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the detail overlay is open, handle overlay-specific keys
    if app.session.is_open() {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_detail();
            }
            // Re-check the open site without leaving the overlay
            KeyCode::Char('c') => app.check_current(),
            // Retry after a failed detail fetch
            KeyCode::Char('r') => {
                if matches!(app.session, DetailsSession::Failed { .. }) {
                    app.retry_detail();
                }
            }
            _ => {}
        }
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab | KeyCode::BackTab => app.next_view(),

        // Direct view access (detail is overlay-only, via Enter)
        KeyCode::Char('1') => app.set_view(View::Sites),
        KeyCode::Char('2') => app.set_view(View::Chart),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.next_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Open detail overlay for the selected site
        KeyCode::Enter => app.open_selected_detail(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Refresh all sites now
        KeyCode::Char('r') => app.refresh_now(),

        // Force a check of the selected site
        KeyCode::Char('c') => app.check_current(),

        // Delete the selected site
        KeyCode::Char('x') => app.delete_selected(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => {
            app.select_prev();
        }
        MouseEventKind::ScrollDown => {
            app.select_next();
        }

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Content area starts after header, tabs, and table header
            if clicked_row > content_start_row && app.current_view == View::Sites {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                if item_row < app.store.len() {
                    app.selected_index = item_row;
                }
            }

            // Tab clicks (row 1, after header)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Sites (0-9), Chart (10-19)
                if col < 10 {
                    app.set_view(View::Sites);
                } else if col < 20 {
                    app.set_view(View::Chart);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => {
            app.go_back();
        }

        _ => {}
    }
}
