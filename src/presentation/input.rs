use crate::application::{App, AppMode, ExportFormat};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Keypad => Self::handle_keypad_mode(app, key),
            AppMode::EditName => Self::handle_name_mode(app, key),
            AppMode::ConfirmReset => Self::handle_confirm_reset_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('e') = key {
                app.export(ExportFormat::Xlsx);
            }
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.move_down(),
            KeyCode::Left | KeyCode::Char('h') => app.move_left(),
            KeyCode::Right | KeyCode::Char('l') => app.move_right(),
            KeyCode::Tab => app.toggle_column(),
            KeyCode::Enter | KeyCode::F(2) => app.open_keypad_at_selection(),
            KeyCode::Char('a') => app.add_row(),
            KeyCode::Char('d') => app.remove_last_row(),
            KeyCode::Char('r') => app.request_reset(),
            KeyCode::Char('x') => app.export(ExportFormat::Xlsx),
            KeyCode::Char('v') => app.export(ExportFormat::Csv),
            KeyCode::Char('n') => app.start_name_edit(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            // Will be handled by main loop
            KeyCode::Char('q') => {}
            _ => {}
        }
    }

    fn handle_keypad_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => app.keypad_digit(c),
            KeyCode::Char('t') => app.keypad_triple_zero(),
            KeyCode::Backspace => app.keypad_backspace(),
            KeyCode::Delete | KeyCode::Char('c') => app.keypad_clear(),
            KeyCode::Enter | KeyCode::Tab => app.keypad_next(),
            KeyCode::Esc => app.close_keypad(),
            _ => {}
        }
    }

    fn handle_name_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_name_edit(),
            KeyCode::Esc => app.cancel_name_edit(),
            KeyCode::Backspace => app.name_backspace(),
            KeyCode::Delete => app.name_delete(),
            KeyCode::Left => app.name_cursor_left(),
            KeyCode::Right => app.name_cursor_right(),
            KeyCode::Home => app.name_cursor_home(),
            KeyCode::End => app.name_cursor_end(),
            KeyCode::Char(c) => app.name_insert(c),
            _ => {}
        }
    }

    fn handle_confirm_reset_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('c') | KeyCode::Char('C') => {
                app.confirm_reset()
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('k') | KeyCode::Esc => {
                app.cancel_reset()
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActiveTarget, Column};

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_opens_keypad_on_selection() {
        let mut app = App::default();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Keypad);
        assert_eq!(app.active_target(), Some(ActiveTarget::new(2, Column::B)));
    }

    #[test]
    fn test_keypad_typing_and_next() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "12t");
        assert_eq!(app.rows.get(1).unwrap().bill_a, 12_000.0);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_target(), Some(ActiveTarget::new(1, Column::B)));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_keypad_ignores_letters() {
        let mut app = App::default();
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "5q");
        assert_eq!(app.keypad.digits(), "5");
        assert_eq!(app.mode, AppMode::Keypad);
    }

    #[test]
    fn test_row_buttons() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.rows.len(), 10);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.rows.len(), 8);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.mode, AppMode::ConfirmReset);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.rows.len(), 10);

        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.rows.len(), 9);
    }

    #[test]
    fn test_name_entry() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, AppMode::EditName);
        type_str(&mut app, "Mai");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.display_name, "Mai");
    }

    #[test]
    fn test_help_toggle() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.help_scroll, 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }
}
