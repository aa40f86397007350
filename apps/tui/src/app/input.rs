use crate::app::helpers::{step_through, wrap_decrement, wrap_increment};
use crate::app::state::{App, LoadState};
use crossterm::event::KeyCode;
use facility_map_core::{Mode, SelectionAction};

pub fn handle_input(app: &mut App, key: KeyCode) {
    if handle_help_toggle(app, key) {
        return;
    }

    if app.search.is_some() {
        handle_search_input(app, key);
        return;
    }

    if app.load_state != LoadState::Ready {
        if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
            app.running = false;
        }
        return;
    }

    handle_map_input(app, key);
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) || (key == KeyCode::Char('?') && app.search.is_none()) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

fn handle_map_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            if let Some(mode) = Mode::from_index(index) {
                app.select(SelectionAction::Toggle(mode));
            }
        }
        KeyCode::Char('a') => app.select(SelectionAction::SelectAll),
        KeyCode::Char('c') => app.select(SelectionAction::Clear),
        KeyCode::Char('+' | '=') => app.zoom(1.0),
        KeyCode::Char('-') => app.zoom(-1.0),
        KeyCode::Left => app.pan(-1.0, 0.0),
        KeyCode::Right => app.pan(1.0, 0.0),
        KeyCode::Up => app.pan(0.0, 1.0),
        KeyCode::Down => app.pan(0.0, -1.0),
        KeyCode::Char('f') => app.frame_data(),
        KeyCode::Char('/') => app.open_search(),
        KeyCode::Tab | KeyCode::BackTab => {
            let visible = app.visible_facilities();
            let forward = key == KeyCode::Tab;
            if let Some(index) = step_through(&visible, app.hovered, forward) {
                app.focus(index);
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.search = None;
        }
        KeyCode::Enter => {
            let chosen = app.search.take().and_then(|search| search.current());
            if let Some(index) = chosen {
                app.focus(index);
            }
        }
        KeyCode::Backspace => app.search_input(|query| {
            query.pop();
        }),
        KeyCode::Char(c) => app.search_input(|query| query.push(c)),
        KeyCode::Down => {
            if let Some(search) = app.search.as_mut() {
                search.selected = wrap_increment(search.selected, search.matches.len());
            }
        }
        KeyCode::Up => {
            if let Some(search) = app.search.as_mut() {
                search.selected = wrap_decrement(search.selected, search.matches.len());
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::tests::ready_app;
    use facility_map_core::MapConfig;

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            handle_input(app, *key);
        }
    }

    #[test]
    fn number_keys_toggle_modes() {
        let mut app = ready_app();
        press(&mut app, &[KeyCode::Char('1')]);
        let selection = app.controller.as_ref().map(|c| c.selection().clone());
        assert_eq!(selection.map(|s| s.contains(Mode::Air)), Some(false));

        press(&mut app, &[KeyCode::Char('1')]);
        let selection = app.controller.as_ref().map(|c| c.selection().is_all());
        assert_eq!(selection, Some(true));
    }

    #[test]
    fn clear_and_select_all() {
        let mut app = ready_app();
        press(&mut app, &[KeyCode::Char('c')]);
        assert_eq!(app.controller.as_ref().map(|c| c.counts().selected), Some(0));
        press(&mut app, &[KeyCode::Char('a')]);
        assert_eq!(app.controller.as_ref().map(|c| c.counts().selected), Some(3));
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = ready_app();
        press(&mut app, &[KeyCode::F(1), KeyCode::Char('q')]);
        assert!(app.running && app.show_help);
        press(&mut app, &[KeyCode::Esc, KeyCode::Char('q')]);
        assert!(!app.show_help && !app.running);
    }

    #[test]
    fn only_quit_works_while_loading() {
        let mut app = App::new(MapConfig::default());
        press(&mut app, &[KeyCode::Char('c'), KeyCode::Char('+')]);
        assert!(app.controller.is_none());
        assert!(app.running);
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(!app.running);
    }

    #[test]
    fn search_enter_focuses_match() {
        let mut app = ready_app();
        press(&mut app, &[KeyCode::Char('/')]);
        for c in "union".chars() {
            press(&mut app, &[KeyCode::Char(c)]);
        }
        press(&mut app, &[KeyCode::Enter]);
        assert!(app.search.is_none());
        assert_eq!(app.hovered, Some(0));
        assert!(app.running);
    }

    #[test]
    fn zoom_keys_change_zoom() {
        let mut app = ready_app();
        let before = app.transition.map_or(app.camera, |t| t.target()).zoom;
        press(&mut app, &[KeyCode::Char('+')]);
        assert!(app.camera.zoom > before);
        assert!(app.transition.is_none());
    }
}
