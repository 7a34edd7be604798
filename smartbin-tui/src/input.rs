use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `app.navigate`(...), which mounts or unmounts the live monitor
    Navigate(Route),
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Char, Down, Left, Right, Tab, Up};

    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    // Navigation bar
    match key.code {
        Char('1') => return Action::Navigate(Route::Dashboard),
        Char('2') => return Action::Navigate(Route::LiveBins),
        Char('3') => return Action::Navigate(Route::Prediction),
        Tab | Right => return Action::Navigate(app.route.next()),
        BackTab | Left => return Action::Navigate(app.route.previous()),
        _ => {}
    }

    if app.route == Route::LiveBins {
        match key.code {
            Up | Char('k') => app.scroll_up(),
            Down | Char('j') => app.scroll_down(),
            _ => {}
        }
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use smartbin_core::{
        service::SmartBinService,
        testing::{ScriptedPort, response},
    };

    use super::*;

    fn app() -> App {
        let port = Arc::new(ScriptedPort::always(|| Ok(response(Vec::new()))));
        App::new(
            Arc::new(SmartBinService::new(port)),
            Duration::from_secs(5),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_shortcuts() {
        let mut app = app();
        assert_eq!(handle_key_event(press(KeyCode::Char('q')), &mut app), Action::Quit);
        assert_eq!(
            handle_key_event(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &mut app
            ),
            Action::Quit
        );
    }

    #[test]
    fn number_keys_pick_routes() {
        let mut app = app();
        assert_eq!(
            handle_key_event(press(KeyCode::Char('2')), &mut app),
            Action::Navigate(Route::LiveBins)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('3')), &mut app),
            Action::Navigate(Route::Prediction)
        );
    }

    #[test]
    fn tab_cycles_from_current_route() {
        let mut app = app();
        assert_eq!(
            handle_key_event(press(KeyCode::Tab), &mut app),
            Action::Navigate(Route::LiveBins)
        );
        assert_eq!(
            handle_key_event(press(KeyCode::BackTab), &mut app),
            Action::Navigate(Route::Prediction)
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = app();
        let mut release = press(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(handle_key_event(release, &mut app), Action::None);
    }
}
