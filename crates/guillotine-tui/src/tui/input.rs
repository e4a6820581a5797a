// Keyboard input handling.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState changes (scrolling, tab selection,
// the profile cursor).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::{TabId, UserCommand};

const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press goes to the app
/// orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both press and release.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    match key_event.code {
        KeyCode::Left | KeyCode::Char('h') => Some(UserCommand::PreviousSeason),
        KeyCode::Right | KeyCode::Char('l') => Some(UserCommand::NextSeason),

        KeyCode::Char('-') | KeyCode::Char('_') => Some(UserCommand::ShiftWeek(-1)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UserCommand::ShiftWeek(1)),
        KeyCode::Char('0') => Some(UserCommand::ClearWeek),

        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            Some(switch_tab(view_state, TabId::ALL[idx]))
        }
        KeyCode::Tab => Some(switch_tab(view_state, view_state.active_tab.next())),

        KeyCode::Up | KeyCode::Char('k') if view_state.active_tab == TabId::Profile => {
            view_state.profile_cursor = view_state.profile_cursor.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') if view_state.active_tab == TabId::Profile => {
            let max = view_state.profile_names().len().saturating_sub(1);
            view_state.profile_cursor = (view_state.profile_cursor + 1).min(max);
            None
        }
        KeyCode::Enter if view_state.active_tab == TabId::Profile => view_state
            .profile_names()
            .get(view_state.profile_cursor)
            .map(|name| UserCommand::ShowProfile(name.to_string())),

        KeyCode::Up | KeyCode::Char('k') => {
            view_state.scroll_offset = view_state.scroll_offset.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            view_state.scroll_offset = view_state.scroll_offset.saturating_sub(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, PAGE_SIZE);
            None
        }

        KeyCode::Char('r') => Some(UserCommand::Refresh),
        KeyCode::Char('e') => Some(UserCommand::Export),
        KeyCode::Char('q') => Some(UserCommand::Quit),

        _ => None,
    }
}

fn switch_tab(view_state: &mut ViewState, tab: TabId) -> UserCommand {
    view_state.active_tab = tab;
    view_state.scroll_offset = 0;
    UserCommand::SwitchTab(tab)
}

/// Scroll down, never past the last row of the active tab.
fn scroll_down(view_state: &mut ViewState, lines: usize) {
    let max = view_state.scroll_len().saturating_sub(1);
    view_state.scroll_offset = (view_state.scroll_offset + lines).min(max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use guillotine_core::model::{Manager, SeasonData};
    use guillotine_core::standings::{build_standings, StandingsContext};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn state_with_rows(n: usize) -> ViewState {
        let season = SeasonData {
            season: 2024,
            managers: (0..n).map(|i| Manager::new(format!("M{i}"))).collect(),
            weekly_stats: Default::default(),
            current_week: 1,
            champion: None,
            status: None,
            starting_faab: None,
        };
        ViewState {
            table: Some(build_standings(&season, &StandingsContext::default())),
            ..Default::default()
        }
    }

    #[test]
    fn season_navigation_keys() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Left), &mut state), Some(UserCommand::PreviousSeason));
        assert_eq!(handle_key(key(KeyCode::Char('h')), &mut state), Some(UserCommand::PreviousSeason));
        assert_eq!(handle_key(key(KeyCode::Right), &mut state), Some(UserCommand::NextSeason));
        assert_eq!(handle_key(key(KeyCode::Char('l')), &mut state), Some(UserCommand::NextSeason));
    }

    #[test]
    fn week_override_keys() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('-')), &mut state), Some(UserCommand::ShiftWeek(-1)));
        assert_eq!(handle_key(key(KeyCode::Char('+')), &mut state), Some(UserCommand::ShiftWeek(1)));
        assert_eq!(handle_key(key(KeyCode::Char('=')), &mut state), Some(UserCommand::ShiftWeek(1)));
        assert_eq!(handle_key(key(KeyCode::Char('0')), &mut state), Some(UserCommand::ClearWeek));
    }

    #[test]
    fn action_keys() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('r')), &mut state), Some(UserCommand::Refresh));
        assert_eq!(handle_key(key(KeyCode::Char('e')), &mut state), Some(UserCommand::Export));
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn ctrl_c_quits() {
        let mut state = ViewState::default();
        let event = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_key(event, &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn release_events_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key(event, &mut state), None);
    }

    #[test]
    fn scrolling_is_bounded_by_rows() {
        let mut state = state_with_rows(3);
        assert_eq!(handle_key(key(KeyCode::Up), &mut state), None);
        assert_eq!(state.scroll_offset, 0);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.scroll_offset, 2);
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut state = state_with_rows(3);
        state.scroll_offset = 2;
        assert_eq!(
            handle_key(key(KeyCode::Char('2')), &mut state),
            Some(UserCommand::SwitchTab(TabId::Recap))
        );
        assert_eq!(state.active_tab, TabId::Recap);
        assert_eq!(state.scroll_offset, 0);
        assert_eq!(
            handle_key(key(KeyCode::Char('5')), &mut state),
            Some(UserCommand::SwitchTab(TabId::League))
        );
        assert_eq!(
            handle_key(key(KeyCode::Tab), &mut state),
            Some(UserCommand::SwitchTab(TabId::Standings))
        );
        assert_eq!(state.active_tab, TabId::Standings);
    }

    #[test]
    fn profile_tab_picks_a_manager() {
        let mut state = state_with_rows(3);
        handle_key(key(KeyCode::Char('3')), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::ShowProfile("M0".into()))
        );
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.profile_cursor, 2);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::ShowProfile("M2".into()))
        );
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.profile_cursor, 1);
        // Standings scrolling is untouched.
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn enter_outside_profile_tab_does_nothing() {
        let mut state = state_with_rows(3);
        assert_eq!(handle_key(key(KeyCode::Enter), &mut state), None);
    }

    #[test]
    fn unknown_keys_do_nothing() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('z')), &mut state), None);
        assert_eq!(state.scroll_offset, 0);
    }
}
