//! Keyboard input dispatch — overlays first, then dashboard controls.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{AppState, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Filter { original } => {
            let original = original.clone();
            handle_filter_overlay(app, key, original);
            return;
        }
        Overlay::None => {}
    }

    // 2. Dashboard controls.
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('/') => {
            app.filter_input = app.params.filter.clone();
            app.overlay = Overlay::Filter {
                original: app.params.filter.clone(),
            };
        }
        KeyCode::Esc if !app.params.filter.is_empty() => app.set_filter(""),
        KeyCode::Char('c') => app.cycle_currency(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_count(1),
        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_count(-1),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('r') => app.force_refresh(),
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
        }
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// The filter applies live as the user types; Esc restores the previous one.
fn handle_filter_overlay(app: &mut AppState, key: KeyEvent, original: String) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.filter_input.clear();
            if app.params.filter != original {
                app.set_filter(original);
            }
        }
        KeyCode::Enter => {
            app.overlay = Overlay::None;
            app.filter_input.clear();
        }
        KeyCode::Backspace => {
            if app.filter_input.pop().is_some() {
                let text = app.filter_input.clone();
                app.set_filter(text);
            }
        }
        KeyCode::Char(c) => {
            app.filter_input.push(c);
            let text = app.filter_input.clone();
            app.set_filter(text);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::harness;
    use coinboard_core::{Currency, SortField};
    use crossterm::event::KeyModifiers;
    use proptest::prelude::*;

    fn press(c: KeyCode) -> KeyEvent {
        KeyEvent::new(c, KeyModifiers::NONE)
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn quit() {
        let mut h = harness();
        handle_key(&mut h.app, press(KeyCode::Char('q')));
        assert!(!h.app.running);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut h = harness();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut h.app, key);
        assert!(h.app.running);
    }

    #[test]
    fn controls_cycle() {
        let mut h = harness();
        handle_key(&mut h.app, press(KeyCode::Char('c')));
        handle_key(&mut h.app, press(KeyCode::Char('s')));
        handle_key(&mut h.app, press(KeyCode::Char('+')));
        assert_eq!(h.app.params.currency, Currency::Eur);
        assert_eq!(h.app.params.sort_field, SortField::TotalVolume);
        assert_eq!(h.app.params.count, 11);
    }

    #[test]
    fn filter_edits_live_and_enter_keeps_it() {
        let mut h = harness();
        handle_key(&mut h.app, press(KeyCode::Char('/')));
        type_str(&mut h.app, "bitx");
        assert_eq!(h.app.params.filter, "bitx");
        handle_key(&mut h.app, press(KeyCode::Backspace));
        assert_eq!(h.app.params.filter, "bit");
        handle_key(&mut h.app, press(KeyCode::Enter));

        assert_eq!(h.app.overlay, Overlay::None);
        assert_eq!(h.app.params.filter, "bit");

        // Keys typed in the filter never reached the controls.
        assert_eq!(h.app.params.currency, Currency::Usd);
    }

    #[test]
    fn filter_escape_restores_previous() {
        let mut h = harness();
        h.app.set_filter("eth");
        handle_key(&mut h.app, press(KeyCode::Char('/')));
        type_str(&mut h.app, "ereum");
        assert_eq!(h.app.params.filter, "ethereum");
        handle_key(&mut h.app, press(KeyCode::Esc));
        assert_eq!(h.app.params.filter, "eth");
    }

    #[test]
    fn escape_clears_active_filter() {
        let mut h = harness();
        h.app.set_filter("doge");
        handle_key(&mut h.app, press(KeyCode::Esc));
        assert!(h.app.params.filter.is_empty());
    }

    #[test]
    fn overlays_open_and_close() {
        let mut h = harness();
        handle_key(&mut h.app, press(KeyCode::Char('?')));
        assert_eq!(h.app.overlay, Overlay::Help);
        handle_key(&mut h.app, press(KeyCode::Char('x')));
        assert_eq!(h.app.overlay, Overlay::None);

        handle_key(&mut h.app, press(KeyCode::Char('e')));
        assert_eq!(h.app.overlay, Overlay::ErrorHistory);
        handle_key(&mut h.app, press(KeyCode::Char('q')));
        assert_eq!(h.app.overlay, Overlay::None);
        assert!(h.app.running);
    }

    #[test]
    fn refresh_key_forces_network() {
        let mut h = harness();
        handle_key(&mut h.app, press(KeyCode::Char('r')));
        assert!(h.app.force_network);
        assert!(h.app.driver.is_forced());
    }

    proptest! {
        #[test]
        fn count_never_leaves_bounds(steps in prop::collection::vec(prop::bool::ANY, 0..60)) {
            let mut h = harness();
            for up in steps {
                let c = if up { '+' } else { '-' };
                handle_key(&mut h.app, press(KeyCode::Char(c)));
                prop_assert!((5..=20).contains(&h.app.params.count));
            }
        }
    }
}
