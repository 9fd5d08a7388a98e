use std::sync::Once;
use std::time::Duration;

use chatnav_core::{
    update, Candidate, Effect, ElementKey, Msg, NavigatorState, Rect, ScanKind,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(nav_logging::initialize_for_tests);
}

fn candidate(path: &[u32], text: &str, top: f32, left: f32) -> Candidate {
    Candidate {
        key: ElementKey::from_path(path.to_vec()),
        text: text.to_string(),
        bounds: Rect {
            top,
            left,
            width: 600.0,
            height: 40.0,
        },
        editable: false,
    }
}

fn scan(state: NavigatorState, candidates: Vec<Candidate>) -> (NavigatorState, Vec<Effect>) {
    update(
        state,
        Msg::ScanCompleted {
            candidates,
            refreshed: Vec::new(),
        },
    )
}

#[test]
fn page_ready_schedules_immediate_scan() {
    init_logging();
    let state = NavigatorState::default();

    let (mut state, effects) = update(
        state,
        Msg::PageReady {
            url: "https://chatgpt.com/c/abc".to_string(),
        },
    );

    assert_eq!(state.url(), Some("https://chatgpt.com/c/abc"));
    assert!(state.consume_dirty());
    assert_eq!(
        effects,
        vec![Effect::ScheduleScan {
            kind: ScanKind::Initial,
            delay: Duration::ZERO,
        }]
    );
}

#[test]
fn mutation_requests_delayed_sweep() {
    init_logging();
    let state = NavigatorState::default();

    let (_state, effects) = update(state, Msg::MutationObserved);

    assert_eq!(
        effects,
        vec![Effect::ScheduleScan {
            kind: ScanKind::MutationSweep,
            delay: Duration::from_millis(500),
        }]
    );
}

#[test]
fn scan_results_become_numbered_rows() {
    init_logging();
    let state = NavigatorState::default();
    let (mut state, effects) = scan(
        state,
        vec![
            candidate(&[1, 0], "first question", 100.0, 0.0),
            candidate(&[1, 2], "second question", 300.0, 0.0),
        ],
    );

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].index, 1);
    assert_eq!(view.rows[0].label, "first question");
    assert_eq!(view.rows[1].index, 2);
    assert_eq!(view.rows[1].label, "second question");
}

#[test]
fn greeting_prefix_is_stripped_before_display() {
    init_logging();
    let state = NavigatorState::default();
    let raw = "You said: What is the capital of France and what else should I know about it?";
    let (state, _effects) = scan(state, vec![candidate(&[1, 0], raw, 100.0, 0.0)]);

    let view = state.view();
    assert_eq!(view.rows[0].label, "What is the capital of France ...");
}

#[test]
fn row_click_activates_and_scrolls() {
    init_logging();
    let state = NavigatorState::default();
    let (state, _effects) = scan(
        state,
        vec![
            candidate(&[1, 0], "first", 100.0, 0.0),
            candidate(&[1, 2], "second", 300.0, 0.0),
        ],
    );

    let (state, effects) = update(state, Msg::RowClicked { index: 2 });

    assert_eq!(state.view().active_index, Some(2));
    assert_eq!(
        effects,
        vec![Effect::ScrollToMessage {
            key: ElementKey::from_path(vec![1, 2]),
            priming: None,
            pulse: Duration::from_millis(1000),
        }]
    );
}

#[test]
fn row_click_outside_panel_is_ignored() {
    init_logging();
    let state = NavigatorState::default();
    let (state, _effects) = scan(state, vec![candidate(&[1, 0], "only", 100.0, 0.0)]);

    let (state, effects) = update(state, Msg::RowClicked { index: 7 });

    assert!(effects.is_empty());
    assert_eq!(state.view().active_index, None);
}

#[test]
fn collapse_toggle_round_trips_and_persists() {
    init_logging();
    let state = NavigatorState::default();
    assert!(!state.view().collapsed);

    let (mut state, effects) = update(state, Msg::ToggleCollapsed);
    assert!(state.view().collapsed);
    assert!(state.consume_dirty());
    assert_eq!(effects, vec![Effect::PersistCollapsed(true)]);

    let (mut state, effects) = update(state, Msg::ToggleCollapsed);
    assert!(!state.view().collapsed);
    assert!(state.consume_dirty());
    assert_eq!(effects, vec![Effect::PersistCollapsed(false)]);
}

#[test]
fn persisted_collapsed_flag_is_applied_on_load() {
    init_logging();
    let state = NavigatorState::default();

    let (mut state, effects) = update(state, Msg::CollapsedLoaded(true));

    assert!(state.view().collapsed);
    assert!(state.consume_dirty());
    assert!(effects.is_empty());
}

#[test]
fn url_change_resets_and_schedules_settled_rescan() {
    init_logging();
    let state = NavigatorState::default();
    let (state, _effects) = update(
        state,
        Msg::PageReady {
            url: "https://chatgpt.com/c/abc".to_string(),
        },
    );
    let (state, _effects) = scan(state, vec![candidate(&[1, 0], "old question", 100.0, 0.0)]);
    assert_eq!(state.view().rows.len(), 1);

    // Same URL polled again: nothing happens.
    let (state, effects) = update(
        state,
        Msg::UrlPolled("https://chatgpt.com/c/abc".to_string()),
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().rows.len(), 1);

    let (mut state, effects) = update(
        state,
        Msg::UrlPolled("https://chatgpt.com/c/def".to_string()),
    );

    assert_eq!(
        effects,
        vec![Effect::ScheduleScan {
            kind: ScanKind::ConversationSwitch,
            delay: Duration::from_millis(1000),
        }]
    );
    assert_eq!(state.url(), Some("https://chatgpt.com/c/def"));
    assert!(state.consume_dirty());
    let view = state.view();
    assert!(view.rows.is_empty());
    assert_eq!(view.active_index, None);

    // Registries were cleared too: the same message is admissible again.
    let (state, _effects) = scan(state, vec![candidate(&[1, 0], "old question", 100.0, 0.0)]);
    assert_eq!(state.view().rows.len(), 1);
}

#[test]
fn first_url_poll_seeds_without_reset() {
    init_logging();
    let state = NavigatorState::default();
    let (state, _effects) = scan(state, vec![candidate(&[1, 0], "kept", 100.0, 0.0)]);

    let (state, effects) = update(
        state,
        Msg::UrlPolled("https://gemini.google.com/app/x".to_string()),
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().rows.len(), 1);
    assert_eq!(state.url(), Some("https://gemini.google.com/app/x"));
}

#[test]
fn collapsed_flag_survives_conversation_switch() {
    init_logging();
    let state = NavigatorState::default();
    let (state, _effects) = update(state, Msg::ToggleCollapsed);
    let (state, _effects) = update(state, Msg::UrlPolled("https://kimi.com/chat/1".to_string()));
    let (state, _effects) = update(state, Msg::UrlPolled("https://kimi.com/chat/2".to_string()));

    assert!(state.view().collapsed);
}
