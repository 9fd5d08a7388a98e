use std::time::Duration;

use crate::{Effect, Msg, NavigatorState, ScanKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: NavigatorState, msg: Msg) -> (NavigatorState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageReady { url } => {
            state.set_url(url);
            state.mark_dirty();
            vec![Effect::ScheduleScan {
                kind: ScanKind::Initial,
                delay: Duration::ZERO,
            }]
        }
        Msg::CollapsedLoaded(collapsed) => {
            state.set_collapsed(collapsed);
            Vec::new()
        }
        Msg::MutationObserved => {
            let delay = state.settings().rescan_delay;
            vec![Effect::ScheduleScan {
                kind: ScanKind::MutationSweep,
                delay,
            }]
        }
        Msg::ScanCompleted {
            candidates,
            refreshed,
        } => {
            state.refresh_bounds(refreshed);
            for candidate in candidates {
                state.admit(candidate);
            }
            Vec::new()
        }
        Msg::UrlPolled(url) => match state.url() {
            // First poll seeds the baseline; nothing to rebuild yet.
            None => {
                state.set_url(url);
                Vec::new()
            }
            Some(current) if current == url => Vec::new(),
            Some(_) => {
                let delay = state.settings().settle_delay;
                state.reset_for(url);
                vec![Effect::ScheduleScan {
                    kind: ScanKind::ConversationSwitch,
                    delay,
                }]
            }
        },
        Msg::ViewportScrolled {
            scroll_top,
            viewport_height,
        } => {
            state.sync_active(scroll_top, viewport_height);
            Vec::new()
        }
        Msg::RowClicked { index } => match state.message_at(index) {
            Some(message) => {
                let key = message.key.clone();
                let priming = state.profile().priming;
                let pulse = state.settings().pulse_duration;
                state.set_active(key.clone());
                vec![Effect::ScrollToMessage {
                    key,
                    priming,
                    pulse,
                }]
            }
            None => Vec::new(),
        },
        Msg::ToggleCollapsed => {
            let collapsed = state.toggle_collapsed();
            vec![Effect::PersistCollapsed(collapsed)]
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
