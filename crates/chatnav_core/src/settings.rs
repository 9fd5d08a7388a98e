use std::time::Duration;

/// Tunable constants for the navigator.
///
/// The defaults reproduce the empirically-tuned values the heuristics were
/// calibrated with; none of the logic depends on these exact numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorSettings {
    /// Two candidates whose boxes differ by at most this much in both top
    /// and left are treated as the same on-screen element.
    pub position_tolerance: f32,
    /// Display texts longer than this many chars are truncated with `...`.
    pub display_text_limit: usize,
    /// Delay between an observed DOM mutation and the follow-up sweep.
    pub rescan_delay: Duration,
    /// Settling delay between a conversation switch and the rebuild scan.
    pub settle_delay: Duration,
    /// How long the highlight pulse stays on a scrolled-to message.
    pub pulse_duration: Duration,
    /// Greeting prefixes stripped (once) from the front of message text.
    pub greeting_prefixes: Vec<String>,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            position_tolerance: 5.0,
            display_text_limit: 30,
            rescan_delay: Duration::from_millis(500),
            settle_delay: Duration::from_millis(1000),
            pulse_duration: Duration::from_millis(1000),
            greeting_prefixes: vec![
                "You said".to_string(),
                "你说".to_string(),
                "User".to_string(),
                "用户".to_string(),
            ],
        }
    }
}

/// How tracked messages are ordered in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageOrdering {
    /// Panel order follows admission order.
    #[default]
    Insertion,
    /// Panel is re-sorted by vertical page position after every admission;
    /// needed for platforms that deliver messages newest-first.
    ByPosition,
}

/// A small scroll issued before the real scroll-to-message, for platforms
/// whose scroll container needs waking up first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimingScroll {
    pub pixels: f32,
    pub delay: Duration,
}

/// The platform-conditioned knobs the pure core needs. The full platform
/// rule table lives on the DOM side; only ordering and the scroll quirk
/// influence state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProfileSettings {
    pub ordering: MessageOrdering,
    pub priming: Option<PrimingScroll>,
}
