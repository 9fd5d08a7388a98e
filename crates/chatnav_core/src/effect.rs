use std::time::Duration;

use crate::settings::PrimingScroll;
use crate::state::ElementKey;

/// Why a scan was requested. Pending scans of the same kind coalesce in
/// the driver, so a mutation burst yields one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    /// First scan after page load.
    Initial,
    /// Re-scan after the conversation URL changed and the page settled.
    ConversationSwitch,
    /// Delayed sweep after DOM mutations.
    MutationSweep,
}

/// Side effects `update` asks the driver to perform. The core never
/// touches the DOM, a clock, or storage itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run a scan pass after `delay`. Zero means next driver turn.
    ScheduleScan { kind: ScanKind, delay: Duration },
    /// Smooth-scroll the element into view, optionally preceded by a
    /// small priming scroll, then pulse-highlight it for `pulse`.
    ScrollToMessage {
        key: ElementKey,
        priming: Option<PrimingScroll>,
        pulse: Duration,
    },
    /// Write the collapsed flag to per-host storage.
    PersistCollapsed(bool),
}
