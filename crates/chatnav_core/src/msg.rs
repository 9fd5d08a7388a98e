use crate::state::{Candidate, ElementKey, Rect};

/// Everything that can happen to the navigator. The driver translates
/// platform events into these; `update` is the only consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The page finished loading and the host profile is selected.
    PageReady { url: String },
    /// Persisted collapsed flag arrived from storage.
    CollapsedLoaded(bool),
    /// The observed DOM subtree changed in some way.
    MutationObserved,
    /// A scan pass finished: fresh candidates plus refreshed geometry for
    /// already-tracked elements.
    ScanCompleted {
        candidates: Vec<Candidate>,
        refreshed: Vec<(ElementKey, Rect)>,
    },
    /// Periodic URL poll result, whether or not it changed.
    UrlPolled(String),
    /// The conversation viewport scrolled.
    ViewportScrolled { scroll_top: f32, viewport_height: f32 },
    /// The user clicked a numbered panel row.
    RowClicked { index: usize },
    /// The user clicked the collapse toggle.
    ToggleCollapsed,
    /// Frame pulse; drives nothing but render gating.
    Tick,
    NoOp,
}
