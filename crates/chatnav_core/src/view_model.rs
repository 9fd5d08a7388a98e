use crate::state::ElementKey;

/// Snapshot of what the panel should show. Derived from state on demand;
/// renderers never reach into `NavigatorState` directly.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelViewModel {
    pub collapsed: bool,
    pub rows: Vec<RowView>,
    /// Ordinal of the highlighted row, if any.
    pub active_index: Option<usize>,
}

/// One numbered panel row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub index: usize,
    pub label: String,
    pub key: ElementKey,
}
