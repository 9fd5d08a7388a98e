//! Panel rendering constants.

/// Header title of the panel.
pub(crate) const PANEL_TITLE: &str = "Messages";

/// Total width of the rendered panel in characters.
pub(crate) const PANEL_WIDTH: usize = 44;

/// Prefix for the active row.
pub(crate) const ACTIVE_MARKER: &str = "> ";

/// Prefix for every other row.
pub(crate) const ROW_INDENT: &str = "  ";
