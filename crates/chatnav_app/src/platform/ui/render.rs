//! Pure panel rendering: view model in, printable lines out.

use chatnav_core::PanelViewModel;

use super::constants::*;

/// Renders the panel as terminal lines. No side effects; the driver
/// decides when to print.
pub(crate) fn render(view: &PanelViewModel) -> Vec<String> {
    if view.collapsed {
        return vec![format!(
            "[{} collapsed, {} hidden; `toggle` to expand]",
            PANEL_TITLE,
            view.rows.len()
        )];
    }

    let mut lines = Vec::with_capacity(view.rows.len() + 2);
    let header = format!("-- {} ({}) ", PANEL_TITLE, view.rows.len());
    lines.push(format!("{header:-<width$}", width = PANEL_WIDTH));

    if view.rows.is_empty() {
        lines.push(format!("{ROW_INDENT}(no messages tracked)"));
    }
    for row in &view.rows {
        let marker = if view.active_index == Some(row.index) {
            ACTIVE_MARKER
        } else {
            ROW_INDENT
        };
        lines.push(format!("{marker}{:>2}. {}", row.index, row.label));
    }

    lines.push("-".repeat(PANEL_WIDTH));
    lines
}
