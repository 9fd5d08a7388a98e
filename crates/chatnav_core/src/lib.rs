//! Chatnav core: pure navigator state machine and view-model helpers.
mod effect;
mod msg;
mod settings;
mod state;
mod text;
mod update;
mod view_model;

pub use effect::{Effect, ScanKind};
pub use msg::Msg;
pub use settings::{MessageOrdering, NavigatorSettings, PrimingScroll, ProfileSettings};
pub use state::{Candidate, ElementKey, NavigatorState, Rect, TrackedMessage};
pub use text::normalize_display_text;
pub use update::update;
pub use view_model::{PanelViewModel, RowView};
