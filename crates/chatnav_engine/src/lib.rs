//! Chatnav engine: page parsing, synthetic layout, platform rules, and
//! message scanning.
mod classify;
mod layout;
mod rules;
mod scan;
mod snapshot;
mod storage;
mod types;

pub use rules::{
    profile_for_url, MessageOrder, PlatformProfile, ScrollBehavior, GENERIC_PROFILE,
    PLATFORM_PROFILES,
};
pub use scan::scan_messages;
pub use snapshot::PageSnapshot;
pub use storage::{ensure_state_dir, AtomicStateFile, StoreError};
pub use types::{BoundingBox, NodePath, ScanHit, ScanOutcome, ScanPass};
