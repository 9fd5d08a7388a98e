use std::collections::HashSet;

use crate::settings::{MessageOrdering, NavigatorSettings, ProfileSettings};
use crate::text::normalize_display_text;
use crate::view_model::{PanelViewModel, RowView};

/// An element bounding box in document coordinates (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn vertical_center(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Non-owning identity handle for a DOM element: the child-element index
/// path from the document root. Keys never keep a node alive; a key whose
/// element is gone simply stops resolving on the DOM side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ElementKey(Vec<u32>);

impl ElementKey {
    pub fn from_path(path: Vec<u32>) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &[u32] {
        &self.0
    }
}

/// A scanner finding, not yet admitted to the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub key: ElementKey,
    /// Raw extracted text; normalization happens at admission.
    pub text: String,
    pub bounds: Rect,
    /// True when the element is, or contains, an editable/input control.
    pub editable: bool,
}

/// A user message accepted into the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedMessage {
    pub key: ElementKey,
    /// Normalized display text (prefix-stripped, whitespace-collapsed,
    /// truncated). Also the text-registry dedup key.
    pub text: String,
    /// 1-based ordinal; always dense 1..N in panel order.
    pub index: usize,
    /// Last known bounding box, refreshed on every completed scan.
    pub bounds: Rect,
}

/// The navigator's entire mutable state. One owned value threaded through
/// `update`; nothing global.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorState {
    settings: NavigatorSettings,
    profile: ProfileSettings,
    url: Option<String>,
    messages: Vec<TrackedMessage>,
    seen_texts: HashSet<String>,
    seen_keys: HashSet<ElementKey>,
    collapsed: bool,
    active: Option<ElementKey>,
    dirty: bool,
}

impl Default for NavigatorState {
    fn default() -> Self {
        Self::new(ProfileSettings::default())
    }
}

impl NavigatorState {
    pub fn new(profile: ProfileSettings) -> Self {
        Self::with_settings(profile, NavigatorSettings::default())
    }

    pub fn with_settings(profile: ProfileSettings, settings: NavigatorSettings) -> Self {
        Self {
            settings,
            profile,
            url: None,
            messages: Vec::new(),
            seen_texts: HashSet::new(),
            seen_keys: HashSet::new(),
            collapsed: false,
            active: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> PanelViewModel {
        let active_index = self
            .active
            .as_ref()
            .and_then(|key| self.messages.iter().find(|m| &m.key == key))
            .map(|m| m.index);
        PanelViewModel {
            collapsed: self.collapsed,
            active_index,
            rows: self
                .messages
                .iter()
                .map(|m| RowView {
                    index: m.index,
                    label: m.text.clone(),
                    key: m.key.clone(),
                })
                .collect(),
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    pub fn settings(&self) -> &NavigatorSettings {
        &self.settings
    }

    pub fn profile(&self) -> &ProfileSettings {
        &self.profile
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn messages(&self) -> &[TrackedMessage] {
        &self.messages
    }

    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn active_key(&self) -> Option<&ElementKey> {
        self.active.as_ref()
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.url = Some(url);
    }

    pub(crate) fn set_collapsed(&mut self, collapsed: bool) {
        if self.collapsed != collapsed {
            self.collapsed = collapsed;
            self.dirty = true;
        }
    }

    pub(crate) fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.dirty = true;
        self.collapsed
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Full reset on conversation switch: registries and tracked list are
    /// emptied before any delayed rescan runs. The collapsed flag survives,
    /// it belongs to the panel, not the conversation.
    pub(crate) fn reset_for(&mut self, url: String) {
        self.url = Some(url);
        self.messages.clear();
        self.seen_texts.clear();
        self.seen_keys.clear();
        self.active = None;
        self.dirty = true;
    }

    pub(crate) fn message_at(&self, index: usize) -> Option<&TrackedMessage> {
        self.messages.iter().find(|m| m.index == index)
    }

    pub(crate) fn set_active(&mut self, key: ElementKey) {
        if self.active.as_ref() != Some(&key) {
            self.active = Some(key);
            self.dirty = true;
        }
    }

    /// Candidate admission. Rejection rules, in order: editable elements,
    /// empty or already-seen normalized text, already-seen element key,
    /// near-coincident bounding position. Idempotent per distinct message.
    pub(crate) fn admit(&mut self, candidate: Candidate) -> bool {
        if candidate.editable {
            return false;
        }

        let text = normalize_display_text(
            &candidate.text,
            &self.settings.greeting_prefixes,
            self.settings.display_text_limit,
        );
        if text.is_empty() || self.seen_texts.contains(&text) {
            return false;
        }

        if self.seen_keys.contains(&candidate.key) {
            return false;
        }

        let tolerance = self.settings.position_tolerance;
        let coincides = self.messages.iter().any(|m| {
            (m.bounds.top - candidate.bounds.top).abs() <= tolerance
                && (m.bounds.left - candidate.bounds.left).abs() <= tolerance
        });
        if coincides {
            return false;
        }

        self.seen_texts.insert(text.clone());
        self.seen_keys.insert(candidate.key.clone());
        self.messages.push(TrackedMessage {
            key: candidate.key,
            text,
            index: self.messages.len() + 1,
            bounds: candidate.bounds,
        });

        if self.profile.ordering == MessageOrdering::ByPosition {
            self.reorder_by_position();
        }

        self.dirty = true;
        true
    }

    /// Re-sorts tracked messages by current vertical position and
    /// reassigns a dense 1..N. Used by platforms that deliver messages
    /// newest-first.
    fn reorder_by_position(&mut self) {
        self.messages
            .sort_by(|a, b| a.bounds.top.total_cmp(&b.bounds.top));
        for (position, message) in self.messages.iter_mut().enumerate() {
            message.index = position + 1;
        }
    }

    /// Updates last-known boxes for still-resolvable tracked elements.
    /// Geometry refreshes never force a render on their own.
    pub(crate) fn refresh_bounds(&mut self, refreshed: Vec<(ElementKey, Rect)>) {
        for (key, bounds) in refreshed {
            if let Some(message) = self.messages.iter_mut().find(|m| m.key == key) {
                message.bounds = bounds;
            }
        }
    }

    /// Makes the message whose vertical center is closest to the viewport
    /// center the active one. Ties go to the first message in iteration
    /// order. A no-op with nothing tracked.
    pub(crate) fn sync_active(&mut self, scroll_top: f32, viewport_height: f32) {
        let viewport_center = scroll_top + viewport_height / 2.0;

        let mut closest: Option<(ElementKey, f32)> = None;
        for message in &self.messages {
            let distance = (message.bounds.vertical_center() - viewport_center).abs();
            let better = match &closest {
                Some((_, best)) => distance < *best,
                None => true,
            };
            if better {
                closest = Some((message.key.clone(), distance));
            }
        }

        if let Some((key, _)) = closest {
            self.set_active(key);
        }
    }
}
