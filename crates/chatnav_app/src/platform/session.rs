//! The simulated page session and the per-host panel state store.
//!
//! The session stands in for the live browser tab: it owns the page HTML,
//! the current URL, the platform profile, and the viewport scroll offset.
//! Mutations arrive as appended fragments; navigation swaps the URL (and
//! optionally the page) and is noticed by the driver's URL poller, not
//! here.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chatnav_engine::{profile_for_url, AtomicStateFile, PageSnapshot, PlatformProfile};
use nav_logging::{nav_error, nav_info, nav_warn};
use serde::{Deserialize, Serialize};
use url::Url;

const STATE_FILENAME: &str = ".chatnav_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedPanel {
    /// Collapsed flag per hostname.
    collapsed: HashMap<String, bool>,
}

/// Durable panel preferences, keyed by host so each platform keeps its own
/// collapsed choice across runs.
pub(crate) struct PanelStore {
    dir: PathBuf,
}

impl PanelStore {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub(crate) fn load_collapsed(&self, host: &str) -> Option<bool> {
        let path = self.dir.join(STATE_FILENAME);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                nav_warn!("Failed to read panel state from {:?}: {}", path, err);
                return None;
            }
        };

        let state: PersistedPanel = match ron::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                nav_warn!("Failed to parse panel state from {:?}: {}", path, err);
                return None;
            }
        };

        state.collapsed.get(host).copied()
    }

    pub(crate) fn save_collapsed(&self, host: &str, collapsed: bool) {
        let path = self.dir.join(STATE_FILENAME);
        let mut state: PersistedPanel = match fs::read_to_string(&path) {
            Ok(text) => ron::from_str(&text).unwrap_or_default(),
            Err(_) => PersistedPanel::default(),
        };
        state.collapsed.insert(host.to_string(), collapsed);

        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&state, pretty) {
            Ok(text) => text,
            Err(err) => {
                nav_error!("Failed to serialize panel state: {}", err);
                return;
            }
        };

        let writer = AtomicStateFile::new(self.dir.clone());
        if let Err(err) = writer.write(STATE_FILENAME, &content) {
            nav_error!("Failed to write panel state to {:?}: {}", self.dir, err);
        }
    }
}

/// The page being driven: URL, parsed snapshot, platform profile, and the
/// simulated viewport.
pub(crate) struct PageSession {
    url: String,
    html: String,
    snapshot: PageSnapshot,
    profile: &'static PlatformProfile,
    scroll_top: f32,
    viewport_height: f32,
    store: PanelStore,
}

impl PageSession {
    pub(crate) fn open(
        url: String,
        html: String,
        state_dir: PathBuf,
        viewport_height: f32,
    ) -> Self {
        let profile = profile_for_url(&url);
        nav_info!("Opened {} with the {} profile", url, profile.name);
        Self {
            snapshot: PageSnapshot::parse(&html),
            url,
            html,
            profile,
            scroll_top: 0.0,
            viewport_height,
            store: PanelStore::new(state_dir),
        }
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn snapshot(&self) -> &PageSnapshot {
        &self.snapshot
    }

    pub(crate) fn profile(&self) -> &'static PlatformProfile {
        self.profile
    }

    pub(crate) fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub(crate) fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Appends a fragment just inside `</body>` (at the end when there is
    /// no body close tag) and re-parses. Appending keeps existing element
    /// paths stable, the way chat pages grow.
    pub(crate) fn append_fragment(&mut self, fragment: &str) {
        match self.html.rfind("</body>") {
            Some(position) => self.html.insert_str(position, fragment),
            None => self.html.push_str(fragment),
        }
        self.snapshot = PageSnapshot::parse(&self.html);
    }

    /// In-app navigation. The profile is chosen once per run; a jump to a
    /// different platform wants a fresh run, the way a real page load gets
    /// a fresh script instance.
    pub(crate) fn navigate(&mut self, url: String, page: Option<String>) {
        if let Some(html) = page {
            self.snapshot = PageSnapshot::parse(&html);
            self.html = html;
        }
        self.url = url;
    }

    pub(crate) fn scroll_to(&mut self, offset: f32) {
        self.scroll_top = offset.max(0.0);
    }

    pub(crate) fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.scroll_top + delta);
    }

    pub(crate) fn host(&self) -> String {
        Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| "local".to_string())
    }

    pub(crate) fn load_collapsed(&self) -> Option<bool> {
        self.store.load_collapsed(&self.host())
    }

    pub(crate) fn save_collapsed(&self, collapsed: bool) {
        self.store.save_collapsed(&self.host(), collapsed);
    }
}
