use std::collections::HashSet;
use std::sync::OnceLock;

use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::rules::PlatformProfile;
use crate::snapshot::PageSnapshot;

const MIN_TEXT_CHARS: usize = 5;
/// UI chrome phrases; a short text containing one is a button or label.
const UI_PHRASES: &[&str] = &[
    "tools", "thinking", "send", "submit", "cancel", "add", "delete",
];
const UI_PHRASE_MAX_CHARS: usize = 20;
/// Platform card phrases get a looser length bound than plain chrome.
const CARD_PHRASE_MAX_CHARS: usize = 50;
/// Attachment chips carry the uploaded file's name; never messages.
const FILE_EXTENSIONS: &[&str] = &[
    ".txt", ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".jpg", ".png", ".gif", ".zip", ".rar",
];
/// A fallback candidate qualifies only when one of these appears in its
/// class names or attribute pairs.
const MESSAGE_MARKERS: &[&str] = &["user", "query", "prompt", "question"];
/// Roles that disqualify a fallback candidate.
const INTERACTIVE_ROLES: &[&str] = &["button", "textbox", "toolbar", "menu", "menuitem", "tab"];
/// The narrower role set rejected even for selector-matched elements.
const CONTROL_ROLES: &[&str] = &["button", "textbox", "toolbar"];

/// Bare `stem.ext` attachment names. The stem class is ASCII; CJK text
/// ending in a dotted token is still a message.
fn filename_token() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[0-9A-Za-z_-]+\.[A-Za-z0-9]+$").ok())
        .as_ref()
}

/// Per-pass classification context. The exclusion nets are materialized
/// once per snapshot, then consulted per element.
pub(crate) struct Classifier<'a> {
    profile: &'a PlatformProfile,
    /// Roots of regions the profile excludes (sidebars, video rails).
    excluded_regions: HashSet<NodeId>,
    editable_probe: Option<Selector>,
}

impl<'a> Classifier<'a> {
    pub(crate) fn new(snapshot: &PageSnapshot, profile: &'a PlatformProfile) -> Self {
        let mut excluded_regions = HashSet::new();
        for selector in profile.excluded_ancestors {
            let Some(parsed) = Selector::parse(selector).ok() else {
                continue;
            };
            for element in snapshot.select(&parsed) {
                excluded_regions.insert(element.id());
            }
        }
        Self {
            profile,
            excluded_regions,
            editable_probe: Selector::parse("input, textarea, [contenteditable=\"true\"]").ok(),
        }
    }

    /// True when the element is, or contains, a text-entry control.
    pub(crate) fn is_editable(&self, element: ElementRef<'_>) -> bool {
        let value = element.value();
        if matches!(value.name(), "input" | "textarea") {
            return true;
        }
        if value.attr("contenteditable") == Some("true") {
            return true;
        }
        self.editable_probe
            .as_ref()
            .is_some_and(|probe| element.select(probe).next().is_some())
    }

    /// True for ARIA-marked controls; those never enter the panel even
    /// when a platform selector matches them.
    pub(crate) fn is_control(&self, element: ElementRef<'_>) -> bool {
        has_role(element, CONTROL_ROLES)
    }

    /// The wide net for elements found without a platform selector.
    /// `text` is the element's raw collected text.
    pub(crate) fn looks_like_user_message(&self, element: ElementRef<'_>, text: &str) -> bool {
        let text = text.trim();
        if element.value().name() == "button" {
            return false;
        }
        if self.is_editable(element) {
            return false;
        }
        if has_role(element, INTERACTIVE_ROLES) {
            return false;
        }

        let char_count = text.chars().count();
        if char_count < MIN_TEXT_CHARS {
            return false;
        }

        let lowered = text.to_lowercase();
        if char_count < UI_PHRASE_MAX_CHARS && UI_PHRASES.iter().any(|p| lowered.contains(p)) {
            return false;
        }
        if FILE_EXTENSIONS.iter().any(|ext| lowered.contains(ext)) {
            return false;
        }
        if filename_token().is_some_and(|pattern| pattern.is_match(text)) {
            return false;
        }

        if char_count < CARD_PHRASE_MAX_CHARS
            && self
                .profile
                .excluded_phrases
                .iter()
                .any(|phrase| text.contains(phrase))
        {
            return false;
        }
        if self.in_excluded_region(element) {
            return false;
        }

        has_message_marker(element)
    }

    fn in_excluded_region(&self, element: ElementRef<'_>) -> bool {
        if self.excluded_regions.is_empty() {
            return false;
        }
        if self.excluded_regions.contains(&element.id()) {
            return true;
        }
        element
            .ancestors()
            .any(|node| self.excluded_regions.contains(&node.id()))
    }
}

fn has_role(element: ElementRef<'_>, roles: &[&str]) -> bool {
    element.value().attr("role").is_some_and(|role| {
        let role = role.to_ascii_lowercase();
        roles.iter().any(|candidate| role == *candidate)
    })
}

/// Message wrappers in chat UIs carry user/query markers in class names
/// or data attributes; the match is over both, as `name=value` pairs.
fn has_message_marker(element: ElementRef<'_>) -> bool {
    let value = element.value();
    let mut haystack = String::new();
    for class in value.classes() {
        haystack.push_str(class);
        haystack.push(' ');
    }
    for (name, attr_value) in value.attrs() {
        haystack.push_str(name);
        haystack.push('=');
        haystack.push_str(attr_value);
        haystack.push(' ');
    }
    let haystack = haystack.to_lowercase();
    MESSAGE_MARKERS.iter().any(|marker| haystack.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::GENERIC_PROFILE;

    fn classify(html: &str, target: &str) -> bool {
        let snapshot = PageSnapshot::parse(html);
        let classifier = Classifier::new(&snapshot, &GENERIC_PROFILE);
        let selector = Selector::parse(target).unwrap();
        let element = snapshot.select(&selector).next().unwrap();
        let text = element.text().collect::<String>();
        classifier.looks_like_user_message(element, &text)
    }

    #[test]
    fn marked_div_with_enough_text_qualifies() {
        assert!(classify(
            "<html><body><div id=\"t\" class=\"user-turn\">how do I sort a vec</div></body></html>",
            "#t"
        ));
    }

    #[test]
    fn data_attribute_marker_qualifies() {
        assert!(classify(
            "<html><body><div id=\"t\" data-test-id=\"user-bubble\">please explain closures</div></body></html>",
            "#t"
        ));
    }

    #[test]
    fn unmarked_div_does_not_qualify() {
        assert!(!classify(
            "<html><body><div id=\"t\" class=\"bubble\">please explain closures</div></body></html>",
            "#t"
        ));
    }

    #[test]
    fn short_text_is_chrome() {
        assert!(!classify(
            "<html><body><div id=\"t\" class=\"user\">ok</div></body></html>",
            "#t"
        ));
    }

    #[test]
    fn short_ui_phrase_is_chrome() {
        assert!(!classify(
            "<html><body><div id=\"t\" class=\"user\">Send message</div></body></html>",
            "#t"
        ));
    }

    #[test]
    fn filename_shaped_text_is_an_attachment() {
        assert!(!classify(
            "<html><body><div id=\"t\" class=\"user\">report-final.csv</div></body></html>",
            "#t"
        ));
        assert!(!classify(
            "<html><body><div id=\"t\" class=\"user\">see holiday.jpg for details</div></body></html>",
            "#t"
        ));
    }

    #[test]
    fn cjk_stem_with_a_dotted_token_stays_a_message() {
        assert!(classify(
            "<html><body><div id=\"t\" class=\"user\">报告.csv</div></body></html>",
            "#t"
        ));
    }

    #[test]
    fn editable_containers_are_rejected() {
        assert!(!classify(
            "<html><body><div id=\"t\" class=\"user-input\">type here <textarea></textarea></div></body></html>",
            "#t"
        ));
    }

    #[test]
    fn aria_controls_are_rejected() {
        assert!(!classify(
            "<html><body><div id=\"t\" role=\"menuitem\" class=\"user\">recent question text</div></body></html>",
            "#t"
        ));
    }
}
