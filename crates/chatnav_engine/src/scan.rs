use nav_logging::{nav_debug, nav_trace};
use scraper::{ElementRef, Selector};

use crate::classify::Classifier;
use crate::rules::PlatformProfile;
use crate::snapshot::PageSnapshot;
use crate::types::{NodePath, ScanHit, ScanOutcome, ScanPass};

/// Regions likely to hold the message thread.
const CONTAINER_SELECTOR: &str = "main, [role=\"main\"], .conversation, .chat-container";
/// Text entry controls whose enclosing wrappers get treated as message
/// containers by the primary strategy.
const INPUT_SELECTOR: &str = "textarea, input[type=\"text\"]";
/// Class substrings that mark an input's enclosing wrapper.
const INPUT_WRAPPER_MARKERS: &[&str] = &["input", "query", "prompt"];
/// Container-like elements the mutation sweep classifies.
const SWEEP_SELECTOR: &str = "div, section, article";
/// The startup fallback walks plain divs and skips ones with essay-sized
/// text, which are transcript wrappers rather than single messages.
const FALLBACK_SELECTOR: &str = "div";
const FALLBACK_MAX_CHARS: usize = 500;

/// One full scan pass over a snapshot: finds candidate user messages and
/// refreshes the geometry of already-tracked elements. Never fails; a
/// page with nothing recognizable yields an empty outcome.
pub fn scan_messages(
    snapshot: &PageSnapshot,
    profile: &PlatformProfile,
    pass: ScanPass,
    tracked: &[NodePath],
) -> ScanOutcome {
    let classifier = Classifier::new(snapshot, profile);
    let hits = match pass {
        ScanPass::Startup => startup_hits(snapshot, profile, &classifier),
        ScanPass::Sweep => sweep_hits(snapshot, &classifier),
    };

    let refreshed: Vec<(NodePath, _)> = tracked
        .iter()
        .filter_map(|path| {
            snapshot
                .resolve_bounds(path)
                .map(|bounds| (path.clone(), bounds))
        })
        .collect();

    nav_debug!(
        "scan pass {} on profile '{}': {} hit(s), {} of {} tracked refreshed",
        nav_logging::current_scan_pass(),
        profile.name,
        hits.len(),
        refreshed.len(),
        tracked.len()
    );

    ScanOutcome { hits, refreshed }
}

/// Primary strategy: platform selectors inside conversation containers,
/// plus wrappers around text inputs. When that yields nothing, the
/// heuristic fallback walk runs instead.
fn startup_hits(
    snapshot: &PageSnapshot,
    profile: &PlatformProfile,
    classifier: &Classifier<'_>,
) -> Vec<ScanHit> {
    let mut hits = Vec::new();

    let containers: Vec<ElementRef<'_>> = match Selector::parse(CONTAINER_SELECTOR).ok() {
        Some(selector) => snapshot.select(&selector).collect(),
        None => Vec::new(),
    };
    let containers = if containers.is_empty() {
        vec![snapshot.root()]
    } else {
        containers
    };

    for container in &containers {
        for selector_text in profile.message_selectors {
            let Some(selector) = Selector::parse(selector_text).ok() else {
                continue;
            };
            for element in container.select(&selector) {
                push_hit(snapshot, classifier, element, &mut hits);
            }
        }

        if let Some(input_selector) = Selector::parse(INPUT_SELECTOR).ok() {
            for input in container.select(&input_selector) {
                if let Some(wrapper) = input_wrapper(input) {
                    push_hit(snapshot, classifier, wrapper, &mut hits);
                }
            }
        }
    }

    if hits.is_empty() {
        fallback_hits(snapshot, classifier)
    } else {
        hits
    }
}

/// Startup fallback: classify every div with a plausible amount of text.
fn fallback_hits(snapshot: &PageSnapshot, classifier: &Classifier<'_>) -> Vec<ScanHit> {
    let mut hits = Vec::new();
    let Some(selector) = Selector::parse(FALLBACK_SELECTOR).ok() else {
        return hits;
    };
    for element in snapshot.select(&selector) {
        let text: String = element.text().collect();
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.chars().count() >= FALLBACK_MAX_CHARS {
            continue;
        }
        if classifier.looks_like_user_message(element, &text) {
            push_hit(snapshot, classifier, element, &mut hits);
        }
    }
    hits
}

/// Mutation sweep: the heuristic net over all container-like elements.
fn sweep_hits(snapshot: &PageSnapshot, classifier: &Classifier<'_>) -> Vec<ScanHit> {
    let mut hits = Vec::new();
    let Some(selector) = Selector::parse(SWEEP_SELECTOR).ok() else {
        return hits;
    };
    for element in snapshot.select(&selector) {
        let text: String = element.text().collect();
        if classifier.looks_like_user_message(element, &text) {
            push_hit(snapshot, classifier, element, &mut hits);
        }
    }
    hits
}

fn push_hit(
    snapshot: &PageSnapshot,
    classifier: &Classifier<'_>,
    element: ElementRef<'_>,
    hits: &mut Vec<ScanHit>,
) {
    if classifier.is_control(element) {
        return;
    }
    let hit = ScanHit {
        path: snapshot.path_of(element),
        text: element.text().collect(),
        bounds: snapshot.bounds_of(element),
        editable: classifier.is_editable(element),
    };
    nav_trace!(
        "candidate at {:?}: {:?}",
        hit.path.segments(),
        hit.text.trim()
    );
    hits.push(hit);
}

/// The nearest enclosing div whose class marks it as the input area.
fn input_wrapper(input: ElementRef<'_>) -> Option<ElementRef<'_>> {
    input
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| {
            let value = ancestor.value();
            value.name() == "div"
                && value.attr("class").is_some_and(|class| {
                    INPUT_WRAPPER_MARKERS
                        .iter()
                        .any(|marker| class.contains(marker))
                })
        })
}
