//! Effect execution: scheduled scans, scroll simulation, persistence.
//!
//! The pure core returns effects; everything here turns them into engine
//! calls and follow-up messages. Pending work sits on a deadline queue the
//! driver polls every turn, which is also where same-kind scan requests
//! coalesce so a mutation burst runs one sweep.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use chatnav_core::{
    Candidate, Effect, ElementKey, MessageOrdering, Msg, PrimingScroll, ProfileSettings, Rect,
    ScanKind,
};
use chatnav_engine::{scan_messages, NodePath, ScanHit, ScanPass};
use nav_logging::{nav_debug, nav_info, nav_warn};

use super::session::PageSession;

enum PendingAction {
    Scan(ScanKind),
    FinishScroll { key: ElementKey, pulse: Duration },
    EndPulse { key: ElementKey },
}

pub(crate) struct EffectRunner {
    msg_tx: mpsc::Sender<Msg>,
    session: PageSession,
    pending: Vec<(Instant, PendingAction)>,
}

impl EffectRunner {
    pub(crate) fn new(session: PageSession, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            msg_tx,
            session,
            pending: Vec::new(),
        }
    }

    pub(crate) fn session(&self) -> &PageSession {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut PageSession {
        &mut self.session
    }

    pub(crate) fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleScan { kind, delay } => self.schedule_scan(kind, delay),
                Effect::ScrollToMessage {
                    key,
                    priming,
                    pulse,
                } => self.start_scroll(key, priming, pulse),
                Effect::PersistCollapsed(collapsed) => {
                    nav_info!(
                        "Persisting collapsed={} for {}",
                        collapsed,
                        self.session.host()
                    );
                    self.session.save_collapsed(collapsed);
                }
            }
        }
    }

    /// Trailing-edge debounce: a new request of a kind moves that kind's
    /// pending deadline instead of stacking another timer.
    fn schedule_scan(&mut self, kind: ScanKind, delay: Duration) {
        let due = Instant::now() + delay;
        if let Some((deadline, _)) = self
            .pending
            .iter_mut()
            .find(|(_, action)| matches!(action, PendingAction::Scan(pending) if *pending == kind))
        {
            *deadline = due;
        } else {
            self.pending.push((due, PendingAction::Scan(kind)));
        }
    }

    fn start_scroll(&mut self, key: ElementKey, priming: Option<PrimingScroll>, pulse: Duration) {
        match priming {
            Some(priming) => {
                self.session.scroll_by(priming.pixels);
                self.notify_scroll();
                self.pending.push((
                    Instant::now() + priming.delay,
                    PendingAction::FinishScroll { key, pulse },
                ));
            }
            None => self.finish_scroll(key, pulse),
        }
    }

    /// Centers the target element in the viewport and starts its highlight
    /// pulse. A key that no longer resolves is a silent skip.
    fn finish_scroll(&mut self, key: ElementKey, pulse: Duration) {
        let Some(bounds) = self.session.snapshot().resolve_bounds(&to_node_path(&key)) else {
            nav_warn!("Scroll target {:?} no longer resolves", key.path());
            return;
        };

        let center = bounds.top + bounds.height / 2.0;
        let offset = center - self.session.viewport_height() / 2.0;
        self.session.scroll_to(offset);
        nav_info!(
            "Scrolled to {:?}: offset {:.0}, highlight for {:?}",
            key.path(),
            self.session.scroll_top(),
            pulse
        );
        self.notify_scroll();
        self.pending
            .push((Instant::now() + pulse, PendingAction::EndPulse { key }));
    }

    fn notify_scroll(&self) {
        let _ = self.msg_tx.send(Msg::ViewportScrolled {
            scroll_top: self.session.scroll_top(),
            viewport_height: self.session.viewport_height(),
        });
    }

    /// Runs every action whose deadline has passed. Tracked keys come from
    /// the caller so geometry refreshes cover exactly the panel's rows.
    pub(crate) fn run_due(&mut self, tracked: &[ElementKey]) {
        let now = Instant::now();
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].0 <= now {
                due.push(self.pending.swap_remove(index).1);
            } else {
                index += 1;
            }
        }

        for action in due {
            match action {
                PendingAction::Scan(kind) => self.run_scan(kind, tracked),
                PendingAction::FinishScroll { key, pulse } => self.finish_scroll(key, pulse),
                PendingAction::EndPulse { key } => {
                    nav_debug!("Highlight pulse ended on {:?}", key.path());
                }
            }
        }
    }

    fn run_scan(&mut self, kind: ScanKind, tracked: &[ElementKey]) {
        let pass = match kind {
            ScanKind::Initial | ScanKind::ConversationSwitch => ScanPass::Startup,
            ScanKind::MutationSweep => ScanPass::Sweep,
        };
        nav_logging::set_scan_pass(nav_logging::current_scan_pass() + 1);

        let paths: Vec<NodePath> = tracked.iter().map(to_node_path).collect();
        let outcome = scan_messages(
            self.session.snapshot(),
            self.session.profile(),
            pass,
            &paths,
        );
        nav_info!(
            "Scan pass {} ({:?}): {} hits, {} boxes refreshed",
            nav_logging::current_scan_pass(),
            kind,
            outcome.hits.len(),
            outcome.refreshed.len()
        );

        let candidates = outcome.hits.into_iter().map(to_candidate).collect();
        let refreshed = outcome
            .refreshed
            .into_iter()
            .map(|(path, bounds)| (to_element_key(&path), to_rect(bounds)))
            .collect();
        let _ = self.msg_tx.send(Msg::ScanCompleted {
            candidates,
            refreshed,
        });
    }
}

/// Derives the pure core's per-platform knobs from the engine's rule table.
pub(crate) fn profile_settings(profile: &chatnav_engine::PlatformProfile) -> ProfileSettings {
    ProfileSettings {
        ordering: match profile.order {
            chatnav_engine::MessageOrder::Chronological => MessageOrdering::Insertion,
            chatnav_engine::MessageOrder::NewestFirst => MessageOrdering::ByPosition,
        },
        priming: match profile.scroll {
            chatnav_engine::ScrollBehavior::Direct => None,
            chatnav_engine::ScrollBehavior::PrimeFirst { pixels, delay } => {
                Some(PrimingScroll { pixels, delay })
            }
        },
    }
}

fn to_candidate(hit: ScanHit) -> Candidate {
    Candidate {
        key: to_element_key(&hit.path),
        text: hit.text,
        bounds: to_rect(hit.bounds),
        editable: hit.editable,
    }
}

fn to_element_key(path: &NodePath) -> ElementKey {
    ElementKey::from_path(path.segments().to_vec())
}

fn to_node_path(key: &ElementKey) -> NodePath {
    NodePath::new(key.path().to_vec())
}

fn to_rect(bounds: chatnav_engine::BoundingBox) -> Rect {
    Rect {
        top: bounds.top,
        left: bounds.left,
        width: bounds.width,
        height: bounds.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatnav_engine::profile_for_url;

    fn test_session(url: &str, html: &str) -> (PageSession, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let session = PageSession::open(
            url.to_string(),
            html.to_string(),
            dir.path().to_path_buf(),
            600.0,
        );
        (session, dir)
    }

    #[test]
    fn chronological_platforms_map_to_insertion_order() {
        let settings = profile_settings(profile_for_url("https://chatgpt.com/c/1"));
        assert_eq!(settings.ordering, MessageOrdering::Insertion);
        assert_eq!(settings.priming, None);
    }

    #[test]
    fn newest_first_platforms_map_to_position_order() {
        let settings = profile_settings(profile_for_url("https://yiyan.baidu.com/chat"));
        assert_eq!(settings.ordering, MessageOrdering::ByPosition);
    }

    #[test]
    fn priming_quirk_carries_pixels_and_delay() {
        let settings = profile_settings(profile_for_url("https://www.kimi.com/chat/9"));
        let priming = settings.priming.unwrap();
        assert_eq!(priming.pixels, 1.0);
        assert_eq!(priming.delay, Duration::from_millis(100));
    }

    #[test]
    fn same_kind_scans_coalesce_on_the_queue() {
        let (session, _dir) = test_session("https://chatgpt.com/c/1", "<html><body></body></html>");
        let (tx, _rx) = mpsc::channel();
        let mut runner = EffectRunner::new(session, tx);

        runner.enqueue(vec![
            Effect::ScheduleScan {
                kind: ScanKind::MutationSweep,
                delay: Duration::from_millis(500),
            },
            Effect::ScheduleScan {
                kind: ScanKind::MutationSweep,
                delay: Duration::from_millis(500),
            },
            Effect::ScheduleScan {
                kind: ScanKind::Initial,
                delay: Duration::ZERO,
            },
        ]);

        assert_eq!(runner.pending.len(), 2);
    }

    #[test]
    fn due_scan_reports_hits_as_candidates() {
        let (session, _dir) = test_session(
            "https://chatgpt.com/c/1",
            "<html><body><div data-message-author-role=\"user\">please summarize my notes</div></body></html>",
        );
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(session, tx);

        runner.enqueue(vec![Effect::ScheduleScan {
            kind: ScanKind::Initial,
            delay: Duration::ZERO,
        }]);
        runner.run_due(&[]);

        let msg = rx.try_recv().unwrap();
        let Msg::ScanCompleted { candidates, .. } = msg else {
            panic!("expected a scan completion, got {msg:?}");
        };
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "please summarize my notes");
        assert!(!candidates[0].editable);
        assert!(runner.pending.is_empty());
    }

    #[test]
    fn scroll_centers_the_target_and_notifies() {
        let (session, _dir) = test_session(
            "https://chatgpt.com/c/1",
            "<html><body>\
             <div data-message-author-role=\"user\">first question about rust traits</div>\
             <div data-message-author-role=\"user\">second question about lifetimes</div>\
             </body></html>",
        );
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(session, tx);

        runner.enqueue(vec![Effect::ScheduleScan {
            kind: ScanKind::Initial,
            delay: Duration::ZERO,
        }]);
        runner.run_due(&[]);
        let Msg::ScanCompleted { candidates, .. } = rx.try_recv().unwrap() else {
            panic!("expected a scan completion");
        };

        let target = candidates[1].clone();
        runner.enqueue(vec![Effect::ScrollToMessage {
            key: target.key,
            priming: None,
            pulse: Duration::from_millis(1000),
        }]);

        let Msg::ViewportScrolled { scroll_top, .. } = rx.try_recv().unwrap() else {
            panic!("expected a scroll notification");
        };
        let center = target.bounds.top + target.bounds.height / 2.0;
        assert_eq!(scroll_top, (center - 300.0).max(0.0));
    }

    #[test]
    fn scroll_to_a_dead_key_is_silent() {
        let (session, _dir) = test_session("https://chatgpt.com/c/1", "<html><body></body></html>");
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(session, tx);

        runner.enqueue(vec![Effect::ScrollToMessage {
            key: ElementKey::from_path(vec![7, 7, 7]),
            priming: None,
            pulse: Duration::from_millis(1000),
        }]);

        assert!(rx.try_recv().is_err());
        assert!(runner.pending.is_empty());
    }

    #[test]
    fn priming_scroll_nudges_then_schedules_the_real_jump() {
        let (session, _dir) = test_session(
            "https://www.kimi.com/chat/9",
            "<html><body><div data-message-author-role=\"user\">a kimi question</div></body></html>",
        );
        let (tx, rx) = mpsc::channel();
        let mut runner = EffectRunner::new(session, tx);

        runner.enqueue(vec![Effect::ScrollToMessage {
            key: ElementKey::from_path(vec![0]),
            priming: Some(PrimingScroll {
                pixels: 1.0,
                delay: Duration::from_millis(100),
            }),
            pulse: Duration::from_millis(1000),
        }]);

        let Msg::ViewportScrolled { scroll_top, .. } = rx.try_recv().unwrap() else {
            panic!("expected the priming nudge");
        };
        assert_eq!(scroll_top, 1.0);
        assert_eq!(runner.pending.len(), 1);
    }
}
