use std::time::Duration;

use url::Url;

/// The order a platform renders messages in its DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrder {
    /// Oldest message first; insertion order matches reading order.
    Chronological,
    /// Newest message first; the panel must re-sort by page position.
    NewestFirst,
}

/// How scroll-to-message must be issued on a platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollBehavior {
    Direct,
    /// A tiny scroll wakes the lazy scroll container first; the real jump
    /// follows after the delay.
    PrimeFirst { pixels: f32, delay: Duration },
}

/// One platform's rule set: host match, message selectors, rendering
/// order, scroll quirk, and extra exclusion nets for the fallback
/// classifier. Selected once at startup by host inspection so the scan
/// logic itself stays free of per-platform branches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformProfile {
    pub name: &'static str,
    /// Hostname substrings that select this profile.
    pub hosts: &'static [&'static str],
    /// CSS selectors that directly locate user messages, best first.
    pub message_selectors: &'static [&'static str],
    pub order: MessageOrder,
    pub scroll: ScrollBehavior,
    /// Fallback candidates inside elements matching any of these are
    /// dropped (sidebars, recommendation rails).
    pub excluded_ancestors: &'static [&'static str],
    /// Short fallback candidates containing any of these phrases are
    /// dropped as non-message cards.
    pub excluded_phrases: &'static [&'static str],
}

pub const PLATFORM_PROFILES: &[PlatformProfile] = &[
    PlatformProfile {
        name: "chatgpt",
        hosts: &["chatgpt.com", "openai.com"],
        message_selectors: &["div[data-message-author-role=\"user\"]", ".user-message"],
        order: MessageOrder::Chronological,
        scroll: ScrollBehavior::Direct,
        excluded_ancestors: &[],
        excluded_phrases: &[],
    },
    PlatformProfile {
        name: "gemini",
        hosts: &["gemini.google.com"],
        message_selectors: &[
            "message-content.user-query",
            ".query-input-container",
            "div[data-test-id*=\"user\"]",
            ".user-message",
        ],
        order: MessageOrder::Chronological,
        scroll: ScrollBehavior::Direct,
        excluded_ancestors: &[],
        excluded_phrases: &[],
    },
    PlatformProfile {
        name: "claude",
        hosts: &["claude.ai"],
        message_selectors: &[],
        order: MessageOrder::Chronological,
        scroll: ScrollBehavior::Direct,
        excluded_ancestors: &[],
        excluded_phrases: &[],
    },
    PlatformProfile {
        name: "wenxin",
        hosts: &["yiyan.baidu.com"],
        message_selectors: &[],
        order: MessageOrder::NewestFirst,
        scroll: ScrollBehavior::Direct,
        excluded_ancestors: &[],
        excluded_phrases: &[],
    },
    PlatformProfile {
        name: "tongyi",
        hosts: &["qianwen.com", "tongyi.aliyun.com"],
        message_selectors: &[],
        order: MessageOrder::Chronological,
        scroll: ScrollBehavior::Direct,
        excluded_ancestors: &["[class*=\"video\"]", "[class*=\"recommend\"]"],
        excluded_phrases: &["播放", "视频", "video", "推荐"],
    },
    PlatformProfile {
        name: "xinghuo",
        hosts: &["xinghuo.xfyun.cn"],
        message_selectors: &[],
        order: MessageOrder::Chronological,
        scroll: ScrollBehavior::Direct,
        excluded_ancestors: &[
            "aside",
            "[class*=\"sidebar\"]",
            "[class*=\"history\"]",
            "[class*=\"list\"]",
        ],
        excluded_phrases: &[],
    },
    PlatformProfile {
        name: "kimi",
        hosts: &["kimi.moonshot.cn", "kimi.com"],
        message_selectors: &[],
        order: MessageOrder::Chronological,
        scroll: ScrollBehavior::PrimeFirst {
            pixels: 1.0,
            delay: Duration::from_millis(100),
        },
        excluded_ancestors: &[],
        excluded_phrases: &[],
    },
];

/// Rule set for hosts no profile claims: no direct selectors, so scans
/// rely entirely on the heuristic classifier.
pub const GENERIC_PROFILE: PlatformProfile = PlatformProfile {
    name: "generic",
    hosts: &[],
    message_selectors: &[],
    order: MessageOrder::Chronological,
    scroll: ScrollBehavior::Direct,
    excluded_ancestors: &[],
    excluded_phrases: &[],
};

/// Picks the profile for a page URL by hostname substring match, the
/// first table entry winning.
pub fn profile_for_url(url: &str) -> &'static PlatformProfile {
    let Ok(parsed) = Url::parse(url) else {
        return &GENERIC_PROFILE;
    };
    let Some(host) = parsed.host_str() else {
        return &GENERIC_PROFILE;
    };
    PLATFORM_PROFILES
        .iter()
        .find(|profile| profile.hosts.iter().any(|needle| host.contains(needle)))
        .unwrap_or(&GENERIC_PROFILE)
}
