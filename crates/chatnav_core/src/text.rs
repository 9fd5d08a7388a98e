/// Display-text normalization for panel rows: collapse whitespace, strip
/// one leading greeting prefix, truncate with an ellipsis.
///
/// Prefix stripping is one-shot. Chat UIs tag user turns with a single
/// accessibility label ("You said:", "用户:"), so after one prefix is
/// removed the rest of the text is message content, even when it happens
/// to start with another configured prefix.
pub fn normalize_display_text(raw: &str, prefixes: &[String], limit: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut text = collapsed.as_str();
    for prefix in prefixes {
        if let Some(stripped) = strip_greeting(text, prefix) {
            text = stripped;
            break;
        }
    }
    let text = text.trim();

    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Removes `prefix` plus at least one following separator (colon,
/// fullwidth colon, or whitespace). Matching is ASCII case-insensitive,
/// which leaves non-ASCII prefixes exact-match.
fn strip_greeting<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }

    let rest = &text[prefix.len()..];
    let mut chars = rest.char_indices();
    let mut end = 0;
    let mut seen_separator = false;
    for (offset, ch) in &mut chars {
        if ch == ':' || ch == '：' || ch.is_whitespace() {
            seen_separator = true;
            end = offset + ch.len_utf8();
        } else {
            break;
        }
    }

    if seen_separator {
        Some(&rest[end..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> Vec<String> {
        vec![
            "You said".to_string(),
            "你说".to_string(),
            "User".to_string(),
            "用户".to_string(),
        ]
    }

    #[test]
    fn strips_prefix_and_truncates_long_question() {
        let raw = "You said: What is the capital of France and what else should I know about it?";
        let text = normalize_display_text(raw, &prefixes(), 30);
        assert_eq!(text, "What is the capital of France ...");
    }

    #[test]
    fn short_text_is_kept_verbatim() {
        let text = normalize_display_text("You said: hello there", &prefixes(), 30);
        assert_eq!(text, "hello there");
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let text = normalize_display_text("YOU SAID: hi", &prefixes(), 30);
        assert_eq!(text, "hi");
    }

    #[test]
    fn fullwidth_colon_counts_as_separator() {
        let text = normalize_display_text("你说：在吗", &prefixes(), 30);
        assert_eq!(text, "在吗");
    }

    #[test]
    fn prefix_without_separator_stays() {
        let text = normalize_display_text("Username question", &prefixes(), 30);
        assert_eq!(text, "Username question");
    }

    #[test]
    fn only_one_prefix_is_stripped() {
        let text = normalize_display_text("You said: User: both tagged", &prefixes(), 30);
        assert_eq!(text, "User: both tagged");
    }

    #[test]
    fn whitespace_runs_collapse_to_single_spaces() {
        let text = normalize_display_text("  a\n\n  b\t c  ", &prefixes(), 30);
        assert_eq!(text, "a b c");
    }

    #[test]
    fn multibyte_text_truncates_on_char_boundary() {
        let raw = "用户: 这是一条非常非常非常长的中文消息需要被截断";
        let text = normalize_display_text(raw, &prefixes(), 10);
        assert_eq!(text, "这是一条非常非常非常...");
    }

    #[test]
    fn empty_after_stripping_yields_empty() {
        let text = normalize_display_text("You said:   ", &prefixes(), 30);
        assert_eq!(text, "");
    }
}
