//! Text cleanup applied to every extracted source body.

/// Phrases that only appear in page furniture; a short line containing one is
/// dropped.
const FURNITURE_PHRASES: &[&str] = &[
    "privacy policy",
    "terms of service",
    "terms of use",
    "all rights reserved",
    "accept all cookies",
    "we use cookies",
    "cookie settings",
    "enable javascript",
    "skip to content",
    "skip to main content",
    "related posts",
    "share this",
];

/// Navigation labels; a line is dropped only when it consists of nothing else.
const FURNITURE_LABELS: &[&str] = &[
    "sign in",
    "sign up",
    "log in",
    "login",
    "log out",
    "register",
    "subscribe",
    "accept all",
    "advertisement",
    "menu",
    "share",
];

/// Furniture phrases only disqualify lines shorter than this.
const BOILERPLATE_LINE_MAX: usize = 120;

fn is_label_only(line: &str) -> bool {
    let mut segments = line
        .split(['|', '/', '·', '•'])
        .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|s| !s.is_empty())
        .peekable();
    segments.peek().is_some() && segments.all(|s| FURNITURE_LABELS.contains(&s))
}

fn is_boilerplate(line: &str) -> bool {
    if line.chars().count() <= 2 {
        return true;
    }
    if line.chars().count() >= BOILERPLATE_LINE_MAX {
        return false;
    }
    let lowered = line.to_lowercase();
    is_label_only(&lowered) || FURNITURE_PHRASES.iter().any(|p| lowered.contains(p))
}

/// Cuts `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Strips control characters and navigation lines, collapses whitespace and
/// bounds the length.
pub fn clean_text(raw: &str, max_chars: usize) -> String {
    let printable: String = raw
        .chars()
        .map(|c| {
            if c.is_control() && c != '\n' {
                ' '
            } else {
                c
            }
        })
        .collect();

    let body = printable
        .lines()
        .map(str::trim)
        .filter(|line| !is_boilerplate(line))
        .collect::<Vec<_>>()
        .join(" ");

    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, max_chars).trim_end().to_string()
}
