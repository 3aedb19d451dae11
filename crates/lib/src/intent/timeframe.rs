//! Timeframe phrases and their hour estimates.

use crate::constants::{DEFAULT_HOURS, MAX_HOURS, MIN_HOURS};
use regex::Regex;
use std::sync::LazyLock;

/// Ordered so that longer phrases are tried before the phrases they contain.
const PHRASE_TO_HOURS: &[(&str, u32)] = &[
    ("day after tomorrow", 48),
    ("day-after-tomorrow", 48),
    ("later today", 12),
    ("today", 12),
    ("tonight", 12),
    ("tomorrow", 24),
    ("this weekend", 72),
    ("weekend", 72),
    ("early next week", 120),
    ("next week", 168),
    ("in a week", 168),
    ("two weeks", 336),
    ("2 weeks", 336),
    ("fortnight", 336),
    ("next month", 336),
];

static IN_HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin\s+(\d+)\s+(?:hours?|hrs?)\b").expect("valid regex"));
static IN_DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin\s+(\d+)\s+days?\b").expect("valid regex"));
static IN_WEEKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin\s+(\d+)\s+weeks?\b").expect("valid regex"));

pub fn clamp_hours(hours: u64) -> u32 {
    hours.clamp(MIN_HOURS as u64, MAX_HOURS as u64) as u32
}

/// Finds the first timeframe expression in `text`, returned in lowercase.
pub fn find_timeframe(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    if let Some((phrase, _)) = PHRASE_TO_HOURS.iter().find(|(p, _)| lowered.contains(p)) {
        return Some(phrase.to_string());
    }
    [&*IN_HOURS_RE, &*IN_DAYS_RE, &*IN_WEEKS_RE]
        .iter()
        .find_map(|re| re.find(&lowered))
        .map(|m| m.as_str().to_string())
}

/// Estimates the hours until the interview from a timeframe expression.
///
/// Unknown or missing timeframes fall back to 24 hours.
pub fn hours_until(timeframe: Option<&str>) -> u32 {
    let Some(timeframe) = timeframe else {
        return DEFAULT_HOURS;
    };
    let lowered = timeframe.to_lowercase();

    if let Some((_, hours)) = PHRASE_TO_HOURS.iter().find(|(p, _)| lowered.contains(p)) {
        return *hours;
    }

    let scaled = |re: &Regex, factor: u64| {
        re.captures(&lowered)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .map(|n| clamp_hours(n.saturating_mul(factor)))
    };

    scaled(&IN_HOURS_RE, 1)
        .or_else(|| scaled(&IN_DAYS_RE, 24))
        .or_else(|| scaled(&IN_WEEKS_RE, 168))
        .unwrap_or(DEFAULT_HOURS)
}
