//! # Deterministic Intent Heuristics
//!
//! The secondary classification strategy. It never fails and never calls out:
//! interview signals are keyword matches, and company/role candidates come from
//! a handful of capitalisation-based sentence patterns.

use super::{timeframe, ClassifierInput, IntentStrategy};
use crate::{
    errors::CoachError,
    state::ConversationState,
    types::{Confidence, IntentResult},
};
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Phrases that on their own mark a query as interview-related.
const STRONG_SIGNALS: &[&str] = &[
    "interview",
    "onsite",
    "on-site",
    "round",
    "recruiter",
    "hiring manager",
    "phone screen",
    "behavioral",
    "behavioural",
    "take-home",
    "prep",
    "prepping",
    "prepped",
    "preparation",
];

/// Phrases that only count when a company or role is in play.
const WEAK_SIGNALS: &[&str] = &[
    "intel", "tip", "question", "process", "coach", "brief", "prepare",
];

/// Endings a single-word signal may carry and still match.
const SIGNAL_INFLECTIONS: &[&str] = &["", "s", "es", "ed", "ing", "er", "ers"];

/// Role words a captured role must contain to be accepted.
const ROLE_HINTS: &[&str] = &[
    "analyst",
    "engineer",
    "developer",
    "manager",
    "scientist",
    "designer",
    "intern",
    "consultant",
    "architect",
    "associate",
    "specialist",
    "lead",
    "director",
    "researcher",
    "administrator",
    "sre",
    "swe",
    "pm",
];

/// Words that end a captured role phrase.
const ROLE_STOP_WORDS: &[&str] = &[
    "role", "position", "job", "interview", "next", "this", "tomorrow", "today", "tonight", "in",
    "on", "at", "with", "and", "later", "soon", "early",
];

/// Capitalised words that are never a company name.
const COMPANY_STOP_WORDS: &[&str] = &[
    "I", "I'm", "Im", "My", "The", "A", "An", "We", "Hi", "Hello", "Hey", "What", "How", "Any",
];

/// Prefixes of questions about a concept rather than an interview.
const CONCEPT_PREFIXES: &[&str] = &[
    "what is",
    "what's",
    "what are",
    "explain",
    "define",
    "how does",
    "how do",
    "difference between",
    "tell me about",
];

const COMPANY: &str = r"[A-Z][A-Za-z0-9&./+-]*(?:\s+[A-Z][A-Za-z0-9&./+-]*){0,3}";

static HAVE_COMPANY_ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i:\bhave\s+(?:an|a)\s+)(?P<company>{COMPANY})\s+(?P<role>[A-Za-z][A-Za-z0-9/&+ .-]{{0,80}}?)\s+(?i:interview)"
    ))
    .expect("valid regex")
});

static INTERVIEW_WITH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i:\binterview(?:ing)?\s+(?:with|at)\s+)(?P<company>{COMPANY})(?:[^.?!]*?(?i:\bfor\s+)(?:(?i:an|a|the)\s+)?(?P<role>[A-Za-z][A-Za-z0-9/&+ .-]{{0,80}}))?"
    ))
    .expect("valid regex")
});

static COMPANY_ROLE_INTERVIEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?P<company>{COMPANY})\s+(?P<role>[a-z][a-z0-9/&+ .-]{{0,60}}?)\s+(?i:interview)"
    ))
    .expect("valid regex")
});

/// A company and role found in free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub company: Option<String>,
    pub role: Option<String>,
    pub timeframe: Option<String>,
}

fn clean_company(raw: &str) -> Option<String> {
    let company = raw
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim();
    if company.is_empty() || COMPANY_STOP_WORDS.contains(&company) {
        return None;
    }
    Some(company.to_string())
}

fn clean_role(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| matches!(c, ',' | '.' | '!' | '?' | ';' | ':')))
        .filter(|w| !w.is_empty())
        .skip_while(|w| matches!(w.to_ascii_lowercase().as_str(), "a" | "an" | "the" | "my"))
        .take_while(|w| !ROLE_STOP_WORDS.contains(&w.to_ascii_lowercase().as_str()))
        .collect();
    let role = words.join(" ");
    looks_like_role(&role).then_some(role)
}

/// True if the phrase contains a known role word.
pub fn looks_like_role(phrase: &str) -> bool {
    let lowered = phrase.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| ROLE_HINTS.iter().any(|hint| word.starts_with(hint)))
}

fn from_captures(caps: &Captures) -> (Option<String>, Option<String>) {
    let company = caps.name("company").and_then(|m| clean_company(m.as_str()));
    let role = caps.name("role").and_then(|m| clean_role(m.as_str()));
    (company, role)
}

/// Pulls company, role and timeframe candidates out of a single message.
pub fn extract(text: &str) -> Extraction {
    let mut extraction = Extraction {
        timeframe: timeframe::find_timeframe(text),
        ..Default::default()
    };

    for re in [
        &*HAVE_COMPANY_ROLE_RE,
        &*INTERVIEW_WITH_RE,
        &*COMPANY_ROLE_INTERVIEW_RE,
    ] {
        if let Some(caps) = re.captures(text) {
            let (company, role) = from_captures(&caps);
            if extraction.company.is_none() {
                extraction.company = company;
            }
            if extraction.role.is_none() {
                extraction.role = role;
            }
        }
        if extraction.company.is_some() && extraction.role.is_some() {
            break;
        }
    }
    extraction
}

/// True if the query asks about a concept and does not mention an interview.
pub fn is_concept_question(query: &str) -> bool {
    let lowered = query.trim().to_lowercase();
    CONCEPT_PREFIXES.iter().any(|p| lowered.starts_with(p))
        && !lowered.contains("interview")
        && !lowered.contains("round")
}

/// Single-word signals match word prefixes ("rounds", not "around");
/// phrases match anywhere.
fn has_signal(lowered: &str, signals: &[&str]) -> bool {
    signals.iter().any(|signal| {
        if signal.contains([' ', '-']) {
            lowered.contains(signal)
        } else {
            lowered.split(|c: char| !c.is_alphanumeric()).any(|word| {
                word.strip_prefix(signal)
                    .is_some_and(|rest| SIGNAL_INFLECTIONS.contains(&rest))
            })
        }
    })
}

/// Classifies with keyword signals and the extraction patterns above.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicIntentStrategy;

impl HeuristicIntentStrategy {
    pub fn evaluate(&self, query: &str, prior: &ConversationState) -> IntentResult {
        let lowered = query.to_lowercase();
        let extraction = extract(query);
        let target_in_play = extraction.company.is_some()
            || extraction.role.is_some()
            || prior.company.is_some()
            || prior.role.is_some();

        let is_interview_intel = has_signal(&lowered, STRONG_SIGNALS)
            || (target_in_play && has_signal(&lowered, WEAK_SIGNALS));

        IntentResult {
            is_interview_intel,
            company: extraction.company,
            role: extraction.role,
            hours_until_interview: timeframe::hours_until(extraction.timeframe.as_deref()),
            timeframe: extraction.timeframe,
            confidence: Confidence::Low,
        }
    }
}

#[async_trait]
impl IntentStrategy for HeuristicIntentStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn classify(&self, input: &ClassifierInput<'_>) -> Result<IntentResult, CoachError> {
        Ok(self.evaluate(input.query, input.prior))
    }
}
