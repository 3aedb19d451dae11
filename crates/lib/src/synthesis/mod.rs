//! # Synthesis Engine
//!
//! Builds one grounded prompt from the candidate profile and the retrieved
//! sources, asks the backend for a structured guide and repairs whatever comes
//! back. It never fails: the worst case is a minimal guide that points the
//! user to the sources.

pub mod parse;
pub mod render;

use crate::{
    constants::{DEFAULT_TAKEAWAY, SYNTHESIS_UNAVAILABLE_TAKEAWAY},
    errors::CoachError,
    prompts::{
        format_history,
        synthesis::{NO_SOURCES_CONTEXT, SYNTHESIS_USER_PROMPT},
    },
    providers::ai::{generate_with_retry, AiProvider},
    retrieval::{normalize_url, truncate_chars},
    types::{ChatMessage, PrepGuide, Source, SourceRef},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument, warn};

pub use parse::{parse_json_guide, recover_sections, RawGuide};
pub use render::render_markdown;

const HISTORY_CHARS_PER_TURN: usize = 600;
const HISTORY_TOTAL_CHARS: usize = 2000;

/// Bounds applied to the synthesis prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Sources embedded in the prompt.
    pub max_prompt_sources: usize,
    /// Characters of each source embedded in the prompt.
    pub max_chars_per_source: usize,
    /// Total characters of the source context block.
    pub max_context_chars: usize,
    /// Visible turns summarised in the prompt.
    pub max_history_turns: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_prompt_sources: 5,
            max_chars_per_source: 2500,
            max_context_chars: 9000,
            max_history_turns: 8,
        }
    }
}

/// The inputs of one synthesis run.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    pub company: Option<&'a str>,
    pub role: Option<&'a str>,
    pub timeframe: Option<&'a str>,
    pub hours_until_interview: u32,
    pub sources: &'a [Source],
    pub history: &'a [ChatMessage],
    pub query: &'a str,
}

/// Pacing advice for the time left before the interview.
pub fn time_guidance(hours: u32) -> &'static str {
    if hours <= 24 {
        "The interview is within a day. Focus on calm confidence and rapid refreshers of the most likely questions."
    } else if hours <= 48 {
        "About two days remain. Plan targeted drills on the core themes with rest in between."
    } else {
        "Several days remain. Lay out a multi-day plan that builds from fundamentals to full mock interviews."
    }
}

/// The minimal guide used when no structured answer could be recovered.
pub fn minimal_guide(sources: &[Source]) -> PrepGuide {
    PrepGuide {
        takeaways: vec![SYNTHESIS_UNAVAILABLE_TAKEAWAY.to_string()],
        sources_used: sources.iter().map(Source::to_ref).collect(),
        ..Default::default()
    }
}

/// Maps cited labels (`S2`, `[S2]`) or URLs onto the input sources.
///
/// Unknown citations are ignored; if none resolve, every source is cited.
pub fn resolve_citations(cited: &[String], sources: &[Source]) -> Vec<SourceRef> {
    let mut indices: Vec<usize> = Vec::new();
    for citation in cited {
        let citation = citation.trim().trim_matches(['[', ']', '(', ')']).trim();
        let by_label = citation
            .strip_prefix(['S', 's'])
            .and_then(|n| n.trim().parse::<usize>().ok())
            .filter(|n| (1..=sources.len()).contains(n))
            .map(|n| n - 1);
        let index = by_label.or_else(|| {
            let key = normalize_url(citation);
            sources.iter().position(|s| normalize_url(&s.url) == key)
        });
        if let Some(index) = index {
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
    }

    if indices.is_empty() {
        return sources.iter().map(Source::to_ref).collect();
    }
    indices.into_iter().map(|i| sources[i].to_ref()).collect()
}

/// Produces interview preparation guides through the generative backend.
#[derive(Debug, Clone)]
pub struct SynthesisEngine {
    ai: Box<dyn AiProvider>,
    system_prompt: String,
    config: SynthesisConfig,
    timeout: Duration,
}

impl SynthesisEngine {
    pub fn new(
        ai: Box<dyn AiProvider>,
        system_prompt: impl Into<String>,
        config: SynthesisConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            ai,
            system_prompt: system_prompt.into(),
            config,
            timeout,
        }
    }

    /// The labelled source blocks, bounded per source and in total.
    pub fn build_context(&self, sources: &[Source]) -> String {
        if sources.is_empty() {
            return NO_SOURCES_CONTEXT.to_string();
        }

        let mut blocks: Vec<String> = Vec::new();
        let mut remaining = self.config.max_context_chars;
        for (i, source) in sources
            .iter()
            .take(self.config.max_prompt_sources)
            .enumerate()
        {
            let block = format!(
                "[S{}] {}\nSource: {}\nURL: {}\nContent:\n{}",
                i + 1,
                source.title,
                source.domain(),
                source.url,
                truncate_chars(&source.text, self.config.max_chars_per_source)
            );
            let block = truncate_chars(&block, remaining).to_string();
            remaining = remaining.saturating_sub(block.chars().count());
            blocks.push(block);
            if remaining == 0 {
                break;
            }
        }
        blocks.join("\n\n")
    }

    pub fn build_user_prompt(&self, request: &SynthesisRequest<'_>) -> String {
        let history = format_history(
            request.history,
            self.config.max_history_turns,
            HISTORY_CHARS_PER_TURN,
            HISTORY_TOTAL_CHARS,
        );
        SYNTHESIS_USER_PROMPT
            .replace("{company}", request.company.unwrap_or("Unknown company"))
            .replace("{role}", request.role.unwrap_or("Unspecified role"))
            .replace("{timeframe}", request.timeframe.unwrap_or("soon"))
            .replace("{hours}", &request.hours_until_interview.to_string())
            .replace("{guidance}", time_guidance(request.hours_until_interview))
            .replace("{history}", &history)
            .replace("{context}", &self.build_context(request.sources))
            .replace("{prompt}", request.query)
    }

    #[instrument(skip_all, fields(sources = request.sources.len()))]
    pub async fn synthesize(&self, request: SynthesisRequest<'_>) -> PrepGuide {
        let user_prompt = self.build_user_prompt(&request);

        let raw = match generate_with_retry(
            self.ai.as_ref(),
            &self.system_prompt,
            &user_prompt,
            self.timeout,
        )
        .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Using minimal guide: {}", CoachError::from(e));
                return minimal_guide(request.sources);
            }
        };

        let parsed = match parse_json_guide(&raw) {
            Ok(guide) => Some(guide),
            Err(reason) => {
                warn!("{}", CoachError::SynthesisParseFailed(reason));
                let recovered = recover_sections(&raw);
                if recovered.is_some() {
                    info!("Recovered guide from section headers");
                }
                recovered
            }
        };

        match parsed {
            Some(raw_guide) => self.finish(raw_guide, request.sources),
            None => {
                warn!("Using minimal guide: no section could be recovered");
                minimal_guide(request.sources)
            }
        }
    }

    fn finish(&self, raw: RawGuide, sources: &[Source]) -> PrepGuide {
        let mut takeaways = raw.takeaways;
        if takeaways.is_empty() {
            takeaways.push(DEFAULT_TAKEAWAY.to_string());
        }
        PrepGuide {
            rounds: raw.rounds,
            themes: raw.themes,
            plan: raw.plan,
            takeaways,
            sources_used: resolve_citations(&raw.sources_used, sources),
        }
    }
}
