//! # Synthesis Engine Tests

mod common;

use common::{setup_tracing, synthesis, SYNTHESIS_KEY};
use edgecoach::{
    constants::{DEFAULT_TAKEAWAY, SYNTHESIS_UNAVAILABLE_TAKEAWAY},
    prompts::synthesis::NO_SOURCES_CONTEXT,
    synthesis::SynthesisRequest,
    ChatMessage, Source,
};
use edgecoach_test_utils::{experience_text, source, MockAiProvider};

fn sources(n: usize) -> Vec<Source> {
    (1..=n)
        .map(|i| {
            source(
                &format!("https://www.example{i}.com/acme"),
                &format!("Acme story {i}"),
                &format!("{} {}", i, "x".repeat(3998)),
            )
        })
        .collect()
}

fn request<'a>(sources: &'a [Source], history: &'a [ChatMessage]) -> SynthesisRequest<'a> {
    SynthesisRequest {
        company: Some("Acme"),
        role: Some("Data Analyst"),
        timeframe: Some("tomorrow"),
        hours_until_interview: 24,
        sources,
        history,
        query: "How should I prepare?",
    }
}

const GUIDE_JSON: &str = r#"{
  "rounds": ["Recruiter screen", "SQL assessment", "Onsite loop"],
  "themes": ["SQL window functions", "Metric design"],
  "plan": ["Review joins tonight", "Practice two STAR stories"],
  "takeaways": ["You are ready"],
  "sourcesUsed": ["S2"]
}"#;

#[tokio::test]
async fn test_json_guide_is_parsed_and_cited() {
    // --- 1. Arrange ---
    setup_tracing();
    let ai = MockAiProvider::new();
    ai.add_response(SYNTHESIS_KEY, GUIDE_JSON);
    let sources = sources(3);

    // --- 2. Act ---
    let guide = synthesis(&ai).synthesize(request(&sources, &[])).await;

    // --- 3. Assert ---
    assert_eq!(guide.rounds.len(), 3);
    assert_eq!(guide.themes, vec!["SQL window functions", "Metric design"]);
    assert_eq!(guide.takeaways, vec!["You are ready"]);
    assert_eq!(guide.sources_used.len(), 1);
    assert_eq!(guide.sources_used[0].url, "https://www.example2.com/acme");
    assert_eq!(guide.sources_used[0].domain, "example2.com");
}

#[tokio::test]
async fn test_prompt_is_grounded_and_bounded() {
    // --- 1. Arrange ---
    setup_tracing();
    let ai = MockAiProvider::new();
    ai.add_response(SYNTHESIS_KEY, GUIDE_JSON);
    let sources = sources(6);
    let history = vec![
        ChatMessage::user("I have an Acme interview"),
        ChatMessage::assistant("y".repeat(1000)),
    ];

    // --- 2. Act ---
    synthesis(&ai).synthesize(request(&sources, &history)).await;

    // --- 3. Assert ---
    let calls = ai.get_calls();
    assert_eq!(calls.len(), 1);
    let (system, user) = &calls[0];
    assert!(system.contains(SYNTHESIS_KEY));
    assert!(user.contains("- Company: Acme"));
    assert!(user.contains("- Role: Data Analyst"));
    assert!(user.contains("about 24 hours away"));
    assert!(user.contains("rapid refreshers"));
    assert!(user.contains("[S1] Acme story 1\nSource: example1.com\nURL: https://www.example1.com/acme"));
    assert!(!user.contains("[S6]"), "only five sources are embedded");
    assert!(user.contains("USER: I have an Acme interview"));
    assert!(!user.contains(&"y".repeat(601)), "history turns are trimmed");

    let longest_run = user
        .split(|c: char| c != 'x')
        .map(str::len)
        .max()
        .unwrap_or_default();
    assert!(longest_run <= 2500, "each source is capped");
}

#[tokio::test]
async fn test_context_respects_total_budget() {
    setup_tracing();
    let engine = synthesis(&MockAiProvider::new());
    let context = engine.build_context(&sources(5));
    assert!(context.chars().count() <= 9000 + 8);
    assert!(context.contains("[S4]"));
}

#[tokio::test]
async fn test_markdown_output_is_recovered() {
    setup_tracing();
    let ai = MockAiProvider::new();
    ai.add_response(
        SYNTHESIS_KEY,
        "## Interview Rounds\n- Phone screen\n- Case study\n\n## Question Themes\n- Metrics\n\n## Prep Plan\n1. Review SQL\n\n## Key Takeaways\n- Stay calm",
    );
    let sources = sources(2);

    let guide = synthesis(&ai).synthesize(request(&sources, &[])).await;

    assert_eq!(guide.rounds, vec!["Phone screen", "Case study"]);
    assert_eq!(guide.plan, vec!["Review SQL"]);
    assert_eq!(guide.takeaways, vec!["Stay calm"]);
    assert_eq!(guide.sources_used.len(), 2, "uncited guides cite every source");
}

#[tokio::test]
async fn test_unusable_output_yields_minimal_guide() {
    setup_tracing();
    let ai = MockAiProvider::new();
    ai.add_response(SYNTHESIS_KEY, "I'm sorry, I can't help with that.");
    let sources = sources(3);

    let guide = synthesis(&ai).synthesize(request(&sources, &[])).await;

    assert!(guide.rounds.is_empty() && guide.themes.is_empty() && guide.plan.is_empty());
    assert_eq!(guide.takeaways, vec![SYNTHESIS_UNAVAILABLE_TAKEAWAY]);
    assert_eq!(guide.sources_used.len(), 3);
}

#[tokio::test]
async fn test_backend_failure_yields_minimal_guide() {
    setup_tracing();
    let ai = MockAiProvider::new();
    ai.add_error(SYNTHESIS_KEY, "503 Service Unavailable");
    let sources = vec![source("https://a.com/x", "A", &experience_text("Acme"))];

    let guide = synthesis(&ai).synthesize(request(&sources, &[])).await;

    assert_eq!(guide.takeaways, vec![SYNTHESIS_UNAVAILABLE_TAKEAWAY]);
    assert_eq!(guide.sources_used[0].url, "https://a.com/x");
}

#[tokio::test]
async fn test_empty_sources_still_produce_takeaways() {
    // --- 1. Arrange ---
    setup_tracing();
    let ai = MockAiProvider::new();
    ai.add_response(
        SYNTHESIS_KEY,
        r#"{"rounds": ["Typical: screen then onsite"], "themes": [], "plan": ["Research Acme"], "takeaways": [], "sourcesUsed": []}"#,
    );

    // --- 2. Act ---
    let guide = synthesis(&ai).synthesize(request(&[], &[])).await;

    // --- 3. Assert ---
    assert_eq!(guide.takeaways, vec![DEFAULT_TAKEAWAY]);
    assert!(guide.sources_used.is_empty());
    let (_, user) = &ai.get_calls()[0];
    assert!(user.contains(NO_SOURCES_CONTEXT));
}
