//! # Synthesis Output Parsing
//!
//! Two passes over the backend's answer: a strict JSON parse, then a
//! best-effort split on Markdown section headers for models that ignored the
//! JSON instruction.

use serde_json::Value;

/// A guide as the backend wrote it, with citations not yet resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGuide {
    pub rounds: Vec<String>,
    pub themes: Vec<String>,
    pub plan: Vec<String>,
    pub takeaways: Vec<String>,
    pub sources_used: Vec<String>,
}

impl RawGuide {
    fn has_content(&self) -> bool {
        !(self.rounds.is_empty()
            && self.themes.is_empty()
            && self.plan.is_empty()
            && self.takeaways.is_empty())
    }
}

fn item_text(item: &Value) -> Option<String> {
    let text = match item {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(item_text)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(fields) => fields
            .values()
            .filter_map(item_text)
            .collect::<Vec<_>>()
            .join(": "),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn string_list(body: &serde_json::Map<String, Value>, key: &str) -> Result<Vec<String>, String> {
    match body.get(key) {
        Some(Value::Array(items)) => Ok(items.iter().filter_map(item_text).collect()),
        Some(other) => Err(format!("'{key}' must be a list, got {other}")),
        None => Err(format!("missing section '{key}'")),
    }
}

/// Parses the JSON form of the guide. Every section must be present as a list;
/// `sourcesUsed` may be omitted.
pub fn parse_json_guide(raw: &str) -> Result<RawGuide, String> {
    let start = raw.find('{').ok_or("no JSON object in response")?;
    let end = raw.rfind('}').ok_or("no JSON object in response")?;
    if end < start {
        return Err("no JSON object in response".to_string());
    }
    let value: Value =
        serde_json::from_str(&raw[start..=end]).map_err(|e| format!("invalid JSON: {e}"))?;
    let Value::Object(body) = value else {
        return Err("response is not a JSON object".to_string());
    };

    let sources_used = match body.get("sourcesUsed") {
        None | Some(Value::Null) => Vec::new(),
        Some(_) => string_list(&body, "sourcesUsed")?,
    };

    Ok(RawGuide {
        rounds: string_list(&body, "rounds")?,
        themes: string_list(&body, "themes")?,
        plan: string_list(&body, "plan")?,
        takeaways: string_list(&body, "takeaways")?,
        sources_used,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Rounds,
    Themes,
    Plan,
    Takeaways,
    Sources,
}

/// Section names accepted verbatim on bold or colon-terminated lines.
const SECTION_TITLES: &[(&str, Section)] = &[
    ("interview rounds", Section::Rounds),
    ("rounds", Section::Rounds),
    ("interview process", Section::Rounds),
    ("question themes", Section::Themes),
    ("themes", Section::Themes),
    ("common questions", Section::Themes),
    ("prep plan", Section::Plan),
    ("preparation plan", Section::Plan),
    ("plan", Section::Plan),
    ("key takeaways", Section::Takeaways),
    ("takeaways", Section::Takeaways),
    ("sources", Section::Sources),
    ("sources used", Section::Sources),
];

fn header_title(line: &str) -> String {
    line.trim_start_matches(['#', '*', ' '])
        .trim_end_matches(['*', ':', ' '])
        .to_lowercase()
}

fn keyword_section(title: &str) -> Option<Section> {
    if title.contains("takeaway") {
        Some(Section::Takeaways)
    } else if title.contains("round") {
        Some(Section::Rounds)
    } else if title.contains("theme") || title.contains("question") {
        Some(Section::Themes)
    } else if title.contains("plan") || title.contains("prep") {
        Some(Section::Plan)
    } else if title.contains("source") {
        Some(Section::Sources)
    } else {
        None
    }
}

/// Recognises a section header line such as `## Interview Rounds`,
/// `**Prep Plan:**` or `Key takeaways:`.
///
/// Markdown headings match on keywords, except that a heading naming the
/// section already open (`### Round 1` under `## Interview Rounds`) is an
/// item. Bold and colon-terminated lines must name a section exactly.
fn section_header(line: &str, current: Option<Section>) -> Option<Section> {
    if line.chars().count() > 60 {
        return None;
    }
    let title = header_title(line);
    if line.starts_with('#') {
        let section = keyword_section(&title)?;
        if current == Some(section) && !SECTION_TITLES.iter().any(|(t, _)| *t == title) {
            return None;
        }
        return Some(section);
    }
    if line.starts_with("**") || line.ends_with(':') {
        return SECTION_TITLES
            .iter()
            .find(|(t, _)| *t == title)
            .map(|(_, section)| *section);
    }
    None
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim_start_matches(['-', '*', '•', ' ']);
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    line
}

/// Splits free text on section headers. Returns `None` if no guide section
/// has any item.
pub fn recover_sections(raw: &str) -> Option<RawGuide> {
    let mut guide = RawGuide::default();
    let mut current: Option<Section> = None;

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(section) = section_header(line, current) {
            current = Some(section);
            continue;
        }
        let Some(section) = current else {
            continue;
        };
        let item = strip_list_marker(line)
            .trim_start_matches('#')
            .trim_matches(['*', ' '])
            .to_string();
        if item.is_empty() || item.starts_with("```") {
            continue;
        }
        match section {
            Section::Rounds => guide.rounds.push(item),
            Section::Themes => guide.themes.push(item),
            Section::Plan => guide.plan.push(item),
            Section::Takeaways => guide.takeaways.push(item),
            Section::Sources => guide.sources_used.push(item),
        }
    }

    guide.has_content().then_some(guide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_guide() {
        let raw = r#"```json
{"rounds": ["Recruiter screen", "SQL test"], "themes": [{"name": "SQL", "prompt": "window functions"}],
 "plan": ["Drill joins"], "takeaways": [], "sourcesUsed": ["S1"]}
```"#;
        let guide = parse_json_guide(raw).unwrap();
        assert_eq!(guide.rounds, vec!["Recruiter screen", "SQL test"]);
        assert_eq!(guide.themes, vec!["SQL: window functions"]);
        assert!(guide.takeaways.is_empty());
        assert_eq!(guide.sources_used, vec!["S1"]);
    }

    #[test]
    fn test_missing_or_mistyped_section_fails() {
        assert!(parse_json_guide(r#"{"rounds": [], "themes": [], "plan": []}"#).is_err());
        assert!(parse_json_guide(
            r#"{"rounds": "one", "themes": [], "plan": [], "takeaways": []}"#
        )
        .is_err());
        assert!(parse_json_guide("no json here").is_err());
    }

    #[test]
    fn test_recover_markdown_sections() {
        let raw = "Here is your guide!\n\n## Interview Rounds\n1. Phone screen\n2) Onsite loop\n\n**Question Themes**\n- Metrics\n- Stakeholders\n\nPrep plan:\n* Review SQL\n\n### Key Takeaways\n- You've got this\n\n### Sources\n- S1";
        let guide = recover_sections(raw).unwrap();
        assert_eq!(guide.rounds, vec!["Phone screen", "Onsite loop"]);
        assert_eq!(guide.themes, vec!["Metrics", "Stakeholders"]);
        assert_eq!(guide.plan, vec!["Review SQL"]);
        assert_eq!(guide.takeaways, vec!["You've got this"]);
        assert_eq!(guide.sources_used, vec!["S1"]);
    }

    #[test]
    fn test_bold_items_stay_in_their_section() {
        let raw = "## Interview Rounds\n**Round 1: Recruiter screen**\n**Round 2: SQL exercise**\n### Round 3: Onsite\n## Question Themes\n**Questions about metrics**\n## Key Takeaways\n- Stay calm\n**Prep early**";
        let guide = recover_sections(raw).unwrap();
        assert_eq!(
            guide.rounds,
            vec![
                "Round 1: Recruiter screen",
                "Round 2: SQL exercise",
                "Round 3: Onsite"
            ]
        );
        assert_eq!(guide.themes, vec!["Questions about metrics"]);
        assert_eq!(guide.takeaways, vec!["Stay calm", "Prep early"]);
    }

    #[test]
    fn test_recovery_fails_without_sections() {
        assert_eq!(recover_sections("I cannot help with that."), None);
        assert_eq!(recover_sections("## Sources\n- S1"), None);
    }
}
