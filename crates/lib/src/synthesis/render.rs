//! Markdown rendering of a [`PrepGuide`].

use crate::types::PrepGuide;

fn bullet_section(out: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push(format!("### {heading}"));
    out.extend(items.iter().map(|item| format!("- {item}")));
    out.push(String::new());
}

/// Renders the guide as Markdown, one `###` section per non-empty field.
pub fn render_markdown(guide: &PrepGuide, target: &str) -> String {
    let mut out = vec![format!("## Interview Intel: {target}"), String::new()];

    bullet_section(&mut out, "Interview Rounds", &guide.rounds);
    bullet_section(&mut out, "Question Themes", &guide.themes);

    if !guide.plan.is_empty() {
        out.push("### Prep Plan".to_string());
        out.extend(
            guide
                .plan
                .iter()
                .enumerate()
                .map(|(i, step)| format!("{}. {step}", i + 1)),
        );
        out.push(String::new());
    }

    bullet_section(&mut out, "Key Takeaways", &guide.takeaways);

    if !guide.sources_used.is_empty() {
        out.push("### Sources".to_string());
        out.extend(
            guide
                .sources_used
                .iter()
                .map(|s| format!("- [{}]({}) ({})", s.title, s.url, s.domain)),
        );
        out.push(String::new());
    }

    out.join("\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceRef;

    #[test]
    fn test_render_all_sections() {
        let guide = PrepGuide {
            rounds: vec!["Recruiter screen".into()],
            themes: vec!["SQL".into()],
            plan: vec!["Drill joins".into(), "Mock interview".into()],
            takeaways: vec!["Breathe".into()],
            sources_used: vec![SourceRef {
                url: "https://example.com/a".into(),
                title: "Acme experience".into(),
                domain: "example.com".into(),
                snippet: String::new(),
            }],
        };
        let md = render_markdown(&guide, "Acme, Data Analyst");
        assert!(md.starts_with("## Interview Intel: Acme, Data Analyst"));
        for heading in [
            "### Interview Rounds",
            "### Question Themes",
            "### Prep Plan",
            "### Key Takeaways",
            "### Sources",
        ] {
            assert!(md.contains(heading), "missing {heading}");
        }
        assert!(md.contains("2. Mock interview"));
        assert!(md.contains("- [Acme experience](https://example.com/a) (example.com)"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let guide = PrepGuide {
            takeaways: vec!["Breathe".into()],
            ..Default::default()
        };
        let md = render_markdown(&guide, "Acme");
        assert!(!md.contains("### Interview Rounds"));
        assert!(!md.contains("### Sources"));
        assert!(md.ends_with("- Breathe"));
    }
}
