use edgecoach_html::{extract_readable, html_to_text, strip_markup};

const EXPERIENCE_POST: &str = include_str!("fixtures/experience_post.html");

#[test]
fn test_extract_readable_keeps_article_blocks() {
    // --- 1. Arrange & Act ---
    let doc = extract_readable(EXPERIENCE_POST);

    // --- 2. Assert ---
    assert_eq!(
        doc.title.as_deref(),
        Some("My Acme Software Engineer Interview Experience")
    );
    assert!(doc.text.contains("recruiter screen"));
    assert!(doc.text.contains("interval merging & a follow-up"));
    assert!(doc.text.contains("system design of a rate limiter"));
    assert!(doc.text.contains("Practice talking through trade-offs"));
    // Blocks are separated by newlines, one per paragraph or list item.
    assert!(doc.text.lines().count() >= 5);
}

#[test]
fn test_extract_readable_skips_chrome_and_scripts() {
    let doc = extract_readable(EXPERIENCE_POST);

    assert!(!doc.text.contains("Sign in"));
    assert!(!doc.text.contains("newsletter"));
    assert!(!doc.text.contains("All rights reserved"));
    assert!(!doc.text.contains("analytics"));
    assert!(!doc.text.contains("font-family"));
}

#[test]
fn test_extract_readable_falls_back_to_body() {
    // --- 1. Arrange ---
    let html = r#"<html><body>
        <nav><p>Menu</p></nav>
        <div><p>Short page about the Globex hiring process.</p></div>
        <div><p>Two rounds, both virtual.</p></div>
    </body></html>"#;

    // --- 2. Act ---
    let doc = extract_readable(html);

    // --- 3. Assert ---
    assert_eq!(doc.title, None);
    assert_eq!(
        doc.text,
        "Short page about the Globex hiring process.\nTwo rounds, both virtual."
    );
}

#[test]
fn test_title_falls_back_to_first_heading() {
    let html = "<html><body><h1>  Initech   Interview Guide </h1><p>Body text.</p></body></html>";
    let doc = extract_readable(html);
    assert_eq!(doc.title.as_deref(), Some("Initech Interview Guide"));
}

#[test]
fn test_strip_markup() {
    let html = r#"<div><script>var x = "<p>no</p>";</script><style>.a{}</style>
        <!-- hidden --><noscript>Enable JS</noscript>
        <span>Tom&#39;s   take:</span> <b>5&nbsp;rounds</b> &lt;tough&gt; &#x2014; fair</div>"#;

    assert_eq!(strip_markup(html), "Tom's take: 5 rounds <tough> \u{2014} fair");
}

#[test]
fn test_html_to_text_uses_strip_fallback_when_no_blocks() {
    // --- 1. Arrange ---
    let html = "<html><head><title>Raw</title></head><body><div>Loose text with <em>no</em> block tags</div></body></html>";

    // --- 2. Act ---
    let doc = html_to_text(html);

    // --- 3. Assert ---
    assert_eq!(doc.title.as_deref(), Some("Raw"));
    assert!(doc.text.contains("Loose text with no block tags"));
}

#[test]
fn test_html_to_text_prefers_readable_result() {
    let doc = html_to_text(EXPERIENCE_POST);
    assert!(doc.text.contains("recruiter screen"));
    assert!(!doc.text.contains("Sign in"));
}
