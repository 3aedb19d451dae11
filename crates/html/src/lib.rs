//! # edgecoach-html: HTML Text Extraction
//!
//! Pulls readable body text out of fetched web pages. [`extract_readable`]
//! walks the document tree and keeps the text of content blocks inside the
//! main content region; [`strip_markup`] is a regex-based fallback for
//! documents the tree walk gets nothing from. [`html_to_text`] chains the two.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Candidate content roots, most specific first.
const ROOT_SELECTORS: &[&str] = &["article", "main", "[role=main]", "#content", ".post"];

/// Elements whose own text makes up the readable body.
const BLOCK_TAGS: &[&str] = &[
    "p", "li", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "blockquote", "td", "dd",
];

/// Elements whose subtree is never content.
const SKIP_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "script", "style", "noscript", "form", "button", "svg",
    "template", "iframe",
];

/// A content root is accepted once it holds at least this much text.
const MIN_ROOT_CHARS: usize = 200;

static BLOCK_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse(&BLOCK_TAGS.join(", ")).ok());
static TITLE_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("title").ok());
static H1_SELECTOR: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("h1").ok());
static BODY_SELECTOR: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("body").ok());

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").expect("valid regex"));
static NOSCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<noscript\b.*?</noscript\s*>").expect("valid regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").expect("valid regex"));

/// The readable part of an HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadableDocument {
    pub title: Option<String>,
    /// Content blocks separated by newlines.
    pub text: String,
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_skipped_ancestor(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| SKIP_TAGS.contains(&a.value().name()))
}

fn has_block_ancestor(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| BLOCK_TAGS.contains(&a.value().name()))
}

/// Text of the outermost content blocks below `root`, one block per line.
fn block_text(root: ElementRef, blocks: &Selector) -> String {
    root.select(blocks)
        .filter(|el| !has_skipped_ancestor(el) && !has_block_ancestor(el))
        .map(|el| normalize_ws(&el.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn first_text(doc: &Html, selector: &Option<Selector>) -> Option<String> {
    let selector = selector.as_ref()?;
    doc.select(selector)
        .map(|el| normalize_ws(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

/// Extracts the title and main body text with a readability-style tree walk.
///
/// The first content root (`article`, `main`, ...) holding enough text wins;
/// otherwise the whole `body` is used. Navigation, headers, footers and
/// scripts are skipped.
pub fn extract_readable(html: &str) -> ReadableDocument {
    let doc = Html::parse_document(html);
    let title = first_text(&doc, &TITLE_SELECTOR).or_else(|| first_text(&doc, &H1_SELECTOR));

    let Some(blocks) = BLOCK_SELECTOR.as_ref() else {
        return ReadableDocument { title, text: String::new() };
    };

    let from_roots = ROOT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .flat_map(|selector| {
            doc.select(&selector)
                .map(|root| block_text(root, blocks))
                .collect::<Vec<_>>()
        })
        .find(|text| text.chars().count() >= MIN_ROOT_CHARS);

    let text = from_roots
        .or_else(|| {
            let body = BODY_SELECTOR.as_ref()?;
            doc.select(body).next().map(|root| block_text(root, blocks))
        })
        .unwrap_or_default();

    ReadableDocument { title, text }
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures| {
        let raw = &caps[1];
        let code = match raw.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Removes scripts, styles, comments and tags, decodes common entities and
/// collapses whitespace.
pub fn strip_markup(html: &str) -> String {
    let without_code = [&*SCRIPT_RE, &*STYLE_RE, &*NOSCRIPT_RE, &*COMMENT_RE]
        .iter()
        .fold(html.to_string(), |acc, re| re.replace_all(&acc, " ").into_owned());
    let without_tags = TAG_RE.replace_all(&without_code, " ");
    normalize_ws(&decode_entities(&without_tags))
}

/// Readable extraction with the markup-stripping fallback for empty results.
pub fn html_to_text(html: &str) -> ReadableDocument {
    let readable = extract_readable(html);
    if !readable.text.trim().is_empty() {
        return readable;
    }
    ReadableDocument {
        title: readable.title,
        text: strip_markup(html),
    }
}
