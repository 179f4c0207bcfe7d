//! Haiku page content: cleanup of partially rendered fragments, plain-text
//! rendering for the terminal, and the standalone page reader.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{node::Node, ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::warn;

/// Unresolved template marker left by the page generator.
const TAGS_PLACEHOLDER: &str = "{{tags}}";

/// Masthead shown above a standalone haiku page.
pub const PAGE_LABEL: &str = "10,000 ARROWS";

const DEFAULT_INDEX: &str = "./index.html";

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "article",
    "section", "header", "footer", "main", "nav", "blockquote", "pre", "tr", "table",
];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "template", "noscript"];

static TAGS_LINE: OnceLock<Regex> = OnceLock::new();
static PAYLOAD: OnceLock<Selector> = OnceLock::new();

fn tags_line() -> &'static Regex {
    TAGS_LINE.get_or_init(|| Regex::new(r"(?mi)^Tags:.*$").expect("valid tags-line pattern"))
}

fn payload_selector() -> &'static Selector {
    PAYLOAD.get_or_init(|| {
        Selector::parse(r#"script#haiku-data[type="application/json"]"#)
            .expect("valid payload selector")
    })
}

/// Remove every `{{tags}}` marker and every `Tags: ...` line.
pub fn clean_fragment(html: &str) -> String {
    let without_marker = html.replace(TAGS_PLACEHOLDER, "");
    tags_line().replace_all(&without_marker, "").into_owned()
}

/// Whether a page path asks for embed mode through its query string.
pub fn is_embed_request(path: &str) -> bool {
    let Some((_, rest)) = path.split_once('?') else {
        return false;
    };
    let query = rest.split('#').next().unwrap_or("");
    query
        .split('&')
        .any(|pair| pair.split('=').next() == Some("embed"))
}

/// Extract readable text lines from an HTML document or fragment.
///
/// Block elements start new lines; whitespace inside a line collapses.
pub fn fragment_lines(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut lines = Vec::new();
    let mut current = String::new();
    collect_text(doc.root_element(), &mut lines, &mut current);
    flush_line(&mut lines, &mut current);
    lines
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>, current: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                let is_block = BLOCK_ELEMENTS.contains(&name);
                if is_block {
                    flush_line(lines, current);
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, lines, current);
                }
                if is_block {
                    flush_line(lines, current);
                }
            }
            _ => {}
        }
    }
}

fn flush_line(lines: &mut Vec<String>, current: &mut String) {
    let line = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}

/// Sequence number of a haiku within its day; generators emit numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Seq {
    Number(u64),
    Text(String),
}

impl Seq {
    /// Zero-padded to two characters; empty for `0` or `""`.
    fn padded(&self) -> String {
        let raw = match self {
            Seq::Number(0) => String::new(),
            Seq::Number(n) => n.to_string(),
            Seq::Text(s) => s.clone(),
        };
        if raw.is_empty() {
            raw
        } else {
            format!("{:0>2}", raw)
        }
    }
}

/// JSON payload embedded in a haiku page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HaikuPage {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub seq: Option<Seq>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub lines: Vec<String>,
}

impl HaikuPage {
    /// Read the `#haiku-data` payload from a page, if it has a valid one.
    pub fn from_html(html: &str) -> Option<Self> {
        let doc = Html::parse_document(html);
        let script = doc.select(payload_selector()).next()?;
        let json: String = script.text().collect();
        match serde_json::from_str(&json) {
            Ok(page) => Some(page),
            Err(e) => {
                warn!("Failed to parse haiku payload: {}", e);
                None
            }
        }
    }

    /// `date · seq`, or just the date when there is no sequence number.
    pub fn meta(&self) -> String {
        let date = self.date.as_deref().unwrap_or("");
        match self.seq.as_ref().map(Seq::padded) {
            Some(seq) if !seq.is_empty() => format!("{} · {}", date, seq),
            _ => date.to_string(),
        }
    }

    pub fn index_link(&self) -> &str {
        self.index
            .as_deref()
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_INDEX)
    }

    /// Text lines for display. Embedded pages drop the masthead and footer.
    pub fn render(&self, embedded: bool) -> Vec<String> {
        let poem = self.lines.iter().map(|l| inline_text(l));
        if embedded {
            return poem.collect();
        }
        let mut out = vec![
            PAGE_LABEL.to_string(),
            "─".repeat(PAGE_LABEL.chars().count()),
            self.meta(),
            String::new(),
        ];
        out.extend(poem);
        out.push(String::new());
        out.push(format!("Index → {}", self.index_link()));
        out
    }
}

fn inline_text(line: &str) -> String {
    fragment_lines(line).join(" ")
}

/// Clean a fetched page and render it for display.
///
/// Pages with a haiku payload render through `HaikuPage`; everything else
/// falls back to the page's text.
pub fn render_document(html: &str, embedded: bool) -> Vec<String> {
    let cleaned = clean_fragment(html);
    match HaikuPage::from_html(&cleaned) {
        Some(page) => page.render(embedded),
        None => fragment_lines(&cleaned),
    }
}
