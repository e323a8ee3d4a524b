use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{Html, Selector};

pub const NO_TITLE: &str = "No title found";
pub const NO_CONTENT: &str = "No content found";

/// Elements whose whole subtree never contributes to the body text.
const STRIPPED_TAGS: [&str; 4] = ["script", "style", "img", "input"];

/// Text pulled out of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub body_text: String,
}

pub trait Extractor: Send + Sync {
    fn extract(&self, url: &str, html: &str) -> Page;
}

/// Takes the `<title>` text and the visible `<body>` text, one text node per
/// line, with scripts, styles, images and form inputs removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoilerplateStripper;

impl Extractor for BoilerplateStripper {
    fn extract(&self, url: &str, html: &str) -> Page {
        let doc = Html::parse_document(html);

        let title = Selector::parse("title")
            .ok()
            .and_then(|sel| doc.select(&sel).next().map(|t| t.text().collect::<String>()))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());

        let body_text = Selector::parse("body")
            .ok()
            .and_then(|sel| doc.select(&sel).next())
            .map(|body| {
                let mut lines = Vec::new();
                for child in body.children() {
                    collect_text(child, &mut lines);
                }
                lines.join("\n")
            })
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_CONTENT.to_string());

        Page {
            url: url.to_string(),
            title,
            body_text,
        }
    }
}

fn collect_text(node: NodeRef<'_, Node>, lines: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        Node::Element(element) if is_stripped(element.name()) => {}
        // Parsed with scripting on, so the contents arrive as one raw text node.
        Node::Element(element) if element.name().eq_ignore_ascii_case("noscript") => {
            for child in node.children() {
                match child.value() {
                    Node::Text(raw) => collect_fragment_text(raw, lines),
                    _ => collect_text(child, lines),
                }
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, lines);
            }
        }
    }
}

fn collect_fragment_text(markup: &str, lines: &mut Vec<String>) {
    let fragment = Html::parse_fragment(markup);
    for child in fragment.root_element().children() {
        collect_text(child, lines);
    }
}

fn is_stripped(tag: &str) -> bool {
    STRIPPED_TAGS
        .iter()
        .any(|stripped| stripped.eq_ignore_ascii_case(tag))
}
