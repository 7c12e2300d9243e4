use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Elements whose start and end mark a line break in the visible text
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tr",
    "ul",
];

/// Elements that never contribute visible text
const HIDDEN_ELEMENTS: &[&str] = &["head", "noscript", "script", "style", "template"];

/// Extracts the `href` value of every anchor, in document order
///
/// Anchors without an `href` attribute are skipped; empty values are kept so
/// the caller decides what to discard.
pub fn anchor_targets(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);

    let link_selector = match Selector::parse("a") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    let links = doc
        .select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    ::log::debug!("HTML parser found {} anchors", links.len());
    links
}

/// Extracts the visible text of the `<body>`, one line per block element
///
/// Returns `None` if the markup has no body.
pub fn body_text(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let body_selector = Selector::parse("body").ok()?;
    let body = doc.select(&body_selector).next()?;

    let mut raw = String::new();
    collect_text(body, &mut raw);

    let text = raw
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Some(text)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child_element.value().name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }

                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push('\n');
                }
                collect_text(child_element, out);
                if block {
                    out.push('\n');
                } else if matches!(name, "td" | "th") {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
