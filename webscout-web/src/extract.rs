//! HTML to plain text extraction
//!
//! Walks the parsed DOM and collects visible text, skipping script, style,
//! and page-chrome elements. Pure string-in, string-out; no network access.

use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Elements whose entire subtree is dropped during extraction
const SKIP_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "nav", "header", "footer", "aside",
];

/// Extract visible plain text from an HTML document.
///
/// Each text node becomes its own line with internal whitespace collapsed,
/// so block structure roughly survives as line breaks. Entities are decoded
/// by the parser. Returns an empty string for markup with no visible text.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines: Vec<String> = Vec::new();
    collect_text(*document.root_element(), &mut lines);
    lines.join("\n")
}

fn collect_text(node: NodeRef<'_, Node>, lines: &mut Vec<String>) {
    if let Node::Element(element) = node.value() {
        if SKIP_ELEMENTS.contains(&element.name()) {
            return;
        }
    }

    if let Node::Text(text) = node.value() {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }

    for child in node.children() {
        collect_text(child, lines);
    }
}
