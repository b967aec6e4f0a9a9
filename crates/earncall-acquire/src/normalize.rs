use std::ops::Deref;

use ego_tree::NodeRef;
use regex::Regex;
use scraper::{Html, Node};
use unicode_normalization::UnicodeNormalization;

/// Full normalization pipeline: markup to plain text, NFC, whitespace
/// conventions. Both persisted outputs derive from this rendering.
pub fn transcript_text(html: &str) -> String {
    let text = html_to_text(html);
    let nfc: String = text.nfc().collect();
    normalize_whitespace(&nfc)
}

/// Strip markup to a plain-text rendering, one line per text node, so
/// block-level breaks survive. `script`/`style`/`noscript` contents are
/// dropped.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut pieces: Vec<String> = Vec::new();
    collect_text(document.tree.root(), &mut pieces);
    pieces.join("\n")
}

fn collect_text(node: NodeRef<'_, Node>, pieces: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => {
            let trimmed = text.deref().trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed.to_string());
            }
        }
        Node::Element(elem) if matches!(elem.name(), "script" | "style" | "noscript") => {}
        _ => {
            for child in node.children() {
                collect_text(child, pieces);
            }
        }
    }
}

/// Fold Windows/Mac line endings to `\n`, collapse runs of 3+ newlines
/// to one blank line, and trim the ends.
pub fn normalize_whitespace(input: &str) -> String {
    let unified = input.replace("\r\n", "\n").replace('\r', "\n");
    let blanks = Regex::new(r"\n{3,}").expect("valid regex");
    blanks.replace_all(&unified, "\n\n").trim().to_string()
}
