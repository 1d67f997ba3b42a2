//! Context-neutral markup tree and the adapters that serialize it.
//!
//! The renderer only ever builds [`Node`]s. Each embedding context consumes the
//! same tree:
//!
//! - [`to_html`] / [`html_document`]: server-rendered page behind the iframe embed
//! - `serde` serialization of [`Node`]: JSON consumed by `widget-bundle.js`
//! - [`static_snippet`]: base64 payload that decodes itself with no server round trip

use std::collections::BTreeMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

pub const WIDGET_STYLESHEET: &str = include_str!("../../static/widget.css");

/// Elements that never carry children or a closing tag.
const VOID_ELEMENTS: [&str; 4] = ["img", "br", "hr", "meta"];

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text { text: String },
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn style(self, value: impl Into<String>) -> Self {
        self.attr("style", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    /// Concatenated text content, depth first.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            Node::Element(element) => element
                .children
                .iter()
                .map(Node::text_content)
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Finds the first element, depth first, whose class list contains `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        let Node::Element(element) = self else {
            return None;
        };
        if element.has_class(class) {
            return Some(element);
        }
        element
            .children
            .iter()
            .find_map(|child| child.find_by_class(class))
    }

    /// Counts elements, depth first, whose class list contains `class`.
    pub fn count_by_class(&self, class: &str) -> usize {
        match self {
            Node::Text { .. } => 0,
            Node::Element(element) => {
                let own = usize::from(element.has_class(class));
                own + element
                    .children
                    .iter()
                    .map(|child| child.count_by_class(class))
                    .sum::<usize>()
            }
        }
    }
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.attrs
            .get("class")
            .map_or(false, |classes| classes.split_whitespace().any(|c| c == class))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Serializes a tree into an HTML fragment with every text and attribute value escaped.
pub fn to_html(node: &Node) -> String {
    let mut out = String::new();
    write_html(node, &mut out);
    out
}

fn write_html(node: &Node, out: &mut String) {
    match node {
        Node::Text { text } => out.push_str(&escape_html(text)),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_html(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                return;
            }
            for child in &element.children {
                write_html(child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

/// Wraps a rendered body in a complete page carrying the widget stylesheet.
pub fn html_document(title: &str, body: &Node) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{}</style></head><body>{}</body></html>",
        escape_html(title),
        WIDGET_STYLESHEET,
        to_html(body),
    )
}

/// Prefix of the container id a static snippet decodes itself into.
pub const STATIC_CONTAINER_PREFIX: &str = "google-review-widget";

/// Container id for one place's snippet. Anything outside `[A-Za-z0-9_-]`
/// becomes `-`, so the id is safe in an attribute as written.
pub fn static_container_id(place_id: &str) -> String {
    let suffix: String = place_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' })
        .collect();
    format!("{}-{}", STATIC_CONTAINER_PREFIX, suffix)
}

/// Self-contained embed: the rendered markup travels base64-encoded in a data
/// attribute and a short inline script decodes it in place.
///
/// The script locates its container as its own previous sibling, so several
/// snippets on one page, even for the same place, never decode into each other.
pub fn static_snippet(node: &Node, place_id: &str) -> String {
    let fragment = format!("<style>{}</style>{}", WIDGET_STYLESHEET, to_html(node));
    let payload = STANDARD.encode(fragment.as_bytes());

    format!(
        "<div id=\"{id}\" data-widget=\"{payload}\"></div>\n\
         <script>\n\
         (function () {{\n\
         \x20 var script = document.currentScript;\n\
         \x20 var container = script && script.previousElementSibling;\n\
         \x20 if (!container || !container.hasAttribute('data-widget')) return;\n\
         \x20 try {{\n\
         \x20   var bytes = Uint8Array.from(atob(container.getAttribute('data-widget')), function (c) {{ return c.charCodeAt(0); }});\n\
         \x20   container.innerHTML = new TextDecoder().decode(bytes);\n\
         \x20 }} catch (error) {{\n\
         \x20   container.innerHTML = '<div style=\"padding: 16px; color: #ef4444;\">Error loading review widget</div>';\n\
         \x20 }}\n\
         }})();\n\
         </script>",
        id = static_container_id(place_id),
        payload = payload,
    )
}

/// Pulls the base64 payload back out of a snippet produced by [`static_snippet`].
pub fn decode_static_snippet(snippet: &str) -> Option<String> {
    let start = snippet.find("data-widget=\"")? + "data-widget=\"".len();
    let end = start + snippet[start..].find('"')?;
    let bytes = STANDARD.decode(&snippet[start..end]).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Element::new("div")
            .class("card featured")
            .attr("data-id", "a\"b")
            .child(Element::new("img").attr("src", "https://example.com/a.png?x=1&y=2"))
            .text("Fish & <Chips>")
            .into()
    }

    #[test]
    fn escapes_text_and_attributes() {
        assert_eq!(
            to_html(&sample()),
            "<div class=\"card featured\" data-id=\"a&quot;b\">\
             <img src=\"https://example.com/a.png?x=1&amp;y=2\">\
             Fish &amp; &lt;Chips&gt;</div>"
        );
    }

    #[test]
    fn serializes_tree_for_the_dom_injector() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "element");
        assert_eq!(json["tag"], "div");
        assert_eq!(json["attrs"]["class"], "card featured");
        assert_eq!(json["children"][0]["tag"], "img");
        assert!(json["children"][0].get("children").is_none());
        assert_eq!(json["children"][1]["type"], "text");
        assert_eq!(json["children"][1]["text"], "Fish & <Chips>");
    }

    #[test]
    fn class_queries_match_whole_class_names() {
        let node = sample();
        assert!(node.find_by_class("featured").is_some());
        assert!(node.find_by_class("feat").is_none());
        assert_eq!(node.count_by_class("card"), 1);
        assert_eq!(node.text_content(), "Fish & <Chips>");
    }

    #[test]
    fn static_snippet_carries_the_rendered_fragment() {
        let snippet = static_snippet(&sample(), "abc123");
        assert!(snippet.starts_with("<div id=\"google-review-widget-abc123\" data-widget=\""));
        let decoded = decode_static_snippet(&snippet).unwrap();
        assert!(decoded.starts_with("<style>"));
        assert!(decoded.ends_with(&to_html(&sample())));
    }

    #[test]
    fn static_snippets_get_their_own_containers() {
        let first = static_snippet(&sample(), "abc123");
        let second = static_snippet(&sample(), "xyz789");
        assert!(second.starts_with("<div id=\"google-review-widget-xyz789\""));
        assert_ne!(first.split('"').nth(1), second.split('"').nth(1));
        assert!(first.contains("document.currentScript"));
        assert!(!first.contains("getElementById"));
    }

    #[test]
    fn container_id_drops_unsafe_characters() {
        assert_eq!(static_container_id("ChIJ_a-1"), "google-review-widget-ChIJ_a-1");
        assert_eq!(static_container_id("a\"b <c>"), "google-review-widget-a-b--c-");
    }

    #[test]
    fn document_escapes_title() {
        let page = html_document("Joe's <Pizza>", &Node::text("hi"));
        assert!(page.contains("<title>Joe&#39;s &lt;Pizza&gt;</title>"));
        assert!(page.contains("<body>hi</body>"));
    }
}
