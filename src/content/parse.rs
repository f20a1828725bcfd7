//! HTML parser producing the content tree
//!
//! This module turns a fetched page's HTML into the closed
//! [`ContentNode`](crate::content::ContentNode) tree, collecting hyperlink
//! and asset URLs along the way. All URLs are resolved against the page's
//! own URL, so downstream components only ever see absolute URLs.
//!
//! Diagram blocks follow the wiki's conventions: an element carrying a
//! `mermaid` class, or a `<pre>` whose `<code>` is tagged
//! `language-mermaid`, is captured as diagram source rather than as an
//! ordinary code block.

use crate::content::model::{collapse_whitespace, ContentNode};
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from the <title> tag)
    pub title: Option<String>,

    /// The page body as a content tree
    pub nodes: Vec<ContentNode>,

    /// All hyperlink URLs found on the page (absolute, de-duplicated)
    pub links: Vec<Url>,

    /// All image/asset URLs found on the page (absolute, de-duplicated)
    pub assets: Vec<Url>,
}

/// Parses HTML content into a content tree plus discovered URLs
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The page's own URL, for resolving relative references
pub fn parse_page(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);
    let title = extract_title(&document);

    let mut builder = TreeBuilder::new(base_url.clone());
    let mut nodes = Vec::new();

    let root = body_element(&document);
    for child in root.children() {
        builder.collect(child, &mut nodes);
    }

    ParsedPage {
        title,
        nodes,
        links: builder.links,
        assets: builder.assets,
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns the <body> element, or the document root for fragments
fn body_element(document: &Html) -> ElementRef<'_> {
    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            return body;
        }
    }
    document.root_element()
}

/// Walks the DOM into content nodes while recording link and asset URLs
struct TreeBuilder {
    base_url: Url,
    links: Vec<Url>,
    assets: Vec<Url>,
    seen_links: HashSet<String>,
    seen_assets: HashSet<String>,
}

impl TreeBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            links: Vec::new(),
            assets: Vec::new(),
            seen_links: HashSet::new(),
            seen_assets: HashSet::new(),
        }
    }

    fn collect(&mut self, node: NodeRef<'_, Node>, out: &mut Vec<ContentNode>) {
        match node.value() {
            Node::Text(text) => {
                if !text.is_empty() {
                    out.push(ContentNode::Text(text.to_string()));
                }
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.element(element, out);
                }
            }
            _ => {
                for child in node.children() {
                    self.collect(child, out);
                }
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>, out: &mut Vec<ContentNode>) {
        let tag = element.value().name().to_ascii_lowercase();
        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag.as_bytes()[1] - b'0';
                let children = self.children(element);
                out.push(ContentNode::Heading { level, children });
            }
            "p" => {
                let children = self.children(element);
                out.push(ContentNode::Paragraph(children));
            }
            "pre" => out.push(self.pre_block(element)),
            "div" | "figure" if has_mermaid_class(element) => {
                out.push(ContentNode::DiagramBlock {
                    source: diagram_text(element),
                });
            }
            "ul" => out.push(self.list(element, false)),
            "ol" => out.push(self.list(element, true)),
            "table" => out.push(self.table(element)),
            "a" => self.anchor(element, out),
            "img" => self.image(element, out),
            "em" | "i" => {
                let children = self.children(element);
                out.push(ContentNode::Emphasis(children));
            }
            "strong" | "b" => {
                let children = self.children(element);
                out.push(ContentNode::Strong(children));
            }
            "code" => {
                let code = element.text().collect::<String>();
                out.push(ContentNode::InlineCode(code));
            }
            "blockquote" => {
                let children = self.children(element);
                out.push(ContentNode::BlockQuote(children));
            }
            "br" => out.push(ContentNode::Text("\n".to_string())),
            "hr" => out.push(ContentNode::Paragraph(vec![ContentNode::Text(
                "---".to_string(),
            )])),
            // Scripting and presentation-only sections carry no content
            "script" | "style" | "noscript" | "template" | "iframe" | "head" => {}
            // Structural containers are transparent
            "html" | "body" | "div" | "span" | "main" | "section" | "article" | "header"
            | "footer" | "nav" | "aside" | "figure" | "figcaption" | "details" | "summary" => {
                for child in element.children() {
                    self.collect(child, out);
                }
            }
            _ => {
                let children = self.children(element);
                out.push(ContentNode::Unknown(children));
            }
        }
    }

    fn children(&mut self, element: ElementRef<'_>) -> Vec<ContentNode> {
        let mut nodes = Vec::new();
        for child in element.children() {
            self.collect(child, &mut nodes);
        }
        nodes
    }

    /// Classifies a <pre> as a diagram or an ordinary code block
    fn pre_block(&mut self, element: ElementRef<'_>) -> ContentNode {
        let code_child = element
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "code");

        let is_mermaid = has_mermaid_class(element)
            || code_child.is_some_and(|code| {
                code.value()
                    .attr("class")
                    .is_some_and(|c| c.to_lowercase().contains("language-mermaid"))
            });

        if is_mermaid {
            return ContentNode::DiagramBlock {
                source: diagram_text(element),
            };
        }

        let language = code_child.and_then(code_language);
        let code = match code_child {
            Some(code) => code.text().collect::<String>(),
            None => element.text().collect::<String>(),
        };

        ContentNode::CodeBlock {
            language,
            code: code.trim_end_matches('\n').to_string(),
        }
    }

    fn list(&mut self, element: ElementRef<'_>, ordered: bool) -> ContentNode {
        let mut items = Vec::new();
        for child in element.children() {
            if let Some(li) = ElementRef::wrap(child) {
                if li.value().name() == "li" {
                    items.push(self.children(li));
                }
            }
        }
        ContentNode::List { ordered, items }
    }

    fn table(&mut self, element: ElementRef<'_>) -> ContentNode {
        let mut headers = Vec::new();
        let mut rows = Vec::new();

        if let Ok(tr_selector) = Selector::parse("tr") {
            for tr in element.select(&tr_selector) {
                let mut cells = Vec::new();
                let mut is_header_row = false;

                for cell in tr.children().filter_map(ElementRef::wrap) {
                    match cell.value().name() {
                        "th" => {
                            is_header_row = true;
                            cells.push(cell_text(cell));
                        }
                        "td" => cells.push(cell_text(cell)),
                        _ => {}
                    }
                }

                if cells.is_empty() {
                    continue;
                }
                if is_header_row && headers.is_empty() {
                    headers = cells;
                } else {
                    rows.push(cells);
                }
            }
        }

        ContentNode::Table { headers, rows }
    }

    fn anchor(&mut self, element: ElementRef<'_>, out: &mut Vec<ContentNode>) {
        let children = self.children(element);

        let href = element.value().attr("href").map(str::trim).unwrap_or("");
        match resolve_reference(href, &self.base_url) {
            Some(absolute) => {
                if self.seen_links.insert(absolute.to_string()) {
                    self.links.push(absolute.clone());
                }
                out.push(ContentNode::Link {
                    href: absolute.to_string(),
                    children,
                });
            }
            // Unresolvable anchors keep their text content
            None => out.extend(children),
        }
    }

    fn image(&mut self, element: ElementRef<'_>, out: &mut Vec<ContentNode>) {
        let src = element.value().attr("src").map(str::trim).unwrap_or("");
        let alt = element.value().attr("alt").unwrap_or("").to_string();

        if let Some(absolute) = resolve_reference(src, &self.base_url) {
            if self.seen_assets.insert(absolute.to_string()) {
                self.assets.push(absolute.clone());
            }
            out.push(ContentNode::Image {
                src: absolute.to_string(),
                alt,
            });
        } else if !alt.is_empty() {
            out.push(ContentNode::Text(alt));
        }
    }
}

/// Resolves an href/src to an absolute HTTP(S) URL
///
/// Returns None for references that are not followable content links:
/// empty strings, fragment-only anchors, and the javascript/mailto/tel/data
/// schemes.
fn resolve_reference(reference: &str, base_url: &Url) -> Option<Url> {
    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }
    if reference.starts_with("javascript:")
        || reference.starts_with("mailto:")
        || reference.starts_with("tel:")
        || reference.starts_with("data:")
    {
        return None;
    }

    match base_url.join(reference) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

/// Returns true if the element's class attribute names a mermaid block
fn has_mermaid_class(element: ElementRef<'_>) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|c| c.to_lowercase().contains("mermaid"))
}

/// Collects a diagram element's text nodes, joined by newlines
fn diagram_text(element: ElementRef<'_>) -> String {
    let parts: Vec<&str> = element.text().collect();
    parts.join("\n").trim().to_string()
}

/// Extracts the fence language from a code element's class attribute
fn code_language(code: ElementRef<'_>) -> Option<String> {
    code.value().attr("class").and_then(|classes| {
        classes
            .split_whitespace()
            .find_map(|c| c.strip_prefix("language-"))
            .map(str::to_string)
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    collapse_whitespace(&cell.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://site.example/space/page").unwrap()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>Overview</title></head><body></body></html>"#;
        let parsed = parse_page(html, &base_url());
        assert_eq!(parsed.title, Some("Overview".to_string()));
    }

    #[test]
    fn test_headings_keep_levels() {
        let html = "<body><h1>One</h1><h3>Three</h3></body>";
        let parsed = parse_page(html, &base_url());
        assert_eq!(parsed.nodes.len(), 2);
        assert!(matches!(parsed.nodes[0], ContentNode::Heading { level: 1, .. }));
        assert!(matches!(parsed.nodes[1], ContentNode::Heading { level: 3, .. }));
    }

    #[test]
    fn test_code_block_with_language() {
        let html = r#"<body><pre><code class="language-rust">fn main() {}</code></pre></body>"#;
        let parsed = parse_page(html, &base_url());
        match &parsed.nodes[0] {
            ContentNode::CodeBlock { language, code } => {
                assert_eq!(language.as_deref(), Some("rust"));
                assert_eq!(code, "fn main() {}");
            }
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_mermaid_div_becomes_diagram() {
        let html = r#"<body><div class="mermaid">graph TD;
  A--&gt;B;</div></body>"#;
        let parsed = parse_page(html, &base_url());
        match &parsed.nodes[0] {
            ContentNode::DiagramBlock { source } => {
                assert_eq!(source, "graph TD;\n  A-->B;");
            }
            other => panic!("expected diagram block, got {:?}", other),
        }
    }

    #[test]
    fn test_mermaid_code_fence_class() {
        let html =
            r#"<body><pre><code class="language-mermaid">sequenceDiagram</code></pre></body>"#;
        let parsed = parse_page(html, &base_url());
        assert!(matches!(parsed.nodes[0], ContentNode::DiagramBlock { .. }));
    }

    #[test]
    fn test_anchor_resolved_and_recorded() {
        let html = r#"<body><a href="/space/other">Other</a></body>"#;
        let parsed = parse_page(html, &base_url());
        assert_eq!(parsed.links.len(), 1);
        assert_eq!(parsed.links[0].as_str(), "https://site.example/space/other");
        match &parsed.nodes[0] {
            ContentNode::Link { href, .. } => {
                assert_eq!(href, "https://site.example/space/other");
            }
            other => panic!("expected link, got {:?}", other),
        }
    }

    #[test]
    fn test_special_scheme_anchors_degrade_to_text() {
        let html = r##"<body>
            <a href="mailto:x@y.z">mail</a>
            <a href="javascript:void(0)">js</a>
            <a href="#top">top</a>
        </body>"##;
        let parsed = parse_page(html, &base_url());
        assert!(parsed.links.is_empty());
        assert!(!parsed
            .nodes
            .iter()
            .any(|n| matches!(n, ContentNode::Link { .. })));
    }

    #[test]
    fn test_image_recorded_as_asset() {
        let html = r#"<body><img src="diagram.png" alt="The diagram"></body>"#;
        let parsed = parse_page(html, &base_url());
        assert_eq!(parsed.assets.len(), 1);
        assert_eq!(
            parsed.assets[0].as_str(),
            "https://site.example/space/diagram.png"
        );
    }

    #[test]
    fn test_duplicate_links_deduplicated() {
        let html = r#"<body><a href="/space/a">A</a><a href="/space/a">A again</a></body>"#;
        let parsed = parse_page(html, &base_url());
        assert_eq!(parsed.links.len(), 1);
    }

    #[test]
    fn test_list_items() {
        let html = "<body><ol><li>first</li><li>second</li></ol></body>";
        let parsed = parse_page(html, &base_url());
        match &parsed.nodes[0] {
            ContentNode::List { ordered, items } => {
                assert!(*ordered);
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_table_headers_and_rows() {
        let html = r#"<body><table>
            <tr><th>Name</th><th>Value</th></tr>
            <tr><td>a</td><td>1</td></tr>
        </table></body>"#;
        let parsed = parse_page(html, &base_url());
        match &parsed.nodes[0] {
            ContentNode::Table { headers, rows } => {
                assert_eq!(headers, &["Name", "Value"]);
                assert_eq!(rows, &[vec!["a".to_string(), "1".to_string()]]);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_element_keeps_children() {
        let html = "<body><widget>inner text</widget></body>";
        let parsed = parse_page(html, &base_url());
        match &parsed.nodes[0] {
            ContentNode::Unknown(children) => {
                assert!(matches!(&children[0], ContentNode::Text(t) if t == "inner text"));
            }
            other => panic!("expected unknown node, got {:?}", other),
        }
    }

    #[test]
    fn test_script_and_style_dropped() {
        let html = "<body><script>alert(1)</script><style>p{}</style><p>kept</p></body>";
        let parsed = parse_page(html, &base_url());
        let text = crate::content::plain_text(&parsed.nodes);
        assert_eq!(text, "kept");
    }
}
