//! Closed content-node variants for rendered wiki pages
//!
//! Source pages carry loosely-typed, heterogeneous content; modeling it as
//! a closed tagged set keeps the converter's dispatch exhaustive and gives
//! unrecognized markup one well-defined fallback (degrade to text).

/// A node in a page's parsed content tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    /// Heading at source nesting depth 1..=6
    Heading { level: u8, children: Vec<ContentNode> },

    /// Block of inline content
    Paragraph(Vec<ContentNode>),

    /// Fenced code block with an optional language tag
    CodeBlock { language: Option<String>, code: String },

    /// Diagram source to be preserved byte-for-byte in a mermaid fence
    DiagramBlock { source: String },

    /// Ordered or unordered list; each item is its own node sequence
    List { ordered: bool, items: Vec<Vec<ContentNode>> },

    /// Table as header cells plus body rows of plain-text cells
    Table { headers: Vec<String>, rows: Vec<Vec<String>> },

    /// Hyperlink with an absolute target URL
    Link { href: String, children: Vec<ContentNode> },

    /// Image with an absolute source URL
    Image { src: String, alt: String },

    /// Emphasized (italic) inline content
    Emphasis(Vec<ContentNode>),

    /// Strong (bold) inline content
    Strong(Vec<ContentNode>),

    /// Inline code span
    InlineCode(String),

    /// Quoted block content
    BlockQuote(Vec<ContentNode>),

    /// Literal text
    Text(String),

    /// Unrecognized element; renders as its plain text content
    Unknown(Vec<ContentNode>),
}

impl ContentNode {
    /// Returns true if this node renders as its own block
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Heading { .. }
                | Self::Paragraph(_)
                | Self::CodeBlock { .. }
                | Self::DiagramBlock { .. }
                | Self::List { .. }
                | Self::Table { .. }
                | Self::BlockQuote(_)
        )
    }
}

/// Extracts the plain text of a node sequence, discarding all markup
///
/// This is the degrade path for unknown elements and the fallback for
/// contexts (table cells, link labels) that cannot nest block markup.
pub fn plain_text(nodes: &[ContentNode]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    collapse_whitespace(&out)
}

fn collect_text(nodes: &[ContentNode], out: &mut String) {
    for node in nodes {
        match node {
            ContentNode::Text(t) => out.push_str(t),
            ContentNode::InlineCode(code) => out.push_str(code),
            ContentNode::CodeBlock { code, .. } => out.push_str(code),
            ContentNode::DiagramBlock { source } => out.push_str(source),
            ContentNode::Image { alt, .. } => out.push_str(alt),
            ContentNode::Heading { children, .. }
            | ContentNode::Paragraph(children)
            | ContentNode::Link { children, .. }
            | ContentNode::Emphasis(children)
            | ContentNode::Strong(children)
            | ContentNode::BlockQuote(children)
            | ContentNode::Unknown(children) => collect_text(children, out),
            ContentNode::List { items, .. } => {
                for item in items {
                    collect_text(item, out);
                    out.push(' ');
                }
            }
            ContentNode::Table { headers, rows } => {
                for cell in headers {
                    out.push_str(cell);
                    out.push(' ');
                }
                for row in rows {
                    for cell in row {
                        out.push_str(cell);
                        out.push(' ');
                    }
                }
            }
        }
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_flattens_markup() {
        let nodes = vec![ContentNode::Paragraph(vec![
            ContentNode::Text("Hello ".to_string()),
            ContentNode::Strong(vec![ContentNode::Text("bold".to_string())]),
            ContentNode::Text(" world".to_string()),
        ])];
        assert_eq!(plain_text(&nodes), "Hello bold world");
    }

    #[test]
    fn test_plain_text_includes_alt_and_code() {
        let nodes = vec![
            ContentNode::Image {
                src: "https://x/logo.png".to_string(),
                alt: "logo".to_string(),
            },
            ContentNode::Text(" ".to_string()),
            ContentNode::InlineCode("run()".to_string()),
        ];
        assert_eq!(plain_text(&nodes), "logo run()");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\t b  c "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_is_block() {
        assert!(ContentNode::Paragraph(vec![]).is_block());
        assert!(ContentNode::DiagramBlock { source: String::new() }.is_block());
        assert!(!ContentNode::Text("x".to_string()).is_block());
        assert!(!ContentNode::Unknown(vec![]).is_block());
    }
}
