//! Content-tree to Markdown rendering
//!
//! The renderer is a pure function over the parsed content tree; anything
//! stateful about links and assets is pushed through the two resolver
//! callbacks so the same renderer serves both passes of the export
//! protocol. During pass 1 the link resolver may answer with a pending
//! token; the orchestrator substitutes those tokens once the full
//! URL-to-path map exists.

use crate::content::model::{collapse_whitespace, plain_text, ContentNode};

/// Resolution outcome for one hyperlink target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// In-scope target with a known output path, relative to the source page
    Relative(String),

    /// Out-of-scope target; the absolute URL is kept as-is
    External(String),

    /// In-scope target not yet resolvable; the token stands in for the
    /// destination until pass 2
    Pending(String),
}

impl LinkTarget {
    fn destination(self) -> String {
        match self {
            Self::Relative(path) => path,
            Self::External(url) => url,
            Self::Pending(token) => token,
        }
    }
}

/// Renders a page's content tree to Markdown
///
/// # Arguments
///
/// * `title` - Page title, emitted as a leading `#` heading when present
/// * `nodes` - The parsed content tree
/// * `resolve_link` - Maps an absolute hyperlink URL to its destination
/// * `resolve_asset` - Maps an absolute asset URL to a local relative
///   path, or None to keep the original URL
pub fn render_page(
    title: Option<&str>,
    nodes: &[ContentNode],
    resolve_link: &mut dyn FnMut(&str) -> LinkTarget,
    resolve_asset: &mut dyn FnMut(&str) -> Option<String>,
) -> String {
    let mut renderer = Renderer {
        resolve_link,
        resolve_asset,
    };

    let mut out = String::new();
    if let Some(title) = title {
        let title = collapse_whitespace(title);
        if !title.is_empty() {
            out.push_str("# ");
            out.push_str(&title);
            out.push_str("\n\n");
        }
    }

    renderer.blocks(nodes, &mut out);

    let mut result = out.trim_end().to_string();
    result.push('\n');
    result
}

struct Renderer<'a> {
    resolve_link: &'a mut dyn FnMut(&str) -> LinkTarget,
    resolve_asset: &'a mut dyn FnMut(&str) -> Option<String>,
}

impl Renderer<'_> {
    /// Renders a node sequence, grouping consecutive inline nodes into
    /// implicit paragraphs
    fn blocks(&mut self, nodes: &[ContentNode], out: &mut String) {
        let mut i = 0;
        while i < nodes.len() {
            if nodes[i].is_block() {
                self.block(&nodes[i], out);
                i += 1;
            } else {
                let start = i;
                while i < nodes.len() && !nodes[i].is_block() {
                    i += 1;
                }
                let text = self.inline(&nodes[start..i]);
                if !text.is_empty() {
                    out.push_str(&text);
                    out.push_str("\n\n");
                }
            }
        }
    }

    fn block(&mut self, node: &ContentNode, out: &mut String) {
        match node {
            ContentNode::Heading { level, children } => {
                let text = self.inline(children);
                if !text.is_empty() {
                    for _ in 0..*level {
                        out.push('#');
                    }
                    out.push(' ');
                    out.push_str(&text);
                    out.push_str("\n\n");
                }
            }
            ContentNode::Paragraph(children) => {
                let text = self.inline(children);
                if !text.is_empty() {
                    out.push_str(&text);
                    out.push_str("\n\n");
                }
            }
            ContentNode::CodeBlock { language, code } => {
                out.push_str("```");
                if let Some(language) = language {
                    out.push_str(language);
                }
                out.push('\n');
                out.push_str(code);
                out.push_str("\n```\n\n");
            }
            // Diagram source goes into the fence untouched
            ContentNode::DiagramBlock { source } => {
                out.push_str("```mermaid\n");
                out.push_str(source);
                out.push_str("\n```\n\n");
            }
            ContentNode::List { ordered, items } => {
                self.list(*ordered, items, 0, out);
                out.push('\n');
            }
            ContentNode::Table { headers, rows } => {
                self.table(headers, rows, out);
                out.push('\n');
            }
            ContentNode::BlockQuote(children) => {
                let mut inner = String::new();
                self.blocks(children, &mut inner);
                for line in inner.trim_end().lines() {
                    if line.is_empty() {
                        out.push_str(">\n");
                    } else {
                        out.push_str("> ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                out.push('\n');
            }
            // Inline variants never reach here
            _ => {
                let text = self.inline(std::slice::from_ref(node));
                if !text.is_empty() {
                    out.push_str(&text);
                    out.push_str("\n\n");
                }
            }
        }
    }

    /// Renders inline nodes to a single whitespace-collapsed line
    fn inline(&mut self, nodes: &[ContentNode]) -> String {
        let mut raw = String::new();
        for node in nodes {
            match node {
                ContentNode::Text(t) => raw.push_str(t),
                ContentNode::InlineCode(code) => {
                    raw.push('`');
                    raw.push_str(code);
                    raw.push('`');
                }
                ContentNode::Emphasis(children) => {
                    let inner = self.inline(children);
                    if !inner.is_empty() {
                        raw.push('*');
                        raw.push_str(&inner);
                        raw.push('*');
                    }
                }
                ContentNode::Strong(children) => {
                    let inner = self.inline(children);
                    if !inner.is_empty() {
                        raw.push_str("**");
                        raw.push_str(&inner);
                        raw.push_str("**");
                    }
                }
                ContentNode::Link { href, children } => {
                    let mut text = self.inline(children);
                    if text.is_empty() {
                        text = href.clone();
                    }
                    let destination = (self.resolve_link)(href).destination();
                    raw.push('[');
                    raw.push_str(&text);
                    raw.push_str("](");
                    raw.push_str(&destination);
                    raw.push(')');
                }
                ContentNode::Image { src, alt } => {
                    let destination = (self.resolve_asset)(src).unwrap_or_else(|| src.clone());
                    raw.push_str("![");
                    raw.push_str(alt);
                    raw.push_str("](");
                    raw.push_str(&destination);
                    raw.push(')');
                }
                ContentNode::Unknown(children) => raw.push_str(&plain_text(children)),
                // Block nodes nested in an inline context degrade to text
                other => raw.push_str(&plain_text(std::slice::from_ref(other))),
            }
        }
        collapse_whitespace(&raw)
    }

    fn list(&mut self, ordered: bool, items: &[Vec<ContentNode>], indent: usize, out: &mut String) {
        for (index, item) in items.iter().enumerate() {
            let marker = if ordered {
                format!("{}. ", index + 1)
            } else {
                "- ".to_string()
            };

            // Contiguous inline prefix becomes the marker line
            let split = item
                .iter()
                .position(|n| n.is_block())
                .unwrap_or(item.len());
            let head = self.inline(&item[..split]);

            for _ in 0..indent {
                out.push(' ');
            }
            out.push_str(&marker);
            out.push_str(&head);
            out.push('\n');

            for node in &item[split..] {
                match node {
                    ContentNode::List {
                        ordered: nested_ordered,
                        items: nested_items,
                    } => {
                        self.list(*nested_ordered, nested_items, indent + marker.len(), out);
                    }
                    block => {
                        let mut rendered = String::new();
                        self.block(block, &mut rendered);
                        for line in rendered.trim_end().lines() {
                            for _ in 0..indent + marker.len() {
                                out.push(' ');
                            }
                            out.push_str(line);
                            out.push('\n');
                        }
                    }
                }
            }
        }
    }

    fn table(&mut self, headers: &[String], rows: &[Vec<String>], out: &mut String) {
        let columns = headers
            .len()
            .max(rows.iter().map(Vec::len).max().unwrap_or(0));
        if columns == 0 {
            return;
        }

        let header_cells: Vec<String> = (0..columns)
            .map(|i| headers.get(i).map(|c| escape_cell(c)).unwrap_or_default())
            .collect();
        out.push_str("| ");
        out.push_str(&header_cells.join(" | "));
        out.push_str(" |\n");

        out.push('|');
        for _ in 0..columns {
            out.push_str(" --- |");
        }
        out.push('\n');

        for row in rows {
            let cells: Vec<String> = (0..columns)
                .map(|i| row.get(i).map(|c| escape_cell(c)).unwrap_or_default())
                .collect();
            out.push_str("| ");
            out.push_str(&cells.join(" | "));
            out.push_str(" |\n");
        }
    }
}

/// Escapes pipe characters so cell content cannot break the table row
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}
