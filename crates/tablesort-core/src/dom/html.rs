use super::document::{Document, NodeId, NodeKind};
use super::HostTree;
use crate::error::TableSortError;
use quick_xml::escape::{escape, resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text is written back without escaping.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

impl Document {
    /// Read an HTML or XHTML document.
    ///
    /// The reader is lenient: unmatched end tags are skipped, void elements
    /// need no closing slash, HTML5 named entities are decoded, and an
    /// unclosed `td`/`th`/`tr` is closed by the next sibling cell or row.
    pub fn parse_html(html: &str) -> Result<Document, TableSortError> {
        let mut doc = Document::new();
        let mut stack: Vec<NodeId> = vec![doc.root()];

        let mut offset = 0;
        while let Some(resume) = parse_markup(&mut doc, &mut stack, html, offset)? {
            offset = resume;
        }

        log::trace!("[html] parsed {} byte(s)", html.len());
        Ok(doc)
    }

    /// Write the document back as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.child_nodes(self.root()) {
            self.write_node(*child, false, &mut out);
        }
        out
    }

    /// Write a single node and its subtree.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, false, &mut out);
        out
    }

    fn write_node(&self, node: NodeId, raw_text: bool, out: &mut String) {
        match self.kind(node) {
            NodeKind::Document => {
                for child in self.child_nodes(node) {
                    self.write_node(*child, false, out);
                }
            }
            NodeKind::Text(text) if raw_text => out.push_str(text),
            NodeKind::Text(text) => out.push_str(&escape(text.as_str())),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Doctype(text) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(text);
                out.push('>');
            }
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value.as_str()));
                    out.push('"');
                }

                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    out.push_str(" />");
                    return;
                }

                out.push('>');
                let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
                for child in self.child_nodes(node) {
                    self.write_node(*child, raw, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// Parse markup from `offset` until the end of input or until the start tag
/// of a `script`/`style` element. In the latter case the element's raw text
/// is stored as one text node and the offset after its end tag is returned.
fn parse_markup(
    doc: &mut Document,
    stack: &mut Vec<NodeId>,
    html: &str,
    offset: usize,
) -> Result<Option<usize>, TableSortError> {
    let mut reader = Reader::from_str(&html[offset..]);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    loop {
        let event = reader.read_event().map_err(|e| TableSortError::Html {
            position: offset as u64 + reader.buffer_position() as u64,
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(e) => {
                let element = open_element(doc, stack, &e)?;
                let tag = doc.tag_name(element).to_string();
                if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                    let text_start = offset + reader.buffer_position() as usize;
                    let (text_end, resume) = raw_text_end(html, text_start, &tag);
                    if text_end > text_start {
                        let text = doc.create_text(&html[text_start..text_end]);
                        doc.append_child(element, text);
                    }
                    return Ok(Some(resume));
                }
                if !VOID_ELEMENTS.contains(&tag.as_str()) {
                    stack.push(element);
                }
            }
            Event::Empty(e) => {
                open_element(doc, stack, &e)?;
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                // Pop up to the matching open element; ignore strays.
                if let Some(depth) = stack.iter().rposition(|n| doc.tag_name(*n) == name) {
                    if depth > 0 {
                        stack.truncate(depth);
                    }
                }
            }
            Event::Text(e) => {
                let raw = String::from_utf8_lossy(&e);
                let text = decode_entities(&raw);
                append_text(doc, stack, &text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                append_text(doc, stack, &text);
            }
            Event::Comment(e) => {
                let comment = doc.create_comment(&String::from_utf8_lossy(&e));
                attach(doc, stack, comment);
            }
            Event::DocType(e) => {
                let doctype = doc.create_doctype(String::from_utf8_lossy(&e).trim());
                attach(doc, stack, doctype);
            }
            Event::Eof => return Ok(None),
            // XML declarations and processing instructions are dropped.
            _ => {}
        }
    }
}

/// End of a raw text element's content starting at `from`, and the offset
/// just past its end tag. An unterminated element runs to the end of input.
fn raw_text_end(html: &str, from: usize, tag: &str) -> (usize, usize) {
    let closing = format!("</{tag}");
    let Some(found) = html[from..].to_ascii_lowercase().find(&closing) else {
        return (html.len(), html.len());
    };

    let text_end = from + found;
    let after_name = text_end + closing.len();
    let resume = html[after_name..]
        .find('>')
        .map(|gt| after_name + gt + 1)
        .unwrap_or(html.len());
    (text_end, resume)
}

fn open_element(
    doc: &mut Document,
    stack: &mut Vec<NodeId>,
    start: &BytesStart<'_>,
) -> Result<NodeId, TableSortError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
    close_implied(doc, stack, &tag);

    let mut attributes = Vec::new();
    for attr in start.html_attributes() {
        let attr = attr.map_err(|e| TableSortError::Html {
            position: 0,
            reason: format!("bad attribute on <{tag}>: {e}"),
        })?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = decode_entities(&String::from_utf8_lossy(&attr.value));
        attributes.push((name, value));
    }

    let element = doc.create_element_owned(&tag, attributes);
    attach(doc, stack, element);
    Ok(element)
}

/// Close cells and rows left open by HTML's optional end tags.
fn close_implied(doc: &Document, stack: &mut Vec<NodeId>, tag: &str) {
    let closes: &[&str] = match tag {
        "td" | "th" => &["td", "th"],
        "tr" => &["td", "th", "tr"],
        "tbody" | "thead" | "tfoot" => &["td", "th", "tr", "tbody", "thead", "tfoot"],
        _ => return,
    };

    while stack.len() > 1 {
        let Some(top) = stack.last() else { break };
        if !closes.contains(&doc.tag_name(*top)) {
            break;
        }
        stack.pop();
    }
}

fn attach(doc: &mut Document, stack: &[NodeId], node: NodeId) {
    let parent = stack.last().copied().unwrap_or_else(|| doc.root());
    doc.append_child(parent, node);
}

fn append_text(doc: &mut Document, stack: &[NodeId], text: &str) {
    if text.is_empty() {
        return;
    }
    let node = doc.create_text(text);
    attach(doc, stack, node);
}

fn decode_entities(raw: &str) -> String {
    unescape_with(raw, resolve_html5_entity)
        .map(|text| text.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
