//! Markup parser - builds a [`Document`] from XML text
//!
//! This handles:
//! - Element, attribute, text and CDATA events from quick-xml
//! - Building the arena tree with parent/child links
//! - Rejecting markup that does not form a single-rooted tree
//!
//! Comments, processing instructions, the XML declaration and doctype are
//! not represented in the tree and are dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::types::NodeId;

/// Configuration for the parser
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Drop text that is whitespace only, so indentation between elements
    /// does not end up in the tree. Text with any other character is kept
    /// byte for byte, surrounding whitespace included.
    pub trim_text: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { trim_text: true }
    }
}

/// XML to [`Document`] parser
pub struct DomParser {
    config: ParserConfig,
}

impl DomParser {
    /// Create new parser with default config
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create parser with custom config
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse UTF-8 encoded bytes
    pub fn parse(&self, bytes: &[u8]) -> Result<Document> {
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| DomError::Parse(format!("input is not valid UTF-8: {}", e)))?;
        self.parse_str(xml)
    }

    /// Parse markup into a fresh document
    pub fn parse_str(&self, xml: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut document = Document::new();
        // Open elements, innermost last
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                DomError::Parse(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;

            match event {
                Event::Start(start) => {
                    let node_id = self.open_element(&mut document, &stack, &start)?;
                    stack.push(node_id);
                }
                Event::Empty(start) => {
                    self.open_element(&mut document, &stack, &start)?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| DomError::Parse(format!("bad text: {}", e)))?;
                    self.push_text(&mut document, &stack, &text)?;
                }
                Event::CData(cdata) => {
                    let raw = cdata.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    self.push_text(&mut document, &stack, &text)?;
                }
                Event::Eof => break,
                _ => {
                    // Declarations, comments, processing instructions, doctype
                }
            }
        }

        if !stack.is_empty() {
            return Err(DomError::Parse("unexpected end of input: unclosed element".to_string()));
        }
        if document.root_id().is_none() {
            return Err(DomError::Parse("no root element".to_string()));
        }

        Ok(document)
    }

    /// Create the element for a start tag and hook it into the tree
    fn open_element(
        &self,
        document: &mut Document,
        stack: &[NodeId],
        start: &BytesStart<'_>,
    ) -> Result<NodeId> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let node_id = document.create_element(&tag);

        for attr in start.attributes() {
            let attr = attr.map_err(|e| DomError::Parse(format!("bad attribute in <{}>: {}", tag, e)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| DomError::Parse(format!("bad attribute value in <{}>: {}", tag, e)))?
                .into_owned();
            document.get_mut(node_id)?.attributes.push((key, value));
        }

        match stack.last() {
            Some(&parent_id) => document.append_child(parent_id, node_id)?,
            None if document.root_id().is_none() => document.set_root(node_id)?,
            None => {
                return Err(DomError::Parse(format!(
                    "second root element <{}>",
                    tag
                )))
            }
        }

        Ok(node_id)
    }

    fn push_text(&self, document: &mut Document, stack: &[NodeId], text: &str) -> Result<()> {
        let blank = text.trim().is_empty();
        match stack.last() {
            Some(_) if blank && self.config.trim_text => Ok(()),
            Some(&node_id) => document.append_text(node_id, text),
            None if blank => Ok(()),
            None => Err(DomError::Parse(format!(
                "text outside of root element: {:?}",
                text
            ))),
        }
    }
}

impl Default for DomParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let xml = r#"<?xml version="1.0"?>
            <Document>
                <form id="75-2">
                    <periodId>12</periodId>
                    <note/>
                </form>
            </Document>"#;

        let doc = DomParser::new().parse_str(xml).unwrap();
        let root = doc.root().unwrap();

        assert_eq!(root.tag_name, "Document");
        // Four elements plus the text node under periodId
        assert_eq!(doc.len(), 5);

        let form = doc.first_with_tag("form").unwrap();
        assert_eq!(doc.get(form).unwrap().attr("id"), Some("75-2"));
        assert_eq!(doc.children(form).unwrap().len(), 2);
        assert!(doc.children(form).unwrap().iter().all(|&id| doc.get(id).unwrap().is_element()));

        let period = doc.first_with_tag("periodId").unwrap();
        assert_eq!(doc.text(period).unwrap(), "12");
        assert_eq!(doc.parent(period).unwrap(), Some(form));
    }

    #[test]
    fn test_parse_entities_and_cdata() {
        let doc = Document::parse("<a><b>1 &lt; 2</b><c><![CDATA[<raw>]]></c></a>").unwrap();

        let b = doc.first_with_tag("b").unwrap();
        let c = doc.first_with_tag("c").unwrap();
        assert_eq!(doc.text(b).unwrap(), "1 < 2");
        assert_eq!(doc.text(c).unwrap(), "<raw>");
    }

    #[test]
    fn test_parse_keeps_surrounding_whitespace_of_text() {
        let doc = Document::parse("<r><id> 42 </id></r>").unwrap();
        let id = doc.first_with_tag("id").unwrap();

        assert_eq!(doc.text(id).unwrap(), " 42 ");
    }

    #[test]
    fn test_parse_keeps_inner_spaces_of_mixed_content() {
        let doc = Document::parse("<a>hello <b/> world</a>").unwrap();
        let root = doc.root_id().unwrap();

        assert_eq!(doc.children(root).unwrap().len(), 3);
        assert_eq!(doc.text_content(root).unwrap(), "hello  world");
    }

    #[test]
    fn test_parse_keeps_mixed_content_order() {
        let doc = Document::parse("<a>x<b>1</b>y</a>").unwrap();
        let root = doc.root_id().unwrap();
        let b = doc.first_with_tag("b").unwrap();

        let children = doc.children(root).unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[1], b);
        assert_eq!(doc.text_content(root).unwrap(), "x1y");
    }

    #[test]
    fn test_parse_merges_text_and_cdata() {
        let doc = Document::parse("<a>1<![CDATA[<2>]]>3</a>").unwrap();
        let root = doc.root_id().unwrap();

        assert_eq!(doc.children(root).unwrap().len(), 1);
        assert_eq!(doc.text(root).unwrap(), "1<2>3");
    }

    #[test]
    fn test_parse_keeps_blank_text_when_configured() {
        let parser = DomParser::with_config(ParserConfig { trim_text: false });
        let doc = parser.parse_str("<a> <b/></a>").unwrap();
        let root = doc.root_id().unwrap();

        assert_eq!(doc.children(root).unwrap().len(), 2);
        assert_eq!(doc.text(root).unwrap(), " ");

        let trimmed = Document::parse("<a> <b/></a>").unwrap();
        assert_eq!(trimmed.children(trimmed.root_id().unwrap()).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let parser = DomParser::new();

        assert!(matches!(parser.parse_str("<a><b></a>"), Err(DomError::Parse(_))));
        assert!(matches!(parser.parse_str("<a>"), Err(DomError::Parse(_))));
        assert!(matches!(parser.parse_str(""), Err(DomError::Parse(_))));
        assert!(matches!(parser.parse_str("<a/><b/>"), Err(DomError::Parse(_))));
        assert!(matches!(parser.parse(&[0xff, 0xfe]), Err(DomError::Parse(_))));
    }
}
