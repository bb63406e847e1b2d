//! Document serializer - writes the tree back out as XML
//!
//! Only nodes reachable from the root are written. Text nodes are written
//! in place among their sibling elements.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::types::NodeId;

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` first
    pub xml_declaration: bool,
    /// Spaces per nesting level; 0 writes everything on one line
    pub indent: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            indent: 2,
        }
    }
}

impl SerializerConfig {
    /// Single line, no declaration. Handy for comparing output in tests.
    pub fn compact() -> Self {
        Self {
            xml_declaration: false,
            indent: 0,
        }
    }
}

/// Document Tree Serializer
pub struct DomSerializer {
    config: SerializerConfig,
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize the document to a string
    pub fn serialize(&self, document: &Document) -> Result<String> {
        let bytes = self.to_bytes(document)?;
        String::from_utf8(bytes).map_err(|e| DomError::Serialization(e.to_string()))
    }

    /// Serialize the document to UTF-8 bytes
    pub fn to_bytes(&self, document: &Document) -> Result<Vec<u8>> {
        let root_id = document.root_id().ok_or(DomError::NoRoot)?;

        let mut writer = if self.config.indent > 0 {
            Writer::new_with_indent(Vec::with_capacity(4096), b' ', self.config.indent)
        } else {
            Writer::new(Vec::with_capacity(4096))
        };

        if self.config.xml_declaration {
            write(
                &mut writer,
                Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
            )?;
        }

        self.write_node(document, root_id, &mut writer)?;

        Ok(writer.into_inner())
    }

    /// Serialize a single node recursively
    fn write_node(
        &self,
        document: &Document,
        node_id: NodeId,
        writer: &mut Writer<Vec<u8>>,
    ) -> Result<()> {
        let node = document.get(node_id)?;
        if node.is_text() {
            return write(writer, Event::Text(BytesText::new(&node.node_value)));
        }

        let mut start = BytesStart::new(node.tag_name.as_str());
        for (key, value) in &node.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if node.children_ids.is_empty() {
            return write(writer, Event::Empty(start));
        }

        write(writer, Event::Start(start))?;
        for &child_id in &node.children_ids {
            self.write_node(document, child_id, writer)?;
        }
        write(writer, Event::End(BytesEnd::new(node.tag_name.as_str())))
    }
}

impl Default for DomSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| DomError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_compact() {
        let doc = Document::parse(r#"<a k="v &amp; w"><b>1 &lt; 2</b><c/></a>"#).unwrap();

        let output = DomSerializer::with_config(SerializerConfig::compact())
            .serialize(&doc)
            .unwrap();

        assert_eq!(output, r#"<a k="v &amp; w"><b>1 &lt; 2</b><c/></a>"#);
    }

    #[test]
    fn test_serialize_mixed_content_in_order() {
        let xml = "<a>x<b>1</b>y</a>";
        let doc = Document::parse(xml).unwrap();

        let compact = DomSerializer::with_config(SerializerConfig::compact())
            .serialize(&doc)
            .unwrap();
        assert_eq!(compact, xml);

        let indented = DomSerializer::with_config(SerializerConfig {
            xml_declaration: false,
            indent: 2,
        })
        .serialize(&doc)
        .unwrap();
        assert_eq!(Document::parse(&indented).unwrap().text_content(0).unwrap(), "x1y");
    }

    #[test]
    fn test_serialize_keeps_text_whitespace() {
        let xml = "<a>hello <b/> world<id> 42 </id></a>";
        let doc = Document::parse(xml).unwrap();

        let output = DomSerializer::with_config(SerializerConfig::compact())
            .serialize(&doc)
            .unwrap();

        assert_eq!(output, xml);
    }

    #[test]
    fn test_serialize_skips_detached_nodes() {
        let mut doc = Document::parse("<a><b/><c/></a>").unwrap();
        let b = doc.first_with_tag("b").unwrap();
        doc.detach(b).unwrap();

        let output = DomSerializer::with_config(SerializerConfig::compact())
            .serialize(&doc)
            .unwrap();

        assert_eq!(output, "<a><c/></a>");
    }

    #[test]
    fn test_serialize_with_declaration_and_indent() {
        let doc = Document::parse("<a><b>1</b></a>").unwrap();

        let output = DomSerializer::new().serialize(&doc).unwrap();

        assert!(output.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(output.contains("\n  <b>1</b>"), "Got: {}", output);
    }

    #[test]
    fn test_serialize_without_root() {
        let doc = Document::new();
        assert!(matches!(
            DomSerializer::new().serialize(&doc),
            Err(DomError::NoRoot)
        ));
    }
}
