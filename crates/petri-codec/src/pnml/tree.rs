//! A minimal owned XML element tree over `quick-xml` events.
//!
//! PNML documents are small, so the reader builds the whole tree and the
//! decoder walks it; the encoder builds a tree and serializes it in one go.
//!
//! Text is kept verbatim. Only whitespace between child elements is
//! dropped, so annotations keep their leading and trailing spaces and
//! numeric fields are trimmed by the decoder.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::CodecError;

/// One element with its attributes, child elements and direct text.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct XmlNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: String,
}

impl XmlNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.push((key.to_owned(), value.into()));
        self
    }

    pub fn child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// An element holding only text.
    pub fn leaf(name: &str, value: impl Into<String>) -> Self {
        Self {
            text: value.into(),
            ..Self::new(name)
        }
    }

    /// `<name><text>value</text></name>`
    pub fn text_child(name: &str, value: impl Into<String>) -> Self {
        XmlNode::new(name).child(XmlNode::leaf("text", value))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn first(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of `<name><text>…</text></name>` directly below this node.
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.first(name)
            .and_then(|n| n.first("text"))
            .map(|t| t.text.as_str())
    }

    /// Every element called `name` below this node, in document order.
    /// Matched elements are not searched further.
    pub fn find_all<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlNode>) {
        for c in &self.children {
            if c.name == name {
                out.push(c);
            } else {
                c.find_all(name, out);
            }
        }
    }
}

fn xml_error(detail: impl ToString) -> CodecError {
    CodecError::Xml {
        detail: detail.to_string(),
    }
}

fn open(start: &BytesStart<'_>) -> Result<XmlNode, CodecError> {
    let mut node = XmlNode::new(&String::from_utf8_lossy(start.local_name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        node.attrs.push((key, value));
    }
    Ok(node)
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

/// Parse a document into its root element. Namespace prefixes are dropped.
pub(crate) fn parse(xml: &str) -> Result<XmlNode, CodecError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(open(&e)?),
            Event::Empty(e) => {
                let node = open(&e)?;
                attach(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                let mut node = stack
                    .pop()
                    .ok_or_else(|| xml_error("unbalanced closing tag"))?;
                // Indentation between children.
                if !node.children.is_empty() && node.text.trim().is_empty() {
                    node.text.clear();
                }
                attach(&mut stack, &mut root, node);
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if !stack.is_empty() {
        return Err(xml_error("document ends inside an element"));
    }
    root.ok_or_else(|| CodecError::Missing {
        what: "a root element".into(),
    })
}

fn emit(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), CodecError> {
    let mut start = BytesStart::new(node.name.as_str());
    for (k, v) in &node.attrs {
        start.push_attribute((k.as_str(), v.as_str()));
    }
    if node.children.is_empty() && node.text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    if !node.text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&node.text)))?;
    }
    for c in &node.children {
        emit(writer, c)?;
    }
    writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    Ok(())
}

/// Serialize `root` with an XML declaration and two-space indentation.
pub(crate) fn write(root: &XmlNode) -> Result<String, CodecError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_text_and_attributes() {
        let root = parse(r#"<a x="1"><b><text>hi &amp; bye</text></b><c/></a>"#).unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.get("x"), Some("1"));
        assert_eq!(root.text_of("b"), Some("hi & bye"));
        assert!(root.first("c").is_some());
    }

    #[test]
    fn find_all_walks_through_wrappers() {
        let root = parse("<r><page><p id=\"1\"/><q><p id=\"2\"/></q></page></r>").unwrap();
        let mut found = Vec::new();
        root.find_all("p", &mut found);
        let ids: Vec<_> = found.iter().filter_map(|n| n.get("id")).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn written_tree_parses_back() {
        let tree = XmlNode::new("net")
            .attr("id", "n<1>")
            .child(XmlNode::text_child("name", "a \"quoted\" name"));
        let xml = write(&tree).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert_eq!(parse(&xml).unwrap(), tree);
    }

    #[test]
    fn leaf_text_keeps_surrounding_spaces() {
        let root = parse("<a>\n  <b>\n    <text>  note </text>\n  </b>\n</a>").unwrap();
        assert_eq!(root.text_of("b"), Some("  note "));
        assert!(root.text.is_empty());
        assert!(root.first("b").unwrap().text.is_empty());

        let tree = XmlNode::new("a").child(
            XmlNode::new("tool").child(XmlNode::leaf("text", "  note ")),
        );
        assert_eq!(parse(&write(&tree).unwrap()).unwrap(), tree);
    }

    #[test]
    fn rejects_unclosed_documents() {
        assert!(parse("<a><b></b>").is_err());
        assert!(parse("").is_err());
    }
}
