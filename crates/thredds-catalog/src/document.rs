//! Generic tag/attribute tree for THREDDS catalog documents.
//!
//! The catalog schema is not modelled: the document is parsed into plain
//! elements and queried structurally (`find_all("dataset")`, `attr("urlPath")`).

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use hycom_common::DatasetPathFragment;

/// Catalog document could not be parsed.
#[derive(Debug, Error)]
#[error("XML parsing error at position {position}: {message}")]
pub struct DocumentError {
    pub position: usize,
    pub message: String,
}

/// A node of the parsed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes (in document order) and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Qualified name as written, e.g. `dataset` or `thredds:dataset`
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        local(&self.name)
    }

    /// Attribute value by name; a prefixed attribute also matches its local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .or_else(|| self.attributes.iter().find(|(key, _)| local(key) == name))
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// This element and every element below it, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Every element (this one included) whose local name is `name`, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants()
            .filter(move |element| element.local_name() == name)
    }

    /// Concatenated text of this element's direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

fn local(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Pre-order traversal over elements.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        let children: Vec<&Element> = element.child_elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(element)
    }
}

/// A parsed catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogDocument {
    root: Element,
}

impl CatalogDocument {
    /// Parse catalog text. Mismatched, unclosed or multiple root elements are errors.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = reader.buffer_position();
            let fail = |message: String| DocumentError { position, message };

            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(element_from(&e).map_err(fail)?),
                Ok(Event::Empty(e)) => {
                    let element = element_from(&e).map_err(fail)?;
                    attach(&mut stack, &mut root, element).map_err(fail)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| fail("closing tag without an open element".to_string()))?;
                    attach(&mut stack, &mut root, element).map_err(fail)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| fail(e.to_string()))?;
                    push_text(&mut stack, &text);
                }
                Ok(Event::CData(c)) => {
                    let bytes = c.into_inner();
                    push_text(&mut stack, &String::from_utf8_lossy(&bytes));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(fail(e.to_string())),
                // Declarations, comments, processing instructions, doctype
                Ok(_) => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(DocumentError {
                position: reader.buffer_position(),
                message: format!("unclosed element <{}>", open.name),
            });
        }

        let root = root.ok_or_else(|| DocumentError {
            position: reader.buffer_position(),
            message: "document has no root element".to_string(),
        })?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.root.find_all(name)
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(format!("second root element <{}>", element.name));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    // Text outside the root element is ignored
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Text(text.to_string()));
    }
}

/// `urlPath` of every `dataset` element, in document order.
///
/// Entries without the attribute are skipped.
pub fn extract_fragments(document: &CatalogDocument) -> Vec<DatasetPathFragment> {
    document
        .find_all("dataset")
        .filter_map(|dataset| dataset.attr("urlPath"))
        .map(|path| DatasetPathFragment(path.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<catalog xmlns="http://www.unidata.ucar.edu/namespaces/thredds/InvCatalog/v1.0" name="2015" version="1.0.1">
  <service name="all" serviceType="Compound" base="">
    <service name="odap" serviceType="OPENDAP" base="/thredds/dodsC/" />
  </service>
  <dataset name="2015" ID="datasets/GLBv0.08/expt_53.X/data/2015">
    <metadata inherited="true"><serviceName>all</serviceName></metadata>
    <dataset name="a.nc" urlPath="GLBv0.08/expt_53.X/data/2015/hycom_GLBv0.08_539_2015010112_t000.nc">
      <dataSize units="Gbytes">2.1</dataSize>
    </dataset>
    <dataset name="b.nc" urlPath="GLBv0.08/expt_53.X/data/2015/hycom_GLBv0.08_539_2015010112_t003.nc" />
  </dataset>
</catalog>"#;

    #[test]
    fn test_extract_fragments_skips_entries_without_path() {
        let doc = CatalogDocument::parse(CATALOG).unwrap();
        let fragments = extract_fragments(&doc);
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].as_str().ends_with("2015010112_t000.nc"));
        assert!(fragments[1].as_str().ends_with("2015010112_t003.nc"));
    }

    #[test]
    fn test_find_all_document_order() {
        let doc = CatalogDocument::parse(CATALOG).unwrap();
        let names: Vec<&str> = doc
            .find_all("dataset")
            .filter_map(|d| d.attr("name"))
            .collect();
        assert_eq!(names, vec!["2015", "a.nc", "b.nc"]);
    }

    #[test]
    fn test_element_text_and_prefixed_names() {
        let doc = CatalogDocument::parse(
            r#"<t:catalog xmlns:t="urn:x" xmlns:xlink="urn:y"><t:dataset xlink:href="x">hello &amp; bye</t:dataset></t:catalog>"#,
        )
        .unwrap();
        let dataset = doc.find_all("dataset").next().unwrap();
        assert_eq!(dataset.local_name(), "dataset");
        assert_eq!(dataset.attr("href"), Some("x"));
        assert_eq!(dataset.text(), "hello & bye");
    }

    #[test]
    fn test_empty_catalog_has_no_fragments() {
        let doc = CatalogDocument::parse("<catalog/>").unwrap();
        assert!(extract_fragments(&doc).is_empty());
    }

    #[test]
    fn test_mismatched_tags_fail() {
        assert!(CatalogDocument::parse("<catalog><dataset></catalog>").is_err());
    }

    #[test]
    fn test_unclosed_root_fails() {
        let err = CatalogDocument::parse("<catalog><dataset urlPath=\"x\"/>").unwrap_err();
        assert!(err.message.contains("unclosed"));
    }

    #[test]
    fn test_not_xml_fails() {
        assert!(CatalogDocument::parse("404 Not Found").is_err());
    }
}
