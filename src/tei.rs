//! TEI fragment assembly
//!
//! Builds the two output trees: the `<person>` authority-file entry and the
//! inline `<persName ref="#...">` annotation tag. Trees are constructed
//! once from a resolved record and serialized pretty-printed for manual
//! copy-paste into edition sources. No schema validation is performed;
//! missing names are represented by a placeholder.

use quick_xml::escape::escape;

use crate::naming;
use crate::services::record_resolver::ResolvedRecord;

/// Placeholder text when no name could be resolved
pub const UNKNOWN_NAME: &str = "Unknown Name";

/// Authority-number type marker on the `<idno>` child
const IDNO_TYPE: &str = "VIAF";

/// A small immutable XML element tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn add_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Value of the first attribute named `key`, if present.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize with two-space indentation, one element per line, text
    /// content kept inline. Text and attribute values are XML-escaped.
    pub fn to_pretty_xml(&self) -> String {
        let mut out = String::new();
        self.write_element(&mut out, 0);
        out
    }

    fn write_element(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        out.push_str(&pad);
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text.as_str()));
        }
        if !self.children.is_empty() {
            out.push('\n');
            for child in &self.children {
                child.write_element(out, depth + 1);
            }
            out.push_str(&pad);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push_str(">\n");
    }
}

/// Build the authority-file entry for a resolved record:
///
/// ```xml
/// <person xml:id="pers-...">
///   <persName>...</persName>
///   <birth>...</birth>
///   <death>...</death>
///   <idno type="VIAF">...</idno>
///   <note type="warning">...</note>
/// </person>
/// ```
///
/// `<birth>`, `<death>` and `<note>` appear only when their value exists.
pub fn person_entry(viaf_id: &str, record: &ResolvedRecord) -> XmlElement {
    let xml_id = naming::xml_id(record.name.as_deref().unwrap_or(""), viaf_id);
    let mut person = XmlElement::new("person").with_attribute("xml:id", &xml_id);

    person.add_child(
        XmlElement::new("persName").with_text(record.name.as_deref().unwrap_or(UNKNOWN_NAME)),
    );

    if let Some(birth) = record.birth.as_deref().filter(|v| !v.is_empty()) {
        person.add_child(XmlElement::new("birth").with_text(birth));
    }
    if let Some(death) = record.death.as_deref().filter(|v| !v.is_empty()) {
        person.add_child(XmlElement::new("death").with_text(death));
    }

    person.add_child(
        XmlElement::new("idno")
            .with_attribute("type", IDNO_TYPE)
            .with_text(viaf_id),
    );

    if let Some(warning) = record.warning.as_deref() {
        person.add_child(
            XmlElement::new("note")
                .with_attribute("type", "warning")
                .with_text(warning),
        );
    }

    person
}

/// Build the inline annotation tag pointing at an authority entry:
/// `<persName ref="#pers-...">Name</persName>`.
pub fn annotation_tag(xml_id: &str, name: Option<&str>) -> XmlElement {
    XmlElement::new("persName")
        .with_attribute("ref", &format!("#{xml_id}"))
        .with_text(name.unwrap_or(UNKNOWN_NAME))
}
