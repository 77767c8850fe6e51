//! Minimal RDF/XML triple extraction
//!
//! Streaming parse of the striped RDF/XML syntax that VIAF serves: node
//! elements (subjects) alternate with predicate elements, a predicate's
//! object being either an `rdf:resource` reference, a nested node element,
//! or the element's text content as a literal. Typed node elements yield an
//! `rdf:type` triple; literal property attributes on node elements are also
//! extracted.
//!
//! Triples are kept in document order. The record-resolution policy depends
//! on that order, so it must not be disturbed.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use thiserror::Error;

use crate::vocab::RDF_NS;

/// XML namespace (reserved `xml:` prefix)
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// RDF/XML parse errors
#[derive(Debug, Error)]
pub enum RdfError {
    /// XML syntax error reported by the underlying reader
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// Structurally broken input (bad attribute, truncated document, ...)
    #[error("malformed RDF/XML: {0}")]
    Malformed(String),

    /// Input contained no XML element at all
    #[error("no XML element found in response")]
    Empty,
}

/// Object position of a triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RdfObject {
    /// IRI reference (or blank node label)
    Resource(String),
    /// Literal value
    Literal(String),
}

impl RdfObject {
    /// The object's string form: literal value or resource IRI.
    pub fn as_str(&self) -> &str {
        match self {
            RdfObject::Resource(iri) => iri,
            RdfObject::Literal(value) => value,
        }
    }
}

/// A single (subject, predicate, object) statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdfTriple {
    pub subject: String,
    pub predicate: String,
    pub object: RdfObject,
}

/// Parsed triple store, in document order
#[derive(Debug, Default)]
pub struct RdfGraph {
    triples: Vec<RdfTriple>,
}

/// Parser stack frame
enum Frame {
    /// The `rdf:RDF` document element
    Root,
    /// A node element; carries the subject it denotes
    Node { subject: String },
    /// A predicate element attached to `subject`
    Predicate {
        subject: String,
        predicate: String,
        text: String,
        has_object: bool,
    },
}

impl RdfGraph {
    /// Parse RDF/XML bytes into a triple store.
    ///
    /// Input that is not well-formed XML, or that contains no element at
    /// all, is rejected; callers treat that as a fatal condition.
    pub fn parse(bytes: &[u8]) -> Result<Self, RdfError> {
        let mut reader = NsReader::from_reader(bytes);
        let config = reader.config_mut();
        config.trim_text_start = true;
        config.trim_text_end = true;
        config.expand_empty_elements = true;

        let mut graph = RdfGraph::default();
        let mut stack: Vec<Frame> = Vec::new();
        let mut blank_counter: usize = 0;
        let mut saw_element = false;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    saw_element = true;
                    graph.handle_start(&reader, &start, &mut stack, &mut blank_counter)?;
                }
                Event::Text(text) => {
                    if let Some(Frame::Predicate {
                        text: literal,
                        has_object: false,
                        ..
                    }) = stack.last_mut()
                    {
                        let unescaped = text
                            .unescape()
                            .map_err(|e| RdfError::Malformed(format!("bad text content: {e}")))?;
                        literal.push_str(&unescaped);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(Frame::Predicate {
                        text: literal,
                        has_object: false,
                        ..
                    }) = stack.last_mut()
                    {
                        literal.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                    }
                }
                Event::End(_) => {
                    if let Some(Frame::Predicate {
                        subject,
                        predicate,
                        text,
                        has_object: false,
                    }) = stack.pop()
                    {
                        if !text.is_empty() {
                            graph.triples.push(RdfTriple {
                                subject,
                                predicate,
                                object: RdfObject::Literal(text),
                            });
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_element {
            return Err(RdfError::Empty);
        }
        if !stack.is_empty() {
            return Err(RdfError::Malformed(
                "unexpected end of input inside an open element".into(),
            ));
        }

        Ok(graph)
    }

    fn handle_start(
        &mut self,
        reader: &NsReader<&[u8]>,
        start: &BytesStart<'_>,
        stack: &mut Vec<Frame>,
        blank_counter: &mut usize,
    ) -> Result<(), RdfError> {
        let name = expanded_name(reader, start);

        // Predicate element position: directly under a node element.
        let enclosing_subject = match stack.last() {
            Some(Frame::Node { subject }) => Some(subject.clone()),
            _ => None,
        };
        if let Some(subject) = enclosing_subject {
            return self.start_predicate(reader, start, &name, subject, stack);
        }

        if stack.is_empty() && name.strip_prefix(RDF_NS) == Some("RDF") {
            stack.push(Frame::Root);
            return Ok(());
        }

        // Node element position: document root, under rdf:RDF, or nested
        // under a predicate element.
        self.start_node(reader, start, &name, stack, blank_counter)
    }

    /// Open a node element: mint its subject, link it to an enclosing
    /// predicate, and extract type and property-attribute triples.
    fn start_node(
        &mut self,
        reader: &NsReader<&[u8]>,
        start: &BytesStart<'_>,
        name: &str,
        stack: &mut Vec<Frame>,
        blank_counter: &mut usize,
    ) -> Result<(), RdfError> {
        let mut subject: Option<String> = None;
        let mut property_attrs: Vec<(String, String)> = Vec::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| RdfError::Malformed(format!("bad attribute: {e}")))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let resolved = resolve_attribute(reader, &attr)?;
            if let Some(local) = resolved.name.strip_prefix(RDF_NS) {
                match local {
                    "about" => subject = Some(resolved.value),
                    "nodeID" => subject = Some(format!("_:{}", resolved.value)),
                    _ => {}
                }
            } else if resolved.bound && !resolved.name.starts_with(XML_NS) {
                // Literal property attribute
                property_attrs.push((resolved.name, resolved.value));
            }
        }

        let subject = subject.unwrap_or_else(|| {
            *blank_counter += 1;
            format!("_:b{blank_counter}")
        });

        // Link the new node to the predicate element that contains it.
        if let Some(Frame::Predicate {
            subject: parent_subject,
            predicate,
            has_object,
            ..
        }) = stack.last_mut()
        {
            self.triples.push(RdfTriple {
                subject: parent_subject.clone(),
                predicate: predicate.clone(),
                object: RdfObject::Resource(subject.clone()),
            });
            *has_object = true;
        }

        // Typed node elements imply an rdf:type statement.
        if name.strip_prefix(RDF_NS) != Some("Description") {
            self.triples.push(RdfTriple {
                subject: subject.clone(),
                predicate: format!("{RDF_NS}type"),
                object: RdfObject::Resource(name.to_string()),
            });
        }

        for (predicate, value) in property_attrs {
            self.triples.push(RdfTriple {
                subject: subject.clone(),
                predicate,
                object: RdfObject::Literal(value),
            });
        }

        stack.push(Frame::Node { subject });
        Ok(())
    }

    /// Open a predicate element; an `rdf:resource` attribute closes the
    /// statement immediately, otherwise the object is collected from
    /// nested content.
    fn start_predicate(
        &mut self,
        reader: &NsReader<&[u8]>,
        start: &BytesStart<'_>,
        name: &str,
        subject: String,
        stack: &mut Vec<Frame>,
    ) -> Result<(), RdfError> {
        let mut resource: Option<String> = None;

        for attr in start.attributes() {
            let attr = attr.map_err(|e| RdfError::Malformed(format!("bad attribute: {e}")))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let resolved = resolve_attribute(reader, &attr)?;
            match resolved.name.strip_prefix(RDF_NS) {
                Some("resource") => resource = Some(resolved.value),
                Some("nodeID") => resource = Some(format!("_:{}", resolved.value)),
                _ => {}
            }
        }

        let has_object = match resource {
            Some(iri) => {
                self.triples.push(RdfTriple {
                    subject: subject.clone(),
                    predicate: name.to_string(),
                    object: RdfObject::Resource(iri),
                });
                true
            }
            None => false,
        };

        stack.push(Frame::Predicate {
            subject,
            predicate: name.to_string(),
            text: String::new(),
            has_object,
        });
        Ok(())
    }

    /// All (predicate, object) pairs attached to `subject`, in document order.
    pub fn predicate_objects<'a>(
        &'a self,
        subject: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a RdfObject)> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.subject == subject)
            .map(|t| (t.predicate.as_str(), &t.object))
    }

    /// Number of triples in the graph
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the graph holds no triples
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// All triples, in document order
    pub fn triples(&self) -> &[RdfTriple] {
        &self.triples
    }
}

/// Namespace-resolved attribute: expanded name, unescaped value, and
/// whether the attribute was bound to a namespace at all.
struct ResolvedAttribute {
    name: String,
    value: String,
    bound: bool,
}

/// Namespace-expanded element name (namespace IRI + local name).
fn expanded_name(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> String {
    let (resolution, local) = reader.resolve_element(start.name());
    let local = String::from_utf8_lossy(local.into_inner());
    match resolution {
        ResolveResult::Bound(ns) => {
            format!("{}{}", String::from_utf8_lossy(ns.0), local)
        }
        _ => local.into_owned(),
    }
}

fn resolve_attribute(
    reader: &NsReader<&[u8]>,
    attr: &Attribute<'_>,
) -> Result<ResolvedAttribute, RdfError> {
    let (resolution, local) = reader.resolve_attribute(attr.key);
    let local = String::from_utf8_lossy(local.into_inner());
    let (name, bound) = match resolution {
        ResolveResult::Bound(ns) => (
            format!("{}{}", String::from_utf8_lossy(ns.0), local),
            true,
        ),
        _ => (local.into_owned(), false),
    };
    let value = attr
        .unescape_value()
        .map_err(|e| RdfError::Malformed(format!("bad attribute value: {e}")))?
        .into_owned();
    Ok(ResolvedAttribute { name, value, bound })
}
