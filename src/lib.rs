//! persnamer - VIAF to TEI authority-entry generator
//!
//! Resolves a VIAF identifier to a canonical person record and emits two
//! XML fragments for digital-edition sources: a TEI authority-file entry
//! and a matching inline reference tag.
//!
//! Pipeline: fetch (content-negotiated RDF/XML) -> resolve (candidate
//! subjects, attribute reconciliation) -> build (deterministic xml:id,
//! entry and annotation trees).

pub mod naming;
pub mod rdf;
pub mod services;
pub mod tei;
pub mod vocab;

pub use naming::{repair_name_spacing, xml_id};
pub use rdf::{RdfError, RdfGraph, RdfObject, RdfTriple};
pub use services::{resolve_record, ResolveError, ResolvedRecord, ViafClient, ViafError};
pub use tei::{annotation_tag, person_entry, XmlElement};
