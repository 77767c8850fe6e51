//! RDF vocabulary used by VIAF person records
//!
//! VIAF expresses the same semantic attribute through several synonym
//! predicates drawn from different vocabularies. The sets below are the
//! process-wide classification tables; they are never re-derived per call.

/// RDF syntax namespace
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// RDF Schema namespace
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// schema.org namespace
pub const SCHEMA_NS: &str = "http://schema.org/";

/// VIAF ontology namespace
pub const VIAF_NS: &str = "http://viaf.org/ontology/1.1#";

/// Library of Congress MADS/RDF namespace
pub const MADS_NS: &str = "http://www.loc.gov/mads/rdf/v1#";

/// SKOS core namespace
pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";

/// Predicates carrying a preferred name for the record's person
pub const NAME_PREDICATES: [&str; 5] = [
    "http://www.w3.org/2000/01/rdf-schema#label",
    "http://schema.org/name",
    "http://viaf.org/ontology/1.1#mainHead",
    "http://www.loc.gov/mads/rdf/v1#authoritativeLabel",
    "http://www.w3.org/2004/02/skos/core#prefLabel",
];

/// Predicates carrying a birth date
pub const BIRTH_PREDICATES: [&str; 2] = [
    "http://viaf.org/ontology/1.1#birthDate",
    "http://schema.org/birthDate",
];

/// Predicates carrying a death date
pub const DEATH_PREDICATES: [&str; 2] = [
    "http://viaf.org/ontology/1.1#deathDate",
    "http://schema.org/deathDate",
];

/// Semantic attribute a predicate maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Preferred name of the person
    Name,
    /// Birth date
    Birth,
    /// Death date
    Death,
}

/// Classify a predicate IRI into one of the three attribute buckets.
///
/// Returns `None` for predicates outside the classification tables;
/// those are ignored during record resolution.
pub fn classify(predicate: &str) -> Option<AttributeKind> {
    if NAME_PREDICATES.contains(&predicate) {
        Some(AttributeKind::Name)
    } else if BIRTH_PREDICATES.contains(&predicate) {
        Some(AttributeKind::Birth)
    } else if DEATH_PREDICATES.contains(&predicate) {
        Some(AttributeKind::Death)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_name_synonyms() {
        for predicate in NAME_PREDICATES {
            assert_eq!(classify(predicate), Some(AttributeKind::Name));
        }
    }

    #[test]
    fn test_classify_dates_across_vocabularies() {
        assert_eq!(
            classify("http://viaf.org/ontology/1.1#birthDate"),
            Some(AttributeKind::Birth)
        );
        assert_eq!(
            classify("http://schema.org/birthDate"),
            Some(AttributeKind::Birth)
        );
        assert_eq!(
            classify("http://viaf.org/ontology/1.1#deathDate"),
            Some(AttributeKind::Death)
        );
        assert_eq!(
            classify("http://schema.org/deathDate"),
            Some(AttributeKind::Death)
        );
    }

    #[test]
    fn test_classify_ignores_unrelated_predicates() {
        assert_eq!(classify("http://schema.org/alternateName"), None);
        assert_eq!(classify("http://www.w3.org/2004/02/skos/core#altLabel"), None);
        assert_eq!(classify(""), None);
    }
}
