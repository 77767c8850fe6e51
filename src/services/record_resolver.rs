//! VIAF record resolution
//!
//! Turns a raw RDF/XML response into a `ResolvedRecord` by running the
//! candidate-subject scan: the same VIAF record may be keyed by four
//! equivalent subject IRIs (http/https, with/without trailing slash), and
//! the first candidate that contributes any attribute is authoritative.
//!
//! Attribute policies differ deliberately: the last name value seen on the
//! winning subject wins, while birth and death dates are unioned across all
//! their synonym predicates and the lexicographically smallest value is
//! reported. The asymmetry mirrors the upstream data source and must not
//! be unified.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::naming;
use crate::rdf::{RdfError, RdfGraph};
use crate::vocab::{self, AttributeKind};

/// Cap on the raw-input prefix echoed in parse diagnostics
const RAW_SNIPPET_LIMIT: usize = 2000;

/// Resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The response bytes were not parseable RDF/XML. Carries a truncated
    /// prefix of the offending input for the operator.
    #[error("failed to parse VIAF response as RDF/XML: {source}\nraw response (truncated):\n{snippet}")]
    Parse {
        source: RdfError,
        snippet: String,
    },
}

/// Best-effort person attributes extracted from a VIAF record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRecord {
    /// Preferred name, whitespace-trimmed and spacing-repaired
    pub name: Option<String>,
    /// Birth date (smallest of all distinct values, partial-day repaired)
    pub birth: Option<String>,
    /// Death date (smallest of all distinct values, partial-day repaired)
    pub death: Option<String>,
    /// Non-fatal data-quality warning when conflicting dates were seen
    pub warning: Option<String>,
}

/// The four equivalent subject IRIs for a VIAF identifier, in priority
/// order. The order is the tie-break for which representation of the
/// record is authoritative and must not change.
pub fn candidate_subjects(viaf_id: &str) -> [String; 4] {
    [
        format!("http://viaf.org/viaf/{viaf_id}"),
        format!("http://viaf.org/viaf/{viaf_id}/"),
        format!("https://viaf.org/viaf/{viaf_id}"),
        format!("https://viaf.org/viaf/{viaf_id}/"),
    ]
}

/// Resolve raw RDF/XML bytes into a `ResolvedRecord`.
///
/// An empty record (no candidate subject contributed anything) is a valid
/// outcome, not an error; only unparseable input fails.
pub fn resolve_record(raw: &[u8], viaf_id: &str) -> Result<ResolvedRecord, ResolveError> {
    let graph = RdfGraph::parse(raw).map_err(|source| ResolveError::Parse {
        source,
        snippet: truncated_snippet(raw),
    })?;
    tracing::debug!(triples = graph.len(), "Parsed VIAF RDF response");

    let mut name: Option<String> = None;
    let mut birth_values: BTreeSet<String> = BTreeSet::new();
    let mut death_values: BTreeSet<String> = BTreeSet::new();

    for subject in candidate_subjects(viaf_id) {
        for (predicate, object) in graph.predicate_objects(&subject) {
            let value = object.as_str().trim();
            if value.is_empty() {
                continue;
            }
            match vocab::classify(predicate) {
                // Last name value on the winning subject wins.
                Some(AttributeKind::Name) => name = Some(value.to_string()),
                // All distinct date values are collected.
                Some(AttributeKind::Birth) => {
                    birth_values.insert(value.to_string());
                }
                Some(AttributeKind::Death) => {
                    death_values.insert(value.to_string());
                }
                None => {}
            }
        }
        // First subject that contributed anything is authoritative.
        if name.is_some() || !birth_values.is_empty() || !death_values.is_empty() {
            tracing::debug!(subject = %subject, "Candidate subject matched");
            break;
        }
    }

    let mut warnings: Vec<String> = Vec::new();
    if birth_values.len() > 1 {
        warnings.push(format!(
            "Multiple birth dates: {}",
            join_values(&birth_values)
        ));
    }
    if death_values.len() > 1 {
        warnings.push(format!(
            "Multiple death dates: {}",
            join_values(&death_values)
        ));
    }

    let birth = birth_values
        .iter()
        .next()
        .map(|d| repair_partial_date(d));
    let death = death_values
        .iter()
        .next()
        .map(|d| repair_partial_date(d));
    let name = name.map(|n| naming::repair_name_spacing(&n));

    Ok(ResolvedRecord {
        name,
        birth,
        death,
        warning: if warnings.is_empty() {
            None
        } else {
            Some(warnings.join(" "))
        },
    })
}

/// Rewrite an unknown-day date of the exact shape `YYYY-MM-00` to `YYYY`.
///
/// Only a real month qualifies; `YYYY-00-00` is left untouched, as is any
/// other shape (unknown month, plain year, free text).
pub fn repair_partial_date(date: &str) -> String {
    static PARTIAL_DAY: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PARTIAL_DAY.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})-00$").expect("valid literal regex"));

    if let Some(caps) = pattern.captures(date) {
        if &caps[2] != "00" {
            return caps[1].to_string();
        }
    }
    date.to_string()
}

fn join_values(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ")
}

fn truncated_snippet(raw: &[u8]) -> String {
    let end = raw.len().min(RAW_SNIPPET_LIMIT);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:schema="http://schema.org/"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#">
{body}
</rdf:RDF>"#
        )
    }

    #[test]
    fn test_candidate_subject_order() {
        let subjects = candidate_subjects("42");
        assert_eq!(
            subjects,
            [
                "http://viaf.org/viaf/42",
                "http://viaf.org/viaf/42/",
                "https://viaf.org/viaf/42",
                "https://viaf.org/viaf/42/",
            ]
        );
    }

    #[test]
    fn test_basic_resolution() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42">
                 <rdfs:label>GianGaleazzoSanseverino</rdfs:label>
                 <schema:birthDate>1480-01-01</schema:birthDate>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.name.as_deref(), Some("Gian Galeazzo Sanseverino"));
        assert_eq!(record.birth.as_deref(), Some("1480-01-01"));
        assert_eq!(record.death, None);
        assert_eq!(record.warning, None);
    }

    #[test]
    fn test_last_name_value_wins() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42">
                 <rdfs:label>First Form</rdfs:label>
                 <skos:prefLabel>Second Form</skos:prefLabel>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.name.as_deref(), Some("Second Form"));
    }

    #[test]
    fn test_blank_name_values_do_not_overwrite() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42">
                 <rdfs:label>Real Name</rdfs:label>
                 <skos:prefLabel>   </skos:prefLabel>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.name.as_deref(), Some("Real Name"));
    }

    #[test]
    fn test_first_contributing_subject_is_authoritative() {
        // Subject form #2 carries data; form #4 must be ignored.
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42/">
                 <rdfs:label>Winning Form</rdfs:label>
               </rdf:Description>
               <rdf:Description rdf:about="https://viaf.org/viaf/42/">
                 <rdfs:label>Losing Form</rdfs:label>
                 <schema:deathDate>1600</schema:deathDate>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.name.as_deref(), Some("Winning Form"));
        assert_eq!(record.death, None);
    }

    #[test]
    fn test_conflicting_birth_dates_pick_smallest_and_warn() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42">
                 <schema:birthDate>1520-01-01</schema:birthDate>
                 <rdfs:label>Someone</rdfs:label>
                 <schema:birthDate>1519-12-31</schema:birthDate>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.birth.as_deref(), Some("1519-12-31"));
        assert_eq!(
            record.warning.as_deref(),
            Some("Multiple birth dates: 1519-12-31; 1520-01-01")
        );
    }

    #[test]
    fn test_conflicting_birth_and_death_dates_concatenate_warnings() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42">
                 <schema:birthDate>1520</schema:birthDate>
                 <schema:birthDate>1519</schema:birthDate>
                 <schema:deathDate>1580</schema:deathDate>
                 <schema:deathDate>1581</schema:deathDate>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.birth.as_deref(), Some("1519"));
        assert_eq!(record.death.as_deref(), Some("1580"));
        assert_eq!(
            record.warning.as_deref(),
            Some("Multiple birth dates: 1519; 1520 Multiple death dates: 1580; 1581")
        );
    }

    #[test]
    fn test_duplicate_date_values_do_not_warn() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42">
                 <schema:birthDate>1520</schema:birthDate>
                 <schema:birthDate>1520</schema:birthDate>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.birth.as_deref(), Some("1520"));
        assert_eq!(record.warning, None);
    }

    #[test]
    fn test_dates_union_across_vocabularies() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42"
                                xmlns:viaf="http://viaf.org/ontology/1.1#">
                 <viaf:birthDate>1521</viaf:birthDate>
                 <schema:birthDate>1520</schema:birthDate>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.birth.as_deref(), Some("1520"));
        assert!(record
            .warning
            .as_deref()
            .unwrap()
            .contains("Multiple birth dates: 1520; 1521"));
    }

    #[test]
    fn test_no_matching_subject_yields_empty_record() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/999">
                 <rdfs:label>Someone Else</rdfs:label>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record, ResolvedRecord::default());
    }

    #[test]
    fn test_unparseable_input_fails_with_snippet() {
        let err = resolve_record(b"definitely not XML", "42").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("definitely not XML"));
    }

    #[test]
    fn test_parse_snippet_is_truncated() {
        let raw = vec![b'x'; 5000];
        let ResolveError::Parse { snippet, .. } = resolve_record(&raw, "42").unwrap_err();
        assert_eq!(snippet.len(), RAW_SNIPPET_LIMIT);
    }

    #[test]
    fn test_repair_partial_date() {
        assert_eq!(repair_partial_date("1520-03-00"), "1520");
        assert_eq!(repair_partial_date("1520-00-00"), "1520-00-00");
        assert_eq!(repair_partial_date("1520-03-15"), "1520-03-15");
        assert_eq!(repair_partial_date("1520"), "1520");
        assert_eq!(repair_partial_date("approximately 1520"), "approximately 1520");
    }

    #[test]
    fn test_partial_day_repair_applied_to_resolved_dates() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42">
                 <schema:birthDate>1520-03-00</schema:birthDate>
                 <schema:deathDate>1580-00-00</schema:deathDate>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.birth.as_deref(), Some("1520"));
        assert_eq!(record.death.as_deref(), Some("1580-00-00"));
    }

    #[test]
    fn test_warning_reports_values_before_repair() {
        let doc = record_with(
            r#"<rdf:Description rdf:about="http://viaf.org/viaf/42">
                 <schema:birthDate>1520-03-00</schema:birthDate>
                 <schema:birthDate>1521-01-01</schema:birthDate>
               </rdf:Description>"#,
        );
        let record = resolve_record(doc.as_bytes(), "42").unwrap();
        assert_eq!(record.birth.as_deref(), Some("1520"));
        assert_eq!(
            record.warning.as_deref(),
            Some("Multiple birth dates: 1520-03-00; 1521-01-01")
        );
    }
}
