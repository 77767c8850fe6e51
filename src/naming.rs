//! Personal-name repair and xml:id generation
//!
//! VIAF labels occasionally arrive with missing inter-word spacing
//! ("GaleazzoSanseverino"). The repair inserts a space at every ASCII
//! lowercase-to-uppercase boundary; it is idempotent. The xml:id derived
//! from a repaired name is deterministic, lowercase ASCII with no
//! whitespace or punctuation, so it can be pasted into TEI sources as a
//! stable identifier.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Insert a space wherever an ASCII lowercase letter is immediately
/// followed by an ASCII uppercase letter.
///
/// "Gian GaleazzoSanseverino" becomes "Gian Galeazzo Sanseverino";
/// already-spaced names pass through unchanged.
pub fn repair_name_spacing(name: &str) -> String {
    let mut repaired = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if let Some(p) = prev {
            if p.is_ascii_lowercase() && c.is_ascii_uppercase() {
                repaired.push(' ');
            }
        }
        repaired.push(c);
        prev = Some(c);
    }
    repaired
}

/// Fold a name token to bare lowercase ASCII alphanumerics: Unicode
/// decomposition, combining marks stripped, everything else dropped.
fn ascii_fold(token: &str) -> String {
    token
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Derive the xml:id for a person record: `pers-<family>-<given initial>`.
///
/// The given-name token is the first whitespace token, the family-name
/// token the last; middle tokens do not contribute. A single-token name
/// serves as both. A blank name falls back to `pers-viaf-<id>`, the only
/// path on which the identifier is consulted.
pub fn xml_id(full_name: &str, viaf_id: &str) -> String {
    if full_name.trim().is_empty() {
        return format!("pers-viaf-{viaf_id}");
    }

    let fixed = repair_name_spacing(full_name);
    let tokens: Vec<&str> = fixed.split_whitespace().collect();
    let (given, family) = if tokens.len() >= 2 {
        (tokens[0], tokens[tokens.len() - 1])
    } else {
        (tokens[0], tokens[0])
    };

    let family_part = ascii_fold(family);
    let initial: String = ascii_fold(given).chars().take(1).collect();
    format!("pers-{family_part}-{initial}")
}
