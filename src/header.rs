//! Canonical field names from a wave's header line.
//!
//! Each wave tags most of its column names with the wave number (`HPROPW3`,
//! `W3_DVTOTINC`, ...). Stripping the tag lets the same variable line up across
//! waves. The case and person identifiers (`CASEW3`, `PERSONW3`) identify
//! records within a single wave and must keep their tag, so they are swapped
//! for placeholders while the tags are stripped.

use log::error;
use thiserror::Error;

const CASE_PLACEHOLDER: &str = "IDPLACEHOLDERCASE";
const PERSON_PLACEHOLDER: &str = "IDPLACEHOLDERPERSON";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("wave {wave} header already contains reserved token '{token}'")]
    ReservedToken { wave: u8, token: &'static str },
}

/// Wave tag appended to variable names, e.g. `W3`.
pub fn wave_tag(wave: u8) -> String {
    format!("W{wave}")
}

pub fn case_identifier(wave: u8) -> String {
    format!("CASE{}", wave_tag(wave))
}

pub fn person_identifier(wave: u8) -> String {
    format!("PERSON{}", wave_tag(wave))
}

/// Fails when the upper-cased header already uses a placeholder token.
pub fn check_reserved(upper: &str, wave: u8) -> Result<(), HeaderError> {
    for token in [CASE_PLACEHOLDER, PERSON_PLACEHOLDER] {
        if upper.contains(token) {
            return Err(HeaderError::ReservedToken { wave, token });
        }
    }
    Ok(())
}

/// Normalizes a tab-separated header line into canonical field names.
///
/// A reserved-token violation is logged and normalization carries on, since
/// the header may still normalize correctly.
pub fn normalize(header: &str, wave: u8) -> Vec<String> {
    let tag = wave_tag(wave);
    let case_id = case_identifier(wave);
    let person_id = person_identifier(wave);
    let upper = header.to_uppercase();
    if let Err(err) = check_reserved(&upper, wave) {
        error!("{err}");
    }

    // " ," separates tokens and a trailing space closes the last one, so a tag
    // that ends a token is always followed by a space.
    let mut text = upper.replace('\t', " ,");
    text.push(' ');
    text = text
        .replace(&case_id, CASE_PLACEHOLDER)
        .replace(&person_id, PERSON_PLACEHOLDER);
    text = text
        .replace(&format!("{tag} "), " ")
        .replace(&format!(" {tag}"), " ")
        .replace(&format!("{tag}_"), "_")
        .replace(&format!("_{tag}"), "_");
    text.trim()
        .replace(" ,", "\t")
        .replace(CASE_PLACEHOLDER, &case_id)
        .replace(PERSON_PLACEHOLDER, &person_id)
        .split('\t')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_keep_their_wave_tag() {
        let fields = normalize("CASEW1\tPERSONW1\tHPROPW1", 1);
        assert_eq!(fields, vec!["CASEW1", "PERSONW1", "HPROP"]);
    }

    #[test]
    fn tags_around_underscores_are_removed() {
        let fields = normalize("casew3\tdvhvalueW3_i\tW3_xs_wgt\tnumadult", 3);
        assert_eq!(fields, vec!["CASEW3", "DVHVALUE_I", "_XS_WGT", "NUMADULT"]);
    }

    #[test]
    fn other_wave_tags_are_untouched() {
        let fields = normalize("CASEW2\tPERSONW2\tHPROPW1\tSEXW2", 2);
        assert_eq!(fields, vec!["CASEW2", "PERSONW2", "HPROPW1", "SEX"]);
    }

    #[test]
    fn reserved_token_is_reported_but_not_fatal() {
        let header = "CASEW4\tIDPLACEHOLDERCASE\tAGEW4";
        assert_eq!(
            check_reserved(&header.to_uppercase(), 4),
            Err(HeaderError::ReservedToken {
                wave: 4,
                token: CASE_PLACEHOLDER
            })
        );
        let fields = normalize(header, 4);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[2], "AGE");
    }

    #[test]
    fn field_count_matches_column_count() {
        let header = "CASEW5\tPERSONW5\tA\tBW5\tC_W5\tD";
        assert_eq!(normalize(header, 5).len(), 6);
    }
}
