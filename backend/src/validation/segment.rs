//! Rules local to a single segment.
//!
//! Rules run in a fixed order and all applicable rules fire:
//!
//! 1. ISA / GS / ST with no elements -> error
//! 2. ISA with fewer than 16 elements -> error
//! 3. DTM02 present but not `YYYYMMDD` -> warning at element 2
//!
//! Unknown tags produce nothing in the lenient profile. The strict profile
//! adds an `info` notice for them.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationProfile;
use crate::dictionary::{SegmentDictionary, DTM, GS, ISA, ST};
use crate::models::{Diagnostic, RawSegment};

/// Fixed arity of the interchange control header.
pub const ISA_ELEMENT_COUNT: usize = 16;

/// Envelope headers that must carry at least one element.
const ENVELOPE_HEADERS: [&str; 3] = [ISA, GS, ST];

static DATE_YYYYMMDD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("valid date pattern"));

/// Validate one segment with the lenient profile and built-in dictionary.
pub fn validate_segment(segment: &RawSegment) -> Vec<Diagnostic> {
    validate_segment_with(segment, ValidationProfile::Lenient, SegmentDictionary::builtin())
}

/// Validate one segment.
///
/// Every returned diagnostic is attached to `segment.id`.
pub fn validate_segment_with(
    segment: &RawSegment,
    profile: ValidationProfile,
    dictionary: &SegmentDictionary,
) -> Vec<Diagnostic> {
    let mut results = Vec::new();

    check_required_elements(segment, &mut results);
    check_isa_arity(segment, &mut results);
    check_date_format(segment, &mut results);

    if profile.is_strict() {
        check_known_tag(segment, dictionary, &mut results);
    }

    results
        .into_iter()
        .map(|d| d.for_segment(segment.id))
        .collect()
}

fn check_required_elements(segment: &RawSegment, results: &mut Vec<Diagnostic>) {
    if ENVELOPE_HEADERS.contains(&segment.tag.as_str()) && segment.elements.is_empty() {
        results.push(
            Diagnostic::error(
                &segment.tag,
                format!("{} segment is missing required elements", segment.tag),
            )
            .with_suggestion("Ensure all required elements are present"),
        );
    }
}

fn check_isa_arity(segment: &RawSegment, results: &mut Vec<Diagnostic>) {
    if segment.is(ISA) && segment.element_count() < ISA_ELEMENT_COUNT {
        results.push(
            Diagnostic::error(
                ISA,
                format!("ISA segment must contain {} elements", ISA_ELEMENT_COUNT),
            )
            .with_suggestion("Check ISA segment format and ensure all elements are present"),
        );
    }
}

fn check_date_format(segment: &RawSegment, results: &mut Vec<Diagnostic>) {
    if !segment.is(DTM) || segment.element_count() < 2 {
        return;
    }

    let date = segment.element(2).unwrap_or_default();
    if !DATE_YYYYMMDD.is_match(date) {
        results.push(
            Diagnostic::warning(DTM, "Date format should be YYYYMMDD")
                .at_element(2)
                .with_suggestion("Use YYYYMMDD format for dates"),
        );
    }
}

fn check_known_tag(
    segment: &RawSegment,
    dictionary: &SegmentDictionary,
    results: &mut Vec<Diagnostic>,
) {
    if dictionary.contains(&segment.tag) {
        return;
    }

    let message = if segment.tag.is_empty() {
        "Line contains no segment tag".to_string()
    } else {
        format!("Unrecognized segment tag '{}'", segment.tag)
    };
    results.push(
        Diagnostic::info(&segment.tag, message)
            .with_suggestion("Check the segment tag or extend the segment dictionary"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SegmentId, Severity};
    use crate::parser::tokenize;

    fn first(line: &str) -> RawSegment {
        tokenize(line).remove(0)
    }

    fn full_isa() -> String {
        "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *240101*1200*U*00401*000000001*0*P*>".to_string()
    }

    #[test]
    fn test_envelope_without_elements() {
        for tag in ["GS", "ST"] {
            let diags = validate_segment(&first(tag));
            assert_eq!(diags.len(), 1);
            assert_eq!(diags[0].severity, Severity::Error);
            assert_eq!(diags[0].message, format!("{} segment is missing required elements", tag));
        }
    }

    #[test]
    fn test_bare_isa_fires_both_rules() {
        let diags = validate_segment(&first("ISA"));
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "ISA segment is missing required elements",
                "ISA segment must contain 16 elements",
            ]
        );
    }

    #[test]
    fn test_isa_arity() {
        let short = validate_segment(&first("ISA*00*          *00"));
        assert_eq!(short.len(), 1);
        assert!(short[0].message.contains("16 elements"));

        let isa = first(&full_isa());
        assert_eq!(isa.element_count(), 16);
        assert!(validate_segment(&isa).is_empty());
    }

    #[test]
    fn test_date_format_warning() {
        let diags = validate_segment(&first("DTM*097*2024-01-01"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].element_index, Some(2));
        assert_eq!(diags[0].suggestion.as_deref(), Some("Use YYYYMMDD format for dates"));

        assert!(validate_segment(&first("DTM*097*20240101")).is_empty());
        assert!(validate_segment(&first("DTM*097")).is_empty());
    }

    #[test]
    fn test_date_with_interior_blank_checked_at_position_two() {
        // DTM01 blank, DTM02 well formed
        assert!(validate_segment(&first("DTM**20240101")).is_empty());
        // DTM02 blank while DTM03 is present
        let diags = validate_segment(&first("DTM*097**1200"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].element_index, Some(2));
    }

    #[test]
    fn test_unknown_tags_are_permissive_by_default() {
        assert!(validate_segment(&first("ZZZ*1*2")).is_empty());
        assert!(validate_segment(&first("~~~")).is_empty());
    }

    #[test]
    fn test_strict_reports_unknown_tags_as_info() {
        let dict = SegmentDictionary::builtin();
        let diags = validate_segment_with(&first("ZZZ*1"), ValidationProfile::Strict, dict);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Info);
        assert!(diags[0].message.contains("ZZZ"));

        let extended = dict.merged([("ZZZ", "Mutually Defined")]);
        assert!(validate_segment_with(&first("ZZZ*1"), ValidationProfile::Strict, &extended).is_empty());
    }

    #[test]
    fn test_diagnostics_attached_to_segment() {
        let segs = tokenize("ST*850\nDTM*097*bad");
        let diags = validate_segment(&segs[1]);
        assert_eq!(diags[0].segment_id, Some(SegmentId(1)));
        assert_eq!(diags[0].segment_tag, "DTM");
    }
}
