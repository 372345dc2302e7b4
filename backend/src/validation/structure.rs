//! Document-level rules over the full segment sequence.
//!
//! All findings are tagged with the pseudo segment `FILE`. The lenient profile
//! only checks that each envelope header (ISA, GS, ST) appears at least once.
//! The strict profile adds:
//!
//! - trailer presence (IEA, GE, SE) for every header present
//! - ordering: GS after ISA, ST after GS, each trailer after its header
//! - balance: a header may not reopen before its trailer closes it
//! - counts: SE01, GE01 and IEA01 match what they enclose
//! - control numbers: SE02 = ST02, GE02 = GS06, IEA02 = ISA13
//! - a notice when more than one transaction set is present

use crate::dictionary::{GE, GS, IEA, ISA, SE, ST};
use crate::models::{Diagnostic, RawSegment, FILE_SEGMENT_TAG};

use super::ValidationProfile;

/// A header/trailer pair and how the trailer describes its contents.
struct Envelope {
    header: &'static str,
    trailer: &'static str,
    header_name: &'static str,
    trailer_name: &'static str,
    /// Tag counted by the trailer's first element. `None` counts every segment
    /// from header to trailer inclusive.
    counted: Option<&'static str>,
    /// Header element carrying the control number echoed in trailer element 2.
    control_element: usize,
}

const ENVELOPES: [Envelope; 3] = [
    Envelope {
        header: ISA,
        trailer: IEA,
        header_name: "Interchange Control Header",
        trailer_name: "Interchange Control Trailer",
        counted: Some(GS),
        control_element: 13,
    },
    Envelope {
        header: GS,
        trailer: GE,
        header_name: "Functional Group Header",
        trailer_name: "Functional Group Trailer",
        counted: Some(ST),
        control_element: 6,
    },
    Envelope {
        header: ST,
        trailer: SE,
        header_name: "Transaction Set Header",
        trailer_name: "Transaction Set Trailer",
        counted: None,
        control_element: 2,
    },
];

/// Validate structure with the lenient profile.
pub fn validate_structure(segments: &[RawSegment]) -> Vec<Diagnostic> {
    validate_structure_with(segments, ValidationProfile::Lenient)
}

/// Validate the whole segment sequence.
pub fn validate_structure_with(segments: &[RawSegment], profile: ValidationProfile) -> Vec<Diagnostic> {
    let mut results = Vec::new();

    check_header_presence(segments, &mut results);

    if profile.is_strict() {
        check_trailer_presence(segments, &mut results);
        check_ordering(segments, &mut results);
        for envelope in &ENVELOPES {
            check_envelope(segments, envelope, &mut results);
        }
        check_batch(segments, &mut results);
    }

    results
}

fn first_position(segments: &[RawSegment], tag: &str) -> Option<usize> {
    segments.iter().position(|s| s.is(tag))
}

fn check_header_presence(segments: &[RawSegment], results: &mut Vec<Diagnostic>) {
    let suggestions = [
        "Add ISA segment at the beginning of the file",
        "Add GS segment after ISA segment",
        "Add ST segment to identify transaction type",
    ];

    for (envelope, suggestion) in ENVELOPES.iter().zip(suggestions) {
        if first_position(segments, envelope.header).is_none() {
            results.push(
                Diagnostic::file_error(format!(
                    "Missing {} ({}) segment",
                    envelope.header, envelope.header_name
                ))
                .with_suggestion(suggestion),
            );
        }
    }
}

fn check_trailer_presence(segments: &[RawSegment], results: &mut Vec<Diagnostic>) {
    for envelope in &ENVELOPES {
        let has_header = first_position(segments, envelope.header).is_some();
        let has_trailer = first_position(segments, envelope.trailer).is_some();

        if has_header && !has_trailer {
            results.push(
                Diagnostic::file_error(format!(
                    "Missing {} ({}) segment",
                    envelope.trailer, envelope.trailer_name
                ))
                .with_suggestion(format!(
                    "Close every {} segment with a matching {} segment",
                    envelope.header, envelope.trailer
                )),
            );
        }
    }
}

fn check_ordering(segments: &[RawSegment], results: &mut Vec<Diagnostic>) {
    // Nesting: inner headers must follow outer headers
    for (outer, inner) in [(ISA, GS), (GS, ST)] {
        if let (Some(o), Some(i)) = (first_position(segments, outer), first_position(segments, inner)) {
            if i < o {
                results.push(
                    Diagnostic::file_error(format!("{} segment appears before {} segment", inner, outer))
                        .with_suggestion(format!("Move {} after the {} segment", inner, outer)),
                );
            }
        }
    }

    // Each trailer must follow its header
    for envelope in &ENVELOPES {
        let header = first_position(segments, envelope.header);
        let trailer = first_position(segments, envelope.trailer);
        if let (Some(h), Some(t)) = (header, trailer) {
            if t < h {
                results.push(
                    Diagnostic::file_error(format!(
                        "{} segment appears before {} segment",
                        envelope.trailer, envelope.header
                    ))
                    .with_suggestion(format!(
                        "Place {} after the content opened by {}",
                        envelope.trailer, envelope.header
                    )),
                );
            }
        }
    }
}

/// Walk header/trailer pairs, comparing declared counts and control numbers.
fn check_envelope(segments: &[RawSegment], envelope: &Envelope, results: &mut Vec<Diagnostic>) {
    // (header position, enclosed count)
    let mut open: Option<(usize, usize)> = None;

    for (pos, segment) in segments.iter().enumerate() {
        if segment.is(envelope.header) {
            if open.is_some() {
                results.push(
                    Diagnostic::file_error(format!(
                        "{} segment opened before the previous {} was closed by {}",
                        envelope.header, envelope.header, envelope.trailer
                    ))
                    .with_suggestion(format!("Add the missing {} segment", envelope.trailer)),
                );
            }
            open = Some((pos, 0));
            continue;
        }

        if let (Some(counted), Some((_, count))) = (envelope.counted, open.as_mut()) {
            if segment.is(counted) {
                *count += 1;
            }
        }

        if segment.is(envelope.trailer) {
            let Some((header_pos, count)) = open.take() else {
                continue;
            };
            let actual = match envelope.counted {
                Some(_) => count,
                None => pos - header_pos + 1,
            };
            check_declared_count(segment, envelope, actual, results);
            check_control_number(&segments[header_pos], segment, envelope, results);
        }
    }
}

fn check_declared_count(
    trailer: &RawSegment,
    envelope: &Envelope,
    actual: usize,
    results: &mut Vec<Diagnostic>,
) {
    let Some(declared) = trailer.element(1).map(str::trim) else {
        return;
    };

    match declared.parse::<usize>() {
        Ok(n) if n == actual => {}
        Ok(n) => results.push(
            Diagnostic::file_error(format!(
                "{}01 declares {} but the {} encloses {}",
                envelope.trailer,
                n,
                envelope.header,
                describe_count(envelope, actual)
            ))
            .with_suggestion(format!("Set {}01 to {}", envelope.trailer, actual)),
        ),
        Err(_) => results.push(
            Diagnostic::file_error(format!(
                "{}01 count '{}' is not numeric",
                envelope.trailer, declared
            ))
            .with_suggestion(format!("Set {}01 to {}", envelope.trailer, actual)),
        ),
    }
}

fn describe_count(envelope: &Envelope, actual: usize) -> String {
    match envelope.counted {
        Some(tag) => format!("{} {} segment(s)", actual, tag),
        None => format!("{} segment(s)", actual),
    }
}

fn check_control_number(
    header: &RawSegment,
    trailer: &RawSegment,
    envelope: &Envelope,
    results: &mut Vec<Diagnostic>,
) {
    let opened = header.element(envelope.control_element).map(str::trim);
    let closed = trailer.element(2).map(str::trim);

    if let (Some(opened), Some(closed)) = (opened, closed) {
        if opened != closed {
            results.push(
                Diagnostic::file_error(format!(
                    "{}02 control number '{}' does not match {}{:02} '{}'",
                    envelope.trailer, closed, envelope.header, envelope.control_element, opened
                ))
                .with_suggestion(format!(
                    "Use the same control number in {} and {}",
                    envelope.header, envelope.trailer
                )),
            );
        }
    }
}

fn check_batch(segments: &[RawSegment], results: &mut Vec<Diagnostic>) {
    let transaction_sets = segments.iter().filter(|s| s.is(ST)).count();
    if transaction_sets > 1 {
        results.push(Diagnostic::info(
            FILE_SEGMENT_TAG,
            format!(
                "File contains {} transaction sets; only the first is used for classification",
                transaction_sets
            ),
        ));
    }
}
