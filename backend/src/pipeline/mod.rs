//! High-level ingestion API: raw text in, [`ParsedDocument`] out.
//!
//! This module chains every stage in one synchronous pass:
//!
//! ```text
//! raw text ─▶ tokenize ─▶ validate_segment (each) ─┐
//!                    ├──▶ classify ────────────────┼─▶ assemble ─▶ ParsedDocument
//!                    └──▶ validate_structure ──────┘
//! ```
//!
//! Nothing here reads or writes shared state, so independent documents can be
//! parsed concurrently without coordination.
//!
//! # Example
//!
//! ```rust,ignore
//! use edi_ingest::{parse, summarize};
//!
//! let doc = parse("ST~850~0001", "order.edi");
//! assert_eq!(doc.transaction_type, "Purchase Order");
//! println!("{}", summarize(&doc));
//! ```

use std::path::Path;

use tracing::{debug, info};

use crate::classify::classify;
use crate::dictionary::SegmentDictionary;
use crate::error::IngestResult;
use crate::models::{
    Diagnostic, DiagnosticId, DocumentStatus, ParsedDocument, RawSegment, ValidatedSegment,
};
use crate::parser::{decode_auto, decode_content, tokenize_with, DelimiterSet};
use crate::validation::{validate_segment_with, validate_structure_with, ValidationProfile};

/// Options for a parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Candidate separator characters
    pub separators: DelimiterSet,

    /// Validation strictness
    pub profile: ValidationProfile,

    /// Replacement dictionary. `None` uses the built-in table.
    pub dictionary: Option<SegmentDictionary>,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            profile: ValidationProfile::Strict,
            ..Self::default()
        }
    }

    pub fn with_separators(mut self, separators: DelimiterSet) -> Self {
        self.separators = separators;
        self
    }

    pub fn with_profile(mut self, profile: ValidationProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_dictionary(mut self, dictionary: SegmentDictionary) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn dictionary(&self) -> &SegmentDictionary {
        self.dictionary
            .as_ref()
            .unwrap_or_else(|| SegmentDictionary::builtin())
    }
}

/// Parse text with default options.
pub fn parse(raw: &str, file_name: &str) -> ParsedDocument {
    parse_with(raw, file_name, &ParseOptions::default())
}

/// Parse text. Never fails: every defect becomes a diagnostic.
///
/// `file_size_bytes` is the UTF-8 length of `raw`.
pub fn parse_with(raw: &str, file_name: &str, options: &ParseOptions) -> ParsedDocument {
    parse_sized(raw, file_name, raw.len(), options)
}

/// Decode bytes (encoding auto-detected) then parse them.
///
/// `file_size_bytes` is the length of the original bytes.
pub fn parse_bytes(bytes: &[u8], file_name: &str, options: &ParseOptions) -> ParsedDocument {
    let (text, encoding) = decode_auto(bytes);
    debug!(file = file_name, encoding = %encoding, bytes = bytes.len(), "decoded input");
    parse_sized(&text, file_name, bytes.len(), options)
}

/// Decode bytes with an explicit encoding then parse them.
pub fn parse_bytes_with_encoding(
    bytes: &[u8],
    encoding: &str,
    file_name: &str,
    options: &ParseOptions,
) -> IngestResult<ParsedDocument> {
    let text = decode_content(bytes, encoding)?;
    Ok(parse_sized(&text, file_name, bytes.len(), options))
}

/// Read and parse a file. Only reading can fail.
pub fn parse_file(path: &Path, options: &ParseOptions) -> IngestResult<ParsedDocument> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(parse_bytes(&bytes, &file_name, options))
}

fn parse_sized(raw: &str, file_name: &str, file_size_bytes: usize, options: &ParseOptions) -> ParsedDocument {
    let dictionary = options.dictionary();

    let segments = tokenize_with(raw, &options.separators);
    debug!(file = file_name, segments = segments.len(), "tokenized");

    let segment_diagnostics: Vec<Vec<Diagnostic>> = segments
        .iter()
        .map(|s| validate_segment_with(s, options.profile, dictionary))
        .collect();
    let transaction_type = classify(&segments);
    let structural = validate_structure_with(&segments, options.profile);

    let doc = assemble(
        file_name,
        file_size_bytes,
        segments,
        segment_diagnostics,
        structural,
        transaction_type,
        dictionary,
    );

    info!(
        file = %doc.file_name,
        transaction = %doc.transaction_type,
        segments = doc.segments.len(),
        errors = doc.error_count(),
        warnings = doc.warning_count(),
        status = %doc.status,
        "parsed EDI document"
    );

    doc
}

/// Combine the outputs of each stage into a [`ParsedDocument`].
///
/// `segment_diagnostics[i]` belongs to `segments[i]`; missing entries count as
/// no findings. Diagnostics are ordered segment by segment, then structural,
/// and numbered in that order.
pub fn assemble(
    file_name: &str,
    file_size_bytes: usize,
    segments: Vec<RawSegment>,
    segment_diagnostics: Vec<Vec<Diagnostic>>,
    structural: Vec<Diagnostic>,
    transaction_type: String,
    dictionary: &SegmentDictionary,
) -> ParsedDocument {
    let mut per_segment = segment_diagnostics.into_iter();
    let mut diagnostics = Vec::new();
    let mut validated = Vec::with_capacity(segments.len());

    for raw in segments {
        let own = per_segment.next().unwrap_or_default();

        validated.push(ValidatedSegment {
            description: dictionary.describe(&raw.tag).to_string(),
            is_valid: !own.iter().any(|d| d.severity.is_blocking()),
            errors: own.iter().map(|d| d.message.clone()).collect(),
            raw,
        });
        diagnostics.extend(own);
    }
    diagnostics.extend(structural);

    let diagnostics: Vec<Diagnostic> = diagnostics
        .into_iter()
        .enumerate()
        .map(|(i, d)| d.with_id(DiagnosticId(i)))
        .collect();
    let status = DocumentStatus::from_diagnostics(&diagnostics);

    ParsedDocument {
        file_name: file_name.to_string(),
        file_size_bytes,
        transaction_type,
        segments: validated,
        diagnostics,
        status,
    }
}
