//! Domain models for the EDI ingestion pipeline.
//!
//! Every value in this module is produced in a single parse pass and is
//! never mutated afterwards:
//!
//! - [`RawSegment`] - One tokenized input line (tag + positional elements)
//! - [`Diagnostic`] - A validation finding with [`Severity`] and location
//! - [`ValidatedSegment`] - A raw segment decorated with its description and own errors
//! - [`ParsedDocument`] - The complete handoff artifact for a file
//! - [`DocumentStatus`] - `validated` or `error`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pseudo segment tag carried by document-level (structural) diagnostics.
pub const FILE_SEGMENT_TAG: &str = "FILE";

// =============================================================================
// Identifiers
// =============================================================================

/// Positional identity of a segment inside one document.
///
/// Identifiers are assigned in strictly increasing input order, so two
/// segments with the same tag and elements stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub usize);

impl SegmentId {
    /// Zero-based position of the segment in the document.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg_{}", self.0)
    }
}

/// Identity of a diagnostic, assigned in document order on assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticId(pub usize);

impl fmt::Display for DiagnosticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "val_{}", self.0)
    }
}

// =============================================================================
// Raw Segment
// =============================================================================

/// One tokenized line of an interchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSegment {
    pub id: SegmentId,
    /// Segment tag (`ISA`, `GS`, `DTM`, ...). Empty for lines made only of separators.
    pub tag: String,
    /// Elements in position order. Interior empty elements are kept as `""`.
    pub elements: Vec<String>,
}

impl RawSegment {
    pub fn new(id: SegmentId, tag: impl Into<String>, elements: Vec<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            elements,
        }
    }

    /// Element at a 1-based X12 position (`DTM02` is `element(2)`).
    pub fn element(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.elements.get(i))
            .map(String::as_str)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Severity of a validation finding.
///
/// Only [`Severity::Error`] changes a document's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Whether a finding of this severity flips the document to `error`.
    pub fn is_blocking(self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub severity: Severity,
    /// Tag of the offending segment, or [`FILE_SEGMENT_TAG`] for structural findings.
    pub segment_tag: String,
    /// Segment instance the finding belongs to. `None` for structural findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<SegmentId>,
    /// 1-based element position, when the finding concerns one element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_index: Option<usize>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, segment_tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: DiagnosticId::default(),
            severity,
            segment_tag: segment_tag.into(),
            segment_id: None,
            element_index: None,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(segment_tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, segment_tag, message)
    }

    pub fn warning(segment_tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, segment_tag, message)
    }

    pub fn info(segment_tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, segment_tag, message)
    }

    /// Structural finding not tied to any single segment.
    pub fn file_error(message: impl Into<String>) -> Self {
        Self::error(FILE_SEGMENT_TAG, message)
    }

    pub fn for_segment(mut self, id: SegmentId) -> Self {
        self.segment_id = Some(id);
        self
    }

    pub fn at_element(mut self, position: usize) -> Self {
        self.element_index = Some(position);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_id(mut self, id: DiagnosticId) -> Self {
        self.id = id;
        self
    }

    pub fn is_structural(&self) -> bool {
        self.segment_id.is_none()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element_index {
            Some(pos) => write!(
                f,
                "[{}] {}{:02}: {}",
                self.severity, self.segment_tag, pos, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.severity, self.segment_tag, self.message),
        }
    }
}

// =============================================================================
// Validated Segment
// =============================================================================

/// A raw segment with its dictionary description and its own error messages.
///
/// `is_valid` is true exactly when none of the segment's diagnostics is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedSegment {
    #[serde(flatten)]
    pub raw: RawSegment,
    pub description: String,
    pub is_valid: bool,
    /// Messages of this segment's diagnostics, in rule order.
    pub errors: Vec<String>,
}

impl ValidatedSegment {
    pub fn id(&self) -> SegmentId {
        self.raw.id
    }

    pub fn tag(&self) -> &str {
        &self.raw.tag
    }

    pub fn elements(&self) -> &[String] {
        &self.raw.elements
    }
}

// =============================================================================
// Parsed Document
// =============================================================================

/// Outcome of validation for a whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Validated,
    Error,
}

impl DocumentStatus {
    /// `Error` if any diagnostic is blocking, `Validated` otherwise.
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        if diagnostics.iter().any(|d| d.severity.is_blocking()) {
            DocumentStatus::Error
        } else {
            DocumentStatus::Validated
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Validated => "validated",
            DocumentStatus::Error => "error",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The sole artifact handed to collaborators after a parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub file_name: String,
    pub file_size_bytes: usize,
    pub transaction_type: String,
    pub segments: Vec<ValidatedSegment>,
    /// Segment-level diagnostics in segment order, then structural diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    pub status: DocumentStatus,
}

impl ParsedDocument {
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    pub fn is_valid(&self) -> bool {
        self.status == DocumentStatus::Validated
    }

    pub fn segment(&self, id: SegmentId) -> Option<&ValidatedSegment> {
        self.segments.get(id.index()).filter(|s| s.id() == id)
    }

    /// Diagnostics attached to one segment instance.
    pub fn diagnostics_for(&self, id: SegmentId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.segment_id == Some(id))
    }

    /// Document-level diagnostics (tagged `FILE`).
    pub fn structural_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_structural())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: usize, tag: &str, elements: &[&str]) -> RawSegment {
        RawSegment::new(
            SegmentId(id),
            tag,
            elements.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_element_is_one_based() {
        let dtm = seg(0, "DTM", &["097", "20240101"]);
        assert_eq!(dtm.element(1), Some("097"));
        assert_eq!(dtm.element(2), Some("20240101"));
        assert_eq!(dtm.element(0), None);
        assert_eq!(dtm.element(3), None);
    }

    #[test]
    fn test_status_from_diagnostics() {
        let warn = Diagnostic::warning("DTM", "Date format should be YYYYMMDD");
        let info = Diagnostic::info("ZZZ", "Unrecognized segment tag");
        assert_eq!(
            DocumentStatus::from_diagnostics(&[warn.clone(), info]),
            DocumentStatus::Validated
        );

        let err = Diagnostic::file_error("Missing ISA (Interchange Control Header) segment");
        assert_eq!(
            DocumentStatus::from_diagnostics(&[warn, err]),
            DocumentStatus::Error
        );
        assert_eq!(DocumentStatus::from_diagnostics(&[]), DocumentStatus::Validated);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::warning("DTM", "Date format should be YYYYMMDD").at_element(2);
        assert_eq!(d.to_string(), "[warning] DTM02: Date format should be YYYYMMDD");

        let f = Diagnostic::file_error("Missing GS (Functional Group Header) segment");
        assert!(f.is_structural());
        assert_eq!(
            f.to_string(),
            "[error] FILE: Missing GS (Functional Group Header) segment"
        );
    }

    #[test]
    fn test_ids_display() {
        assert_eq!(SegmentId(3).to_string(), "seg_3");
        assert_eq!(DiagnosticId(12).to_string(), "val_12");
    }

    #[test]
    fn test_validated_segment_serializes_flat() {
        let v = ValidatedSegment {
            raw: seg(1, "ST", &["850", "0001"]),
            description: "Transaction Set Header".into(),
            is_valid: true,
            errors: vec![],
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["tag"], "ST");
        assert_eq!(json["id"], 1);
        assert_eq!(json["elements"][0], "850");
        assert_eq!(json["isValid"], true);
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_value(Severity::Warning).unwrap(), "warning");
        assert_eq!(serde_json::to_value(DocumentStatus::Error).unwrap(), "error");
    }
}
