//! Text reports for a [`ParsedDocument`].
//!
//! [`summarize`] renders the fixed seven-line summary shown next to a document.
//! [`report`] renders a longer segment-by-segment listing for terminals.
//! Neither performs any validation.

use std::fmt::{self, Write};

use crate::models::{ParsedDocument, Severity};

/// Fixed-format summary of a document.
///
/// ```text
/// EDI File Summary:
/// - Transaction Type: Purchase Order
/// - Total Segments: 12
/// - Validation Status: validated
/// - Errors: 0
/// - Warnings: 1
/// - File Size: 0.43 KB
/// ```
pub fn summarize(doc: &ParsedDocument) -> String {
    format!(
        "EDI File Summary:\n\
         - Transaction Type: {}\n\
         - Total Segments: {}\n\
         - Validation Status: {}\n\
         - Errors: {}\n\
         - Warnings: {}\n\
         - File Size: {} KB",
        doc.transaction_type,
        doc.segments.len(),
        doc.status,
        doc.error_count(),
        doc.warning_count(),
        format_kilobytes(doc.file_size_bytes),
    )
}

/// `bytes / 1024` with two decimals, ties rounded up (`128` -> `0.13`).
pub fn format_kilobytes(bytes: usize) -> String {
    let hundredths = (bytes as u128 * 100 + 512) / 1024;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// Detailed listing: header, every segment with its elements and own
/// findings, then the full diagnostic list with suggestions.
pub fn report(doc: &ParsedDocument) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, doc);
    out
}

fn write_report(out: &mut String, doc: &ParsedDocument) -> fmt::Result {
    writeln!(out, "{} ({} bytes)", doc.file_name, doc.file_size_bytes)?;
    writeln!(out, "{}", summarize(doc))?;

    writeln!(out, "\nSegments:")?;
    for seg in &doc.segments {
        let marker = if seg.is_valid { " " } else { "!" };
        let tag = if seg.tag().is_empty() { "(none)" } else { seg.tag() };
        writeln!(
            out,
            "{} {:>8}  {:<4} {}",
            marker,
            seg.id().to_string(),
            tag,
            seg.description
        )?;
        for (i, element) in seg.elements().iter().enumerate() {
            writeln!(out, "             {}{:02} = {:?}", tag, i + 1, element)?;
        }
        for message in &seg.errors {
            writeln!(out, "             -> {}", message)?;
        }
    }

    writeln!(out, "\nDiagnostics:")?;
    if doc.diagnostics.is_empty() {
        writeln!(out, "  none")?;
    }
    for d in &doc.diagnostics {
        let icon = match d.severity {
            Severity::Error => "❌",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        };
        writeln!(out, "  {} {} {}", icon, d.id, d)?;
        if let Some(ref suggestion) = d.suggestion {
            writeln!(out, "       suggestion: {}", suggestion)?;
        }
    }

    Ok(())
}
