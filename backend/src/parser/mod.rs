//! Delimiter-tolerant X12 tokenizer, plus byte decoding with encoding detection.
//!
//! Each non-blank input line becomes one [`RawSegment`]. Within a line every
//! character of the [`DelimiterSet`] acts as a separator. Empty tokens created
//! by leading or trailing separators are dropped, interior empty elements are
//! kept so element positions stay accurate:
//!
//! ```text
//! DTM**20240101~   ->   tag "DTM", elements ["", "20240101"]
//! ```
//!
//! Tokenization never fails. A line made only of separators yields a segment
//! with an empty tag, which the validators treat as unknown.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, DecodeError, DecodeResult};
use crate::models::{RawSegment, SegmentId};

/// Separators recognised when no other set is configured.
pub const DEFAULT_SEPARATORS: [char; 3] = ['~', '*', '|'];

// =============================================================================
// Delimiter Configuration
// =============================================================================

/// Candidate segment/element separator characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterSet {
    separators: Vec<char>,
}

impl Default for DelimiterSet {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.to_vec(),
        }
    }
}

impl DelimiterSet {
    /// Build a set from candidate characters. Duplicates are collapsed.
    ///
    /// Whitespace cannot be a separator since lines are split and trimmed on it.
    pub fn new(separators: impl IntoIterator<Item = char>) -> Result<Self, ConfigError> {
        let mut set: Vec<char> = Vec::new();
        for c in separators {
            if c.is_whitespace() {
                return Err(ConfigError::InvalidSeparators {
                    value: format!("{:?}", c),
                    reason: "whitespace cannot be a separator".to_string(),
                });
            }
            if !set.contains(&c) {
                set.push(c);
            }
        }

        if set.is_empty() {
            return Err(ConfigError::InvalidSeparators {
                value: String::new(),
                reason: "at least one separator is required".to_string(),
            });
        }

        Ok(Self { separators: set })
    }

    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    pub fn is_separator(&self, c: char) -> bool {
        self.separators.contains(&c)
    }
}

impl FromStr for DelimiterSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.chars()).map_err(|e| match e {
            ConfigError::InvalidSeparators { reason, .. } => ConfigError::InvalidSeparators {
                value: s.to_string(),
                reason,
            },
            other => other,
        })
    }
}

impl fmt::Display for DelimiterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.separators {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tokenizer
// =============================================================================

/// Tokenize with the default `~ * |` separator set.
pub fn tokenize(raw: &str) -> Vec<RawSegment> {
    tokenize_with(raw, &DelimiterSet::default())
}

/// Tokenize `raw` into segments, one per non-blank line, in input order.
pub fn tokenize_with(raw: &str, delimiters: &DelimiterSet) -> Vec<RawSegment> {
    raw.lines()
        .filter_map(|line| tokenize_line(line, delimiters))
        .enumerate()
        .map(|(i, (tag, elements))| RawSegment::new(SegmentId(i), tag, elements))
        .collect()
}

/// Split one line into `(tag, elements)`. Returns `None` for blank lines.
pub fn tokenize_line(line: &str, delimiters: &DelimiterSet) -> Option<(String, Vec<String>)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = line.split(|c| delimiters.is_separator(c)).collect();
    let is_blank = |t: &&str| t.trim().is_empty();

    let Some(start) = tokens.iter().position(|t| !is_blank(t)) else {
        // Nothing but separators
        return Some((String::new(), Vec::new()));
    };
    let end = tokens
        .iter()
        .rposition(|t| !is_blank(t))
        .map_or(start + 1, |i| i + 1);

    let mut kept = tokens[start..end].iter();
    let tag = kept.next().map(|t| t.trim().to_string()).unwrap_or_default();
    let elements = kept.map(|t| t.to_string()).collect();

    Some((tag, elements))
}

// =============================================================================
// Byte Decoding
// =============================================================================

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with an explicit encoding label, rejecting malformed input.
pub fn decode_content(bytes: &[u8], encoding: &str) -> DecodeResult<String> {
    let label = match encoding.to_lowercase().as_str() {
        "utf8" | "ascii" => "utf-8".to_string(),
        "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    };

    let codec = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| DecodeError::UnsupportedEncoding(encoding.to_string()))?;

    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed(codec.name().to_string()));
    }

    Ok(strip_bom(&text).to_string())
}

/// Decode bytes with auto-detected encoding. Never fails: anything that does
/// not decode cleanly falls back to lossy UTF-8.
///
/// Returns the text and the encoding actually used.
pub fn decode_auto(bytes: &[u8]) -> (String, String) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (strip_bom(text).to_string(), "utf-8".to_string());
    }

    let encoding = detect_encoding(bytes);
    match decode_content(bytes, &encoding) {
        Ok(text) => (text, encoding),
        Err(_) => (
            strip_bom(&String::from_utf8_lossy(bytes)).to_string(),
            "utf-8 (lossy)".to_string(),
        ),
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(seg: &RawSegment) -> Vec<&str> {
        seg.elements.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_simple_segment() {
        let segs = tokenize("ST*850*0001~");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].tag, "ST");
        assert_eq!(elements(&segs[0]), vec!["850", "0001"]);
    }

    #[test]
    fn test_interior_blank_preserved() {
        let segs = tokenize("DTM**20240101");
        assert_eq!(segs[0].tag, "DTM");
        assert_eq!(elements(&segs[0]), vec!["", "20240101"]);
    }

    #[test]
    fn test_leading_and_trailing_separators_dropped() {
        let segs = tokenize("*N1*ST**ACME~~");
        assert_eq!(segs[0].tag, "N1");
        assert_eq!(elements(&segs[0]), vec!["ST", "", "ACME"]);
    }

    #[test]
    fn test_mixed_separators() {
        let segs = tokenize("ST~850~0001\nBEG|00|SA*PO123");
        assert_eq!(elements(&segs[0]), vec!["850", "0001"]);
        assert_eq!(segs[1].tag, "BEG");
        assert_eq!(elements(&segs[1]), vec!["00", "SA", "PO123"]);
    }

    #[test]
    fn test_blank_lines_skipped_ids_increase() {
        let segs = tokenize("ISA*00\n\n   \r\nGS*PO\r\nST*850\n");
        let tags: Vec<&str> = segs.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(tags, vec!["ISA", "GS", "ST"]);
        let ids: Vec<usize> = segs.iter().map(|s| s.id.index()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\n  \n").is_empty());
    }

    #[test]
    fn test_separator_only_line_keeps_position() {
        let segs = tokenize("ST*850\n~~~\nSE*2");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[1].tag, "");
        assert!(segs[1].elements.is_empty());
        assert_eq!(segs[2].tag, "SE");
    }

    #[test]
    fn test_element_padding_preserved() {
        let segs = tokenize("ISA*00*          *01");
        assert_eq!(elements(&segs[0]), vec!["00", "          ", "01"]);
    }

    #[test]
    fn test_line_without_separator_is_tag_only() {
        let segs = tokenize("GARBAGE");
        assert_eq!(segs[0].tag, "GARBAGE");
        assert!(segs[0].elements.is_empty());
    }

    #[test]
    fn test_custom_delimiter_set() {
        let set: DelimiterSet = "+:".parse().unwrap();
        let segs = tokenize_with("UNH+1+ORDERS:D:96A*x", &set);
        assert_eq!(segs[0].tag, "UNH");
        assert_eq!(elements(&segs[0]), vec!["1", "ORDERS", "D", "96A*x"]);
    }

    #[test]
    fn test_delimiter_set_validation() {
        assert!("".parse::<DelimiterSet>().is_err());
        assert!("* ".parse::<DelimiterSet>().is_err());

        let set: DelimiterSet = "**~".parse().unwrap();
        assert_eq!(set.separators(), &['*', '~']);
        assert_eq!(set.to_string(), "*~");
        assert_eq!(DelimiterSet::default().to_string(), "~*|");
    }

    #[test]
    fn test_decode_auto_utf8_with_bom() {
        let bytes = "\u{feff}ST*850".as_bytes();
        let (text, encoding) = decode_auto(bytes);
        assert_eq!(text, "ST*850");
        assert_eq!(encoding, "utf-8");
    }

    #[test]
    fn test_latin1_decoding() {
        // "N1*ST*Société" in ISO-8859-1
        let mut bytes = b"N1*ST*Soci".to_vec();
        bytes.extend_from_slice(&[0xE9, 0x74, 0xE9]);
        let decoded = decode_content(&bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "N1*ST*Société");

        let (auto, _) = decode_auto(&bytes);
        assert!(auto.starts_with("N1*ST*Soci"));
    }

    #[test]
    fn test_decode_unknown_encoding() {
        let err = decode_content(b"ST*850", "klingon").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedEncoding(_)));
    }

    #[test]
    fn test_decode_malformed_utf8() {
        let err = decode_content(&[0x53, 0x54, 0xFF], "utf-8").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }
}
