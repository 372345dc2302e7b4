//! Segment dictionary: tag to human-readable description.
//!
//! The built-in table is illustrative, covering the envelope segments and the
//! body segments of the common 850 / 856 / 810 transaction sets. It is loaded
//! once and never mutated; callers that need more tags build a new dictionary
//! with [`SegmentDictionary::merged`].

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Description returned for tags absent from the dictionary.
pub const UNKNOWN_SEGMENT: &str = "Unknown Segment";

// Envelope tags
pub const ISA: &str = "ISA";
pub const IEA: &str = "IEA";
pub const GS: &str = "GS";
pub const GE: &str = "GE";
pub const ST: &str = "ST";
pub const SE: &str = "SE";
pub const DTM: &str = "DTM";

const BUILTIN_SEGMENTS: &[(&str, &str)] = &[
    (ISA, "Interchange Control Header"),
    (GS, "Functional Group Header"),
    (ST, "Transaction Set Header"),
    ("BEG", "Beginning Segment for Purchase Order"),
    ("REF", "Reference Identification"),
    (DTM, "Date/Time Reference"),
    ("N1", "Name"),
    ("N3", "Address Information"),
    ("N4", "Geographic Location"),
    ("PO1", "Baseline Item Data"),
    ("PID", "Product/Item Description"),
    ("CTT", "Transaction Totals"),
    (SE, "Transaction Set Trailer"),
    (GE, "Functional Group Trailer"),
    (IEA, "Interchange Control Trailer"),
    ("BSN", "Beginning Segment for Ship Notice"),
    ("HL", "Hierarchical Level"),
    ("TD1", "Carrier Details (Quantity and Weight)"),
    ("TD5", "Carrier Details (Routing Sequence/Transit Time)"),
    ("TD3", "Carrier Details (Equipment)"),
    ("BIG", "Beginning Segment for Invoice"),
    ("IT1", "Baseline Item Data (Invoice)"),
    ("TDS", "Total Monetary Value Summary"),
    ("CAD", "Carrier Detail"),
    ("SAC", "Service, Promotion, Allowance, or Charge Information"),
];

static BUILTIN: Lazy<SegmentDictionary> = Lazy::new(|| {
    SegmentDictionary::from_entries(BUILTIN_SEGMENTS.iter().copied())
});

/// Immutable tag -> description table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentDictionary {
    entries: BTreeMap<String, String>,
}

impl SegmentDictionary {
    /// The process-wide built-in dictionary.
    pub fn builtin() -> &'static SegmentDictionary {
        &BUILTIN
    }

    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// A new dictionary holding these entries plus `extra`.
    ///
    /// Tags in `extra` override existing descriptions.
    pub fn merged<K, V>(&self, extra: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = self.entries.clone();
        entries.extend(extra.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self { entries }
    }

    /// Description for `tag`, or [`UNKNOWN_SEGMENT`].
    pub fn describe(&self, tag: &str) -> &str {
        self.entries
            .get(tag)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SEGMENT)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Shorthand for `SegmentDictionary::builtin().describe(tag)`.
pub fn describe(tag: &str) -> &'static str {
    SegmentDictionary::builtin().describe(tag)
}
