//! Transaction-set classification from the ST segment.
//!
//! Only the first ST segment decides the document's transaction type;
//! [`transaction_sets`] lists every ST for callers handling batched files.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dictionary::ST;
use crate::models::RawSegment;

/// Label used when no usable ST segment exists.
pub const UNKNOWN_TRANSACTION: &str = "Unknown";

/// Business document type identified by ST01.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionSet {
    /// 850
    PurchaseOrder,
    /// 856
    ShipNotice,
    /// 810
    Invoice,
    /// 997
    FunctionalAcknowledgment,
    /// Any other transaction-set code.
    Other(String),
}

impl TransactionSet {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "850" => Self::PurchaseOrder,
            "856" => Self::ShipNotice,
            "810" => Self::Invoice,
            "997" => Self::FunctionalAcknowledgment,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::PurchaseOrder => "850",
            Self::ShipNotice => "856",
            Self::Invoice => "810",
            Self::FunctionalAcknowledgment => "997",
            Self::Other(code) => code,
        }
    }

    /// Human-readable label (`Purchase Order`, `Transaction 940`, ...).
    pub fn label(&self) -> String {
        match self {
            Self::PurchaseOrder => "Purchase Order".to_string(),
            Self::ShipNotice => "Ship Notice/Manifest".to_string(),
            Self::Invoice => "Invoice".to_string(),
            Self::FunctionalAcknowledgment => "Functional Acknowledgment".to_string(),
            Self::Other(code) => format!("Transaction {}", code),
        }
    }
}

impl fmt::Display for TransactionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Transaction set of the first ST segment, if it carries a code.
pub fn first_transaction_set(segments: &[RawSegment]) -> Option<TransactionSet> {
    segments
        .iter()
        .find(|s| s.is(ST))
        .and_then(|st| st.element(1))
        .filter(|code| !code.trim().is_empty())
        .map(TransactionSet::from_code)
}

/// Label for the document's transaction type.
///
/// `"Unknown"` when there is no ST segment, or when the first one has no code.
pub fn classify(segments: &[RawSegment]) -> String {
    first_transaction_set(segments)
        .map(|t| t.label())
        .unwrap_or_else(|| UNKNOWN_TRANSACTION.to_string())
}

/// Every transaction set declared in the file, in order. ST segments
/// without a code are skipped.
pub fn transaction_sets(segments: &[RawSegment]) -> Vec<TransactionSet> {
    segments
        .iter()
        .filter(|s| s.is(ST))
        .filter_map(|st| st.element(1))
        .filter(|code| !code.trim().is_empty())
        .map(TransactionSet::from_code)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenize;

    #[test]
    fn test_known_codes() {
        let cases = [
            ("ST*850*0001", "Purchase Order"),
            ("ST*856*0001", "Ship Notice/Manifest"),
            ("ST*810*0001", "Invoice"),
            ("ST*997*0001", "Functional Acknowledgment"),
        ];
        for (line, label) in cases {
            assert_eq!(classify(&tokenize(line)), label);
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(classify(&tokenize("ST*940*0001")), "Transaction 940");
    }

    #[test]
    fn test_no_st_segment() {
        assert_eq!(classify(&tokenize("ISA*00\nGS*PO")), UNKNOWN_TRANSACTION);
        assert_eq!(classify(&[]), UNKNOWN_TRANSACTION);
    }

    #[test]
    fn test_first_st_without_code() {
        assert_eq!(classify(&tokenize("ST\nST*850*0001")), UNKNOWN_TRANSACTION);
        assert_eq!(classify(&tokenize("ST**0001\nST*850*0002")), UNKNOWN_TRANSACTION);
        assert_eq!(classify(&tokenize("ST*  *0001")), UNKNOWN_TRANSACTION);
        assert_eq!(first_transaction_set(&tokenize("ST**0001")), None);
        assert_eq!(
            transaction_sets(&tokenize("ST**0001\nST*856*0002")),
            vec![TransactionSet::ShipNotice]
        );
    }

    #[test]
    fn test_only_first_st_is_used() {
        let segs = tokenize("ST*810*0001\nSE*2*0001\nST*850*0002\nSE*2*0002");
        assert_eq!(classify(&segs), "Invoice");
        assert_eq!(
            transaction_sets(&segs),
            vec![TransactionSet::Invoice, TransactionSet::PurchaseOrder]
        );
    }

    #[test]
    fn test_code_roundtrip() {
        assert_eq!(TransactionSet::from_code("856").code(), "856");
        assert_eq!(TransactionSet::from_code("204").code(), "204");
    }
}
