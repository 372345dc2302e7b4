//! # EDI Ingest - X12 interchange tokenizer and validator
//!
//! Turns flat-text X12-style interchange files into typed segments, checks
//! them against segment-level and envelope-level rules, classifies the
//! transaction set and renders human-readable diagnostics.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  EDI text   │────▶│  Tokenizer  │────▶│ Validators  │────▶│   Parsed    │
//! │ (~ * | sep) │     │ (per line)  │     │ + Classifier│     │  Document   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use edi_ingest::{parse, summarize};
//!
//! let doc = parse("ST*850*0001\nDTM*097*20240101", "order.edi");
//! println!("{}", summarize(&doc));
//! for d in &doc.diagnostics {
//!     println!("{}", d);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types for the edges around the pipeline
//! - [`models`] - Segments, diagnostics and the parsed document
//! - [`dictionary`] - Segment tag descriptions
//! - [`parser`] - Tokenizer and byte decoding
//! - [`validation`] - Segment and structural rules
//! - [`classify`] - Transaction-set classification
//! - [`pipeline`] - Document assembly and parse entry points
//! - [`summary`] - Text summaries and reports
//! - [`config`] - Environment configuration
//! - [`api`] - HTTP API server and log feed

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod dictionary;
pub mod parser;

// Validation
pub mod classify;
pub mod validation;

// Assembly and output
pub mod pipeline;
pub mod summary;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, DecodeError, IngestError, IngestResult, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Diagnostic,
    DiagnosticId,
    DocumentStatus,
    ParsedDocument,
    RawSegment,
    SegmentId,
    Severity,
    ValidatedSegment,
    FILE_SEGMENT_TAG,
};

// =============================================================================
// Re-exports - Dictionary
// =============================================================================

pub use dictionary::{SegmentDictionary, UNKNOWN_SEGMENT};

// =============================================================================
// Re-exports - Tokenizer
// =============================================================================

pub use parser::{
    decode_auto,
    decode_content,
    detect_encoding,
    tokenize,
    tokenize_with,
    DelimiterSet,
};

// =============================================================================
// Re-exports - Validation & Classification
// =============================================================================

pub use validation::{
    validate_segment,
    validate_segment_with,
    validate_structure,
    validate_structure_with,
    ValidationProfile,
};

pub use classify::{classify, transaction_sets, TransactionSet};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    assemble,
    parse,
    parse_bytes,
    parse_bytes_with_encoding,
    parse_file,
    parse_with,
    ParseOptions,
};

pub use summary::{report, summarize};

pub use config::IngestConfig;

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
