use edi_ingest::{
    parse, parse_file, parse_with, summarize, tokenize, DocumentStatus, ParseOptions, Severity,
};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name))
}

const ISA_LINE: &str =
    "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *240101*1200*U*00401*000000001*0*P*>~";

fn valid_interchange() -> String {
    [
        ISA_LINE,
        "GS*PO*SENDER*RECEIVER*20240101*1200*1*X*004010~",
        "ST*850*0001~",
        "SE*2*0001~",
        "GE*1*1~",
        "IEA*1*000000001~",
    ]
    .join("\n")
}

// -- document properties --

#[test]
fn parsing_is_idempotent() {
    let text = std::fs::read_to_string(fixture_path("broken_invoice.x12")).unwrap();
    let a = parse(&text, "a.x12");
    let b = parse(&text, "a.x12");

    assert_eq!(a.segments, b.segments);
    assert_eq!(a.diagnostics, b.diagnostics);
    assert_eq!(a.transaction_type, b.transaction_type);
    assert_eq!(a.status, b.status);
}

#[test]
fn segment_order_matches_non_blank_lines() {
    let text = "\nST*850*0001\n\n  \nDTM**20240101\nZZZ|a|b\n***\nSE*4*0001\n";
    let doc = parse(text, "order.edi");

    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(doc.segments.len(), lines.len());

    for (i, (seg, line)) in doc.segments.iter().zip(&lines).enumerate() {
        let expected = &tokenize(line)[0];
        assert_eq!(seg.id().index(), i);
        assert_eq!(seg.tag(), expected.tag);
        assert_eq!(seg.elements(), expected.elements.as_slice());
    }
}

#[test]
fn status_is_error_exactly_when_an_error_exists() {
    let valid = valid_interchange();
    let valid_with_warning = format!("{}\nDTM*097*bad", valid);
    let inputs = [
        "",
        "ST~850~0001",
        "DTM*097*2024-01-01",
        "ZZZ*1",
        valid.as_str(),
        valid_with_warning.as_str(),
    ];

    for text in inputs {
        for options in [ParseOptions::default(), ParseOptions::strict()] {
            let doc = parse_with(text, "x.edi", &options);
            let has_error = doc.diagnostics.iter().any(|d| d.severity == Severity::Error);
            assert_eq!(doc.status == DocumentStatus::Error, has_error, "input: {:?}", text);

            for seg in &doc.segments {
                let seg_error = doc
                    .diagnostics_for(seg.id())
                    .any(|d| d.severity == Severity::Error);
                assert_eq!(seg.is_valid, !seg_error);
            }
        }
    }
}

#[test]
fn interior_blank_is_preserved() {
    let doc = parse("DTM**20240101", "x.edi");
    assert_eq!(doc.segments[0].elements(), &["".to_string(), "20240101".to_string()]);
}

#[test]
fn missing_interchange_header_is_reported() {
    let body: Vec<String> = (0..50).map(|i| format!("REF*ZZ*{}", i)).collect();
    let text = format!("GS*PO*A*B*20240101*1200*1*X*004010\nST*850*0001\n{}", body.join("\n"));
    let doc = parse(&text, "x.edi");

    let structural: Vec<_> = doc.structural_diagnostics().collect();
    assert_eq!(structural.len(), 1);
    assert_eq!(structural[0].severity, Severity::Error);
    assert_eq!(structural[0].segment_tag, "FILE");
    assert!(structural[0].message.contains("Interchange Control Header"));
}

#[test]
fn isa_arity_rule() {
    let short = parse("ISA*00*          *00", "x.edi");
    assert!(short
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error && d.message.contains("16 elements")));

    let exact = parse(ISA_LINE, "x.edi");
    assert_eq!(exact.segments[0].elements().len(), 16);
    assert!(!exact.diagnostics.iter().any(|d| d.message.contains("16 elements")));
}

#[test]
fn date_format_warning() {
    let bad = parse("DTM*097*2024-01-01", "x.edi");
    let warning = bad
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Warning)
        .expect("warning for non YYYYMMDD date");
    assert_eq!(warning.element_index, Some(2));
    assert!(warning.suggestion.as_deref().unwrap().contains("YYYYMMDD"));

    let good = parse("DTM*097*20240101", "x.edi");
    assert_eq!(good.warning_count(), 0);
}

// -- scenarios --

#[test]
fn only_transaction_header_is_classified_but_invalid() {
    let doc = parse("ST~850~0001", "x.edi");
    assert_eq!(doc.transaction_type, "Purchase Order");
    assert_eq!(doc.status, DocumentStatus::Error);

    let messages: Vec<&str> = doc.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Missing ISA (Interchange Control Header) segment",
            "Missing GS (Functional Group Header) segment",
        ]
    );
}

#[test]
fn transaction_header_without_code_is_unknown() {
    let doc = parse("ST**0001", "x.edi");
    assert_eq!(doc.transaction_type, "Unknown");
    assert!(summarize(&doc).contains("- Transaction Type: Unknown\n"));
}

#[test]
fn full_envelope_validates() {
    for options in [ParseOptions::default(), ParseOptions::strict()] {
        let doc = parse_with(&valid_interchange(), "x.edi", &options);
        assert_eq!(doc.status, DocumentStatus::Validated);
        assert_eq!(doc.error_count(), 0);
        assert_eq!(doc.transaction_type, "Purchase Order");
    }
}

#[test]
fn purchase_order_fixture() {
    let doc = parse_file(&fixture_path("purchase_order.edi"), &ParseOptions::strict()).unwrap();

    assert_eq!(doc.file_name, "purchase_order.edi");
    assert_eq!(doc.segments.len(), 14);
    assert!(doc.diagnostics.is_empty(), "{:?}", doc.diagnostics);
    assert_eq!(doc.segments[3].description, "Beginning Segment for Purchase Order");

    let summary = summarize(&doc);
    assert!(summary.contains("- Validation Status: validated"));
    assert!(summary.contains("- Total Segments: 14"));
}

#[test]
fn broken_invoice_fixture() {
    let doc = parse_file(&fixture_path("broken_invoice.x12"), &ParseOptions::default()).unwrap();

    assert_eq!(doc.transaction_type, "Invoice");
    assert_eq!(doc.status, DocumentStatus::Error);
    assert_eq!(doc.error_count(), 1);
    assert_eq!(doc.warning_count(), 1);

    let dtm = doc.segments.iter().find(|s| s.tag() == "DTM").unwrap();
    assert!(dtm.is_valid);
    assert_eq!(dtm.errors, vec!["Date format should be YYYYMMDD"]);
}

#[test]
fn documents_parse_concurrently() {
    let text = std::fs::read_to_string(fixture_path("purchase_order.edi")).unwrap();
    let expected = parse(&text, "po.edi");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let text = text.clone();
            std::thread::spawn(move || parse(&text, "po.edi"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
