use std::cell::RefCell;

use svdot_core::canvas::{DrawOp, RecordingFactory};
use svdot_core::{
    AlignError, AlignResult, AlignmentRecord, BatchDriver, BatchOutcome, Capabilities, ChromPart, DotplotComposer,
    DotplotError, PairAligner, PartSegment, Strand, Variant,
};
use tempfile::TempDir;

type Responder = fn(&[u8], &[u8]) -> AlignResult<Vec<AlignmentRecord>>;

/// Aligner answering from a function of the sequence pair and counting calls
struct ScriptedAligner {
    respond: Responder,
    calls: RefCell<Vec<(Vec<u8>, Vec<u8>)>>,
}

impl ScriptedAligner {
    fn new(respond: Responder) -> Self {
        Self { respond, calls: RefCell::new(Vec::new()) }
    }
}

impl PairAligner for ScriptedAligner {
    fn align(&self, seq1: &[u8], seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
        self.calls.borrow_mut().push((seq1.to_vec(), seq2.to_vec()));
        (self.respond)(seq1, seq2)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn diagonal(seq1: &[u8], seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
    let n = seq1.len().min(seq2.len()) as u64;
    Ok(vec![AlignmentRecord::new(0, n, 0, n, Strand::Forward)])
}

fn part(id: &str, seq: &str) -> ChromPart {
    ChromPart::new(id, seq, vec![PartSegment::new(seq.len() as u64)])
}

fn three_part_variant() -> Variant {
    Variant::new(
        "del_chr1_1000",
        vec![part("A", "ACGTACGTAA"), part("B", "CCGTTAGCAT")],
        vec![part("C", "TTGACCATGA")],
    )
}

fn page_titles(factory: &RecordingFactory) -> Vec<String> {
    factory
        .canvas()
        .ops()
        .into_iter()
        .filter_map(|op| match op {
            DrawOp::BeginPage(setup) => Some(setup.title),
            _ => None,
        })
        .collect()
}

#[test]
fn all_unordered_pairs_in_order() {
    let outdir = TempDir::new().unwrap();
    let driver = BatchDriver::new(DotplotComposer::new(ScriptedAligner::new(diagonal)), Capabilities::enabled());
    let factory = RecordingFactory::new("pdf");

    let outcome = driver.generate(&three_part_variant(), outdir.path(), &factory).unwrap();

    let expected_path = outdir.path().join("del_chr1_1000.dotplots.pdf");
    assert_eq!(
        outcome,
        BatchOutcome::Written { path: expected_path.clone(), pages: 6, skipped: vec![] }
    );
    assert_eq!(factory.opened(), vec![expected_path]);
    assert_eq!(page_titles(&factory), vec!["A : A", "A : B", "A : C", "B : B", "B : C", "C : C"]);
    assert!(factory.canvas().is_finished());
    assert_eq!(driver.composer().aligner().calls.borrow().len(), 6);
}

#[test]
fn disabled_gate_writes_nothing() {
    let outdir = TempDir::new().unwrap();
    let capabilities = Capabilities { aligner: false, plotting: true };
    let driver = BatchDriver::new(DotplotComposer::new(ScriptedAligner::new(diagonal)), capabilities);
    let factory = RecordingFactory::new("pdf");

    let outcome = driver.generate(&three_part_variant(), outdir.path(), &factory).unwrap();

    assert_eq!(outcome, BatchOutcome::Disabled);
    assert!(factory.opened().is_empty());
    assert!(driver.composer().aligner().calls.borrow().is_empty());
}

#[test]
fn variant_without_parts_is_empty() {
    let outdir = TempDir::new().unwrap();
    let driver = BatchDriver::new(DotplotComposer::new(ScriptedAligner::new(diagonal)), Capabilities::enabled());
    let factory = RecordingFactory::new("svg");

    let outcome = driver.generate(&Variant::new("ins_1", vec![], vec![]), outdir.path(), &factory).unwrap();

    assert_eq!(outcome, BatchOutcome::Empty);
    assert!(factory.opened().is_empty());
}

#[test]
fn malformed_pair_is_skipped() {
    fn malformed_for_b_c(seq1: &[u8], seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
        if seq1 == b"CCGTTAGCAT" && seq2 == b"TTGACCATGA" {
            return Err(AlignError::MalformedResult { line: 2, message: "expected at least 7 fields".into() });
        }
        diagonal(seq1, seq2)
    }

    let outdir = TempDir::new().unwrap();
    let driver = BatchDriver::new(
        DotplotComposer::new(ScriptedAligner::new(malformed_for_b_c)),
        Capabilities::enabled(),
    );
    let factory = RecordingFactory::new("pdf");

    let outcome = driver.generate(&three_part_variant(), outdir.path(), &factory).unwrap();

    match outcome {
        BatchOutcome::Written { pages, skipped, .. } => {
            assert_eq!(pages, 5);
            assert_eq!(skipped, vec![("B".to_string(), "C".to_string())]);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(page_titles(&factory), vec!["A : A", "A : B", "A : C", "B : B", "C : C"]);
    assert!(factory.canvas().is_finished());
}

#[test]
fn tool_failure_aborts_after_finishing_artifact() {
    fn fail_on_a_b(seq1: &[u8], seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
        if seq1 != seq2 {
            return Err(AlignError::ToolNotInstalled { tool: "yass".into(), code: Some(1) });
        }
        diagonal(seq1, seq2)
    }

    let outdir = TempDir::new().unwrap();
    let driver = BatchDriver::new(DotplotComposer::new(ScriptedAligner::new(fail_on_a_b)), Capabilities::enabled());
    let factory = RecordingFactory::new("pdf");

    let err = driver.generate(&three_part_variant(), outdir.path(), &factory).unwrap_err();

    match err {
        DotplotError::PairAlignment { part1, part2, source } => {
            assert_eq!((part1.as_str(), part2.as_str()), ("A", "B"));
            assert!(matches!(source, AlignError::ToolNotInstalled { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    // A : A was drawn, nothing after the failing pair
    assert_eq!(page_titles(&factory), vec!["A : A"]);
    assert!(factory.canvas().is_finished());
    assert_eq!(driver.composer().aligner().calls.borrow().len(), 2);
}

#[test]
fn duplicate_ids_replace_in_place() {
    let outdir = TempDir::new().unwrap();
    let driver = BatchDriver::new(DotplotComposer::new(ScriptedAligner::new(diagonal)), Capabilities::enabled());
    let factory = RecordingFactory::new("pdf");

    let variant = Variant::new(
        "dup_1",
        vec![part("X", "AAAACCCC"), part("Y", "GGGG")],
        vec![part("X", "TTTTTTTTTTTT")],
    );
    let outcome = driver.generate(&variant, outdir.path(), &factory).unwrap();

    assert!(matches!(outcome, BatchOutcome::Written { pages: 3, .. }));
    assert_eq!(page_titles(&factory), vec!["X : X", "X : Y", "Y : Y"]);

    // the ref part's sequence is the one aligned under id X
    let calls = driver.composer().aligner().calls.borrow();
    assert_eq!(calls[0].0, b"TTTTTTTTTTTT".to_vec());
}
