use svdot_core::{
    AlignResult, AlignmentRecord, BatchDriver, BatchOutcome, Capabilities, ChromPart, DotplotComposer, PairAligner,
    PartSegment, Strand, Variant,
};
use svdot_render::{ArtifactFactory, ExportConfig, OutputFormat};

struct DemoAligner;

impl PairAligner for DemoAligner {
    fn align(&self, seq1: &[u8], seq2: &[u8]) -> AlignResult<Vec<AlignmentRecord>> {
        let n = seq1.len().min(seq2.len()) as u64;
        Ok(vec![
            AlignmentRecord::new(0, n / 2, 0, n / 2, Strand::Forward),
            AlignmentRecord::new(n / 2, n, n / 2, n, Strand::Reverse),
        ])
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}

fn demo_variant() -> Variant {
    let left = "ACGTTGCA".repeat(10);
    let right = format!("{}{}", "A".repeat(12), "GATTACA".repeat(6));
    Variant::new(
        "inv_demo",
        vec![ChromPart::new(
            "alt_1",
            format!("{}{}", left, right),
            vec![PartSegment::named("left", left.len() as u64), PartSegment::named("right", right.len() as u64)],
        )],
        vec![ChromPart::whole("ref_1", left)],
    )
}

fn export_config() -> ExportConfig {
    ExportConfig {
        width: 600,
        height: 600,
        show_footer: false, // disable dynamic timestamp
        provenance_comment: Some("svdot determinism test".into()),
        ..Default::default()
    }
}

#[test]
fn svg_export_is_deterministic() {
    let driver = BatchDriver::new(DotplotComposer::new(DemoAligner), Capabilities::enabled());
    let factory = ArtifactFactory::new(OutputFormat::Svg, export_config());
    let variant = demo_variant();

    let dir1 = tempfile::tempdir().unwrap();
    let dir2 = tempfile::tempdir().unwrap();
    let out1 = driver.generate(&variant, dir1.path(), &factory).unwrap();
    let out2 = driver.generate(&variant, dir2.path(), &factory).unwrap();

    let (path1, path2) = match (out1, out2) {
        (BatchOutcome::Written { path: p1, pages: 3, .. }, BatchOutcome::Written { path: p2, pages: 3, .. }) => (p1, p2),
        other => panic!("unexpected outcomes: {other:?}"),
    };
    assert_eq!(path1.file_name().unwrap(), "inv_demo.dotplots.svg");

    let b1 = std::fs::read(&path1).unwrap();
    let b2 = std::fs::read(&path2).unwrap();
    assert_eq!(b1, b2, "SVG bytes differ between identical renders");
}

#[test]
fn svg_contains_every_page_title() {
    let driver = BatchDriver::new(DotplotComposer::new(DemoAligner), Capabilities::enabled());
    let factory = ArtifactFactory::new(OutputFormat::Svg, export_config());
    let dir = tempfile::tempdir().unwrap();

    driver.generate(&demo_variant(), dir.path(), &factory).unwrap();

    let text = std::fs::read_to_string(dir.path().join("inv_demo.dotplots.svg")).unwrap();
    for title in ["alt_1 : alt_1", "alt_1 : ref_1", "ref_1 : ref_1"] {
        assert!(text.contains(title), "missing page {title}");
    }
    assert!(text.contains(r#"<g id="page-3""#));
    assert!(!text.contains(r#"<g id="page-4""#));
    assert!(text.contains("<!-- svdot determinism test -->"));
    // repeat markers in the configured third color
    assert!(text.contains("#ff9900"));
}
