use criterion::{black_box, criterion_group, criterion_main, Criterion};
use svdot_core::detect_simple_repeats;
use svdot_core::repeats::detect_class;
use svdot_core::RepeatClass;

fn generate_test_sequence(length: usize) -> Vec<u8> {
    // mostly non-repetitive background with a short tandem block every 500 bp
    let background = b"ATCGGCTAGCTTACGATCGTAGCATGCAGTCA";
    let block = b"CAGCAGCAGCAGAAAAAAAAAAAATATATATATA";
    let mut sequence = Vec::with_capacity(length);

    while sequence.len() < length {
        let source: &[u8] = if sequence.len() % 500 < background.len() { block } else { background };
        let remaining = length - sequence.len();
        let chunk_size = std::cmp::min(source.len(), remaining);
        sequence.extend_from_slice(&source[..chunk_size]);
    }

    sequence
}

fn bench_detect_all_classes(c: &mut Criterion) {
    let sequence = generate_test_sequence(100_000);

    c.bench_function("repeats_all_100kb", |b| {
        b.iter(|| {
            let result = detect_simple_repeats(black_box(&sequence));
            black_box(result)
        })
    });
}

fn bench_detect_per_class(c: &mut Criterion) {
    let sequence = generate_test_sequence(100_000);

    for class in RepeatClass::ALL {
        let name = format!("repeats_{:?}_100kb", class).to_lowercase();
        c.bench_function(&name, |b| {
            b.iter(|| {
                let result = detect_class(black_box(&sequence), class);
                black_box(result)
            })
        });
    }
}

fn bench_homopolymer(c: &mut Criterion) {
    let sequence = vec![b'A'; 1_000_000];

    c.bench_function("repeats_homopolymer_1mb", |b| {
        b.iter(|| {
            let result = detect_simple_repeats(black_box(&sequence));
            black_box(result)
        })
    });
}

criterion_group!(benches, bench_detect_all_classes, bench_detect_per_class, bench_homopolymer);
criterion_main!(benches);
