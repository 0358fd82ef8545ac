use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexcodon::pattern::{self, motif::DEFAULT_MOTIF_LENGTHS};
use hexcodon::{translate_sequence, MappingScheme};

fn sequence() -> String {
    "ATGCGTACGTTAGCCGATAGGCTTACGATCGGATCCATGAAACCCGGGTTT".repeat(200)
}

pub fn translate(c: &mut Criterion) {
    let seq = sequence();
    c.bench_function("translate 10k nucleotides", |b| {
        b.iter(|| translate_sequence(black_box(&seq), MappingScheme::Scheme1))
    });
}

pub fn motifs(c: &mut Criterion) {
    let symbols = translate_sequence(&sequence(), MappingScheme::Scheme1);
    c.bench_function("discover motifs", |b| {
        b.iter(|| pattern::discover_motifs(black_box(&symbols), &DEFAULT_MOTIF_LENGTHS, 3, 20))
    });
}

criterion_group!(benches, translate, motifs);
criterion_main!(benches);
