//! Benchmarks search and subject resolution over the built-in curriculum.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use curriculum::{Catalog, ResolveOptions, SearchIndex, catalog::builtin_subjects};

fn search(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let index = SearchIndex::build(&catalog);

    c.bench_function("build search index", |b| {
        b.iter(|| SearchIndex::build(black_box(&catalog)));
    });

    c.bench_function("search", |b| {
        b.iter(|| index.search(black_box("בעיטה")));
    });
}

fn resolve_subjects(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let subjects = builtin_subjects();

    c.bench_function("resolve every subject", |b| {
        b.iter(|| {
            for subject in &subjects {
                black_box(catalog.resolve_subject_all(subject, ResolveOptions::default()));
            }
        });
    });
}

criterion_group!(benches, search, resolve_subjects);
criterion_main!(benches);
