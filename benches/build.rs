use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jtree::{
    from_lines, from_seekable_with_observer, harvest, separator, BuildOptions, NoopObserver,
    RawLine,
};
use serde::Serialize;
use std::io::Cursor;

#[derive(Serialize)]
struct Metadata {
    created: String,
    version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    editor: Option<String>,
}

#[derive(Serialize)]
struct Item {
    id: u32,
    name: String,
    price: f64,
    metadata: Metadata,
    tags: Vec<String>,
}

fn corpus(size: u32) -> String {
    (0..size)
        .map(|i| {
            let item = Item {
                id: i,
                name: format!("item-{}", i),
                price: f64::from(i) * 1.25,
                metadata: Metadata {
                    created: "2024-01-01".to_string(),
                    version: i % 7,
                    editor: (i % 3 == 0).then(|| format!("editor{}", i % 11)),
                },
                tags: vec!["x".to_string(); (i % 4) as usize],
            };
            serde_json::to_string(&item).unwrap()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn lines(text: &str) -> Vec<RawLine> {
    jtree::sampler::read_lines(text.as_bytes()).unwrap()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let options = BuildOptions::new();

    for size in [100u32, 1_000, 10_000].iter() {
        let lines = lines(&corpus(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| from_lines(black_box(lines), &options, &NoopObserver))
        });
    }

    group.finish();
}

fn benchmark_sampled_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampled_build");
    let text = corpus(20_000);

    for percent in [1.0f64, 10.0, 50.0].iter() {
        let options = BuildOptions::sampled(*percent).with_seed(7);
        group.bench_with_input(BenchmarkId::from_parameter(percent), &text, |b, text| {
            b.iter(|| {
                let mut reader = Cursor::new(text.as_bytes());
                from_seekable_with_observer(&mut reader, &options, &NoopObserver)
            })
        });
    }

    group.finish();
}

fn benchmark_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let lines = lines(&corpus(5_000));
    let harvested = harvest::harvest(&lines, 64, &NoopObserver).unwrap();

    group.bench_function("harvest", |b| {
        b.iter(|| harvest::harvest(black_box(&lines), 64, &NoopObserver))
    });
    group.bench_function("select_separator", |b| {
        b.iter(|| separator::select_separator(black_box(&harvested.keys), &NoopObserver))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_build,
    benchmark_sampled_build,
    benchmark_stages
);
criterion_main!(benches);
