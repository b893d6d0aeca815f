// benches/render_bench.rs
//! Benchmarks for rendering a debug bar.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use debug_bar::{BoxId, BoxOptions, DebugBar, RequestContext};
use serde_json::json;

/// A context with params of roughly `fields` entries and a few cookies.
fn sample_context(fields: usize) -> RequestContext {
    let params: serde_json::Map<String, serde_json::Value> = (0..fields)
        .map(|i| (format!("field_{}", i), json!(format!("value <{}>", i))))
        .collect();
    RequestContext::new()
        .variable("params", serde_json::Value::Object(params))
        .variable("session", json!({"user_id": 42, "roles": ["admin", "editor"]}))
        .cookie("debug_bar", "params,session")
        .cookie("theme", "dark")
}

fn bar_with_callbacks(count: usize) -> DebugBar {
    let mut bar = DebugBar::new(std::iter::empty::<&str>()).unwrap();
    for i in 0..count {
        bar.add_fn(move |_| {
            Ok((
                format!("Box {}", i),
                format!("<pre>content of box {}</pre>", i),
                BoxOptions::new().id(BoxId::new(format!("box{}", i))?),
            ))
        });
    }
    bar
}

fn bench_callback_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_callbacks");
    let ctx = sample_context(4);

    for count in [1, 10, 50].iter() {
        let bar = bar_with_callbacks(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| bar.render(black_box(&ctx)).unwrap())
        });
    }

    group.finish();
}

fn bench_standard_recipes(c: &mut Criterion) {
    let mut group = c.benchmark_group("standard_recipes");

    for fields in [5, 100].iter() {
        let bar = DebugBar::standard().unwrap();
        let ctx = sample_context(*fields);
        group.bench_with_input(BenchmarkId::from_parameter(fields), fields, |b, _| {
            b.iter(|| bar.render(black_box(&ctx)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_callback_count, bench_standard_recipes);
criterion_main!(benches);
