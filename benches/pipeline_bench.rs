// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lazyxss::xss::is_reflected;
use lazyxss::{decode, encode, VariationGenerator};

fn payloads() -> Vec<String> {
    vec![
        "<script>alert(1)</script>".to_string(),
        "<img src=x onerror=alert(1)>".to_string(),
        "\"><svg onload=alert(1)>".to_string(),
        "javascript:alert(1)".to_string(),
        "'-alert(1)-'".to_string(),
    ]
}

fn encoding_benchmark(c: &mut Criterion) {
    let payload = "\"><img src=x onerror=alert(document.domain)>";

    c.bench_function("encode_3_rounds", |b| {
        b.iter(|| black_box(encode(black_box(payload), 3)))
    });

    let encoded = encode(payload, 3);
    c.bench_function("decode_3_rounds", |b| {
        b.iter(|| black_box(decode(black_box(&encoded), 3)))
    });
}

fn variation_benchmark(c: &mut Criterion) {
    let generator = VariationGenerator::new(1);
    let payloads = payloads();
    let targets: Vec<String> = (0..20)
        .map(|i| format!("https://example.com/p{}?q=1&lang=en&page={}", i, i))
        .collect();

    c.bench_function("generate_all_20x5", |b| {
        b.iter(|| black_box(generator.generate_all(&targets, &payloads)))
    });
}

fn reflection_benchmark(c: &mut Criterion) {
    let body = format!(
        "<html><body>{}<div>%22%3E%3Csvg%20onload%3Dalert(1)%3E</div></body></html>",
        "<p>filler</p>".repeat(500)
    );

    c.bench_function("reflection_check_20kb", |b| {
        b.iter(|| black_box(is_reflected("\"><svg onload=alert(1)>", &body)))
    });
}

criterion_group!(benches, encoding_benchmark, variation_benchmark, reflection_benchmark);
criterion_main!(benches);
