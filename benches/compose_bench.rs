use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_compose(c: &mut Criterion) {
    let description = "Comfortable running shoes with a breathable mesh upper & <b>cushioned</b> sole. ".repeat(20);

    c.bench_function("compose_card", |b| {
        b.iter(|| {
            let _ = artegen::compose(
                black_box("Red Shoes"),
                black_box(&description),
                black_box("file:///uploads/red-shoes.png"),
                black_box("$49.99"),
            );
        })
    });

    let doc = artegen::compose("Red Shoes", &description, "file:///uploads/red-shoes.png", "$49.99");
    c.bench_function("markup_digest", |b| {
        b.iter(|| {
            let _ = black_box(&doc).digest();
        })
    });
}

fn bench_naming(c: &mut Criterion) {
    c.bench_function("name_for", |b| {
        b.iter(|| {
            let _ = artegen::name_for(black_box("Tênis Esportivo Masculino - Edição 2024 (Azul/Branco)"));
        })
    });
}

criterion_group!(benches, bench_compose, bench_naming);
criterion_main!(benches);
