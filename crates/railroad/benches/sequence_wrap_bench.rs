use criterion::{criterion_group, criterion_main, Criterion};
use railroad::{render_text, Element, Node, NodeStyle, Sequence};

fn build_sequence(len: usize) -> Element {
    let children = (0..len)
        .map(|i| Element::Node(Node::new(format!("tok{i}"), NodeStyle::Terminal)))
        .collect();
    Element::Sequence(Sequence::new(children).unwrap())
}

fn bench_sequence_layout(c: &mut Criterion) {
    let root = build_sequence(64);
    c.bench_function("sequence_layout_64", |b| {
        b.iter(|| render_text(&root, None));
    });
}

criterion_group!(benches, bench_sequence_layout);
criterion_main!(benches);
