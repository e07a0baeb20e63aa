use criterion::{criterion_group, criterion_main, Criterion};
use railroad::{render_svg, render_text, Element, Node, NodeStyle, NoHrefs, OneOrMore, Skip};

fn build_one_or_more() -> Element {
    OneOrMore::new(
        Element::Node(Node::new("item", NodeStyle::NonTerminal)),
        Some(Element::Node(Node::new(",", NodeStyle::Terminal))),
    )
}

fn bench_text_render(c: &mut Criterion) {
    let root = build_one_or_more();
    c.bench_function("text_render_one_or_more", |b| {
        b.iter(|| render_text(&root, None));
    });
}

fn bench_svg_render(c: &mut Criterion) {
    let root = build_one_or_more();
    c.bench_function("svg_render_one_or_more", |b| {
        b.iter(|| render_svg(&root, None, &NoHrefs));
    });
}

fn bench_skip(c: &mut Criterion) {
    let root = Element::Skip(Skip::new());
    c.bench_function("text_render_skip", |b| {
        b.iter(|| render_text(&root, None));
    });
}

criterion_group!(benches, bench_text_render, bench_svg_render, bench_skip);
criterion_main!(benches);
