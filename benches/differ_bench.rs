//! Differ Benchmark
//!
//! Compares diffing a rewritten tree (shared greens, cost follows the edit)
//! against diffing a fresh reparse (nothing shared, cost follows the file).

use canopy::{SyntaxNode, text_changes};
use canopy_syntax::testkit::kinds::LITERAL_EXPRESSION;
use canopy_syntax::testkit::{number, parse};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

// =============================================================================
// Sources
// =============================================================================

fn generate_source(functions: usize, statements: usize) -> String {
    let mut source = String::new();
    for f in 0..functions {
        source.push_str(&format!("int f{f}(int a, int b) {{\n"));
        for s in 0..statements {
            source.push_str(&format!("    int v{s} = a + b * {s};\n"));
        }
        source.push_str("    return a;\n}\n");
    }
    source
}

fn middle_literal(root: &SyntaxNode) -> SyntaxNode {
    let literals: Vec<SyntaxNode> = root
        .descendant_nodes()
        .filter(|node| node.kind() == LITERAL_EXPRESSION)
        .collect();
    literals[literals.len() / 2].clone()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_diff_rewritten(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_rewritten");
    for functions in [10, 50, 200] {
        let source = generate_source(functions, 10);
        let tree = parse(&source);
        let literal = middle_literal(tree.root());
        let edited = tree.with_root(tree.root().replace_node(&literal, number("7")).expect("replace"));
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(functions), &functions, |b, _| {
            b.iter(|| black_box(text_changes(Some(&tree), Some(&edited))));
        });
    }
    group.finish();
}

fn bench_diff_reparsed(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_reparsed");
    for functions in [10, 50] {
        let source = generate_source(functions, 10);
        let edited_source = source.replacen("b * 5", "b * 7", 1);
        let tree = parse(&source);
        let edited = parse(&edited_source);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(functions), &functions, |b, _| {
            b.iter(|| black_box(text_changes(Some(&tree), Some(&edited))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_diff_rewritten, bench_diff_reparsed);
criterion_main!(benches);
