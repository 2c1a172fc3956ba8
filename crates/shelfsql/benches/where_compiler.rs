use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use shelfsql::{NestedQuery, Predicate, SimpleExpr, WhereExpr, compile_where};

/// One simple expression with `n` fields:
/// (`col0` = ? AND `col1` LIKE ? AND ...)
fn wide_expr(n: usize) -> WhereExpr {
    let mut simple = SimpleExpr::new();
    for i in 0..n {
        let predicate = if i % 2 == 0 {
            Predicate::equals(i as i64)
        } else {
            Predicate::contains(format!("v{i}"))
        };
        simple.push(format!("col{i}"), predicate);
    }
    WhereExpr::Simple(simple)
}

/// Alternating AND/OR groups nested `depth` levels deep.
fn deep_expr(depth: usize) -> WhereExpr {
    let mut expr = WhereExpr::field("id", Predicate::equals(0));
    for i in 0..depth {
        let sibling = WhereExpr::field(format!("col{i}"), Predicate::greater_than(i as i64));
        expr = if i % 2 == 0 {
            WhereExpr::and([expr, sibling])
        } else {
            WhereExpr::or([expr, sibling])
        };
    }
    expr
}

fn bench_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_compiler/wide");

    for n in [1, 5, 10, 50, 100] {
        let expr = wide_expr(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &expr, |b, expr| {
            b.iter(|| black_box(compile_where(expr)));
        });
    }

    group.finish();
}

fn bench_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_compiler/deep");

    for depth in [2, 8, 32, 60] {
        let expr = deep_expr(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &expr, |b, expr| {
            b.iter(|| black_box(compile_where(expr)));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_compiler/in_list");

    for n in [5, 20, 100, 500] {
        let expr = WhereExpr::field("id", Predicate::in_list(0..n as i64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &expr, |b, expr| {
            b.iter(|| black_box(compile_where(expr)));
        });
    }

    group.finish();
}

fn bench_nested_query(c: &mut Criterion) {
    let expr = WhereExpr::and([
        wide_expr(5),
        WhereExpr::field(
            "memberId",
            Predicate::in_query(NestedQuery::new("members").fields(&["id"]).filter(wide_expr(5))),
        ),
    ]);
    c.bench_function("where_compiler/nested_query", |b| {
        b.iter(|| black_box(compile_where(&expr)));
    });
}

criterion_group!(benches, bench_wide, bench_deep, bench_in_list, bench_nested_query);
criterion_main!(benches);
