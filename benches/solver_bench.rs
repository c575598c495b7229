// benches/solver_bench.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hornlog::bindings::Bindings;
use hornlog::term::Term;
use hornlog::unify::unify;
use hornlog::Runtime;

/// A linear parent chain plus the transitive ancestor rule.
fn ancestor_program(length: usize) -> String {
    let mut program = String::new();
    for i in 0..length {
        program.push_str(&format!("parent(n{}, n{}).\n", i, i + 1));
    }
    program.push_str("anc(X, Y) :- parent(X, Y).\n");
    program.push_str("anc(X, Z) :- parent(X, Y), anc(Y, Z).\n");
    program
}

fn benchmark_ancestor_enumeration(c: &mut Criterion) {
    let program = ancestor_program(64);

    c.bench_function("ancestor_enumeration", |b| {
        b.iter(|| {
            // A fresh runtime per iteration keeps the database state isolated.
            let mut rt = Runtime::new();
            rt.consult(&program).expect("program should consult");
            let count = rt.query("anc(n0, X).").expect("query should parse").count();
            black_box(count);
        })
    });
}

fn benchmark_append_splits(c: &mut Criterion) {
    let mut rt = Runtime::new();

    c.bench_function("append_splits", |b| {
        b.iter(|| {
            let count = rt
                .query("append(X, Y, [a,b,c,d,e,f,g,h]).")
                .expect("query should parse")
                .count();
            black_box(count);
        })
    });
}

fn benchmark_unification(c: &mut Criterion) {
    let lhs = Term::compound(
        "f",
        vec![Term::int(1), Term::Var(0), Term::list(vec![Term::atom("a"), Term::Var(1)], None)],
    );
    let rhs = Term::compound(
        "f",
        vec![Term::int(1), Term::atom("b"), Term::list(vec![Term::Var(2), Term::atom("c")], None)],
    );

    c.bench_function("unification", |b| {
        b.iter(|| {
            let mut env = Bindings::new();
            let result = unify(&lhs, &rhs, &mut env);
            let _ = black_box(result);
        })
    });
}

criterion_group!(
    benches,
    benchmark_ancestor_enumeration,
    benchmark_append_splits,
    benchmark_unification
);
criterion_main!(benches);
