use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use solver_demos::report::RecordingSink;
use solver_demos::scenarios::{linear, quadratic};
use solver_demos::solvers::Backend;
use solver_demos::{variables, Expression};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("sum((2 x_i + 1) for i in [1..100_000])", |b| {
        b.iter(|| {
            let mut vars = variables!();
            let v: Expression = (0..100_000)
                .map(|_i| {
                    let x_i = vars.add_variable();
                    black_box(2) * black_box(x_i) + black_box(1)
                })
                .sum();
            v
        })
    });

    #[cfg(feature = "microlp")]
    c.bench_function("linear scenario with microlp", |b| {
        let model = linear::model();
        b.iter(|| Backend::Microlp.solve(black_box(&model.problem)).unwrap())
    });

    #[cfg(feature = "pumpkin")]
    c.bench_function("quadratic scenario with pumpkin", |b| {
        let model = quadratic::model();
        b.iter(|| {
            quadratic::solve_and_report(Backend::Pumpkin, black_box(&model), &RecordingSink::new())
                .unwrap()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
