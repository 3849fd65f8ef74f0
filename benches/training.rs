use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logistic_trainer::backend::{CpuBackend, Tensor1D, Tensor2D};
use logistic_trainer::model::math::penalized_bce_gradient;
use logistic_trainer::trainer::train_penalized_logistic_regression;
use logistic_trainer::validation::{cross_validate, CrossValidationConfig};

fn synthetic(n: usize, d: usize) -> (Tensor2D<CpuBackend>, Tensor1D<CpuBackend>) {
    let x: Vec<f64> = (0..n * d)
        .map(|i| ((i * 37) % 101) as f64 / 50.0 - 1.0)
        .collect();
    let y: Vec<f64> = x
        .chunks(d)
        .map(|row| if row.iter().sum::<f64>() > 0.0 { 1.0 } else { 0.0 })
        .collect();
    (Tensor2D::new(x, n, d), Tensor1D::new(y))
}

fn bench_gradient(c: &mut Criterion) {
    for size in [100, 1000, 10000].iter() {
        c.bench_with_input(BenchmarkId::new("penalized_gradient", size), size, |b, &n| {
            let (x, y) = synthetic(n, 5);
            let w = Tensor1D::<CpuBackend>::new(vec![0.1, -0.2, 0.3, -0.4, 0.5]);

            b.iter(|| {
                let grad = penalized_bce_gradient(black_box(&x), black_box(&y), &w, 0.0, 0.01);
                black_box(grad);
            });
        });
    }
}

fn bench_train(c: &mut Criterion) {
    for size in [100, 1000].iter() {
        c.bench_with_input(BenchmarkId::new("train_1001_iters", size), size, |b, &n| {
            let (x, y) = synthetic(n, 5);

            b.iter(|| {
                let outcome =
                    train_penalized_logistic_regression(black_box(&x), black_box(&y), 0.01, 1001, 0.5, 0);
                black_box(outcome.ok());
            });
        });
    }
}

fn bench_cross_validate(c: &mut Criterion) {
    let (x, y) = synthetic(500, 5);
    let config = CrossValidationConfig {
        max_iters: 201,
        ..Default::default()
    };
    c.bench_function("cross_validate_5_folds", |b| {
        b.iter(|| black_box(cross_validate(&x, &y, 0.01, &config).ok()));
    });
}

criterion_group!(benches, bench_gradient, bench_train, bench_cross_validate);
criterion_main!(benches);
