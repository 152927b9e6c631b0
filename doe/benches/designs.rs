use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use uqbox_doe::{Combinations, Composite, StratifiedDesign};

fn criterion_designs(c: &mut Criterion) {
    let dims = [4, 10];
    let n_levels = 3;

    let mut group = c.benchmark_group("doe");
    group.sample_size(10);
    for dim in dims {
        group.bench_function(format!("composite-{dim}-dim-{n_levels}-levels"), |b| {
            let center = Array1::<f64>::zeros(dim);
            let levels = Array1::linspace(1., n_levels as f64, n_levels);
            b.iter(|| black_box(Composite::new(&center, &levels).generate()));
        });
    }
    group.bench_function("combinations-10-out-of-20", |b| {
        b.iter(|| black_box(Combinations::new(10, 20).generate()));
    });
    group.finish();
}

criterion_group!(benches, criterion_designs);
criterion_main!(benches);
