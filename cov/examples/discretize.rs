use ndarray::{arr1, arr2};
use uqbox_cov::correlation_models::GeneralizedExponential;
use uqbox_cov::KroneckerCovarianceModel;
use uqbox_doe::{Composite, StratifiedDesign};

fn main() {
    // Probe a bivariate field on a composite design around the origin.
    let points = Composite::new(&arr1(&[0., 0.]), &arr1(&[1., 2.])).generate();
    println!("Composite design plane ({} points)", points.nrows());
    println!("{points}\n");

    let kernel = GeneralizedExponential::new(&arr1(&[2.0, 2.0]), 1.5).expect("valid kernel");
    let sigma = arr2(&[[4., 1.], [1., 2.]]);
    let model = KroneckerCovarianceModel::with_covariance(kernel, &sigma).expect("valid model");
    println!("{model}");

    let cov = model.discretize(&points).expect("discretization");
    println!("Discretized covariance: {:?}", cov.dim());

    let factor = model
        .discretize_and_factorize(&points)
        .expect("factorization");
    let residual = (&factor.dot(&factor.t()) - &cov)
        .mapv(f64::abs)
        .fold(0., |acc: f64, &v| acc.max(v));
    println!("Cholesky factor: {:?}", factor.dim());
    println!("max |L L^T - C| = {residual:e}");
}
