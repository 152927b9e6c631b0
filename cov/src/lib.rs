/*!
This library implements covariance models for vector valued random fields,
composing a purely spatial scalar correlation kernel `rho` with a fixed
output covariance block `sigma`: `C(s, t) = sigma * rho(s - t)`.

The composed model is discretized over a sample of N spatial points by
evaluating the kernel on the N(N+1)/2 unordered pairs of points (in parallel
when the kernel allows it) and taking the Kronecker product of the resulting
N x N correlation matrix with the m x m output block. The Cholesky factor of
the full (N·m) x (N·m) matrix is obtained the same way from the two small
factors, which is the whole point of the structure: the full matrix is never
factorized directly.

Example:
```
use uqbox_cov::correlation_models::GeneralizedExponential;
use uqbox_cov::KroneckerCovarianceModel;
use ndarray::{arr1, arr2};

let kernel = GeneralizedExponential::new(&arr1(&[0.5, 1.0]), 1.5).unwrap();
let sigma = arr2(&[[4., 1.], [1., 2.]]);
let model = KroneckerCovarianceModel::with_covariance(kernel, &sigma).unwrap();

let points = arr2(&[[0., 0.], [0.5, 0.5], [1., 1.]]);
let cov = model.discretize(&points).unwrap();
assert_eq!(cov.dim(), (6, 6));
let factor = model.discretize_and_factorize(&points).unwrap();
assert_eq!(factor.dim(), (6, 6));
```

Covariance models are implemented by [KroneckerCovarianceModel] parameterized
by a scalar kernel from [correlation_models].
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
pub mod correlation_models;
mod errors;
mod kronecker;
mod utils;

pub use errors::*;
pub use kronecker::*;
pub use utils::kron;

/// Default exponent of the generalized exponential kernel
pub const DEFAULT_P: f64 = 1.0;

/// Default relative nugget injected at zero lag
pub const DEFAULT_NUGGET_FACTOR: f64 = 1e-12;

/// Relative tolerance used to check output covariance symmetry
pub const SYMMETRY_EPSILON: f64 = 1e-12;
