use crate::correlation_models::CorrelationModel;
use crate::errors::{CovError, Result};
use crate::utils::{kron, triangular_indices};
use crate::SYMMETRY_EPSILON;
use linfa::Float;
use linfa_linalg::cholesky::*;
use log::debug;
use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use rayon::prelude::*;
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// A covariance model over an m dimensional vector field sampled at spatial
/// points, composed of a purely spatial scalar correlation kernel `rho` and a
/// fixed m x m output covariance block:
/// `C(s, t) = output_covariance * rho(s - t)`.
///
/// The Kronecker structure is exploited when discretizing over a sample of N
/// points: the N x N scalar correlation matrix is assembled first (one kernel
/// evaluation per unordered pair, in parallel when the kernel allows it) and
/// the (N·m) x (N·m) result is its Kronecker product with the output block.
/// The Cholesky factor of the full matrix is likewise obtained as the
/// Kronecker product of the two small factors, so the full matrix is never
/// factorized directly.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct KroneckerCovarianceModel<F: Float, Corr: CorrelationModel<F>> {
    /// Spatial correlation kernel, amplitude pinned to one
    corr: Corr,
    /// Output covariance block (m, m)
    output_covariance: Array2<F>,
    /// Output correlation block (m, m), unit diagonal
    output_correlation: Array2<F>,
    /// Marginal standard deviations of the output components (m)
    amplitude: Array1<F>,
    /// Lower Cholesky factor of the output covariance, computed at construction
    output_covariance_chol: Array2<F>,
    /// Indices of the estimable components within [Self::full_parameter]
    active: Vec<usize>,
}

impl<F: Float, Corr: CorrelationModel<F>> KroneckerCovarianceModel<F, Corr> {
    /// Builds a model with independent output components of given marginal
    /// standard deviations: the output covariance is `diag(amplitude^2)`.
    ///
    /// ```
    /// use uqbox_cov::correlation_models::GeneralizedExponential;
    /// use uqbox_cov::KroneckerCovarianceModel;
    /// use ndarray::{arr1, arr2};
    ///
    /// let kernel = GeneralizedExponential::new(&arr1(&[0.5, 1.0]), 1.5).unwrap();
    /// let model = KroneckerCovarianceModel::new(kernel, &arr1(&[2.0])).unwrap();
    /// let points = arr2(&[[0., 0.], [0.5, 0.5], [1., 1.]]);
    /// assert_eq!(model.discretize(&points).unwrap().dim(), (3, 3));
    /// ```
    pub fn new(corr: Corr, amplitude: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<Self> {
        if amplitude.is_empty() {
            return Err(CovError::InvalidValueError(
                "output dimension must be positive".to_string(),
            ));
        }
        if amplitude.iter().any(|&a| a <= F::zero()) {
            return Err(CovError::InvalidValueError(
                "amplitude components must be positive".to_string(),
            ));
        }
        Self::build(corr, amplitude.to_owned(), Array2::eye(amplitude.len()))
    }

    /// Builds a model from a full output covariance block, which must be
    /// square, symmetric and positive definite.
    pub fn with_covariance(
        corr: Corr,
        output_covariance: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<Self> {
        let (m, ncols) = output_covariance.dim();
        if m == 0 || m != ncols {
            return Err(CovError::InvalidValueError(format!(
                "output covariance must be square with positive size, got ({m}, {ncols})"
            )));
        }
        let tol = F::cast(SYMMETRY_EPSILON);
        for i in 0..m {
            for j in 0..i {
                let delta = (output_covariance[[i, j]] - output_covariance[[j, i]]).abs();
                if delta > tol * (F::one() + output_covariance[[i, j]].abs()) {
                    return Err(CovError::InvalidValueError(
                        "output covariance must be symmetric".to_string(),
                    ));
                }
            }
        }
        if output_covariance.diag().iter().any(|&v| v <= F::zero()) {
            return Err(CovError::InvalidValueError(
                "output covariance diagonal must be positive".to_string(),
            ));
        }
        let amplitude = output_covariance.diag().mapv(|v| v.sqrt());
        let mut output_correlation = Array2::eye(m);
        for i in 0..m {
            for j in 0..i {
                let rho_ij = output_covariance[[i, j]] / (amplitude[i] * amplitude[j]);
                output_correlation[[i, j]] = rho_ij;
                output_correlation[[j, i]] = rho_ij;
            }
        }
        Self::build(corr, amplitude, output_correlation)
    }

    /// Assembles the model state from validated amplitude and correlation,
    /// pinning the kernel amplitude to one and caching the Cholesky factor of
    /// the output covariance. Fails when the block is not positive definite.
    fn build(mut corr: Corr, amplitude: Array1<F>, output_correlation: Array2<F>) -> Result<Self> {
        corr.set_amplitude(F::one())?;
        let m = amplitude.len();
        let mut output_covariance = Array2::zeros((m, m));
        for i in 0..m {
            for j in 0..m {
                output_covariance[[i, j]] =
                    output_correlation[[i, j]] * amplitude[i] * amplitude[j];
            }
        }
        let output_covariance_chol = output_covariance.cholesky().map_err(|_| {
            CovError::InvalidValueError("output covariance must be positive definite".to_string())
        })?;
        let active = Self::build_active(&corr, m);
        Ok(KroneckerCovarianceModel {
            corr,
            output_covariance,
            output_correlation,
            amplitude,
            output_covariance_chol,
            active,
        })
    }

    /// Maps the kernel active parameter indices into the composite parameter
    /// layout: scale and nugget factor indices are shared verbatim, the kernel
    /// single amplitude slot spans the m output amplitudes, kernel specific
    /// parameters land after the output correlation block.
    fn build_active(corr: &Corr, m: usize) -> Vec<usize> {
        let amplitude_index = corr.input_dimension() + 1;
        let block_size = m * (m - 1) / 2;
        let mut active = Vec::new();
        for index in corr.active_parameter() {
            if index < amplitude_index {
                active.push(index);
            } else if index == amplitude_index {
                active.extend(amplitude_index..amplitude_index + m);
            } else {
                active.push(index + (m - 1) + block_size);
            }
        }
        active
    }

    /// Spatial correlation kernel
    pub fn corr(&self) -> &Corr {
        &self.corr
    }

    /// Replaces the spatial correlation kernel; its input dimension must match
    /// and its amplitude is pinned to one.
    pub fn set_correlation_model(&mut self, mut corr: Corr) -> Result<()> {
        if corr.input_dimension() != self.corr.input_dimension() {
            return Err(CovError::InvalidValueError(format!(
                "correlation kernel input dimension mismatch: expected {}, got {}",
                self.corr.input_dimension(),
                corr.input_dimension()
            )));
        }
        corr.set_amplitude(F::one())?;
        self.active = Self::build_active(&corr, self.output_dimension());
        self.corr = corr;
        Ok(())
    }

    /// Dimension of the spatial points
    pub fn input_dimension(&self) -> usize {
        self.corr.input_dimension()
    }

    /// Dimension of the output field
    pub fn output_dimension(&self) -> usize {
        self.amplitude.len()
    }

    /// Whether discretization may evaluate the kernel concurrently
    pub fn is_parallel(&self) -> bool {
        self.corr.is_parallel()
    }

    /// Output covariance block (m, m)
    pub fn output_covariance(&self) -> &Array2<F> {
        &self.output_covariance
    }

    /// Output correlation block (m, m)
    pub fn output_correlation(&self) -> &Array2<F> {
        &self.output_correlation
    }

    /// Marginal standard deviations of the output components
    pub fn amplitude(&self) -> &Array1<F> {
        &self.amplitude
    }

    /// Correlation lengths of the spatial kernel
    pub fn scale(&self) -> &Array1<F> {
        self.corr.scale()
    }

    /// Sets the correlation lengths of the spatial kernel
    pub fn set_scale(&mut self, scale: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<()> {
        self.corr.set_scale(scale)
    }

    /// Nugget factor of the spatial kernel
    pub fn nugget_factor(&self) -> F {
        self.corr.nugget_factor()
    }

    /// Sets the nugget factor of the spatial kernel
    pub fn set_nugget_factor(&mut self, nugget_factor: F) -> Result<()> {
        self.corr.set_nugget_factor(nugget_factor)
    }

    /// The m x m covariance block between points `s` and `t`
    pub fn value(
        &self,
        s: &ArrayBase<impl Data<Elem = F>, Ix1>,
        t: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Array2<F> {
        let rho = self.corr.value_between(s, t);
        self.output_covariance.mapv(|v| v * rho)
    }

    /// Assembles the (N·m, N·m) covariance matrix over the N points of `x`,
    /// the Kronecker product of the scalar correlation matrix and the output
    /// covariance block. The result is symmetric; the nugget factor of the
    /// kernel shows up on the N diagonal blocks.
    pub fn discretize(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array2<F>> {
        let rho = self.correlation_matrix(x)?;
        Ok(kron(&rho, &self.output_covariance))
    }

    /// Computes the lower Cholesky factor of [Self::discretize] without ever
    /// assembling or factorizing the full matrix: the factor of a Kronecker
    /// product of SPD matrices is the Kronecker product of their factors.
    pub fn discretize_and_factorize(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<Array2<F>> {
        let rho = self.correlation_matrix(x)?;
        let rho_chol = rho.cholesky()?;
        Ok(kron(&rho_chol, &self.output_covariance_chol))
    }

    /// Evaluates the kernel on every unordered pair of rows of `x`, exactly
    /// N(N+1)/2 evaluations enumerated by flat lower triangle index. Each flat
    /// index yields a distinct (row, col) cell, so the parallel path needs no
    /// synchronization beyond the final scatter.
    fn correlation_matrix(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array2<F>> {
        if x.ncols() != self.input_dimension() {
            return Err(CovError::InvalidValueError(format!(
                "points dimension mismatch: expected {}, got {}",
                self.input_dimension(),
                x.ncols()
            )));
        }
        let n = x.nrows();
        let len = n * (n + 1) / 2;
        let xv = x.view();
        let corr = &self.corr;
        let eval = |index: usize| {
            let (row, col) = triangular_indices(index);
            corr.value_between(&xv.row(row), &xv.row(col))
        };
        let now = Instant::now();
        let flat: Vec<F> = if corr.is_parallel() {
            (0..len).into_par_iter().map(eval).collect()
        } else {
            (0..len).map(eval).collect()
        };
        debug!(
            "{len} kernel evaluations over {n} points in {:?}",
            now.elapsed()
        );
        let mut rho = Array2::zeros((n, n));
        for (index, &value) in flat.iter().enumerate() {
            let (row, col) = triangular_indices(index);
            rho[[row, col]] = value;
            rho[[col, row]] = value;
        }
        Ok(rho)
    }

    /// Packs, in order: scale, nugget factor, amplitude (m), the strict lower
    /// triangle of the output correlation (row major, col < row), then the
    /// kernel specific parameters.
    pub fn full_parameter(&self) -> Array1<F> {
        let m = self.output_dimension();
        let extra = self.corr.extra_parameter_count();
        let corr_parameter = self.corr.full_parameter();
        let mut parameter =
            Vec::with_capacity(self.input_dimension() + 1 + m + m * (m - 1) / 2 + extra);
        parameter.extend(self.corr.scale().iter().copied());
        parameter.push(self.corr.nugget_factor());
        parameter.extend(self.amplitude.iter().copied());
        for i in 0..m {
            for j in 0..i {
                parameter.push(self.output_correlation[[i, j]]);
            }
        }
        parameter.extend(
            corr_parameter
                .iter()
                .skip(corr_parameter.len() - extra)
                .copied(),
        );
        Array1::from_vec(parameter)
    }

    /// Unpacks a vector laid out as [Self::full_parameter]. Every constraint
    /// (positive scale and amplitude, non negative nugget factor, correlation
    /// coefficients in [-1, 1], positive definite rebuilt covariance) is
    /// validated before any component is committed; scale and nugget factor
    /// are propagated down into the kernel.
    pub fn set_full_parameter(
        &mut self,
        parameter: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Result<()> {
        let d = self.input_dimension();
        let m = self.output_dimension();
        let block_size = m * (m - 1) / 2;
        let extra = self.corr.extra_parameter_count();
        let expected = d + 1 + m + block_size + extra;
        if parameter.len() != expected {
            return Err(CovError::InvalidValueError(format!(
                "parameter vector must have size {expected}, got {}",
                parameter.len()
            )));
        }
        let amplitude = parameter.slice(s![d + 1..d + 1 + m]).to_owned();
        if amplitude.iter().any(|&a| a <= F::zero()) {
            return Err(CovError::InvalidValueError(
                "amplitude components must be positive".to_string(),
            ));
        }
        let mut output_correlation = Array2::eye(m);
        let mut cursor = d + 1 + m;
        for i in 0..m {
            for j in 0..i {
                let rho_ij = parameter[cursor];
                cursor += 1;
                if rho_ij.abs() > F::one() {
                    return Err(CovError::InvalidValueError(
                        "output correlation coefficients must lie in [-1, 1]".to_string(),
                    ));
                }
                output_correlation[[i, j]] = rho_ij;
                output_correlation[[j, i]] = rho_ij;
            }
        }
        let mut output_covariance = Array2::zeros((m, m));
        for i in 0..m {
            for j in 0..m {
                output_covariance[[i, j]] =
                    output_correlation[[i, j]] * amplitude[i] * amplitude[j];
            }
        }
        let output_covariance_chol = output_covariance.cholesky().map_err(|_| {
            CovError::InvalidValueError("output covariance must be positive definite".to_string())
        })?;
        let mut corr = self.corr.clone();
        corr.set_scale(&parameter.slice(s![..d]))?;
        corr.set_nugget_factor(parameter[d])?;
        if extra > 0 {
            let mut corr_parameter = corr.full_parameter();
            let corr_extra_start = corr_parameter.len() - extra;
            for e in 0..extra {
                corr_parameter[corr_extra_start + e] = parameter[d + 1 + m + block_size + e];
            }
            corr.set_full_parameter(&corr_parameter)?;
        }
        self.corr = corr;
        self.amplitude = amplitude;
        self.output_correlation = output_correlation;
        self.output_covariance = output_covariance;
        self.output_covariance_chol = output_covariance_chol;
        Ok(())
    }

    /// Indices of the estimable components within [Self::full_parameter]
    pub fn active_parameter(&self) -> &[usize] {
        &self.active
    }
}

impl<F: Float, Corr: CorrelationModel<F>> fmt::Display for KroneckerCovarianceModel<F, Corr> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "KroneckerCovarianceModel(corr={}, output_dimension={})",
            self.corr,
            self.output_dimension()
        )
    }
}
