//! A module for stationary scalar correlation kernels used to build covariance
//! models over vector valued random fields.
//!
//! The following kernels are implemented:
//! * generalized exponential.

use crate::errors::{CovError, Result};
use crate::{DEFAULT_NUGGET_FACTOR, DEFAULT_P};
use linfa::Float;
use ndarray::{s, Array1, ArrayBase, Data, Ix1, Zip};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trait for scalar stationary correlation kernels.
///
/// A kernel is a function of a lag vector `tau` returning a correlation
/// scalar. Its output is one dimensional by construction, which is what lets
/// [`KroneckerCovarianceModel`](crate::KroneckerCovarianceModel) compose it
/// with an output covariance block without any runtime output dimension check.
///
/// Evaluation methods check lag dimensions at the call site and are
/// infallible otherwise; setters validate eagerly and never leave the kernel
/// in a partially updated state.
pub trait CorrelationModel<F: Float>: Clone + fmt::Display + Sync {
    /// Dimension of the lag vectors the kernel accepts
    fn input_dimension(&self) -> usize;

    /// Evaluates the kernel at lag `tau`
    fn value(&self, tau: &ArrayBase<impl Data<Elem = F>, Ix1>) -> F;

    /// Evaluates the kernel between two points `s` and `t`
    fn value_between(
        &self,
        s: &ArrayBase<impl Data<Elem = F>, Ix1>,
        t: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> F {
        self.value(&(s.to_owned() - t))
    }

    /// Gradient of the kernel with respect to the lag, evaluated at `tau`
    fn gradient(&self, tau: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Array1<F>;

    /// Whether the kernel may be evaluated concurrently from several threads
    fn is_parallel(&self) -> bool;

    /// Correlation lengths, one per input dimension
    fn scale(&self) -> &Array1<F>;

    /// Sets the correlation lengths; every component must be positive
    fn set_scale(&mut self, scale: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<()>;

    /// Relative variance discontinuity injected at zero lag
    fn nugget_factor(&self) -> F;

    /// Sets the nugget factor; must be non negative
    fn set_nugget_factor(&mut self, nugget_factor: F) -> Result<()>;

    /// Marginal standard deviation of the kernel
    fn amplitude(&self) -> F;

    /// Sets the amplitude; must be positive
    fn set_amplitude(&mut self, amplitude: F) -> Result<()>;

    /// Packs scale, nugget factor, amplitude, then kernel specific parameters
    fn full_parameter(&self) -> Array1<F>;

    /// Unpacks a vector laid out as [`full_parameter`](CorrelationModel::full_parameter);
    /// every constraint is validated before any component is committed
    fn set_full_parameter(&mut self, parameter: &ArrayBase<impl Data<Elem = F>, Ix1>)
        -> Result<()>;

    /// Indices of the estimable components within the full parameter vector
    fn active_parameter(&self) -> Vec<usize>;

    /// Number of kernel specific parameters beyond scale, nugget factor and amplitude
    fn extra_parameter_count(&self) -> usize;
}

/// The generalized exponential kernel
/// `rho(tau) = amplitude^2 exp(-||tau/scale||^p)` with exponent `p` in (0, 2].
///
/// At zero lag the nugget factor is injected:
/// `rho(0) = amplitude^2 (1 + nugget_factor)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct GeneralizedExponential<F: Float> {
    /// Correlation lengths, one per input dimension
    scale: Array1<F>,
    /// Exponent, in (0, 2]
    p: F,
    amplitude: F,
    nugget_factor: F,
}

impl<F: Float> GeneralizedExponential<F> {
    /// Constructor given correlation lengths and the exponent
    ///
    /// ```
    /// use uqbox_cov::correlation_models::{CorrelationModel, GeneralizedExponential};
    /// use ndarray::arr1;
    ///
    /// let kernel = GeneralizedExponential::new(&arr1(&[0.5, 1.0]), 1.5).unwrap();
    /// assert_eq!(kernel.input_dimension(), 2);
    /// ```
    pub fn new(scale: &ArrayBase<impl Data<Elem = F>, Ix1>, p: F) -> Result<Self> {
        let mut kernel = Self::with_dimension(scale.len());
        kernel.set_scale(scale)?;
        kernel.set_p(p)?;
        Ok(kernel)
    }

    /// An isotropic kernel of given dimension with unit correlation lengths
    /// and default exponent [DEFAULT_P](crate::DEFAULT_P)
    pub fn with_dimension(dimension: usize) -> Self {
        GeneralizedExponential {
            scale: Array1::ones(dimension),
            p: F::cast(DEFAULT_P),
            amplitude: F::one(),
            nugget_factor: F::cast(DEFAULT_NUGGET_FACTOR),
        }
    }

    /// Exponent of the kernel
    pub fn p(&self) -> F {
        self.p
    }

    /// Sets the exponent; must lie in (0, 2]
    pub fn set_p(&mut self, p: F) -> Result<()> {
        if p <= F::zero() || p > F::cast(2.) {
            return Err(CovError::InvalidValueError(format!(
                "exponent p must lie in (0, 2], got {p}"
            )));
        }
        self.p = p;
        Ok(())
    }

    /// Euclidean norm of the componentwise scaled lag
    fn scaled_norm(&self, tau: &ArrayBase<impl Data<Elem = F>, Ix1>) -> F {
        (tau / &self.scale).mapv(|v| v * v).sum().sqrt()
    }
}

impl<F: Float> Default for GeneralizedExponential<F> {
    fn default() -> Self {
        Self::with_dimension(1)
    }
}

impl<F: Float> fmt::Display for GeneralizedExponential<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GeneralizedExponential(p={})", self.p)
    }
}

impl<F: Float> CorrelationModel<F> for GeneralizedExponential<F> {
    fn input_dimension(&self) -> usize {
        self.scale.len()
    }

    fn value(&self, tau: &ArrayBase<impl Data<Elem = F>, Ix1>) -> F {
        assert_eq!(
            tau.len(),
            self.scale.len(),
            "lag dimension mismatch: expected {}, got {}",
            self.scale.len(),
            tau.len()
        );
        let variance = self.amplitude * self.amplitude;
        let r = self.scaled_norm(tau);
        if r < F::epsilon() {
            variance * (F::one() + self.nugget_factor)
        } else {
            variance * (-r.powf(self.p)).exp()
        }
    }

    /// The gradient has three regimes at the origin where the kernel has a
    /// removable singularity: for p < 1 the kernel is not differentiable and
    /// the gradient saturates to the most negative representable value, for
    /// p = 1 it is `-amplitude^2 / scale_i`, for p > 1 it vanishes.
    fn gradient(&self, tau: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Array1<F> {
        assert_eq!(
            tau.len(),
            self.scale.len(),
            "lag dimension mismatch: expected {}, got {}",
            self.scale.len(),
            tau.len()
        );
        let variance = self.amplitude * self.amplitude;
        let r = self.scaled_norm(tau);
        if r < F::epsilon() {
            if self.p < F::one() {
                Array1::from_elem(tau.len(), F::min_value())
            } else if self.p == F::one() {
                self.scale.mapv(|s| -variance / s)
            } else {
                Array1::zeros(tau.len())
            }
        } else {
            let factor =
                -variance * self.p * r.powf(self.p - F::cast(2.)) * (-r.powf(self.p)).exp();
            Zip::from(tau)
                .and(&self.scale)
                .map_collect(|&t, &s| factor * t / (s * s))
        }
    }

    fn is_parallel(&self) -> bool {
        // stateless evaluation
        true
    }

    fn scale(&self) -> &Array1<F> {
        &self.scale
    }

    fn set_scale(&mut self, scale: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<()> {
        if scale.len() != self.scale.len() {
            return Err(CovError::InvalidValueError(format!(
                "scale dimension mismatch: expected {}, got {}",
                self.scale.len(),
                scale.len()
            )));
        }
        if scale.iter().any(|&s| s <= F::zero()) {
            return Err(CovError::InvalidValueError(
                "scale components must be positive".to_string(),
            ));
        }
        self.scale = scale.to_owned();
        Ok(())
    }

    fn nugget_factor(&self) -> F {
        self.nugget_factor
    }

    fn set_nugget_factor(&mut self, nugget_factor: F) -> Result<()> {
        if nugget_factor < F::zero() {
            return Err(CovError::InvalidValueError(
                "nugget factor must be non negative".to_string(),
            ));
        }
        self.nugget_factor = nugget_factor;
        Ok(())
    }

    fn amplitude(&self) -> F {
        self.amplitude
    }

    fn set_amplitude(&mut self, amplitude: F) -> Result<()> {
        if amplitude <= F::zero() {
            return Err(CovError::InvalidValueError(
                "amplitude must be positive".to_string(),
            ));
        }
        self.amplitude = amplitude;
        Ok(())
    }

    fn full_parameter(&self) -> Array1<F> {
        let d = self.scale.len();
        let mut parameter = Array1::zeros(d + 3);
        parameter.slice_mut(s![..d]).assign(&self.scale);
        parameter[d] = self.nugget_factor;
        parameter[d + 1] = self.amplitude;
        parameter[d + 2] = self.p;
        parameter
    }

    fn set_full_parameter(
        &mut self,
        parameter: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Result<()> {
        let d = self.scale.len();
        if parameter.len() != d + 3 {
            return Err(CovError::InvalidValueError(format!(
                "parameter vector must have size {}, got {}",
                d + 3,
                parameter.len()
            )));
        }
        let mut updated = self.clone();
        updated.set_scale(&parameter.slice(s![..d]))?;
        updated.set_nugget_factor(parameter[d])?;
        updated.set_amplitude(parameter[d + 1])?;
        updated.set_p(parameter[d + 2])?;
        *self = updated;
        Ok(())
    }

    fn active_parameter(&self) -> Vec<usize> {
        // scale components and amplitude; nugget factor and exponent are fixed
        let d = self.scale.len();
        (0..d).chain(std::iter::once(d + 1)).collect()
    }

    fn extra_parameter_count(&self) -> usize {
        // the exponent
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;
    use paste::paste;

    #[test]
    fn test_value() {
        let kernel = GeneralizedExponential::new(&arr1(&[2.0]), 2.0).unwrap();
        assert_abs_diff_eq!(
            kernel.value(&arr1(&[1.0])),
            f64::exp(-0.25),
            epsilon = 1e-12
        );
        let kernel = GeneralizedExponential::new(&arr1(&[1.0, 1.0]), 1.0).unwrap();
        assert_abs_diff_eq!(
            kernel.value(&arr1(&[3.0, 4.0])),
            f64::exp(-5.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_value_between_matches_lag_value() {
        let kernel = GeneralizedExponential::new(&arr1(&[0.7, 1.3]), 1.5).unwrap();
        let s = arr1(&[1.0, -2.0]);
        let t = arr1(&[0.4, 0.6]);
        assert_abs_diff_eq!(
            kernel.value_between(&s, &t),
            kernel.value(&(s - t)),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_nugget_at_origin() {
        let mut kernel = GeneralizedExponential::new(&arr1(&[1.0, 1.0]), 1.0).unwrap();
        kernel.set_nugget_factor(0.0).unwrap();
        assert_eq!(kernel.value(&arr1(&[0.0, 0.0])), 1.0);
        kernel.set_nugget_factor(0.5).unwrap();
        assert_eq!(kernel.value(&arr1(&[0.0, 0.0])), 1.5);
        kernel.set_amplitude(2.0).unwrap();
        assert_eq!(kernel.value(&arr1(&[0.0, 0.0])), 6.0);
    }

    #[test]
    fn test_exponent_bounds() {
        assert!(GeneralizedExponential::new(&arr1(&[1.0]), 2.0).is_ok());
        assert!(GeneralizedExponential::new(&arr1(&[1.0]), 0.0).is_err());
        assert!(GeneralizedExponential::new(&arr1(&[1.0]), -1.0).is_err());
        assert!(GeneralizedExponential::new(&arr1(&[1.0]), 2.5).is_err());
    }

    #[test]
    fn test_scale_validation() {
        let mut kernel = GeneralizedExponential::<f64>::with_dimension(2);
        assert!(kernel.set_scale(&arr1(&[1.0, 0.0])).is_err());
        assert!(kernel.set_scale(&arr1(&[1.0])).is_err());
        assert!(kernel.set_scale(&arr1(&[1.0, 3.0])).is_ok());
    }

    macro_rules! test_gradient {
        ($name:ident, $p:expr) => {
            paste! {
                #[test]
                fn [<test_gradient_ $name>]() {
                    let kernel =
                        GeneralizedExponential::new(&arr1(&[1.5, 0.9]), $p).unwrap();
                    let tau = arr1(&[0.3, -0.8]);
                    let gradient = kernel.gradient(&tau);
                    let e = 1e-6;
                    for i in 0..2 {
                        let mut up = tau.to_owned();
                        up[i] += e;
                        let mut down = tau.to_owned();
                        down[i] -= e;
                        let fdiff = (kernel.value(&up) - kernel.value(&down)) / (2. * e);
                        assert_abs_diff_eq!(gradient[i], fdiff, epsilon = 1e-6);
                    }
                }
            }
        };
    }

    test_gradient!(p05, 0.5);
    test_gradient!(p10, 1.0);
    test_gradient!(p15, 1.5);
    test_gradient!(p20, 2.0);

    #[test]
    fn test_gradient_at_origin() {
        let origin = arr1(&[0.0, 0.0]);
        let scale = arr1(&[2.0, 4.0]);
        // p < 1: not differentiable, saturates
        let kernel = GeneralizedExponential::new(&scale, 0.5).unwrap();
        assert_eq!(
            kernel.gradient(&origin),
            arr1(&[f64::MIN, f64::MIN])
        );
        // p = 1: finite nonzero limit along each axis
        let kernel = GeneralizedExponential::new(&scale, 1.0).unwrap();
        assert_eq!(kernel.gradient(&origin), arr1(&[-0.5, -0.25]));
        // p > 1: vanishes
        let kernel = GeneralizedExponential::new(&scale, 1.5).unwrap();
        assert_eq!(kernel.gradient(&origin), arr1(&[0.0, 0.0]));
    }

    #[test]
    fn test_full_parameter_round_trip() {
        let mut kernel = GeneralizedExponential::new(&arr1(&[1.5, 0.9]), 1.2).unwrap();
        kernel.set_nugget_factor(0.1).unwrap();
        let parameter = kernel.full_parameter();
        assert_eq!(parameter, arr1(&[1.5, 0.9, 0.1, 1.0, 1.2]));
        let mut other = GeneralizedExponential::<f64>::with_dimension(2);
        other.set_full_parameter(&parameter).unwrap();
        assert_eq!(other, kernel);
    }

    #[test]
    fn test_set_full_parameter_is_atomic() {
        let mut kernel = GeneralizedExponential::new(&arr1(&[1.5]), 1.2).unwrap();
        let before = kernel.clone();
        // valid scale, invalid exponent: nothing must change
        assert!(kernel
            .set_full_parameter(&arr1(&[2.0, 0.0, 1.0, 3.0]))
            .is_err());
        assert_eq!(kernel, before);
    }

    #[test]
    fn test_active_parameter() {
        let kernel = GeneralizedExponential::<f64>::with_dimension(3);
        assert_eq!(kernel.active_parameter(), vec![0, 1, 2, 4]);
        assert_eq!(kernel.extra_parameter_count(), 1);
    }

    #[cfg(feature = "serializable")]
    #[test]
    fn test_kernel_serde() {
        let kernel = GeneralizedExponential::new(&arr1(&[1.5, 0.9]), 1.2).unwrap();
        let json = serde_json::to_string(&kernel).unwrap();
        let loaded: GeneralizedExponential<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, kernel);
    }
}
