use crate::StratifiedDesign;
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// The axial (star) design consists of the center point plus, for every level
/// and every coordinate axis, the two points offset from the center by the
/// level radius along that axis only.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Axial<F: Float> {
    /// Center of the design
    center: Array1<F>,
    /// Level radii, one shell of 2*nx points per level
    levels: Array1<F>,
}

impl<F: Float> Axial<F> {
    /// Constructor given a center point and level radii
    ///
    /// ```
    /// use uqbox_doe::{Axial, StratifiedDesign};
    /// use ndarray::arr1;
    ///
    /// let plane = Axial::new(&arr1(&[0., 0.]), &arr1(&[1.])).generate();
    /// assert_eq!(plane.nrows(), 5);
    /// ```
    pub fn new(
        center: &ArrayBase<impl Data<Elem = F>, Ix1>,
        levels: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Self {
        Axial {
            center: center.to_owned(),
            levels: levels.to_owned(),
        }
    }
}

impl<F: Float> StratifiedDesign<F> for Axial<F> {
    fn center(&self) -> &Array1<F> {
        &self.center
    }

    fn levels(&self) -> &Array1<F> {
        &self.levels
    }

    fn n_points(&self) -> usize {
        1 + 2 * self.levels.len() * self.center.len()
    }

    /// Row 0 is the center; then for each level (outer) and each axis (inner),
    /// the positive offset point followed by the negative one.
    fn generate(&self) -> Array2<F> {
        let nx = self.center.len();
        let mut plane = Array2::zeros((self.n_points(), nx));
        plane.row_mut(0).assign(&self.center);
        let mut row = 1;
        for &level in self.levels.iter() {
            for axis in 0..nx {
                plane.row_mut(row).assign(&self.center);
                plane[[row, axis]] = self.center[axis] + level;
                row += 1;
                plane.row_mut(row).assign(&self.center);
                plane[[row, axis]] = self.center[axis] - level;
                row += 1;
            }
        }
        plane
    }
}
