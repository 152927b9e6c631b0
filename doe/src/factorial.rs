use crate::StratifiedDesign;
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// The full factorial design consists of the center point plus, for each level,
/// every vertex of the nx-dimensional hypercube of half width the level radius.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Factorial<F: Float> {
    /// Center of the design
    center: Array1<F>,
    /// Level radii, one shell of 2^nx vertices per level
    levels: Array1<F>,
}

impl<F: Float> Factorial<F> {
    /// Constructor given a center point and level radii
    ///
    /// ```
    /// use uqbox_doe::{Factorial, StratifiedDesign};
    /// use ndarray::arr1;
    ///
    /// let plane = Factorial::new(&arr1(&[0., 0.]), &arr1(&[2.])).generate();
    /// assert_eq!(plane.nrows(), 5);
    /// ```
    pub fn new(
        center: &ArrayBase<impl Data<Elem = F>, Ix1>,
        levels: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Self {
        Factorial {
            center: center.to_owned(),
            levels: levels.to_owned(),
        }
    }
}

impl<F: Float> StratifiedDesign<F> for Factorial<F> {
    fn center(&self) -> &Array1<F> {
        &self.center
    }

    fn levels(&self) -> &Array1<F> {
        &self.levels
    }

    fn n_points(&self) -> usize {
        1 + self.levels.len() * (1 << self.center.len())
    }

    /// Row 0 is the center; then for each level, the 2^nx hypercube vertices
    /// in binary counting order of the vertex index: bit c of the index set
    /// means coordinate c is offset by +level, clear means -level.
    fn generate(&self) -> Array2<F> {
        let nx = self.center.len();
        let n_vertices = 1_usize << nx;
        let mut plane = Array2::zeros((self.n_points(), nx));
        plane.row_mut(0).assign(&self.center);
        let mut row = 1;
        for &level in self.levels.iter() {
            for vertex in 0..n_vertices {
                for coord in 0..nx {
                    let offset = if (vertex >> coord) & 1 == 1 {
                        level
                    } else {
                        -level
                    };
                    plane[[row, coord]] = self.center[coord] + offset;
                }
                row += 1;
            }
        }
        plane
    }
}
