use crate::{Axial, Factorial, StratifiedDesign};
use linfa::Float;
use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix1};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// The composite design is the union of the [Factorial] and [Axial] planes
/// sharing the same center and levels, with the duplicate center row removed.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Composite<F: Float> {
    /// Center of the design
    center: Array1<F>,
    /// Level radii shared by the factorial and axial parts
    levels: Array1<F>,
}

impl<F: Float> Composite<F> {
    /// Constructor given a center point and level radii
    ///
    /// ```
    /// use uqbox_doe::{Composite, StratifiedDesign};
    /// use ndarray::arr1;
    ///
    /// let plane = Composite::new(&arr1(&[0., 0.]), &arr1(&[1., 2.])).generate();
    /// assert_eq!(plane.nrows(), 17);
    /// ```
    pub fn new(
        center: &ArrayBase<impl Data<Elem = F>, Ix1>,
        levels: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Self {
        Composite {
            center: center.to_owned(),
            levels: levels.to_owned(),
        }
    }
}

impl<F: Float> StratifiedDesign<F> for Composite<F> {
    fn center(&self) -> &Array1<F> {
        &self.center
    }

    fn levels(&self) -> &Array1<F> {
        &self.levels
    }

    fn n_points(&self) -> usize {
        let nx = self.center.len();
        1 + self.levels.len() * (2 * nx + (1 << nx))
    }

    /// The factorial plane first, center row included, then the axial plane
    /// stripped of its center row. Both parts share center and levels so the
    /// center appears exactly once.
    fn generate(&self) -> Array2<F> {
        let factorial = Factorial::new(&self.center, &self.levels).generate();
        let axial = Axial::new(&self.center, &self.levels).generate();
        let mut plane = Array2::zeros((self.n_points(), self.center.len()));
        plane
            .slice_mut(s![..factorial.nrows(), ..])
            .assign(&factorial);
        plane
            .slice_mut(s![factorial.nrows().., ..])
            .assign(&axial.slice(s![1.., ..]));
        plane
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, array};

    #[test]
    fn test_composite_unit() {
        let plane = Composite::new(&arr1(&[0., 0.]), &arr1(&[1.])).generate();
        let expected = array![
            [0., 0.],
            [-1., -1.],
            [1., -1.],
            [-1., 1.],
            [1., 1.],
            [1., 0.],
            [-1., 0.],
            [0., 1.],
            [0., -1.]
        ];
        assert_eq!(expected, plane);
    }

    #[test]
    fn test_composite_row_count() {
        let center = arr1(&[0., 1., 2.]);
        let levels = arr1(&[1., 2.5]);
        let composite = Composite::new(&center, &levels);
        let factorial = Factorial::new(&center, &levels);
        let axial = Axial::new(&center, &levels);
        assert_eq!(
            composite.n_points(),
            factorial.n_points() + axial.n_points() - 1
        );
        assert_eq!(composite.generate().nrows(), composite.n_points());
    }

    #[test]
    fn test_composite_is_union_of_parts() {
        let center = arr1(&[-1., 3.]);
        let levels = arr1(&[0.5, 2.]);
        let plane = Composite::new(&center, &levels).generate();
        let factorial = Factorial::new(&center, &levels).generate();
        let axial = Axial::new(&center, &levels).generate();
        assert_eq!(plane.slice(s![..factorial.nrows(), ..]), factorial);
        assert_eq!(
            plane.slice(s![factorial.nrows().., ..]),
            axial.slice(s![1.., ..])
        );
    }
}
