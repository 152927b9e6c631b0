use linfa::Float;
use ndarray::{Array1, Array2};

/// A deterministic experiment design organized as concentric levels around a center point
///
/// A stratified design is defined by a `center` point of dimension `nx` and a
/// `levels` vector of `nl` radii. Each design kind places points on the shells
/// given by the levels following its own geometric rule, and always includes
/// the center itself as the first row of the generated plane.
pub trait StratifiedDesign<F: Float> {
    /// Returns the center of the design
    fn center(&self) -> &Array1<F>;

    /// Returns the level radii of the design, one shell of points per level
    fn levels(&self) -> &Array1<F>;

    /// Number of rows of the generated plane
    fn n_points(&self) -> usize;

    /// Generates the design plane
    ///
    /// # Returns
    ///
    /// * A (n_points, nx) matrix of points where nx is the dimension of the center.
    ///   Row 0 is the center, further rows are laid out level-major in the
    ///   order documented by each design kind.
    fn generate(&self) -> Array2<F>;

    /// Dimension of the generated points
    fn dimension(&self) -> usize {
        self.center().len()
    }

    /// Number of levels of the design
    fn n_levels(&self) -> usize {
        self.levels().len()
    }
}
