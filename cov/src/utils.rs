use linfa::Float;
use ndarray::{s, Array2, ArrayBase, Data, Ix2};

/// Computes the Kronecker product `a ⊗ b`.
///
/// For `a` of shape (ma, na) and `b` of shape (mb, nb), the product has shape
/// (ma·mb, na·nb) and block structure: block (i, j) is `a[i, j] * b`. Zero
/// entries of `a` leave their block untouched, so lower triangular factors
/// yield a lower triangular product.
pub fn kron<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix2>,
    b: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Array2<F> {
    let (ma, na) = a.dim();
    let (mb, nb) = b.dim();
    let mut product = Array2::zeros((ma * mb, na * nb));
    for i in 0..ma {
        for j in 0..na {
            let a_ij = a[[i, j]];
            if a_ij == F::zero() {
                continue;
            }
            product
                .slice_mut(s![i * mb..(i + 1) * mb, j * nb..(j + 1) * nb])
                .assign(&(b * a_ij));
        }
    }
    product
}

/// Maps a flat lower triangle index back to its (row, col) pair.
///
/// The lower triangle is enumerated row major: the flat index of (r, c) with
/// c <= r is r(r+1)/2 + c, hence r is recovered by inverting the triangular
/// numbers. Covers the full triangle of any matrix whose flat length stays
/// within the exact integer range of f64.
pub(crate) fn triangular_indices(index: usize) -> (usize, usize) {
    let row = ((2. * index as f64 + 0.25).sqrt() - 0.5).floor() as usize;
    let col = index - row * (row + 1) / 2;
    (row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_triangular_indices_round_trip() {
        // exhaustive over the first 100 rows
        for row in 0..100 {
            for col in 0..=row {
                let flat = row * (row + 1) / 2 + col;
                assert_eq!(triangular_indices(flat), (row, col));
            }
        }
    }

    #[test]
    fn test_kron() {
        let a = array![[1., 2.], [3., 4.]];
        let b = array![[0., 5.], [6., 7.]];
        let expected = array![
            [0., 5., 0., 10.],
            [6., 7., 12., 14.],
            [0., 15., 0., 20.],
            [18., 21., 24., 28.]
        ];
        assert_eq!(expected, kron(&a, &b));
    }

    #[test]
    fn test_kron_of_triangular_factors_is_triangular() {
        let a = array![[2., 0.], [1., 3.]];
        let b = array![[1., 0., 0.], [4., 5., 0.], [6., 7., 8.]];
        let product = kron(&a, &b);
        assert_eq!(product.dim(), (6, 6));
        for i in 0..6 {
            for j in (i + 1)..6 {
                assert_eq!(product[[i, j]], 0.);
            }
        }
    }

    #[test]
    fn test_kron_identity() {
        let eye = Array2::<f64>::eye(2);
        let b = array![[1., 2.], [3., 4.]];
        let product = kron(&eye, &b);
        let expected = array![
            [1., 2., 0., 0.],
            [3., 4., 0., 0.],
            [0., 0., 1., 2.],
            [0., 0., 3., 4.]
        ];
        assert_eq!(expected, product);
    }
}
