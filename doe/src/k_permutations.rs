use crate::utils::{falling_factorial, next_permutation};
use crate::Combinations;
use ndarray::Array2;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Enumerates every injective k-tuple over {0, ..., n-1}, that is the
/// n!/(n-k)! ordered arrangements of k distinct indices.
///
/// Tuples are generated subset by subset: for each k-subset taken in
/// [Combinations] order, all k! orderings of that subset follow in
/// lexicographic order.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct KPermutations {
    /// Tuple size
    k: usize,
    /// Universe size
    n: usize,
}

impl KPermutations {
    /// Constructor given the tuple size `k` and the universe size `n`.
    ///
    /// Panics when `k > n`.
    ///
    /// ```
    /// use uqbox_doe::KPermutations;
    ///
    /// let permutations = KPermutations::new(2, 4);
    /// assert_eq!(permutations.size(), 12);
    /// ```
    pub fn new(k: usize, n: usize) -> Self {
        if k > n {
            panic!("tuple size must not exceed universe size, got k={k} n={n}");
        }
        KPermutations { k, n }
    }

    /// Tuple size
    pub fn k(&self) -> usize {
        self.k
    }

    /// Universe size
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of generated rows, the falling factorial n!/(n-k)!
    pub fn size(&self) -> usize {
        falling_factorial(self.n, self.k)
    }

    /// Generates the full enumeration as a (n!/(n-k)!, k) array of indices.
    pub fn generate(&self) -> Array2<usize> {
        let k = self.k;
        let mut collection = Array2::zeros((self.size(), k));
        if k == 0 {
            return collection;
        }
        let subsets = Combinations::new(k, self.n).generate();
        let mut row = 0;
        for subset in subsets.rows() {
            let mut permutation = subset.to_vec();
            loop {
                for (col, &index) in permutation.iter().enumerate() {
                    collection[[row, col]] = index;
                }
                row += 1;
                if !next_permutation(&mut permutation) {
                    break;
                }
            }
        }
        debug_assert_eq!(row, collection.nrows());
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_k_permutations_2_out_of_3() {
        let collection = KPermutations::new(2, 3).generate();
        let expected = array![[0, 1], [1, 0], [0, 2], [2, 0], [1, 2], [2, 1]];
        assert_eq!(expected, collection);
    }

    #[test]
    fn test_k_permutations_full() {
        let collection = KPermutations::new(3, 3).generate();
        let expected = array![
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0]
        ];
        assert_eq!(expected, collection);
    }

    #[test]
    fn test_k_permutations_rows_are_injective_and_distinct() {
        let permutations = KPermutations::new(3, 5);
        let collection = permutations.generate();
        assert_eq!(collection.nrows(), permutations.size());
        assert_eq!(collection.nrows(), 60);
        let mut rows: Vec<Vec<usize>> =
            collection.rows().into_iter().map(|r| r.to_vec()).collect();
        for row in &rows {
            let mut sorted = row.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), 3);
            assert!(row.iter().all(|&i| i < 5));
        }
        rows.sort();
        rows.dedup();
        assert_eq!(rows.len(), 60);
    }

    #[test]
    fn test_k_permutations_empty_tuple() {
        let collection = KPermutations::new(0, 4).generate();
        assert_eq!(collection.dim(), (1, 0));
    }

    #[test]
    #[should_panic]
    fn test_k_permutations_oversized_tuple() {
        KPermutations::new(4, 3);
    }
}
