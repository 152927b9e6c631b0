use crate::utils::binomial;
use ndarray::Array2;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Enumerates every k-subset of {0, ..., n-1} in lexicographic order.
///
/// Each generated row is a strictly increasing sequence of k indices.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Combinations {
    /// Subset size
    k: usize,
    /// Universe size
    n: usize,
}

impl Combinations {
    /// Constructor given the subset size `k` and the universe size `n`
    ///
    /// ```
    /// use uqbox_doe::Combinations;
    ///
    /// let combinations = Combinations::new(2, 4);
    /// assert_eq!(combinations.size(), 6);
    /// ```
    pub fn new(k: usize, n: usize) -> Self {
        Combinations { k, n }
    }

    /// Subset size
    pub fn k(&self) -> usize {
        self.k
    }

    /// Universe size
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of generated rows, the binomial coefficient C(n, k)
    pub fn size(&self) -> usize {
        binomial(self.n, self.k)
    }

    /// Generates the full enumeration as a (C(n, k), k) array of indices.
    ///
    /// `k > n` yields an empty (0, k) array, `k == 0` a single empty row.
    /// Rows are emitted in lexicographic order using the constant amortized
    /// cost successor rule: find the rightmost index that can be incremented
    /// without colliding with its upper bound, increment it and reset every
    /// index after it to consecutive values.
    pub fn generate(&self) -> Array2<usize> {
        let (k, n) = (self.k, self.n);
        if k > n {
            return Array2::zeros((0, k));
        }
        let size = self.size();
        let mut collection = Array2::zeros((size, k));
        let mut current: Vec<usize> = (0..k).collect();
        for row in 0..size {
            for (col, &index) in current.iter().enumerate() {
                collection[[row, col]] = index;
            }
            if row + 1 == size {
                break;
            }
            let mut t = k - 1;
            while current[t] == n - k + t {
                t -= 1;
            }
            current[t] += 1;
            for i in t + 1..k {
                current[i] = current[i - 1] + 1;
            }
        }
        collection
    }
}
