/*!
This library implements deterministic design of experiments generators:
stratified planes built around a center point and combinatorial index
enumerations. Unlike sampling based methods, every design here is a pure
function of its inputs, there is no randomness involved.

A stratified design is defined by a `center` point and a vector of `levels`
(shell radii); it generates a plane as a 2D ndarray `(n_points, nx)` whose
first row is always the center.

Example:
```
use uqbox_doe::{Axial, Composite, Factorial, StratifiedDesign};
use ndarray::arr1;

// Designs centered at the origin of the plane with two shells.
let center = arr1(&[0., 0.]);
let levels = arr1(&[1., 2.]);
// Star shaped plane: center + 2 points per level and axis.
let plane = Axial::new(&center, &levels).generate();
assert_eq!(plane.nrows(), 9);
// Hypercube vertices: center + 4 vertices per level.
let plane = Factorial::new(&center, &levels).generate();
assert_eq!(plane.nrows(), 9);
// Union of both, center counted once.
let plane = Composite::new(&center, &levels).generate();
assert_eq!(plane.nrows(), 17);
```

This library contains three kinds of stratified designs:
* [Axial (star) designs](crate::Axial),
* [Full factorial designs](crate::Factorial),
* [Composite designs](crate::Composite),

and two combinatorial enumerations producing index collections consumed by
design of experiments users:
* [k-subsets in lexicographic order](crate::Combinations),
* [injective k-tuples](crate::KPermutations).
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod axial;
mod combinations;
mod composite;
mod factorial;
mod k_permutations;
mod traits;
mod utils;

pub use axial::*;
pub use combinations::*;
pub use composite::*;
pub use factorial::*;
pub use k_permutations::*;
pub use traits::*;
