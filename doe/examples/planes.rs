use ndarray::arr1;
use uqbox_doe::{Axial, Combinations, Composite, Factorial, StratifiedDesign};

fn main() {
    let center = arr1(&[0., 0.]);
    let levels = arr1(&[1., 1.5]);

    println!("Stratified designs centered at {center} with levels {levels}\n");

    println!("*** axial (star) design");
    println!("{}\n", Axial::new(&center, &levels).generate());

    println!("*** full factorial design");
    println!("{}\n", Factorial::new(&center, &levels).generate());

    println!("*** composite design");
    println!("{}\n", Composite::new(&center, &levels).generate());

    println!("*** 2-subsets of 0..4");
    println!("{}", Combinations::new(2, 4).generate());
}
