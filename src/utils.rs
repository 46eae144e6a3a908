#[allow(unused)]
use crate::prelude::*;

#[macro_export]
macro_rules! Model {
    (input_shape $i:expr ,$(dense $x:expr, activation $a:expr),*) => {
        {
            let sizes = vec![$i, $($x),*];
            let activations = vec![$($a),*];
            $crate::models::Sequential::from_sizes(&sizes, Some(&activations))
        }
    };
}
