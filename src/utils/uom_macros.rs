#![warn(missing_docs)]
//! Module for additional uom macros that facilitate the creation of single length values or vectors of them
/// helper macro to create the units
#[macro_export]
macro_rules! uom_unit_creator {
    ($unit:ident, $unit_type:ident, $val1:expr) => {
        $unit_type::new::<$unit>($val1)
    };
    ($unit:ident, $unit_type:ident, $( $x:expr ),*) => {
        {
            use std::vec::Vec;
            let mut temp_vec = Vec::new();
            $(
                temp_vec.push($unit_type::new::<$unit>($x));
            )*
            temp_vec
        }
    };
}

///macro to create a Length in meter
#[macro_export]
macro_rules! meter {
    ($( $x:expr ),*) =>{
        {
            use uom::si::{f64::Length, length::meter};
            $crate::uom_unit_creator![meter, Length, $( $x ),*]
        }
    };
}
///macro to create a Length in millimeter
#[macro_export]
macro_rules! millimeter {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::millimeter};
        $crate::uom_unit_creator![millimeter, Length, $( $x ),*]
    }};
}
