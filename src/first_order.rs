#![warn(missing_docs)]
//! Closed-form first-order (Gaussian) optics formulas.
//!
//! These are used to cross-check results derived from the system matrix of an
//! [`OpticalSystem`](crate::OpticalSystem).
use uom::si::{f64::Length, length::meter};

use crate::{
    error::{ParaxError, ParaxResult},
    meter,
};

fn non_zero(value: Length, name: &str) -> ParaxResult<f64> {
    let value = value.get::<meter>();
    if value == 0.0 || value.is_nan() {
        return Err(ParaxError::InvalidArgument(format!(
            "{name} must not be zero or NaN"
        )));
    }
    Ok(value)
}
fn focal_length_from_power(power: f64) -> ParaxResult<Length> {
    if power == 0.0 || !power.is_finite() {
        return Err(ParaxError::InvalidArgument(
            "system has no finite focal length".into(),
        ));
    }
    Ok(meter!(1.0 / power))
}

/// Effective focal length of a thick lens in air with the given surface radii, center thickness and refractive index.
///
/// # Errors
/// This function will return an error if
///  - a radius is zero or `NaN`
///  - the refractive index is zero or not finite
///  - the lens has zero power
pub fn thick_lens_efl(
    front_radius: Length,
    rear_radius: Length,
    center_thickness: Length,
    refractive_index: f64,
) -> ParaxResult<Length> {
    let c1 = 1.0 / non_zero(front_radius, "front radius")?;
    let c2 = 1.0 / non_zero(rear_radius, "rear radius")?;
    if refractive_index == 0.0 || !refractive_index.is_finite() {
        return Err(ParaxError::InvalidArgument(
            "refractive index must be != 0.0 and finite".into(),
        ));
    }
    let tau = center_thickness.get::<meter>() / refractive_index;
    let n_minus_one = refractive_index - 1.0;
    focal_length_from_power(n_minus_one * (c1 - c2 + n_minus_one * c1 * c2 * tau))
}
/// Effective focal length of two thin lenses separated by the given distance in air.
///
/// # Errors
/// This function will return an error if a focal length is zero or `NaN` or the combination has zero power.
pub fn two_lens_efl(
    first_focal_length: Length,
    second_focal_length: Length,
    separation: Length,
) -> ParaxResult<Length> {
    let phi1 = 1.0 / non_zero(first_focal_length, "focal length")?;
    let phi2 = 1.0 / non_zero(second_focal_length, "focal length")?;
    focal_length_from_power(phi1 + phi2 - phi1 * phi2 * separation.get::<meter>())
}
/// Image distance of a thin lens (`1/s' + 1/s = 1/f`) for an object at the given distance in front of the lens.
///
/// Both distances are counted positive (real object in front, real image behind the lens).
///
/// # Errors
/// This function will return an error if
///  - the object distance or the focal length is zero or `NaN`
///  - the object is located in the focal plane (image at infinity)
pub fn thin_lens_image_distance(
    object_distance: Length,
    focal_length: Length,
) -> ParaxResult<Length> {
    let object_distance = non_zero(object_distance, "object distance")?;
    let focal_length = non_zero(focal_length, "focal length")?;
    let vergence = 1.0 / focal_length - 1.0 / object_distance;
    if vergence == 0.0 {
        return Err(ParaxError::InvalidArgument(
            "object in the focal plane is imaged to infinity".into(),
        ));
    }
    Ok(meter!(1.0 / vergence))
}
