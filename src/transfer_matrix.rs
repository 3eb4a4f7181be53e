#![warn(missing_docs)]
//! Ray transfer (ABCD) matrices
//!
//! A [`TransferMatrix`] maps the state `(height, angle)` of a [`Ray`] across one optical element:
//!
//! ```text
//! | height' |   | A  B |   | height |
//! |         | = |      | · |        |
//! | angle'  |   | C  D |   | angle  |
//! ```
//!
//! The coefficients are stored in SI base units, i.e. `B` in meters and `C` in 1/m. Angles are reduced angles `n·u`,
//! hence all physical elements built by the named constructors have a determinant of 1.0.
use std::{fmt::Display, ops::Mul};

use approx::abs_diff_eq;
use nalgebra::Matrix2;
use uom::si::{f64::Length, length::meter};

use crate::{
    error::{ParaxError, ParaxResult},
    ray::Ray,
};

/// A 2×2 ray transfer matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferMatrix {
    m: Matrix2<f64>,
}
impl Default for TransferMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
impl TransferMatrix {
    /// Creates a new [`TransferMatrix`] from its four coefficients (in SI base units).
    ///
    /// # Errors
    /// This function returns an error if any of the coefficients is `NaN` or infinite.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> ParaxResult<Self> {
        if !(a.is_finite() && b.is_finite() && c.is_finite() && d.is_finite()) {
            return Err(ParaxError::InvalidArgument(
                "matrix coefficients must be finite".into(),
            ));
        }
        Ok(Self {
            m: Matrix2::new(a, b, c, d),
        })
    }
    /// Returns the identity matrix which leaves every ray unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
        }
    }
    /// Matrix for the propagation through free space (or a homogeneous medium) of the given distance and refractive index.
    ///
    /// The matrix uses the reduced distance `d/n`.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - the distance is not finite
    ///  - the refractive index is zero or not finite
    pub fn free_space(distance: Length, index: f64) -> ParaxResult<Self> {
        if !distance.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "free space distance must be finite".into(),
            ));
        }
        check_index(index)?;
        Self::new(1.0, distance.get::<meter>() / index, 0.0, 1.0)
    }
    /// Matrix for the refraction at a spherical surface with the given radius between the media `n1` and `n2`.
    ///
    /// A planar surface is modeled by an infinite radius.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - the radius is zero or `NaN`
    ///  - one of the refractive indices is zero or not finite
    pub fn refraction(n1: f64, n2: f64, radius: Length) -> ParaxResult<Self> {
        check_index(n1)?;
        check_index(n2)?;
        if radius.value == 0.0 || radius.is_nan() {
            return Err(ParaxError::InvalidArgument(
                "radius of curvature must not be zero or NaN".into(),
            ));
        }
        Self::new(1.0, 0.0, -(n2 - n1) / radius.get::<meter>(), 1.0)
    }
    /// Matrix approximating a thin lens with the given focal length.
    ///
    /// # Errors
    /// This function returns an error if the focal length is zero or `NaN`.
    pub fn thin_lens(focal_length: Length) -> ParaxResult<Self> {
        if focal_length.value == 0.0 || focal_length.is_nan() {
            return Err(ParaxError::InvalidArgument(
                "focal length must not be zero or NaN".into(),
            ));
        }
        Self::new(1.0, 0.0, -1.0 / focal_length.get::<meter>(), 1.0)
    }
    /// Compose two matrices. `first` is applied first, so the result is the product `second · first`.
    #[must_use]
    pub fn compose(first: &Self, second: &Self) -> Self {
        *second * *first
    }
    /// Returns the `A` coefficient (dimensionless).
    #[must_use]
    pub fn a(&self) -> f64 {
        self.m[(0, 0)]
    }
    /// Returns the `B` coefficient (in m).
    #[must_use]
    pub fn b(&self) -> f64 {
        self.m[(0, 1)]
    }
    /// Returns the `C` coefficient (in 1/m).
    #[must_use]
    pub fn c(&self) -> f64 {
        self.m[(1, 0)]
    }
    /// Returns the `D` coefficient (dimensionless).
    #[must_use]
    pub fn d(&self) -> f64 {
        self.m[(1, 1)]
    }
    /// Returns the determinant `A·D − B·C`.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.a() * self.d() - self.b() * self.c()
    }
    /// Returns true if the determinant equals 1.0 within the given tolerance.
    #[must_use]
    pub fn is_unimodular(&self, tolerance: f64) -> bool {
        abs_diff_eq!(self.determinant(), 1.0, epsilon = tolerance)
    }
    /// Apply this matrix to the given [`Ray`].
    #[must_use]
    pub fn apply(&self, ray: &Ray) -> Ray {
        ray.transform(self)
    }
    pub(crate) const fn matrix(&self) -> &Matrix2<f64> {
        &self.m
    }
}
fn check_index(index: f64) -> ParaxResult<()> {
    if index == 0.0 || !index.is_finite() {
        return Err(ParaxError::InvalidArgument(
            "refractive index must be != 0.0 and finite".into(),
        ));
    }
    Ok(())
}
impl Mul for TransferMatrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self { m: self.m * rhs.m }
    }
}
impl Display for TransferMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[[{}, {}], [{}, {}]]",
            self.a(),
            self.b(),
            self.c(),
            self.d()
        )
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::{meter, millimeter};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;
    #[test]
    fn new() {
        let m = TransferMatrix::new(1.0, 2.0, 3.0, 4.0).unwrap();
        assert_eq!(m.a(), 1.0);
        assert_eq!(m.b(), 2.0);
        assert_eq!(m.c(), 3.0);
        assert_eq!(m.d(), 4.0);
        assert_matches!(
            TransferMatrix::new(f64::NAN, 0.0, 0.0, 1.0),
            Err(ParaxError::InvalidArgument(_))
        );
        assert!(TransferMatrix::new(1.0, f64::INFINITY, 0.0, 1.0).is_err());
        assert!(TransferMatrix::new(1.0, 0.0, f64::NEG_INFINITY, 1.0).is_err());
        assert!(TransferMatrix::new(1.0, 0.0, 0.0, f64::NAN).is_err());
    }
    #[test]
    fn identity() {
        let m = TransferMatrix::identity();
        assert_eq!(m, TransferMatrix::new(1.0, 0.0, 0.0, 1.0).unwrap());
        assert_eq!(TransferMatrix::default(), m);
        let ray = Ray::new(millimeter!(3.0), 0.02).unwrap();
        assert_eq!(m.apply(&ray), ray);
    }
    #[test]
    fn free_space() {
        let m = TransferMatrix::free_space(meter!(2.0), 1.0).unwrap();
        assert_eq!(m, TransferMatrix::new(1.0, 2.0, 0.0, 1.0).unwrap());
        let m = TransferMatrix::free_space(meter!(3.0), 1.5).unwrap();
        assert_relative_eq!(m.b(), 2.0);
        assert_matches!(
            TransferMatrix::free_space(meter!(1.0), 0.0),
            Err(ParaxError::InvalidArgument(_))
        );
        assert!(TransferMatrix::free_space(meter!(1.0), f64::NAN).is_err());
        assert!(TransferMatrix::free_space(meter!(f64::INFINITY), 1.0).is_err());
        assert!(TransferMatrix::free_space(meter!(-1.0), 1.0).is_ok());
    }
    #[test]
    fn refraction() {
        let m = TransferMatrix::refraction(1.0, 1.5, meter!(0.5)).unwrap();
        assert_relative_eq!(m.c(), -1.0);
        assert_eq!(m.a(), 1.0);
        assert_eq!(m.b(), 0.0);
        assert_eq!(m.d(), 1.0);
        let planar = TransferMatrix::refraction(1.0, 1.5, meter!(f64::INFINITY)).unwrap();
        assert_abs_diff_eq!(planar.c(), 0.0);
        assert_matches!(
            TransferMatrix::refraction(1.0, 1.5, meter!(0.0)),
            Err(ParaxError::InvalidArgument(_))
        );
        assert!(TransferMatrix::refraction(1.0, 1.5, meter!(f64::NAN)).is_err());
        assert!(TransferMatrix::refraction(0.0, 1.5, meter!(1.0)).is_err());
        assert!(TransferMatrix::refraction(1.0, f64::NAN, meter!(1.0)).is_err());
    }
    #[test]
    fn thin_lens() {
        let m = TransferMatrix::thin_lens(millimeter!(500.0)).unwrap();
        assert_relative_eq!(m.c(), -2.0);
        assert_matches!(
            TransferMatrix::thin_lens(meter!(0.0)),
            Err(ParaxError::InvalidArgument(_))
        );
        assert!(TransferMatrix::thin_lens(meter!(f64::NAN)).is_err());
        let flat = TransferMatrix::thin_lens(meter!(f64::INFINITY)).unwrap();
        assert_abs_diff_eq!(flat.c(), 0.0);
    }
    #[test]
    fn determinants() {
        let elements = vec![
            TransferMatrix::free_space(meter!(1.3), 1.0).unwrap(),
            TransferMatrix::free_space(meter!(0.2), 1.7).unwrap(),
            TransferMatrix::refraction(1.0, 1.5, millimeter!(51.5)).unwrap(),
            TransferMatrix::refraction(1.5, 1.0, millimeter!(-20.0)).unwrap(),
            TransferMatrix::thin_lens(millimeter!(100.0)).unwrap(),
            TransferMatrix::thin_lens(millimeter!(-35.0)).unwrap(),
        ];
        for m in &elements {
            assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = 1e-9);
            assert!(m.is_unimodular(1e-9));
        }
        let combined = elements
            .iter()
            .fold(TransferMatrix::identity(), |acc, m| TransferMatrix::compose(&acc, m));
        assert_abs_diff_eq!(combined.determinant(), 1.0, epsilon = 1e-9);
        let m = TransferMatrix::new(2.0, 0.0, 0.0, 1.0).unwrap();
        assert!(!m.is_unimodular(1e-9));
    }
    #[test]
    fn compose_free_space() {
        let d1 = TransferMatrix::free_space(meter!(0.3), 1.0).unwrap();
        let d2 = TransferMatrix::free_space(meter!(0.45), 1.0).unwrap();
        let sum = TransferMatrix::free_space(meter!(0.75), 1.0).unwrap();
        let composed = TransferMatrix::compose(&d1, &d2);
        assert_abs_diff_eq!(composed.a(), sum.a(), epsilon = 1e-12);
        assert_abs_diff_eq!(composed.b(), sum.b(), epsilon = 1e-12);
        assert_abs_diff_eq!(composed.c(), sum.c(), epsilon = 1e-12);
        assert_abs_diff_eq!(composed.d(), sum.d(), epsilon = 1e-12);
    }
    #[test]
    fn compose_order() {
        let lens = TransferMatrix::thin_lens(meter!(0.5)).unwrap();
        let gap = TransferMatrix::free_space(meter!(1.0), 1.0).unwrap();
        // gap first, then lens
        let m = TransferMatrix::compose(&gap, &lens);
        assert_eq!(m, lens * gap);
        assert_relative_eq!(m.a(), 1.0);
        assert_relative_eq!(m.b(), 1.0);
        assert_relative_eq!(m.c(), -2.0);
        assert_relative_eq!(m.d(), -1.0);
    }
    #[test]
    fn free_space_round_trip() {
        let ray = Ray::new(millimeter!(1.0), 0.03).unwrap();
        let forward = TransferMatrix::free_space(meter!(0.8), 1.0).unwrap();
        let backward = TransferMatrix::free_space(meter!(-0.8), 1.0).unwrap();
        let back = backward.apply(&forward.apply(&ray));
        assert_abs_diff_eq!(
            back.height().get::<meter>(),
            ray.height().get::<meter>(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(back.angle(), ray.angle(), epsilon = 1e-12);
    }
    #[test]
    fn display() {
        let m = TransferMatrix::new(1.0, 0.5, -2.0, 1.0).unwrap();
        assert_eq!(format!("{m}"), "[[1, 0.5], [-2, 1]]");
    }
}
