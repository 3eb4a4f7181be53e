#![warn(missing_docs)]
//! Module for handling paraxial rays
//!
//! A paraxial [`Ray`] is described by its height above the optical axis and its (reduced) angle `n·u`, where
//! `u ≈ dy/dz` is the small-angle slope of the ray. In air (`n = 1.0`) the angle is thus simply the ray slope.
use std::fmt::Display;

use log::warn;
use nalgebra::Vector2;
use num::Zero;
use serde::Serialize;
use uom::si::{
    f64::Length,
    length::{meter, millimeter},
};

use crate::{
    error::{ParaxError, ParaxResult},
    meter,
    transfer_matrix::TransferMatrix,
};

/// Largest absolute angle (in paraxial units) for which the small-angle approximation is considered valid.
pub const PARAXIAL_ANGLE_LIMIT: f64 = 0.1;

/// Returns true if the given angle lies within the paraxial regime (`|angle| <= PARAXIAL_ANGLE_LIMIT`).
#[must_use]
pub fn is_paraxial_angle(angle: f64) -> bool {
    angle.abs() <= PARAXIAL_ANGLE_LIMIT
}

/// Struct that contains all information about a paraxial ray.
///
/// A [`Ray`] is immutable. Propagating it through a [`TransferMatrix`] creates a new [`Ray`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ray {
    /// height above the optical axis
    height: Length,
    /// reduced paraxial angle
    angle: f64,
    /// weight (energy tag) of the ray
    weight: f64,
}
impl Ray {
    /// Creates a new [`Ray`] with a weight of 1.0.
    ///
    /// A warning is logged if the angle is outside the paraxial regime.
    ///
    /// # Errors
    /// This function returns an error if the height or the angle is `NaN` or infinite.
    pub fn new(height: Length, angle: f64) -> ParaxResult<Self> {
        Self::new_with_weight(height, angle, 1.0)
    }
    /// Creates a new [`Ray`] with a given weight.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - the height or the angle is `NaN` or infinite
    ///  - the weight is < 0.0, `NaN` or infinite
    pub fn new_with_weight(height: Length, angle: f64, weight: f64) -> ParaxResult<Self> {
        if !height.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "ray height must be finite".into(),
            ));
        }
        if !angle.is_finite() {
            return Err(ParaxError::InvalidArgument("ray angle must be finite".into()));
        }
        if weight < 0.0 || !weight.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "ray weight must be >= 0.0 and finite".into(),
            ));
        }
        if !is_paraxial_angle(angle) {
            warn!("ray angle {angle} exceeds the paraxial regime (|angle| <= {PARAXIAL_ANGLE_LIMIT})");
        }
        Ok(Self {
            height,
            angle,
            weight,
        })
    }
    /// Create a ray starting on the optical axis with the given angle.
    ///
    /// # Errors
    /// This function returns an error if the angle is `NaN` or infinite.
    pub fn on_axis(angle: f64) -> ParaxResult<Self> {
        Self::new(Length::zero(), angle)
    }
    /// Returns the height of this [`Ray`].
    #[must_use]
    pub const fn height(&self) -> Length {
        self.height
    }
    /// Returns the (reduced) angle of this [`Ray`].
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }
    /// Returns the weight of this [`Ray`].
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }
    /// Returns true if the angle of this [`Ray`] lies within the paraxial regime.
    #[must_use]
    pub fn is_paraxial(&self) -> bool {
        is_paraxial_angle(self.angle)
    }
    /// Returns the state of this [`Ray`] as vector `(height in m, angle)`.
    #[must_use]
    pub fn state_vector(&self) -> Vector2<f64> {
        Vector2::new(self.height.get::<meter>(), self.angle)
    }
    /// Transform this [`Ray`] by the given [`TransferMatrix`] and return the resulting [`Ray`].
    ///
    /// The weight is carried over unchanged. No validity checks are performed on the result.
    #[must_use]
    pub fn transform(&self, matrix: &TransferMatrix) -> Self {
        let state = matrix.matrix() * self.state_vector();
        Self {
            height: meter!(state[0]),
            angle: state[1],
            weight: self.weight,
        }
    }
    pub(crate) fn is_finite(&self) -> bool {
        self.height.is_finite() && self.angle.is_finite()
    }
}
impl Display for Ray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "height: {:.6} mm, angle: {:.6}, weight: {}",
            self.height.get::<millimeter>(),
            self.angle,
            self.weight
        )
    }
}
