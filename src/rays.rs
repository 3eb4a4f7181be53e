#![warn(missing_docs)]
//! Module for handling bundles of paraxial rays
use std::ops::Index;

use uom::si::{f64::Length, length::meter};

use crate::{
    error::{ParaxError, ParaxResult},
    meter,
    ray::Ray,
    utils::linspace,
};

/// Struct containing a bundle of [`Ray`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rays {
    rays: Vec<Ray>,
}
impl Rays {
    /// Create a ray fan: `count` rays starting at the same height with angles linearly spaced over
    /// `[angle_min, angle_max]` (both inclusive).
    ///
    /// For `count == 1` a single ray with `angle_min` is generated.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - `count` is zero
    ///  - the height or one of the angle limits is not finite
    pub fn fan(height: Length, angle_min: f64, angle_max: f64, count: usize) -> ParaxResult<Self> {
        if count < 1 {
            return Err(ParaxError::InvalidArgument(
                "number of rays in a fan must be >= 1".into(),
            ));
        }
        let rays = linspace(angle_min, angle_max, count)?
            .into_iter()
            .map(|angle| Ray::new(height, angle))
            .collect::<ParaxResult<Vec<Ray>>>()?;
        Ok(Self { rays })
    }
    /// Create a collimated bundle: `count` rays with a common angle and heights linearly spaced over
    /// `[height_min, height_max]` (both inclusive).
    ///
    /// # Errors
    /// This function returns an error if
    ///  - `count` is zero
    ///  - the angle or one of the height limits is not finite
    pub fn collimated(
        height_min: Length,
        height_max: Length,
        count: usize,
        angle: f64,
    ) -> ParaxResult<Self> {
        if count < 1 {
            return Err(ParaxError::InvalidArgument(
                "number of rays in a bundle must be >= 1".into(),
            ));
        }
        let rays = linspace(height_min.get::<meter>(), height_max.get::<meter>(), count)?
            .into_iter()
            .map(|height| Ray::new(meter!(height), angle))
            .collect::<ParaxResult<Vec<Ray>>>()?;
        Ok(Self { rays })
    }
    /// Add a single [`Ray`] to this bundle.
    pub fn add_ray(&mut self, ray: Ray) {
        self.rays.push(ray);
    }
    /// Returns the number of rays in this bundle.
    #[must_use]
    pub fn nr_of_rays(&self) -> usize {
        self.rays.len()
    }
    /// Returns true if this bundle does not contain any ray.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }
    /// Returns an iterator over the contained rays.
    pub fn iter(&self) -> std::slice::Iter<'_, Ray> {
        self.rays.iter()
    }
}
impl From<Vec<Ray>> for Rays {
    fn from(rays: Vec<Ray>) -> Self {
        Self { rays }
    }
}
impl Index<usize> for Rays {
    type Output = Ray;

    fn index(&self, index: usize) -> &Ray {
        &self.rays[index]
    }
}
impl IntoIterator for Rays {
    type Item = Ray;
    type IntoIter = std::vec::IntoIter<Ray>;

    fn into_iter(self) -> Self::IntoIter {
        self.rays.into_iter()
    }
}
impl<'a> IntoIterator for &'a Rays {
    type Item = &'a Ray;
    type IntoIter = std::slice::Iter<'a, Ray>;

    fn into_iter(self) -> Self::IntoIter {
        self.rays.iter()
    }
}
