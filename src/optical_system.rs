#![warn(missing_docs)]
//! The optical system and the propagation algorithm.
//!
//! An [`OpticalSystem`] owns an ordered sequence of [`Element`]s and a set of starting [`Ray`]s. Each element
//! contributes a relative axial thickness. The system keeps the absolute location behind each element, either as given
//! by the caller or advanced by the element thickness.
//!
//! # Example
//!
//! ```rust
//! use paraxial::{meter, OpticalSystem, Ray};
//! use paraxial::optical_system::RayId;
//!
//! let mut system = OpticalSystem::new("focal point imaging");
//! let id = system.add_ray(Ray::on_axis(0.05).unwrap());
//! system.add_free_space(meter!(1.0), 1.0).unwrap();
//! system.add_thin_lens(meter!(0.5)).unwrap();
//! system.add_free_space(meter!(1.0), 1.0).unwrap();
//! let table = system.propagate().unwrap();
//! assert_eq!(table.num_planes(), 4);
//! assert!(table.state(id, 3).unwrap().height().value.abs() < 1e-9);
//! ```
use std::fmt::Display;

use approx::abs_diff_eq;
use log::{debug, info, warn};
use num::Zero;
use rayon::prelude::*;
use serde::Serialize;
use uom::si::{f64::Length, length::meter};

use crate::{
    element::{Element, ElementKind},
    error::{ParaxError, ParaxResult},
    meter,
    ray::{Ray, PARAXIAL_ANGLE_LIMIT},
    rays::Rays,
    result_table::ResultTable,
    transfer_matrix::TransferMatrix,
};

/// Systems with an absolute power (in 1/m) below this value are considered afocal.
pub const AFOCAL_POWER_TOLERANCE: f64 = 1e-12;
/// Largest accepted difference (in m) between the distance of a free-space element and the gap to its location.
pub const LOCATION_TOLERANCE: f64 = 1e-9;

/// Stable index of a starting ray within an [`OpticalSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RayId(usize);
impl RayId {
    /// Returns the index of the ray.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}
impl From<usize> for RayId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
impl Display for RayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ray {}", self.0)
    }
}

/// The optical model: starting rays and an ordered sequence of elements.
#[derive(Debug, Clone, Default)]
pub struct OpticalSystem {
    description: String,
    rays: Vec<Ray>,
    elements: Vec<Element>,
    /// absolute location behind each element
    locations: Vec<Length>,
    result: Option<ResultTable>,
}
impl OpticalSystem {
    /// Creates a new empty [`OpticalSystem`] with the given description.
    #[must_use]
    pub fn new(description: &str) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }
    /// Returns the description of this [`OpticalSystem`].
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
    /// Sets the description of this [`OpticalSystem`].
    pub fn set_description(&mut self, description: &str) {
        self.description = description.into();
    }
    /// Add a starting [`Ray`] and return its [`RayId`].
    pub fn add_ray(&mut self, ray: Ray) -> RayId {
        self.result = None;
        self.rays.push(ray);
        RayId(self.rays.len() - 1)
    }
    /// Add all rays of a bundle and return their [`RayId`]s.
    pub fn add_rays(&mut self, rays: Rays) -> Vec<RayId> {
        rays.into_iter().map(|ray| self.add_ray(ray)).collect()
    }
    /// Returns the starting ray with the given [`RayId`].
    #[must_use]
    pub fn ray(&self, id: RayId) -> Option<&Ray> {
        self.rays.get(id.0)
    }
    /// Returns all starting rays.
    #[must_use]
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }
    /// Returns all elements in propagation order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
    /// Returns the axial location of the last plane.
    #[must_use]
    pub fn total_length(&self) -> Length {
        self.locations.last().copied().unwrap_or_else(Length::zero)
    }
    /// Append a matrix located at the given absolute axial position.
    ///
    /// The element thickness is the distance between the previous location and the given one. The given location is
    /// stored as is and reported by [`OpticalSystem::cumulative_locations`].
    ///
    /// # Errors
    /// This function will return an error if
    ///  - the location is not finite (`InvalidArgument`)
    ///  - the location is smaller than the location of the previous element (`InvalidState`)
    pub fn add_element(&mut self, matrix: TransferMatrix, location: Length) -> ParaxResult<()> {
        let thickness = self.thickness_up_to(location)?;
        self.push_element(Element::from_matrix(matrix, thickness)?, location);
        Ok(())
    }
    /// Append an element of the given kind located at the given absolute axial position.
    ///
    /// For a free-space element the gap to the previous location must match its distance (within
    /// [`LOCATION_TOLERANCE`]).
    ///
    /// # Errors
    /// This function will return an error if
    ///  - the element parameters are invalid or the location is not finite (`InvalidArgument`)
    ///  - the location is smaller than the location of the previous element (`InvalidState`)
    ///  - the gap does not match the distance of a free-space element (`InvalidState`)
    pub fn add_at(&mut self, kind: ElementKind, location: Length) -> ParaxResult<()> {
        let thickness = self.thickness_up_to(location)?;
        if let ElementKind::FreeSpace { distance, .. } = &kind {
            if !abs_diff_eq!(
                thickness.get::<meter>(),
                distance.get::<meter>(),
                epsilon = LOCATION_TOLERANCE
            ) {
                return Err(ParaxError::InvalidState(format!(
                    "free space distance ({} m) does not match the gap to its location ({} m)",
                    distance.get::<meter>(),
                    thickness.get::<meter>()
                )));
            }
        }
        self.push_element(Element::new(kind, thickness)?, location);
        Ok(())
    }
    fn thickness_up_to(&self, location: Length) -> ParaxResult<Length> {
        if !location.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "element location must be finite".into(),
            ));
        }
        let end = self.total_length();
        if location < end {
            return Err(ParaxError::InvalidState(format!(
                "element location ({} m) is smaller than the previous location ({} m)",
                location.get::<meter>(),
                end.get::<meter>()
            )));
        }
        Ok(location - end)
    }
    /// Append a matrix with the given axial thickness.
    ///
    /// # Errors
    /// This function will return an error if the thickness is negative or not finite.
    pub fn add_element_with_thickness(
        &mut self,
        matrix: TransferMatrix,
        thickness: Length,
    ) -> ParaxResult<()> {
        self.push_end(Element::from_matrix(matrix, thickness)?);
        Ok(())
    }
    /// Append an element of the given kind using its natural thickness.
    ///
    /// # Errors
    /// This function will return an error if
    ///  - the element parameters are invalid (`InvalidArgument`)
    ///  - the element would move the axial location backwards, e.g. a negative free-space distance (`InvalidState`)
    pub fn add(&mut self, kind: ElementKind) -> ParaxResult<()> {
        let thickness = kind.natural_thickness();
        if thickness.value < 0.0 {
            return Err(ParaxError::InvalidState(format!(
                "element {kind} would move the axial location backwards"
            )));
        }
        self.push_end(Element::new(kind, thickness)?);
        Ok(())
    }
    /// Append a free-space propagation of the given distance in a medium with the given refractive index.
    ///
    /// # Errors
    /// See [`OpticalSystem::add`].
    pub fn add_free_space(&mut self, distance: Length, index: f64) -> ParaxResult<()> {
        self.add(ElementKind::FreeSpace { distance, index })
    }
    /// Append a refracting surface.
    ///
    /// # Errors
    /// See [`OpticalSystem::add`].
    pub fn add_refraction(&mut self, n1: f64, n2: f64, radius: Length) -> ParaxResult<()> {
        self.add(ElementKind::Refraction { n1, n2, radius })
    }
    /// Append a thin lens.
    ///
    /// # Errors
    /// See [`OpticalSystem::add`].
    pub fn add_thin_lens(&mut self, focal_length: Length) -> ParaxResult<()> {
        self.add(ElementKind::ThinLens { focal_length })
    }
    /// Append a thick singlet lens: front surface, glass of the given center thickness, rear surface.
    ///
    /// Nothing is added if one of the three elements is invalid.
    ///
    /// # Errors
    /// This function will return an error if the radii, indices or the thickness are invalid.
    pub fn add_thick_lens(
        &mut self,
        n_lens: f64,
        front_radius: Length,
        rear_radius: Length,
        center_thickness: Length,
        n_ambient: f64,
    ) -> ParaxResult<()> {
        let elements = [
            Element::from_kind(ElementKind::Refraction {
                n1: n_ambient,
                n2: n_lens,
                radius: front_radius,
            })?,
            Element::from_kind(ElementKind::FreeSpace {
                distance: center_thickness,
                index: n_lens,
            })?,
            Element::from_kind(ElementKind::Refraction {
                n1: n_lens,
                n2: n_ambient,
                radius: rear_radius,
            })?,
        ];
        for element in elements {
            self.push_end(element);
        }
        Ok(())
    }
    /// Append an element directly behind the current end of the system.
    fn push_end(&mut self, element: Element) {
        let location = self.total_length() + element.thickness();
        self.push_element(element, location);
    }
    fn push_element(&mut self, element: Element, location: Length) {
        debug!(
            "adding element #{} ({}) with thickness {} m at {} m",
            self.elements.len(),
            element.kind(),
            element.thickness().get::<meter>(),
            location.get::<meter>()
        );
        self.result = None;
        self.elements.push(element);
        self.locations.push(location);
    }
    /// Returns the axial locations of all planes: the start plane (at zero) followed by the location behind each element.
    ///
    /// Locations given to [`OpticalSystem::add_element`] or [`OpticalSystem::add_at`] are returned unchanged, all
    /// other elements advance the previous location by their thickness. The locations are only used for reporting.
    /// They do not enter the propagation itself.
    #[must_use]
    pub fn cumulative_locations(&self) -> Vec<Length> {
        let mut locations = Vec::with_capacity(self.locations.len() + 1);
        locations.push(Length::zero());
        locations.extend_from_slice(&self.locations);
        locations
    }
    /// Propagate all starting rays through all elements.
    ///
    /// The state of ray `i` at plane `j + 1` is `M_j · state(i, j)`, with the starting ray at plane 0. The
    /// computation is done from scratch on every call, rays are traced in parallel. The rays and elements are not
    /// modified, only the stored [`ResultTable`] is replaced.
    ///
    /// A warning is logged if propagated states leave the paraxial regime.
    ///
    /// # Errors
    /// This function will return an error if a ray state becomes non-finite (e.g. by overflow).
    pub fn propagate(&mut self) -> ParaxResult<&ResultTable> {
        info!(
            "propagating {} ray(s) through {} element(s)",
            self.rays.len(),
            self.elements.len()
        );
        let traces: Vec<Vec<Ray>> = self
            .rays
            .par_iter()
            .map(|ray| trace_ray(ray, &self.elements))
            .collect();
        for (ray_index, trace) in traces.iter().enumerate() {
            if let Some(plane) = trace.iter().position(|state| !state.is_finite()) {
                return Err(ParaxError::InvalidState(format!(
                    "state of ray {ray_index} is not finite at plane {plane}"
                )));
            }
        }
        let non_paraxial = traces
            .iter()
            .flat_map(|trace| trace.iter().skip(1))
            .filter(|state| !state.is_paraxial())
            .count();
        if non_paraxial > 0 {
            warn!(
                "{non_paraxial} propagated ray state(s) exceed the paraxial regime (|angle| <= {PARAXIAL_ANGLE_LIMIT})"
            );
        }
        let table = ResultTable::new(traces, self.cumulative_locations())?;
        Ok(&*self.result.insert(table))
    }
    /// Returns the result of the last propagation, if the system has not been modified since.
    #[must_use]
    pub const fn result(&self) -> Option<&ResultTable> {
        self.result.as_ref()
    }
    /// Returns the composition of all element matrices (identity for an empty system).
    #[must_use]
    pub fn system_matrix(&self) -> TransferMatrix {
        self.elements
            .iter()
            .fold(TransferMatrix::identity(), |system, element| {
                TransferMatrix::compose(&system, element.matrix())
            })
    }
    /// Returns the optical power of the system in diopters (1/m), i.e. `-C` of the system matrix.
    #[must_use]
    pub fn power(&self) -> f64 {
        -self.system_matrix().c()
    }
    /// Returns the effective focal length of the system or `None` for an afocal system.
    ///
    /// For a system whose last medium is not air this is the reduced focal length `f'/n'`.
    #[must_use]
    pub fn effective_focal_length(&self) -> Option<Length> {
        let power = self.power();
        if abs_diff_eq!(power, 0.0, epsilon = AFOCAL_POWER_TOLERANCE) {
            None
        } else {
            Some(meter!(1.0 / power))
        }
    }
    /// Check the determinants of all element matrices.
    ///
    /// Returns the indices of all elements whose determinant deviates from 1.0 by more than the given tolerance. A
    /// warning is logged for each of them.
    #[must_use]
    pub fn check_determinants(&self, tolerance: f64) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.determinant_deviation() > tolerance)
            .map(|(index, element)| {
                warn!(
                    "element #{index} ({}) has a determinant of {}, expected 1",
                    element.kind(),
                    element.matrix().determinant()
                );
                index
            })
            .collect()
    }
}
fn trace_ray(ray: &Ray, elements: &[Element]) -> Vec<Ray> {
    let mut trace = Vec::with_capacity(elements.len() + 1);
    let mut state = *ray;
    trace.push(state);
    for element in elements {
        state = state.transform(element.matrix());
        trace.push(state);
    }
    trace
}
impl Display for OpticalSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "optical system '{}'", self.description)?;
        writeln!(f, "  {} starting ray(s)", self.rays.len())?;
        let locations = self.cumulative_locations();
        for (index, element) in self.elements.iter().enumerate() {
            writeln!(
                f,
                "  #{index}: {} at {} m",
                element.kind(),
                locations[index + 1].get::<meter>()
            )?;
        }
        Ok(())
    }
}
