#![warn(missing_docs)]
//! The result of a propagation through an [`OpticalSystem`](crate::OpticalSystem).
//!
//! A [`ResultTable`] stores the state of every starting ray at every plane of the system. Plane 0 is the start plane,
//! plane `j + 1` is located directly behind element `j`.
use std::io::Write;

use serde::Serialize;
use uom::si::{f64::Length, length::meter};

use crate::{
    error::{ParaxError, ParaxResult},
    optical_system::RayId,
    ray::Ray,
};

/// Dense table of ray states indexed by `(ray, plane)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    num_rays: usize,
    num_planes: usize,
    /// ray states, stored ray by ray
    states: Vec<Ray>,
    locations: Vec<Length>,
}

#[derive(Serialize)]
struct CsvRow {
    ray: usize,
    plane: usize,
    z: f64,
    height: f64,
    angle: f64,
    weight: f64,
}

impl ResultTable {
    /// Assemble a table from per-ray traces. Every trace must contain one state per location.
    pub(crate) fn new(traces: Vec<Vec<Ray>>, locations: Vec<Length>) -> ParaxResult<Self> {
        let num_planes = locations.len();
        if traces.iter().any(|trace| trace.len() != num_planes) {
            return Err(ParaxError::InvalidState(
                "ray trace length does not match the number of planes".into(),
            ));
        }
        Ok(Self {
            num_rays: traces.len(),
            num_planes,
            states: traces.into_iter().flatten().collect(),
            locations,
        })
    }
    /// Returns the number of rays in this table.
    #[must_use]
    pub const fn num_rays(&self) -> usize {
        self.num_rays
    }
    /// Returns the number of planes (number of elements + 1).
    #[must_use]
    pub const fn num_planes(&self) -> usize {
        self.num_planes
    }
    /// Returns true if the table does not contain any ray.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.num_rays == 0
    }
    /// Returns the state of the given ray at the given plane.
    #[must_use]
    pub fn state(&self, ray: RayId, plane: usize) -> Option<&Ray> {
        if plane >= self.num_planes {
            return None;
        }
        self.trace(ray).map(|trace| &trace[plane])
    }
    /// Returns all states of the given ray ordered by plane.
    #[must_use]
    pub fn trace(&self, ray: RayId) -> Option<&[Ray]> {
        if ray.index() >= self.num_rays {
            return None;
        }
        let start = ray.index() * self.num_planes;
        self.states.get(start..start + self.num_planes)
    }
    /// Returns the heights of the given ray at all planes.
    #[must_use]
    pub fn heights(&self, ray: RayId) -> Option<Vec<Length>> {
        self.trace(ray)
            .map(|trace| trace.iter().map(Ray::height).collect())
    }
    /// Returns the angles of the given ray at all planes.
    #[must_use]
    pub fn angles(&self, ray: RayId) -> Option<Vec<f64>> {
        self.trace(ray)
            .map(|trace| trace.iter().map(Ray::angle).collect())
    }
    /// Returns the states of all rays at the last plane.
    #[must_use]
    pub fn final_states(&self) -> Vec<Ray> {
        if self.num_planes == 0 {
            return Vec::new();
        }
        self.states
            .chunks(self.num_planes)
            .filter_map(|trace| trace.last().copied())
            .collect()
    }
    /// Returns the axial locations of all planes.
    #[must_use]
    pub fn locations(&self) -> &[Length] {
        &self.locations
    }
    /// Returns the table as a numeric array of shape `(num_rays, num_planes, 2)` holding `[height in m, angle]`.
    #[must_use]
    pub fn to_array(&self) -> Vec<Vec<[f64; 2]>> {
        if self.num_planes == 0 {
            return vec![Vec::new(); self.num_rays];
        }
        self.states
            .chunks(self.num_planes)
            .map(|trace| {
                trace
                    .iter()
                    .map(|ray| [ray.height().get::<meter>(), ray.angle()])
                    .collect()
            })
            .collect()
    }
    /// Write the table in CSV format (columns `ray,plane,z,height,angle,weight`, lengths in m).
    ///
    /// # Errors
    /// This function will return an error if writing to the given writer fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> ParaxResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for ray in 0..self.num_rays {
            for (plane, z) in self.locations.iter().enumerate() {
                let state = &self.states[ray * self.num_planes + plane];
                wtr.serialize(CsvRow {
                    ray,
                    plane,
                    z: z.get::<meter>(),
                    height: state.height().get::<meter>(),
                    angle: state.angle(),
                    weight: state.weight(),
                })
                .map_err(|e| ParaxError::Other(format!("writing csv record failed: {e}")))?;
            }
        }
        wtr.flush()
            .map_err(|e| ParaxError::Other(format!("writing csv data failed: {e}")))
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::meter;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    fn ray(height: f64, angle: f64) -> Ray {
        Ray::new(meter!(height), angle).unwrap()
    }
    fn table() -> ResultTable {
        ResultTable::new(
            vec![
                vec![ray(0.0, 0.01), ray(0.01, 0.01), ray(0.01, -0.01)],
                vec![ray(0.001, 0.0), ray(0.001, 0.0), ray(0.001, -0.001)],
            ],
            meter!(0.0, 1.0, 1.0),
        )
        .unwrap()
    }
    #[test]
    fn new() {
        let t = table();
        assert_eq!(t.num_rays(), 2);
        assert_eq!(t.num_planes(), 3);
        assert!(!t.is_empty());
        assert_eq!(t.locations().len(), 3);
        assert_matches!(
            ResultTable::new(vec![vec![ray(0.0, 0.0)]], meter!(0.0, 1.0)),
            Err(ParaxError::InvalidState(_))
        );
        let empty = ResultTable::new(vec![], meter!(0.0, 1.0)).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.num_planes(), 2);
        assert!(empty.final_states().is_empty());
    }
    #[test]
    fn state() {
        let t = table();
        assert_eq!(t.state(RayId::from(0), 1), Some(&ray(0.01, 0.01)));
        assert_eq!(t.state(RayId::from(1), 2), Some(&ray(0.001, -0.001)));
        assert_eq!(t.state(RayId::from(1), 3), None);
        assert_eq!(t.state(RayId::from(2), 0), None);
    }
    #[test]
    fn trace() {
        let t = table();
        assert_eq!(t.trace(RayId::from(1)).unwrap().len(), 3);
        assert!(t.trace(RayId::from(2)).is_none());
        let heights = t.heights(RayId::from(0)).unwrap();
        assert_relative_eq!(heights[1].get::<meter>(), 0.01);
        let angles = t.angles(RayId::from(0)).unwrap();
        assert_eq!(angles, vec![0.01, 0.01, -0.01]);
        assert!(t.heights(RayId::from(5)).is_none());
    }
    #[test]
    fn final_states() {
        let t = table();
        assert_eq!(t.final_states(), vec![ray(0.01, -0.01), ray(0.001, -0.001)]);
    }
    #[test]
    fn to_array() {
        let arr = table().to_array();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0].len(), 3);
        assert_eq!(arr[1][2], [0.001, -0.001]);
    }
    #[test]
    fn write_csv() {
        let mut buffer: Vec<u8> = Vec::new();
        table().write_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "ray,plane,z,height,angle,weight");
        assert_eq!(lines[1], "0,0,0.0,0.0,0.01,1.0");
        assert_eq!(lines[6], "1,2,1.0,0.001,-0.001,1.0");
    }
}
