#![warn(missing_docs)]
//! Optical elements of an [`OpticalSystem`](crate::OpticalSystem).
//!
//! An [`Element`] couples a [`TransferMatrix`] with its axial thickness. The physical meaning of the element is
//! described by an [`ElementKind`].
use num::Zero;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::meter};

use crate::{
    error::{ParaxError, ParaxResult},
    transfer_matrix::TransferMatrix,
};

/// Refractive index of vacuum (and, in good approximation, air).
#[must_use]
pub const fn refr_index_vacuum() -> f64 {
    1.0
}

/// The available kinds of optical elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(tag = "type")]
pub enum ElementKind {
    /// propagation through a homogeneous medium
    FreeSpace {
        /// propagation distance
        distance: Length,
        /// refractive index of the medium
        #[serde(default = "refr_index_vacuum")]
        index: f64,
    },
    /// refraction at a spherical (or, with infinite radius, planar) surface
    Refraction {
        /// refractive index in front of the surface
        n1: f64,
        /// refractive index behind the surface
        n2: f64,
        /// radius of curvature
        radius: Length,
    },
    /// ideal thin lens
    ThinLens {
        /// focal length
        focal_length: Length,
    },
    /// generic matrix given by its coefficients (in SI base units)
    Matrix {
        /// `A` coefficient
        a: f64,
        /// `B` coefficient (m)
        b: f64,
        /// `C` coefficient (1/m)
        c: f64,
        /// `D` coefficient
        d: f64,
    },
}
impl ElementKind {
    /// Create the [`TransferMatrix`] of this [`ElementKind`].
    ///
    /// # Errors
    /// This function returns an error if the parameters are invalid for the given element (see the constructors of
    /// [`TransferMatrix`]).
    pub fn matrix(&self) -> ParaxResult<TransferMatrix> {
        match self {
            Self::FreeSpace { distance, index } => TransferMatrix::free_space(*distance, *index),
            Self::Refraction { n1, n2, radius } => TransferMatrix::refraction(*n1, *n2, *radius),
            Self::ThinLens { focal_length } => TransferMatrix::thin_lens(*focal_length),
            Self::Matrix { a, b, c, d } => TransferMatrix::new(*a, *b, *c, *d),
        }
    }
    /// Returns the axial extent of this element. This is the propagation distance for free space, zero otherwise.
    #[must_use]
    pub fn natural_thickness(&self) -> Length {
        match self {
            Self::FreeSpace { distance, .. } => *distance,
            _ => Length::zero(),
        }
    }
}
impl From<&TransferMatrix> for ElementKind {
    fn from(matrix: &TransferMatrix) -> Self {
        Self::Matrix {
            a: matrix.a(),
            b: matrix.b(),
            c: matrix.c(),
            d: matrix.d(),
        }
    }
}

/// An optical element: a [`TransferMatrix`] together with its axial thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    matrix: TransferMatrix,
    thickness: Length,
}
impl Element {
    /// Creates a new [`Element`] of the given kind and thickness.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - the parameters of the [`ElementKind`] are invalid
    ///  - the thickness is negative or not finite
    pub fn new(kind: ElementKind, thickness: Length) -> ParaxResult<Self> {
        check_thickness(thickness)?;
        let matrix = kind.matrix()?;
        Ok(Self {
            kind,
            matrix,
            thickness,
        })
    }
    /// Creates a new [`Element`] using the natural thickness of the given kind (see [`ElementKind::natural_thickness`]).
    ///
    /// # Errors
    /// This function returns an error if the parameters of the [`ElementKind`] are invalid or the thickness would be
    /// negative.
    pub fn from_kind(kind: ElementKind) -> ParaxResult<Self> {
        let thickness = kind.natural_thickness();
        Self::new(kind, thickness)
    }
    /// Creates a new [`Element`] from a given [`TransferMatrix`].
    ///
    /// # Errors
    /// This function returns an error if the thickness is negative or not finite.
    pub fn from_matrix(matrix: TransferMatrix, thickness: Length) -> ParaxResult<Self> {
        check_thickness(thickness)?;
        Ok(Self {
            kind: ElementKind::from(&matrix),
            matrix,
            thickness,
        })
    }
    /// Returns a reference to the kind of this [`Element`].
    #[must_use]
    pub const fn kind(&self) -> &ElementKind {
        &self.kind
    }
    /// Returns a reference to the transfer matrix of this [`Element`].
    #[must_use]
    pub const fn matrix(&self) -> &TransferMatrix {
        &self.matrix
    }
    /// Returns the axial thickness of this [`Element`].
    #[must_use]
    pub const fn thickness(&self) -> Length {
        self.thickness
    }
    /// Returns the deviation of the matrix determinant from 1.0.
    ///
    /// With reduced angles every lossless element is unimodular, so any deviation indicates an unphysical
    /// (generic) matrix.
    #[must_use]
    pub fn determinant_deviation(&self) -> f64 {
        (self.matrix.determinant() - 1.0).abs()
    }
}
fn check_thickness(thickness: Length) -> ParaxResult<()> {
    if thickness.value < 0.0 || !thickness.is_finite() {
        return Err(ParaxError::InvalidArgument(format!(
            "element thickness must be >= 0.0 and finite, got {} m",
            thickness.get::<meter>()
        )));
    }
    Ok(())
}
