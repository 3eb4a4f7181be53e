//! This is the documentation for the **paraxial** package, a raytracer for first-order (paraxial) optics based on
//! ABCD transfer matrices.
//!
//! An [`OpticalSystem`] holds a set of starting [`Ray`]s and an ordered sequence of optical elements (free space,
//! refracting surfaces, thin lenses or generic matrices). [`OpticalSystem::propagate`] traces all rays through all
//! elements and returns a [`ResultTable`] with the state of every ray at every plane. Systems can be described in YAML
//! files (see [`SystemDocument`]).
#![allow(clippy::module_name_repetitions)]

pub mod console;
pub mod document;
pub mod element;
pub mod error;
pub mod first_order;
pub mod optical_system;
pub mod ray;
pub mod rays;
pub mod result_table;
pub mod transfer_matrix;
pub mod utils;

pub use document::SystemDocument;
pub use optical_system::OpticalSystem;
pub use ray::Ray;
pub use result_table::ResultTable;
pub use transfer_matrix::TransferMatrix;

/// Return the version information of the currently built paraxial executable.
#[must_use]
pub fn get_version() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
