#![warn(missing_docs)]
//! Reading and writing of optical system descriptions.
//!
//! A [`SystemDocument`] is the serializable (YAML) form of an [`OpticalSystem`]. All lengths are given in meters.
//!
//! ```yaml
//! version: "1"
//! description: focal point imaging
//! rays:
//!   - { height: 0.0, angle: 1.0 }
//! fans:
//!   - { height: 0.0, angle_min: -0.1, angle_max: 0.1, count: 5 }
//! elements:
//!   - { type: FreeSpace, distance: 1.0 }
//!   - { type: ThinLens, focal_length: 0.5 }
//!   - { type: FreeSpace, distance: 1.0 }
//! ```
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use crate::{
    element::ElementKind,
    error::{ParaxError, ParaxResult},
    optical_system::OpticalSystem,
    ray::Ray,
    rays::Rays,
};

/// Version of the document format written by this crate.
pub const DOCUMENT_VERSION: &str = "1";

const fn default_weight() -> f64 {
    1.0
}
fn default_version() -> String {
    DOCUMENT_VERSION.into()
}

/// A single starting ray.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RayConfig {
    /// height above the optical axis
    pub height: Length,
    /// reduced angle
    pub angle: f64,
    /// weight of the ray
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// A ray fan (see [`Rays::fan`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanConfig {
    /// common height of all rays
    pub height: Length,
    /// angle of the first ray
    pub angle_min: f64,
    /// angle of the last ray
    pub angle_max: f64,
    /// number of rays
    pub count: usize,
}

/// An element with an optional absolute axial location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementConfig {
    /// the element itself
    #[serde(flatten)]
    pub kind: ElementKind,
    /// absolute axial location. If not given, the natural thickness of the element is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Length>,
}

/// The serializable description of an [`OpticalSystem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDocument {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    rays: Vec<RayConfig>,
    #[serde(default)]
    fans: Vec<FanConfig>,
    #[serde(default)]
    elements: Vec<ElementConfig>,
}
impl Default for SystemDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            description: String::new(),
            rays: Vec::new(),
            fans: Vec::new(),
            elements: Vec::new(),
        }
    }
}
impl SystemDocument {
    /// Create a [`SystemDocument`] from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the given path is not found or readable.
    ///   - the parsing / deserialization of the file failed.
    pub fn from_file(path: &Path) -> ParaxResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ParaxError::Document(format!("cannot read file {} : {}", path.display(), e))
        })?;
        Self::from_string(&contents)
    }
    /// Create a [`SystemDocument`] from the given YAML string.
    ///
    /// A warning is logged if the document version does not match [`DOCUMENT_VERSION`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the parsing of the string failed.
    pub fn from_string(yaml: &str) -> ParaxResult<Self> {
        let document: Self = serde_yaml::from_str(yaml)
            .map_err(|e| ParaxError::Document(format!("parsing of system failed: {e}")))?;
        if document.version != DOCUMENT_VERSION {
            warn!(
                "document version '{}' does not match the supported version '{DOCUMENT_VERSION}'",
                document.version
            );
        }
        Ok(document)
    }
    /// Create a [`SystemDocument`] describing the given [`OpticalSystem`].
    ///
    /// All starting rays are stored individually, all elements with their absolute location.
    #[must_use]
    pub fn from_system(system: &OpticalSystem) -> Self {
        let rays = system
            .rays()
            .iter()
            .map(|ray| RayConfig {
                height: ray.height(),
                angle: ray.angle(),
                weight: ray.weight(),
            })
            .collect();
        let elements = system
            .elements()
            .iter()
            .zip(system.cumulative_locations().into_iter().skip(1))
            .map(|(element, location)| ElementConfig {
                kind: element.kind().clone(),
                location: Some(location),
            })
            .collect();
        Self {
            description: system.description().into(),
            rays,
            elements,
            ..Default::default()
        }
    }
    /// Returns the description of the document.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
    /// Validate this document and build the corresponding [`OpticalSystem`].
    ///
    /// Single rays are added first, followed by the rays of all fans.
    ///
    /// # Errors
    ///
    /// This function will return an error if a ray, fan or element is invalid or the element locations are not
    /// monotonic.
    pub fn build_system(&self) -> ParaxResult<OpticalSystem> {
        let mut system = OpticalSystem::new(&self.description);
        for ray in &self.rays {
            system.add_ray(Ray::new_with_weight(ray.height, ray.angle, ray.weight)?);
        }
        for fan in &self.fans {
            system.add_rays(Rays::fan(
                fan.height,
                fan.angle_min,
                fan.angle_max,
                fan.count,
            )?);
        }
        for element in &self.elements {
            match element.location {
                Some(location) => system.add_at(element.kind.clone(), location)?,
                None => system.add(element.kind.clone())?,
            }
        }
        info!(
            "built system '{}' with {} ray(s) and {} element(s)",
            system.description(),
            system.rays().len(),
            system.elements().len()
        );
        Ok(system)
    }
    /// Serialize this document into a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization failed.
    pub fn to_yaml_string(&self) -> ParaxResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ParaxError::Document(format!("serialization of system failed: {e}")))
    }
    /// Save this [`SystemDocument`] to a YAML file with the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the serialization of the document failed.
    ///   - the file path cannot be created.
    ///   - it cannot write into the file (e.g. no space).
    pub fn save_to_file(&self, path: &Path) -> ParaxResult<()> {
        let serialized = self.to_yaml_string()?;
        let mut output = File::create(path).map_err(|e| {
            ParaxError::Document(format!(
                "could not create file path: {}: {}",
                path.display(),
                e
            ))
        })?;
        write!(output, "{serialized}").map_err(|e| {
            ParaxError::Document(format!(
                "writing to file path {} failed: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        meter, millimeter, optical_system::RayId,
        utils::test_helper::test_helper::{check_no_warnings, check_warnings},
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;
    use tempfile::NamedTempFile;
    use uom::si::length::meter;

    const FOCAL_POINT: &str = r#"
version: "1"
description: focal point imaging
rays:
  - { height: 0.0, angle: 0.1 }
  - { height: 0.001, angle: 0.0, weight: 0.5 }
fans:
  - { height: 0.0, angle_min: -0.1, angle_max: 0.1, count: 5 }
elements:
  - { type: FreeSpace, distance: 1.0 }
  - { type: ThinLens, focal_length: 0.5 }
  - { type: FreeSpace, distance: 1.0, index: 1.0 }
"#;
    #[test]
    fn default() {
        let document = SystemDocument::default();
        assert_eq!(document.version, DOCUMENT_VERSION);
        assert!(document.description().is_empty());
        let system = document.build_system().unwrap();
        assert!(system.rays().is_empty());
        assert!(system.elements().is_empty());
    }
    #[test]
    fn from_string() {
        testing_logger::setup();
        let document = SystemDocument::from_string(FOCAL_POINT).unwrap();
        check_no_warnings();
        assert_eq!(document.description(), "focal point imaging");
        assert_eq!(document.rays.len(), 2);
        assert_eq!(document.rays[0].weight, 1.0);
        assert_eq!(document.rays[1].weight, 0.5);
        assert_eq!(document.fans[0].count, 5);
        assert_eq!(document.elements.len(), 3);
        assert_eq!(
            document.elements[1].kind,
            ElementKind::ThinLens {
                focal_length: meter!(0.5)
            }
        );
        assert_eq!(document.elements[0].location, None);
    }
    #[test]
    fn from_string_invalid() {
        assert_matches!(
            SystemDocument::from_string("elements: [ { type: Prism } ]"),
            Err(ParaxError::Document(_))
        );
        assert_matches!(
            SystemDocument::from_string("rays: 3"),
            Err(ParaxError::Document(_))
        );
    }
    #[test]
    fn version_mismatch() {
        testing_logger::setup();
        let document = SystemDocument::from_string("version: \"0\"").unwrap();
        assert!(document.elements.is_empty());
        check_warnings(vec![
            "document version '0' does not match the supported version '1'",
        ]);
    }
    #[test]
    fn build_system() {
        let mut system = SystemDocument::from_string(FOCAL_POINT)
            .unwrap()
            .build_system()
            .unwrap();
        assert_eq!(system.description(), "focal point imaging");
        assert_eq!(system.rays().len(), 7);
        assert_eq!(system.elements().len(), 3);
        assert_eq!(system.total_length(), meter!(2.0));
        let table = system.propagate().unwrap();
        let state = table.state(RayId::from(0), 3).unwrap();
        assert_abs_diff_eq!(state.height().get::<meter>(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.angle(), -0.1, epsilon = 1e-12);
        assert_eq!(table.state(RayId::from(1), 3).unwrap().weight(), 0.5);
    }
    #[test]
    fn build_system_with_locations() {
        let yaml = r"
elements:
  - { type: ThinLens, focal_length: 0.1, location: 0.25 }
  - { type: Refraction, n1: 1.0, n2: 1.5, radius: .inf, location: 0.5 }
";
        let system = SystemDocument::from_string(yaml)
            .unwrap()
            .build_system()
            .unwrap();
        assert_eq!(system.cumulative_locations(), meter!(0.0, 0.25, 0.5));
        assert_matches!(system.elements()[1].kind(), ElementKind::Refraction { .. });
        let yaml = r"
elements:
  - { type: ThinLens, focal_length: 0.1, location: 0.5 }
  - { type: ThinLens, focal_length: 0.1, location: 0.2 }
";
        assert_matches!(
            SystemDocument::from_string(yaml).unwrap().build_system(),
            Err(ParaxError::InvalidState(_))
        );
    }
    #[test]
    fn build_system_invalid() {
        let yaml = "elements: [ { type: ThinLens, focal_length: 0.0 } ]";
        assert_matches!(
            SystemDocument::from_string(yaml).unwrap().build_system(),
            Err(ParaxError::InvalidArgument(_))
        );
        let yaml = "elements: [ { type: FreeSpace, distance: 1.0, location: 0.5 } ]";
        assert_matches!(
            SystemDocument::from_string(yaml).unwrap().build_system(),
            Err(ParaxError::InvalidState(_))
        );
        let yaml = "fans: [ { height: 0.0, angle_min: 0.0, angle_max: 0.1, count: 0 } ]";
        assert_matches!(
            SystemDocument::from_string(yaml).unwrap().build_system(),
            Err(ParaxError::InvalidArgument(_))
        );
        let yaml = "rays: [ { height: 0.0, angle: 0.0, weight: -1.0 } ]";
        assert_matches!(
            SystemDocument::from_string(yaml).unwrap().build_system(),
            Err(ParaxError::InvalidArgument(_))
        );
    }
    #[test]
    fn from_system() {
        let mut system = OpticalSystem::new("thick lens");
        system.add_ray(Ray::new(millimeter!(1.0), 0.0).unwrap());
        system
            .add_thick_lens(1.5, millimeter!(50.0), millimeter!(-50.0), millimeter!(10.0), 1.0)
            .unwrap();
        system.add_free_space(millimeter!(40.0), 1.0).unwrap();
        let document = SystemDocument::from_system(&system);
        assert_eq!(document.rays.len(), 1);
        assert_eq!(document.elements.len(), 4);
        assert_relative_eq!(
            document.elements[3].location.unwrap().get::<meter>(),
            0.05,
            max_relative = 1e-12
        );
        let rebuilt = document.build_system().unwrap();
        assert_eq!(rebuilt.rays(), system.rays());
        for (new, old) in rebuilt.elements().iter().zip(system.elements()) {
            assert_eq!(new.kind(), old.kind());
        }
        assert_eq!(rebuilt.cumulative_locations(), system.cumulative_locations());
        assert_relative_eq!(rebuilt.power(), system.power(), max_relative = 1e-12);
    }
    #[test]
    fn save_and_load() {
        let document = SystemDocument::from_string(FOCAL_POINT).unwrap();
        let file = NamedTempFile::new().unwrap();
        document.save_to_file(file.path()).unwrap();
        let loaded = SystemDocument::from_file(file.path()).unwrap();
        assert_eq!(loaded, document);
    }
    #[test]
    fn from_file_missing() {
        assert_matches!(
            SystemDocument::from_file(Path::new("./does_not_exist.yaml")),
            Err(ParaxError::Document(_))
        );
    }
}
