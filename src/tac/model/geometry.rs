//! Geographic positions, analysis areas and the FIR lookup capability
//!
//! The geometry itself (intersections, winding, FIR boundaries) is computed elsewhere; the
//! engine only renders positions and asks a [FirLookup] for names and outlines.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A position in decimal degrees, north and east positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Closed polygon; the first position is repeated as the last one.
    Polygon(Vec<GeoPosition>),
}

/// Where an analysed phenomenon is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisArea {
    Within(Geometry),
    /// The whole FIR (`ENTIRE FIR`)
    EntireFir,
    /// Advisories only: `NOT AVBL`
    NotAvailable,
    /// Advisories only: `NO SWX EXP`
    NotExpected,
}

/// Name and outline lookups for Flight Information Regions.
///
/// The SIGMET area reconstructors write a polygon equal to the outline of the message's FIR
/// as `ENTIRE FIR`.
pub trait FirLookup: Send + Sync {
    fn geometry_for(&self, fir_name: &str, include_delegated_areas: bool) -> Option<Geometry>;

    fn name_for(&self, icao_code: &str) -> Option<String>;
}

/// An in-memory [FirLookup] filled by the caller.
#[derive(Debug, Clone, Default)]
pub struct StaticFirLookup {
    names: HashMap<String, String>,
    geometries: HashMap<String, Geometry>,
}

impl StaticFirLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fir(
        mut self,
        icao_code: impl Into<String>,
        name: impl Into<String>,
        geometry: Option<Geometry>,
    ) -> Self {
        let name = name.into();
        if let Some(geometry) = geometry {
            self.geometries.insert(name.clone(), geometry);
        }
        self.names.insert(icao_code.into(), name);
        self
    }
}

impl FirLookup for StaticFirLookup {
    fn geometry_for(&self, fir_name: &str, _include_delegated_areas: bool) -> Option<Geometry> {
        self.geometries.get(fir_name).cloned()
    }

    fn name_for(&self, icao_code: &str) -> Option<String> {
        self.names.get(icao_code).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_range() {
        assert!(GeoPosition::new(60.5, 25.0).is_in_range());
        assert!(GeoPosition::new(-90.0, 180.0).is_in_range());
        assert!(!GeoPosition::new(90.5, 25.0).is_in_range());
        assert!(!GeoPosition::new(60.0, -180.5).is_in_range());
        assert!(!GeoPosition::new(f64::NAN, 0.0).is_in_range());
    }

    #[test]
    fn test_static_lookup() {
        let lookup = StaticFirLookup::new().with_fir("EHAA", "AMSTERDAM", None);
        assert_eq!(lookup.name_for("EHAA").as_deref(), Some("AMSTERDAM"));
        assert!(lookup.name_for("EFIN").is_none());
        assert!(lookup.geometry_for("AMSTERDAM", true).is_none());
    }
}
