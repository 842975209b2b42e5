// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Pavement-condition result shapes.
//!
//! The raw side mirrors what the analysis worker writes: a GeoJSON-like
//! feature collection of road segments, each carrying a `PCI` score, a
//! `StreetName`, and a numeric `Surface` code. The derived side is what
//! the portal's map, chart, and table views consume.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

// ─── Raw payload (worker wire format) ────────────────────────

/// Raw result payload as produced by the analysis worker.
///
/// `{features: [{geometry: {coordinates}, properties: {StreetName, PCI, Surface}}]}`
#[derive(Debug, Clone, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

/// One road segment as written by the worker.
///
/// Fields are optional here so that a malformed segment can be reported
/// with its index and missing field instead of failing the whole parse
/// with an opaque error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
    #[serde(default)]
    pub properties: Option<RawProperties>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGeometry {
    /// Ordered [longitude, latitude] pairs forming the segment line
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProperties {
    /// Street name, possibly carrying a `_`-separated disambiguator suffix
    #[serde(rename = "StreetName")]
    pub street_name: Option<String>,
    /// Pavement Condition Index, nominally 0-100
    #[serde(rename = "PCI")]
    pub pci: Option<f64>,
    /// Surface code: 0 = Concrete, 1 = Asphalt. Left loose because the
    /// worker has emitted both numbers and numeric strings.
    #[serde(rename = "Surface", default)]
    pub surface: Option<serde_json::Value>,
}

// ─── Derived output (portal wire format) ─────────────────────

/// Aggregate result consumed by the map, statistics, and summary views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ResultData {
    pub map_data: MapData,
    pub statistics: Statistics,
    pub summary: Vec<SummaryRow>,
}

/// Map-renderable slice of the results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MapData {
    pub center: LatLng,
    pub features: Vec<ClassifiedFeature>,
}

/// Viewport center. Note the field order is {lat, lng}, swapped from the
/// GeoJSON [lng, lat] coordinate order; map consumers expect it this way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A road segment with its derived display classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ClassifiedFeature {
    pub geometry: LineGeometry,
    pub properties: ClassifiedProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LineGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ClassifiedProperties {
    /// Display street name (disambiguator suffix stripped)
    #[serde(rename = "StreetName")]
    pub street_name: String,
    /// PCI, unchanged from the raw feature
    #[serde(rename = "PCI")]
    pub pci: f64,
    /// Decoded surface label
    #[serde(rename = "Surface")]
    pub surface: SurfaceKind,
    /// Line color derived from the PCI bin
    pub color: ConditionColor,
}

/// Statistics over all segments of a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Statistics {
    /// Mean PCI, rounded to 2 decimals
    pub average: f64,
    pub distribution: Distribution,
}

/// PCI distribution over the five fixed condition bins.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Distribution {
    pub labels: Vec<String>,
    pub counts: Vec<u32>,
    /// Per-bin share of the total, each rounded to 2 decimals
    /// independently; the sum is not reconciled to exactly 100.
    pub percentages: Vec<f64>,
}

/// One row of the per-segment summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SummaryRow {
    pub street_name: String,
    pub pci: f64,
    pub surface: SurfaceKind,
}

// ─── Classification rules ────────────────────────────────────

/// The five condition bins, lowest PCI first.
///
/// Bins are contiguous and half-open with strict upper bounds at 40, 55,
/// 70, and 85; the last bin catches everything else, so out-of-range
/// scores still classify (negatives land in the first bin, >100 in the
/// last).
pub const BIN_LABELS: [&str; 5] = ["0-40", "40-55", "55-70", "70-85", "85-100"];

/// Index of the condition bin a PCI score falls into.
pub fn bin_index(pci: f64) -> usize {
    if pci < 40.0 {
        0
    } else if pci < 55.0 {
        1
    } else if pci < 70.0 {
        2
    } else if pci < 85.0 {
        3
    } else {
        4
    }
}

/// Display color for a condition bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ConditionColor {
    Red,
    Orange,
    Yellow,
    LightGreen,
    DarkGreen,
}

impl ConditionColor {
    /// Color of each bin, indexed like [`BIN_LABELS`].
    pub const BY_BIN: [ConditionColor; 5] = [
        ConditionColor::Red,
        ConditionColor::Orange,
        ConditionColor::Yellow,
        ConditionColor::LightGreen,
        ConditionColor::DarkGreen,
    ];

    /// Classify a PCI score into its bin color.
    pub fn from_pci(pci: f64) -> Self {
        Self::BY_BIN[bin_index(pci)]
    }
}

/// Decoded road surface label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SurfaceKind {
    Concrete,
    Asphalt,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl SurfaceKind {
    /// Decode the raw surface code by numeric coercion: `0` is concrete,
    /// `1` is asphalt, anything else (missing, non-numeric, NaN, other
    /// codes) is unknown. Numeric strings such as `"1"` coerce.
    pub fn decode(raw: Option<&serde_json::Value>) -> Self {
        let code = match raw {
            Some(serde_json::Value::Number(n)) => n.as_f64(),
            Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match code {
            Some(c) if c == 0.0 => SurfaceKind::Concrete,
            Some(c) if c == 1.0 => SurfaceKind::Asphalt,
            _ => SurfaceKind::NotAvailable,
        }
    }
}

/// Display street name: the prefix before the first `_`, or the whole
/// name when there is none.
pub fn display_street_name(raw: &str) -> &str {
    raw.split('_').next().unwrap_or(raw)
}
