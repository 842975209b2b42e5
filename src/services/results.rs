// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Result extraction and classification.
//!
//! Turns a raw segment payload from the analysis worker into the
//! `ResultData` the portal renders: classified map features, a binned
//! PCI distribution with an average, and a per-segment summary table.
//! Pure and deterministic; the same input always yields the same output.

use crate::models::results::{
    bin_index, display_street_name, ClassifiedFeature, ClassifiedProperties, ConditionColor,
    Distribution, LatLng, LineGeometry, MapData, RawPayload, ResultData, Statistics, SummaryRow,
    SurfaceKind, BIN_LABELS,
};

/// Errors from result extraction.
#[derive(Debug, thiserror::Error)]
pub enum ResultError {
    #[error("invalid input data: payload has no features")]
    EmptyPayload,

    #[error("malformed feature at index {index}: missing {field}")]
    MalformedFeature { index: usize, field: &'static str },

    #[error("result payload is not valid JSON: {0}")]
    Parse(String),
}

/// Parse a raw result document and extract display data in one step.
pub fn extract_result_json(raw_json: &str) -> Result<ResultData, ResultError> {
    let payload: RawPayload =
        serde_json::from_str(raw_json).map_err(|e| ResultError::Parse(e.to_string()))?;
    extract_result_data(&payload)
}

/// Extract display data from a raw segment payload.
///
/// Single pass over the features, then an aggregate pass for the
/// distribution percentages. A feature missing its street name, PCI, or
/// coordinates aborts the whole extraction; statistics are never computed
/// over a silently-dropped subset.
pub fn extract_result_data(raw: &RawPayload) -> Result<ResultData, ResultError> {
    if raw.features.is_empty() {
        return Err(ResultError::EmptyPayload);
    }

    let total = raw.features.len();
    let mut features = Vec::with_capacity(total);
    let mut summary = Vec::with_capacity(total);
    let mut counts = [0u32; 5];
    let mut pci_sum = 0.0;

    for (index, feature) in raw.features.iter().enumerate() {
        let malformed = |field| ResultError::MalformedFeature { index, field };

        let properties = feature.properties.as_ref().ok_or(malformed("properties"))?;
        let street_raw = properties
            .street_name
            .as_deref()
            .ok_or(malformed("properties.StreetName"))?;
        let pci = properties.pci.ok_or(malformed("properties.PCI"))?;
        let coordinates = feature
            .geometry
            .as_ref()
            .map(|g| g.coordinates.clone())
            .filter(|c| !c.is_empty())
            .ok_or(malformed("geometry.coordinates"))?;

        let street_name = display_street_name(street_raw).to_string();
        let surface = SurfaceKind::decode(properties.surface.as_ref());

        counts[bin_index(pci)] += 1;
        pci_sum += pci;

        summary.push(SummaryRow {
            street_name: street_name.clone(),
            pci,
            surface,
        });
        features.push(ClassifiedFeature {
            geometry: LineGeometry { coordinates },
            properties: ClassifiedProperties {
                street_name,
                pci,
                surface,
                color: ConditionColor::from_pci(pci),
            },
        });
    }

    // First coordinate of the first segment, with the [lng, lat] ->
    // {lat, lng} axis swap map consumers expect.
    let first = features[0].geometry.coordinates[0];
    let center = LatLng {
        lat: first[1],
        lng: first[0],
    };

    let average = round2(pci_sum / total as f64);
    let percentages = counts
        .iter()
        .map(|&c| round2(c as f64 / total as f64 * 100.0))
        .collect();

    Ok(ResultData {
        map_data: MapData { center, features },
        statistics: Statistics {
            average,
            distribution: Distribution {
                labels: BIN_LABELS.iter().map(|l| l.to_string()).collect(),
                counts: counts.to_vec(),
                percentages,
            },
        },
        summary,
    })
}

/// Round to 2 decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
