//! Geojson preprocessing: feature collection in, records plus coordinates out.
//!
//! Geojson stores coordinates as `[longitude, latitude]`; tree space is
//! `[latitude, longitude]`. The swap happens here, once, so the axis quirk
//! never leaks into the tree or the distance code.

use std::fs;
use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson, Value};
use log::{debug, warn};

use crate::error::{Result, VicinityError};
use crate::spatial;
use crate::types::PointRecord;

/// Reads and parses a geojson feature collection from disk.
pub fn load_features(path: &Path) -> Result<FeatureCollection> {
    let raw = fs::read_to_string(path)?;
    let geojson: GeoJson = raw.parse()?;
    Ok(FeatureCollection::try_from(geojson)?)
}

/// Converts features into an ordered record sequence plus the index-aligned
/// coordinate array the tree is built over. Pure transform, input order is
/// preserved.
///
/// Features without usable point coordinates are logged and skipped rather
/// than aborting the batch. Non-point geometries carry no indexable
/// coordinate and are filtered out as well.
pub fn build_records(collection: &FeatureCollection) -> (Vec<PointRecord>, Vec<[f64; 2]>) {
    let mut records = Vec::with_capacity(collection.features.len());
    let mut coordinates = Vec::with_capacity(collection.features.len());

    for (position, feature) in collection.features.iter().enumerate() {
        match record_from_feature(feature) {
            Ok(Some(record)) => {
                coordinates.push(record.coordinate());
                records.push(record);
            }
            Ok(None) => debug!("skipping feature {position}: not a point geometry"),
            Err(err) => warn!("skipping feature {position}: {err}"),
        }
    }

    (records, coordinates)
}

/// One feature, one record. `Ok(None)` for non-point geometries; `Err` when
/// coordinates are missing or not valid geographic values.
fn record_from_feature(feature: &Feature) -> Result<Option<PointRecord>> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| VicinityError::MalformedFeature("feature has no geometry".into()))?;

    let position = match &geometry.value {
        Value::Point(position) => position,
        _ => return Ok(None),
    };
    if position.len() < 2 {
        return Err(VicinityError::MalformedFeature(format!(
            "point has {} coordinates, expected at least 2",
            position.len()
        )));
    }

    let (longitude, latitude) = (position[0], position[1]);
    if let Some(reason) = spatial::coordinate_issue(latitude, longitude) {
        return Err(VicinityError::MalformedFeature(reason));
    }

    let name = feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get("name"))
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(Some(PointRecord::new(
        name,
        latitude,
        longitude,
        geometry.value.type_name(),
    )))
}
