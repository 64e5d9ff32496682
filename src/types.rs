//! Core data types: point records, query results, and pipeline configuration.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A normalized point of interest extracted from one geojson feature.
///
/// Created during preprocessing and immutable afterwards. Records are owned
/// collectively by [`crate::PoiIndex`] as a parallel array: record `i` always
/// corresponds to tree insertion index `i`, before and after a serialization
/// round-trip.
///
/// # Examples
///
/// ```rust
/// use vicinity::PointRecord;
///
/// let record = PointRecord::new("Le Severo", 48.8319929, 2.3245488, "Point");
/// assert_eq!(record.coordinate(), [48.8319929, 2.3245488]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Display label. Features without a name keep an empty label; they are
    /// never dropped.
    pub name: String,
    /// Degrees, in [-90, 90].
    pub latitude: f64,
    /// Degrees, in [-180, 180].
    pub longitude: f64,
    /// Geometry tag from the source feature, e.g. "Point".
    pub geometry_type: String,
}

impl PointRecord {
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        geometry_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            geometry_type: geometry_type.into(),
        }
    }

    /// Tree-space coordinate for this record: `[latitude, longitude]`.
    pub fn coordinate(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// One query match: the record fields plus the great-circle distance from the
/// query point in meters, rounded to 2 decimal places.
///
/// Produced transiently per query; never persisted. `Display` renders the
/// console line format consumed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub geometry_type: String,
    /// Meters from the query point, rounded to 2 decimals.
    pub distance: f64,
}

impl QueryResult {
    pub fn new(record: &PointRecord, distance: f64) -> Self {
        Self {
            name: record.name.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            geometry_type: record.geometry_type.clone(),
            distance,
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name: {}, latitude: {}, longitude: {}, type: {}, distance: {:.2}",
            self.name, self.latitude, self.longitude, self.geometry_type, self.distance
        )
    }
}

/// Filesystem configuration for the search pipeline.
///
/// # Examples
///
/// ```rust
/// use vicinity::Config;
///
/// let config = Config::default()
///     .with_source_path("data/pois.geojson")
///     .with_cache_path("data/pois.idx");
/// assert_eq!(config.cache_path.extension().unwrap(), "idx");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Geojson source with one feature per point of interest.
    #[serde(default = "Config::default_source_path")]
    pub source_path: PathBuf,

    /// Location of the persisted index artifact.
    #[serde(default = "Config::default_cache_path")]
    pub cache_path: PathBuf,
}

impl Config {
    fn default_source_path() -> PathBuf {
        PathBuf::from("resources/restaurants_paris.geojson")
    }

    fn default_cache_path() -> PathBuf {
        PathBuf::from("resources/poi_index.bin")
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = path.into();
        self
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: Self::default_source_path(),
            cache_path: Self::default_cache_path(),
        }
    }
}
