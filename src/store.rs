//! Building, persisting, and querying the spatial index artifact.

use std::fs;
use std::path::Path;

use geo::Point;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VicinityError};
use crate::kdtree::KdTree;
use crate::spatial;
use crate::types::{PointRecord, QueryResult};

/// The queryable spatial index: a k-d tree over tree-space coordinates plus
/// the record sequence aligned 1:1 with the tree's insertion indices.
///
/// Persists as a single opaque bincode blob. Loading an artifact reproduces a
/// structure that answers every radius query identically to the one that was
/// saved.
///
/// # Examples
///
/// ```rust
/// use vicinity::{PoiIndex, PointRecord};
///
/// let records = vec![
///     PointRecord::new("Le Severo", 48.8319929, 2.3245488, "Point"),
///     PointRecord::new("Lida", 48.8326892, 2.3241490, "Point"),
/// ];
/// let coordinates = records.iter().map(|r| r.coordinate()).collect();
/// let index = PoiIndex::build(records, coordinates);
///
/// let results = index.query_within_radius(48.8319929, 2.3245488, 100.0)?;
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].name, "Le Severo");
/// assert_eq!(results[0].distance, 0.0);
/// # Ok::<(), vicinity::VicinityError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiIndex {
    tree: KdTree,
    records: Vec<PointRecord>,
}

impl PoiIndex {
    /// Builds the index. `coordinates[i]` must be the tree-space coordinate
    /// of `records[i]`.
    pub fn build(records: Vec<PointRecord>, coordinates: Vec<[f64; 2]>) -> Self {
        debug_assert_eq!(records.len(), coordinates.len());
        PoiIndex {
            tree: KdTree::build(coordinates),
            records,
        }
    }

    /// Number of indexed points of interest.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The indexed records, in source data order.
    pub fn records(&self) -> &[PointRecord] {
        &self.records
    }

    /// Serializes the whole index as one blob.
    ///
    /// The bytes go to a temporary sibling file first and are renamed into
    /// place, so a concurrent reader never observes a partial artifact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let persistence_error = |reason: String| VicinityError::Persistence {
            path: path.to_path_buf(),
            reason,
        };

        let encoded =
            bincode::serialize(self).map_err(|err| persistence_error(err.to_string()))?;
        let staging = path.with_extension("tmp");
        fs::write(&staging, &encoded)
            .and_then(|()| fs::rename(&staging, path))
            .map_err(|err| persistence_error(err.to_string()))?;

        debug!(
            "saved index ({} records, {} bytes) to {}",
            self.records.len(),
            encoded.len(),
            path.display()
        );
        Ok(())
    }

    /// Loads a previously saved artifact. Any failure to produce one
    /// (absent, unreadable, corrupt) is a cache miss; the caller decides
    /// whether to rebuild.
    pub fn load(path: &Path) -> Result<Self> {
        let cache_miss = |reason: String| VicinityError::CacheMiss {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = fs::read(path).map_err(|err| cache_miss(err.to_string()))?;
        bincode::deserialize(&bytes).map_err(|err| cache_miss(format!("corrupt artifact: {err}")))
    }

    /// All points of interest within `radius_meters` of the query position,
    /// ascending by distance; equal distances keep the source data order.
    ///
    /// The tree pre-selects candidates with a conservative Euclidean bound in
    /// degree space, which may over-select; inclusion and the reported
    /// distance both use the haversine formula, rounded to 2 decimal places.
    pub fn query_within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Vec<QueryResult>> {
        spatial::validate_query(latitude, longitude, radius_meters)?;

        let degree_radius = spatial::conservative_degree_radius(latitude, radius_meters);
        let candidates = self.tree.within_radius([latitude, longitude], degree_radius);
        debug!(
            "{} candidates within {:.4} degrees of ({latitude}, {longitude})",
            candidates.len(),
            degree_radius
        );

        let center = Point::new(longitude, latitude);
        let mut results: Vec<QueryResult> = Vec::with_capacity(candidates.len());
        for index in candidates {
            let record = &self.records[index];
            let position = Point::new(record.longitude, record.latitude);
            let distance = spatial::round_distance(spatial::haversine_distance(&center, &position));
            if distance <= radius_meters {
                results.push(QueryResult::new(record, distance));
            }
        }

        // Stable sort over candidates already in insertion order: equal
        // distances keep the original record order.
        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> PoiIndex {
        let records = vec![
            PointRecord::new("Restaurant1", 48.8566, 2.3522, "Point"),
            PointRecord::new("Restaurant2", 48.8582, 2.3387, "Point"),
            PointRecord::new("Restaurant3", 48.85, 2.35, "Point"),
        ];
        let coordinates = records.iter().map(|r| r.coordinate()).collect();
        PoiIndex::build(records, coordinates)
    }

    #[test]
    fn save_then_load_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");

        let index = sample_index();
        index.save(&path).unwrap();
        let reloaded = PoiIndex::load(&path).unwrap();

        assert_eq!(index, reloaded);
        assert_eq!(
            index.query_within_radius(48.8566, 2.3522, 2000.0).unwrap(),
            reloaded
                .query_within_radius(48.8566, 2.3522, 2000.0)
                .unwrap()
        );
    }

    #[test]
    fn save_leaves_no_staging_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");

        sample_index().save(&path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn load_missing_artifact_is_a_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        let err = PoiIndex::load(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, VicinityError::CacheMiss { .. }));
    }

    #[test]
    fn load_corrupt_artifact_is_a_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        fs::write(&path, b"not a bincode artifact").unwrap();

        let err = PoiIndex::load(&path).unwrap_err();
        assert!(matches!(err, VicinityError::CacheMiss { .. }));
    }

    #[test]
    fn save_into_missing_directory_is_a_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("index.bin");

        let err = sample_index().save(&path).unwrap_err();
        assert!(matches!(err, VicinityError::Persistence { .. }));
    }

    #[test]
    fn query_rejects_invalid_parameters_before_searching() {
        let index = sample_index();
        assert!(matches!(
            index.query_within_radius(95.0, 2.35, 100.0).unwrap_err(),
            VicinityError::InvalidQuery(_)
        ));
        assert!(matches!(
            index.query_within_radius(48.85, 2.35, -1.0).unwrap_err(),
            VicinityError::InvalidQuery(_)
        ));
    }

    #[test]
    fn query_results_are_sorted_and_within_radius() {
        let index = sample_index();
        let results = index.query_within_radius(48.8566, 2.3522, 2000.0).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].name, "Restaurant1");
        assert_eq!(results[0].distance, 0.0);
        for pair in results.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        for result in &results {
            assert!(result.distance <= 2000.0);
        }
    }

    #[test]
    fn empty_index_answers_queries_with_nothing() {
        let index = PoiIndex::build(Vec::new(), Vec::new());
        assert!(index.is_empty());
        let results = index.query_within_radius(48.85, 2.35, 1000.0).unwrap();
        assert!(results.is_empty());
    }
}
