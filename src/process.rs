//! Query orchestration: cache-or-build, then radius search.

use std::time::Instant;

use log::info;

use crate::error::{Result, VicinityError};
use crate::preprocess;
use crate::spatial;
use crate::store::PoiIndex;
use crate::types::{Config, QueryResult};

/// Single-process search pipeline.
///
/// Holds the loaded index as explicit process-scoped state: the first query
/// loads the cache artifact (building and saving it on a cache miss), later
/// queries reuse the in-memory index. Construct once at startup and inject
/// wherever queries run; [`SearchProcess::reset`] gives tests a clean
/// reinitialization point.
///
/// # Examples
///
/// ```rust,no_run
/// use vicinity::{Config, SearchProcess};
///
/// let mut search = SearchProcess::new(Config::default());
/// let results = search.process(48.8319929, 2.3245488, 100.0)?;
/// for result in &results {
///     println!("{result}");
/// }
/// # Ok::<(), vicinity::VicinityError>(())
/// ```
pub struct SearchProcess {
    config: Config,
    index: Option<PoiIndex>,
}

impl SearchProcess {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            index: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Drops the cached in-memory index; the next query loads or rebuilds.
    pub fn reset(&mut self) {
        self.index = None;
    }

    /// Runs one radius query: validates parameters, ensures an index is
    /// available, and returns matches ascending by distance.
    ///
    /// Invalid parameters fail before any index work. An empty result is not
    /// an error.
    pub fn process(
        &mut self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Vec<QueryResult>> {
        spatial::validate_query(latitude, longitude, radius_meters)?;

        let index = self.ensure_index()?;

        let started = Instant::now();
        let results = index.query_within_radius(latitude, longitude, radius_meters)?;
        info!(
            "radius query ({latitude}, {longitude}, {radius_meters} m) returned {} results in {:.2?}",
            results.len(),
            started.elapsed()
        );
        Ok(results)
    }

    fn ensure_index(&mut self) -> Result<&PoiIndex> {
        let index = match self.index.take() {
            Some(index) => index,
            None => self.load_or_build()?,
        };
        Ok(self.index.insert(index))
    }

    fn load_or_build(&self) -> Result<PoiIndex> {
        let started = Instant::now();
        match PoiIndex::load(&self.config.cache_path) {
            Ok(index) => {
                info!(
                    "loaded cached index ({} records) in {:.2?}",
                    index.len(),
                    started.elapsed()
                );
                Ok(index)
            }
            Err(VicinityError::CacheMiss { reason, .. }) => {
                info!(
                    "cache miss ({reason}); building index from {}",
                    self.config.source_path.display()
                );
                self.build_and_save()
            }
            Err(err) => Err(err),
        }
    }

    fn build_and_save(&self) -> Result<PoiIndex> {
        let started = Instant::now();
        let collection = preprocess::load_features(&self.config.source_path)?;
        let (records, coordinates) = preprocess::build_records(&collection);
        let index = PoiIndex::build(records, coordinates);
        index.save(&self.config.cache_path)?;
        info!(
            "built and saved index ({} records) in {:.2?}",
            index.len(),
            started.elapsed()
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_query_fails_before_touching_the_filesystem() {
        // Both paths point nowhere; validation must reject the query first.
        let config = Config::default()
            .with_source_path("/nonexistent/source.geojson")
            .with_cache_path("/nonexistent/index.bin");
        let mut search = SearchProcess::new(config);

        let err = search.process(123.0, 2.35, 100.0).unwrap_err();
        assert!(matches!(err, VicinityError::InvalidQuery(_)));
    }

    #[test]
    fn missing_source_surfaces_as_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default()
            .with_source_path(dir.path().join("absent.geojson"))
            .with_cache_path(dir.path().join("index.bin"));
        let mut search = SearchProcess::new(config);

        let err = search.process(48.85, 2.35, 100.0).unwrap_err();
        assert!(matches!(err, VicinityError::Io(_)));
    }
}
