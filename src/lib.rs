//! Radius-bounded nearest-neighbor search over geolocated points of interest.
//!
//! Raw geojson point records become a queryable k-d tree, the built index is
//! persisted as a single cache artifact to avoid rebuild cost, and radius
//! queries report haversine distances in deterministic order.
//!
//! ```rust
//! use vicinity::{PoiIndex, PointRecord};
//!
//! let records = vec![
//!     PointRecord::new("Le Severo", 48.8319929, 2.3245488, "Point"),
//!     PointRecord::new("Lida", 48.8326892, 2.3241490, "Point"),
//! ];
//! let coordinates = records.iter().map(|r| r.coordinate()).collect();
//! let index = PoiIndex::build(records, coordinates);
//!
//! let results = index.query_within_radius(48.8319929, 2.3245488, 100.0)?;
//! assert_eq!(results[0].name, "Le Severo");
//! assert_eq!(results[0].distance, 0.0);
//! # Ok::<(), vicinity::VicinityError>(())
//! ```

pub mod error;
pub mod kdtree;
pub mod preprocess;
pub mod process;
pub mod spatial;
pub mod store;
pub mod types;

pub use error::{Result, VicinityError};
pub use kdtree::KdTree;
pub use process::SearchProcess;
pub use spatial::{conservative_degree_radius, haversine_distance, validate_query};
pub use store::PoiIndex;
pub use types::{Config, PointRecord, QueryResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        Config, PoiIndex, PointRecord, QueryResult, Result, SearchProcess, VicinityError,
    };
}
