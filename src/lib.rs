//! Batch geospatial matcher that assigns uncovered stores to nearby delivery routes.
//!
//! Given a reference dataset of stores already bound to routes and a set of
//! orphan stores, the engine indexes the reference points, queries ranked
//! nearest neighbors per orphan under great-circle distance, and commits each
//! orphan to the closest route that survives the distance, prefix, branch,
//! and capacity rules.
//!
//! ```rust
//! use routematch::{AssignmentConfig, QueryPoint, ReferencePoint, assign};
//!
//! let reference = vec![
//!     ReferencePoint::new("KA001-07", "KA001-R01", 12.9716, 77.5946, "South"),
//!     ReferencePoint::new("KA001-12", "KA001-R01", 12.9750, 77.6000, "South"),
//! ];
//! let queries = vec![QueryPoint::new("KA001-55", 12.9721, 77.5950, "south")];
//!
//! let resolution = assign(reference, &queries, AssignmentConfig::default())?;
//! assert_eq!(resolution.assignments[0].route_code(), Some("KA001-R01"));
//! assert_eq!(resolution.summary.unassigned(), 0);
//! # Ok::<(), routematch::RouteMatchError>(())
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod resolver;
pub mod validate;

pub use config::{AssignmentConfig, K_EXAMINE, K_FETCH, ROUTE_CAPACITY};
pub use error::{Result, RouteMatchError};
pub use index::{Candidate, CandidateList, EARTH_RADIUS_KM, RouteIndex};
pub use model::{
    Assignment, PREFIX_LEN, QueryPoint, RankSummary, ReferencePoint, Resolution, SummaryRow,
    code_prefix,
};
pub use resolver::{Resolver, assign};
pub use validate::{clean_queries, clean_reference, validate_position};

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{AssignmentConfig, Result, RouteMatchError};

    pub use crate::{Assignment, QueryPoint, RankSummary, ReferencePoint, Resolution};

    pub use crate::{Resolver, RouteIndex, assign};

    pub use geo::Point;
}
