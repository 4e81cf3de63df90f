//! Spatial index over the reference dataset.
//!
//! Reference coordinates are embedded on the unit sphere and indexed with an
//! R-tree. Euclidean chord distance between unit vectors is monotonic in
//! great-circle distance, so the tree's nearest-neighbor order is already
//! great-circle order; chord lengths are converted to kilometers on the way
//! out. This keeps ranked lookup exact across the antimeridian and near the
//! poles, where a lon/lat-plane index would misorder candidates.

use rstar::{Point as RStarPoint, RTree};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::config::K_FETCH;
use crate::error::{Result, RouteMatchError};
use crate::model::ReferencePoint;

/// Mean Earth radius in kilometers for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A reference row embedded on the unit sphere, tagged with its row index.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SurfacePoint {
    pos: [f64; 3],
    row: usize,
}

impl SurfacePoint {
    fn from_degrees(latitude: f64, longitude: f64, row: usize) -> Self {
        let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
        Self {
            pos: [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat],
            row,
        }
    }
}

impl RStarPoint for SurfacePoint {
    type Scalar = f64;
    const DIMENSIONS: usize = 3;

    fn generate(mut generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        Self {
            pos: [generator(0), generator(1), generator(2)],
            row: usize::MAX,
        }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        self.pos[index]
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        &mut self.pos[index]
    }
}

/// A ranked candidate: a reference row index and its great-circle distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into [`RouteIndex::reference_points`].
    pub reference: usize,
    /// Great-circle distance from the query point, kilometers.
    pub distance_km: f64,
}

/// Ranked candidates for one query point; [`K_FETCH`] entries fit inline.
pub type CandidateList = SmallVec<[Candidate; K_FETCH]>;

/// Queryable index over the reference dataset.
///
/// Built once per resolution run with [`RouteIndex::build`]; immutable
/// afterwards.
pub struct RouteIndex {
    tree: RTree<SurfacePoint>,
    reference: Vec<ReferencePoint>,
    route_counts: FxHashMap<String, usize>,
}

impl RouteIndex {
    /// Bulk-load an index over the reference dataset.
    ///
    /// Counts reference rows per `route_code` while loading; the counts seed
    /// the resolver's capacity tracking.
    ///
    /// # Errors
    ///
    /// [`RouteMatchError::EmptyReferenceSet`] when `reference` is empty.
    pub fn build(reference: Vec<ReferencePoint>) -> Result<Self> {
        if reference.is_empty() {
            return Err(RouteMatchError::EmptyReferenceSet);
        }

        let embedded = reference
            .iter()
            .enumerate()
            .map(|(row, point)| SurfacePoint::from_degrees(point.latitude, point.longitude, row))
            .collect();
        let tree = RTree::bulk_load(embedded);

        let mut route_counts = FxHashMap::default();
        for point in &reference {
            *route_counts.entry(point.route_code.clone()).or_insert(0) += 1;
        }

        log::debug!(
            "built route index over {} reference points across {} routes",
            reference.len(),
            route_counts.len()
        );

        Ok(Self {
            tree,
            reference,
            route_counts,
        })
    }

    /// Number of indexed reference points. Never zero.
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// The reference row behind a [`Candidate::reference`] index.
    pub fn reference(&self, row: usize) -> &ReferencePoint {
        &self.reference[row]
    }

    /// All indexed reference rows, in input order.
    pub fn reference_points(&self) -> &[ReferencePoint] {
        &self.reference
    }

    /// Pre-existing member count per `route_code`.
    pub fn route_counts(&self) -> &FxHashMap<String, usize> {
        &self.route_counts
    }

    /// The `k` nearest reference points to `(latitude, longitude)`, ordered by
    /// ascending great-circle distance. Returns fewer than `k` entries when
    /// the reference set is smaller than `k`.
    ///
    /// Equal distances are broken by R-tree traversal order: deterministic
    /// for a fixed reference set, but not otherwise specified.
    pub fn nearest(&self, latitude: f64, longitude: f64, k: usize) -> CandidateList {
        let query = SurfacePoint::from_degrees(latitude, longitude, usize::MAX);
        self.tree
            .nearest_neighbor_iter_with_distance_2(&query)
            .take(k)
            .map(|(point, chord_2)| Candidate {
                reference: point.row,
                distance_km: chord_to_km(chord_2),
            })
            .collect()
    }
}

/// Squared chord length between unit vectors to great-circle kilometers.
fn chord_to_km(chord_2: f64) -> f64 {
    // Clamp guards asin against rounding slightly past 1.0 for antipodes.
    let half_chord = (chord_2.sqrt() / 2.0).min(1.0);
    EARTH_RADIUS_KM * 2.0 * half_chord.asin()
}
