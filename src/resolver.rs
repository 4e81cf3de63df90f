//! Constrained assignment resolution.
//!
//! The resolver walks query points in input order. For each one it fetches a
//! ranked candidate list from the index, examines the closest
//! [`K_EXAMINE`](crate::config::K_EXAMINE) candidates, and commits the first
//! that survives every enabled rule. Capacity fills first-come-first-served:
//! a committed point never vacates its slot, so input order is part of the
//! contract, not an implementation detail.

use rustc_hash::FxHashMap;

use crate::config::{AssignmentConfig, K_EXAMINE, K_FETCH, ROUTE_CAPACITY};
use crate::error::{Result, RouteMatchError};
use crate::index::{Candidate, RouteIndex};
use crate::model::{
    Assignment, QueryPoint, RankSummary, ReferencePoint, Resolution, code_prefix,
    normalize_branch,
};

/// Pre-normalized comparison keys for one reference row.
struct ReferenceKey {
    route_prefix: String,
    branch: String,
}

/// Resolves query points against a [`RouteIndex`] under one configuration.
///
/// Owns the per-route load counts for the run: each route starts at its
/// pre-existing reference-point count and gains one per commit. A resolver is
/// single-use state; build a fresh one per run.
pub struct Resolver<'a> {
    index: &'a RouteIndex,
    config: AssignmentConfig,
    keys: Vec<ReferenceKey>,
    loads: FxHashMap<String, usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a RouteIndex, config: AssignmentConfig) -> Self {
        // Normalize the reference columns once up front; the policy loop
        // compares lowercase against lowercase.
        let keys = index
            .reference_points()
            .iter()
            .map(|point| ReferenceKey {
                route_prefix: code_prefix(&point.route_code),
                branch: normalize_branch(&point.branch),
            })
            .collect();
        let loads = index.route_counts().clone();

        Self {
            index,
            config,
            keys,
            loads,
        }
    }

    /// Current load for a route: pre-existing members plus commits this run.
    pub fn route_load(&self, route_code: &str) -> usize {
        self.loads.get(route_code).copied().unwrap_or(0)
    }

    /// Resolve a single query point.
    ///
    /// Fetches [`K_FETCH`] candidates, examines the nearest [`K_EXAMINE`] in
    /// rank order, and commits the first that passes every enabled rule,
    /// incrementing that route's load. Never fails: a point no candidate
    /// admits resolves to [`Assignment::Unassigned`].
    pub fn resolve(&mut self, query: &QueryPoint) -> Assignment {
        let candidates = self
            .index
            .nearest(query.latitude, query.longitude, K_FETCH);
        let prefix = code_prefix(&query.retailer_code);
        let branch = normalize_branch(&query.branch);

        for (position, candidate) in candidates.iter().take(K_EXAMINE).enumerate() {
            if !self.admits(candidate, &prefix, &branch) {
                continue;
            }

            let route_code = self.index.reference(candidate.reference).route_code.clone();
            *self.loads.entry(route_code.clone()).or_insert(0) += 1;
            return Assignment::Committed {
                route_code,
                distance_km: candidate.distance_km,
                rank: (position + 1) as u8,
            };
        }

        Assignment::Unassigned
    }

    /// Resolve every query point, in input order, tallying the rank summary.
    ///
    /// Input order is a documented contract: under capacity pressure it
    /// decides which points end up unassigned.
    pub fn resolve_all(&mut self, queries: &[QueryPoint]) -> Resolution {
        let mut assignments = Vec::with_capacity(queries.len());
        let mut summary = RankSummary::default();

        for query in queries {
            let assignment = self.resolve(query);
            summary.record(&assignment);
            assignments.push(assignment);
        }

        log::debug!(
            "resolved {} query points: {} committed, {} unassigned",
            queries.len(),
            summary.committed(),
            summary.unassigned()
        );

        Resolution {
            assignments,
            summary,
        }
    }

    fn admits(&self, candidate: &Candidate, prefix: &str, branch: &str) -> bool {
        if candidate.distance_km > self.config.max_distance_km {
            return false;
        }

        let key = &self.keys[candidate.reference];
        if self.config.enforce_prefix && prefix != key.route_prefix {
            return false;
        }
        if self.config.enforce_branch && branch != key.branch {
            return false;
        }
        if self.config.enforce_capacity {
            let route_code = &self.index.reference(candidate.reference).route_code;
            if self.route_load(route_code) >= ROUTE_CAPACITY {
                return false;
            }
        }

        true
    }
}

/// One-shot resolution: build the index and resolve every query point.
///
/// # Errors
///
/// [`RouteMatchError::EmptyReferenceSet`] when `reference` is empty;
/// [`RouteMatchError::InvalidConfig`] when the configuration fails
/// [`AssignmentConfig::validate`].
///
/// # Examples
///
/// ```rust
/// use routematch::{AssignmentConfig, QueryPoint, ReferencePoint, assign};
///
/// let reference = vec![ReferencePoint::new(
///     "KA001-07", "KA001-R01", 12.9716, 77.5946, "South",
/// )];
/// let queries = vec![QueryPoint::new("KA001-55", 12.9721, 77.5950, "south")];
///
/// let resolution = assign(reference, &queries, AssignmentConfig::default())?;
/// assert_eq!(resolution.assignments[0].route_code(), Some("KA001-R01"));
/// assert_eq!(resolution.summary.assigned_at(1), 1);
/// # Ok::<(), routematch::RouteMatchError>(())
/// ```
pub fn assign(
    reference: Vec<ReferencePoint>,
    queries: &[QueryPoint],
    config: AssignmentConfig,
) -> Result<Resolution> {
    config
        .validate()
        .map_err(RouteMatchError::InvalidConfig)?;

    let index = RouteIndex::build(reference)?;
    let mut resolver = Resolver::new(&index, config);
    Ok(resolver.resolve_all(queries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AssignmentConfig {
        AssignmentConfig::default()
    }

    fn reference(route: &str, branch: &str, latitude: f64, longitude: f64) -> ReferencePoint {
        ReferencePoint::new("AAAAA-00", route, latitude, longitude, branch)
    }

    fn query(id: &str, branch: &str, latitude: f64, longitude: f64) -> QueryPoint {
        QueryPoint::new(id, latitude, longitude, branch)
    }

    #[test]
    fn test_commit_increments_route_load() {
        let index = RouteIndex::build(vec![reference("AAAAA-R1", "north", 0.0, 0.0)]).unwrap();
        let mut resolver = Resolver::new(&index, config());
        assert_eq!(resolver.route_load("AAAAA-R1"), 1);

        let assignment = resolver.resolve(&query("AAAAA1", "north", 0.0, 0.001));
        assert!(assignment.is_committed());
        assert_eq!(resolver.route_load("AAAAA-R1"), 2);
    }

    #[test]
    fn test_unassigned_leaves_loads_untouched() {
        let index = RouteIndex::build(vec![reference("AAAAA-R1", "north", 0.0, 0.0)]).unwrap();
        let mut resolver = Resolver::new(&index, config());

        let assignment = resolver.resolve(&query("AAAAA1", "south", 0.0, 0.001));
        assert_eq!(assignment, Assignment::Unassigned);
        assert_eq!(resolver.route_load("AAAAA-R1"), 1);
    }

    #[test]
    fn test_distance_rule_always_enforced() {
        let index = RouteIndex::build(vec![reference("AAAAA-R1", "north", 0.0, 0.0)]).unwrap();
        let relaxed = config()
            .with_enforce_capacity(false)
            .with_enforce_prefix(false)
            .with_enforce_branch(false);
        let mut resolver = Resolver::new(&index, relaxed);

        // ~111 km away, cutoff is 10 km.
        let assignment = resolver.resolve(&query("AAAAA1", "north", 1.0, 0.0));
        assert_eq!(assignment, Assignment::Unassigned);
    }

    #[test]
    fn test_rank_reflects_candidate_position() {
        // Nearest candidate fails the branch rule; second-nearest passes.
        let index = RouteIndex::build(vec![
            reference("AAAAA-R1", "south", 0.0, 0.001),
            reference("AAAAA-R2", "north", 0.0, 0.002),
        ])
        .unwrap();
        let mut resolver = Resolver::new(&index, config());

        let assignment = resolver.resolve(&query("AAAAA1", "north", 0.0, 0.0));
        assert_eq!(assignment.route_code(), Some("AAAAA-R2"));
        assert_eq!(assignment.rank(), Some(2));
    }

    #[test]
    fn test_assign_rejects_invalid_config() {
        let mut bad = config();
        bad.max_distance_km = -1.0;

        let result = assign(
            vec![reference("AAAAA-R1", "north", 0.0, 0.0)],
            &[],
            bad,
        );
        assert!(matches!(result, Err(RouteMatchError::InvalidConfig(_))));
    }
}
