//! Row and result types for the matching engine.
//!
//! The engine's boundary is tabular: reference and query rows come in,
//! annotated assignments and a rank summary go out. File formats and
//! transport are the caller's concern; every type here derives serde so the
//! caller can marshal rows however it likes.

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::config::K_EXAMINE;

/// Number of identifier characters compared by the prefix rule.
pub const PREFIX_LEN: usize = 5;

/// One row of the reference ("covered") dataset: a store already bound to a
/// route, used as a matching anchor. Many reference points share one
/// `route_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub retailer_code: String,
    pub route_code: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Free-text group label, compared case-insensitively.
    pub branch: String,
}

impl ReferencePoint {
    pub fn new(
        retailer_code: impl Into<String>,
        route_code: impl Into<String>,
        latitude: f64,
        longitude: f64,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            retailer_code: retailer_code.into(),
            route_code: route_code.into(),
            latitude,
            longitude,
            branch: branch.into(),
        }
    }

    /// Position as a `geo` point (x = longitude, y = latitude).
    pub fn position(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// One row of the orphan ("not-covered") dataset: a store needing a route.
/// The first [`PREFIX_LEN`] characters of `retailer_code` form its prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub retailer_code: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Free-text group label, compared case-insensitively.
    pub branch: String,
}

impl QueryPoint {
    pub fn new(
        retailer_code: impl Into<String>,
        latitude: f64,
        longitude: f64,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            retailer_code: retailer_code.into(),
            latitude,
            longitude,
            branch: branch.into(),
        }
    }

    /// Position as a `geo` point (x = longitude, y = latitude).
    pub fn position(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// Outcome for one query point.
///
/// A committed assignment always carries all three columns: route code,
/// distance, and rank. There is no partial assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Assignment {
    Committed {
        route_code: String,
        /// Great-circle distance to the committed reference point, kilometers.
        distance_km: f64,
        /// 1-based position among the nearest candidates (1 = nearest).
        rank: u8,
    },
    Unassigned,
}

impl Assignment {
    pub fn is_committed(&self) -> bool {
        matches!(self, Assignment::Committed { .. })
    }

    /// `Assigned Route Code` column of the annotated output table.
    pub fn route_code(&self) -> Option<&str> {
        match self {
            Assignment::Committed { route_code, .. } => Some(route_code),
            Assignment::Unassigned => None,
        }
    }

    /// `Distance_km` column of the annotated output table.
    pub fn distance_km(&self) -> Option<f64> {
        match self {
            Assignment::Committed { distance_km, .. } => Some(*distance_km),
            Assignment::Unassigned => None,
        }
    }

    /// `Assignment Rank (1=nearest)` column of the annotated output table.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Assignment::Committed { rank, .. } => Some(*rank),
            Assignment::Unassigned => None,
        }
    }
}

/// One row of the summary output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub count: usize,
}

/// Per-rank tallies for one resolution run.
///
/// The sum of all buckets always equals the number of query points resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSummary {
    assigned: [usize; K_EXAMINE],
    unassigned: usize,
}

impl RankSummary {
    pub(crate) fn record(&mut self, assignment: &Assignment) {
        match assignment {
            Assignment::Committed { rank, .. } => {
                self.assigned[usize::from(*rank) - 1] += 1;
            }
            Assignment::Unassigned => self.unassigned += 1,
        }
    }

    /// Count of query points committed at `rank` (1-based).
    pub fn assigned_at(&self, rank: u8) -> usize {
        self.assigned[usize::from(rank) - 1]
    }

    /// Count of query points that matched no route.
    pub fn unassigned(&self) -> usize {
        self.unassigned
    }

    /// Count of query points committed at any rank.
    pub fn committed(&self) -> usize {
        self.assigned.iter().sum()
    }

    /// Total query points tallied.
    pub fn total(&self) -> usize {
        self.committed() + self.unassigned
    }

    /// The summary output table: `"1 Nearest"`..`"5 Nearest"`, `"Unassigned"`.
    pub fn rows(&self) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = self
            .assigned
            .iter()
            .enumerate()
            .map(|(i, &count)| SummaryRow {
                label: format!("{} Nearest", i + 1),
                count,
            })
            .collect();
        rows.push(SummaryRow {
            label: "Unassigned".to_string(),
            count: self.unassigned,
        });
        rows
    }
}

/// The result of one resolution run: one [`Assignment`] per query point, in
/// input order, plus the rank summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub assignments: Vec<Assignment>,
    pub summary: RankSummary,
}

/// Lowercase prefix of an identifying code: the first [`PREFIX_LEN`]
/// characters, or the whole code when shorter. No padding.
pub fn code_prefix(code: &str) -> String {
    code.chars()
        .take(PREFIX_LEN)
        .collect::<String>()
        .to_lowercase()
}

pub(crate) fn normalize_branch(branch: &str) -> String {
    branch.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_prefix() {
        assert_eq!(code_prefix("KA001-R07"), "ka001");
        assert_eq!(code_prefix("AAAAA1"), "aaaaa");
        assert_eq!(code_prefix("AB1"), "ab1");
        assert_eq!(code_prefix(""), "");
    }

    #[test]
    fn test_code_prefix_is_char_based() {
        // Multi-byte identifiers truncate by character, not by byte.
        assert_eq!(code_prefix("ÅBCDEF"), "åbcde");
    }

    #[test]
    fn test_assignment_accessors() {
        let committed = Assignment::Committed {
            route_code: "KA001-R07".to_string(),
            distance_km: 1.25,
            rank: 2,
        };
        assert!(committed.is_committed());
        assert_eq!(committed.route_code(), Some("KA001-R07"));
        assert_eq!(committed.distance_km(), Some(1.25));
        assert_eq!(committed.rank(), Some(2));

        let unassigned = Assignment::Unassigned;
        assert!(!unassigned.is_committed());
        assert_eq!(unassigned.route_code(), None);
        assert_eq!(unassigned.distance_km(), None);
        assert_eq!(unassigned.rank(), None);
    }

    #[test]
    fn test_summary_tallies_and_rows() {
        let mut summary = RankSummary::default();
        summary.record(&Assignment::Committed {
            route_code: "r".to_string(),
            distance_km: 0.5,
            rank: 1,
        });
        summary.record(&Assignment::Committed {
            route_code: "r".to_string(),
            distance_km: 0.9,
            rank: 1,
        });
        summary.record(&Assignment::Committed {
            route_code: "r".to_string(),
            distance_km: 2.0,
            rank: 3,
        });
        summary.record(&Assignment::Unassigned);

        assert_eq!(summary.assigned_at(1), 2);
        assert_eq!(summary.assigned_at(2), 0);
        assert_eq!(summary.assigned_at(3), 1);
        assert_eq!(summary.unassigned(), 1);
        assert_eq!(summary.committed(), 3);
        assert_eq!(summary.total(), 4);

        let rows = summary.rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].label, "1 Nearest");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[4].label, "5 Nearest");
        assert_eq!(rows[4].count, 0);
        assert_eq!(rows[5].label, "Unassigned");
        assert_eq!(rows[5].count, 1);
    }

    #[test]
    fn test_position_is_lon_lat() {
        let point = ReferencePoint::new("KA001-01", "KA001-R01", 12.9716, 77.5946, "South");
        assert_eq!(point.position().x(), 77.5946);
        assert_eq!(point.position().y(), 12.9716);
    }
}
