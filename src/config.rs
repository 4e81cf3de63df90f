//! Configuration for a resolution run.

use serde::{Deserialize, Serialize};

/// Number of nearest reference points fetched from the index per query point.
///
/// Deliberately larger than [`K_EXAMINE`]: the over-fetch leaves headroom so
/// enough ranked candidates survive rule filtering without re-querying.
pub const K_FETCH: usize = 10;

/// Number of fetched candidates the policy loop actually examines (rank 1..=5).
pub const K_EXAMINE: usize = 5;

/// Maximum number of stores a route may hold while the capacity rule is on.
pub const ROUTE_CAPACITY: usize = 33;

/// Half the Earth's circumference; a distance cutoff beyond this rejects nothing.
const VACUOUS_DISTANCE_KM: f64 = 20_015.0;

/// Toggles and thresholds for one resolution run.
///
/// The distance rule is always enforced; prefix, branch, and capacity checks
/// can each be switched off independently.
///
/// # Examples
///
/// ```rust
/// use routematch::AssignmentConfig;
///
/// let config = AssignmentConfig::default()
///     .with_max_distance_km(25.0)
///     .with_enforce_prefix(false);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentConfig {
    /// Maximum great-circle distance in kilometers for a candidate to qualify.
    #[serde(default = "AssignmentConfig::default_max_distance_km")]
    pub max_distance_km: f64,

    /// Reject candidates whose route already holds [`ROUTE_CAPACITY`] stores.
    #[serde(default = "AssignmentConfig::default_toggle")]
    pub enforce_capacity: bool,

    /// Require the query and candidate route code prefixes to match.
    #[serde(default = "AssignmentConfig::default_toggle")]
    pub enforce_prefix: bool,

    /// Require the query and candidate branches to match (case-insensitive).
    #[serde(default = "AssignmentConfig::default_toggle")]
    pub enforce_branch: bool,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            max_distance_km: Self::default_max_distance_km(),
            enforce_capacity: true,
            enforce_prefix: true,
            enforce_branch: true,
        }
    }
}

impl AssignmentConfig {
    const fn default_max_distance_km() -> f64 {
        10.0
    }

    const fn default_toggle() -> bool {
        true
    }

    pub fn with_max_distance_km(mut self, max_distance_km: f64) -> Self {
        assert!(
            max_distance_km.is_finite() && max_distance_km > 0.0,
            "Max distance must be a positive, finite number of kilometers"
        );

        if max_distance_km > VACUOUS_DISTANCE_KM {
            log::warn!(
                "Max distance of {} km exceeds half the Earth's circumference; \
                the distance rule will reject nothing.",
                max_distance_km
            );
        }

        self.max_distance_km = max_distance_km;
        self
    }

    pub fn with_enforce_capacity(mut self, enforce: bool) -> Self {
        self.enforce_capacity = enforce;
        self
    }

    pub fn with_enforce_prefix(mut self, enforce: bool) -> Self {
        self.enforce_prefix = enforce;
        self
    }

    pub fn with_enforce_branch(mut self, enforce: bool) -> Self {
        self.enforce_branch = enforce;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.max_distance_km.is_finite() {
            return Err(format!(
                "Max distance must be finite, got: {}",
                self.max_distance_km
            ));
        }

        if self.max_distance_km <= 0.0 {
            return Err(format!(
                "Max distance must be greater than zero, got: {}",
                self.max_distance_km
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        use serde::de::Error;

        let config: AssignmentConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
