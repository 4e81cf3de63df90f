//! Validation and cleaning for geographic coordinates.
//!
//! The resolver assumes clean, fully-numeric coordinates. Callers loading
//! data from the wild can run their rows through the cleaning pass here
//! before building an index; rows with unusable coordinates are dropped and
//! counted rather than failing the run.

use geo::Point;

use crate::error::{Result, RouteMatchError};
use crate::model::{QueryPoint, ReferencePoint};

/// Validates that a position has a usable longitude and latitude.
///
/// Longitude: [-180.0, 180.0], latitude: [-90.0, 90.0], both finite.
///
/// # Examples
///
/// ```rust
/// use routematch::{Point, validate::validate_position};
///
/// let bengaluru = Point::new(77.5946, 12.9716);
/// assert!(validate_position(&bengaluru).is_ok());
///
/// let invalid = Point::new(200.0, 12.9716);
/// assert!(validate_position(&invalid).is_err());
/// ```
pub fn validate_position(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(RouteMatchError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(RouteMatchError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(RouteMatchError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(RouteMatchError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Drops reference rows with unusable coordinates.
///
/// Returns the surviving rows and the number dropped.
pub fn clean_reference(rows: Vec<ReferencePoint>) -> (Vec<ReferencePoint>, usize) {
    clean_rows(rows, "reference", |row| row.position())
}

/// Drops query rows with unusable coordinates.
///
/// Returns the surviving rows and the number dropped.
pub fn clean_queries(rows: Vec<QueryPoint>) -> (Vec<QueryPoint>, usize) {
    clean_rows(rows, "query", |row| row.position())
}

fn clean_rows<T>(rows: Vec<T>, dataset: &str, position: impl Fn(&T) -> Point) -> (Vec<T>, usize) {
    let before = rows.len();
    let kept: Vec<T> = rows
        .into_iter()
        .filter(|row| validate_position(&position(row)).is_ok())
        .collect();
    let dropped = before - kept.len();

    if dropped > 0 {
        log::warn!(
            "dropped {} of {} {} rows with unusable coordinates",
            dropped,
            before,
            dataset
        );
    }

    (kept, dropped)
}
