//! Input validation for scheduling datasets.
//!
//! Checks structural integrity of records, rosters, and configuration
//! before construction. Detects:
//! - Duplicate roster names
//! - References to unknown locations or instructors
//! - Zero-capacity locations
//! - Out-of-range record metrics

use crate::config::ScheduleConfig;
use crate::models::{ClassRecord, Instructor, Location};
use std::collections::HashSet;

/// Result of the input integrity pass.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// One detected input problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Machine-checkable category.
    pub kind: ValidationErrorKind,
    /// Text naming the offending entity.
    pub message: String,
}

/// Kinds of input problems the pre-flight pass detects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two roster entries share a name.
    DuplicateName,
    /// A record or seed references a location that doesn't exist.
    UnknownLocation,
    /// A record or seed references an instructor that doesn't exist.
    UnknownInstructor,
    /// A location cannot host a single class.
    InvalidCapacity,
    /// A record carries a negative or non-finite metric.
    InvalidMetric,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a schedule build.
///
/// Checks:
/// 1. No duplicate instructor names
/// 2. No duplicate location names
/// 3. All locations can host at least one class
/// 4. All record references point to existing locations and instructors
/// 5. All seed assignments reference existing locations and instructors
/// 6. The configured primary location exists
/// 7. Record metrics are finite and non-negative
///
/// # Returns
/// `Ok(())` when the dataset is usable, otherwise every problem found.
pub fn validate_input(
    records: &[ClassRecord],
    instructors: &[Instructor],
    locations: &[Location],
    config: &ScheduleConfig,
) -> ValidationResult {
    let mut errors = Vec::new();

    // Collect roster names
    let mut location_names = HashSet::new();
    for location in locations {
        if !location_names.insert(location.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate location name: {}", location.name),
            ));
        }
        if location.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Location '{}' has zero capacity", location.name),
            ));
        }
    }

    let mut instructor_names = HashSet::new();
    for instructor in instructors {
        if !instructor_names.insert(instructor.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate instructor name: {}", instructor.name),
            ));
        }
    }

    // Check record references and metrics
    for (i, record) in records.iter().enumerate() {
        if !location_names.contains(record.location.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownLocation,
                format!("Record {i} references unknown location '{}'", record.location),
            ));
        }
        if !instructor_names.contains(record.instructor.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownInstructor,
                format!(
                    "Record {i} references unknown instructor '{}'",
                    record.instructor
                ),
            ));
        }
        if !record.revenue.is_finite() || record.revenue < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidMetric,
                format!("Record {i} has invalid revenue {}", record.revenue),
            ));
        }
    }

    // Check configuration references
    if let Some(primary) = &config.primary_location {
        if !location_names.contains(primary.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownLocation,
                format!("Primary location '{primary}' does not exist"),
            ));
        }
    }
    for seed in &config.seed_assignments {
        if !location_names.contains(seed.location.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownLocation,
                format!(
                    "Seed '{}' references unknown location '{}'",
                    seed.format, seed.location
                ),
            ));
        }
        if !instructor_names.contains(seed.instructor.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownInstructor,
                format!(
                    "Seed '{}' references unknown instructor '{}'",
                    seed.format, seed.instructor
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
