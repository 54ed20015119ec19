//! Instructor roster entries.
//!
//! An [`Instructor`] is pure identity plus seniority tier. Everything
//! that changes during construction (weekly minutes, daily class counts,
//! locations worked) lives in the allocation state, keyed by instructor
//! name, so the roster itself stays immutable.

use serde::{Deserialize, Serialize};

use super::HOUR_MIN;

/// Seniority tier. Drives format eligibility and the weekly hour cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructorTier {
    /// Full format range, preferred for peak slots.
    Senior,
    /// Full format range except advanced formats.
    Standard,
    /// Whitelisted formats only, reduced weekly cap.
    New,
}

impl InstructorTier {
    /// Weekly assignment cap in minutes: 10h for new instructors,
    /// 15h otherwise.
    #[inline]
    pub fn weekly_cap_min(&self) -> i32 {
        match self {
            InstructorTier::New => 10 * HOUR_MIN,
            _ => 15 * HOUR_MIN,
        }
    }
}

/// A teachable staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instructor {
    /// Unique name within the roster.
    pub name: String,
    /// Seniority tier.
    pub tier: InstructorTier,
}

impl Instructor {
    /// Creates an instructor.
    pub fn new(name: impl Into<String>, tier: InstructorTier) -> Self {
        Self {
            name: name.into(),
            tier,
        }
    }

    /// Shorthand for a senior-tier instructor.
    pub fn senior(name: impl Into<String>) -> Self {
        Self::new(name, InstructorTier::Senior)
    }

    /// Shorthand for a standard-tier instructor.
    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(name, InstructorTier::Standard)
    }

    /// Shorthand for a new-tier instructor.
    pub fn new_tier(name: impl Into<String>) -> Self {
        Self::new(name, InstructorTier::New)
    }

    /// Whether this instructor may teach advanced formats.
    #[inline]
    pub fn is_senior(&self) -> bool {
        self.tier == InstructorTier::Senior
    }
}
