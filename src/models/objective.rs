//! Optimization objectives.
//!
//! The objective picks the weight blend applied to a slot's historical
//! averages when ranking candidate formats. Revenue is normalized to the
//! participant scale before blending (see `ScheduleConfig::revenue_scale`)
//! so the two terms are comparable.

use serde::{Deserialize, Serialize};

/// What the builder optimizes the week for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Objective {
    /// 0.7 x normalized revenue + 0.3 x average participants.
    Revenue,
    /// 0.8 x average participants + 0.2 x normalized revenue.
    Attendance,
    /// Equal blend.
    #[default]
    Balanced,
}

impl Objective {
    /// Blend weights as (participants, normalized revenue).
    pub fn weights(&self) -> (f64, f64) {
        match self {
            Objective::Revenue => (0.3, 0.7),
            Objective::Attendance => (0.8, 0.2),
            Objective::Balanced => (0.5, 0.5),
        }
    }

    /// Scores a candidate from its historical averages.
    pub fn score(&self, avg_participants: f64, normalized_revenue: f64) -> f64 {
        let (wp, wr) = self.weights();
        wp * avg_participants + wr * normalized_revenue
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Objective::Revenue => "revenue",
            Objective::Attendance => "attendance",
            Objective::Balanced => "balanced",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        for obj in [Objective::Revenue, Objective::Attendance, Objective::Balanced] {
            let (wp, wr) = obj.weights();
            assert!((wp + wr - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_score_blend() {
        // 10 participants, 150.0 revenue normalized by 100 -> 1.5
        let score = Objective::Revenue.score(10.0, 1.5);
        assert!((score - (0.3 * 10.0 + 0.7 * 1.5)).abs() < 1e-10);

        let score = Objective::Attendance.score(10.0, 1.5);
        assert!((score - (0.8 * 10.0 + 0.2 * 1.5)).abs() < 1e-10);

        let score = Objective::Balanced.score(10.0, 1.5);
        assert!((score - 5.75).abs() < 1e-10);
    }

    #[test]
    fn test_default_is_balanced() {
        assert_eq!(Objective::default(), Objective::Balanced);
    }
}
