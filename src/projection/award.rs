//! Electoral vote award policies.
//!
//! All policies share `other = 100 - (a + b)` and `diff = |a - b|`, and all
//! resolve the leader with a strict `a > b`: an exact tie goes to side B.

use crate::domain::{AwardOutcome, AwardPolicy, Leader};
use crate::math::other_share;

impl AwardPolicy {
    /// Decide the outcome for one unit.
    pub fn award(self, weight: u32, mean_a: f64, mean_b: f64, tossup_threshold: f64) -> AwardOutcome {
        match self {
            AwardPolicy::Proportional => award_proportional(weight, mean_a, mean_b, tossup_threshold),
            AwardPolicy::FlagOverlap => award_flag_overlap(weight, mean_a, mean_b, tossup_threshold),
            AwardPolicy::OverlapTossup => award_overlap_tossup(weight, mean_a, mean_b, tossup_threshold),
        }
    }
}

/// Policy 1: split "other" between the sides in proportion to their shares,
/// then compare the adjusted values. Never flagged.
pub fn award_proportional(weight: u32, mean_a: f64, mean_b: f64, tossup_threshold: f64) -> AwardOutcome {
    let other = other_share(mean_a, mean_b);
    let a = mean_a + other * mean_a / 100.0;
    let b = mean_b + other * mean_b / 100.0;
    let diff = (a - b).abs();

    if diff < tossup_threshold {
        return AwardOutcome::to_leader(Leader::Tossup, weight, false);
    }
    AwardOutcome::to_leader(larger_side(a, b), weight, false)
}

/// Policy 2: raw means decide; flag whenever "other" exceeds the margin.
pub fn award_flag_overlap(weight: u32, mean_a: f64, mean_b: f64, tossup_threshold: f64) -> AwardOutcome {
    let other = other_share(mean_a, mean_b);
    let diff = (mean_a - mean_b).abs();
    let flagged = other > diff;

    if diff < tossup_threshold {
        return AwardOutcome::to_leader(Leader::Tossup, weight, flagged);
    }
    AwardOutcome::to_leader(larger_side(mean_a, mean_b), weight, flagged)
}

/// Policy 3: "other" exceeding the margin forces a flagged tossup before the
/// threshold is even considered.
pub fn award_overlap_tossup(weight: u32, mean_a: f64, mean_b: f64, tossup_threshold: f64) -> AwardOutcome {
    let other = other_share(mean_a, mean_b);
    let diff = (mean_a - mean_b).abs();

    if other > diff {
        return AwardOutcome::to_leader(Leader::Tossup, weight, true);
    }
    if diff < tossup_threshold {
        return AwardOutcome::to_leader(Leader::Tossup, weight, false);
    }
    AwardOutcome::to_leader(larger_side(mean_a, mean_b), weight, false)
}

fn larger_side(a: f64, b: f64) -> Leader {
    if a > b { Leader::A } else { Leader::B }
}
