//! Local recomputation of the total score.
//!
//! The total is the mean of the strictly positive pillar scores, rounded to
//! one decimal place. Zero scores mark missing or unusable pillars and do not
//! count toward the mean. Any total supplied by the model is ignored.

use crate::domain::PillarScore;

/// Aggregate pillar scores into a total in `0.0..=10.0`.
pub fn aggregate(pillars: &[PillarScore]) -> f64 {
    let (sum, count) = pillars
        .iter()
        .filter(|p| p.score > 0)
        .fold((0u32, 0u32), |(sum, count), p| {
            (sum + u32::from(p.score), count + 1)
        });

    if count == 0 {
        return 0.0;
    }
    round_one_decimal(f64::from(sum) / f64::from(count))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
