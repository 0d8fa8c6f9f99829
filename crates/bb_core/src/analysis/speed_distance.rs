//! Distance covered and speed per player from tactical positions.
//!
//! Only consecutive frames with a position on both ends produce a sample.
//! Gaps are not interpolated: the pair straddling a gap yields nothing and
//! the running distance simply carries over.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::{distance, Point2};
use crate::models::PlayerId;
use crate::tactical::TacticalPositions;

const MS_TO_KMH: f64 = 3.6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Meters moved since the previous frame
    pub displacement_m: f64,
    /// Running total up to and including this frame
    pub cumulative_m: f64,
    pub speed_kmh: f64,
}

/// frame → player → sample
pub type MotionSeries = Vec<BTreeMap<PlayerId, MotionSample>>;

pub struct SpeedDistanceCalculator {
    meters_per_unit: f64,
    frame_rate: f64,
}

impl SpeedDistanceCalculator {
    pub fn new(meters_per_unit: f64, frame_rate: f64) -> Self {
        Self {
            meters_per_unit,
            frame_rate,
        }
    }

    /// Per-pair displacement in meters, keyed by the later frame.
    fn displacements(&self, positions: &TacticalPositions, parallel: bool) -> Vec<BTreeMap<PlayerId, f64>> {
        let pair = |(prev, curr): (&BTreeMap<PlayerId, Point2>, &BTreeMap<PlayerId, Point2>)| {
            curr.iter()
                .filter_map(|(id, p)| prev.get(id).map(|q| (*id, distance(*q, *p) * self.meters_per_unit)))
                .collect::<BTreeMap<PlayerId, f64>>()
        };

        let pairs: Vec<_> = positions.iter().zip(positions.iter().skip(1)).collect();
        if parallel {
            pairs.into_par_iter().map(pair).collect()
        } else {
            pairs.into_iter().map(pair).collect()
        }
    }

    /// Samples for every frame; frame 0 is always empty.
    pub fn compute(&self, positions: &TacticalPositions, parallel: bool) -> MotionSeries {
        let mut series: MotionSeries = vec![BTreeMap::new(); positions.len()];
        let mut totals: BTreeMap<PlayerId, f64> = BTreeMap::new();

        for (offset, moved) in self.displacements(positions, parallel).into_iter().enumerate() {
            let frame = offset + 1;
            for (id, displacement_m) in moved {
                let cumulative_m = totals.entry(id).or_insert(0.0);
                *cumulative_m += displacement_m;
                series[frame].insert(
                    id,
                    MotionSample {
                        displacement_m,
                        cumulative_m: *cumulative_m,
                        speed_kmh: displacement_m * self.frame_rate * MS_TO_KMH,
                    },
                );
            }
        }

        series
    }
}

/// Final running distance per player.
pub fn total_distance(series: &MotionSeries) -> BTreeMap<PlayerId, f64> {
    let mut totals = BTreeMap::new();
    for frame in series {
        for (id, sample) in frame {
            totals.insert(*id, sample.cumulative_m);
        }
    }
    totals
}

/// Mean of the reported speeds per player.
pub fn average_speed(series: &MotionSeries) -> BTreeMap<PlayerId, f64> {
    let mut sums: BTreeMap<PlayerId, (f64, usize)> = BTreeMap::new();
    for frame in series {
        for (id, sample) in frame {
            let entry = sums.entry(*id).or_insert((0.0, 0));
            entry.0 += sample.speed_kmh;
            entry.1 += 1;
        }
    }
    sums.into_iter().map(|(id, (sum, n))| (id, sum / n as f64)).collect()
}
