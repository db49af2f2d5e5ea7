// Copyright 2021 Tristam MacDonald
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// The threshold separating inside from outside.
///
/// An absolute cutoff treats `v` and `-v` alike, so a single positive value
/// captures both lobes of a signed field.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cutoff {
    pub value: f32,
    pub is_absolute: bool,
}

impl Cutoff {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            is_absolute: false,
        }
    }

    pub fn absolute(value: f32) -> Self {
        Self {
            value,
            is_absolute: true,
        }
    }

    /// Classify a sample. NaN is always outside.
    ///
    /// A positive cutoff selects values at or above it (magnitudes, if
    /// absolute); a non-positive cutoff selects values at or below it.
    pub fn is_inside(&self, v: f32) -> bool {
        if v.is_nan() {
            return false;
        }
        if self.value > 0.0 {
            let v = if self.is_absolute { v.abs() } else { v };
            v >= self.value
        } else {
            v <= self.value
        }
    }

    /// True when inside is decided by magnitude, so a surface may have a
    /// positive and a negative lobe. A non-positive absolute cutoff classifies
    /// like a signed one.
    pub fn splits_lobes(&self) -> bool {
        self.is_absolute && self.value > 0.0
    }
}

impl Default for Cutoff {
    fn default() -> Self {
        Self::new(0.5)
    }
}

/// Fractional position of the cutoff between two samples.
///
/// Returns `None` when there is no usable crossing: either value is NaN, the
/// two values coincide, or the crossing falls outside the edge even after the
/// absolute-cutoff retry.
pub fn edge_fraction(cutoff: Cutoff, value_a: f32, value_b: f32) -> Option<f32> {
    if value_a.is_nan() || value_b.is_nan() {
        return None;
    }
    let delta = value_b - value_a;
    if delta == 0.0 {
        return None;
    }
    let in_range = |f: f32| (0.0..=1.0).contains(&f);

    let fraction = (cutoff.value - value_a) / delta;
    if in_range(fraction) {
        return Some(fraction);
    }
    if cutoff.is_absolute {
        let fraction = (-cutoff.value - value_a) / delta;
        if in_range(fraction) {
            return Some(fraction);
        }
    }
    None
}

/// Linearly interpolate a point along an edge.
pub fn interpolate(a: Vec3, b: Vec3, fraction: f32) -> Vec3 {
    a + (b - a) * fraction
}

/// A cutoff crossing along one lattice edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeCrossing {
    /// Linear indices of the edge's end points, lower first. The lower index
    /// doubles as the association key for contour stitching.
    pub corners: [usize; 2],
    pub fraction: f32,
    pub position: Vec3,
    pub value: f32,
}

impl EdgeCrossing {
    /// Locate the crossing between two corners, if there is one.
    pub fn locate(
        cutoff: Cutoff,
        corners: [usize; 2],
        points: [Vec3; 2],
        values: [f32; 2],
    ) -> Option<Self> {
        let fraction = edge_fraction(cutoff, values[0], values[1])?;
        Some(Self {
            corners,
            fraction,
            position: interpolate(points[0], points[1], fraction),
            value: values[0] + (values[1] - values[0]) * fraction,
        })
    }

    pub fn association(&self) -> usize {
        self.corners[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inside_classification() {
        let c = Cutoff::new(0.5);
        assert!(c.is_inside(0.5));
        assert!(c.is_inside(2.0));
        assert!(!c.is_inside(-2.0));
        assert!(!c.is_inside(std::f32::NAN));

        let c = Cutoff::absolute(0.5);
        assert!(c.is_inside(-2.0));
        assert!(!c.is_inside(0.1));
        assert!(c.splits_lobes());
        assert!(!Cutoff::absolute(0.0).splits_lobes());
        assert!(!Cutoff::new(0.5).splits_lobes());

        let c = Cutoff::new(-0.5);
        assert!(c.is_inside(-1.0));
        assert!(!c.is_inside(0.0));
    }

    #[test]
    fn test_fraction() {
        let c = Cutoff::new(0.5);
        assert_relative_eq!(edge_fraction(c, 0.0, 1.0).unwrap(), 0.5);
        assert_relative_eq!(edge_fraction(c, 1.0, 0.0).unwrap(), 0.5);
        assert_relative_eq!(edge_fraction(c, 0.0, 2.0).unwrap(), 0.25);
    }

    #[test]
    fn test_degenerate_edges() {
        let c = Cutoff::new(0.5);
        assert_eq!(edge_fraction(c, 1.0, 1.0), None);
        assert_eq!(edge_fraction(c, std::f32::NAN, 1.0), None);
        assert_eq!(edge_fraction(c, 0.0, 0.25), None);
    }

    #[test]
    fn test_absolute_retries_negative_cutoff() {
        let c = Cutoff::absolute(0.5);
        assert_relative_eq!(edge_fraction(c, 0.0, -1.0).unwrap(), 0.5);
        assert_relative_eq!(edge_fraction(c, -2.0, 0.0).unwrap(), 0.75);
        assert_eq!(edge_fraction(Cutoff::new(0.5), 0.0, -1.0), None);
    }

    #[test]
    fn test_locate() {
        let crossing = EdgeCrossing::locate(
            Cutoff::new(1.0),
            [0, 1],
            [Vec3::zero(), Vec3::new(0.0, 0.0, 4.0)],
            [0.0, 4.0],
        )
        .unwrap();
        assert_eq!(crossing.position, Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(crossing.value, 1.0);
        assert_eq!(crossing.association(), 0);
    }
}
