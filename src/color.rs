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


//! Per-vertex and per-polygon colour data.

use serde::{Deserialize, Serialize};

/// Maps a scalar onto a red→blue hue ramp, packed as `0xAARRGGBB`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    /// The value drawn pure red.
    pub red_value: f32,
    /// The value drawn pure blue.
    pub blue_value: f32,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            red_value: 0.0,
            blue_value: 1.0,
        }
    }
}

impl ColorScale {
    pub fn new(red_value: f32, blue_value: f32) -> Self {
        Self {
            red_value,
            blue_value,
        }
    }

    /// A scale spanning a value range.
    pub fn from_range(min: f32, max: f32) -> Self {
        Self::new(min, max)
    }

    pub fn argb(&self, value: f32) -> u32 {
        let span = self.blue_value - self.red_value;
        let t = if span == 0.0 || value.is_nan() {
            0.0
        } else {
            ((value - self.red_value) / span).max(0.0).min(1.0)
        };
        hue_to_argb(t * 240.0)
    }
}

// Fully saturated, full value HSV to ARGB.
fn hue_to_argb(hue: f32) -> u32 {
    let h = hue / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let channel = |c: f32| (c * 255.0).round() as u32;
    0xFF00_0000 | channel(r) << 16 | channel(g) << 8 | channel(b)
}

/// How many characters each colour datum takes in a compact stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorPrecision {
    Single,
    Double,
}

impl Default for ColorPrecision {
    fn default() -> Self {
        ColorPrecision::Single
    }
}

impl ColorPrecision {
    pub fn chars_per_value(self) -> usize {
        match self {
            ColorPrecision::Single => 1,
            ColorPrecision::Double => 2,
        }
    }
}

/// Whether colour values belong to vertices or to triangles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTarget {
    Vertex,
    Polygon,
}

/// Scalar colour values with the range they are normalised against.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorData {
    pub precision: ColorPrecision,
    pub target: ColorTarget,
    pub min: f32,
    pub max: f32,
    pub values: Vec<f32>,
}

impl ColorData {
    /// Wrap values, taking the range from their finite extremes.
    pub fn new(precision: ColorPrecision, target: ColorTarget, values: Vec<f32>) -> Self {
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((std::f32::INFINITY, std::f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let (min, max) = if min > max { (0.0, 0.0) } else { (min, max) };
        Self {
            precision,
            target,
            min,
            max,
            values,
        }
    }

    /// Position of a value within `[min, max]`. A flat range passes the value
    /// through unchanged.
    pub fn to_fraction(&self, value: f32) -> f32 {
        if self.max == self.min {
            value
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    pub fn from_fraction(&self, fraction: f32) -> f32 {
        if self.max == self.min {
            fraction
        } else {
            self.min + fraction * (self.max - self.min)
        }
    }

    pub fn argb(&self, scale: &ColorScale) -> Vec<u32> {
        self.values.iter().map(|&v| scale.argb(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ramp_ends() {
        let scale = ColorScale::new(-1.0, 1.0);
        assert_eq!(scale.argb(-1.0), 0xFFFF_0000);
        assert_eq!(scale.argb(1.0), 0xFF00_00FF);
        assert_eq!(scale.argb(0.0), 0xFF00_FF00);
        assert_eq!(scale.argb(5.0), 0xFF00_00FF);
    }

    #[test]
    fn test_fraction_mapping() {
        let data = ColorData::new(
            ColorPrecision::Double,
            ColorTarget::Vertex,
            vec![2.0, 4.0, std::f32::NAN, 3.0],
        );
        assert_eq!((data.min, data.max), (2.0, 4.0));
        assert_relative_eq!(data.to_fraction(3.0), 0.5);
        assert_relative_eq!(data.from_fraction(0.25), 2.5);
    }

    #[test]
    fn test_flat_range() {
        let data = ColorData::new(ColorPrecision::Single, ColorTarget::Polygon, vec![0.3; 4]);
        assert_relative_eq!(data.to_fraction(0.3), 0.3);
        assert_relative_eq!(data.from_fraction(0.3), 0.3);
    }
}
