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

pub mod vector;

pub use vector::*;

use serde::{Deserialize, Serialize};

/// A plane in world space, `normal · p + d = 0`.
///
/// Points with a positive signed distance lie on the kept side when the plane
/// is used to cut a lattice.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// Create a plane from the four coefficients of `ax + by + cz + d = 0`.
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self {
            normal: Vec3::new(a, b, c),
            d,
        }
    }

    /// Create a plane through `point` with the given normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Signed distance from `p` to the plane, in units of the normal's length.
    pub fn distance(&self, p: Vec3) -> f32 {
        let l = self.normal.len();
        if l == 0.0 {
            return std::f32::NAN;
        }
        (self.normal.dot(p) + self.d) / l
    }

    /// The plane coefficients as `[a, b, c, d]`.
    pub fn coefficients(&self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.d]
    }

    pub fn is_degenerate(&self) -> bool {
        self.normal.len_sq() == 0.0 || !self.d.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_distance() {
        let plane = Plane::new(0.0, 0.0, 2.0, -4.0);
        assert_eq!(plane.distance(vec3(1.0, 1.0, 2.0)), 0.0);
        assert_eq!(plane.distance(vec3(0.0, 0.0, 5.0)), 3.0);
        assert_eq!(plane.distance(vec3(0.0, 0.0, 0.0)), -2.0);
        assert!(Plane::new(0.0, 0.0, 0.0, 1.0).is_degenerate());
    }
}
