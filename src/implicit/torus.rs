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

use crate::{math::Vec3, source::ScalarField};

/// Signed distance to a torus lying in the `xy` plane.
#[derive(Copy, Clone, Debug)]
pub struct Torus {
    /// The radius from the center point to the middle of the ring.
    pub radius: f32,
    /// The radius of the tube.
    pub tube_radius: f32,
}

impl Torus {
    pub fn new(radius: f32, tube_radius: f32) -> Self {
        Self {
            radius,
            tube_radius,
        }
    }
}

impl ScalarField for Torus {
    fn sample(&self, p: Vec3) -> f32 {
        let q_x = (p.x * p.x + p.y * p.y).sqrt() - self.radius;
        (q_x * q_x + p.z * p.z).sqrt() - self.tube_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torus() {
        let torus = Torus::new(8.0, 2.0);

        assert_eq!(torus.sample(Vec3::zero()), 6.0);
        assert_eq!(torus.sample(Vec3::new(8.0, 0.0, 0.0)), -2.0);
        assert_eq!(torus.sample(Vec3::new(0.0, 10.0, 0.0)), 0.0);
        assert_eq!(torus.sample(Vec3::new(8.0, 0.0, 8.0)), 6.0);
    }
}
