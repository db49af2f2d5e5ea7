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

/// A pair of Gaussian lobes of opposite sign, shaped like a p orbital.
///
/// The positive lobe sits at `+offset` along `axis`, the negative one at
/// `-offset`. Pair with an absolute cutoff to capture both.
#[derive(Copy, Clone, Debug)]
pub struct Gaussian {
    pub axis: Vec3,
    pub offset: f32,
    pub amplitude: f32,
    /// Standard deviation of each lobe.
    pub width: f32,
}

impl Gaussian {
    /// Lobes along the normalised `axis`. A zero axis falls back to `z`.
    pub fn lobes(axis: Vec3, offset: f32, amplitude: f32, width: f32) -> Self {
        Self {
            axis: axis.normalised().unwrap_or_else(|| Vec3::unit(2)),
            offset,
            amplitude,
            width,
        }
    }

    fn lobe(&self, p: Vec3, center: Vec3) -> f32 {
        let d2 = (p - center).len_sq();
        self.amplitude * (-d2 / (2.0 * self.width * self.width)).exp()
    }
}

impl ScalarField for Gaussian {
    fn sample(&self, p: Vec3) -> f32 {
        let c = self.axis * self.offset;
        self.lobe(p, c) - self.lobe(p, -c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lobes_are_antisymmetric() {
        let g = Gaussian::lobes(Vec3::new(0.0, 0.0, 3.0), 1.0, 2.0, 0.5);
        let p = Vec3::new(0.2, -0.1, 0.7);
        assert_relative_eq!(g.sample(p), -g.sample(-p));
        assert_eq!(g.sample(Vec3::new(1.0, 1.0, 0.0)), 0.0);
        assert!(g.sample(Vec3::new(0.0, 0.0, 1.0)) > 1.9);
    }
}
