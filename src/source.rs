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

/// A source capable of sampling a scalar field at arbitrary world-space
/// points.
///
/// Fields are sampled once per lattice point when a [VoxelGrid] is filled, so
/// the traversal itself never calls back into a source.
///
/// [VoxelGrid]: ../struct.VoxelGrid.html
pub trait ScalarField {
    /// Samples the field at the given point.
    fn sample(&self, p: Vec3) -> f32;
}

impl<F> ScalarField for F
where
    F: Fn(Vec3) -> f32,
{
    fn sample(&self, p: Vec3) -> f32 {
        self(p)
    }
}

/// Adapts a field by negating it, turning "inside below the cutoff" fields
/// into "inside above the cutoff" ones.
pub struct Negated<S: ScalarField> {
    source: S,
}

impl<S: ScalarField> Negated<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: ScalarField> ScalarField for Negated<S> {
    fn sample(&self, p: Vec3) -> f32 {
        -self.source.sample(p)
    }
}

/// Estimates the gradient of a field by forward differencing.
pub fn gradient<S: ScalarField + ?Sized>(source: &S, p: Vec3, epsilon: f32) -> Vec3 {
    let v = source.sample(p);
    let vx = source.sample(p + Vec3::new(epsilon, 0.0, 0.0));
    let vy = source.sample(p + Vec3::new(0.0, epsilon, 0.0));
    let vz = source.sample(p + Vec3::new(0.0, 0.0, epsilon));

    Vec3::new(vx - v, vy - v, vz - v) / epsilon
}
