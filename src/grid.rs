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

use crate::{
    error::{Error, Result},
    math::{Plane, Vec3},
    source::ScalarField,
};
use serde::{Deserialize, Serialize};

/// The affine description of a lattice: an origin, three (possibly
/// non-orthogonal) basis vectors, and the number of points along each.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeHeader {
    pub origin: Vec3,
    pub basis: [Vec3; 3],
    pub counts: [usize; 3],
}

impl VolumeHeader {
    /// Create a header, rejecting empty lattices and linearly dependent basis
    /// vectors.
    pub fn new(origin: Vec3, basis: [Vec3; 3], counts: [usize; 3]) -> Result<Self> {
        if counts.iter().any(|&c| c == 0) {
            return Err(Error::DegenerateGeometry(format!(
                "voxel counts {:?} must all be positive",
                counts
            )));
        }
        if counts.iter().try_fold(1usize, |n, &c| n.checked_mul(c)).is_none() {
            return Err(Error::DegenerateGeometry(format!(
                "voxel counts {:?} overflow the addressable point count",
                counts
            )));
        }
        let volume = basis[0].dot(basis[1].cross(basis[2]));
        let scale = basis[0].len() * basis[1].len() * basis[2].len();
        if !volume.is_finite() || volume.abs() <= scale * 1e-6 || scale == 0.0 {
            return Err(Error::DegenerateGeometry(
                "basis vectors are not linearly independent".into(),
            ));
        }
        Ok(Self {
            origin,
            basis,
            counts,
        })
    }

    /// A header for an axis-aligned lattice with equal spacing on every axis.
    pub fn cubic(origin: Vec3, spacing: f32, counts: [usize; 3]) -> Result<Self> {
        Self::new(
            origin,
            [
                Vec3::new(spacing, 0.0, 0.0),
                Vec3::new(0.0, spacing, 0.0),
                Vec3::new(0.0, 0.0, spacing),
            ],
            counts,
        )
    }

    /// Total number of lattice points. Saturates for deserialized headers
    /// that skipped validation.
    pub fn point_count(&self) -> usize {
        self.counts.iter().fold(1usize, |n, &c| n.saturating_mul(c))
    }

    /// Position of a lattice point in traversal order (x slowest, z fastest).
    pub fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.counts[1] + y) * self.counts[2] + z
    }

    /// `origin + x·basis0 + y·basis1 + z·basis2`, for integer or fractional
    /// lattice coordinates.
    pub fn lattice_to_world(&self, p: Vec3) -> Vec3 {
        self.origin + self.basis[0] * p.x + self.basis[1] * p.y + self.basis[2] * p.z
    }

    /// Fractional lattice coordinates of a world point, by projecting onto each
    /// basis vector.
    ///
    /// Exact only for mutually orthogonal basis vectors.
    pub fn world_to_lattice(&self, p: Vec3) -> Vec3 {
        let d = p - self.origin;
        let mut out = Vec3::zero();
        for i in 0..3 {
            out[i] = d.dot(self.basis[i]) / self.basis[i].len_sq();
        }
        out
    }

    pub fn is_orthogonal(&self) -> bool {
        let tolerance = 1e-5;
        (0..3).all(|i| {
            let j = (i + 1) % 3;
            let cos = self.basis[i].dot(self.basis[j]) / (self.basis[i].len() * self.basis[j].len());
            cos.abs() < tolerance
        })
    }
}

/// A regularly sampled scalar field.
///
/// Values are stored in traversal order, `x` slowest and `z` fastest. The
/// grid is read-only during a traversal; the only mutable aspect is an
/// optional cutting plane that hides the lattice points on its negative side.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    header: VolumeHeader,
    values: Vec<f32>,
    plane: Option<Plane>,
}

impl VoxelGrid {
    /// Create a grid from values in traversal order.
    pub fn new(header: VolumeHeader, values: Vec<f32>) -> Result<Self> {
        let expected = header.point_count();
        if values.len() != expected {
            return Err(Error::DimensionMismatch {
                counts: header.counts,
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            header,
            values,
            plane: None,
        })
    }

    /// Fill a grid by sampling a field at every lattice point.
    pub fn from_field<S: ScalarField + ?Sized>(header: VolumeHeader, field: &S) -> Self {
        let [nx, ny, nz] = header.counts;
        let mut values = Vec::with_capacity(header.point_count());
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let p = header.lattice_to_world(Vec3::new(x as f32, y as f32, z as f32));
                    values.push(field.sample(p));
                }
            }
        }
        Self {
            header,
            values,
            plane: None,
        }
    }

    pub fn header(&self) -> &VolumeHeader {
        &self.header
    }

    pub fn counts(&self) -> [usize; 3] {
        self.header.counts
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Restrict evaluation to the non-negative side of `plane`.
    pub fn set_cutting_plane(&mut self, plane: Option<Plane>) {
        self.plane = plane;
    }

    pub fn cutting_plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    /// Direct lattice lookup. Out-of-range indices read as NaN.
    pub fn value_at(&self, x: usize, y: usize, z: usize) -> f32 {
        let [nx, ny, nz] = self.header.counts;
        if x >= nx || y >= ny || z >= nz {
            return std::f32::NAN;
        }
        self.values[self.header.linear_index(x, y, z)]
    }

    /// The value the traversal sees: [value_at], or NaN when the point lies on
    /// the hidden side of the cutting plane.
    ///
    /// [value_at]: #method.value_at
    pub fn sample(&self, x: usize, y: usize, z: usize) -> f32 {
        match &self.plane {
            Some(plane) if self.distance_to_plane(x, y, z, plane) < 0.0 => std::f32::NAN,
            _ => self.value_at(x, y, z),
        }
    }

    pub fn lattice_to_world(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.header
            .lattice_to_world(Vec3::new(x as f32, y as f32, z as f32))
    }

    pub fn world_to_lattice(&self, p: Vec3) -> Vec3 {
        self.header.world_to_lattice(p)
    }

    /// Signed distance from a lattice point to a plane.
    pub fn distance_to_plane(&self, x: usize, y: usize, z: usize, plane: &Plane) -> f32 {
        plane.distance(self.lattice_to_world(x, y, z))
    }

    /// Trilinear interpolation at fractional lattice coordinates.
    ///
    /// Coordinates are clamped to `[0, count - 1]` on each axis, so requests
    /// outside the lattice return the value at the nearest face rather than
    /// extrapolating.
    pub fn interpolate(&self, p: Vec3) -> f32 {
        let mut base = [0usize; 3];
        let mut t = [0f32; 3];
        for axis in 0..3 {
            let n = self.header.counts[axis];
            let max = (n - 1) as f32;
            let c = if p[axis].is_nan() {
                0.0
            } else {
                p[axis].max(0.0).min(max)
            };
            let i = (c.floor() as usize).min(n.saturating_sub(2));
            base[axis] = i;
            t[axis] = c - i as f32;
        }

        let [nx, ny, nz] = self.header.counts;
        let corner = |dx: usize, dy: usize, dz: usize| {
            let x = (base[0] + dx).min(nx - 1);
            let y = (base[1] + dy).min(ny - 1);
            let z = (base[2] + dz).min(nz - 1);
            self.values[self.header.linear_index(x, y, z)]
        };

        let c00 = lerp(corner(0, 0, 0), corner(1, 0, 0), t[0]);
        let c01 = lerp(corner(0, 0, 1), corner(1, 0, 1), t[0]);
        let c10 = lerp(corner(0, 1, 0), corner(1, 1, 0), t[0]);
        let c11 = lerp(corner(0, 1, 1), corner(1, 1, 1), t[0]);
        let c0 = lerp(c00, c10, t[1]);
        let c1 = lerp(c01, c11, t[1]);
        lerp(c0, c1, t[2])
    }

    /// Interpolate at a world-space point.
    pub fn interpolate_world(&self, p: Vec3) -> f32 {
        self.interpolate(self.world_to_lattice(p))
    }

    /// Smallest and largest finite values in the grid.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |range, &v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

// Avoids 0 * NaN leaking from an unused corner when t is exactly 0 or 1.
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t == 0.0 {
        a
    } else if t == 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

impl ScalarField for VoxelGrid {
    fn sample(&self, p: Vec3) -> f32 {
        self.interpolate_world(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> VoxelGrid {
        let header = VolumeHeader::cubic(Vec3::zero(), 1.0, [3, 3, 3]).unwrap();
        VoxelGrid::from_field(header, &|p: Vec3| p.x + 10.0 * p.y + 100.0 * p.z)
    }

    #[test]
    fn test_value_at() {
        let grid = ramp();
        assert_eq!(grid.value_at(1, 2, 0), 21.0);
        assert_eq!(grid.value_at(2, 2, 2), 222.0);
        assert!(grid.value_at(3, 0, 0).is_nan());
    }

    #[test]
    fn test_dimension_mismatch() {
        let header = VolumeHeader::cubic(Vec3::zero(), 1.0, [2, 2, 2]).unwrap();
        match VoxelGrid::new(header, vec![0.0; 7]) {
            Err(Error::DimensionMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, 8);
                assert_eq!(found, 7);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_basis() {
        let basis = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        assert!(VolumeHeader::new(Vec3::zero(), basis, [2, 2, 2]).is_err());
        assert!(VolumeHeader::cubic(Vec3::zero(), 1.0, [2, 0, 2]).is_err());
    }

    #[test]
    fn test_point_count_overflow() {
        let huge = usize::MAX / 2;
        assert!(matches!(
            VolumeHeader::cubic(Vec3::zero(), 1.0, [huge, huge, 2]),
            Err(Error::DegenerateGeometry(_))
        ));
        let header = VolumeHeader {
            origin: Vec3::zero(),
            basis: [Vec3::unit(0), Vec3::unit(1), Vec3::unit(2)],
            counts: [huge, huge, 2],
        };
        assert_eq!(header.point_count(), usize::MAX);
    }

    #[test]
    fn test_interpolation_is_trilinear() {
        let grid = ramp();
        assert_relative_eq!(grid.interpolate(Vec3::new(0.5, 0.5, 0.5)), 55.5);
        assert_relative_eq!(grid.interpolate(Vec3::new(2.0, 2.0, 2.0)), 222.0);
    }

    #[test]
    fn test_interpolation_clamps() {
        let grid = ramp();
        assert_relative_eq!(grid.interpolate(Vec3::new(-4.0, 0.0, 0.0)), 0.0);
        assert_relative_eq!(grid.interpolate(Vec3::new(9.0, 9.0, 9.0)), 222.0);
        assert_relative_eq!(grid.interpolate(Vec3::new(1.5, -1.0, 7.0)), 201.5);
    }

    #[test]
    fn test_coordinate_mapping() {
        let header = VolumeHeader::new(
            Vec3::new(1.0, 2.0, 3.0),
            [
                Vec3::new(0.5, 0.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            [4, 4, 4],
        )
        .unwrap();
        let world = header.lattice_to_world(Vec3::new(2.0, 1.0, 3.0));
        assert_eq!(world, Vec3::new(2.0, 4.0, 6.0));
        let back = header.world_to_lattice(world);
        assert_relative_eq!(back.x, 2.0);
        assert_relative_eq!(back.y, 1.0);
        assert_relative_eq!(back.z, 3.0);
        assert!(header.is_orthogonal());
    }

    #[test]
    fn test_non_orthogonal_forward_mapping() {
        let header = VolumeHeader::new(
            Vec3::zero(),
            [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            [2, 2, 2],
        )
        .unwrap();
        assert!(!header.is_orthogonal());
        assert_eq!(
            header.lattice_to_world(Vec3::new(1.0, 1.0, 1.0)),
            Vec3::new(2.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_cutting_plane_hides_points() {
        let mut grid = ramp();
        grid.set_cutting_plane(Some(Plane::new(1.0, 0.0, 0.0, -1.0)));
        assert!(grid.sample(0, 0, 0).is_nan());
        assert_eq!(grid.sample(1, 0, 0), 1.0);
        assert_eq!(grid.distance_to_plane(2, 0, 0, grid.cutting_plane().unwrap()), 1.0);
        assert_eq!(grid.value_at(0, 0, 0), 0.0);
    }
}
