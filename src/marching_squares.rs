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
    edge::{Cutoff, EdgeCrossing},
    error::{Error, Result},
    grid::VoxelGrid,
    index_cache::{EdgeKey, IndexCache},
    marching_cubes::Limits,
    marching_cubes_impl::march_square,
    marching_cubes_tables::{SQUARE_CORNERS, SQUARE_EDGE_CONNECTION},
    math::{Plane, Vec3},
    sink::{Interrupt, MeshSink, Uninterrupted},
};
use tracing::debug;

const W_EPSILON: f32 = 1e-4;

/// A plane resampled as a 2D pixel lattice.
///
/// The lattice axis most aligned with the plane normal is collapsed. The
/// other two are projected onto the plane, so pixel `(i, j)` sits at
/// `origin + i·steps[0] + j·steps[1]` in fractional lattice coordinates.
#[derive(Clone, Debug)]
pub struct PlanarGrid {
    /// The lattice axes mapped to pixel `u`, pixel `v`, and the collapsed axis.
    pub axes: [usize; 3],
    pub counts: [usize; 2],
    origin: Vec3,
    steps: [Vec3; 2],
    values: Vec<f32>,
    /// The lattice layer at or just below the plane, when the plane is
    /// parallel to one.
    layer: Option<usize>,
    lattice_counts: [usize; 3],
}

impl PlanarGrid {
    /// Resample `grid` on `plane`. Pixels whose projection leaves the lattice
    /// along the collapsed axis are NaN.
    pub fn project(grid: &VoxelGrid, plane: &Plane) -> Result<Self> {
        if plane.is_degenerate() {
            return Err(Error::InvalidPlane(format!(
                "coefficients {:?} have no direction",
                plane.coefficients()
            )));
        }
        let header = grid.header();
        let n = plane.normal;
        let dots = [
            n.dot(header.basis[0]),
            n.dot(header.basis[1]),
            n.dot(header.basis[2]),
        ];
        let w = (0..3)
            .max_by(|&a, &b| (dots[a] * dots[a]).total_cmp(&(dots[b] * dots[b])))
            .unwrap_or(2);
        if dots[w] == 0.0 || !dots[w].is_finite() {
            return Err(Error::InvalidPlane(
                "plane is parallel to every lattice axis".into(),
            ));
        }
        let (u, v) = ((w + 1) % 3, (w + 2) % 3);

        let t = -(n.dot(header.origin) + plane.d) / dots[w];
        let origin = Vec3::unit(w) * t;
        let steps = [
            Vec3::unit(u) - Vec3::unit(w) * (dots[u] / dots[w]),
            Vec3::unit(v) - Vec3::unit(w) * (dots[v] / dots[w]),
        ];

        let counts = [header.counts[u], header.counts[v]];
        let w_max = (header.counts[w] - 1) as f32;
        let mut values = Vec::with_capacity(counts[0] * counts[1]);
        for i in 0..counts[0] {
            for j in 0..counts[1] {
                let p = origin + steps[0] * i as f32 + steps[1] * j as f32;
                if p[w] < -W_EPSILON || p[w] > w_max + W_EPSILON {
                    values.push(std::f32::NAN);
                } else {
                    values.push(grid.interpolate(p));
                }
            }
        }

        let parallel = dots[u].abs() <= W_EPSILON * dots[w].abs()
            && dots[v].abs() <= W_EPSILON * dots[w].abs();
        let layer = if parallel && origin[w] >= -W_EPSILON && origin[w] <= w_max + W_EPSILON {
            Some(((origin[w] + W_EPSILON).floor().max(0.0) as usize).min(header.counts[w] - 1))
        } else {
            None
        };

        Ok(Self {
            axes: [u, v, w],
            counts,
            origin,
            steps,
            values,
            layer,
            lattice_counts: header.counts,
        })
    }

    pub fn pixel_index(&self, i: usize, j: usize) -> usize {
        i * self.counts[1] + j
    }

    pub fn value_at(&self, i: usize, j: usize) -> f32 {
        if i >= self.counts[0] || j >= self.counts[1] {
            return std::f32::NAN;
        }
        self.values[self.pixel_index(i, j)]
    }

    /// The key a contour vertex on pixel `(i, j)` is associated with: the
    /// linear index of the lattice point under the pixel when the plane is
    /// parallel to a lattice layer, otherwise the pixel index itself.
    pub fn association(&self, i: usize, j: usize) -> usize {
        match self.layer {
            Some(layer) => {
                let [u, v, w] = self.axes;
                let mut p = [0usize; 3];
                p[u] = i;
                p[v] = j;
                p[w] = layer;
                let [_, ny, nz] = self.lattice_counts;
                (p[0] * ny + p[1]) * nz + p[2]
            }
            None => self.pixel_index(i, j),
        }
    }

    /// Fractional lattice coordinates of a pixel.
    pub fn lattice_point(&self, i: usize, j: usize) -> Vec3 {
        self.origin + self.steps[0] * i as f32 + self.steps[1] * j as f32
    }
}

/// Extracts contours where a plane cuts the surface, using marching squares.
pub struct MarchingSquares {
    cutoff: Cutoff,
    limits: Limits,
}

impl MarchingSquares {
    pub fn new(cutoff: Cutoff, limits: Limits) -> Self {
        Self { cutoff, limits }
    }

    pub fn extract<M>(&mut self, grid: &VoxelGrid, plane: &Plane, sink: &mut M) -> Result<PlanarGrid>
    where
        M: MeshSink + ?Sized,
    {
        self.extract_with_interrupt(grid, plane, sink, &Uninterrupted)
    }

    /// Contour the plane into `sink`, polling `interrupt` before each row of
    /// cells. Crossings go through `add_vertex_copy`, and each cell's pieces
    /// through `add_contour_segment`.
    pub fn extract_with_interrupt<M, I>(
        &mut self,
        grid: &VoxelGrid,
        plane: &Plane,
        sink: &mut M,
        interrupt: &I,
    ) -> Result<PlanarGrid>
    where
        M: MeshSink + ?Sized,
        I: Interrupt + ?Sized,
    {
        let pixels = PlanarGrid::project(grid, plane)?;
        match self.extract_impl(grid, &pixels, sink, interrupt) {
            Ok(()) => Ok(pixels),
            Err(e) => {
                sink.invalidate_triangles();
                Err(e)
            }
        }
    }

    fn extract_impl<M, I>(
        &mut self,
        grid: &VoxelGrid,
        pixels: &PlanarGrid,
        sink: &mut M,
        interrupt: &I,
    ) -> Result<()>
    where
        M: MeshSink + ?Sized,
        I: Interrupt + ?Sized,
    {
        let [nu, nv] = pixels.counts;
        let mut index_cache: IndexCache<EdgeKey, Option<usize>> = IndexCache::new();
        let mut crossings = 0usize;
        let mut segments = 0usize;
        let mut cell_segments = Vec::with_capacity(2);

        for i in 0..nu.saturating_sub(1) {
            if interrupt.is_interrupted() {
                debug!(row = i, "contour traversal interrupted");
                return Err(Error::Cancelled);
            }

            for j in 0..nv.saturating_sub(1) {
                let pixel = |corner: usize| {
                    let [di, dj] = SQUARE_CORNERS[corner];
                    (i + di, j + dj)
                };
                let values = [0, 1, 2, 3].map(|c| {
                    let (pi, pj) = pixel(c);
                    pixels.value_at(pi, pj)
                });

                cell_segments.clear();
                march_square(&values, self.cutoff, |segment| cell_segments.push(segment));

                for &[e0, e1] in &cell_segments {
                    let mut ends = [None; 2];
                    for (end, &edge) in ends.iter_mut().zip(&[e0, e1]) {
                        let [a, b] = SQUARE_EDGE_CONNECTION[edge];
                        let (pa, pb) = (pixel(a), pixel(b));
                        // Key the edge by its lower pixel and direction
                        let (lo, hi, va, vb) = if pa <= pb {
                            (pa, pb, values[a], values[b])
                        } else {
                            (pb, pa, values[b], values[a])
                        };
                        let key = EdgeKey::new(
                            pixels.pixel_index(lo.0, lo.1),
                            if hi.0 > lo.0 { 0 } else { 1 },
                        );

                        *end = match index_cache.get(key) {
                            Some(index) => index,
                            None => {
                                let crossing = EdgeCrossing::locate(
                                    self.cutoff,
                                    [pixels.association(lo.0, lo.1), pixels.association(hi.0, hi.1)],
                                    [pixels.lattice_point(lo.0, lo.1), pixels.lattice_point(hi.0, hi.1)],
                                    [va, vb],
                                );
                                let index = match crossing {
                                    Some(crossing) => {
                                        crossings += 1;
                                        if crossings > self.limits.max_contour_vertices {
                                            return Err(Error::CapacityExceeded {
                                                what: "contour vertices",
                                                limit: self.limits.max_contour_vertices,
                                            });
                                        }
                                        let point = grid.header().lattice_to_world(crossing.position);
                                        sink.add_vertex_copy(point, crossing.value, crossing.association())
                                    }
                                    None => None,
                                };
                                index_cache.put(key, index);
                                index
                            }
                        };
                    }
                    if let [Some(a), Some(b)] = ends {
                        sink.add_contour_segment(a, b);
                        segments += 1;
                    }
                }
            }

            let boundary = (i + 1) * nv;
            index_cache.evict(|key| key.origin < boundary);
        }

        debug!(
            pixels = ?pixels.counts,
            collapsed_axis = pixels.axes[2],
            crossings,
            segments,
            "marching squares complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::VolumeHeader,
        implicit::Sphere,
        mesh::{MeshAccumulator, MeshData},
    };
    use approx::assert_relative_eq;
    use std::sync::atomic::AtomicBool;

    fn sphere_grid() -> VoxelGrid {
        let header = VolumeHeader::cubic(Vec3::from_scalar(-2.0), 0.25, [17, 17, 17]).unwrap();
        VoxelGrid::from_field(header, &Sphere::new(1.2))
    }

    fn contour(grid: &VoxelGrid, plane: Plane) -> MeshData {
        let mut sink = MeshAccumulator::new();
        let mut ms = MarchingSquares::new(Cutoff::new(0.0), Limits::default());
        ms.extract(grid, &plane, &mut sink).unwrap();
        let mut mesh = MeshData::default();
        sink.fill_mesh_data(&mut mesh);
        mesh
    }

    #[test]
    fn test_mid_plane_gives_one_closed_loop() {
        let mesh = contour(&sphere_grid(), Plane::new(0.0, 0.0, 1.0, 0.0));
        assert_eq!(mesh.contours.len(), 1);
        let polyline = &mesh.contours[0];
        assert!(polyline.closed);
        assert_eq!(polyline.len(), mesh.vertex_count());
        for v in &mesh.vertices {
            assert_relative_eq!(v.z, 0.0);
            let r = (v.x * v.x + v.y * v.y).sqrt();
            assert!((r - 1.2).abs() < 0.1, "{}", r);
        }
        assert!(mesh.associations.iter().all(|a| a.is_some()));
    }

    #[test]
    fn test_layer_plane_associates_lattice_points() {
        let grid = sphere_grid();
        let mesh = contour(&grid, Plane::new(0.0, 0.0, 1.0, 0.0));
        let header = grid.header();
        for (v, a) in mesh.vertices.iter().zip(&mesh.associations) {
            let a = a.unwrap();
            // z = 0 is lattice layer 8
            assert_eq!(a % 17, 8);
            let (x, y) = (a / (17 * 17), (a / 17) % 17);
            let corner = header.lattice_to_world(Vec3::new(x as f32, y as f32, 8.0));
            assert!(corner.distance(*v) <= 0.25 + 1e-4);
            assert!(v.x >= corner.x - 1e-4 && v.y >= corner.y - 1e-4);
        }

        // an oblique plane keeps planar pixel keys
        let plane = Plane::from_point_normal(Vec3::zero(), Vec3::new(0.3, 0.2, 1.0));
        let mesh = contour(&grid, plane);
        assert!(mesh.associations.iter().all(|a| a.unwrap() < 17 * 17));
    }

    #[test]
    fn test_oblique_plane_gives_closed_loop() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 0.0, 0.3), Vec3::new(0.3, 0.2, 1.0));
        let mesh = contour(&sphere_grid(), plane);
        assert_eq!(mesh.contours.len(), 1);
        assert!(mesh.contours[0].closed);
        for v in &mesh.vertices {
            assert!(plane.distance(*v).abs() < 1e-3);
        }
    }

    #[test]
    fn test_projection_axes() {
        let grid = sphere_grid();
        let pixels = PlanarGrid::project(&grid, &Plane::new(1.0, 0.0, 0.1, 0.0)).unwrap();
        assert_eq!(pixels.axes, [1, 2, 0]);
        assert_eq!(pixels.counts, [17, 17]);
    }

    #[test]
    fn test_plane_outside_lattice() {
        let grid = sphere_grid();
        let mesh = contour(&grid, Plane::new(0.0, 0.0, 1.0, -5.0));
        assert!(mesh.is_empty());
        let pixels = PlanarGrid::project(&grid, &Plane::new(0.0, 0.0, 1.0, -5.0)).unwrap();
        assert!(pixels.value_at(3, 3).is_nan());
    }

    #[test]
    fn test_degenerate_plane() {
        let grid = sphere_grid();
        let mut sink = MeshAccumulator::new();
        let mut ms = MarchingSquares::new(Cutoff::new(0.0), Limits::default());
        assert!(matches!(
            ms.extract(&grid, &Plane::new(0.0, 0.0, 0.0, 1.0), &mut sink),
            Err(Error::InvalidPlane(_))
        ));
    }

    #[test]
    fn test_cancellation() {
        let grid = sphere_grid();
        let mut sink = MeshAccumulator::new();
        let mut ms = MarchingSquares::new(Cutoff::new(0.0), Limits::default());
        let flag = AtomicBool::new(true);
        assert!(matches!(
            ms.extract_with_interrupt(&grid, &Plane::new(0.0, 0.0, 1.0, 0.0), &mut sink, &flag),
            Err(Error::Cancelled)
        ));
        assert_eq!(sink.vertex_count(), 0);
    }
}
