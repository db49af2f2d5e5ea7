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
    bitset::BitSet,
    edge::Cutoff,
    error::{Error, Result},
    grid::VoxelGrid,
    index_cache::{EdgeKey, IndexCache},
    marching_cubes_impl::{crossed_edges, cube_case, march_cube},
    marching_cubes_tables::{CORNERS, EDGE_AXIS, EDGE_CONNECTION},
    math::Vec3,
    sink::{Interrupt, MeshSink, SurfacePointQuery, Uninterrupted},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bounds on the tables a single traversal may build.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Unique crossed edges a surface traversal may resolve.
    pub max_vertices: usize,
    /// Crossings a contour traversal may resolve.
    pub max_contour_vertices: usize,
    /// Lattice points a decoder may rebuild from a stream.
    pub max_points: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_vertices: 1 << 24,
            max_contour_vertices: 1 << 20,
            max_points: 1 << 27,
        }
    }
}

impl Limits {
    pub fn unlimited() -> Self {
        Self {
            max_vertices: usize::MAX,
            max_contour_vertices: usize::MAX,
            max_points: usize::MAX,
        }
    }
}

/// Extracts surfaces from voxel grids using the marching cubes algorithm.
///
/// Cubes are visited with `x` slowest and `z` fastest. Each unique crossed
/// edge is resolved through the sink once, and the index it yields is shared
/// by every cube around that edge.
pub struct MarchingCubes {
    cutoff: Cutoff,
    limits: Limits,
    layers: [Vec<f32>; 2],
}

impl MarchingCubes {
    pub fn new(cutoff: Cutoff, limits: Limits) -> Self {
        Self {
            cutoff,
            limits,
            layers: [vec![], vec![]],
        }
    }

    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    /// Extract the surface of `grid` into `sink`.
    ///
    /// Returns the inside/outside state of every lattice point in traversal
    /// order.
    pub fn extract<M>(&mut self, grid: &VoxelGrid, sink: &mut M) -> Result<BitSet>
    where
        M: MeshSink + ?Sized,
    {
        self.extract_with_interrupt(grid, sink, &Uninterrupted)
    }

    /// As [extract], polling `interrupt` before each row of cubes.
    ///
    /// On cancellation, or when the vertex limit is exceeded, the sink is told
    /// to discard its triangles before the error is returned.
    ///
    /// [extract]: #method.extract
    pub fn extract_with_interrupt<M, I>(
        &mut self,
        grid: &VoxelGrid,
        sink: &mut M,
        interrupt: &I,
    ) -> Result<BitSet>
    where
        M: MeshSink + ?Sized,
        I: Interrupt + ?Sized,
    {
        let result = self.extract_impl(grid, sink, interrupt);
        if result.is_err() {
            sink.invalidate_triangles();
        }
        result
    }

    fn extract_impl<M, I>(&mut self, grid: &VoxelGrid, sink: &mut M, interrupt: &I) -> Result<BitSet>
    where
        M: MeshSink + ?Sized,
        I: Interrupt + ?Sized,
    {
        let header = grid.header();
        let [nx, ny, nz] = header.counts;
        let slab = ny * nz;
        let cutoff = self.cutoff;

        let mut occupancy = BitSet::new(header.point_count());
        for layer in self.layers.iter_mut() {
            layer.clear();
            layer.resize(slab, 0.0);
        }

        // Cache layer zero of field values
        self.fill_layer(grid, 0, 0, &mut occupancy);

        let mut index_cache: IndexCache<EdgeKey, Option<usize>> = IndexCache::new();
        let mut values = [0f32; 8];
        let mut corners = [Vec3::zero(); 8];
        let mut crossings = 0usize;
        let mut rejected = 0usize;
        let mut dropped = 0usize;
        let mut triangles = 0usize;
        let mut evicted = 0usize;

        for x in 0..nx.saturating_sub(1) {
            // Cache layer x + 1
            self.fill_layer(grid, x + 1, 1, &mut occupancy);

            for y in 0..ny.saturating_sub(1) {
                if interrupt.is_interrupted() {
                    debug!(x, y, "surface traversal interrupted");
                    return Err(Error::Cancelled);
                }

                for z in 0..nz.saturating_sub(1) {
                    for i in 0..8 {
                        let [cx, cy, cz] = CORNERS[i];
                        values[i] = self.layers[cx][(y + cy) * nz + z + cz];
                    }

                    let case = cube_case(&values, cutoff);
                    if case == 0 || case == 255 {
                        continue;
                    }

                    for i in 0..8 {
                        let [cx, cy, cz] = CORNERS[i];
                        corners[i] = grid.lattice_to_world(x + cx, y + cy, z + cz);
                    }

                    let mut indices = [None; 12];
                    for edge in crossed_edges(case) {
                        let [u, v] = EDGE_CONNECTION[edge];
                        let [ux, uy, uz] = CORNERS[u];
                        let [vx, vy, vz] = CORNERS[v];
                        let origin = header.linear_index(x + ux, y + uy, z + uz);
                        let key = EdgeKey::new(origin, EDGE_AXIS[edge]);

                        indices[edge] = match index_cache.get(key) {
                            Some(index) => index,
                            None => {
                                crossings += 1;
                                if crossings > self.limits.max_vertices {
                                    return Err(Error::CapacityExceeded {
                                        what: "surface vertices",
                                        limit: self.limits.max_vertices,
                                    });
                                }
                                let query = SurfacePointQuery {
                                    cutoff,
                                    lattice: [x, y, z],
                                    corners: [origin, header.linear_index(x + vx, y + vy, z + vz)],
                                    points: [corners[u], corners[v]],
                                    values: [values[u], values[v]],
                                    edge_vector: corners[v] - corners[u],
                                    is_contour: false,
                                };
                                let index = sink.get_surface_point_index(&query);
                                if index.is_none() {
                                    rejected += 1;
                                }
                                index_cache.put(key, index);
                                index
                            }
                        };
                    }

                    march_cube(case, |[a, b, c], visibility| {
                        match (indices[a], indices[b], indices[c]) {
                            (Some(a), Some(b), Some(c)) => {
                                if sink.add_triangle_check(a, b, c, visibility, cutoff.splits_lobes()) {
                                    triangles += 1;
                                } else {
                                    dropped += 1;
                                }
                            }
                            _ => dropped += 1,
                        }
                    });
                }
            }

            // Edges rooted in slab x can no longer be shared
            let boundary = (x + 1) * slab;
            evicted += index_cache.evict(|key| key.origin < boundary);

            self.layers.swap(0, 1);
        }

        debug!(
            counts = ?header.counts,
            inside = occupancy.count_ones(),
            crossings,
            rejected,
            triangles,
            dropped,
            evicted,
            "marching cubes complete"
        );

        Ok(occupancy)
    }

    fn fill_layer(&mut self, grid: &VoxelGrid, x: usize, layer: usize, occupancy: &mut BitSet) {
        let [_, ny, nz] = grid.counts();
        for y in 0..ny {
            for z in 0..nz {
                let value = grid.sample(x, y, z);
                self.layers[layer][y * nz + z] = value;
                occupancy.set(grid.header().linear_index(x, y, z), self.cutoff.is_inside(value));
            }
        }
    }
}
