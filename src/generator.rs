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


//! One-call surface and contour generation from a voxel grid.

use crate::{
    bitset::BitSet,
    color::{ColorData, ColorPrecision, ColorScale, ColorTarget},
    edge::Cutoff,
    error::Result,
    grid::VoxelGrid,
    marching_cubes::{Limits, MarchingCubes},
    marching_squares::MarchingSquares,
    math::{Plane, Vec3},
    mesh::{MeshAccumulator, MeshData, Region, RegionMode},
    sink::{Interrupt, MeshSink, Uninterrupted},
    source::gradient,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::info;

/// Everything that shapes a generation request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceParams {
    pub cutoff: Cutoff,
    /// Only the non-negative side of this plane is evaluated.
    pub plane: Option<Plane>,
    pub region: Option<Region>,
    pub region_mode: RegionMode,
    pub limits: Limits,
    pub color_precision: ColorPrecision,
    pub color_target: ColorTarget,
    pub color_scale: ColorScale,
    pub compute_normals: bool,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            cutoff: Cutoff::default(),
            plane: None,
            region: None,
            region_mode: RegionMode::default(),
            limits: Limits::default(),
            color_precision: ColorPrecision::default(),
            color_target: ColorTarget::Vertex,
            color_scale: ColorScale::default(),
            compute_normals: false,
        }
    }
}

pub struct SurfaceGenerator {
    params: SurfaceParams,
}

impl SurfaceGenerator {
    pub fn new(params: SurfaceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    fn accumulator(&self) -> MeshAccumulator {
        match self.params.region {
            Some(region) => MeshAccumulator::with_region(region, self.params.region_mode),
            None => MeshAccumulator::new(),
        }
    }

    fn collect<M: MeshSink + ?Sized>(&self, grid: &VoxelGrid, sink: &M, occupancy: Option<BitSet>) -> MeshData {
        let mut mesh = MeshData {
            header: Some(grid.header().clone()),
            cutoff: Some(self.params.cutoff),
            occupancy,
            ..MeshData::default()
        };
        sink.fill_mesh_data(&mut mesh);
        if self.params.compute_normals {
            mesh.normals = self.normals(grid, &mesh.vertices, &mesh.vertex_values);
        }
        mesh
    }

    /// Generate the enclosing surface of `grid` at the configured cutoff.
    pub fn generate(&self, grid: &VoxelGrid) -> Result<MeshData> {
        self.generate_with_interrupt(grid, &Uninterrupted)
    }

    pub fn generate_with_interrupt<I>(&self, grid: &VoxelGrid, interrupt: &I) -> Result<MeshData>
    where
        I: Interrupt + ?Sized,
    {
        let mut sink = self.accumulator();
        let occupancy = self.generate_into(grid, &mut sink, interrupt)?;
        let mesh = self.collect(grid, &sink, Some(occupancy));
        info!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            active = mesh.active_triangle_count(),
            "surface generated"
        );
        Ok(mesh)
    }

    /// Run the surface traversal into a caller-supplied sink, returning the
    /// lattice occupancy.
    pub fn generate_into<M, I>(&self, grid: &VoxelGrid, sink: &mut M, interrupt: &I) -> Result<BitSet>
    where
        M: MeshSink + ?Sized,
        I: Interrupt + ?Sized,
    {
        info!(
            counts = ?grid.counts(),
            cutoff = self.params.cutoff.value,
            absolute = self.params.cutoff.is_absolute,
            "generating surface"
        );
        let grid = match self.params.plane {
            Some(plane) => {
                let mut slab = grid.clone();
                slab.set_cutting_plane(Some(plane));
                Cow::Owned(slab)
            }
            None => Cow::Borrowed(grid),
        };
        let occupancy = MarchingCubes::new(self.params.cutoff, self.params.limits)
            .extract_with_interrupt(&grid, sink, interrupt)?;
        sink.notify_generation_completed();
        Ok(occupancy)
    }

    /// Contour the field where `plane` cuts it.
    pub fn generate_contour(&self, grid: &VoxelGrid, plane: &Plane) -> Result<MeshData> {
        self.generate_contour_with_interrupt(grid, plane, &Uninterrupted)
    }

    pub fn generate_contour_with_interrupt<I>(
        &self,
        grid: &VoxelGrid,
        plane: &Plane,
        interrupt: &I,
    ) -> Result<MeshData>
    where
        I: Interrupt + ?Sized,
    {
        info!(
            counts = ?grid.counts(),
            plane = ?plane.coefficients(),
            cutoff = self.params.cutoff.value,
            "generating contour"
        );
        let mut sink = self.accumulator();
        MarchingSquares::new(self.params.cutoff, self.params.limits)
            .extract_with_interrupt(grid, plane, &mut sink, interrupt)?;
        sink.notify_generation_completed();
        let mesh = self.collect(grid, &sink, None);
        info!(
            vertices = mesh.vertex_count(),
            polylines = mesh.contours.len(),
            closed = mesh.contours.iter().filter(|p| p.closed).count(),
            "contour generated"
        );
        Ok(mesh)
    }

    /// Generate a surface of `grid` coloured by a second property lattice.
    pub fn generate_mapped(&self, grid: &VoxelGrid, property: &VoxelGrid) -> Result<MeshData> {
        let mut sink = self.accumulator();
        let occupancy = self.generate_into(grid, &mut sink, &Uninterrupted)?;
        let mut mesh = self.collect(grid, &sink, Some(occupancy));
        self.map_property(&mut mesh, property);
        sink.notify_mapping_completed();
        info!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "mapped surface generated"
        );
        Ok(mesh)
    }

    /// Sample `property` at each vertex and store the result as colour data.
    /// Polygon colours are the mean of their three vertices.
    pub fn map_property(&self, mesh: &mut MeshData, property: &VoxelGrid) {
        let at_vertices: Vec<f32> = mesh
            .vertices
            .iter()
            .map(|&v| property.interpolate_world(v))
            .collect();
        let values = match self.params.color_target {
            ColorTarget::Vertex => at_vertices,
            ColorTarget::Polygon => mesh
                .triangles
                .iter()
                .map(|t| t.vertices.iter().map(|&i| at_vertices[i]).sum::<f32>() / 3.0)
                .collect(),
        };
        mesh.colors = Some(ColorData::new(
            self.params.color_precision,
            self.params.color_target,
            values,
        ));
    }

    /// ARGB colours for a mapped mesh under the configured scale.
    pub fn colors(&self, mesh: &MeshData) -> Option<Vec<u32>> {
        mesh.colors
            .as_ref()
            .map(|c| c.argb(&self.params.color_scale))
    }

    fn normals(&self, grid: &VoxelGrid, vertices: &[Vec3], values: &[f32]) -> Vec<Vec3> {
        let spacing = grid
            .header()
            .basis
            .iter()
            .map(|b| b.len())
            .fold(std::f32::INFINITY, f32::min);
        let epsilon = spacing * 0.01;
        let cutoff = self.params.cutoff;
        vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                // The field grows inward under a positive cutoff, except on
                // the negative lobe of an absolute one
                let negative_lobe =
                    cutoff.splits_lobes() && values.get(i).map_or(false, |&value| value < 0.0);
                let sign = if cutoff.value > 0.0 && !negative_lobe {
                    -1.0
                } else {
                    1.0
                };
                (gradient(grid, v, epsilon) * sign).normalised().unwrap_or_default()
            })
            .collect()
    }
}
