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
    color::{ColorData, ColorScale, ColorTarget},
    contour::{chain_segments, Polyline},
    edge::Cutoff,
    grid::VolumeHeader,
    math::Vec3,
    sink::{MeshSink, SurfacePointQuery},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A triangle over three vertex indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub vertices: [usize; 3],
    /// Bit `i` set means the wireframe edge opposite vertex `i` is drawn.
    pub visibility: u8,
}

/// A completed surface or contour.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// The lattice the mesh was extracted from.
    pub header: Option<VolumeHeader>,
    pub cutoff: Option<Cutoff>,
    pub vertices: Vec<Vec3>,
    /// Field value at each vertex: the (signed) cutoff for surface vertices.
    pub vertex_values: Vec<f32>,
    /// Source lattice point of each contour vertex.
    pub associations: Vec<Option<usize>>,
    pub triangles: Vec<Triangle>,
    /// Triangles still considered part of the surface.
    pub active: BitSet,
    /// One entry per crossed lattice edge in traversal order, NaN where the
    /// vertex was rejected.
    pub edge_fractions: Vec<f32>,
    /// Inside/outside state of every lattice point, in traversal order.
    pub occupancy: Option<BitSet>,
    pub normals: Vec<Vec3>,
    pub colors: Option<ColorData>,
    pub contours: Vec<Polyline>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn active_triangle_count(&self) -> usize {
        self.active.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn active_triangles(&self) -> impl Iterator<Item = &Triangle> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.active.get(*i))
            .map(|(_, t)| t)
    }

    fn corners(&self, triangle: &Triangle) -> [Vec3; 3] {
        let [a, b, c] = triangle.vertices;
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Total area of the active triangles.
    pub fn area(&self) -> f32 {
        self.active_triangles()
            .map(|t| {
                let [a, b, c] = self.corners(t);
                (b - a).cross(c - a).len() * 0.5
            })
            .sum()
    }

    /// Enclosed volume of the active triangles, by summing signed tetrahedra
    /// against the origin. Only meaningful for closed surfaces.
    pub fn volume(&self) -> f32 {
        let signed: f32 = self
            .active_triangles()
            .map(|t| {
                let [a, b, c] = self.corners(t);
                a.dot(b.cross(c)) / 6.0
            })
            .sum();
        signed.abs()
    }

    /// Number of triangles sharing each undirected edge, keyed lower index
    /// first.
    pub fn edge_valence(&self) -> HashMap<(usize, usize), usize> {
        let mut valence = HashMap::new();
        for triangle in &self.triangles {
            let [a, b, c] = triangle.vertices;
            for &(u, v) in &[(a, b), (b, c), (c, a)] {
                let key = if u < v { (u, v) } else { (v, u) };
                *valence.entry(key).or_insert(0) += 1;
            }
        }
        valence
    }

    /// Edges used by exactly one triangle, sorted.
    pub fn boundary_edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = self
            .edge_valence()
            .into_iter()
            .filter(|&(_, n)| n == 1)
            .map(|(e, _)| e)
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Mean vertex value of each triangle.
    pub fn polygon_values(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .map(|t| t.vertices.iter().map(|&v| self.vertex_values[v]).sum::<f32>() / 3.0)
            .collect()
    }

    pub fn vertex_colors(&self, scale: &ColorScale) -> Option<Vec<u32>> {
        self.colors
            .as_ref()
            .filter(|c| c.target == ColorTarget::Vertex)
            .map(|c| c.argb(scale))
    }

    pub fn polygon_colors(&self, scale: &ColorScale) -> Option<Vec<u32>> {
        self.colors
            .as_ref()
            .filter(|c| c.target == ColorTarget::Polygon)
            .map(|c| c.argb(scale))
    }

    /// Flatten into packed positions and triangle indices, active triangles
    /// only.
    pub fn to_indexed_buffers(&self) -> (Vec<f32>, Vec<u32>) {
        let positions = self
            .vertices
            .iter()
            .flat_map(|v| vec![v.x, v.y, v.z])
            .collect();
        let indices = self
            .active_triangles()
            .flat_map(|t| t.vertices.iter().map(|&i| i as u32).collect::<Vec<_>>())
            .collect();
        (positions, indices)
    }
}

/// A containing region used to limit a surface.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Region {
    Sphere { center: Vec3, radius: f32 },
    Box { min: Vec3, max: Vec3 },
}

impl Region {
    pub fn contains(&self, p: Vec3) -> bool {
        match *self {
            Region::Sphere { center, radius } => p.distance(center) <= radius,
            Region::Box { min, max } => (0..3).all(|i| p[i] >= min[i] && p[i] <= max[i]),
        }
    }
}

/// What happens to geometry outside a [Region].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionMode {
    /// The sink rejects vertices outside the region.
    RejectVertices,
    /// Triangles are kept but marked inactive.
    DeactivatePolygons,
}

impl Default for RegionMode {
    fn default() -> Self {
        RegionMode::RejectVertices
    }
}

/// An in-memory [MeshSink] that collects a deduplicated mesh.
#[derive(Debug, Default)]
pub struct MeshAccumulator {
    vertices: Vec<Vec3>,
    values: Vec<f32>,
    associations: Vec<Option<usize>>,
    fractions: Vec<f32>,
    triangles: Vec<Triangle>,
    active: BitSet,
    segments: Vec<[usize; 2]>,
    region: Option<(Region, RegionMode)>,
    generation_completed: bool,
    mapping_completed: bool,
}

impl MeshAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(region: Region, mode: RegionMode) -> Self {
        Self {
            region: Some((region, mode)),
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_generation_completed(&self) -> bool {
        self.generation_completed
    }

    pub fn is_mapping_completed(&self) -> bool {
        self.mapping_completed
    }

    fn rejects(&self, p: Vec3) -> bool {
        match self.region {
            Some((region, RegionMode::RejectVertices)) => !region.contains(p),
            _ => false,
        }
    }

    /// Record a surface vertex at a known edge fraction.
    pub(crate) fn push_vertex(&mut self, position: Vec3, value: f32, fraction: f32) -> Option<usize> {
        if self.rejects(position) {
            self.fractions.push(std::f32::NAN);
            return None;
        }
        self.fractions.push(fraction);
        self.vertices.push(position);
        self.values.push(value);
        self.associations.push(None);
        Some(self.vertices.len() - 1)
    }

    /// Record a crossed edge that carries no vertex.
    pub(crate) fn reject_vertex(&mut self) {
        self.fractions.push(std::f32::NAN);
    }
}

impl MeshSink for MeshAccumulator {
    fn get_surface_point_index(&mut self, query: &SurfacePointQuery) -> Option<usize> {
        match query.fraction() {
            Some(fraction) => {
                self.push_vertex(query.point_at(fraction), query.value_at(fraction), fraction)
            }
            None => {
                self.reject_vertex();
                None
            }
        }
    }

    fn add_vertex_copy(&mut self, point: Vec3, value: f32, association: usize) -> Option<usize> {
        if self.rejects(point) {
            return None;
        }
        self.vertices.push(point);
        self.values.push(value);
        self.associations.push(Some(association));
        Some(self.vertices.len() - 1)
    }

    fn add_triangle_check(
        &mut self,
        a: usize,
        b: usize,
        c: usize,
        visibility: u8,
        is_absolute: bool,
    ) -> bool {
        let vertices = [a, b, c];
        if vertices.iter().any(|&v| v >= self.vertices.len()) {
            return false;
        }
        // An absolute surface must not bridge its positive and negative lobes.
        if is_absolute {
            let values = vertices.map(|v| self.values[v]);
            let positive = values.iter().all(|&v| v >= 0.0);
            let negative = values.iter().all(|&v| v <= 0.0);
            if !positive && !negative {
                return false;
            }
        }
        let active = match self.region {
            Some((region, RegionMode::DeactivatePolygons)) => {
                vertices.iter().all(|&v| region.contains(self.vertices[v]))
            }
            _ => true,
        };
        self.triangles.push(Triangle {
            vertices,
            visibility,
        });
        self.active.push(active);
        true
    }

    fn add_contour_segment(&mut self, a: usize, b: usize) {
        self.segments.push([a, b]);
    }

    fn invalidate_triangles(&mut self) {
        let region = self.region;
        *self = Self {
            region,
            ..Self::default()
        };
    }

    fn fill_mesh_data(&self, out: &mut MeshData) {
        out.vertices = self.vertices.clone();
        out.vertex_values = self.values.clone();
        out.associations = self.associations.clone();
        out.triangles = self.triangles.clone();
        out.active = self.active.clone();
        out.edge_fractions = self.fractions.clone();
        out.contours = chain_segments(&self.segments);
    }

    fn notify_generation_completed(&mut self) {
        self.generation_completed = true;
        debug!(
            vertices = self.vertices.len(),
            triangles = self.triangles.len(),
            segments = self.segments.len(),
            "mesh accumulated"
        );
    }

    fn notify_mapping_completed(&mut self) {
        self.mapping_completed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square(sink: &mut MeshAccumulator) {
        let corners = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        for (i, &p) in corners.iter().enumerate() {
            sink.push_vertex(p, 1.0, 0.5 + i as f32 * 0.1);
        }
        assert!(sink.add_triangle_check(0, 1, 2, 7, false));
        assert!(sink.add_triangle_check(0, 2, 3, 7, false));
    }

    fn tetrahedron() -> MeshData {
        let mut sink = MeshAccumulator::new();
        for &p in &[
            Vec3::zero(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ] {
            sink.push_vertex(p, 0.0, 0.5);
        }
        for &[a, b, c] in &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]] {
            sink.add_triangle_check(a, b, c, 7, false);
        }
        let mut mesh = MeshData::default();
        sink.fill_mesh_data(&mut mesh);
        mesh
    }

    #[test]
    fn test_area() {
        let mut sink = MeshAccumulator::new();
        unit_square(&mut sink);
        let mut mesh = MeshData::default();
        sink.fill_mesh_data(&mut mesh);
        assert_relative_eq!(mesh.area(), 1.0);
        assert_eq!(mesh.boundary_edges(), vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_volume_of_closed_surface() {
        let mesh = tetrahedron();
        assert_relative_eq!(mesh.volume(), 1.0 / 6.0, epsilon = 1e-6);
        assert!(mesh.boundary_edges().is_empty());
        assert!(mesh.edge_valence().values().all(|&n| n == 2));
    }

    #[test]
    fn test_dangling_triangles_are_refused() {
        let mut sink = MeshAccumulator::new();
        sink.push_vertex(Vec3::zero(), 0.0, 0.5);
        assert!(!sink.add_triangle_check(0, 1, 2, 7, false));
        assert_eq!(sink.triangle_count(), 0);
    }

    #[test]
    fn test_absolute_lobes_are_not_bridged() {
        let mut sink = MeshAccumulator::new();
        sink.push_vertex(Vec3::zero(), 0.5, 0.5);
        sink.push_vertex(Vec3::new(1.0, 0.0, 0.0), 0.5, 0.5);
        sink.push_vertex(Vec3::new(0.0, 1.0, 0.0), -0.5, 0.5);
        assert!(!sink.add_triangle_check(0, 1, 2, 7, true));
        assert!(sink.add_triangle_check(0, 1, 2, 7, false));
    }

    #[test]
    fn test_region_rejects_vertices() {
        let region = Region::Sphere {
            center: Vec3::zero(),
            radius: 1.0,
        };
        let mut sink = MeshAccumulator::with_region(region, RegionMode::RejectVertices);
        assert_eq!(sink.push_vertex(Vec3::new(0.5, 0.0, 0.0), 0.0, 0.25), Some(0));
        assert_eq!(sink.push_vertex(Vec3::new(2.0, 0.0, 0.0), 0.0, 0.25), None);
        let mut mesh = MeshData::default();
        sink.fill_mesh_data(&mut mesh);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.edge_fractions.len(), 2);
        assert!(mesh.edge_fractions[1].is_nan());
    }

    #[test]
    fn test_region_deactivates_polygons() {
        let region = Region::Box {
            min: Vec3::zero(),
            max: Vec3::new(1.0, 1.0, 0.0),
        };
        let mut sink = MeshAccumulator::with_region(region, RegionMode::DeactivatePolygons);
        unit_square(&mut sink);
        sink.push_vertex(Vec3::new(5.0, 0.0, 0.0), 1.0, 0.5);
        sink.add_triangle_check(1, 4, 2, 7, false);
        let mut mesh = MeshData::default();
        sink.fill_mesh_data(&mut mesh);
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.active_triangle_count(), 2);
        assert_relative_eq!(mesh.area(), 1.0);
        let (positions, indices) = mesh.to_indexed_buffers();
        assert_eq!(positions.len(), 15);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_invalidate_discards_everything() {
        let mut sink = MeshAccumulator::new();
        unit_square(&mut sink);
        sink.add_contour_segment(0, 1);
        sink.invalidate_triangles();
        let mut mesh = MeshData::default();
        sink.fill_mesh_data(&mut mesh);
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.contours.is_empty());
        assert!(mesh.edge_fractions.is_empty());
    }

    #[test]
    fn test_contours_are_chained() {
        let mut sink = MeshAccumulator::new();
        for i in 0..4 {
            let p = Vec3::new(i as f32, 0.0, 0.0);
            assert_eq!(sink.add_vertex_copy(p, 0.5, 10 + i), Some(i));
        }
        for &[a, b] in &[[0, 1], [1, 2], [2, 3], [3, 0]] {
            sink.add_contour_segment(a, b);
        }
        let mut mesh = MeshData::default();
        sink.fill_mesh_data(&mut mesh);
        assert_eq!(mesh.contours.len(), 1);
        assert!(mesh.contours[0].closed);
        assert_eq!(mesh.associations[2], Some(12));
    }
}
