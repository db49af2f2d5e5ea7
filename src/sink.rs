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


//! The consumer side of a surface traversal.

use crate::{
    edge::{edge_fraction, interpolate, Cutoff},
    math::Vec3,
    mesh::MeshData,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// Everything a sink needs to place a vertex on one crossed lattice edge.
#[derive(Copy, Clone, Debug)]
pub struct SurfacePointQuery {
    pub cutoff: Cutoff,
    /// Lattice coordinates of the cube being marched.
    pub lattice: [usize; 3],
    /// Linear lattice indices of the edge's end points, lower first.
    pub corners: [usize; 2],
    /// World positions of the end points.
    pub points: [Vec3; 2],
    pub values: [f32; 2],
    /// World-space vector from the first end point to the second.
    pub edge_vector: Vec3,
    pub is_contour: bool,
}

impl SurfacePointQuery {
    /// The interpolated crossing fraction, if the edge carries one.
    pub fn fraction(&self) -> Option<f32> {
        edge_fraction(self.cutoff, self.values[0], self.values[1])
    }

    pub fn point_at(&self, fraction: f32) -> Vec3 {
        interpolate(self.points[0], self.points[1], fraction)
    }

    /// Field value at a fraction along the edge. For a computed crossing this
    /// is the cutoff, signed to match the lobe it was found on.
    pub fn value_at(&self, fraction: f32) -> f32 {
        self.values[0] + (self.values[1] - self.values[0]) * fraction
    }
}

/// Receives the output of a traversal.
///
/// The traversal resolves deduplication itself: each unique crossed edge is
/// offered through [get_surface_point_index] exactly once, and the index it
/// returns is reused by every cube sharing that edge.
///
/// [get_surface_point_index]: #tymethod.get_surface_point_index
pub trait MeshSink {
    /// Place a vertex for a crossed edge, or return `None` to reject it.
    /// Triangles touching a rejected vertex are never emitted.
    fn get_surface_point_index(&mut self, query: &SurfacePointQuery) -> Option<usize>;

    /// Add a vertex at an explicit point, tagged with the lattice point it was
    /// derived from. Contours on planes that cut across lattice layers have no
    /// such point and tag vertices with planar pixel indices instead.
    fn add_vertex_copy(&mut self, point: Vec3, value: f32, association: usize) -> Option<usize>;

    /// Offer a triangle. Returns `false` if the sink declined it.
    fn add_triangle_check(
        &mut self,
        a: usize,
        b: usize,
        c: usize,
        visibility: u8,
        is_absolute: bool,
    ) -> bool;

    /// Join two vertices added with [add_vertex_copy] into a contour segment.
    ///
    /// [add_vertex_copy]: #tymethod.add_vertex_copy
    fn add_contour_segment(&mut self, _a: usize, _b: usize) {}

    /// Discard every vertex and triangle received so far.
    fn invalidate_triangles(&mut self);

    /// Copy the accumulated geometry into `out`.
    fn fill_mesh_data(&self, out: &mut MeshData);

    fn notify_generation_completed(&mut self) {}

    fn notify_mapping_completed(&mut self) {}
}

/// A cooperative cancellation check, polled between rows of a traversal.
pub trait Interrupt {
    fn is_interrupted(&self) -> bool;
}

/// Never interrupts.
#[derive(Copy, Clone, Debug, Default)]
pub struct Uninterrupted;

impl Interrupt for Uninterrupted {
    fn is_interrupted(&self) -> bool {
        false
    }
}

impl Interrupt for AtomicBool {
    fn is_interrupted(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<I: Interrupt + ?Sized> Interrupt for &I {
    fn is_interrupted(&self) -> bool {
        (**self).is_interrupted()
    }
}
