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


//! Isosurface and contour extraction over voxel lattices, with a compact
//! character-encoded format for storing the resulting meshes.
//!
//! A [VoxelGrid] is walked by [MarchingCubes] (or cut by a plane and walked by
//! [MarchingSquares]), and every crossing is handed to a [MeshSink]. The
//! default sink, [MeshAccumulator], produces a [MeshData] that the [cvf]
//! module can write to a stream and rebuild from one.

/// Common math types
pub mod math;

/// Traits for defining isosurface data sources
pub mod source;

/// Primitives for building scalar fields from implicit functions.
pub mod implicit;

/// Fields computed from atomic positions.
pub mod neighbor;

/// The compact volumetric format.
pub mod cvf;

/// Utilities for outputting mesh data in specific formats.
pub mod export;

pub mod error;

mod bitset;
mod color;
mod contour;
mod edge;
mod generator;
mod grid;
mod index_cache;
mod marching_cubes;
mod marching_cubes_impl;
mod marching_cubes_tables;
mod marching_squares;
mod mesh;
mod sink;

pub use self::{
    bitset::*, color::*, contour::*, edge::*, error::{CvfError, Error, Result}, generator::*,
    grid::*, marching_cubes::*, marching_squares::*, mesh::*, sink::*,
};
