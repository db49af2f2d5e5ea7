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


//! The compact volumetric format: a character-encoded record of which lattice
//! points lie inside a surface and where it crosses each lattice edge.
//!
//! A stream carries one lattice header and any number of surfaces. Each
//! surface is three lines: a definition, the alternating outside/inside run
//! lengths of the lattice points, and a payload of one character per crossed
//! edge followed by optional colour characters. Absolute surfaces add a line
//! between runs and payload: alternating run lengths over the placed
//! vertices, marking those on the negative lobe. Decoding replays marching
//! cubes over the run-length occupancy, so the scalar field is never needed.

mod chars;
mod compress;
mod reader;
mod writer;

pub use self::{
    chars::CharBand,
    compress::{compress, decompress},
    reader::{decode, decode_with_limits, CvfDocument},
    writer::{encode, CvfEncoder},
};

use crate::error::CvfError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_FRACTION_BASE: u32 = 35;
pub const DEFAULT_FRACTION_RANGE: u32 = 90;

pub(crate) const MAGIC: &str = "#CVF VERSION 1.0";

/// Encoding choices for a compact stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvfOptions {
    pub edge_fraction_base: u32,
    pub edge_fraction_range: u32,
    pub color_fraction_base: u32,
    pub color_fraction_range: u32,
    /// Collapse runs of repeated payload characters.
    pub compress: bool,
    /// Up to two free-text title lines.
    pub titles: Vec<String>,
}

impl Default for CvfOptions {
    fn default() -> Self {
        Self {
            edge_fraction_base: DEFAULT_FRACTION_BASE,
            edge_fraction_range: DEFAULT_FRACTION_RANGE,
            color_fraction_base: DEFAULT_FRACTION_BASE,
            color_fraction_range: DEFAULT_FRACTION_RANGE,
            compress: true,
            titles: vec![],
        }
    }
}

impl CvfOptions {
    /// Options using the same band for edge fractions and colours.
    pub fn with_band(base: u32, range: u32) -> Self {
        Self {
            edge_fraction_base: base,
            edge_fraction_range: range,
            color_fraction_base: base,
            color_fraction_range: range,
            ..Self::default()
        }
    }

    pub fn edge_band(&self) -> Result<CharBand, CvfError> {
        CharBand::new(self.edge_fraction_base, self.edge_fraction_range)
    }

    pub fn color_band(&self) -> Result<CharBand, CvfError> {
        CharBand::new(self.color_fraction_base, self.color_fraction_range)
    }

    pub(crate) fn title(&self, i: usize) -> String {
        self.titles
            .get(i)
            .map(|t| t.replace(|c| c == '\n' || c == '\r', " "))
            .unwrap_or_default()
    }
}

/// An encoded stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CvfStream(String);

impl CvfStream {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn decode(&self) -> Result<CvfDocument, CvfError> {
        decode(&self.0)
    }
}

impl fmt::Display for CvfStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CvfStream> for String {
    fn from(stream: CvfStream) -> Self {
        stream.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::{ColorData, ColorPrecision, ColorTarget},
        edge::Cutoff,
        generator::{SurfaceGenerator, SurfaceParams},
        grid::{VolumeHeader, VoxelGrid},
        implicit::{Gaussian, Sphere},
        math::Vec3,
        mesh::MeshData,
    };

    fn sphere_mesh() -> MeshData {
        let header = VolumeHeader::cubic(Vec3::from_scalar(-1.5), 0.25, [13, 13, 13]).unwrap();
        let grid = VoxelGrid::from_field(header, &Sphere::new(1.0));
        let params = SurfaceParams {
            cutoff: Cutoff::new(0.0),
            ..SurfaceParams::default()
        };
        SurfaceGenerator::new(params).generate(&grid).unwrap()
    }

    #[test]
    fn test_round_trip_reproduces_connectivity() {
        let mesh = sphere_mesh();
        let stream = encode(&mesh, Cutoff::new(0.0), 35, 90).unwrap();
        let decoded = stream.decode().unwrap().into_meshes().unwrap();
        assert_eq!(decoded.len(), 1);
        let back = &decoded[0];

        assert_eq!(back.vertex_count(), mesh.vertex_count());
        assert_eq!(back.triangles, mesh.triangles);
        assert_eq!(back.occupancy, mesh.occupancy);
        for (a, b) in mesh.edge_fractions.iter().zip(&back.edge_fractions) {
            assert!((a - b).abs() <= 1.0 / 90.0);
        }
        // positions move by at most one bin along a 0.25 edge
        for (a, b) in mesh.vertices.iter().zip(&back.vertices) {
            assert!(a.distance(*b) <= 0.25 / 90.0 + 1e-5);
        }
    }

    #[test]
    fn test_reencoding_is_byte_identical() {
        let mesh = sphere_mesh();
        let stream = encode(&mesh, Cutoff::new(0.0), 35, 90).unwrap();
        let decoded = stream.decode().unwrap().into_meshes().unwrap();
        let again = encode(&decoded[0], Cutoff::new(0.0), 35, 90).unwrap();
        assert_eq!(stream, again);
    }

    #[test]
    fn test_ten_vertex_fractions() {
        // an isolated interior point and a point on the far face, each
        // surrounded by low values
        let header = VolumeHeader::cubic(Vec3::zero(), 1.0, [3, 3, 3]).unwrap();
        let mut values = vec![0.0; 27];
        values[13] = 0.5 / 0.03;
        values[25] = 0.5 / 0.31;
        let grid = VoxelGrid::new(header, values).unwrap();
        let mesh = SurfaceGenerator::new(SurfaceParams::default())
            .generate(&grid)
            .unwrap();
        assert_eq!(mesh.vertex_count(), 10);

        let stream = encode(&mesh, Cutoff::new(0.5), 35, 89).unwrap();
        let back = &stream.decode().unwrap().into_meshes().unwrap()[0];
        assert_eq!(back.vertex_count(), 10);
        assert_eq!(back.triangles, mesh.triangles);
        for (a, b) in mesh.edge_fractions.iter().zip(&back.edge_fractions) {
            assert!((a - b).abs() <= 1.0 / 89.0, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_colours_survive() {
        let mut mesh = sphere_mesh();
        let values: Vec<f32> = mesh.vertices.iter().map(|v| v.z * 10.0).collect();
        for &precision in &[ColorPrecision::Single, ColorPrecision::Double] {
            mesh.colors = Some(ColorData::new(precision, ColorTarget::Vertex, values.clone()));
            let stream = encode(&mesh, Cutoff::new(0.0), 35, 90).unwrap();
            let back = &stream.decode().unwrap().into_meshes().unwrap()[0];
            let colors = back.colors.as_ref().unwrap();
            assert_eq!(colors.precision, precision);
            let tolerance = match precision {
                ColorPrecision::Single => 20.0 / 90.0,
                ColorPrecision::Double => 20.0 / (90.0 * 90.0) + 1e-4,
            };
            for (a, b) in values.iter().zip(&colors.values) {
                assert!((a - b).abs() <= tolerance, "{} vs {}", a, b);
            }
            let again = encode(back, Cutoff::new(0.0), 35, 90).unwrap();
            assert_eq!(stream, again);
        }
    }

    #[test]
    fn test_multiple_surfaces() {
        let header = VolumeHeader::cubic(Vec3::from_scalar(-3.0), 0.3, [21, 21, 21]).unwrap();
        let grid = VoxelGrid::from_field(header, &Gaussian::lobes(Vec3::unit(2), 1.0, 1.0, 0.6));
        let mut encoder = CvfEncoder::new(CvfOptions::default()).unwrap();
        for &cutoff in &[0.1f32, 0.3] {
            let params = SurfaceParams {
                cutoff: Cutoff::absolute(cutoff),
                ..SurfaceParams::default()
            };
            let mesh = SurfaceGenerator::new(params).generate(&grid).unwrap();
            encoder.add_surface(&mesh).unwrap();
        }
        let stream = encoder.finish().unwrap();
        let document = stream.decode().unwrap();
        assert_eq!(document.surfaces.len(), 2);
        let meshes = document.into_meshes().unwrap();
        assert!(meshes[0].vertex_count() > meshes[1].vertex_count());
        assert!(meshes.iter().all(|m| m.cutoff.unwrap().is_absolute));
    }

    #[test]
    fn test_absolute_round_trip_keeps_lobes_apart() {
        // adjacent corners of opposite sign; every triangle would bridge them
        let header = VolumeHeader::cubic(Vec3::zero(), 1.0, [2, 2, 2]).unwrap();
        let mut values = vec![0.0; 8];
        values[0] = 1.0;
        values[4] = -1.0;
        let grid = VoxelGrid::new(header, values).unwrap();
        let params = SurfaceParams {
            cutoff: Cutoff::absolute(0.5),
            ..SurfaceParams::default()
        };
        let mesh = SurfaceGenerator::new(params).generate(&grid).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.triangles.is_empty());

        let stream = encode(&mesh, Cutoff::absolute(0.5), 35, 90).unwrap();
        let back = &stream.decode().unwrap().into_meshes().unwrap()[0];
        assert_eq!(back.triangles, mesh.triangles);
        for (a, b) in mesh.vertex_values.iter().zip(&back.vertex_values) {
            assert_eq!(a.is_sign_negative(), b.is_sign_negative());
        }

        let grid = VoxelGrid::from_field(
            VolumeHeader::cubic(Vec3::from_scalar(-3.0), 0.3, [21, 21, 21]).unwrap(),
            &Gaussian::lobes(Vec3::unit(2), 1.0, 1.0, 0.6),
        );
        let params = SurfaceParams {
            cutoff: Cutoff::absolute(0.2),
            ..SurfaceParams::default()
        };
        let mesh = SurfaceGenerator::new(params).generate(&grid).unwrap();
        let stream = encode(&mesh, Cutoff::absolute(0.2), 35, 90).unwrap();
        let back = &stream.decode().unwrap().into_meshes().unwrap()[0];
        assert_eq!(back.triangles, mesh.triangles);
        assert_eq!(encode(back, Cutoff::absolute(0.2), 35, 90).unwrap(), stream);
    }

    #[test]
    fn test_compression_shrinks_stream() {
        let mesh = sphere_mesh();
        let mut options = CvfOptions::default();
        options.compress = false;
        let mut plain = CvfEncoder::new(options).unwrap();
        plain.add_surface(&mesh).unwrap();
        let plain = plain.finish().unwrap();
        let packed = encode(&mesh, Cutoff::new(0.0), 35, 90).unwrap();
        assert!(packed.len() <= plain.len());
        assert_eq!(
            plain.decode().unwrap().into_meshes().unwrap()[0].triangles,
            packed.decode().unwrap().into_meshes().unwrap()[0].triangles
        );
    }

    #[test]
    fn test_options_from_json() {
        let options: CvfOptions =
            serde_json::from_str(r#"{ "edge_fraction_range": 60, "titles": ["density"] }"#).unwrap();
        assert_eq!(options.edge_fraction_base, 35);
        assert_eq!(options.edge_fraction_range, 60);
        assert!(options.compress);
        assert_eq!(options.title(0), "density");
        assert_eq!(options.title(1), "");
    }
}
