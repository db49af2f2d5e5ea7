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


//! Writing finished meshes in specific formats.

use crate::{
    cvf::{CvfEncoder, CvfOptions},
    error::{Error, Result},
    mesh::MeshData,
};
use serde::{Deserialize, Serialize};
use std::{fmt, io::Write, str::FromStr};
use tracing::debug;

/// Trait for writing a set of meshes to a byte sink.
pub trait MeshExporter {
    fn tag(&self) -> &'static str;
    fn export(&self, meshes: &[MeshData], out: &mut dyn Write) -> Result<()>;
}

/// Compact volumetric stream holding every mesh as a separate surface.
pub struct CvfExporter {
    options: CvfOptions,
}

impl CvfExporter {
    pub fn new(options: CvfOptions) -> Self {
        Self { options }
    }
}

impl MeshExporter for CvfExporter {
    fn tag(&self) -> &'static str {
        Format::Cvf.tag()
    }

    fn export(&self, meshes: &[MeshData], out: &mut dyn Write) -> Result<()> {
        let mut encoder = CvfEncoder::new(self.options.clone())?;
        for mesh in meshes {
            encoder.add_surface(mesh)?;
        }
        let stream = encoder.finish()?;
        out.write_all(stream.as_str().as_bytes())?;
        Ok(())
    }
}

/// Wavefront OBJ text, one object per mesh, active triangles only.
pub struct ObjExporter;

impl MeshExporter for ObjExporter {
    fn tag(&self) -> &'static str {
        Format::Obj.tag()
    }

    fn export(&self, meshes: &[MeshData], out: &mut dyn Write) -> Result<()> {
        let mut offset = 1;
        for (i, mesh) in meshes.iter().enumerate() {
            writeln!(out, "o surface{}", i)?;
            for v in &mesh.vertices {
                writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
            }
            let normals = mesh.normals.len() == mesh.vertices.len() && !mesh.normals.is_empty();
            if normals {
                for n in &mesh.normals {
                    writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
                }
            }
            for t in mesh.active_triangles() {
                let [a, b, c] = t.vertices.map(|v| v + offset);
                if normals {
                    writeln!(out, "f {0}//{0} {1}//{1} {2}//{2}", a, b, c)?;
                } else {
                    writeln!(out, "f {} {} {}", a, b, c)?;
                }
            }
            for line in &mesh.contours {
                let mut indices: Vec<usize> = line.vertices.iter().map(|v| v + offset).collect();
                if line.closed {
                    if let Some(&first) = indices.first() {
                        indices.push(first);
                    }
                }
                let indices: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                writeln!(out, "l {}", indices.join(" "))?;
            }
            offset += mesh.vertex_count();
        }
        Ok(())
    }
}

/// Packed little-endian buffers: per mesh, the vertex and index counts as
/// `u32`, then `f32` positions, then `u32` triangle indices.
pub struct RawExporter;

impl MeshExporter for RawExporter {
    fn tag(&self) -> &'static str {
        Format::Raw.tag()
    }

    fn export(&self, meshes: &[MeshData], out: &mut dyn Write) -> Result<()> {
        for mesh in meshes {
            let (positions, indices) = mesh.to_indexed_buffers();
            out.write_all(&(mesh.vertex_count() as u32).to_le_bytes())?;
            out.write_all(&(indices.len() as u32).to_le_bytes())?;
            for p in positions {
                out.write_all(&p.to_le_bytes())?;
            }
            for i in indices {
                out.write_all(&i.to_le_bytes())?;
            }
        }
        Ok(())
    }
}

/// The registry of export formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Cvf,
    Obj,
    Raw,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Cvf, Format::Obj, Format::Raw];

    pub fn tag(self) -> &'static str {
        match self {
            Format::Cvf => "cvf",
            Format::Obj => "obj",
            Format::Raw => "raw",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.tag().eq_ignore_ascii_case(tag.trim()))
    }

    pub fn exporter(self, options: &CvfOptions) -> Box<dyn MeshExporter> {
        debug!(format = self.tag(), "exporter selected");
        match self {
            Format::Cvf => Box::new(CvfExporter::new(options.clone())),
            Format::Obj => Box::new(ObjExporter),
            Format::Raw => Box::new(RawExporter),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s).ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cvf::decode,
        edge::Cutoff,
        generator::{SurfaceGenerator, SurfaceParams},
        grid::{VolumeHeader, VoxelGrid},
        math::Vec3,
    };

    fn step_mesh() -> MeshData {
        let header = VolumeHeader::cubic(Vec3::zero(), 1.0, [2, 2, 2]).unwrap();
        let grid = VoxelGrid::new(header, vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
        SurfaceGenerator::new(SurfaceParams::default())
            .generate(&grid)
            .unwrap()
    }

    #[test]
    fn test_tags() {
        for format in Format::ALL.iter() {
            assert_eq!(Format::from_tag(format.tag()), Some(*format));
            assert_eq!(format.to_string().parse::<Format>().unwrap(), *format);
            assert_eq!(format.exporter(&CvfOptions::default()).tag(), format.tag());
        }
        assert_eq!(Format::from_tag(" OBJ "), Some(Format::Obj));
        assert!(matches!("ply".parse::<Format>(), Err(Error::UnknownFormat(_))));
    }

    #[test]
    fn test_obj() {
        let mesh = step_mesh();
        let mut out = Vec::new();
        Format::Obj
            .exporter(&CvfOptions::default())
            .export(&[mesh.clone(), mesh], &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("o ")).count(), 2);
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 8);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 4);
        let last = text.lines().filter(|l| l.starts_with("f ")).last().unwrap();
        for index in last[2..].split(' ') {
            let index: usize = index.parse().unwrap();
            assert!(index > 4 && index <= 8);
        }
    }

    #[test]
    fn test_raw() {
        let mesh = step_mesh();
        let mut out = Vec::new();
        RawExporter.export(&[mesh], &mut out).unwrap();
        assert_eq!(out.len(), 8 + 4 * 3 * 4 + 2 * 3 * 4);
        assert_eq!(&out[0..4], &4u32.to_le_bytes());
        assert_eq!(&out[4..8], &6u32.to_le_bytes());
    }

    #[test]
    fn test_cvf() {
        let header = VolumeHeader::cubic(Vec3::from_scalar(-1.5), 0.25, [13; 3]).unwrap();
        let grid = VoxelGrid::from_field(header, &|p: Vec3| p.len() - 1.0);
        let mesh = SurfaceGenerator::new(SurfaceParams {
            cutoff: Cutoff::new(0.0),
            ..SurfaceParams::default()
        })
        .generate(&grid)
        .unwrap();
        let mut out = Vec::new();
        Format::Cvf
            .exporter(&CvfOptions::default())
            .export(&[mesh.clone()], &mut out)
            .unwrap();
        let document = decode(std::str::from_utf8(&out).unwrap()).unwrap();
        let decoded = document.into_meshes().unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].triangle_count(), mesh.triangle_count());
    }

    #[test]
    fn test_cvf_rejects_contours() {
        let header = VolumeHeader::cubic(Vec3::from_scalar(-1.5), 0.25, [13; 3]).unwrap();
        let grid = VoxelGrid::from_field(header, &|p: Vec3| p.len() - 1.0);
        let contour = SurfaceGenerator::new(SurfaceParams {
            cutoff: Cutoff::new(0.0),
            ..SurfaceParams::default()
        })
        .generate_contour(&grid, &crate::math::Plane::new(0.0, 0.0, 1.0, 0.0))
        .unwrap();
        let mut out = Vec::new();
        let result = CvfExporter::new(CvfOptions::default()).export(&[contour], &mut out);
        assert!(matches!(result, Err(Error::Cvf(_))));
        assert!(out.is_empty());
    }
}
