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

use super::{compress::compress, CharBand, CvfOptions, CvfStream, MAGIC};
use crate::{
    bitset::BitSet,
    color::{ColorPrecision, ColorTarget},
    edge::Cutoff,
    error::CvfError,
    grid::VolumeHeader,
    mesh::MeshData,
};
use tracing::info;

/// Encode a single surface with one band for fractions and colours.
pub fn encode(mesh: &MeshData, cutoff: Cutoff, base: u32, range: u32) -> Result<CvfStream, CvfError> {
    let mut encoder = CvfEncoder::new(CvfOptions::with_band(base, range))?;
    encoder.add_surface_with_cutoff(mesh, cutoff)?;
    encoder.finish()
}

/// Builds a stream from one or more surfaces on a shared lattice.
pub struct CvfEncoder {
    options: CvfOptions,
    edge_band: CharBand,
    color_band: CharBand,
    header: Option<VolumeHeader>,
    surfaces: Vec<String>,
    fraction_chars: usize,
}

impl CvfEncoder {
    pub fn new(options: CvfOptions) -> Result<Self, CvfError> {
        let edge_band = options.edge_band()?;
        let color_band = options.color_band()?;
        Ok(Self {
            options,
            edge_band,
            color_band,
            header: None,
            surfaces: vec![],
            fraction_chars: 0,
        })
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Add a surface at the cutoff it was generated with.
    pub fn add_surface(&mut self, mesh: &MeshData) -> Result<(), CvfError> {
        let cutoff = mesh
            .cutoff
            .ok_or_else(|| CvfError::InvalidEncoding("mesh does not record its cutoff".into()))?;
        self.add_surface_with_cutoff(mesh, cutoff)
    }

    pub fn add_surface_with_cutoff(&mut self, mesh: &MeshData, cutoff: Cutoff) -> Result<(), CvfError> {
        let header = mesh
            .header
            .as_ref()
            .ok_or_else(|| CvfError::InvalidEncoding("mesh has no lattice header".into()))?;
        let occupancy = mesh.occupancy.as_ref().ok_or_else(|| {
            CvfError::InvalidEncoding("mesh has no occupancy; contours cannot be encoded".into())
        })?;
        if self.header.as_ref().map_or(false, |h| h != header) {
            return Err(CvfError::InvalidEncoding(
                "all surfaces in a stream must share one lattice".into(),
            ));
        }
        if occupancy.len() != header.point_count() {
            return Err(CvfError::PayloadMismatch {
                section: "occupancy",
                expected: header.point_count(),
                found: occupancy.len(),
            });
        }

        let runs = occupancy.runs();
        let mut payload: String = mesh
            .edge_fractions
            .iter()
            .map(|&f| self.edge_band.encode(f))
            .collect();

        let mut definition = format!(
            "{} {} {}",
            cutoff.value,
            runs.len(),
            mesh.edge_fractions.len()
        );
        match mesh.colors.as_ref().filter(|c| !c.values.is_empty()) {
            Some(colors) => {
                let expected = match colors.target {
                    ColorTarget::Vertex => mesh.vertex_count(),
                    ColorTarget::Polygon => mesh.triangle_count(),
                };
                if colors.values.len() != expected {
                    return Err(CvfError::InvalidEncoding(format!(
                        "{} colour values for {} {:?} targets",
                        colors.values.len(),
                        expected,
                        colors.target
                    )));
                }
                let fractions = colors.values.iter().map(|&v| colors.to_fraction(v));
                let param = match colors.precision {
                    ColorPrecision::Single => {
                        payload.extend(fractions.map(|f| self.color_band.encode(f)));
                        colors.values.len() as i64
                    }
                    ColorPrecision::Double => {
                        let (first, second): (String, String) =
                            fractions.map(|f| self.color_band.encode_double(f)).unzip();
                        payload.push_str(&first);
                        payload.push_str(&second);
                        -2 * colors.values.len() as i64
                    }
                };
                let target = match colors.target {
                    ColorTarget::Vertex => 0,
                    ColorTarget::Polygon => 1,
                };
                definition.push_str(&format!(
                    " {} {} {} {} {}",
                    param, cutoff.is_absolute as u8, colors.min, colors.max, target
                ));
            }
            None => definition.push_str(&format!(" -1 {}", cutoff.is_absolute as u8)),
        }

        let mut runs = join_runs(&runs);
        if cutoff.is_absolute {
            runs.push('\n');
            runs.push_str(&join_runs(&negative_lobe(mesh)?.runs()));
        }
        let payload = if self.options.compress {
            compress(&payload)
        } else {
            payload
        };

        if self.header.is_none() {
            self.header = Some(header.clone());
        }
        self.fraction_chars += mesh.edge_fractions.len();
        self.surfaces
            .push(format!("{}\n{}\n{}\n", definition, runs, payload));
        Ok(())
    }

    pub fn finish(self) -> Result<CvfStream, CvfError> {
        let header = self
            .header
            .ok_or_else(|| CvfError::InvalidEncoding("no surfaces to encode".into()))?;

        let mut out = String::new();
        out.push_str(MAGIC);
        out.push('\n');
        for i in 0..2 {
            out.push_str(&self.options.title(i));
            out.push('\n');
        }
        let o = header.origin;
        out.push_str(&format!("{} {} {}\n", o.x, o.y, o.z));
        for axis in 0..3 {
            let b = header.basis[axis];
            out.push_str(&format!("{} {} {} {}\n", header.counts[axis], b.x, b.y, b.z));
        }
        out.push_str(&format!(
            "-{} {} {} {} {}\n",
            self.surfaces.len(),
            self.edge_band.base(),
            self.edge_band.range(),
            self.color_band.base(),
            self.color_band.range()
        ));
        for surface in &self.surfaces {
            out.push_str(surface);
        }

        let raw_bytes = header.point_count() * std::mem::size_of::<f32>();
        info!(
            surfaces = self.surfaces.len(),
            fraction_chars = self.fraction_chars,
            bytes = out.len(),
            ratio = raw_bytes as f64 / out.len() as f64,
            "encoded compact stream"
        );
        Ok(CvfStream(out))
    }
}

fn join_runs(runs: &[usize]) -> String {
    runs.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Marks the vertices lying on the negative lobe, in the order the decoder
/// will recreate them: one per edge fraction that is not NaN.
fn negative_lobe(mesh: &MeshData) -> Result<BitSet, CvfError> {
    let placed = mesh.edge_fractions.iter().filter(|f| !f.is_nan()).count();
    if placed != mesh.vertex_values.len() {
        return Err(CvfError::InvalidEncoding(format!(
            "{} placed edge fractions for {} vertex values",
            placed,
            mesh.vertex_values.len()
        )));
    }
    let mut lobe = BitSet::new(placed);
    for (i, &v) in mesh.vertex_values.iter().enumerate() {
        lobe.set(i, v.is_sign_negative());
    }
    Ok(lobe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::ColorData, math::Vec3};

    fn tiny_mesh() -> MeshData {
        let header = VolumeHeader::cubic(Vec3::zero(), 0.5, [2, 2, 2]).unwrap();
        let mut occupancy = BitSet::new(8);
        occupancy.set(0, true);
        MeshData {
            header: Some(header),
            cutoff: Some(Cutoff::new(0.5)),
            occupancy: Some(occupancy),
            edge_fractions: vec![0.5, 0.5, std::f32::NAN],
            ..MeshData::default()
        }
    }

    #[test]
    fn test_layout() {
        let stream = encode(&tiny_mesh(), Cutoff::new(0.5), 35, 90).unwrap();
        let lines: Vec<_> = stream.as_str().lines().collect();
        assert_eq!(
            lines,
            vec![
                "#CVF VERSION 1.0",
                "",
                "",
                "0 0 0",
                "2 0.5 0 0",
                "2 0 0.5 0",
                "2 0 0 0.5",
                "-1 35 90 35 90",
                "0.5 3 3 -1 0",
                "0 1 7",
                "PP}",
            ]
        );
    }

    #[test]
    fn test_absolute_surface_records_lobes() {
        let mut mesh = tiny_mesh();
        mesh.vertex_values = vec![0.5, -0.5];
        let stream = encode(&mesh, Cutoff::absolute(0.5), 35, 90).unwrap();
        let lines: Vec<_> = stream.as_str().lines().skip(8).collect();
        assert_eq!(lines, vec!["0.5 3 3 -1 1", "0 1 7", "1 1", "PP}"]);

        mesh.vertex_values.pop();
        assert!(matches!(
            encode(&mesh, Cutoff::absolute(0.5), 35, 90),
            Err(CvfError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_requires_lattice() {
        let mut mesh = tiny_mesh();
        mesh.occupancy = None;
        assert!(matches!(
            encode(&mesh, Cutoff::new(0.5), 35, 90),
            Err(CvfError::InvalidEncoding(_))
        ));
        assert!(encode(&tiny_mesh(), Cutoff::new(0.5), 20, 90).is_err());
        assert!(CvfEncoder::new(CvfOptions::default()).unwrap().finish().is_err());
    }

    #[test]
    fn test_colour_count_must_match() {
        let mut mesh = tiny_mesh();
        mesh.colors = Some(ColorData::new(
            ColorPrecision::Single,
            ColorTarget::Vertex,
            vec![1.0, 2.0],
        ));
        assert!(encode(&mesh, Cutoff::new(0.5), 35, 90).is_err());
    }

    #[test]
    fn test_mismatched_lattices() {
        let mut encoder = CvfEncoder::new(CvfOptions::default()).unwrap();
        encoder.add_surface(&tiny_mesh()).unwrap();
        let mut other = tiny_mesh();
        other.header = Some(VolumeHeader::cubic(Vec3::zero(), 1.0, [2, 2, 2]).unwrap());
        assert!(encoder.add_surface(&other).is_err());
        assert_eq!(encoder.surface_count(), 1);
    }
}
