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

use super::{compress::decompress, CharBand, CvfOptions, MAGIC};
use crate::{
    bitset::BitSet,
    color::{ColorData, ColorPrecision, ColorTarget},
    edge::Cutoff,
    error::{CvfError, Error},
    grid::{VolumeHeader, VoxelGrid},
    marching_cubes::{Limits, MarchingCubes},
    math::Vec3,
    mesh::{MeshAccumulator, MeshData},
    sink::{MeshSink, SurfacePointQuery},
};
use std::{iter::Peekable, str::FromStr};
use tracing::{info, warn};

/// A decoded stream.
#[derive(Debug)]
pub struct CvfDocument {
    pub header: VolumeHeader,
    /// Bands and titles as found in the stream.
    pub options: CvfOptions,
    /// Each surface decodes independently; a bad surface does not spoil the
    /// others.
    pub surfaces: Vec<Result<MeshData, CvfError>>,
}

impl CvfDocument {
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// All surfaces, or the first error.
    pub fn into_meshes(self) -> Result<Vec<MeshData>, CvfError> {
        self.surfaces.into_iter().collect()
    }
}

struct Lines<'a> {
    inner: Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate().peekable(),
        }
    }

    /// The next line and its 1-based number.
    fn next(&mut self, what: &'static str) -> Result<(usize, &'a str), CvfError> {
        self.inner
            .next()
            .map(|(i, line)| (i + 1, line))
            .ok_or(CvfError::UnexpectedEof(what))
    }

    fn skip_comments(&mut self) {
        while let Some((_, line)) = self.inner.peek() {
            if !line.starts_with('#') {
                break;
            }
            self.inner.next();
        }
    }
}

fn malformed(line: usize, reason: impl Into<String>) -> CvfError {
    CvfError::MalformedHeader {
        line,
        reason: reason.into(),
    }
}

fn parse<T: FromStr>(line: usize, token: Option<&str>, what: &str) -> Result<T, CvfError> {
    let token = token.ok_or_else(|| malformed(line, format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| malformed(line, format!("bad {} {:?}", what, token)))
}

fn parse_vec3<'a, I>(line: usize, tokens: &mut I) -> Result<Vec3, CvfError>
where
    I: Iterator<Item = &'a str>,
{
    Ok(Vec3::new(
        parse(line, tokens.next(), "x")?,
        parse(line, tokens.next(), "y")?,
        parse(line, tokens.next(), "z")?,
    ))
}

/// Decode a stream under the default [Limits].
///
/// Problems in the lattice header fail the whole decode; problems in a
/// surface are reported in that surface's slot of [CvfDocument::surfaces].
pub fn decode(text: &str) -> Result<CvfDocument, CvfError> {
    decode_with_limits(text, &Limits::default())
}

/// Decode a stream, refusing lattices, crossings, or payloads larger than
/// `limits` allows.
pub fn decode_with_limits(text: &str, limits: &Limits) -> Result<CvfDocument, CvfError> {
    let mut lines = Lines::new(text);

    let (n, magic) = lines.next("header")?;
    if !magic.starts_with(MAGIC) {
        return Err(malformed(n, "missing format marker"));
    }
    let titles = vec![
        lines.next("header")?.1.to_string(),
        lines.next("header")?.1.to_string(),
    ];

    let (n, line) = lines.next("header")?;
    let origin = parse_vec3(n, &mut line.split_whitespace())?;
    let mut counts = [0usize; 3];
    let mut basis = [Vec3::zero(); 3];
    for axis in 0..3 {
        let (n, line) = lines.next("header")?;
        let mut tokens = line.split_whitespace();
        counts[axis] = parse(n, tokens.next(), "voxel count")?;
        basis[axis] = parse_vec3(n, &mut tokens)?;
    }
    let header = VolumeHeader::new(origin, basis, counts).map_err(|e| malformed(n, e.to_string()))?;
    if header.point_count() > limits.max_points {
        return Err(CvfError::CapacityExceeded {
            what: "lattice points",
            limit: limits.max_points,
        });
    }

    let (n, line) = lines.next("header")?;
    let mut tokens = line.split_whitespace();
    let surface_count: i64 = parse(n, tokens.next(), "surface count")?;
    if surface_count >= 0 {
        return Err(malformed(n, "stream holds raw volumetric data, not surfaces"));
    }
    let surface_count = surface_count
        .checked_neg()
        .ok_or_else(|| malformed(n, format!("surface count {} out of range", surface_count)))?;
    let mut band = || -> Result<u32, CvfError> { parse(n, tokens.next(), "band") };
    let options = CvfOptions {
        edge_fraction_base: band()?,
        edge_fraction_range: band()?,
        color_fraction_base: band()?,
        color_fraction_range: band()?,
        compress: true,
        titles,
    };
    let edge_band = options.edge_band().map_err(|e| malformed(n, e.to_string()))?;
    let color_band = options.color_band().map_err(|e| malformed(n, e.to_string()))?;

    lines.skip_comments();

    let mut surfaces = vec![];
    for index in 0..surface_count {
        let surface = read_surface(&mut lines, &header, edge_band, color_band, limits);
        let exhausted = matches!(surface, Err(CvfError::UnexpectedEof(_)));
        if let Err(e) = &surface {
            warn!(surface = index, error = %e, "rejected surface");
        }
        surfaces.push(surface);
        if exhausted {
            break;
        }
    }

    info!(
        surfaces = surfaces.len(),
        decoded = surfaces.iter().filter(|s| s.is_ok()).count(),
        bytes = text.len(),
        "decoded compact stream"
    );

    Ok(CvfDocument {
        header,
        options,
        surfaces,
    })
}

struct Definition {
    cutoff: Cutoff,
    runs: usize,
    fractions: usize,
    colors: Option<ColorDefinition>,
}

struct ColorDefinition {
    precision: ColorPrecision,
    chars: usize,
    min: f32,
    max: f32,
    target: ColorTarget,
}

fn parse_definition(n: usize, line: &str) -> Result<Definition, CvfError> {
    let mut tokens = line.split_whitespace();
    let value: f32 = parse(n, tokens.next(), "cutoff")?;
    let runs = parse(n, tokens.next(), "run count")?;
    let fractions = parse(n, tokens.next(), "fraction count")?;
    let color_param: i64 = parse(n, tokens.next(), "colour count")?;
    let is_absolute = match parse::<u8>(n, tokens.next(), "absolute flag")? {
        0 => false,
        1 => true,
        other => return Err(malformed(n, format!("absolute flag {} is not 0 or 1", other))),
    };

    let colors = match color_param {
        -1 => None,
        0 => return Err(malformed(n, "colour count of zero")),
        p => {
            let precision = if p > 0 {
                ColorPrecision::Single
            } else if p % 2 == 0 {
                ColorPrecision::Double
            } else {
                return Err(malformed(n, "double precision colour count must be even"));
            };
            let chars = usize::try_from(p.unsigned_abs())
                .map_err(|_| malformed(n, format!("colour count {} out of range", p)))?;
            let min = parse(n, tokens.next(), "colour minimum")?;
            let max = parse(n, tokens.next(), "colour maximum")?;
            let target = match parse::<u8>(n, tokens.next(), "colour target")? {
                0 => ColorTarget::Vertex,
                1 => ColorTarget::Polygon,
                other => return Err(malformed(n, format!("unknown colour target {}", other))),
            };
            Some(ColorDefinition {
                precision,
                chars,
                min,
                max,
                target,
            })
        }
    };

    Ok(Definition {
        cutoff: Cutoff { value, is_absolute },
        runs,
        fractions,
        colors,
    })
}

/// Each vertex touches at most twenty triangles (five in each of its four
/// cubes), so polygon colours at double precision stay under this many
/// characters per edge fraction.
const MAX_COLOR_CHARS_PER_FRACTION: usize = 16;

fn parse_runs(n: usize, line: &str, what: &str) -> Result<(Vec<usize>, usize), CvfError> {
    let runs = line
        .split_whitespace()
        .map(|t| t.parse::<usize>().map_err(|_| malformed(n, format!("bad {} {:?}", what, t))))
        .collect::<Result<Vec<_>, _>>()?;
    let total = runs
        .iter()
        .try_fold(0usize, |total, &run| total.checked_add(run))
        .ok_or_else(|| malformed(n, format!("{} overflow", what)))?;
    Ok((runs, total))
}

fn capacity(e: Error) -> CvfError {
    match e {
        Error::CapacityExceeded { what, limit } => CvfError::CapacityExceeded { what, limit },
        other => CvfError::InvalidEncoding(other.to_string()),
    }
}

fn read_surface(
    lines: &mut Lines,
    header: &VolumeHeader,
    edge_band: CharBand,
    color_band: CharBand,
    limits: &Limits,
) -> Result<MeshData, CvfError> {
    let (n, line) = lines.next("surface definition")?;
    // Consume the whole surface before judging it, so the next one stays aligned
    let has_lobes = line.split_whitespace().nth(4) == Some("1");
    let runs_line = lines.next("edge runs");
    let lobes_line = if has_lobes {
        Some(lines.next("lobe runs"))
    } else {
        None
    };
    let payload_line = lines.next("payload");

    let definition = parse_definition(n, line)?;
    let (n, runs_line) = runs_line?;
    let lobes_line = lobes_line.transpose()?;
    let (_, payload_line) = payload_line?;

    let (runs, points) = parse_runs(n, runs_line, "run length")?;
    if runs.len() != definition.runs {
        return Err(CvfError::PayloadMismatch {
            section: "edge runs",
            expected: definition.runs,
            found: runs.len(),
        });
    }
    if points != header.point_count() {
        return Err(CvfError::PayloadMismatch {
            section: "lattice points",
            expected: header.point_count(),
            found: points,
        });
    }

    if definition.fractions > limits.max_vertices {
        return Err(CvfError::CapacityExceeded {
            what: "edge fractions",
            limit: limits.max_vertices,
        });
    }
    let color_chars = definition.colors.as_ref().map_or(0, |c| c.chars);
    let color_limit = definition.fractions.saturating_mul(MAX_COLOR_CHARS_PER_FRACTION);
    if color_chars > color_limit {
        return Err(CvfError::CapacityExceeded {
            what: "colour characters",
            limit: color_limit,
        });
    }
    let expected = definition
        .fractions
        .checked_add(color_chars)
        .ok_or(CvfError::CapacityExceeded {
            what: "payload characters",
            limit: usize::MAX,
        })?;
    let payload: Vec<char> = decompress(payload_line, expected)?.chars().collect();
    if payload.len() != expected {
        return Err(CvfError::PayloadMismatch {
            section: "payload",
            expected,
            found: payload.len(),
        });
    }
    let (fraction_chars, color_chars) = payload.split_at(definition.fractions);

    let lobes = match lobes_line {
        Some((n, line)) => {
            let (runs, placed) = parse_runs(n, line, "lobe run")?;
            if placed > definition.fractions {
                return Err(CvfError::PayloadMismatch {
                    section: "lobe runs",
                    expected: definition.fractions,
                    found: placed,
                });
            }
            Some(BitSet::from_runs(&runs))
        }
        None => None,
    };

    let occupancy = BitSet::from_runs(&runs);
    let values = (0..points)
        .map(|i| if occupancy.get(i) { 1.0 } else { 0.0 })
        .collect();
    let grid = VoxelGrid::new(header.clone(), values)
        .map_err(|e| CvfError::InvalidEncoding(e.to_string()))?;

    let mut sink = ReplaySink {
        mesh: MeshAccumulator::new(),
        cutoff: definition.cutoff,
        lobes,
        fractions: fraction_chars.iter().map(|&c| edge_band.decode(c)).collect(),
        next: 0,
        placed: 0,
        missing: 0,
    };
    MarchingCubes::new(Cutoff::new(0.5), *limits)
        .extract(&grid, &mut sink)
        .map_err(capacity)?;
    if sink.missing > 0 || sink.next != sink.fractions.len() {
        return Err(CvfError::PayloadMismatch {
            section: "edge fractions",
            expected: sink.next + sink.missing,
            found: sink.fractions.len(),
        });
    }
    if let Some(lobes) = &sink.lobes {
        if lobes.len() != sink.placed {
            return Err(CvfError::PayloadMismatch {
                section: "lobe runs",
                expected: sink.placed,
                found: lobes.len(),
            });
        }
    }
    sink.mesh.notify_generation_completed();

    let mut mesh = MeshData {
        header: Some(header.clone()),
        cutoff: Some(definition.cutoff),
        occupancy: Some(occupancy),
        ..MeshData::default()
    };
    sink.mesh.fill_mesh_data(&mut mesh);

    if let Some(colors) = definition.colors {
        let fractions: Vec<f32> = match colors.precision {
            ColorPrecision::Single => color_chars.iter().map(|&c| color_band.decode(c)).collect(),
            ColorPrecision::Double => {
                let (first, second) = color_chars.split_at(color_chars.len() / 2);
                first
                    .iter()
                    .zip(second)
                    .map(|(&a, &b)| color_band.decode_double(a, b))
                    .collect()
            }
        };
        let expected = match colors.target {
            ColorTarget::Vertex => mesh.vertex_count(),
            ColorTarget::Polygon => mesh.triangle_count(),
        };
        if fractions.len() != expected {
            return Err(CvfError::PayloadMismatch {
                section: "colours",
                expected,
                found: fractions.len(),
            });
        }
        let mut data = ColorData {
            precision: colors.precision,
            target: colors.target,
            min: colors.min,
            max: colors.max,
            values: vec![],
        };
        data.values = fractions.iter().map(|&f| data.from_fraction(f)).collect();
        mesh.colors = Some(data);
    }

    Ok(mesh)
}

/// Feeds stored edge fractions to the traversal in place of interpolation.
struct ReplaySink {
    mesh: MeshAccumulator,
    cutoff: Cutoff,
    /// Placed vertices lying on the negative lobe of an absolute surface.
    lobes: Option<BitSet>,
    fractions: Vec<f32>,
    next: usize,
    placed: usize,
    missing: usize,
}

impl ReplaySink {
    fn vertex_value(&self) -> f32 {
        match &self.lobes {
            Some(lobes) if self.placed < lobes.len() && lobes.get(self.placed) => -self.cutoff.value.abs(),
            Some(_) => self.cutoff.value.abs(),
            None => self.cutoff.value,
        }
    }
}

impl MeshSink for ReplaySink {
    fn get_surface_point_index(&mut self, query: &SurfacePointQuery) -> Option<usize> {
        let fraction = match self.fractions.get(self.next) {
            Some(&f) => f,
            None => {
                self.missing += 1;
                return None;
            }
        };
        self.next += 1;
        if fraction.is_nan() {
            self.mesh.reject_vertex();
            return None;
        }
        let value = self.vertex_value();
        self.placed += 1;
        self.mesh.push_vertex(query.point_at(fraction), value, fraction)
    }

    fn add_vertex_copy(&mut self, point: Vec3, value: f32, association: usize) -> Option<usize> {
        self.mesh.add_vertex_copy(point, value, association)
    }

    fn add_triangle_check(&mut self, a: usize, b: usize, c: usize, visibility: u8, _: bool) -> bool {
        self.mesh
            .add_triangle_check(a, b, c, visibility, self.cutoff.splits_lobes())
    }

    fn invalidate_triangles(&mut self) {
        self.mesh.invalidate_triangles();
    }

    fn fill_mesh_data(&self, out: &mut MeshData) {
        self.mesh.fill_mesh_data(out);
    }
}
