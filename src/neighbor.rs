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


//! Scalar fields derived from atomic positions rather than read from a file.

use crate::{
    bitset::BitSet,
    error::Result,
    grid::VolumeHeader,
    math::Vec3,
    source::ScalarField,
};
use tracing::debug;

/// Radius assumed for atoms when only coordinates were requested.
pub const DEFAULT_RADIUS: f32 = 1.7;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AtomDataMode {
    Coordinates,
    CoordinatesAndRadii,
}

/// Atom inputs for a field, as filled by a [NeighborQuery].
#[derive(Clone, Debug, Default)]
pub struct AtomData {
    pub positions: Vec<Vec3>,
    /// Empty unless radii were requested.
    pub radii: Vec<f32>,
    /// Atoms present in the source but excluded from this request.
    pub ignored: BitSet,
}

impl AtomData {
    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }

    pub fn radius(&self, atom: usize) -> f32 {
        self.radii.get(atom).copied().unwrap_or(DEFAULT_RADIUS)
    }

    pub fn is_ignored(&self, atom: usize) -> bool {
        self.ignored.get(atom)
    }

    /// Indices of atoms that take part in the field.
    pub fn included(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.atom_count()).filter(move |&i| !self.is_ignored(i))
    }

    /// A cubic lattice enclosing every included atom's sphere plus `padding`.
    pub fn bounding_header(&self, padding: f32, spacing: f32) -> Result<VolumeHeader> {
        let mut min = Vec3::from_scalar(std::f32::INFINITY);
        let mut max = Vec3::from_scalar(std::f32::NEG_INFINITY);
        for i in self.included() {
            let extent = Vec3::from_scalar(self.radius(i) + padding);
            min = min.min(self.positions[i] - extent);
            max = max.max(self.positions[i] + extent);
        }
        if min.any(|c| !c.is_finite()) {
            min = Vec3::from_scalar(-padding);
            max = Vec3::from_scalar(padding);
        }
        let size = max - min;
        let counts = [
            (size.x / spacing).ceil() as usize + 1,
            (size.y / spacing).ceil() as usize + 1,
            (size.z / spacing).ceil() as usize + 1,
        ];
        VolumeHeader::cubic(min, spacing, counts)
    }
}

/// Atom proximity services for fields computed from atoms.
pub trait NeighborQuery {
    fn atom_count(&self) -> usize;

    /// Fill `out` with positions, and radii when `mode` asks for them.
    fn fill_atom_data(&self, out: &mut AtomData, mode: AtomDataMode);

    /// Atoms other than `atom` whose centres lie within `distance` of it.
    ///
    /// Only atoms in `selection` are considered when one is given. With
    /// `greater_only`, only indices above `atom` are returned, so walking
    /// every atom visits each pair once.
    fn within_distance(
        &self,
        atom: usize,
        distance: f32,
        selection: Option<&BitSet>,
        greater_only: bool,
    ) -> Vec<usize>;
}

/// A plain list of atoms, searched exhaustively.
#[derive(Clone, Debug, Default)]
pub struct AtomList {
    positions: Vec<Vec3>,
    radii: Vec<f32>,
    ignored: BitSet,
}

impl AtomList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: Vec3, radius: f32) -> usize {
        self.positions.push(position);
        self.radii.push(radius);
        self.positions.len() - 1
    }

    /// Exclude an atom from filled data without renumbering the rest.
    pub fn ignore(&mut self, atom: usize) {
        self.ignored.set(atom, true);
    }
}

impl NeighborQuery for AtomList {
    fn atom_count(&self) -> usize {
        self.positions.len()
    }

    fn fill_atom_data(&self, out: &mut AtomData, mode: AtomDataMode) {
        out.positions = self.positions.clone();
        out.radii = match mode {
            AtomDataMode::Coordinates => Vec::new(),
            AtomDataMode::CoordinatesAndRadii => self.radii.clone(),
        };
        out.ignored = self.ignored.clone();
    }

    fn within_distance(
        &self,
        atom: usize,
        distance: f32,
        selection: Option<&BitSet>,
        greater_only: bool,
    ) -> Vec<usize> {
        let center = match self.positions.get(atom) {
            Some(&p) => p,
            None => return Vec::new(),
        };
        let limit = distance * distance;
        let first = if greater_only { atom + 1 } else { 0 };
        (first..self.positions.len())
            .filter(|&i| i != atom)
            .filter(|&i| selection.map_or(true, |s| s.get(i)))
            .filter(|&i| (self.positions[i] - center).len_sq() <= limit)
            .collect()
    }
}

/// Every pair of atoms closer than `distance`, lower index first.
pub fn contact_pairs<Q: NeighborQuery + ?Sized>(
    query: &Q,
    distance: f32,
    selection: Option<&BitSet>,
) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..query.atom_count() {
        if selection.map_or(false, |s| !s.get(i)) {
            continue;
        }
        for j in query.within_distance(i, distance, selection, true) {
            pairs.push((i, j));
        }
    }
    pairs
}

/// The van der Waals distance field of a set of atoms: negative inside any
/// atom sphere, zero on the envelope.
#[derive(Clone, Debug)]
pub struct AtomField {
    centers: Vec<Vec3>,
    radii: Vec<f32>,
}

impl AtomField {
    pub fn new(data: &AtomData) -> Self {
        let (centers, radii) = data
            .included()
            .map(|i| (data.positions[i], data.radius(i)))
            .unzip();
        Self { centers, radii }
    }

    /// Build the field from whatever atoms `query` supplies, restricted to
    /// `selection` when given.
    pub fn from_query<Q: NeighborQuery + ?Sized>(
        query: &Q,
        mode: AtomDataMode,
        selection: Option<&BitSet>,
    ) -> (AtomData, Self) {
        let mut data = AtomData::default();
        query.fill_atom_data(&mut data, mode);
        if let Some(selection) = selection {
            for i in 0..data.atom_count() {
                if !selection.get(i) {
                    data.ignored.set(i, true);
                }
            }
        }
        let field = Self::new(&data);
        debug!(
            atoms = data.atom_count(),
            included = field.atom_count(),
            ?mode,
            "atom field prepared"
        );
        (data, field)
    }

    pub fn atom_count(&self) -> usize {
        self.centers.len()
    }
}

impl ScalarField for AtomField {
    fn sample(&self, p: Vec3) -> f32 {
        self.centers
            .iter()
            .zip(&self.radii)
            .map(|(&c, &r)| (p - c).len() - r)
            .fold(std::f32::INFINITY, f32::min)
    }
}
