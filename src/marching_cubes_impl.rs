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
    edge::Cutoff,
    marching_cubes_tables::{EDGE_MASKS, SQUARE_EDGE_MASKS, SQUARE_SEGMENTS, TRIANGLES},
};

/// Build the inside-corner mask for a cube. Bit `i` is set if corner `i` is
/// inside the cutoff.
pub fn cube_case(values: &[f32; 8], cutoff: Cutoff) -> usize {
    let mut case = 0;
    for (i, &v) in values.iter().enumerate() {
        if cutoff.is_inside(v) {
            case |= 1 << i;
        }
    }
    case
}

/// The crossed edges of a cube case, in ascending order.
pub fn crossed_edges(case: usize) -> impl Iterator<Item = usize> {
    let mask = EDGE_MASKS[case];
    (0..12).filter(move |edge| mask & (1 << edge) != 0)
}

/// March a single cube, given its inside-corner mask.
///
/// The `triangle_func` is invoked once per triangle with the three edges that
/// carry its vertices and the wireframe visibility mask.
pub fn march_cube<E>(case: usize, mut triangle_func: E)
where
    E: FnMut([usize; 3], u8),
{
    for &[a, b, c, visibility] in TRIANGLES[case] {
        triangle_func([a as usize, b as usize, c as usize], visibility);
    }
}

/// Build the inside-corner mask for a square cell.
pub fn square_case(values: &[f32; 4], cutoff: Cutoff) -> usize {
    let mut case = 0;
    for (i, &v) in values.iter().enumerate() {
        if cutoff.is_inside(v) {
            case |= 1 << i;
        }
    }
    case
}

pub fn crossed_square_edges(case: usize) -> impl Iterator<Item = usize> {
    let mask = SQUARE_EDGE_MASKS[case];
    (0..4).filter(move |edge| mask & (1 << edge) != 0)
}

/// March a single square, invoking `segment_func` with the pair of edges each
/// contour segment joins.
///
/// The saddle cases are decided by the mean of the four corners: when the
/// centre is inside, the two inside corners are joined through it.
pub fn march_square<E>(values: &[f32; 4], cutoff: Cutoff, mut segment_func: E)
where
    E: FnMut([usize; 2]),
{
    let case = square_case(values, cutoff);
    let segments = match case {
        5 | 10 => {
            let centre = values.iter().sum::<f32>() / 4.0;
            if cutoff.is_inside(centre) {
                SQUARE_SEGMENTS[15 - case]
            } else {
                SQUARE_SEGMENTS[case]
            }
        }
        _ => SQUARE_SEGMENTS[case],
    };
    for &segment in segments {
        segment_func(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_cubes_are_empty() {
        let cutoff = Cutoff::new(0.5);
        assert_eq!(cube_case(&[0.0; 8], cutoff), 0);
        assert_eq!(cube_case(&[1.0; 8], cutoff), 255);
        assert_eq!(crossed_edges(0).count(), 0);
        assert_eq!(crossed_edges(255).count(), 0);
    }

    #[test]
    fn test_nan_corner_is_outside() {
        let mut values = [1.0; 8];
        values[3] = std::f32::NAN;
        let case = cube_case(&values, Cutoff::new(0.5));
        assert_eq!(case, 255 & !(1 << 3));
        assert_eq!(crossed_edges(case).collect::<Vec<_>>(), vec![2, 3, 11]);
    }

    #[test]
    fn test_single_corner() {
        let mut triangles = vec![];
        march_cube(1, |edges, visibility| triangles.push((edges, visibility)));
        assert_eq!(triangles, vec![([0, 8, 3], 7)]);
    }

    #[test]
    fn test_square_saddle_follows_centre() {
        let cutoff = Cutoff::new(0.5);
        let mut segments = vec![];
        march_square(&[1.0, 0.0, 1.0, 0.0], cutoff, |s| segments.push(s));
        assert_eq!(segments, vec![[0, 1], [2, 3]]);

        segments.clear();
        march_square(&[0.6, 0.0, 0.6, 0.0], cutoff, |s| segments.push(s));
        assert_eq!(segments, vec![[3, 0], [1, 2]]);
    }

    #[test]
    fn test_square_edges() {
        assert_eq!(crossed_square_edges(1).collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(crossed_square_edges(6).collect::<Vec<_>>(), vec![0, 2]);
    }
}
