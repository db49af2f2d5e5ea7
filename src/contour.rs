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

use std::collections::{HashMap, VecDeque};

/// A chain of contour vertices. A closed polyline implicitly joins its last
/// vertex back to its first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polyline {
    pub vertices: Vec<usize>,
    pub closed: bool,
}

impl Polyline {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of segments, counting the closing one.
    pub fn segment_count(&self) -> usize {
        match (self.closed, self.vertices.len()) {
            (_, 0) | (_, 1) => 0,
            (true, n) => n,
            (false, n) => n - 1,
        }
    }
}

/// Chain segments that share vertex indices into polylines.
///
/// Segments are matched by exact vertex index, so the traversal must already
/// have merged coincident crossings.
pub fn chain_segments(segments: &[[usize; 2]]) -> Vec<Polyline> {
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, &[a, b]) in segments.iter().enumerate() {
        adjacency.entry(a).or_default().push(i);
        adjacency.entry(b).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut polylines = vec![];

    // Take the first unused segment touching `at`, returning its far end.
    let mut follow = |at: usize, used: &mut Vec<bool>| -> Option<usize> {
        let neighbours = adjacency.get_mut(&at)?;
        while let Some(segment) = neighbours.pop() {
            if used[segment] {
                continue;
            }
            used[segment] = true;
            let [a, b] = segments[segment];
            return Some(if a == at { b } else { a });
        }
        None
    };

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let [a, b] = segments[start];
        let mut chain = VecDeque::from(vec![a, b]);

        let mut current = b;
        while current != a {
            match follow(current, &mut used) {
                Some(next) => {
                    chain.push_back(next);
                    current = next;
                }
                None => break,
            }
        }

        let closed = current == a && chain.len() > 2;
        if closed {
            chain.pop_back();
        } else {
            let mut current = a;
            while let Some(next) = follow(current, &mut used) {
                chain.push_front(next);
                current = next;
            }
        }

        polylines.push(Polyline {
            vertices: chain.into_iter().collect(),
            closed,
        });
    }

    polylines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_loop() {
        let polylines = chain_segments(&[[0, 1], [2, 3], [1, 2], [3, 0]]);
        assert_eq!(polylines.len(), 1);
        assert!(polylines[0].closed);
        assert_eq!(polylines[0].vertices, vec![0, 1, 2, 3]);
        assert_eq!(polylines[0].segment_count(), 4);
    }

    #[test]
    fn test_open_chain_extends_both_ways() {
        let polylines = chain_segments(&[[1, 2], [0, 1], [2, 3]]);
        assert_eq!(polylines.len(), 1);
        assert!(!polylines[0].closed);
        assert_eq!(polylines[0].vertices, vec![0, 1, 2, 3]);
        assert_eq!(polylines[0].segment_count(), 3);
    }

    #[test]
    fn test_reversed_segments() {
        let polylines = chain_segments(&[[0, 1], [2, 1], [0, 2]]);
        assert_eq!(polylines.len(), 1);
        assert!(polylines[0].closed);
        assert_eq!(polylines[0].len(), 3);
    }

    #[test]
    fn test_disjoint_loops() {
        let polylines = chain_segments(&[[0, 1], [1, 2], [2, 0], [5, 6], [6, 7], [7, 5]]);
        assert_eq!(polylines.len(), 2);
        assert!(polylines.iter().all(|p| p.closed && p.len() == 3));
    }
}
