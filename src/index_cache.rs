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

use std::{cmp::Eq, collections::HashMap, hash::Hash};

/// Identifies a lattice edge by the linear index of its lower end point and
/// the axis it runs along.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct EdgeKey {
    pub origin: usize,
    pub axis: u8,
}

impl EdgeKey {
    pub fn new(origin: usize, axis: usize) -> Self {
        Self {
            origin,
            axis: axis as u8,
        }
    }
}

/// Tracks vertex indices to avoid emitting duplicate vertices during marching
/// cubes mesh generation.
///
/// Owned by a single traversal. Rejected crossings are cached too, so every
/// edge is offered to the sink exactly once.
pub struct IndexCache<K: Eq + Hash, I: Clone> {
    indices: HashMap<K, I>,
}

impl<K: Eq + Hash, I: Clone> IndexCache<K, I> {
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
        }
    }

    pub fn put(&mut self, key: K, index: I) {
        self.indices.insert(key, index);
    }

    pub fn get(&self, key: K) -> Option<I> {
        self.indices.get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Drop every entry the predicate selects, returning how many went.
    pub fn evict<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let before = self.indices.len();
        self.indices.retain(|k, _| !predicate(k));
        before - self.indices.len()
    }
}

impl<K: Eq + Hash, I: Clone> Default for IndexCache<K, I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_cached() {
        let mut cache: IndexCache<EdgeKey, Option<usize>> = IndexCache::new();
        cache.put(EdgeKey::new(4, 0), Some(0));
        cache.put(EdgeKey::new(4, 1), None);
        assert_eq!(cache.get(EdgeKey::new(4, 0)), Some(Some(0)));
        assert_eq!(cache.get(EdgeKey::new(4, 1)), Some(None));
        assert_eq!(cache.get(EdgeKey::new(4, 2)), None);
    }

    #[test]
    fn test_evict() {
        let mut cache = IndexCache::new();
        for origin in 0..10 {
            cache.put(EdgeKey::new(origin, 2), origin);
        }
        assert_eq!(cache.evict(|k| k.origin < 4), 4);
        assert_eq!(cache.len(), 6);
        assert_eq!(cache.get(EdgeKey::new(3, 2)), None);
        assert_eq!(cache.get(EdgeKey::new(4, 2)), Some(4));
    }
}
