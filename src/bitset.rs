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

use serde::{Deserialize, Serialize};

const BITS: usize = 64;

/// A fixed-length set of bits.
///
/// Used for the inside/outside classification of lattice points and for the
/// active flag of each triangle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitSet {
    len: usize,
    words: Vec<u64>,
}

impl BitSet {
    /// Create a set of `len` cleared bits.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0; (len + BITS - 1) / BITS],
        }
    }

    /// Create a set of `len` bits, all set.
    pub fn full(len: usize) -> Self {
        let mut set = Self::new(len);
        for i in 0..len {
            set.set(i, true);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read a bit. Indices past the end read as cleared.
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.words[index / BITS] & (1 << (index % BITS)) != 0
    }

    /// Write a bit, growing the set if needed.
    pub fn set(&mut self, index: usize, value: bool) {
        if index >= self.len {
            self.len = index + 1;
            self.words.resize((self.len + BITS - 1) / BITS, 0);
        }
        let mask = 1 << (index % BITS);
        if value {
            self.words[index / BITS] |= mask;
        } else {
            self.words[index / BITS] &= !mask;
        }
    }

    /// Append a bit at the end of the set.
    pub fn push(&mut self, value: bool) {
        let index = self.len;
        self.set(index, value);
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Indices of the set bits, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }

    /// Alternating run lengths, starting with a run of cleared bits (which may
    /// be zero long).
    pub fn runs(&self) -> Vec<usize> {
        let mut runs = vec![];
        let mut current = false;
        let mut count = 0;
        for i in 0..self.len {
            if self.get(i) == current {
                count += 1;
            } else {
                runs.push(count);
                count = 1;
                current = !current;
            }
        }
        runs.push(count);
        runs
    }

    /// Rebuild a set from alternating run lengths, as produced by [runs].
    ///
    /// [runs]: #method.runs
    pub fn from_runs(runs: &[usize]) -> Self {
        let len = runs.iter().sum();
        let mut set = Self::new(len);
        let mut index = 0;
        for (i, &run) in runs.iter().enumerate() {
            if i % 2 == 1 {
                for j in index..index + run {
                    set.set(j, true);
                }
            }
            index += run;
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_start_outside() {
        let mut set = BitSet::new(6);
        set.set(0, true);
        set.set(1, true);
        set.set(4, true);
        assert_eq!(set.runs(), vec![0, 2, 2, 1, 1]);
        assert_eq!(BitSet::from_runs(&set.runs()), set);
    }

    #[test]
    fn test_empty_set_has_one_run() {
        let set = BitSet::new(5);
        assert_eq!(set.runs(), vec![5]);
        assert_eq!(set.count_ones(), 0);
    }

    #[test]
    fn test_growth() {
        let mut set = BitSet::default();
        set.push(false);
        set.push(true);
        set.set(130, true);
        assert_eq!(set.len(), 131);
        assert_eq!(set.ones().collect::<Vec<_>>(), vec![1, 130]);
        assert!(!set.get(500));
    }
}
