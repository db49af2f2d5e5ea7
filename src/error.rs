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

//! Error types for surface generation and the compact volumetric format.

use thiserror::Error;

/// Errors raised while building lattices, generating surfaces, or exporting
/// meshes.
#[derive(Error, Debug)]
pub enum Error {
    /// The value array does not have one entry per lattice point.
    #[error("lattice counts {counts:?} require {expected} values, found {found}")]
    DimensionMismatch {
        counts: [usize; 3],
        expected: usize,
        found: usize,
    },

    /// The lattice cannot carry a surface (zero counts, dependent basis).
    #[error("degenerate lattice: {0}")]
    DegenerateGeometry(String),

    /// The plane has a zero normal or is parallel to every lattice axis.
    #[error("invalid plane: {0}")]
    InvalidPlane(String),

    /// A per-request table grew past its configured limit. Retrying with a
    /// coarser lattice or a larger limit may succeed.
    #[error("{what} exceeded the limit of {limit}")]
    CapacityExceeded { what: &'static str, limit: usize },

    /// The caller asked for the traversal to stop. Partial mesh state has
    /// been discarded.
    #[error("surface generation was cancelled")]
    Cancelled,

    /// No exporter is registered under the given tag.
    #[error("unknown export format {0:?}")]
    UnknownFormat(String),

    /// A compact volumetric stream could not be written or read.
    #[error(transparent)]
    Cvf(#[from] CvfError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors specific to encoding and decoding compact volumetric streams.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CvfError {
    /// A header or definition line is missing fields or disagrees with itself.
    #[error("malformed header at line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },

    /// A section's declared size disagrees with what the payload holds.
    #[error("{section} expected {expected} entries, found {found}")]
    PayloadMismatch {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    /// The mesh or options cannot be represented in the format.
    #[error("cannot encode: {0}")]
    InvalidEncoding(String),

    /// The stream ended before the named section was complete.
    #[error("unexpected end of stream while reading {0}")]
    UnexpectedEof(&'static str),

    /// The stream describes more than the decoder is allowed to allocate.
    #[error("{what} exceeded the decode limit of {limit}")]
    CapacityExceeded { what: &'static str, limit: usize },
}

/// Result type for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = Error::CapacityExceeded {
            what: "edge crossings",
            limit: 16,
        };
        assert_eq!(e.to_string(), "edge crossings exceeded the limit of 16");

        let e: Error = CvfError::UnexpectedEof("run lengths").into();
        assert_eq!(
            e.to_string(),
            "unexpected end of stream while reading run lengths"
        );
    }
}
