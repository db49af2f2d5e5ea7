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


//! Quantisation of fractions onto a band of printable characters.

use crate::error::CvfError;

/// The character the band must not contain, and what replaces it on output.
const ESCAPED: u32 = b'\\' as u32;
const ESCAPE: char = '!';

/// Lowest usable band start: everything at or below the escape is reserved.
pub const MIN_BASE: u32 = ESCAPE as u32 + 1;
/// Highest usable band end. `~` marks compressed runs.
pub const MAX_CHAR: u32 = b'}' as u32;

/// Fractions above this land in the last bin rather than on the sentinel.
const MAX_FRACTION: f32 = 0.9999;

/// A band of `range` bins starting at character `base`. The character
/// `base + range` stands for "no value".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CharBand {
    base: u32,
    range: u32,
}

impl CharBand {
    pub fn new(base: u32, range: u32) -> Result<Self, CvfError> {
        if range == 0 || base < MIN_BASE || base + range > MAX_CHAR {
            return Err(CvfError::InvalidEncoding(format!(
                "character band {}+{} must lie within {}..={}",
                base, range, MIN_BASE, MAX_CHAR
            )));
        }
        Ok(Self { base, range })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn nan_char(&self) -> char {
        to_char(self.base + self.range)
    }

    /// Quantise a fraction in `[0, 1]`. NaN maps to the sentinel.
    pub fn encode(&self, fraction: f32) -> char {
        if fraction.is_nan() {
            return self.nan_char();
        }
        let f = fraction.max(0.0).min(MAX_FRACTION);
        let code = self.base + (f * self.range as f32).floor() as u32;
        if code == ESCAPED {
            ESCAPE
        } else {
            to_char(code)
        }
    }

    /// The fraction a character stands for, `offset` of the way into its bin.
    fn bin(&self, c: char, offset: f32) -> f32 {
        let mut code = c as u32;
        if code < self.base {
            code = ESCAPED;
        }
        if code >= self.base + self.range {
            return std::f32::NAN;
        }
        (code - self.base) as f32 / self.range as f32 + offset / self.range as f32
    }

    /// Decode to the centre of the character's bin.
    pub fn decode(&self, c: char) -> f32 {
        self.bin(c, 0.5)
    }

    /// Quantise to two characters: the bin, then the position within it.
    pub fn encode_double(&self, fraction: f32) -> (char, char) {
        if fraction.is_nan() {
            return (self.nan_char(), self.nan_char());
        }
        let first = self.encode(fraction);
        let remainder = (fraction.max(0.0).min(MAX_FRACTION) - self.bin(first, 0.0)) * self.range as f32;
        (first, self.encode(remainder))
    }

    pub fn decode_double(&self, first: char, second: char) -> f32 {
        let coarse = self.bin(first, 0.0);
        if coarse.is_nan() {
            return coarse;
        }
        let fine = self.decode(second);
        if fine.is_nan() {
            return fine;
        }
        coarse + fine / self.range as f32
    }
}

fn to_char(code: u32) -> char {
    std::char::from_u32(code).unwrap_or(ESCAPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> CharBand {
        CharBand::new(35, 90).unwrap()
    }

    #[test]
    fn test_band_limits() {
        assert!(CharBand::new(33, 10).is_err());
        assert!(CharBand::new(35, 91).is_err());
        assert!(CharBand::new(35, 0).is_err());
        assert!(CharBand::new(34, 91).is_ok());
    }

    #[test]
    fn test_quantisation() {
        let band = band();
        assert_eq!(band.encode(0.0), '#');
        assert_eq!(band.encode(1.0), '|');
        assert_eq!(band.encode(-3.0), '#');
        assert_eq!(band.encode(std::f32::NAN), '}');
        assert!(band.decode('}').is_nan());
    }

    #[test]
    fn test_escape() {
        let band = band();
        // 57 / 90 lands on the backslash
        let f = 57.2 / 90.0;
        assert_eq!(band.encode(f), '!');
        assert!((band.decode('!') - 57.5 / 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_error_bounds() {
        let band = CharBand::new(35, 89).unwrap();
        for i in 0..=1000 {
            let f = i as f32 / 1000.0;
            assert!((band.decode(band.encode(f)) - f).abs() <= 1.0 / 89.0);
            let (a, b) = band.encode_double(f);
            assert!((band.decode_double(a, b) - f).abs() <= 1.0 / (89.0 * 89.0));
        }
    }

    #[test]
    fn test_requantisation_is_stable() {
        let band = band();
        for code in 35..125u32 {
            let c = std::char::from_u32(code).unwrap();
            let c = if code == 92 { '!' } else { c };
            assert_eq!(band.encode(band.decode(c)), c);
        }
    }
}
