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


//! Run compression for payload lines: `X~n ` stands for `n` more copies of
//! `X`.

use crate::error::CvfError;

const MARKER: char = '~';
const MIN_RUN: usize = 4;

pub fn compress(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    let mut chars = data.chars().peekable();
    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        if run >= MIN_RUN {
            out.push(c);
            out.push(MARKER);
            out.push_str(&(run - 1).to_string());
            out.push(' ');
        } else {
            for _ in 0..run {
                out.push(c);
            }
        }
    }
    out
}

/// Expand a compressed payload, refusing to grow past `max_len` characters.
pub fn decompress(data: &str, max_len: usize) -> Result<String, CvfError> {
    let too_long = || CvfError::CapacityExceeded {
        what: "payload characters",
        limit: max_len,
    };
    if !data.contains(MARKER) {
        if data.chars().count() > max_len {
            return Err(too_long());
        }
        return Ok(data.to_string());
    }
    let mut out = String::with_capacity(data.len().min(max_len));
    let mut len = 0usize;
    let mut chars = data.chars();
    let mut last = None;
    while let Some(c) = chars.next() {
        if c != MARKER {
            len += 1;
            if len > max_len {
                return Err(too_long());
            }
            out.push(c);
            last = Some(c);
            continue;
        }
        let repeated = last.ok_or_else(|| {
            CvfError::InvalidEncoding("run marker with nothing to repeat".into())
        })?;
        let count: String = chars.by_ref().take_while(|&d| d != ' ').collect();
        let count: usize = count
            .parse()
            .map_err(|_| CvfError::InvalidEncoding(format!("bad run length {:?}", count)))?;
        len = match len.checked_add(count) {
            Some(len) if len <= max_len => len,
            _ => return Err(too_long()),
        };
        out.extend(std::iter::repeat(repeated).take(count));
        last = None;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_runs_stay_literal() {
        assert_eq!(compress("aaabbc"), "aaabbc");
        assert_eq!(compress(""), "");
    }

    #[test]
    fn test_long_runs() {
        assert_eq!(compress("xaaaaaay"), "xa~5 y");
        assert_eq!(decompress("xa~5 y", 8).unwrap(), "xaaaaaay");
        assert_eq!(compress("5555"), "5~3 ");
        assert_eq!(decompress("5~3 ", 4).unwrap(), "5555");
    }

    #[test]
    fn test_malformed_runs() {
        assert!(decompress("~3 ", 16).is_err());
        assert!(decompress("a~x ", 16).is_err());
        assert!(decompress("a~3 ~2 ", 16).is_err());
    }

    #[test]
    fn test_expansion_is_capped() {
        assert_eq!(
            decompress("P~99999999999 ", 3),
            Err(CvfError::CapacityExceeded {
                what: "payload characters",
                limit: 3
            })
        );
        assert!(decompress("P~18446744073709551615 ", usize::MAX).is_err());
        assert!(decompress("abcd", 3).is_err());
        assert!(decompress("ab~1 c", 3).is_err());
        assert_eq!(decompress("ab~1 ", 3).unwrap(), "abb");
    }
}
