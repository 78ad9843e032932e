//! TLSH digests and the TLSH distance score.
//!
//! Only the standard 128-bucket, 1-byte-checksum form is understood: 35
//! bytes, written as 70 hex characters after the `T1` version prefix.
//!
//! Parsing and scoring follow the reference TLSH library
//! (trendmicro/tlsh): the hex layout of `TlshImpl::fromTlshStr`, the
//! header terms of `TlshImpl::totalDiff` (length diff included) and the
//! bit-pair table built by `bit_pairs_diff_table` in `tlsh_util.cpp`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of body bytes (128 buckets, 2 bits each).
pub const BODY_LEN: usize = 32;

/// Hex characters in a digest without its version prefix.
pub const DIGEST_HEX_LEN: usize = 2 * (3 + BODY_LEN);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TlshError {
    #[error("expected {expected} hex characters, got {got}")]
    Length { expected: usize, got: usize },

    #[error("invalid hex character {ch:?} at offset {offset}")]
    InvalidHex { ch: char, offset: usize },
}

/// A parsed TLSH digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TlshDigest {
    checksum: u8,
    lvalue: u8,
    q1: u8,
    q2: u8,
    body: [u8; BODY_LEN]
}

/// Strip the version prefix and any surrounding whitespace from a
/// user-supplied digest.
///
/// Anything starting with `T` is assumed to carry a two character
/// version marker (`T1`).
///
/// ```
/// use hashvp::clean_hash;
/// assert_eq!(clean_hash("T1ABCD\n"), "ABCD");
/// assert_eq!(clean_hash("ABCD"), "ABCD");
/// ```
pub fn clean_hash(hash: &str) -> &str {
    let hash = hash.trim();
    if hash.starts_with('T') {
        hash.get(2..).unwrap_or("")
    } else {
        hash
    }
}

fn swap_nibbles(b: u8) -> u8 {
    b.rotate_left(4)
}

fn mod_diff(x: u8, y: u8, range: u32) -> u32 {
    let d = (i32::from(x) - i32::from(y)).unsigned_abs();
    d.min(range - d)
}

fn ratio_diff(x: u8, y: u8) -> u32 {
    match mod_diff(x, y, 16) {
        d if d <= 1 => d,
        d => (d - 1) * 12
    }
}

/// Distance between two body bytes, bucket pair by bucket pair. A
/// difference of 3 (opposite quartiles) is penalised as 6.
fn byte_diff(x: u8, y: u8) -> u32 {
    (0..8).step_by(2).map(|shift| {
        let a = (x >> shift) & 0b11;
        let b = (y >> shift) & 0b11;
        match a.abs_diff(b) {
            3 => 6,
            d => u32::from(d)
        }
    }).sum()
}

impl TlshDigest {
    /// Parse the 70 hex character body of a digest (no `T1` prefix).
    pub fn parse(hex: &str) -> Result<TlshDigest, TlshError> {
        if let Some((offset, ch)) = hex.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
            return Err(TlshError::InvalidHex { ch: ch, offset: offset });
        }
        if hex.len() != DIGEST_HEX_LEN {
            return Err(TlshError::Length { expected: DIGEST_HEX_LEN, got: hex.len() });
        }

        let bytes: Vec<u8> = hex.as_bytes().chunks(2).map(|pair| {
            let hi = (pair[0] as char).to_digit(16).unwrap_or(0) as u8;
            let lo = (pair[1] as char).to_digit(16).unwrap_or(0) as u8;
            (hi << 4) | lo
        }).collect();

        // Header bytes are written nibble-swapped, the body back to front.
        let mut body = [0u8; BODY_LEN];
        for (i, b) in body.iter_mut().enumerate() {
            *b = bytes[bytes.len() - 1 - i];
        }
        Ok(TlshDigest {
            checksum: swap_nibbles(bytes[0]),
            lvalue: swap_nibbles(bytes[1]),
            q1: bytes[2] >> 4,
            q2: bytes[2] & 0x0f,
            body: body
        })
    }

    /// The TLSH distance score, including the file length component.
    ///
    /// Zero for identical digests and symmetric, but not a true metric:
    /// the header terms grow by 12 per step past the first, which breaks
    /// the triangle inequality for nearby length and quartile values.
    pub fn diff(&self, other: &TlshDigest) -> u32 {
        let mut diff = match mod_diff(self.lvalue, other.lvalue, 256) {
            d if d <= 1 => d,
            d => d * 12
        };
        diff += ratio_diff(self.q1, other.q1);
        diff += ratio_diff(self.q2, other.q2);
        if self.checksum != other.checksum {
            diff += 1;
        }
        diff + self.body.iter().zip(other.body.iter())
            .map(|(&a, &b)| byte_diff(a, b))
            .sum::<u32>()
    }
}

impl FromStr for TlshDigest {
    type Err = TlshError;

    /// Accepts digests with or without the `T1` prefix.
    fn from_str(s: &str) -> Result<TlshDigest, TlshError> {
        TlshDigest::parse(clean_hash(s))
    }
}

impl fmt::Display for TlshDigest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "T1{:02X}{:02X}{:02X}",
               swap_nibbles(self.checksum), swap_nibbles(self.lvalue),
               (self.q1 << 4) | self.q2)?;
        for b in self.body.iter().rev() {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}
