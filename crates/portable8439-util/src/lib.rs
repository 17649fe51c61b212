// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Byte-level helpers shared by the portable8439 primitives.
//!
//! Conversion functions zeroize their source after reading so that key words
//! and keystream words do not linger in temporaries.

#![cfg_attr(not(test), no_std)]

#[cfg(any(test, feature = "test-utils"))]
extern crate alloc;

#[cfg(any(test, feature = "test-utils"))]
use alloc::vec::Vec;

#[cfg(test)]
mod tests;

/// Compares two byte strings without an early exit.
///
/// Every byte pair is visited and the XOR differences are OR-accumulated,
/// so the running time depends only on the slice lengths, never on where the
/// first difference sits. Lengths are public and may short-circuit.
///
/// # Example
///
/// ```
/// use portable8439_util::constant_time_eq;
///
/// let expected = [0x1a; 16];
/// let mut received = expected;
/// assert!(constant_time_eq(&expected, &received));
///
/// received[15] ^= 1;
/// assert!(!constant_time_eq(&expected, &received));
/// ```
#[inline(never)]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let diff = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| core::hint::black_box(acc | (x ^ y)));

    // Fold the accumulator to a single bit without branching on it.
    let diff = core::hint::black_box(diff) as u32;
    (diff.wrapping_sub(1) >> 31) == 1
}

/// Defines a load/store pair for one little-endian word type. Each side
/// wipes its source once the value has moved.
macro_rules! le_word_codec {
    ($word:ty, $len:literal, $load:ident, $store:ident) => {
        #[doc = concat!("Loads a `", stringify!($word), "` from ", stringify!($len), " little-endian bytes, then wipes the bytes.")]
        ///
        /// Bytes are shifted in one at a time and cleared as they are read,
        /// so no second copy of the word is left behind.
        #[inline(always)]
        pub fn $load(dst: &mut $word, bytes: &mut [u8; $len]) {
            *dst = 0;
            for shift in 0..$len {
                *dst |= <$word>::from(bytes[shift]) << (8 * shift);
                bytes[shift] = 0;
            }
        }

        #[doc = concat!("Stores a `", stringify!($word), "` as ", stringify!($len), " little-endian bytes, then wipes the word.")]
        #[inline(always)]
        pub fn $store(src: &mut $word, bytes: &mut [u8; $len]) {
            for shift in 0..$len {
                bytes[shift] = (*src >> (8 * shift)) as u8;
            }
            *src = 0;
        }
    };
}

le_word_codec!(u32, 4, u32_from_le, u32_to_le);
le_word_codec!(u64, 8, u64_from_le, u64_to_le);

/// `true` if every byte is zero.
///
/// ```
/// use portable8439_util::is_slice_zeroized;
///
/// assert!(is_slice_zeroized(&[0u8; 32]));
/// assert!(!is_slice_zeroized(&[0, 0, 0x80]));
/// ```
#[inline(always)]
pub fn is_slice_zeroized(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

/// Decodes a hex string, skipping whitespace so RFC test vectors can be
/// pasted as printed.
///
/// # Panics
///
/// Panics on invalid hex characters or an odd number of digits. Test-only.
///
/// # Example
///
/// ```
/// use portable8439_util::hex_to_bytes;
///
/// let bytes = hex_to_bytes("de ad be ef");
/// assert_eq!(bytes, vec![0xde, 0xad, 0xbe, 0xef]);
/// ```
#[cfg(any(test, feature = "test-utils"))]
pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    assert!(digits.len() % 2 == 0, "odd number of hex digits");

    digits
        .chunks(2)
        .map(|pair| {
            let pair = core::str::from_utf8(pair).expect("hex digits are ASCII");
            u8::from_str_radix(pair, 16).expect("valid hex")
        })
        .collect()
}
