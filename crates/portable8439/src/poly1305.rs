// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Poly1305 one-time authenticator (RFC 8439 Section 2.5).
//!
//! The accumulator lives in five 26-bit limbs held in `u64`, so every
//! product and sum below is exact; reduction modulo 2^130 - 5 is explicit.
//! All sensitive state is zeroized on drop.

use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(test)]
use portable8439_util::is_slice_zeroized;
use portable8439_util::u32_from_le;

use crate::consts::{BLOCK_SIZE, KEY_SIZE, TAG_SIZE};
use crate::types::Tag;

const LIMB_MASK: u64 = 0x3ffffff;

/// `r &= 0x0ffffffc0ffffffc0ffffffc0fffffff`, per 32-bit word.
const R_CLAMP: [u32; 4] = [0x0fffffff, 0x0ffffffc, 0x0ffffffc, 0x0ffffffc];

/// Work variables for block processing.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub(crate) struct Poly1305Block {
    words: [u32; 4],
    r5: [u64; 4],
    product: [u64; 5],
    tmp: [u8; 16],
    le_bytes_tmp: [u8; 4],
}

/// Work variables for finalization.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub(crate) struct Poly1305Final {
    limbs: [u64; 5],
    g: [u64; 5],
    words: [u64; 4],
    mask: u64,
}

/// Poly1305 authenticator state.
///
/// Fed incrementally with [`update`](Self::update) /
/// [`update_padded`](Self::update_padded); a trailing partial block is held
/// back until [`finalize`](Self::finalize).
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct Poly1305 {
    r: [u64; 5],
    s: [u8; 16],
    acc: [u64; 5],
    buffer: [u8; 16],
    buffer_len: usize,
    block: Poly1305Block,
    finalize: Poly1305Final,
}

/// Bits `26 * i .. 26 * i + 26` of the 128-bit little-endian value in `words`.
#[inline(always)]
fn limb(words: &[u32; 4], i: usize) -> u64 {
    let bit = 26 * i;
    let w = bit / 32;
    let hi = if w + 1 < 4 { u64::from(words[w + 1]) } else { 0 };

    ((u64::from(words[w]) | (hi << 32)) >> (bit % 32)) & LIMB_MASK
}

/// One carry pass over the limbs. Bits at or above 2^130 wrap into limb 0
/// times 5, since 2^130 = 5 (mod p).
#[inline(always)]
fn propagate_carries(limbs: &mut [u64; 5]) {
    for i in 0..4 {
        limbs[i + 1] += limbs[i] >> 26;
        limbs[i] &= LIMB_MASK;
    }
    limbs[0] += (limbs[4] >> 26) * 5;
    limbs[4] &= LIMB_MASK;
}

impl Poly1305 {
    /// Creates an authenticator for one message under `key`.
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        let mut state = Self::default();
        state.init(key);
        state
    }

    /// Resets the state and loads a fresh one-time key.
    pub(crate) fn init(&mut self, key: &[u8; KEY_SIZE]) {
        self.zeroize();
        self.load_r(&key[0..16]);
        self.s.copy_from_slice(&key[16..32]);
    }

    /// Reads `block.tmp` as four little-endian words into `block.words`.
    fn load_words(&mut self) {
        for i in 0..4 {
            self.block
                .le_bytes_tmp
                .copy_from_slice(&self.block.tmp[i * 4..i * 4 + 4]);
            u32_from_le(&mut self.block.words[i], &mut self.block.le_bytes_tmp);
        }
    }

    fn load_r(&mut self, r_bytes: &[u8]) {
        self.block.tmp.copy_from_slice(r_bytes);
        self.load_words();

        for i in 0..4 {
            self.block.words[i] &= R_CLAMP[i];
        }
        for i in 0..5 {
            self.r[i] = limb(&self.block.words, i);
        }

        self.block.zeroize();
    }

    fn process_block(&mut self, block: &[u8], hibit: u64) {
        self.block.tmp.copy_from_slice(block);
        self.process_block_from_tmp(hibit);
    }

    /// acc = (acc + block + hibit * 2^128) * r mod 2^130 - 5
    fn process_block_from_tmp(&mut self, hibit: u64) {
        self.load_words();
        for i in 0..5 {
            self.acc[i] += limb(&self.block.words, i);
        }
        self.acc[4] += hibit << 24;

        for i in 0..4 {
            self.block.r5[i] = self.r[i + 1] * 5;
        }

        // Schoolbook product; terms landing at limb 5 or above use r * 5.
        for i in 0..5 {
            self.block.product[i] = 0;
            for j in 0..5 {
                self.block.product[i] += self.acc[j]
                    * if j <= i {
                        self.r[i - j]
                    } else {
                        self.block.r5[4 + i - j]
                    };
            }
        }

        propagate_carries(&mut self.block.product);
        // Limb 0 may exceed 26 bits after the fold; keep it small for the
        // next multiplication.
        self.block.product[1] += self.block.product[0] >> 26;
        self.block.product[0] &= LIMB_MASK;

        self.acc.copy_from_slice(&self.block.product);

        self.block.zeroize();
    }

    /// Absorbs `data`. Full blocks are processed immediately; a trailing
    /// partial block is buffered.
    pub fn update(&mut self, data: &[u8]) {
        let mut pos = 0;

        if self.buffer_len > 0 {
            let need = BLOCK_SIZE - self.buffer_len;
            let take = core::cmp::min(need, data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            pos = take;

            if self.buffer_len == BLOCK_SIZE {
                self.block.tmp.copy_from_slice(&self.buffer);
                self.buffer.zeroize();
                self.buffer_len = 0;
                self.process_block_from_tmp(1);
            }
        }

        while pos + BLOCK_SIZE <= data.len() {
            self.process_block(&data[pos..pos + BLOCK_SIZE], 1);
            pos += BLOCK_SIZE;
        }

        if pos < data.len() {
            let remaining = data.len() - pos;
            self.buffer[..remaining].copy_from_slice(&data[pos..]);
            self.buffer_len = remaining;
        }
    }

    /// Absorbs `data`, then zero-fills the stream up to the next 16-byte
    /// boundary (RFC 8439 Section 2.8 `pad16`). Nothing is added when the
    /// stream is already aligned.
    pub fn update_padded(&mut self, data: &[u8]) {
        self.update(data);
        if self.buffer_len > 0 {
            self.buffer[self.buffer_len..].fill(0);
            self.block.tmp.copy_from_slice(&self.buffer);
            self.buffer.zeroize();
            self.buffer_len = 0;
            self.process_block_from_tmp(1);
        }
    }

    /// Writes the tag and wipes the whole state, leaving it ready for `init`.
    pub(crate) fn finalize_into(&mut self, output: &mut Tag) {
        // A short final block carries its own 0x01 marker instead of the
        // 2^128 hibit.
        if self.buffer_len > 0 {
            self.buffer[self.buffer_len..].fill(0);
            self.buffer[self.buffer_len] = 0x01;
            self.block.tmp.copy_from_slice(&self.buffer);
            self.buffer.zeroize();
            self.buffer_len = 0;
            self.process_block_from_tmp(0);
        }

        // After the second pass every limb is below 2^26.
        self.finalize.limbs.copy_from_slice(&self.acc);
        propagate_carries(&mut self.finalize.limbs);
        propagate_carries(&mut self.finalize.limbs);

        // g = h + 5 carries out of 2^130 exactly when h >= p, and then
        // g - 2^130 = h - p.
        self.finalize.g[0] = self.finalize.limbs[0] + 5;
        for i in 1..5 {
            self.finalize.g[i] = self.finalize.limbs[i] + (self.finalize.g[i - 1] >> 26);
            self.finalize.g[i - 1] &= LIMB_MASK;
        }

        // all 1s: keep h; all 0s: take g
        self.finalize.mask = (self.finalize.g[4] >> 26).wrapping_sub(1);
        self.finalize.g[4] &= LIMB_MASK;

        for i in 0..5 {
            self.finalize.limbs[i] = (self.finalize.limbs[i] & self.finalize.mask)
                | (self.finalize.g[i] & !self.finalize.mask);
        }

        // Radix 2^26 to four 32-bit words; bits 128 and 129 drop out.
        for i in 0..4 {
            self.finalize.words[i] = ((self.finalize.limbs[i] >> (6 * i))
                | (self.finalize.limbs[i + 1] << (26 - 6 * i)))
                & 0xffff_ffff;
        }

        // + s mod 2^128
        for i in 0..4 {
            self.block
                .le_bytes_tmp
                .copy_from_slice(&self.s[i * 4..i * 4 + 4]);
            u32_from_le(&mut self.block.words[i], &mut self.block.le_bytes_tmp);

            self.finalize.words[i] += u64::from(self.block.words[i]);
            if i < 3 {
                self.finalize.words[i + 1] += self.finalize.words[i] >> 32;
            }
            self.finalize.words[i] &= 0xffff_ffff;
        }

        for i in 0..4 {
            output[i * 4..i * 4 + 4]
                .copy_from_slice(&(self.finalize.words[i] as u32).to_le_bytes());
        }

        self.zeroize();
    }

    /// Consumes the authenticator and returns the tag.
    pub fn finalize(mut self) -> Tag {
        let mut tag = [0u8; TAG_SIZE];
        self.finalize_into(&mut tag);
        tag
    }
}

#[cfg(test)]
impl Poly1305Block {
    pub(crate) fn is_zeroized(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
            && self.r5.iter().all(|&w| w == 0)
            && self.product.iter().all(|&w| w == 0)
            && is_slice_zeroized(&self.tmp)
            && is_slice_zeroized(&self.le_bytes_tmp)
    }
}

#[cfg(test)]
impl Poly1305Final {
    pub(crate) fn is_zeroized(&self) -> bool {
        self.limbs.iter().all(|&w| w == 0)
            && self.g.iter().all(|&w| w == 0)
            && self.words.iter().all(|&w| w == 0)
            && self.mask == 0
    }
}

#[cfg(test)]
impl Poly1305 {
    pub(crate) fn is_zeroized(&self) -> bool {
        self.r.iter().all(|&w| w == 0)
            && is_slice_zeroized(&self.s)
            && self.acc.iter().all(|&w| w == 0)
            && is_slice_zeroized(&self.buffer)
            && self.buffer_len == 0
            && self.block.is_zeroized()
            && self.finalize.is_zeroized()
    }
}

impl core::fmt::Debug for Poly1305 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Poly1305 {{ [protected] }}")
    }
}

/// Computes the Poly1305 tag of `message` under a one-time key.
///
/// The key must never authenticate more than one message.
pub fn poly1305_tag(one_time_key: &[u8; KEY_SIZE], message: &[u8]) -> Tag {
    let mut mac = Poly1305::new(one_time_key);
    mac.update(message);
    mac.finalize()
}
