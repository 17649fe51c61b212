// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ChaCha20 keystream (RFC 8439 Section 2.3 and 2.4).
//!
//! 32-bit block counter, 96-bit nonce. Requests that would run the counter
//! past `u32::MAX` are refused up front.

use zeroize::{Zeroize, ZeroizeOnDrop};

use portable8439_util::{u32_from_le, u32_to_le};

use crate::consts::{CHACHA20_BLOCK_SIZE, CHACHA20_CONSTANTS, KEY_SIZE};
use crate::error::Error;
use crate::log::debug_event;
use crate::types::{Key, Nonce};

/// Column rounds, then diagonal rounds, as state indices `[a, b, c, d]`.
const DOUBLE_ROUND: [[usize; 4]; 8] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

#[inline(always)]
fn quarter_round(x: &mut [u32; 16], [a, b, c, d]: [usize; 4]) {
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(16);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(12);
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(8);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(7);
}

/// Keystream generator state. Wiped after every call and on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct ChaCha20 {
    initial: [u32; 16],
    working: [u32; 16],
    le_bytes_tmp: [u8; 4],
    keystream: [u8; CHACHA20_BLOCK_SIZE],
}

impl Default for ChaCha20 {
    fn default() -> Self {
        Self {
            initial: [0; 16],
            working: [0; 16],
            le_bytes_tmp: [0; 4],
            keystream: [0; CHACHA20_BLOCK_SIZE],
        }
    }
}

impl ChaCha20 {
    /// Lays out constants, key, counter and nonce (RFC 8439 Section 2.3).
    fn init_state(&mut self, key: &Key, nonce: &Nonce, counter: u32) {
        self.initial[..4].copy_from_slice(&CHACHA20_CONSTANTS);

        for (i, word) in key.chunks_exact(4).enumerate() {
            self.le_bytes_tmp.copy_from_slice(word);
            u32_from_le(&mut self.initial[4 + i], &mut self.le_bytes_tmp);
        }

        self.initial[12] = counter;

        for (i, word) in nonce.chunks_exact(4).enumerate() {
            self.le_bytes_tmp.copy_from_slice(word);
            u32_from_le(&mut self.initial[13 + i], &mut self.le_bytes_tmp);
        }
    }

    /// Runs the block function over `self.initial` into `self.keystream`.
    /// `self.initial` is left intact so the caller can bump the counter.
    fn compute_block(&mut self) {
        self.working = self.initial;

        for _ in 0..10 {
            for indices in DOUBLE_ROUND {
                quarter_round(&mut self.working, indices);
            }
        }

        for (i, out) in self.keystream.chunks_exact_mut(4).enumerate() {
            self.working[i] = self.working[i].wrapping_add(self.initial[i]);
            u32_to_le(
                &mut self.working[i],
                out.try_into()
                    .expect("infallible: chunks_exact_mut(4) yields 4-byte chunks"),
            );
        }
    }

    pub fn block(
        &mut self,
        key: &Key,
        nonce: &Nonce,
        counter: u32,
        output: &mut [u8; CHACHA20_BLOCK_SIZE],
    ) {
        self.init_state(key, nonce, counter);
        self.compute_block();
        output.copy_from_slice(&self.keystream);

        self.zeroize();
    }

    /// RFC 8439 Section 2.6: the Poly1305 one-time key is the first half of
    /// the counter-0 block.
    pub fn generate_poly_key(&mut self, key: &Key, nonce: &Nonce, output: &mut [u8; KEY_SIZE]) {
        self.init_state(key, nonce, 0);
        self.compute_block();
        output.copy_from_slice(&self.keystream[..KEY_SIZE]);

        self.zeroize();
    }

    /// XORs `data` in place with the keystream starting at `counter`.
    ///
    /// Capacity is checked before the first block is produced; on error
    /// `data` is untouched.
    pub fn crypt(
        &mut self,
        key: &Key,
        nonce: &Nonce,
        counter: u32,
        data: &mut [u8],
    ) -> Result<(), Error> {
        check_capacity(counter, data.len())?;

        if data.is_empty() {
            return Ok(());
        }

        self.init_state(key, nonce, counter);

        for chunk in data.chunks_mut(CHACHA20_BLOCK_SIZE) {
            self.compute_block();

            chunk
                .iter_mut()
                .zip(&self.keystream)
                .for_each(|(byte, ks)| *byte ^= ks);

            // Cannot wrap: check_capacity bounds the number of chunks. The
            // increment after the final block is discarded with the state.
            self.initial[12] = self.initial[12].wrapping_add(1);
        }

        self.zeroize();

        Ok(())
    }
}

#[cfg(test)]
impl ChaCha20 {
    pub(crate) fn is_zeroized(&self) -> bool {
        self.initial.iter().all(|&w| w == 0)
            && self.working.iter().all(|&w| w == 0)
            && portable8439_util::is_slice_zeroized(&self.le_bytes_tmp)
            && portable8439_util::is_slice_zeroized(&self.keystream)
    }
}

impl core::fmt::Debug for ChaCha20 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ChaCha20 {{ [protected] }}")
    }
}

/// Number of 64-byte blocks needed for `len` bytes.
#[inline]
pub(crate) fn blocks_for(len: usize) -> u64 {
    (len as u64).div_ceil(CHACHA20_BLOCK_SIZE as u64)
}

/// Rejects requests whose last block index would not fit the 32-bit counter.
pub(crate) fn check_capacity(initial_counter: u32, len: usize) -> Result<(), Error> {
    let blocks = blocks_for(len);
    let available = u64::from(u32::MAX) - u64::from(initial_counter) + 1;

    if blocks > available {
        debug_event!(initial_counter, blocks, "keystream request exceeds block counter");
        return Err(Error::CounterOverflow {
            initial_counter,
            blocks,
        });
    }

    Ok(())
}

/// Produces one 64-byte keystream block for `(key, nonce, counter)`.
pub fn chacha20_block(key: &Key, nonce: &Nonce, counter: u32) -> [u8; CHACHA20_BLOCK_SIZE] {
    let mut output = [0u8; CHACHA20_BLOCK_SIZE];
    ChaCha20::default().block(key, nonce, counter, &mut output);
    output
}

/// XORs `data` in place with the keystream starting at `initial_counter`.
///
/// Applying it twice with the same arguments restores the input.
///
/// # Errors
///
/// [`Error::CounterOverflow`] if `data` needs a block index above
/// `u32::MAX`. `data` is left untouched in that case.
pub fn chacha20_apply(
    key: &Key,
    nonce: &Nonce,
    initial_counter: u32,
    data: &mut [u8],
) -> Result<(), Error> {
    ChaCha20::default().crypt(key, nonce, initial_counter, data)
}

/// Derives the Poly1305 one-time key for `(key, nonce)` (RFC 8439 Section 2.6).
pub fn poly1305_key_gen(key: &Key, nonce: &Nonce) -> [u8; KEY_SIZE] {
    let mut output = [0u8; KEY_SIZE];
    ChaCha20::default().generate_poly_key(key, nonce, &mut output);
    output
}
