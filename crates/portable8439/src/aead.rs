// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ChaCha20-Poly1305 AEAD (RFC 8439 Section 2.8)
//!
//! Provides authenticated encryption with associated data using:
//! - ChaCha20 for encryption (96-bit nonce, payload from block counter 1)
//! - Poly1305 for authentication (one-time key from block counter 0)
//!
//! Decryption always verifies the tag before producing a single plaintext
//! byte. All sensitive state is zeroized on drop.

use alloc::vec::Vec;

use zeroize::{Zeroize, ZeroizeOnDrop};

use portable8439_util::{constant_time_eq, u64_to_le};

use crate::chacha20::{ChaCha20, check_capacity};
use crate::consts::{BLOCK_SIZE, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use crate::error::Error;
use crate::log::{debug_event, trace_event};
use crate::poly1305::Poly1305;
use crate::traits::{AeadApi, AeadBackend};
use crate::types::{Key, Nonce, Tag};

const PAYLOAD_COUNTER: u32 = 1;

/// ChaCha20-Poly1305 AEAD with guaranteed zeroization.
///
/// Owns its scratch state so repeated calls do not rebuild it; the state is
/// wiped at the end of every call. Use one instance per thread.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct ChaCha20Poly1305 {
    chacha: ChaCha20,
    poly: Poly1305,
    poly_key: [u8; KEY_SIZE],
    expected_tag: Tag,
    len_block: [u8; BLOCK_SIZE],
}

impl ChaCha20Poly1305 {
    pub fn new() -> Self {
        Self::default()
    }

    /// MAC input: aad || pad16 || ciphertext || pad16 || le64(aad) || le64(ct)
    fn compute_tag(&mut self, aad: &[u8], ciphertext: &[u8]) {
        self.poly.init(&self.poly_key);
        self.poly.update_padded(aad);
        self.poly.update_padded(ciphertext);

        let mut aad_len = aad.len() as u64;
        let mut ct_len = ciphertext.len() as u64;
        u64_to_le(
            &mut aad_len,
            (&mut self.len_block[0..8])
                .try_into()
                .expect("infallible: len_block[0..8] is exactly 8 bytes"),
        );
        u64_to_le(
            &mut ct_len,
            (&mut self.len_block[8..16])
                .try_into()
                .expect("infallible: len_block[8..16] is exactly 8 bytes"),
        );
        self.poly.update(&self.len_block);

        self.poly.finalize_into(&mut self.expected_tag);
        self.len_block.zeroize();
    }

    /// Derives the one-time key, recomputes the tag over the received
    /// ciphertext and compares it in constant time.
    fn verify(
        &mut self,
        key: &Key,
        nonce: &Nonce,
        aad: &[u8],
        ciphertext: &[u8],
        received_tag: &[u8],
    ) -> Result<(), Error> {
        self.chacha.generate_poly_key(key, nonce, &mut self.poly_key);
        self.compute_tag(aad, ciphertext);
        self.poly_key.zeroize();

        let authentic = constant_time_eq(&self.expected_tag, received_tag);
        self.expected_tag.zeroize();

        if !authentic {
            debug_event!(
                ad_len = aad.len(),
                data_len = ciphertext.len(),
                "authentication failed"
            );
            return Err(Error::AuthenticationFailed);
        }

        Ok(())
    }

    /// Encrypts `data` in place and returns the detached tag.
    pub fn encrypt_detached(
        &mut self,
        key: &Key,
        nonce: &Nonce,
        aad: &[u8],
        data: &mut [u8],
    ) -> Result<Tag, Error> {
        trace_event!(ad_len = aad.len(), data_len = data.len(), "encrypt");
        check_capacity(PAYLOAD_COUNTER, data.len())?;

        self.chacha.generate_poly_key(key, nonce, &mut self.poly_key);
        self.chacha.crypt(key, nonce, PAYLOAD_COUNTER, data)?;
        self.compute_tag(aad, data);
        self.poly_key.zeroize();

        let tag = self.expected_tag;
        self.expected_tag.zeroize();

        Ok(tag)
    }

    /// Verifies `tag` and only then decrypts `data` in place.
    ///
    /// On any error `data` still holds the ciphertext.
    pub fn decrypt_detached(
        &mut self,
        key: &Key,
        nonce: &Nonce,
        aad: &[u8],
        data: &mut [u8],
        tag: &Tag,
    ) -> Result<(), Error> {
        trace_event!(ad_len = aad.len(), data_len = data.len(), "decrypt");
        check_capacity(PAYLOAD_COUNTER, data.len())?;

        self.verify(key, nonce, aad, data, tag)?;
        self.chacha.crypt(key, nonce, PAYLOAD_COUNTER, data)
    }

    /// Returns `ciphertext || tag`.
    pub fn encrypt_to_vec(
        &mut self,
        key: &Key,
        nonce: &Nonce,
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, Error> {
        check_capacity(PAYLOAD_COUNTER, plaintext.len())?;

        let mut output = Vec::with_capacity(plaintext.len() + TAG_SIZE);
        output.extend_from_slice(plaintext);

        let tag = self.encrypt_detached(key, nonce, aad, &mut output)?;
        output.extend_from_slice(&tag);

        Ok(output)
    }

    /// Takes `ciphertext || tag` and returns the plaintext.
    ///
    /// Nothing is allocated or decrypted unless the tag verifies.
    pub fn decrypt_to_vec(
        &mut self,
        key: &Key,
        nonce: &Nonce,
        aad: &[u8],
        input: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let (ciphertext, received_tag) = split_tag(input)?;
        trace_event!(ad_len = aad.len(), data_len = ciphertext.len(), "decrypt");
        check_capacity(PAYLOAD_COUNTER, ciphertext.len())?;

        self.verify(key, nonce, aad, ciphertext, received_tag)?;

        let mut plaintext = ciphertext.to_vec();
        self.chacha
            .crypt(key, nonce, PAYLOAD_COUNTER, &mut plaintext)?;

        Ok(plaintext)
    }

    /// Writes `ciphertext || tag` into `out` and returns the number of bytes
    /// written (`plaintext.len() + TAG_SIZE`).
    pub fn encrypt_into(
        &mut self,
        out: &mut [u8],
        key: &Key,
        nonce: &Nonce,
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<usize, Error> {
        let needed = plaintext.len() + TAG_SIZE;
        if out.len() < needed {
            debug_event!(needed, actual = out.len(), "output buffer too small");
            return Err(Error::BufferTooSmall {
                needed,
                actual: out.len(),
            });
        }
        check_capacity(PAYLOAD_COUNTER, plaintext.len())?;

        let (body, rest) = out.split_at_mut(plaintext.len());
        body.copy_from_slice(plaintext);

        let tag = self.encrypt_detached(key, nonce, aad, body)?;
        rest[..TAG_SIZE].copy_from_slice(&tag);

        Ok(needed)
    }

    /// Writes the plaintext of `ciphertext || tag` into `out` and returns its
    /// length. `out` is not touched unless the tag verifies.
    pub fn decrypt_into(
        &mut self,
        out: &mut [u8],
        key: &Key,
        nonce: &Nonce,
        aad: &[u8],
        input: &[u8],
    ) -> Result<usize, Error> {
        let (ciphertext, received_tag) = split_tag(input)?;
        if out.len() < ciphertext.len() {
            debug_event!(
                needed = ciphertext.len(),
                actual = out.len(),
                "output buffer too small"
            );
            return Err(Error::BufferTooSmall {
                needed: ciphertext.len(),
                actual: out.len(),
            });
        }
        trace_event!(ad_len = aad.len(), data_len = ciphertext.len(), "decrypt");
        check_capacity(PAYLOAD_COUNTER, ciphertext.len())?;

        self.verify(key, nonce, aad, ciphertext, received_tag)?;

        let body = &mut out[..ciphertext.len()];
        body.copy_from_slice(ciphertext);
        self.chacha.crypt(key, nonce, PAYLOAD_COUNTER, body)?;

        Ok(ciphertext.len())
    }
}

#[cfg(test)]
impl ChaCha20Poly1305 {
    pub(crate) fn is_zeroized(&self) -> bool {
        self.chacha.is_zeroized()
            && self.poly.is_zeroized()
            && portable8439_util::is_slice_zeroized(&self.poly_key)
            && portable8439_util::is_slice_zeroized(&self.expected_tag)
            && portable8439_util::is_slice_zeroized(&self.len_block)
    }
}

impl core::fmt::Debug for ChaCha20Poly1305 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ChaCha20Poly1305 {{ [protected] }}")
    }
}

impl AeadBackend for ChaCha20Poly1305 {
    type Key = Key;
    type Nonce = Nonce;
    type Tag = Tag;

    fn encrypt(
        &mut self,
        key: &Key,
        nonce: &Nonce,
        aad: &[u8],
        data: &mut [u8],
        tag: &mut Tag,
    ) -> Result<(), Error> {
        *tag = self.encrypt_detached(key, nonce, aad, data)?;
        Ok(())
    }

    fn decrypt(
        &mut self,
        key: &Key,
        nonce: &Nonce,
        aad: &[u8],
        data: &mut [u8],
        tag: &Tag,
    ) -> Result<(), Error> {
        self.decrypt_detached(key, nonce, aad, data, tag)
    }
}

impl AeadApi for ChaCha20Poly1305 {
    fn api_encrypt(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        data: &mut [u8],
        tag: &mut [u8],
    ) -> Result<(), Error> {
        let key = key_from_slice(key)?;
        let nonce = nonce_from_slice(nonce)?;
        let tag_len = tag.len();
        let tag: &mut Tag = tag
            .try_into()
            .map_err(|_| reject(Error::InvalidTagSize { actual: tag_len }))?;

        *tag = self.encrypt_detached(key, nonce, aad, data)?;
        Ok(())
    }

    fn api_decrypt(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        data: &mut [u8],
        tag: &[u8],
    ) -> Result<(), Error> {
        let key = key_from_slice(key)?;
        let nonce = nonce_from_slice(nonce)?;
        let tag_len = tag.len();
        let tag: &Tag = tag
            .try_into()
            .map_err(|_| reject(Error::InvalidTagSize { actual: tag_len }))?;

        self.decrypt_detached(key, nonce, aad, data, tag)
    }

    fn api_key_size(&self) -> usize {
        KEY_SIZE
    }

    fn api_nonce_size(&self) -> usize {
        NONCE_SIZE
    }

    fn api_tag_size(&self) -> usize {
        TAG_SIZE
    }
}

#[inline]
fn reject(err: Error) -> Error {
    debug_event!(error = %err, "rejected input");
    err
}

fn key_from_slice(key: &[u8]) -> Result<&Key, Error> {
    key.try_into()
        .map_err(|_| reject(Error::InvalidKeySize { actual: key.len() }))
}

fn nonce_from_slice(nonce: &[u8]) -> Result<&Nonce, Error> {
    nonce
        .try_into()
        .map_err(|_| reject(Error::InvalidNonceSize { actual: nonce.len() }))
}

fn split_tag(input: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    if input.len() < TAG_SIZE {
        return Err(reject(Error::CiphertextTooShort {
            actual: input.len(),
        }));
    }

    Ok(input.split_at(input.len() - TAG_SIZE))
}

/// Encrypts `plaintext` and returns `ciphertext || tag`.
///
/// # Arguments
/// - `key`: 32-byte encryption key
/// - `nonce`: 12-byte nonce, never reused under the same key
/// - `aad`: Additional authenticated data (not encrypted, but authenticated)
/// - `plaintext`: Data to encrypt
///
/// # Errors
/// [`Error::CounterOverflow`] if `plaintext` exceeds
/// [`MAX_PLAINTEXT_LEN`](crate::MAX_PLAINTEXT_LEN).
pub fn encrypt(key: &Key, nonce: &Nonce, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
    ChaCha20Poly1305::default().encrypt_to_vec(key, nonce, aad, plaintext)
}

/// Verifies and decrypts `ciphertext || tag`.
///
/// # Returns
/// - `Ok(plaintext)` if authentication succeeds
/// - `Err(Error::AuthenticationFailed)` otherwise; no plaintext is produced
/// - `Err(Error::CiphertextTooShort { .. })` if `input` is shorter than a tag
pub fn decrypt(key: &Key, nonce: &Nonce, aad: &[u8], input: &[u8]) -> Result<Vec<u8>, Error> {
    ChaCha20Poly1305::default().decrypt_to_vec(key, nonce, aad, input)
}

/// Caller-buffer variant of [`encrypt`]; see [`ChaCha20Poly1305::encrypt_into`].
pub fn encrypt_into(
    out: &mut [u8],
    key: &Key,
    nonce: &Nonce,
    aad: &[u8],
    plaintext: &[u8],
) -> Result<usize, Error> {
    ChaCha20Poly1305::default().encrypt_into(out, key, nonce, aad, plaintext)
}

/// Caller-buffer variant of [`decrypt`]; see [`ChaCha20Poly1305::decrypt_into`].
pub fn decrypt_into(
    out: &mut [u8],
    key: &Key,
    nonce: &Nonce,
    aad: &[u8],
    input: &[u8],
) -> Result<usize, Error> {
    ChaCha20Poly1305::default().decrypt_into(out, key, nonce, aad, input)
}

/// Encrypts `buffer` in place and returns the detached tag.
pub fn encrypt_in_place_detached(
    key: &Key,
    nonce: &Nonce,
    aad: &[u8],
    buffer: &mut [u8],
) -> Result<Tag, Error> {
    ChaCha20Poly1305::default().encrypt_detached(key, nonce, aad, buffer)
}

/// Verifies `tag` and decrypts `buffer` in place. On error `buffer` is unchanged.
pub fn decrypt_in_place_detached(
    key: &Key,
    nonce: &Nonce,
    aad: &[u8],
    buffer: &mut [u8],
    tag: &Tag,
) -> Result<(), Error> {
    ChaCha20Poly1305::default().decrypt_detached(key, nonce, aad, buffer, tag)
}
