// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! AEAD trait definitions.

use crate::Error;

/// Authenticated Encryption with Associated Data (AEAD) backend trait.
///
/// Typed, in-place interface with a detached tag. Nonce generation is left to
/// the caller.
pub trait AeadBackend {
    type Key;
    type Nonce;
    type Tag;

    /// Encrypt plaintext in-place and write authentication tag.
    fn encrypt(
        &mut self,
        key: &Self::Key,
        nonce: &Self::Nonce,
        aad: &[u8],
        data: &mut [u8],
        tag: &mut Self::Tag,
    ) -> Result<(), Error>;

    /// Decrypt ciphertext in-place after verifying authentication tag.
    ///
    /// On failure `data` still holds the ciphertext.
    fn decrypt(
        &mut self,
        key: &Self::Key,
        nonce: &Self::Nonce,
        aad: &[u8],
        data: &mut [u8],
        tag: &Self::Tag,
    ) -> Result<(), Error>;
}

/// Object-safe AEAD API over untyped byte slices.
///
/// Sizes are validated before any cryptographic work, so a wrong-length key,
/// nonce or tag surfaces as a configuration error rather than a panic.
pub trait AeadApi {
    fn api_encrypt(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        data: &mut [u8],
        tag: &mut [u8],
    ) -> Result<(), Error>;

    fn api_decrypt(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        data: &mut [u8],
        tag: &[u8],
    ) -> Result<(), Error>;

    fn api_key_size(&self) -> usize;
    fn api_nonce_size(&self) -> usize;
    fn api_tag_size(&self) -> usize;
}
