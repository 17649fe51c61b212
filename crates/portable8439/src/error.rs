// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! AEAD error types.

use crate::consts::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong key, nonce, tag or buffer size. Raised before any cryptographic work.
    Configuration,
    /// The request needs more keystream than the 32-bit block counter addresses.
    Capacity,
    /// Tag mismatch on decryption.
    Authentication,
}

/// Errors that can occur during ChaCha20-Poly1305 operations.
///
/// Messages carry public lengths only, never key, nonce, tag or data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid key size: expected {expected} bytes, got {actual}", expected = KEY_SIZE)]
    InvalidKeySize { actual: usize },

    #[error("invalid nonce size: expected {expected} bytes, got {actual}", expected = NONCE_SIZE)]
    InvalidNonceSize { actual: usize },

    #[error("invalid tag size: expected {expected} bytes, got {actual}", expected = TAG_SIZE)]
    InvalidTagSize { actual: usize },

    #[error(
        "ciphertext too short: expected at least {expected} bytes, got {actual}",
        expected = TAG_SIZE
    )]
    CiphertextTooShort { actual: usize },

    #[error("output buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("block counter overflow: {blocks} blocks requested from counter {initial_counter}")]
    CounterOverflow { initial_counter: u32, blocks: u64 },

    #[error("authentication failed: tag mismatch")]
    AuthenticationFailed,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidKeySize { .. }
            | Error::InvalidNonceSize { .. }
            | Error::InvalidTagSize { .. }
            | Error::CiphertextTooShort { .. }
            | Error::BufferTooSmall { .. } => ErrorKind::Configuration,
            Error::CounterOverflow { .. } => ErrorKind::Capacity,
            Error::AuthenticationFailed => ErrorKind::Authentication,
        }
    }

    /// Only an authentication failure is expected in normal operation; the
    /// caller drops the message and carries on.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}
