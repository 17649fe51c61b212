// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Sizes fixed by RFC 8439.

/// Key size in bytes
pub const KEY_SIZE: usize = 32;

/// Nonce size in bytes (IETF ChaCha20, 96-bit)
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Block size in bytes (Poly1305 and padding)
pub const BLOCK_SIZE: usize = 16;

/// ChaCha20 keystream block size in bytes
pub const CHACHA20_BLOCK_SIZE: usize = 64;

/// Largest payload one (key, nonce) pair can carry: block counter 1 through
/// `u32::MAX`, 64 bytes each.
pub const MAX_PLAINTEXT_LEN: u64 = (u32::MAX as u64) * CHACHA20_BLOCK_SIZE as u64;

pub(crate) const CHACHA20_CONSTANTS: [u32; 4] = [0x61707865, 0x3320646e, 0x79622d32, 0x6b206574];
