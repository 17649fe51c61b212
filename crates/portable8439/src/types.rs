// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Type aliases for AEAD.

use super::consts::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};

/// AEAD key type
pub type Key = [u8; KEY_SIZE];

/// ChaCha20 nonce type
pub type Nonce = [u8; NONCE_SIZE];

/// Poly1305 tag type
pub type Tag = [u8; TAG_SIZE];
