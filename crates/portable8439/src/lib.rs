// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Portable RFC 8439 ChaCha20-Poly1305.
//!
//! Pure-Rust ChaCha20 keystream, Poly1305 MAC and the AEAD that composes
//! them. Every call is self-contained: scratch state is created, used and
//! zeroized within the call, and tags are compared in constant time.
//!
//! ```
//! let key = [0x42u8; portable8439::KEY_SIZE];
//! let nonce = [0x24u8; portable8439::NONCE_SIZE];
//!
//! let sealed = portable8439::encrypt(&key, &nonce, b"header", b"payload").unwrap();
//! let opened = portable8439::decrypt(&key, &nonce, b"header", &sealed).unwrap();
//!
//! assert_eq!(opened, b"payload");
//! ```
//!
//! The caller must never reuse a nonce under the same key.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

#[cfg(test)]
mod tests;

mod aead;
mod chacha20;
mod consts;
mod error;
mod log;
mod poly1305;
mod traits;
mod types;

pub use aead::{
    ChaCha20Poly1305, decrypt, decrypt_in_place_detached, decrypt_into, encrypt,
    encrypt_in_place_detached, encrypt_into,
};
pub use chacha20::{chacha20_apply, chacha20_block, poly1305_key_gen};
pub use consts::{BLOCK_SIZE, CHACHA20_BLOCK_SIZE, KEY_SIZE, MAX_PLAINTEXT_LEN, NONCE_SIZE, TAG_SIZE};
pub use error::{Error, ErrorKind};
pub use poly1305::{Poly1305, poly1305_tag};
pub use traits::{AeadApi, AeadBackend};
pub use types::{Key, Nonce, Tag};
