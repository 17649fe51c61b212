// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ChaCha20 tests using RFC 8439 Sections 2.3.2, 2.4.2, 2.6.2 and A.1.

use portable8439_util::hex_to_bytes;

use crate::chacha20::{ChaCha20, blocks_for, check_capacity};
use crate::consts::{CHACHA20_BLOCK_SIZE, MAX_PLAINTEXT_LEN};
use crate::error::Error;
use crate::{chacha20_apply, chacha20_block, poly1305_key_gen};

const SUNSCREEN: &[u8] = b"Ladies and Gentlemen of the class of '99: If I could offer you only one tip for the future, sunscreen would be it.";

fn sequential_key(start: u8) -> [u8; 32] {
    core::array::from_fn(|i| start + i as u8)
}

#[test]
fn test_chacha20_default_is_zeroized() {
    let chacha = ChaCha20::default();
    assert!(chacha.is_zeroized());
}

#[test]
fn test_chacha20_debug_is_protected() {
    let chacha = ChaCha20::default();
    assert_eq!(format!("{:?}", chacha), "ChaCha20 { [protected] }");
}

/// RFC 8439 Appendix A.1, test vector #1
#[test]
fn test_block_all_zero_counter_0() {
    let expected = hex_to_bytes(
        "76b8e0ada0f13d90405d6ae55386bd28bdd219b8a08ded1aa836efcc8b770dc7\
         da41597c5157488d7724e03fb8d84a376a43b8f41518a11cc387b669b2ee6586",
    );

    let block = chacha20_block(&[0u8; 32], &[0u8; 12], 0);

    assert_eq!(block.as_slice(), expected.as_slice());
}

/// RFC 8439 Section 2.3.2
#[test]
fn test_block_rfc8439_section_2_3_2() {
    let key = sequential_key(0);
    let nonce = [0, 0, 0, 0x09, 0, 0, 0, 0x4a, 0, 0, 0, 0];
    let expected = hex_to_bytes(
        "10f1e7e4d13b5915500fdd1fa32071c4c7d1f4c733c068030422aa9ac3d46c4e\
         d2826446079faa0914c2d705d98b02a2b5129cd1de164eb9cbd083e8a2503c4e",
    );

    let block = chacha20_block(&key, &nonce, 1);

    assert_eq!(block.as_slice(), expected.as_slice());
}

#[test]
fn test_block_at_max_counter() {
    let expected = hex_to_bytes(
        "ace4cd09e294d1912d4ad205d06f95d9c2f2bfcf453e8753f128765b62215f4d\
         92c74f2f626c6a640c0b1284d839ec81f1696281dafc3e684593937023b58b1d",
    );

    let block = chacha20_block(&[0u8; 32], &[0u8; 12], u32::MAX);

    assert_eq!(block.as_slice(), expected.as_slice());
}

#[test]
fn test_block_leaves_state_zeroized() {
    let mut chacha = ChaCha20::default();
    let mut out = [0u8; CHACHA20_BLOCK_SIZE];

    chacha.block(&sequential_key(0), &[1u8; 12], 7, &mut out);

    assert!(chacha.is_zeroized());
    assert_ne!(out, [0u8; CHACHA20_BLOCK_SIZE]);
}

/// RFC 8439 Section 2.4.2
#[test]
fn test_encrypt_rfc8439_section_2_4_2() {
    let key = sequential_key(0);
    let nonce = [0, 0, 0, 0, 0, 0, 0, 0x4a, 0, 0, 0, 0];
    let expected = hex_to_bytes(
        "6e2e359a2568f98041ba0728dd0d6981e97e7aec1d4360c20a27afccfd9fae0b\
         f91b65c5524733ab8f593dabcd62b3571639d624e65152ab8f530c359f0861d8\
         07ca0dbf500d6a6156a38e088a22b65e52bc514d16ccf806818ce91ab7793736\
         5af90bbf74a35be6b40b8eedf2785e42874d",
    );

    let mut data = SUNSCREEN.to_vec();
    chacha20_apply(&key, &nonce, 1, &mut data).expect("Failed to apply keystream");

    assert_eq!(data, expected);
}

#[test]
fn test_apply_twice_restores_input() {
    let key = sequential_key(3);
    let nonce = [0x11u8; 12];
    let mut data = SUNSCREEN.to_vec();

    chacha20_apply(&key, &nonce, 42, &mut data).expect("Failed to apply keystream");
    assert_ne!(data.as_slice(), SUNSCREEN);

    chacha20_apply(&key, &nonce, 42, &mut data).expect("Failed to apply keystream");
    assert_eq!(data.as_slice(), SUNSCREEN);
}

#[test]
fn test_apply_matches_consecutive_blocks() {
    let key = sequential_key(9);
    let nonce = [0xa5u8; 12];
    let mut data = vec![0u8; 2 * CHACHA20_BLOCK_SIZE + 3];

    chacha20_apply(&key, &nonce, 5, &mut data).expect("Failed to apply keystream");

    let mut expected = Vec::new();
    for counter in 5..8 {
        expected.extend_from_slice(&chacha20_block(&key, &nonce, counter));
    }
    expected.truncate(data.len());

    assert_eq!(data, expected);
}

#[test]
fn test_apply_empty_is_noop() {
    let mut data: [u8; 0] = [];
    chacha20_apply(&[7u8; 32], &[7u8; 12], u32::MAX, &mut data).expect("Empty data must succeed");
}

#[test]
fn test_crypt_leaves_state_zeroized() {
    let mut chacha = ChaCha20::default();
    let mut data = SUNSCREEN.to_vec();

    chacha
        .crypt(&sequential_key(0), &[2u8; 12], 1, &mut data)
        .expect("Failed to apply keystream");

    assert!(chacha.is_zeroized());
}

#[test]
fn test_max_counter_accepts_one_block() {
    let key = sequential_key(0);
    let nonce = [0x33u8; 12];
    let mut data = [0u8; CHACHA20_BLOCK_SIZE];

    chacha20_apply(&key, &nonce, u32::MAX, &mut data).expect("One block at u32::MAX must fit");

    assert_eq!(data, chacha20_block(&key, &nonce, u32::MAX));
}

#[test]
fn test_max_counter_rejects_second_block() {
    let key = sequential_key(0);
    let nonce = [0x33u8; 12];
    let mut data = [0x5au8; CHACHA20_BLOCK_SIZE + 1];

    let err = chacha20_apply(&key, &nonce, u32::MAX, &mut data).expect_err("Must overflow");

    assert_eq!(
        err,
        Error::CounterOverflow {
            initial_counter: u32::MAX,
            blocks: 2,
        }
    );
    assert_eq!(data, [0x5au8; CHACHA20_BLOCK_SIZE + 1], "Data must be untouched");
}

#[test]
fn test_blocks_for() {
    assert_eq!(blocks_for(0), 0);
    assert_eq!(blocks_for(1), 1);
    assert_eq!(blocks_for(64), 1);
    assert_eq!(blocks_for(65), 2);
    assert_eq!(blocks_for(128), 2);
}

#[test]
fn test_check_capacity_bounds() {
    assert!(check_capacity(0, 0).is_ok());
    assert!(check_capacity(u32::MAX, 0).is_ok());
    assert!(check_capacity(u32::MAX - 1, 2 * CHACHA20_BLOCK_SIZE).is_ok());
    assert!(check_capacity(u32::MAX - 1, 2 * CHACHA20_BLOCK_SIZE + 1).is_err());
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_check_capacity_max_plaintext_len() {
    let max = MAX_PLAINTEXT_LEN as usize;

    assert!(check_capacity(1, max).is_ok());
    assert_eq!(
        check_capacity(1, max + 1),
        Err(Error::CounterOverflow {
            initial_counter: 1,
            blocks: u64::from(u32::MAX) + 1,
        })
    );
    // Counter 0 reaches one block further.
    assert!(check_capacity(0, max + CHACHA20_BLOCK_SIZE).is_ok());
}

/// RFC 8439 Section 2.6.2
#[test]
fn test_poly1305_key_gen_rfc8439_section_2_6_2() {
    let key = sequential_key(0x80);
    let nonce = [0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7];
    let expected =
        hex_to_bytes("8ad5a08b905f81cc815040274ab29471a833b637e3fd0da508dbb8e2fdd1a646");

    let poly_key = poly1305_key_gen(&key, &nonce);

    assert_eq!(poly_key.as_slice(), expected.as_slice());
}

#[test]
fn test_poly1305_key_gen_is_counter_0_prefix() {
    let key = sequential_key(1);
    let nonce = [9u8; 12];

    let block = chacha20_block(&key, &nonce, 0);
    let poly_key = poly1305_key_gen(&key, &nonce);

    assert_eq!(poly_key.as_slice(), &block[..32]);
}

#[test]
fn test_generate_poly_key_leaves_state_zeroized() {
    let mut chacha = ChaCha20::default();
    let mut out = [0u8; 32];

    chacha.generate_poly_key(&sequential_key(0), &[0u8; 12], &mut out);

    assert!(chacha.is_zeroized());
}
