//! `no_std` string building for identifiers and display names.

use soroban_sdk::{Env, String};

/// Maximum decimal digits of a `u64`.
const MAX_DIGITS: usize = 20;
const BUF_LEN: usize = 128;

fn write_digits(value: u64, width: usize, out: &mut [u8; MAX_DIGITS]) -> usize {
    let mut digits = [0u8; MAX_DIGITS];
    let mut n = value;
    let mut len = 0;
    loop {
        digits[len] = b'0' + (n % 10) as u8;
        n /= 10;
        len += 1;
        if n == 0 {
            break;
        }
    }
    while len < width && len < MAX_DIGITS {
        digits[len] = b'0';
        len += 1;
    }
    for i in 0..len {
        out[i] = digits[len - 1 - i];
    }
    len
}

/// Formats `value` in decimal.
pub fn u64_to_string(env: &Env, value: u64) -> String {
    prefixed_id(env, "", value, 0)
}

/// Builds `prefix` followed by `value`, left-padded with zeros to `width`.
///
/// `prefixed_id(env, "CLM-", 42, 6)` yields `"CLM-000042"`. Prefixes longer
/// than the internal buffer are truncated.
pub fn prefixed_id(env: &Env, prefix: &str, value: u64, width: usize) -> String {
    let mut buf = [0u8; BUF_LEN];
    let prefix = prefix.as_bytes();
    let plen = prefix.len().min(BUF_LEN - MAX_DIGITS);
    buf[..plen].copy_from_slice(&prefix[..plen]);

    let mut digits = [0u8; MAX_DIGITS];
    let dlen = write_digits(value, width, &mut digits);
    buf[plen..plen + dlen].copy_from_slice(&digits[..dlen]);

    String::from_bytes(env, &buf[..plen + dlen])
}

/// Lowercase hex encoding of `bytes` appended after `prefix`.
pub fn hex_with_prefix(env: &Env, prefix: &str, bytes: &[u8; 32]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut buf = [0u8; 80];
    let prefix = prefix.as_bytes();
    let plen = prefix.len().min(16);
    buf[..plen].copy_from_slice(&prefix[..plen]);
    for (i, b) in bytes.iter().enumerate() {
        buf[plen + i * 2] = HEX[(b >> 4) as usize];
        buf[plen + i * 2 + 1] = HEX[(b & 0x0f) as usize];
    }
    String::from_bytes(env, &buf[..plen + 64])
}
