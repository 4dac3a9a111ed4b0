//! Content Hashing
//!
//! Stable 32-bit string hash used to fingerprint signal registrations.
//!
//! The hash walks the UTF-16 code units of the input and folds them with
//! `h = h * 31 + unit` in wrapping 32-bit arithmetic, so the same text always
//! produces the same value across runs and platforms.

/// Compute the 32-bit content hash of a string.
///
/// The empty string hashes to `0`.
pub fn string_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Fingerprint a registration from its source text and origin.
///
/// The fingerprint is the decimal hash of `source` immediately followed by the
/// decimal hash of `origin`.
pub fn fingerprint(source: &str, origin: &str) -> String {
    format!("{}{}", string_hash(source), string_hash(origin))
}
