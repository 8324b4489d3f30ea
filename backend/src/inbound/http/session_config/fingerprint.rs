//! Session key fingerprinting.
//!
//! A truncated SHA-256 digest of the signing material lets operators confirm
//! which key is active without exposing it.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the SHA-256 of the key's signing half, hex encoded.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use shelfmates::inbound::http::session_config::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn stable_for_the_same_key() {
        let key = Key::derive_from(&[b'a'; 64]);
        assert_eq!(key_fingerprint(&key), key_fingerprint(&key));
    }

    #[rstest]
    fn lowercase_hex_of_fixed_length() {
        let fp = key_fingerprint(&Key::generate());
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[rstest]
    fn distinguishes_keys() {
        let first = Key::derive_from(&[b'a'; 64]);
        let second = Key::derive_from(&[b'b'; 64]);
        assert_ne!(key_fingerprint(&first), key_fingerprint(&second));
    }
}
