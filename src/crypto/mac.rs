use crate::direction::{path_symbols, Direction};
use hmac::{Hmac, Mac};
use sha3::{Digest, Sha3_512};

type HmacSha3_512 = Hmac<Sha3_512>;

/// Output size of SHA3-512 and HMAC-SHA3-512
pub const DIGEST_SIZE: usize = 64;

/// HMAC-SHA3-512 over the concatenation of `parts`
pub fn hmac_sha3_512(key: &[u8], parts: &[&[u8]]) -> [u8; DIGEST_SIZE] {
    let mut mac = HmacSha3_512::new_from_slice(key).expect("HMAC can take key of any size");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// Session anchor: `SHA3-512(entropy)`
pub fn anchor(entropy: &[u8]) -> [u8; DIGEST_SIZE] {
    Sha3_512::digest(entropy).into()
}

/// Path commitment: `SHA3-512(symbols || entropy)`
pub fn commitment(path: &[Direction], entropy: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut hasher = Sha3_512::new();
    hasher.update(path_symbols(path).as_bytes());
    hasher.update(entropy);
    hasher.finalize().into()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
