use crate::crypto::mac::{hmac_sha3_512, DIGEST_SIZE};
use digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_512, Shake256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Derived key material: 32 bytes of AEAD key, 64 bytes reserved
pub const KEY_MATERIAL_SIZE: usize = 96;
/// AEAD key bytes at the front of the key material
pub const AEAD_KEY_SIZE: usize = 32;
/// Truncated SHA3-512 identifying a key in ciphertexts
pub const FINGERPRINT_SIZE: usize = 48;

const RATCHET_DOMAIN: &[u8] = b"mazecrypt-ratchet";

#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial([u8; KEY_MATERIAL_SIZE]);

impl KeyMaterial {
    pub fn from_bytes(bytes: [u8; KEY_MATERIAL_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn aead_key(&self) -> &[u8] {
        &self.0[..AEAD_KEY_SIZE]
    }

    /// Bytes held back for a future key-encapsulation component
    pub fn reserved(&self) -> &[u8] {
        &self.0[AEAD_KEY_SIZE..]
    }

    pub fn fingerprint(&self) -> [u8; FINGERPRINT_SIZE] {
        let digest = Sha3_512::digest(&self.0);
        let mut fp = [0u8; FINGERPRINT_SIZE];
        fp.copy_from_slice(&digest[..FINGERPRINT_SIZE]);
        fp
    }

    /// One-way step: `SHAKE256(domain || key)` squeezed to a full key
    pub fn ratchet(&self) -> Self {
        let mut shake = Shake256::default();
        shake.update(RATCHET_DOMAIN);
        shake.update(&self.0);
        let mut next = [0u8; KEY_MATERIAL_SIZE];
        shake.finalize_xof().read(&mut next);
        Self(next)
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyMaterial({}..)", hex::encode(&self.fingerprint()[..8]))
    }
}

/// NIST SP 800-108 counter-mode KDF with HMAC-SHA3-512.
///
/// Block `i` (from 1) is `HMAC(key, [i]_32 || label || 0x00 || context || [L]_32)`
/// where `L` is the output length in bits.
pub fn kbkdf_hmac_sha3_512(key: &[u8], label: &[u8], context: &[u8], out: &mut [u8]) {
    let length_bits = (out.len() as u32) * 8;
    let mut fixed = Vec::with_capacity(label.len() + 1 + context.len() + 4);
    fixed.extend_from_slice(label);
    fixed.push(0x00);
    fixed.extend_from_slice(context);
    fixed.extend_from_slice(&length_bits.to_be_bytes());

    for (i, chunk) in out.chunks_mut(DIGEST_SIZE).enumerate() {
        let counter = (i as u32 + 1).to_be_bytes();
        let block = hmac_sha3_512(key, &[&counter[..], &fixed[..]]);
        chunk.copy_from_slice(&block[..chunk.len()]);
    }
}

/// Initial key material for a session: KBKDF keyed and contextualized by `entropy`
pub fn derive_key_material(entropy: &[u8], label: &[u8]) -> KeyMaterial {
    let mut bytes = [0u8; KEY_MATERIAL_SIZE];
    kbkdf_hmac_sha3_512(entropy, label, entropy, &mut bytes);
    let key = KeyMaterial(bytes);
    bytes.zeroize();
    key
}
