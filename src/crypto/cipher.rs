use crate::config::SecurityConfig;
use crate::crypto::kdf::{derive_key_material, KeyMaterial, FINGERPRINT_SIZE};
use crate::crypto::mac::constant_time_compare;
use crate::error::{MazeError, Result};
use crate::navigator::Navigator;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::VecDeque;
use tracing::debug;

/// XChaCha20-Poly1305 nonce length
pub const NONCE_SIZE: usize = 24;
/// Poly1305 tag length
pub const TAG_SIZE: usize = 16;
/// Anything shorter cannot hold a nonce and a fingerprint
pub const MIN_CIPHERTEXT_LEN: usize = NONCE_SIZE + FINGERPRINT_SIZE;
/// Previous keys kept for decryption after a rotation
pub const KEY_HISTORY: usize = 3;
/// Leading bytes of the serialized maze bound into every ciphertext
pub const AAD_LEN: usize = 64;

const KDF_LABEL: &[u8] = b"mazecrypt-hybrid-key";

/// Authenticated encryption keyed by a solved maze session.
///
/// Ciphertext layout: `nonce(24) || ciphertext+tag || fingerprint(48)`.
/// Keys ratchet forward every `key_rotation` messages; the last
/// `KEY_HISTORY` keys still decrypt.
#[derive(Debug)]
pub struct MazeCipher {
    key: KeyMaterial,
    history: VecDeque<KeyMaterial>,
    rotations: u64,
    messages_since_rotation: u64,
    rotation_threshold: u64,
    aad: Vec<u8>,
}

impl MazeCipher {
    pub fn new(navigator: &Navigator<'_>, config: &SecurityConfig) -> Self {
        let key = derive_key_material(navigator.entropy(), KDF_LABEL);
        let mut aad = navigator.maze().serialize();
        aad.truncate(AAD_LEN);
        debug!(fingerprint = %short_fingerprint(&key), "derived initial key");
        Self {
            key,
            history: VecDeque::with_capacity(KEY_HISTORY),
            rotations: 0,
            messages_since_rotation: 0,
            rotation_threshold: config.key_rotation.max(1),
            aad,
        }
    }

    pub fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        if self.messages_since_rotation >= self.rotation_threshold {
            self.rotate_keys();
        }

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|_| MazeError::EntropySourceExhausted)?;

        let sealed = aead(&self.key)
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: &self.aad,
                },
            )
            .map_err(|_| MazeError::EncryptionFailed)?;
        self.messages_since_rotation += 1;

        let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len() + FINGERPRINT_SIZE);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        out.extend_from_slice(&self.key.fingerprint());
        Ok(out)
    }

    /// Decrypt with the current key or one of the retained previous keys.
    ///
    /// Every failure is reported as `InvalidCiphertext`.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < MIN_CIPHERTEXT_LEN {
            return Err(MazeError::InvalidCiphertext);
        }

        let (nonce, rest) = ciphertext.split_at(NONCE_SIZE);
        let (sealed, fingerprint) = rest.split_at(rest.len() - FINGERPRINT_SIZE);

        let key = std::iter::once(&self.key)
            .chain(self.history.iter().rev())
            .find(|key| constant_time_compare(&key.fingerprint(), fingerprint))
            .ok_or(MazeError::InvalidCiphertext)?;

        aead(key)
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: &self.aad,
                },
            )
            .map_err(|_| MazeError::InvalidCiphertext)
    }

    /// Ratchet the key forward, keeping at most `KEY_HISTORY` previous keys
    pub fn rotate_keys(&mut self) {
        let next = self.key.ratchet();
        let previous = std::mem::replace(&mut self.key, next);
        if self.history.len() == KEY_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(previous);
        self.rotations += 1;
        self.messages_since_rotation = 0;
        debug!(
            rotations = self.rotations,
            fingerprint = %short_fingerprint(&self.key),
            "rotated key"
        );
    }

    pub fn rotation_count(&self) -> u64 {
        self.rotations
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn fingerprint(&self) -> [u8; FINGERPRINT_SIZE] {
        self.key.fingerprint()
    }
}

fn aead(key: &KeyMaterial) -> XChaCha20Poly1305 {
    XChaCha20Poly1305::new(Key::from_slice(key.aead_key()))
}

fn short_fingerprint(key: &KeyMaterial) -> String {
    hex::encode(&key.fingerprint()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityLevel;
    use crate::maze::Maze;

    fn maze() -> Maze {
        Maze::new(Some(&[0u8; 64]), 4, SecurityLevel::Low).unwrap()
    }

    fn cipher(maze: &Maze, config: &SecurityConfig) -> MazeCipher {
        let nav = Navigator::new(maze, config).unwrap();
        MazeCipher::new(&nav, config)
    }

    #[test]
    fn test_roundtrip() {
        let maze = maze();
        let config = SecurityConfig::default();
        let mut cipher = cipher(&maze, &config);

        for msg in [&b""[..], &b"hello"[..], &[0x5Au8; 4096][..]] {
            let ct = cipher.encrypt(msg).unwrap();
            assert_eq!(ct.len(), NONCE_SIZE + msg.len() + TAG_SIZE + FINGERPRINT_SIZE);
            assert_eq!(cipher.decrypt(&ct).unwrap(), msg);
        }
    }

    #[test]
    fn test_ciphertext_layout() {
        let maze = maze();
        let mut cipher = cipher(&maze, &SecurityConfig::default());
        let a = cipher.encrypt(b"same").unwrap();
        let b = cipher.encrypt(b"same").unwrap();
        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
        assert_eq!(a[a.len() - FINGERPRINT_SIZE..], cipher.fingerprint());
    }

    #[test]
    fn test_short_ciphertext_rejected() {
        let maze = maze();
        let cipher = cipher(&maze, &SecurityConfig::default());
        for len in [0, 1, MIN_CIPHERTEXT_LEN - 1] {
            assert!(matches!(
                cipher.decrypt(&vec![0u8; len]),
                Err(MazeError::InvalidCiphertext)
            ));
        }
    }

    #[test]
    fn test_minimum_length_without_tag_rejected() {
        let maze = maze();
        let mut cipher = cipher(&maze, &SecurityConfig::default());
        let ct = cipher.encrypt(b"").unwrap();
        // Nonce and a matching fingerprint but no tag
        let mut stripped = ct[..NONCE_SIZE].to_vec();
        stripped.extend_from_slice(&ct[ct.len() - FINGERPRINT_SIZE..]);
        assert_eq!(stripped.len(), MIN_CIPHERTEXT_LEN);
        assert!(matches!(cipher.decrypt(&stripped), Err(MazeError::InvalidCiphertext)));
    }

    #[test]
    fn test_unknown_fingerprint_rejected() {
        let maze = maze();
        let mut cipher = cipher(&maze, &SecurityConfig::default());
        let mut ct = cipher.encrypt(b"payload").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0xFF;
        assert!(matches!(cipher.decrypt(&ct), Err(MazeError::InvalidCiphertext)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let maze = maze();
        let mut cipher = cipher(&maze, &SecurityConfig::default());
        let mut ct = cipher.encrypt(b"payload").unwrap();
        ct[NONCE_SIZE] ^= 0x01;
        assert!(matches!(cipher.decrypt(&ct), Err(MazeError::InvalidCiphertext)));
    }

    #[test]
    fn test_other_session_cannot_decrypt() {
        let maze = maze();
        let config = SecurityConfig::default();
        let mut alice = cipher(&maze, &config);
        let bob = cipher(&maze, &config);
        let ct = alice.encrypt(b"for alice only").unwrap();
        assert!(matches!(bob.decrypt(&ct), Err(MazeError::InvalidCiphertext)));
    }

    #[test]
    fn test_rotation_at_threshold() {
        let maze = maze();
        let config = SecurityConfig::default();
        let mut cipher = cipher(&maze, &config);

        let first = cipher.encrypt(b"message 0").unwrap();
        for i in 1..config.key_rotation {
            cipher.encrypt(format!("message {}", i).as_bytes()).unwrap();
        }
        assert_eq!(cipher.rotation_count(), 0);

        let after = cipher.encrypt(b"after rotation").unwrap();
        assert_eq!(cipher.rotation_count(), 1);
        assert_ne!(first[first.len() - FINGERPRINT_SIZE..], after[after.len() - FINGERPRINT_SIZE..]);

        assert_eq!(cipher.decrypt(&after).unwrap(), b"after rotation");
        assert_eq!(cipher.decrypt(&first).unwrap(), b"message 0");
    }

    #[test]
    fn test_history_is_bounded() {
        let maze = maze();
        let mut cipher = cipher(&maze, &SecurityConfig::default());
        let old = cipher.encrypt(b"old").unwrap();

        for expected in 1..=KEY_HISTORY {
            cipher.rotate_keys();
            assert_eq!(cipher.history_len(), expected);
            assert_eq!(cipher.decrypt(&old).unwrap(), b"old");
        }

        cipher.rotate_keys();
        assert_eq!(cipher.history_len(), KEY_HISTORY);
        assert_eq!(cipher.rotation_count(), 4);
        assert!(matches!(cipher.decrypt(&old), Err(MazeError::InvalidCiphertext)));
    }

    #[test]
    fn test_aad_is_maze_prefix() {
        let maze = maze();
        let cipher = cipher(&maze, &SecurityConfig::default());
        assert_eq!(cipher.aad, maze.serialize()[..AAD_LEN]);
    }
}
