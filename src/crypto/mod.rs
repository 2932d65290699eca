pub mod cipher;
pub mod kdf;
pub mod mac;

pub use cipher::*;
pub use kdf::{KeyMaterial, FINGERPRINT_SIZE, KEY_MATERIAL_SIZE};
pub use mac::{anchor, commitment, constant_time_compare};
