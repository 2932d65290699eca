//! Mazecrypt - keys bound to solving a seeded 3D maze
//!
//! A maze is generated deterministically from a seed. A navigator searches
//! it for a path that passes a time window, a session commitment and a
//! diversity check, and collects session entropy along the way. That
//! entropy keys an authenticated cipher which ratchets its key forward
//! while keeping a short history for late decryption.
//!
//! ## Flow
//!
//! ```text
//! Seed → Maze (grid + exits) → Navigator (entropy, search, validation) → MazeCipher
//! ```
//!
//! - **Maze**: `size³` cells of 6-bit move masks from ChaCha20 and SHA3-512
//! - **Navigator**: best-first search, constant-time commitment check
//! - **MazeCipher**: KBKDF(HMAC-SHA3-512) → XChaCha20-Poly1305, SHAKE256 ratchet
//!
//! The "lattice" parameters only name a modulus and a threshold over SHA3
//! output; nothing here is post-quantum cryptography.
//!
//! ## Example
//!
//! ```no_run
//! use mazecrypt::{Maze, MazeCipher, Navigator, SecurityConfig, SecurityLevel};
//!
//! let config = SecurityConfig::new(8, 60, SecurityLevel::Medium)?;
//! let maze = Maze::from_config(&config)?;
//! let navigator = Navigator::new(&maze, &config)?;
//!
//! if let Some(path) = navigator.find_secure_path() {
//!     println!("solved in {} moves", path.len());
//!     let mut cipher = MazeCipher::new(&navigator, &config);
//!     let ciphertext = cipher.encrypt(b"attack at dawn")?;
//!     assert_eq!(cipher.decrypt(&ciphertext)?, b"attack at dawn");
//! }
//! # Ok::<(), mazecrypt::MazeError>(())
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod direction;
pub mod entropy;
pub mod error;
pub mod maze;
pub mod navigator;

pub use config::{SecurityConfig, SecurityLevel};
pub use crypto::MazeCipher;
pub use direction::{Direction, Path, Position};
pub use error::{MazeError, Result};
pub use maze::Maze;
pub use navigator::Navigator;
