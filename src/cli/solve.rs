use crate::config::SecurityConfig;
use crate::crypto::MazeCipher;
use crate::direction::{path_symbols, Path};
use crate::error::Result;
use crate::maze::Maze;
use crate::navigator::Navigator;
use std::fmt;
use std::time::{Duration, Instant};

/// Options for the solve command
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub config: SecurityConfig,
    /// Message used for the encrypt/decrypt self-check once a path is found
    pub message: String,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            config: SecurityConfig::default(),
            message: "mazecrypt self-check".into(),
        }
    }
}

/// Outcome of an encrypt/decrypt round trip under a fresh session key
#[derive(Debug, Clone)]
pub struct CipherCheck {
    pub ciphertext_len: usize,
    pub fingerprint: String,
    pub roundtrip_ok: bool,
}

#[derive(Debug, Clone)]
pub struct SolveReport {
    pub size: usize,
    pub exits: usize,
    pub path: Option<Path>,
    pub elapsed: Duration,
    pub cipher: Option<CipherCheck>,
}

/// Build the maze, run the secure search and, on success, exercise the cipher
pub fn solve(options: &SolveOptions) -> Result<SolveReport> {
    let maze = Maze::from_config(&options.config)?;
    let navigator = Navigator::new(&maze, &options.config)?;

    let started = Instant::now();
    let path = navigator.find_secure_path();
    let elapsed = started.elapsed();

    let cipher = match &path {
        Some(_) => Some(cipher_self_check(&navigator, &options.config, options.message.as_bytes())?),
        None => None,
    };

    Ok(SolveReport {
        size: maze.size(),
        exits: maze.exits().len(),
        path,
        elapsed,
        cipher,
    })
}

/// Encrypt `message` under a key derived from `navigator` and decrypt it again
pub fn cipher_self_check(
    navigator: &Navigator<'_>,
    config: &SecurityConfig,
    message: &[u8],
) -> Result<CipherCheck> {
    let mut cipher = MazeCipher::new(navigator, config);
    let ciphertext = cipher.encrypt(message)?;
    let recovered = cipher.decrypt(&ciphertext)?;
    Ok(CipherCheck {
        ciphertext_len: ciphertext.len(),
        fingerprint: hex::encode(&cipher.fingerprint()[..8]),
        roundtrip_ok: recovered == message,
    })
}

impl fmt::Display for SolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Maze: {0} x {0} x {0}, {1} exits", self.size, self.exits)?;
        writeln!(f, "Search time: {:.3}s", self.elapsed.as_secs_f64())?;
        match &self.path {
            Some(path) => {
                writeln!(f, "Secure path found: {} moves", path.len())?;
                writeln!(f, "Path: {}", path_symbols(path))?;
            }
            None => writeln!(f, "No secure path found")?,
        }
        if let Some(check) = &self.cipher {
            writeln!(f, "Key fingerprint: {}..", check.fingerprint)?;
            writeln!(f, "Ciphertext: {} bytes", check.ciphertext_len)?;
            writeln!(
                f,
                "Round trip: {}",
                if check.roundtrip_ok { "ok" } else { "FAILED" }
            )?;
        }
        Ok(())
    }
}
