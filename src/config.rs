use crate::error::{MazeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Smallest accepted maze edge length
pub const MIN_MAZE_SIZE: usize = 4;
/// Largest accepted maze edge length
pub const MAX_MAZE_SIZE: usize = 64;
/// One exit per `EXIT_DIVISOR` cells of edge length (at least two)
pub const EXIT_DIVISOR: usize = 4;
/// Shared modulus for every security level
pub const BASE_MODULUS: u64 = 12289;

/// Messages encrypted under one key before it is ratcheted
pub const DEFAULT_KEY_ROTATION: u64 = 1000;

/// Security level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl SecurityLevel {
    /// Width of the zero-padded level label in the serialized maze
    pub const LABEL_LEN: usize = 6;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Search-security parameters for this level
    pub fn params(&self) -> LatticeParams {
        let dimension = match self {
            Self::Low => 256,
            Self::Medium => 512,
            Self::High => 1024,
        };
        LatticeParams {
            modulus: BASE_MODULUS,
            dimension,
            error_sigma: 3.2,
        }
    }

    /// Fixed-width label: UTF-8 name, zero padded to `LABEL_LEN`
    pub fn to_label(&self) -> [u8; Self::LABEL_LEN] {
        let mut label = [0u8; Self::LABEL_LEN];
        let name = self.as_str().as_bytes();
        label[..name.len()].copy_from_slice(name);
        label
    }

    pub fn from_label(label: &[u8]) -> Result<Self> {
        let name = std::str::from_utf8(label)
            .map_err(|_| MazeError::InvalidFormat("security level is not UTF-8".into()))?;
        name.trim_end_matches('\0').parse()
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SecurityLevel {
    type Err = MazeError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(MazeError::InvalidSecurityLevel(s.to_string())),
        }
    }
}

/// Lattice-style parameters driving grid noise and path checksums.
///
/// These are names only: the maze uses them as a modulus and a threshold
/// exponent over SHA3 output, not as an LWE instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParams {
    pub modulus: u64,
    pub dimension: u32,
    pub error_sigma: f64,
}

/// Everything a caller chooses before building a maze
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Edge length of the cubic grid
    pub maze_size: usize,
    pub security_level: SecurityLevel,
    /// Raw seed bytes (hex in JSON); a fresh random seed is used when absent
    #[serde(with = "hex_seed")]
    pub seed: Option<Vec<u8>>,
    /// Seconds allowed between search start and an accepted path
    pub time_window: u64,
    /// Messages encrypted under one key before rotation
    pub key_rotation: u64,
    /// Exit candidates the search may validate before giving up
    pub max_path_attempts: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            maze_size: 12,
            security_level: SecurityLevel::default(),
            seed: None,
            time_window: 90,
            key_rotation: DEFAULT_KEY_ROTATION,
            max_path_attempts: 1000,
        }
    }
}

impl SecurityConfig {
    pub fn new(maze_size: usize, time_window: u64, security_level: SecurityLevel) -> Result<Self> {
        let config = Self {
            maze_size,
            security_level,
            time_window,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: impl Into<Vec<u8>>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Check ranges that do not depend on a built maze
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MAZE_SIZE..=MAX_MAZE_SIZE).contains(&self.maze_size) {
            return Err(MazeError::InvalidSize(self.maze_size));
        }
        if self.time_window == 0 {
            return Err(MazeError::InvalidTimeWindow(self.time_window));
        }
        if let Some(seed) = &self.seed {
            if seed.len() < crate::maze::MIN_SEED_LEN {
                return Err(MazeError::InvalidSeed(seed.len()));
            }
        }
        Ok(())
    }

    /// Serialize config to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Deserialize config from JSON bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

mod hex_seed {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seed: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match seed {
            Some(bytes) => s.serialize_some(&hex::encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|text| hex::decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
