use crate::config::{LatticeParams, SecurityConfig, SecurityLevel, EXIT_DIVISOR, MAX_MAZE_SIZE, MIN_MAZE_SIZE};
use crate::direction::{path_symbols, Direction, Position};
use crate::error::{MazeError, Result};
use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha3::{Digest, Sha3_512};
use tracing::debug;

/// Raw seeds shorter than this are rejected
pub const MIN_SEED_LEN: usize = 32;
/// Normalized seed length (one SHA3-512 digest)
pub const SEED_LEN: usize = 64;

/// Cells hold one bit per direction
const CELL_MASK_LIMIT: u64 = 1 << 6;

/// Layout: [size: 4 BE][seed: 64][level: 6][cells: size³ × 8 BE]
const HEADER_LEN: usize = 4 + SEED_LEN + SecurityLevel::LABEL_LEN;

/// Deterministic 3D maze of connectivity bitmasks
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    size: usize,
    seed: [u8; SEED_LEN],
    level: SecurityLevel,
    params: LatticeParams,
    /// Row-major `[x][y][z]`
    grid: Vec<u64>,
    exits: Vec<Position>,
}

impl Maze {
    /// Build a maze from a raw seed (or a fresh random one when `None`)
    pub fn new(seed: Option<&[u8]>, size: usize, level: SecurityLevel) -> Result<Self> {
        validate_size(size)?;
        let seed = normalize_seed(seed)?;
        let mut maze = Self::empty(seed, size, level);
        maze.generate();
        debug!(size, %level, exits = maze.exits.len(), "generated maze");
        Ok(maze)
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.seed.as_deref(), config.maze_size, config.security_level)
    }

    fn empty(seed: [u8; SEED_LEN], size: usize, level: SecurityLevel) -> Self {
        let exits = place_exits(&seed, size);
        Self {
            size,
            seed,
            level,
            params: level.params(),
            grid: Vec::new(),
            exits,
        }
    }

    /// Fill every cell with `(base XOR noise) mod 64`
    fn generate(&mut self) {
        let mut rng = ChaCha20Rng::from_seed(seed_prefix(&self.seed));
        let modulus = self.params.modulus;
        let mut grid = Vec::with_capacity(self.size.pow(3));

        for x in 0..self.size {
            for y in 0..self.size {
                for z in 0..self.size {
                    let base: u64 = rng.gen_range(0..modulus);
                    grid.push((base ^ self.noise(x, y, z)) % CELL_MASK_LIMIT);
                }
            }
        }
        self.grid = grid;
    }

    /// `SHA3-512("x:y:z" || seed) mod modulus`
    fn noise(&self, x: usize, y: usize, z: usize) -> u64 {
        let mut hasher = Sha3_512::new();
        hasher.update(format!("{}:{}:{}", x, y, z).as_bytes());
        hasher.update(self.seed);
        digest_mod(&hasher.finalize(), self.params.modulus)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn seed(&self) -> &[u8; SEED_LEN] {
        &self.seed
    }

    pub fn security_level(&self) -> SecurityLevel {
        self.level
    }

    pub fn params(&self) -> LatticeParams {
        self.params
    }

    pub fn start(&self) -> Position {
        (0, 0, 0)
    }

    pub fn exits(&self) -> &[Position] {
        &self.exits
    }

    pub fn is_exit(&self, pos: Position) -> bool {
        self.exits.contains(&pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.0 < self.size && pos.1 < self.size && pos.2 < self.size
    }

    pub fn cell(&self, pos: Position) -> Option<u64> {
        self.contains(pos).then(|| self.grid[self.index(pos)])
    }

    pub fn cells(&self) -> &[u64] {
        &self.grid
    }

    fn index(&self, (x, y, z): Position) -> usize {
        (x * self.size + y) * self.size + z
    }

    /// Moves whose bit is set in the cell at `pos` and whose target is in bounds
    pub fn allowed_moves(&self, pos: Position) -> impl Iterator<Item = Direction> + '_ {
        let cell = self.cell(pos).unwrap_or(0);
        Direction::ALL
            .into_iter()
            .filter(move |d| cell & d.bit() != 0 && d.step(pos, self.size).is_some())
    }

    /// Grid cells as big-endian bytes, row-major
    pub fn grid_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.grid.iter().flat_map(|cell| cell.to_be_bytes())
    }

    /// Lattice-shaped checksum of a path.
    ///
    /// Accepts iff `SHA3-512(symbols) mod modulus < 2^dimension`. This is a
    /// coarse filter, not a signature.
    pub fn validate_path(&self, path: &[Direction]) -> bool {
        if path.is_empty() {
            return false;
        }
        let digest = Sha3_512::digest(path_symbols(path).as_bytes());
        let signature = digest_mod(&digest, self.params.modulus);
        self.params.dimension >= u64::BITS || signature < (1u64 << self.params.dimension)
    }

    /// `validate_path` over a symbol string; unknown symbols fail
    pub fn validate_symbols(&self, symbols: &str) -> bool {
        crate::direction::parse_path(symbols).is_some_and(|path| self.validate_path(&path))
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.grid.len() * 8);
        out.extend_from_slice(&(self.size as u32).to_be_bytes());
        out.extend_from_slice(&self.seed);
        out.extend_from_slice(&self.level.to_label());
        out.extend(self.grid_bytes());
        out
    }

    /// Rebuild a maze from `serialize` output without regenerating the grid
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(MazeError::InvalidFormat(format!(
                "expected at least {} bytes, got {}",
                HEADER_LEN,
                data.len()
            )));
        }

        let (size_bytes, rest) = data.split_at(4);
        let (seed_bytes, rest) = rest.split_at(SEED_LEN);
        let (label, cells) = rest.split_at(SecurityLevel::LABEL_LEN);

        let size = u32::from_be_bytes(to_array(size_bytes)) as usize;
        validate_size(size)?;
        let level = SecurityLevel::from_label(label)?;

        let expected = size.pow(3) * 8;
        if cells.len() != expected {
            return Err(MazeError::InvalidFormat(format!(
                "grid section is {} bytes, expected {}",
                cells.len(),
                expected
            )));
        }

        let grid: Vec<u64> = cells
            .chunks_exact(8)
            .map(|chunk| u64::from_be_bytes(to_array(chunk)))
            .collect();
        if let Some(index) = grid.iter().position(|&cell| cell >= CELL_MASK_LIMIT) {
            return Err(MazeError::InvalidFormat(format!(
                "cell {} is not a 6-bit move mask",
                index
            )));
        }

        let mut maze = Self::empty(to_array(seed_bytes), size, level);
        maze.grid = grid;
        Ok(maze)
    }
}

fn validate_size(size: usize) -> Result<()> {
    if (MIN_MAZE_SIZE..=MAX_MAZE_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(MazeError::InvalidSize(size))
    }
}

/// Hash a raw seed to 64 bytes, or draw 64 fresh bytes when absent
pub fn normalize_seed(raw: Option<&[u8]>) -> Result<[u8; SEED_LEN]> {
    match raw {
        Some(raw) if raw.len() < MIN_SEED_LEN => Err(MazeError::InvalidSeed(raw.len())),
        Some(raw) => Ok(to_array(&Sha3_512::digest(raw))),
        None => {
            let mut seed = [0u8; SEED_LEN];
            OsRng
                .try_fill_bytes(&mut seed)
                .map_err(|_| MazeError::EntropySourceExhausted)?;
            Ok(seed)
        }
    }
}

/// Exit count `max(2, size / EXIT_DIVISOR)`, each on the `x = 0` or `x = size-1` face
fn place_exits(seed: &[u8; SEED_LEN], size: usize) -> Vec<Position> {
    let mut hasher = Sha3_512::new();
    hasher.update(b"exits");
    hasher.update(seed);
    let mut rng = ChaCha20Rng::from_seed(to_array(&hasher.finalize()[..32]));

    let count = (size / EXIT_DIVISOR).max(2);
    (0..count)
        .map(|_| {
            let x = if rng.gen::<bool>() { 0 } else { size - 1 };
            (x, rng.gen_range(0..size), rng.gen_range(0..size))
        })
        .collect()
}

fn seed_prefix(seed: &[u8; SEED_LEN]) -> [u8; 32] {
    to_array(&seed[..32])
}

/// Big-endian integer value of `bytes`, reduced mod `modulus`
pub(crate) fn digest_mod(bytes: &[u8], modulus: u64) -> u64 {
    let m = modulus as u128;
    bytes
        .iter()
        .fold(0u128, |acc, &b| ((acc << 8) | b as u128) % m) as u64
}

fn to_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
