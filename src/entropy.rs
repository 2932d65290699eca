//! Session entropy for the navigator.
//!
//! The blob mixes OS randomness, a slice of the maze grid and the current
//! microsecond. The timing part is a weak source and contributes little
//! real entropy; it is kept because derived keys depend on the exact layout.

use crate::error::{MazeError, Result};
use crate::maze::Maze;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const OS_RANDOM_LEN: usize = 32;
pub const GRID_SAMPLE_LEN: usize = 32;
pub const TIMING_LEN: usize = 6;
pub const ENTROPY_LEN: usize = OS_RANDOM_LEN + GRID_SAMPLE_LEN + TIMING_LEN;

/// `os_random(32) || grid_bytes[..32] || micros(6)`
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EntropyBlob([u8; ENTROPY_LEN]);

impl EntropyBlob {
    pub fn collect(maze: &Maze) -> Result<Self> {
        let mut blob = [0u8; ENTROPY_LEN];
        let (random, rest) = blob.split_at_mut(OS_RANDOM_LEN);
        let (grid, timing) = rest.split_at_mut(GRID_SAMPLE_LEN);

        OsRng
            .try_fill_bytes(random)
            .map_err(|_| MazeError::EntropySourceExhausted)?;

        for (dst, src) in grid.iter_mut().zip(maze.grid_bytes()) {
            *dst = src;
        }
        timing.copy_from_slice(&timing_entropy());

        let entropy = Self(blob);
        blob.zeroize();
        Ok(entropy)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn grid_sample(&self) -> &[u8] {
        &self.0[OS_RANDOM_LEN..OS_RANDOM_LEN + GRID_SAMPLE_LEN]
    }
}

impl std::fmt::Debug for EntropyBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EntropyBlob(..)")
    }
}

/// Six ASCII digits of the current wall-clock microsecond
fn timing_entropy() -> [u8; TIMING_LEN] {
    let micros = chrono::Utc::now().format("%6f").to_string();
    let mut out = [b'0'; TIMING_LEN];
    for (dst, src) in out.iter_mut().zip(micros.bytes()) {
        *dst = src;
    }
    out
}
