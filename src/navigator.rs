use crate::config::SecurityConfig;
use crate::crypto::mac::{anchor, commitment, constant_time_compare, DIGEST_SIZE};
use crate::direction::{Direction, Path, Position};
use crate::entropy::EntropyBlob;
use crate::error::Result;
use crate::maze::Maze;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Shortest path accepted by the diversity check
pub const MIN_PATH_LEN: usize = 8;

/// Best-first search over a maze, gated by time, commitment and diversity checks
#[derive(Debug)]
pub struct Navigator<'a> {
    maze: &'a Maze,
    time_window: Duration,
    max_path_attempts: usize,
    entropy: EntropyBlob,
    anchor: [u8; DIGEST_SIZE],
}

/// Frontier entry ordered by `(priority, seq)` so equal priorities pop first-in-first-out
struct Frontier {
    priority: usize,
    seq: u64,
    pos: Position,
    path: Path,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Reversed: BinaryHeap is a max-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.priority, other.seq).cmp(&(self.priority, self.seq))
    }
}

impl<'a> Navigator<'a> {
    /// Collects the session entropy and anchor up front
    pub fn new(maze: &'a Maze, config: &SecurityConfig) -> Result<Self> {
        let entropy = EntropyBlob::collect(maze)?;
        let anchor = anchor(entropy.as_bytes());
        Ok(Self {
            maze,
            time_window: Duration::from_secs(config.time_window),
            max_path_attempts: config.max_path_attempts.max(1),
            entropy,
            anchor,
        })
    }

    pub fn maze(&self) -> &'a Maze {
        self.maze
    }

    pub fn time_window(&self) -> Duration {
        self.time_window
    }

    pub fn entropy(&self) -> &[u8] {
        self.entropy.as_bytes()
    }

    pub fn anchor(&self) -> &[u8; DIGEST_SIZE] {
        &self.anchor
    }

    pub fn commitment(&self, path: &[Direction]) -> [u8; DIGEST_SIZE] {
        commitment(path, self.entropy())
    }

    /// Search for a path that passes `validate_full_path`; `None` if there is none
    pub fn find_secure_path(&self) -> Option<Path> {
        self.find_path_with(|path, started| self.validate_full_path(path, started))
    }

    /// Best-first search from the start, returning the first exit path `accept` takes.
    ///
    /// Exits are judged when popped, never at the start. Rejected exit paths
    /// are dropped without expansion so other routes to the same exit can
    /// still be tried. Gives up when the frontier empties, the time window
    /// closes, or `max_path_attempts` exit candidates were rejected.
    pub fn find_path_with<F>(&self, mut accept: F) -> Option<Path>
    where
        F: FnMut(&[Direction], Instant) -> bool,
    {
        let started = Instant::now();
        let size = self.maze.size();
        let mut heap = BinaryHeap::new();
        let mut visited: HashSet<Position> = HashSet::new();
        let mut seq = 0u64;
        let mut attempts = 0usize;

        heap.push(Frontier {
            priority: 0,
            seq,
            pos: self.maze.start(),
            path: Vec::new(),
        });

        while let Some(Frontier { pos, path, .. }) = heap.pop() {
            if started.elapsed() > self.time_window {
                warn!(expanded = visited.len(), "time window closed before a path was accepted");
                return None;
            }

            if !path.is_empty() && self.maze.is_exit(pos) {
                if accept(&path, started) {
                    info!(len = path.len(), expanded = visited.len(), "path accepted");
                    return Some(path);
                }
                attempts += 1;
                if attempts >= self.max_path_attempts {
                    warn!(attempts, "path attempt budget exhausted");
                    return None;
                }
                continue;
            }

            if !visited.insert(pos) {
                continue;
            }

            for dir in self.maze.allowed_moves(pos) {
                let Some(next) = dir.step(pos, size) else {
                    continue;
                };
                if visited.contains(&next) {
                    continue;
                }
                let mut next_path = path.clone();
                next_path.push(dir);
                seq += 1;
                heap.push(Frontier {
                    priority: next_path.len() + self.heuristic(next),
                    seq,
                    pos: next,
                    path: next_path,
                });
            }
        }

        debug!(expanded = visited.len(), attempts, "frontier exhausted");
        None
    }

    /// Manhattan distance to the nearest exit
    fn heuristic(&self, (x, y, z): Position) -> usize {
        self.maze
            .exits()
            .iter()
            .map(|&(ex, ey, ez)| x.abs_diff(ex) + y.abs_diff(ey) + z.abs_diff(ez))
            .min()
            .unwrap_or(0)
    }

    /// All four gates: maze checksum, time window, commitment, diversity
    pub fn validate_full_path(&self, path: &[Direction], started: Instant) -> bool {
        let checksum = self.maze.validate_path(path);
        let timely = self.check_time_constraint(started);
        let committed = self.verify_commitment(path);
        let diverse = check_path_entropy(path);
        debug!(len = path.len(), checksum, timely, committed, diverse, "validated candidate");
        checksum && timely && committed && diverse
    }

    pub fn check_time_constraint(&self, started: Instant) -> bool {
        started.elapsed() <= self.time_window
    }

    /// Commitment over `path` must equal the session anchor (constant time)
    pub fn verify_commitment(&self, path: &[Direction]) -> bool {
        constant_time_compare(&self.commitment(path), &self.anchor)
    }
}

/// Diversity rule: at least `MIN_PATH_LEN` moves, at least half of them
/// distinct, and at most `len / 4` immediate repeats.
pub fn check_path_entropy(path: &[Direction]) -> bool {
    if path.len() < MIN_PATH_LEN {
        return false;
    }
    let unique = path.iter().collect::<HashSet<_>>().len();
    let repeats = path.windows(2).filter(|w| w[0] == w[1]).count();
    unique as f64 / path.len() as f64 >= 0.5 && repeats <= path.len() / 4
}

/// Positions visited when walking `path` from `start`, or `None` if it leaves the maze
pub fn trace_path(maze: &Maze, path: &[Direction]) -> Option<Vec<Position>> {
    let mut pos = maze.start();
    let mut trail = Vec::with_capacity(path.len() + 1);
    trail.push(pos);
    for dir in path {
        pos = dir.step(pos, maze.size())?;
        trail.push(pos);
    }
    Some(trail)
}
