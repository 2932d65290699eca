use crate::config::{SecurityConfig, SecurityLevel};
use crate::error::Result;
use crate::maze::Maze;
use std::path::Path;

/// Options for the generate command
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub size: usize,
    pub level: SecurityLevel,
    /// Raw seed; a random one is drawn when absent
    pub seed: Option<Vec<u8>>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        let config = SecurityConfig::default();
        Self {
            size: config.maze_size,
            level: config.security_level,
            seed: None,
        }
    }
}

/// Build a maze and write its serialized form to `output_path`
pub fn generate_maze(output_path: &Path, options: &GenerateOptions) -> Result<Maze> {
    let maze = Maze::new(options.seed.as_deref(), options.size, options.level)?;
    std::fs::write(output_path, maze.serialize())?;
    Ok(maze)
}

/// Load a maze previously written by `generate_maze`
pub fn load_maze(path: &Path) -> Result<Maze> {
    Maze::deserialize(&std::fs::read(path)?)
}
