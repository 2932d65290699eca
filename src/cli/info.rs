use crate::cli::generate::load_maze;
use crate::direction::Direction;
use crate::error::Result;
use crate::maze::Maze;
use std::fs;
use std::path::Path;

/// Display information about a serialized maze file
pub fn show_info(path: &Path) -> Result<String> {
    let maze = load_maze(path)?;
    let file_size = fs::metadata(path)?.len();

    let mut output = String::new();
    output.push_str("Maze File Information\n");
    output.push_str("=====================\n\n");
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Actual size: {}\n\n", format_size(file_size)));
    output.push_str(&describe_maze(&maze));
    Ok(output)
}

/// Geometry, parameters, exits and connectivity of a maze
pub fn describe_maze(maze: &Maze) -> String {
    let params = maze.params();
    let size = maze.size();
    let mut output = String::new();

    output.push_str("Geometry:\n");
    output.push_str(&format!("  Size: {0} x {0} x {0} ({1} cells)\n", size, size.pow(3)));
    output.push_str(&format!("  Start: {:?}\n", maze.start()));
    output.push_str(&format!("  Exits: {}\n", maze.exits().len()));
    for exit in maze.exits() {
        output.push_str(&format!("    {:?}\n", exit));
    }
    output.push('\n');

    output.push_str("Security:\n");
    output.push_str(&format!("  Level: {}\n", maze.security_level()));
    output.push_str(&format!("  Modulus: {}\n", params.modulus));
    output.push_str(&format!("  Dimension: {}\n", params.dimension));
    output.push_str(&format!("  Error sigma: {}\n", params.error_sigma));
    output.push_str(&format!("  Seed: {}..\n", hex::encode(&maze.seed()[..8])));
    output.push('\n');

    output.push_str("Connectivity:\n");
    for dir in Direction::ALL {
        let open = maze.cells().iter().filter(|&&cell| cell & dir.bit() != 0).count();
        output.push_str(&format!("  {} open: {}\n", dir, open));
    }
    let mut histogram = [0usize; 7];
    for &cell in maze.cells() {
        histogram[cell.count_ones() as usize] += 1;
    }
    for (moves, count) in histogram.iter().enumerate() {
        output.push_str(&format!("  Cells with {} moves: {}\n", moves, count));
    }

    output
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::generate::{generate_maze, GenerateOptions};
    use crate::config::SecurityLevel;
    use tempfile::tempdir;

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("maze.bin");
        let options = GenerateOptions {
            size: 4,
            level: SecurityLevel::Low,
            seed: Some(vec![0; 64]),
        };
        generate_maze(&path, &options).unwrap();

        let info = show_info(&path).unwrap();
        assert!(info.contains("Size: 4 x 4 x 4 (64 cells)"));
        assert!(info.contains("Level: low"));
        assert!(info.contains("Exits: 2"));
        assert!(info.contains("Cells with 6 moves:"));
    }

    #[test]
    fn test_histogram_counts_every_cell() {
        let maze = Maze::new(Some(&[5u8; 32]), 6, SecurityLevel::Medium).unwrap();
        let text = describe_maze(&maze);
        let total: usize = text
            .lines()
            .filter_map(|line| line.trim().strip_prefix("Cells with "))
            .filter_map(|rest| rest.split(": ").nth(1))
            .map(|n| n.parse::<usize>().unwrap())
            .sum();
        assert_eq!(total, 216);
    }

    #[test]
    fn test_show_info_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, b"not a maze").unwrap();
        assert!(show_info(&path).is_err());
    }

    #[test]
    fn test_show_info_rejects_wide_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.bin");
        let mut bytes = Maze::new(Some(&[0u8; 64]), 4, SecurityLevel::Low)
            .unwrap()
            .serialize();
        let len = bytes.len();
        bytes[len - 8..].fill(0xFF);
        std::fs::write(&path, &bytes).unwrap();

        assert!(matches!(
            show_info(&path),
            Err(crate::error::MazeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1048576), "1.0 MB");
    }
}
