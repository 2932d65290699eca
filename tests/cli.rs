use std::error::Error;
use std::process::{Command, Output};
use tempfile::tempdir;

fn mazecrypt_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mazecrypt"))
}

fn run(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    Ok(mazecrypt_command().args(args).output()?)
}

const ZERO_SEED: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[test]
fn generate_then_info() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let maze = dir.path().join("maze.bin");

    let generate = run(&[
        "generate",
        "--size",
        "4",
        "--level",
        "low",
        "--seed-hex",
        ZERO_SEED,
        maze.to_str().unwrap(),
    ])?;
    assert!(
        generate.status.success(),
        "generate command failed: {}",
        String::from_utf8_lossy(&generate.stderr)
    );
    assert!(String::from_utf8(generate.stdout)?.contains("Generated 4x4x4 low maze"));
    assert!(maze.exists(), "maze file should exist after generate");

    let info = run(&["info", maze.to_str().unwrap()])?;
    assert!(info.status.success());
    let info_stdout = String::from_utf8(info.stdout)?;
    assert!(info_stdout.contains("Size: 4 x 4 x 4 (64 cells)"));
    assert!(info_stdout.contains("Level: low"));

    // Same seed, same file
    let again = dir.path().join("again.bin");
    let second = run(&[
        "generate",
        "-s",
        "4",
        "-l",
        "low",
        "--seed-hex",
        ZERO_SEED,
        again.to_str().unwrap(),
    ])?;
    assert!(second.status.success());
    assert_eq!(std::fs::read(&maze)?, std::fs::read(&again)?);

    Ok(())
}

#[test]
fn invalid_inputs_fail() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let maze = dir.path().join("maze.bin");

    let short_seed = run(&["generate", "--seed-hex", "abcd", maze.to_str().unwrap()])?;
    assert!(!short_seed.status.success());
    assert!(String::from_utf8_lossy(&short_seed.stderr).contains("Invalid seed"));

    let bad_size = run(&["solve", "--size", "2"])?;
    assert!(!bad_size.status.success());
    assert!(String::from_utf8_lossy(&bad_size.stderr).contains("Invalid maze size"));

    let bad_level = run(&["solve", "--level", "extreme"])?;
    assert!(!bad_level.status.success());

    Ok(())
}

#[test]
fn solve_reports_outcome() -> Result<(), Box<dyn Error>> {
    let solve = run(&["solve", "--size", "5", "--time", "10", "--level", "low"])?;
    assert!(
        solve.status.success(),
        "solve command failed: {}",
        String::from_utf8_lossy(&solve.stderr)
    );
    let stdout = String::from_utf8(solve.stdout)?;
    assert!(stdout.contains("Maze: 5 x 5 x 5"));
    assert!(stdout.contains("Secure path found") || stdout.contains("No secure path found"));
    Ok(())
}

#[test]
fn solve_reads_config_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        format!(r#"{{"maze_size": 6, "security_level": "high", "seed": "{}"}}"#, ZERO_SEED),
    )?;

    let solve = run(&["solve", "--config", config.to_str().unwrap()])?;
    assert!(
        solve.status.success(),
        "solve command failed: {}",
        String::from_utf8_lossy(&solve.stderr)
    );
    assert!(String::from_utf8(solve.stdout)?.contains("Maze: 6 x 6 x 6"));
    Ok(())
}

#[test]
fn version_and_help() -> Result<(), Box<dyn Error>> {
    let version = run(&["--version"])?;
    assert!(version.status.success());
    assert!(String::from_utf8_lossy(&version.stdout).starts_with("mazecrypt "));

    let help = mazecrypt_command().output()?;
    assert!(help.status.success());
    let stdout = String::from_utf8_lossy(&help.stdout);
    assert!(stdout.contains("Usage: mazecrypt"));
    assert!(stdout.contains("Commands:"));
    Ok(())
}
