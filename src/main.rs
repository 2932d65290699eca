use clap::{Parser, Subcommand};
use mazecrypt::cli::{generate_maze, show_info, solve, GenerateOptions, SolveOptions};
use mazecrypt::{MazeError, SecurityConfig, SecurityLevel};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("MAZECRYPT_VERSION");
const PROFILE: &str = env!("MAZECRYPT_PROFILE");
const GIT_HASH: &str = env!("MAZECRYPT_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} ({})", PROFILE, VERSION, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "mazecrypt")]
#[command(author, about = "Keys bound to solving a seeded 3D maze", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a maze and write it to a file
    #[command(alias = "g")]
    Generate {
        /// Maze dimension
        #[arg(short, long, default_value = "12")]
        size: usize,

        /// Security level
        #[arg(short, long, default_value = "medium", value_parser = parse_level)]
        level: SecurityLevel,

        /// Seed as hex (at least 32 bytes); random when omitted
        #[arg(long, value_parser = parse_seed)]
        seed_hex: Option<SeedHex>,

        /// Output file
        output: PathBuf,
    },

    /// Show information about a maze file
    #[command(alias = "i")]
    Info {
        /// Maze file to inspect
        file: PathBuf,
    },

    /// Generate a maze, search for a secure path and self-check the cipher
    #[command(alias = "s")]
    Solve {
        /// Maze dimension
        #[arg(short, long, default_value = "12")]
        size: usize,

        /// Time window in seconds
        #[arg(short, long, default_value = "90")]
        time: u64,

        /// Security level
        #[arg(short, long, default_value = "medium", value_parser = parse_level)]
        level: SecurityLevel,

        /// Seed as hex (at least 32 bytes); random when omitted
        #[arg(long, value_parser = parse_seed)]
        seed_hex: Option<SeedHex>,

        /// JSON config file; overrides the other options
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_level(s: &str) -> Result<SecurityLevel, String> {
    s.parse().map_err(|e: MazeError| format!("{}", e))
}

/// Raw seed bytes given on the command line as hex
#[derive(Clone)]
struct SeedHex(Vec<u8>);

fn parse_seed(s: &str) -> Result<SeedHex, String> {
    hex::decode(s).map(SeedHex).map_err(|e| format!("{}", e))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mazecrypt=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    if cli.version {
        println!("mazecrypt {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if Cli::command().print_help().is_err() {
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Generate {
            size,
            level,
            seed_hex,
            output,
        } => {
            let options = GenerateOptions {
                size,
                level,
                seed: seed_hex.map(|s| s.0),
            };
            generate_maze(&output, &options).map(|maze| {
                println!(
                    "Generated {0}x{0}x{0} {1} maze with {2} exits to {3}",
                    maze.size(),
                    maze.security_level(),
                    maze.exits().len(),
                    output.display()
                );
            })
        }

        Commands::Info { file } => show_info(&file).map(|info| print!("{}", info)),

        Commands::Solve {
            size,
            time,
            level,
            seed_hex,
            config,
        } => {
            let config = match config {
                Some(path) => SecurityConfig::load(&path),
                None => SecurityConfig::new(size, time, level).map(|cfg| SecurityConfig {
                    seed: seed_hex.map(|s| s.0),
                    ..cfg
                }),
            };
            config
                .and_then(|config| {
                    solve(&SolveOptions {
                        config,
                        ..Default::default()
                    })
                })
                .map(|report| print!("{}", report))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
