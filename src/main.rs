//! Wordle Pilot - CLI
//!
//! Extracts boards from captured page snapshots, shows key timing plans, and
//! plays simulated games through the same extractor and input driver used on
//! the live page.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wordle_pilot::{
    commands::{PlayConfig, extract_snapshot, run_play},
    config::PilotConfig,
    driver::{CaseNormalization, KeyPlan},
    extract::Extractor,
    output::{print_board, print_board_plain, print_plan, print_play_result},
    solver::{CommandSolver, ScriptedSolver, Solver},
};

#[derive(Parser)]
#[command(
    name = "wordle_pilot",
    about = "Reads Wordle boards out of the page component tree and types guesses with timed key presses",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (driver timing, submit key, unknown-tile policy)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Delay between key presses in milliseconds (overrides config)
    #[arg(short, long, global = true)]
    delay_ms: Option<u64>,

    /// Label of the submit key (overrides config)
    #[arg(long, global = true)]
    submit_key: Option<String>,

    /// Case applied to letters before key lookup (overrides config)
    #[arg(long, global = true, value_enum)]
    case: Option<CaseNormalization>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the board from a captured DOM snapshot
    Extract {
        /// Snapshot file (JSON element tree)
        snapshot: PathBuf,

        /// Print the solver wire format instead of the board
        #[arg(long)]
        json: bool,

        /// Print one plain line per row
        #[arg(long, conflicts_with = "json")]
        plain: bool,
    },

    /// Show the key activations a word would be typed with
    Plan {
        word: String,

        /// Include the post-submit board read
        #[arg(long)]
        observe: bool,
    },

    /// Play a simulated game against a known answer
    Play {
        /// The answer the simulated board evaluates against
        #[arg(short, long)]
        answer: String,

        /// Guesses to play in order (repeatable)
        #[arg(short, long = "guess")]
        guesses: Vec<String>,

        /// External solver command; receives the board JSON on stdin
        #[arg(short, long, conflicts_with = "guesses")]
        solver_cmd: Option<String>,

        /// Type at wall-clock speed instead of on a virtual clock
        #[arg(long)]
        realtime: bool,

        /// Number of rows on the board
        #[arg(long, default_value = "6")]
        attempts: usize,
    },
}

/// Load the config file, then apply command-line overrides
fn load_config(cli: &Cli) -> Result<PilotConfig> {
    let mut config = match &cli.config {
        Some(path) => PilotConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PilotConfig::default(),
    };

    if let Some(delay) = cli.delay_ms {
        config.driver.inter_key_delay = Duration::from_millis(delay);
    }
    if let Some(key) = &cli.submit_key {
        config.driver.submit_key.clone_from(key);
    }
    if let Some(case) = cli.case {
        config.driver.case = case;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Extract {
            snapshot,
            json,
            plain,
        } => run_extract_command(&snapshot, json, plain, &config),
        Commands::Plan { word, observe } => {
            run_plan_command(&word, observe, &config);
            Ok(())
        }
        Commands::Play {
            answer,
            guesses,
            solver_cmd,
            realtime,
            attempts,
        } => run_play_command(
            answer,
            guesses,
            solver_cmd.as_deref(),
            realtime,
            attempts,
            &config,
        ),
    }
}

fn run_extract_command(
    snapshot: &Path,
    json: bool,
    plain: bool,
    config: &PilotConfig,
) -> Result<()> {
    let extractor = Extractor::new(config.extractor.clone());
    let state = extract_snapshot(snapshot, &extractor)?;

    if json {
        println!("{}", state.to_json()?);
    } else if plain {
        print_board_plain(&state);
    } else {
        print_board(&state);
    }
    Ok(())
}

fn run_plan_command(word: &str, observe: bool, config: &PilotConfig) {
    let mut plan = KeyPlan::build(word, &config.driver);
    if observe {
        plan = plan.with_observation(config.driver.settle_delay);
    }
    print_plan(&plan);
}

fn run_play_command(
    answer: String,
    guesses: Vec<String>,
    solver_cmd: Option<&str>,
    realtime: bool,
    attempts: usize,
    config: &PilotConfig,
) -> Result<()> {
    let mut solver: Box<dyn Solver> = match solver_cmd {
        Some(line) => Box::new(
            CommandSolver::from_command_line(line).context("solver command is empty")?,
        ),
        None if guesses.is_empty() => {
            bail!("nothing to play: pass --guess words or a --solver-cmd")
        }
        None => Box::new(ScriptedSolver::new(guesses)),
    };

    let play = PlayConfig {
        answer,
        max_attempts: attempts,
        realtime,
        driver: config.driver.clone(),
        extractor: config.extractor.clone(),
    };
    let result = run_play(&play, solver.as_mut())?;
    print_play_result(&result);
    Ok(())
}
