//! Command-line interface for the Sokoban model-checking solver.

use clap::{Parser, Subcommand};
use miette::Diagnostic;
use sokomv_board::Board;
use sokomv_nuxmv::{nuxmv_available, CheckMode, NuxmvConfig, NuxmvRunner};
use sokomv_smv::{emit_model, SolvabilityPredicate, TransitionModel};
use sokomv_solve::{solve, solve_iteratively, IterativeOutcome, SolveOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::TempDir;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("malformed board: {0}")]
    Board(#[from] sokomv_board::BoardError),

    #[error(
        "nuXmv not found at '{path}' (pass --nuxmv or put the executable on PATH)"
    )]
    EngineMissing { path: String },

    #[error("{0}")]
    Solve(#[from] sokomv_solve::SolveError),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "sokomv", version)]
#[command(
    about = "Sokoban solver backed by the nuXmv model checker",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a board and print the SMV model
    Emit {
        /// Board file (XSB text format)
        #[arg(value_name = "BOARD")]
        board: PathBuf,

        /// Write the model to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Solve a board in one shot over its full goal set
    Solve {
        /// Board file (XSB text format)
        #[arg(value_name = "BOARD")]
        board: PathBuf,

        /// Step bound for bounded model checking
        #[arg(short, default_value = "30")]
        k: usize,

        /// Use the exhaustive BDD engine instead of bounded checking
        #[arg(long)]
        exhaustive: bool,

        /// nuXmv executable
        #[arg(long, value_name = "PATH", default_value = "nuXmv")]
        nuxmv: PathBuf,

        /// Directory for model and trace artifacts
        /// (default: a temporary directory, removed on exit)
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Solve goal subsets incrementally, one added goal per iteration
    Iterative {
        /// Board file (XSB text format)
        #[arg(value_name = "BOARD")]
        board: PathBuf,

        /// Step bound for each iteration's bounded check
        #[arg(short, default_value = "30")]
        k: usize,

        /// nuXmv executable
        #[arg(long, value_name = "PATH", default_value = "nuXmv")]
        nuxmv: PathBuf,

        /// Directory for model and trace artifacts
        /// (default: a temporary directory, removed on exit)
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    let filter = if matches!(
        &cli.command,
        Commands::Solve { verbose: true, .. } | Commands::Iterative { verbose: true, .. }
    ) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Emit { board, output } => cmd_emit(&board, output.as_deref()),
        Commands::Solve {
            board,
            k,
            exhaustive,
            nuxmv,
            work_dir,
            verbose: _,
        } => cmd_solve(&board, k, exhaustive, nuxmv, work_dir),
        Commands::Iterative {
            board,
            k,
            nuxmv,
            work_dir,
            verbose: _,
        } => cmd_iterative(&board, k, nuxmv, work_dir),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

fn read_board(path: &Path) -> CliResult<Board> {
    let text = fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Board::parse(&text)?)
}

/// Resolve the artifact directory, creating (and keeping alive) a
/// scratch directory when none was given.
fn resolve_work_dir(explicit: Option<PathBuf>) -> CliResult<(PathBuf, Option<TempDir>)> {
    match explicit {
        Some(dir) => Ok((dir, None)),
        None => {
            let scratch = tempfile::tempdir().map_err(|e| CliError::Io {
                path: "<tempdir>".to_string(),
                message: e.to_string(),
            })?;
            let path = scratch.path().to_path_buf();
            Ok((path, Some(scratch)))
        }
    }
}

fn make_runner(
    nuxmv: PathBuf,
    work_dir: Option<PathBuf>,
) -> CliResult<(NuxmvRunner, Option<TempDir>)> {
    if !nuxmv_available(&nuxmv) {
        return Err(CliError::EngineMissing {
            path: nuxmv.display().to_string(),
        });
    }
    let (work_dir, scratch) = resolve_work_dir(work_dir)?;
    Ok((NuxmvRunner::new(NuxmvConfig::new(nuxmv, work_dir)), scratch))
}

fn cmd_emit(board_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let board = read_board(board_path)?;
    let transitions = TransitionModel::compile(&board);
    let solvable = SolvabilityPredicate::for_board(&board);
    let model = emit_model(&board, &transitions, &solvable);

    match output {
        Some(path) => {
            fs::write(path, &model).map_err(|e| CliError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            info!(model = %path.display(), "model written");
        }
        None => print!("{model}"),
    }
    Ok(())
}

fn cmd_solve(
    board_path: &Path,
    k: usize,
    exhaustive: bool,
    nuxmv: PathBuf,
    work_dir: Option<PathBuf>,
) -> CliResult<()> {
    let board = read_board(board_path)?;
    let (runner, _scratch) = make_runner(nuxmv, work_dir)?;
    let mode = if exhaustive {
        CheckMode::Exhaustive
    } else {
        CheckMode::Bounded { k }
    };

    let start = Instant::now();
    let outcome = solve(&board, mode, &runner)?;
    let elapsed = start.elapsed();

    match outcome {
        SolveOutcome::Solved { moves } => {
            println!();
            println!("Result: SOLVED");
            println!("  Moves ({}):", moves.len());
            for mv in &moves {
                println!("    {mv}");
            }
            println!("  Time: {:.2}s", elapsed.as_secs_f64());
        }
        SolveOutcome::NoPathWithinBound => {
            println!();
            println!("Result: NO PATH within {k} steps");
            println!("  A larger -k may still find a solution.");
            println!("  Time: {:.2}s", elapsed.as_secs_f64());
            std::process::exit(1);
        }
        SolveOutcome::Unsolvable => {
            println!();
            println!("Result: UNSOLVABLE");
            println!("  The board has no solution.");
            println!("  Time: {:.2}s", elapsed.as_secs_f64());
            std::process::exit(1);
        }
    }
    Ok(())
}

fn cmd_iterative(
    board_path: &Path,
    k: usize,
    nuxmv: PathBuf,
    work_dir: Option<PathBuf>,
) -> CliResult<()> {
    let board = read_board(board_path)?;
    let (runner, _scratch) = make_runner(nuxmv, work_dir)?;

    let outcome = solve_iteratively(&board, k, &runner)?;

    match outcome {
        IterativeOutcome::Solved { iterations } => {
            println!();
            println!("Result: SOLVED");
            let mut total = 0.0;
            for report in &iterations {
                let secs = report.elapsed.as_secs_f64();
                total += secs;
                println!("  Iteration {}: {:.3}s", report.iteration, secs);
            }
            println!(
                "  Total: {:.3}s over {} iterations",
                total,
                iterations.len()
            );
        }
        IterativeOutcome::Unsolvable { failed_iteration } => {
            println!();
            println!("Result: UNSOLVABLE");
            println!(
                "  No path for the goal prefix of length {failed_iteration} \
                 within {k} steps."
            );
            std::process::exit(1);
        }
    }
    Ok(())
}
