//! Main CLI application for the crossword CSP solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossword_csp::{
    config::{CliOverrides, Settings},
    crossword::{create_example_puzzles, io::load_structure_from_file, load_crossword, Crossword},
    fill::{CrosswordProblem, Solution, SolutionValidator},
    utils::{BatchOutcome, ColorOutput, SolutionFormatter},
};
use log::{info, LevelFilter};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "crossword")]
#[command(about = "Crossword CSP Solver")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a crossword from a word list
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Structure file (overrides config)
        #[arg(short, long)]
        structure: Option<PathBuf>,

        /// Words file (overrides config)
        #[arg(short, long)]
        words: Option<PathBuf>,

        /// Output directory; the solution is saved when given (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Give up after this many seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Search without arc consistency after each assignment
        #[arg(long)]
        no_inference: bool,
    },

    /// Create example configuration and puzzle files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Check a saved solution against its structure
    Validate {
        /// Solution file (JSON)
        #[arg(long)]
        solution: PathBuf,

        /// Structure file
        #[arg(short, long)]
        structure: PathBuf,

        /// Words file; when given, every word must come from it
        #[arg(short, long)]
        words: Option<PathBuf>,
    },

    /// Show the slots of a puzzle and how far consistency narrows them
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Structure file (overrides config)
        #[arg(short, long)]
        structure: Option<PathBuf>,

        /// Words file (overrides config)
        #[arg(short, long)]
        words: Option<PathBuf>,
    },

    /// Fill several structures with one word list in parallel
    Batch {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Words file (overrides config)
        #[arg(short, long)]
        words: Option<PathBuf>,

        /// Output directory; solutions are saved when given (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Give up on each puzzle after this many seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Structure files to fill
        #[arg(required = true)]
        structures: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            config,
            structure,
            words,
            output,
            timeout,
            no_inference,
        } => {
            let overrides = CliOverrides {
                structure_file: structure,
                words_file: words,
                output_dir: output,
                timeout_seconds: timeout,
                no_inference,
            };
            solve_command(config, overrides, cli.verbose)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Validate {
            solution,
            structure,
            words,
        } => validate_command(solution, structure, words),
        Commands::Analyze {
            config,
            structure,
            words,
        } => {
            let overrides = CliOverrides {
                structure_file: structure,
                words_file: words,
                ..CliOverrides::default()
            };
            analyze_command(config, overrides)
        }
        Commands::Batch {
            config,
            words,
            output,
            timeout,
            structures,
        } => {
            let overrides = CliOverrides {
                words_file: words,
                output_dir: output,
                timeout_seconds: timeout,
                ..CliOverrides::default()
            };
            batch_command(config, overrides, structures)
        }
    }
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
    info!("Logging successfully configured");
}

/// Load the configuration file if present, apply overrides and validate
fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;

    Ok(settings)
}

fn solution_name(structure_file: &Path) -> String {
    structure_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "solution".to_string())
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🧩 Starting Crossword Solver"));

    let settings = load_settings(&config_path, &overrides)?;

    if verbose {
        println!("Configuration:");
        println!("  Structure file: {}", settings.input.structure_file.display());
        println!("  Words file: {}", settings.input.words_file.display());
        println!("  Inference: {}", settings.solver.inference);
        match settings.solver.timeout_seconds {
            Some(timeout) => println!("  Timeout: {}s", timeout),
            None => println!("  Timeout: none"),
        }
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    let start_time = Instant::now();
    let problem = CrosswordProblem::new(settings.clone()).context("Failed to create crossword problem")?;

    if verbose {
        println!("Structure:\n{}", problem.crossword());
    }

    let Some(solution) = problem.solve().context("Failed to fill crossword")? else {
        println!("{}", ColorOutput::warning("❌ No solution"));
        return Ok(());
    };

    println!(
        "{}",
        ColorOutput::success(&format!(
            "✅ Filled {} slots in {:.3}s",
            solution.entries.len(),
            start_time.elapsed().as_secs_f64()
        ))
    );
    println!("\n{}", SolutionFormatter::format_solution(&solution, verbose));

    if verbose {
        println!("{}", solution.summary());
        println!("{}", solution.statistics);
    }

    if settings.output.save {
        let path = SolutionFormatter::save_solution(
            &solution,
            &settings.output.output_directory,
            &solution_name(&settings.input.structure_file),
            settings.output.format,
        )
        .context("Failed to save solution")?;

        println!("{}", ColorOutput::success(&format!("Solution saved to {}", path.display())));
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let data_dir = directory.join("data");
    let output_dir = directory.join("output");

    for dir in [&config_dir, &data_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let existing = data_dir.join("structure0.txt");
    if !existing.exists() || force {
        create_example_puzzles(&data_dir).context("Failed to create example puzzles")?;
        println!("Created example puzzles in: {}", data_dir.display());
    } else {
        println!("Skipped: {} (already exists)", data_dir.display());
    }

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut mini = Settings::default();
    mini.input.structure_file = PathBuf::from("data/structure1.txt");
    mini.input.words_file = PathBuf::from("data/words1.txt");
    mini.output.format = crossword_csp::config::OutputFormat::Visual;
    mini.to_file(examples_dir.join("mini.yaml"))?;

    let mut unsolvable = Settings::default();
    unsolvable.input.structure_file = PathBuf::from("data/structure2.txt");
    unsolvable.input.words_file = PathBuf::from("data/words1.txt");
    unsolvable.solver.timeout_seconds = Some(10);
    unsolvable.to_file(examples_dir.join("unsolvable.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your structures and word lists to {}", data_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn validate_command(solution_path: PathBuf, structure_path: PathBuf, words_path: Option<PathBuf>) -> Result<()> {
    println!("{}", ColorOutput::info("🔍 Validating solution..."));

    let crossword = match words_path {
        Some(words_path) => load_crossword(&structure_path, &words_path)?,
        None => {
            let rows = load_structure_from_file(&structure_path)?;
            Crossword::from_rows(rows, BTreeSet::new())?
        }
    };

    let solution = Solution::load_from_file(&solution_path)?;
    let result = SolutionValidator::new().validate(&crossword, &solution);

    println!("{}", solution.format_grid());

    if result.is_valid {
        println!("{}", ColorOutput::success("✅ Solution is valid!"));
    } else {
        println!("{}", ColorOutput::error("❌ Solution is invalid"));
        if let Some(error) = result.error_message {
            println!("Error: {}", error);
        }
    }

    Ok(())
}

fn analyze_command(config_path: PathBuf, overrides: CliOverrides) -> Result<()> {
    println!("{}", ColorOutput::info("🔬 Analyzing crossword..."));

    let settings = load_settings(&config_path, &overrides)?;
    let problem = CrosswordProblem::new(settings).context("Failed to create problem for analysis")?;

    println!("Structure ({}x{}):", problem.crossword().width, problem.crossword().height);
    println!("{}", problem.crossword());
    println!("{}", problem.analyze());

    Ok(())
}

/// Fill each structure independently, in parallel
fn run_batch(settings: &Settings, structures: &[PathBuf]) -> Vec<(String, BatchOutcome)> {
    structures
        .par_iter()
        .map(|structure| {
            let mut settings = settings.clone();
            settings.input.structure_file = structure.clone();

            let outcome = match CrosswordProblem::new(settings).and_then(|problem| problem.solve()) {
                Ok(Some(solution)) => BatchOutcome::Solved(solution),
                Ok(None) => BatchOutcome::NoSolution,
                Err(error) => BatchOutcome::Failed(format!("{:#}", error)),
            };

            (solution_name(structure), outcome)
        })
        .collect()
}

fn batch_command(config_path: PathBuf, overrides: CliOverrides, structures: Vec<PathBuf>) -> Result<()> {
    println!(
        "{}",
        ColorOutput::info(&format!("📚 Filling {} crosswords...", structures.len()))
    );

    let settings = load_settings(&config_path, &overrides)?;
    let start_time = Instant::now();
    let results = run_batch(&settings, &structures);

    println!("\n{}", SolutionFormatter::format_batch_summary(&results));
    println!("Total time: {:.3}s", start_time.elapsed().as_secs_f64());

    if settings.output.save {
        for (name, outcome) in &results {
            if let BatchOutcome::Solved(solution) = outcome {
                SolutionFormatter::save_solution(
                    solution,
                    &settings.output.output_directory,
                    name,
                    settings.output.format,
                )
                .with_context(|| format!("Failed to save solution for {}", name))?;
            }
        }
        println!(
            "{}",
            ColorOutput::success(&format!(
                "Solutions saved to {}",
                settings.output.output_directory.display()
            ))
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossword_csp::config::OutputFormat;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "crossword",
            "solve",
            "--config",
            "test.yaml",
            "--timeout",
            "5",
            "--no-inference",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Solve {
                timeout, no_inference, ..
            } => {
                assert_eq!(timeout, Some(5));
                assert!(no_inference);
            }
            _ => panic!("expected solve"),
        }

        assert!(Cli::try_parse_from(["crossword", "batch"]).is_err());
        assert!(Cli::try_parse_from(["crossword", "batch", "a.txt", "b.txt"]).is_ok());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        let config_path = temp_dir.path().join("config/default.yaml");
        assert!(config_path.exists());
        assert!(temp_dir.path().join("data/structure0.txt").exists());
        assert!(temp_dir.path().join("data/words1.txt").exists());
        assert!(temp_dir.path().join("config/examples/mini.yaml").exists());

        assert_eq!(Settings::from_file(&config_path).unwrap(), Settings::default());

        // A second run leaves existing files alone
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();
    }

    #[test]
    fn test_solve_and_validate_commands() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();
        let data = temp_dir.path().join("data");
        let output = temp_dir.path().join("output");

        let mut settings = Settings::default();
        settings.input.structure_file = data.join("structure1.txt");
        settings.input.words_file = data.join("words1.txt");
        settings.output.format = OutputFormat::Json;
        let config_path = temp_dir.path().join("json.yaml");
        settings.to_file(&config_path).unwrap();

        let overrides = CliOverrides {
            output_dir: Some(output.clone()),
            ..CliOverrides::default()
        };
        solve_command(config_path, overrides, true).unwrap();

        let saved = output.join("structure1.json");
        assert!(saved.exists());
        validate_command(saved, data.join("structure1.txt"), Some(data.join("words1.txt"))).unwrap();
    }

    #[test]
    fn test_batch() {
        let temp_dir = tempdir().unwrap();
        let data = temp_dir.path();
        create_example_puzzles(data).unwrap();

        let mut settings = Settings::default();
        settings.input.words_file = data.join("words1.txt");
        let structures = vec![
            data.join("structure1.txt"),
            data.join("structure2.txt"),
            data.join("missing.txt"),
        ];

        let results = run_batch(&settings, &structures);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "structure1");
        assert!(matches!(results[0].1, BatchOutcome::Solved(_)));
        assert!(matches!(results[1].1, BatchOutcome::NoSolution));
        assert!(matches!(results[2].1, BatchOutcome::Failed(_)));
    }
}
