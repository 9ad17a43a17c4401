//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - runs the exhaustive subset search + model selection
//! - prints reports
//! - writes optional exports and synthetic samples

use clap::Parser;

use crate::cli::{Command, FitArgs, SampleArgs};
use crate::domain::{RunConfig, SampleConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `subset` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is fine; flags and real environment variables still apply.
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // We want `subset -i data.csv` to behave like `subset fit -i data.csv`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args, OutputMode::Full),
        Command::Rank(args) => handle_fit(args, OutputMode::RankOnly),
        Command::Sample(args) => handle_sample(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RankOnly,
}

fn handle_fit(args: FitArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    if config.top_n == Some(0) {
        return Err(AppError::new(2, "--top must be > 0."));
    }

    let run = pipeline::run_fit(&config)?;
    let shown = match config.top_n {
        Some(n) => &run.results[..n.min(run.results.len())],
        None => &run.results[..],
    };

    match mode {
        OutputMode::Full => {
            print!(
                "{}",
                crate::report::format_run_summary(&run.stats, &run.candidates, config.combo_size, run.combinations.len())
            );
            print!("{}", crate::report::format_results(shown));
            println!("{}", crate::report::format_selection(&run.selection));
        }
        OutputMode::RankOnly => {
            print!("{}", crate::report::format_ranking(shown, config.sort_by));
        }
    }

    // Exports always carry the full ranked list.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_results_csv(path, &run.results)?;
        log::info!("wrote {} results to {}", run.results.len(), path.display());
    }
    if let Some(path) = &config.export_json {
        crate::io::export::write_results_json(path, &run.results)?;
        log::info!("wrote {} results to {}", run.results.len(), path.display());
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let sample = crate::data::generate_sample(&config)?;
    crate::io::export::write_dataset_csv(&args.output, &sample.dataset)?;

    println!(
        "Wrote {} rows x {} columns to {}",
        sample.dataset.n_rows(),
        sample.dataset.n_cols(),
        args.output.display()
    );
    Ok(())
}

pub fn run_config_from_args(args: &FitArgs) -> RunConfig {
    RunConfig {
        input: args.input.clone(),
        response: args.response.clone(),
        candidates: args.candidates.clone(),
        exclude: args.exclude.clone(),
        combo_size: args.combo_size,
        max_combinations: args.max_combinations,
        threads: args.threads,
        sort_by: args.sort_by,
        top_n: args.top,
        export_csv: args.export_csv.clone(),
        export_json: args.export_json.clone(),
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        rows: args.rows,
        features: args.features,
        informative: args.informative,
        intercept: args.intercept,
        noise: args.noise,
        seed: args.seed,
    }
}

/// Rewrite argv so bare flags default to `subset fit`.
///
/// Rules:
/// - `subset -i data.csv ...`      -> `subset fit -i data.csv ...`
/// - `subset --help/--version/-h`  -> unchanged (show top-level help/version)
/// - `subset` with no arguments    -> unchanged (clap prints usage)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1) else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    let is_subcommand = matches!(arg1.as_str(), "fit" | "rank" | "sample");
    if is_top_level_help_or_version || is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
    }
    argv
}
