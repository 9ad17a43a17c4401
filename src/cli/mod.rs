//! Command-line parsing for the exhaustive subset regression tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting code. Every fit option can also come from the environment (or a
//! `.env` file loaded at startup); explicit flags win.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Criterion, DEFAULT_COMBO_SIZE, DEFAULT_MAX_COMBINATIONS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "subset", version, about = "Exhaustive-subset OLS model selection (MSE / AIC / BIC)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit every combination, print the dataset summary, all results and the best models.
    Fit(FitArgs),
    /// Print only the ranked results table (useful for scripting).
    Rank(FitArgs),
    /// Write a synthetic CSV with a known linear relationship.
    Sample(SampleArgs),
}

/// Common options for fitting and ranking.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input CSV (header row required).
    #[arg(short = 'i', long, env = "SUBSET_INPUT", value_name = "CSV")]
    pub input: PathBuf,

    /// Response column (defaults to the last column).
    #[arg(short = 'y', long, env = "SUBSET_RESPONSE")]
    pub response: Option<String>,

    /// Explicit candidate pool, comma separated (defaults to every other column).
    #[arg(short = 'c', long, env = "SUBSET_CANDIDATES", value_delimiter = ',')]
    pub candidates: Option<Vec<String>>,

    /// Identifier columns to keep out of the default candidate pool.
    #[arg(long, env = "SUBSET_EXCLUDE", value_delimiter = ',', default_value = "id")]
    pub exclude: Vec<String>,

    /// Number of explanatory variables per model.
    #[arg(short = 'k', long, env = "SUBSET_COMBO_SIZE", default_value_t = DEFAULT_COMBO_SIZE)]
    pub combo_size: usize,

    /// Refuse to run if the search space is larger than this.
    #[arg(long, env = "SUBSET_MAX_COMBINATIONS", default_value_t = DEFAULT_MAX_COMBINATIONS)]
    pub max_combinations: u64,

    /// Worker threads (defaults to one per core).
    #[arg(short = 'j', long, env = "SUBSET_THREADS")]
    pub threads: Option<usize>,

    /// Sort results by this criterion.
    #[arg(long = "sort", env = "SUBSET_SORT", value_enum, default_value_t = Criterion::Bic)]
    pub sort_by: Criterion,

    /// Only show the best N results.
    #[arg(long)]
    pub top: Option<usize>,

    /// Export ranked results to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Export ranked results to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for generating a synthetic dataset.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,

    /// Number of rows.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub rows: usize,

    /// Number of feature columns (`x1..xm`).
    #[arg(long, default_value_t = 6)]
    pub features: usize,

    /// How many leading features enter the true response.
    #[arg(long, default_value_t = 2)]
    pub informative: usize,

    /// True intercept.
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    pub intercept: f64,

    /// Standard deviation of the response noise.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
