//! survey-lens: shopping-preference survey pipeline
//!
//! Cleans a survey export, analyzes preference and correlation structure,
//! and fits a classifier ranking what drives e-commerce preference.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use console::style;

use survey_lens::cli::{Cli, Commands};
use survey_lens::pipeline::get_column_names;
use survey_lens::report::RunSummary;
use survey_lens::stages::{analyzer, cleaner, modeler, run_all};
use survey_lens::utils::{print_banner, print_completion, print_config, print_count};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Listing columns prints the header only, without the banner
    if let Commands::Columns { input } = &cli.command {
        return list_columns(input);
    }

    let config = cli.pipeline_config();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        cli.input().map(|p| p.as_path()),
        &config.target_column,
        &config.output_dir,
        config.charts,
    );

    let summary: RunSummary = match &cli.command {
        Commands::Clean { .. } => cleaner::run(&config)?.artifacts,
        Commands::Analyze => analyzer::run(&config)?.artifacts,
        Commands::Model => modeler::run(&config)?.artifacts,
        Commands::Run { .. } => run_all(&config)?.summary(),
        Commands::Columns { .. } => unreachable!("handled before the banner"),
    };

    summary.display();
    print_completion();

    Ok(())
}

/// Print the header of a source file, one column per line
fn list_columns(input: &Path) -> Result<()> {
    let columns = get_column_names(input)?;
    print_count(
        "column(s) in",
        columns.len(),
        Some(&input.display().to_string()),
    );
    for (i, name) in columns.iter().enumerate() {
        println!("      {:>3}  {}", style(i + 1).dim(), name);
    }
    Ok(())
}
