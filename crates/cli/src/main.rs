use anyhow::{Context, Result};
use clap::Parser;
use demanda_core::{Config, GroupedConsumption, NormalizedTable, Period, REQUIRED_COLUMNS};
use demanda_estimation::{estimate, grouped, save_csv, write_csv};
use demanda_ingestion::Normalizer;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_string().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let normalizer = Normalizer::new(&config);

    match cli.command {
        Commands::Estimate {
            base,
            recent,
            output,
            group_by,
        } => {
            let table_a = load(&normalizer, &base, Period::A)?;
            let table_b = load(&normalizer, &recent, Period::B)?;

            let result = estimate(&table_a, &table_b).context("estimating consumption")?;
            info!(groups = result.len(), "estimated groups (department/tariff)");

            match output {
                Some(path) => save_csv(&result, &path)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => write_csv(&result, std::io::stdout().lock())?,
            }

            if let Some(group_by) = group_by {
                eprint!("{}", render_summary(&grouped(&result, group_by.into())));
            }
        }
        Commands::Inspect { file } => {
            let table = normalizer
                .normalize_path(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            print!("{}", describe(&table));
        }
    }

    Ok(())
}

fn load(normalizer: &Normalizer, path: &Path, period: Period) -> Result<NormalizedTable> {
    let table = normalizer
        .normalize_path(path)
        .with_context(|| format!("reading period {period} file {}", path.display()))?;
    info!(period = %period, rows = table.len(), "loaded {}", path.display());
    Ok(table)
}

fn describe(table: &NormalizedTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "configuration: {}", table.config());
    let _ = writeln!(out, "rows: {}", table.len());
    let _ = writeln!(out, "columns: {}", table.columns().join(", "));
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|c| !table.has_column(c))
        .collect();
    if !missing.is_empty() {
        let _ = writeln!(out, "missing for estimation: {}", missing.join(", "));
    }
    out
}

fn render_summary(groups: &[GroupedConsumption]) -> String {
    let width = groups
        .iter()
        .map(|g| g.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("GRUPO".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>16}  {:>16}  {:>16}",
        "GRUPO", "CONSUMO_2023", "CONSUMO_2024", "ESTIMADO_2025"
    );
    for g in groups {
        let _ = writeln!(
            out,
            "{:<width$}  {:>16.2}  {:>16.2}  {:>16.2}",
            g.label, g.consumo_2023, g.consumo_2024, g.consumo_2025_estimado
        );
    }
    out
}
